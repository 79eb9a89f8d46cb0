// This file is part of the terraform-provider-redash project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use async_trait::async_trait;
use redash_client::{WidgetRequest, WidgetUpdate};
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::debug;

use crate::connection::RedashConnection;
use crate::utils::{
    check_json, default_if_null, known_number, no_errors, parse_id, parse_json, parse_pair,
    replace_if_changed, string_value, to_string, ReportError, WithSchema,
};

use super::state::{WidgetState, DEFAULT_WIDTH};

#[derive(Debug, Default, Clone)]
pub struct WidgetResource {
    connection: RedashConnection,
}

impl WidgetResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

fn apply_defaults(state: &mut WidgetState<'_>) {
    default_if_null(&mut state.width, DEFAULT_WIDTH);
    default_if_null(&mut state.options, Cow::Borrowed("{}"));
}

#[async_trait]
impl Resource for WidgetResource {
    type State<'a> = WidgetState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(WidgetState::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_json(diags, &config.options, "options");
        if matches!(config.width, Value::Value(width) if width <= 0) {
            diags.error_short("`width` must be positive", AttributePath::new("width"));
        }
        let no_text = match &config.text {
            Value::Value(text) => text.trim().is_empty(),
            Value::Null => true,
            Value::Unknown => false,
        };
        if no_text && config.visualization_id.is_null() {
            diags.root_error(
                "Empty widget",
                "A widget needs either a `visualization_id` or a `text`",
            );
        }
        no_errors(diags)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let dashboard_id = known_number(diags, &state.dashboard_id, "dashboard_id")?;
        let id = parse_id(diags, &state.id, "id")?;
        let widget = client
            .get_widget(dashboard_id, id)
            .await
            .report(diags, "Could not read widget")?;
        Some((
            WidgetState::from_remote(widget, dashboard_id, &state),
            private_state,
        ))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        apply_defaults(&mut state);
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = proposed_state;
        apply_defaults(&mut state);

        let mut trigger_replace = Vec::new();
        replace_if_changed(
            &mut trigger_replace,
            "dashboard_id",
            &prior_state.dashboard_id,
            &state.dashboard_id,
        );
        replace_if_changed(
            &mut trigger_replace,
            "visualization_id",
            &prior_state.visualization_id,
            &state.visualization_id,
        );
        if !trigger_replace.is_empty() {
            state.id = Value::Unknown;
        }
        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        Some(())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let dashboard_id = known_number(diags, &planned_state.dashboard_id, "dashboard_id")?;
        let request = WidgetRequest {
            dashboard_id,
            visualization_id: planned_state.visualization_id.as_ref_option().copied(),
            text: to_string(&planned_state.text),
            width: planned_state.width.unwrap_or(DEFAULT_WIDTH),
            options: parse_json(diags, &planned_state.options, "options")?,
        };
        let widget = client
            .create_widget(&request)
            .await
            .report(diags, "Could not create widget")?;
        debug!(id = widget.id, dashboard_id, "Created widget");
        Some((
            WidgetState::from_remote(widget, dashboard_id, &planned_state),
            planned_private_state,
        ))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &prior_state.id, "id")?;
        let dashboard_id = known_number(diags, &prior_state.dashboard_id, "dashboard_id")?;
        let request = WidgetUpdate {
            text: to_string(&planned_state.text),
            width: planned_state.width.unwrap_or(DEFAULT_WIDTH),
            options: parse_json(diags, &planned_state.options, "options")?,
        };
        let widget = client
            .update_widget(id, &request)
            .await
            .report(diags, "Could not update widget")?;
        Some((
            WidgetState::from_remote(widget, dashboard_id, &planned_state),
            planned_private_state,
        ))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &prior_state.id, "id")?;
        client
            .delete_widget(id)
            .await
            .report(diags, "Could not delete widget")
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let (dashboard_id, widget_id) = parse_pair(diags, &id, "<dashboard_id>:<widget_id>")?;
        let state = WidgetState {
            id: string_value(widget_id.to_string()),
            dashboard_id: Value::Value(dashboard_id),
            ..Default::default()
        };
        self.read(diags, state, Default::default(), Default::default())
            .await
    }
}
