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
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::debug;

use crate::connection::RedashConnection;
use crate::utils::{
    check_json, check_not_empty, default_if_null, known_number, no_errors, parse_id, parse_pair,
    replace_if_changed, string_value, ReportError, WithSchema,
};

use super::state::VisualizationState;

#[derive(Debug, Default, Clone)]
pub struct VisualizationResource {
    connection: RedashConnection,
}

impl VisualizationResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Resource for VisualizationResource {
    type State<'a> = VisualizationState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(VisualizationState::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_not_empty(diags, &config.kind, "type");
        check_not_empty(diags, &config.name, "name");
        check_json(diags, &config.options, "options");
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
        let query_id = known_number(diags, &state.query_id, "query_id")?;
        let id = parse_id(diags, &state.id, "id")?;
        let visualization = client
            .get_visualization(query_id, id)
            .await
            .report(diags, "Could not read visualization")?;
        Some((
            VisualizationState::from_remote(visualization, query_id, &state),
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
        default_if_null(&mut state.options, Cow::Borrowed("{}"));
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
        default_if_null(&mut state.options, Cow::Borrowed("{}"));

        let mut trigger_replace = Vec::new();
        replace_if_changed(
            &mut trigger_replace,
            "query_id",
            &prior_state.query_id,
            &state.query_id,
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
        let query_id = known_number(diags, &planned_state.query_id, "query_id")?;
        let request = planned_state.request(diags, Some(query_id))?;
        let visualization = client
            .create_visualization(&request)
            .await
            .report(diags, "Could not create visualization")?;
        debug!(id = visualization.id, query_id, "Created visualization");
        Some((
            VisualizationState::from_remote(visualization, query_id, &planned_state),
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
        let query_id = known_number(diags, &prior_state.query_id, "query_id")?;
        let request = planned_state.request(diags, None)?;
        let visualization = client
            .update_visualization(id, &request)
            .await
            .report(diags, "Could not update visualization")?;
        Some((
            VisualizationState::from_remote(visualization, query_id, &planned_state),
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
            .delete_visualization(id)
            .await
            .report(diags, "Could not delete visualization")
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let (query_id, visualization_id) =
            parse_pair(diags, &id, "<query_id>:<visualization_id>")?;
        let state = VisualizationState {
            id: string_value(visualization_id.to_string()),
            query_id: Value::Value(query_id),
            ..Default::default()
        };
        self.read(diags, state, Default::default(), Default::default())
            .await
    }
}
