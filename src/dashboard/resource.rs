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

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::info;

use crate::connection::RedashConnection;
use crate::utils::{
    check_not_empty, no_errors, parse_id, string_value, to_string, unknown_if_null, ReportError,
    WithSchema,
};

use super::state::DashboardState;

#[derive(Debug, Default, Clone)]
pub struct DashboardResource {
    connection: RedashConnection,
}

impl DashboardResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Resource for DashboardResource {
    type State<'a> = DashboardState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DashboardState::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_not_empty(diags, &config.name, "name");
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
        let id = parse_id(diags, &state.id, "id")?;
        let dashboard = client
            .get_dashboard(id)
            .await
            .report(diags, "Could not read dashboard")?;
        Some((DashboardState::from_remote(dashboard, &state), private_state))
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
        state.slug = Value::Unknown;
        unknown_if_null(&mut state.is_draft);
        unknown_if_null(&mut state.is_archived);
        unknown_if_null(&mut state.dashboard_filters_enabled);
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
        // The slug follows the name
        if state.name != prior_state.name {
            state.slug = Value::Unknown;
        }
        Some((state, prior_private_state, vec![]))
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
        let mut dashboard = client
            .create_dashboard(&to_string(&planned_state.name))
            .await
            .report(diags, "Could not create dashboard")?;
        info!(
            id = dashboard.id,
            slug = dashboard.slug.as_str(),
            "Created dashboard"
        );

        if planned_state.needs_update_after_create() {
            dashboard = client
                .update_dashboard(dashboard.id, &planned_state.update_request())
                .await
                .report(diags, "Could not create dashboard")?;
        }
        Some((
            DashboardState::from_remote(dashboard, &planned_state),
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
        let dashboard = client
            .update_dashboard(id, &planned_state.update_request())
            .await
            .report(diags, "Could not update dashboard")?;
        Some((
            DashboardState::from_remote(dashboard, &planned_state),
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
            .delete_dashboard(id)
            .await
            .report(diags, "Could not delete dashboard")
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = DashboardState {
            id: string_value(id),
            ..Default::default()
        };
        self.read(diags, state, Default::default(), Default::default())
            .await
    }
}
