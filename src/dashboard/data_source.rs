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
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::connection::RedashConnection;
use crate::utils::{check_not_empty, no_errors, to_string, ReportError, WithSchema};

use super::state::DashboardState;

#[derive(Debug, Default, Clone)]
pub struct DashboardDataSource {
    connection: RedashConnection,
}

impl DashboardDataSource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DataSource for DashboardDataSource {
    type State<'a> = DashboardState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DashboardState::data_source_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_not_empty(diags, &config.slug, "slug");
        if let Value::Value(slug) = &config.slug {
            if slug.contains('/') {
                diags.error_short("`slug` cannot contain `/`", AttributePath::new("slug"));
            }
        }
        no_errors(diags)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.connection.client(diags)?;
        let slug = to_string(&config.slug);
        let dashboard = client
            .get_dashboard(&slug)
            .await
            .report(diags, "Could not read dashboard")?;

        let mut state = DashboardState::from_remote(dashboard, &config);
        if state.tags.is_null() {
            state.tags = Value::Value(Default::default());
        }
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::MockServer;

    use super::*;
    use crate::testing::{assert_no_errors, connection_for, respond};
    use crate::utils::string_value;

    #[tokio::test]
    async fn lookup_by_slug() {
        let server = MockServer::start().await;
        respond(
            &server,
            "GET",
            "/api/dashboards/kpis",
            json!({"id": 8, "slug": "kpis", "name": "KPIs", "widgets": []}),
        )
        .await;

        let data_source = DashboardDataSource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = DashboardState {
            slug: string_value("kpis"),
            ..Default::default()
        };
        let state = data_source.read(&mut diags, config, Value::Null).await.unwrap();
        assert_no_errors(&diags);
        assert_eq!(state.id, string_value("8"));
        assert_eq!(state.tags, Value::Value(Default::default()));
        assert_eq!(state.is_draft, Value::Value(false));
    }
}
