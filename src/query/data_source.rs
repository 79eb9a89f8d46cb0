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
use tf_provider::{DataSource, Diagnostics};

use crate::connection::RedashConnection;
use crate::utils::{parse_id, ReportError, WithSchema};

use super::state::QueryState;

#[derive(Debug, Default, Clone)]
pub struct QueryDataSource {
    connection: RedashConnection,
}

impl QueryDataSource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DataSource for QueryDataSource {
    type State<'a> = QueryState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(QueryState::data_source_schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &config.id, "id")?;
        let query = client
            .get_query(id)
            .await
            .report(diags, "Could not read query")?;

        let mut state = QueryState::from_remote(query, &config);
        // Computed attributes are always known in a data source
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
    async fn lookup_by_id() {
        let server = MockServer::start().await;
        respond(
            &server,
            "GET",
            "/api/queries/3",
            json!({
                "id": 3,
                "name": "Revenue",
                "query": "SELECT 1",
                "data_source_id": 2,
                "schedule": null,
                "tags": ["finance"],
            }),
        )
        .await;

        let data_source = QueryDataSource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = QueryState {
            id: string_value("3"),
            ..Default::default()
        };
        let state = data_source.read(&mut diags, config, Value::Null).await.unwrap();
        assert_no_errors(&diags);
        assert_eq!(state.name, string_value("Revenue"));
        assert_eq!(state.data_source_id, Value::Value(2));
        assert!(state.schedule.is_null());
        assert_eq!(
            state.tags,
            Value::Value([string_value("finance")].into_iter().collect())
        );
    }
}
