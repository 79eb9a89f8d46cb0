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
use tracing::{debug, info};

use crate::connection::RedashConnection;
use crate::utils::{
    check_not_empty, no_errors, parse_id, string_value, unknown_if_null, ReportError, WithSchema,
};

use super::state::QueryState;

#[derive(Debug, Default, Clone)]
pub struct QueryResource {
    connection: RedashConnection,
}

impl QueryResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Resource for QueryResource {
    type State<'a> = QueryState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(QueryState::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_not_empty(diags, &config.name, "name");
        check_not_empty(diags, &config.query, "query");
        if let Value::Value(schedule) = &config.schedule {
            schedule.validate(diags);
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
        let id = parse_id(diags, &state.id, "id")?;
        let query = client
            .get_query(id)
            .await
            .report(diags, "Could not read query")?;
        Some((QueryState::from_remote(query, &state), private_state))
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
        unknown_if_null(&mut state.is_draft);
        unknown_if_null(&mut state.is_archived);
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        Some((proposed_state, prior_private_state, vec![]))
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
        config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let mut query = client
            .create_query(&planned_state.request(None))
            .await
            .report(diags, "Could not create query")?;
        info!(id = query.id, "Created query");

        // Redash creates drafts, publishing is a separate update
        if let Value::Value(is_draft) = config_state.is_draft {
            if is_draft != query.is_draft {
                debug!(id = query.id, is_draft, "Changing draft status of new query");
                query = client
                    .update_query(query.id, &planned_state.request(Some(is_draft)))
                    .await
                    .report(diags, "Could not create query")?;
            }
        }

        Some((
            QueryState::from_remote(query, &planned_state),
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
        let is_draft = planned_state.is_draft.as_ref_option().copied();
        let query = client
            .update_query(id, &planned_state.request(is_draft))
            .await
            .report(diags, "Could not update query")?;
        Some((
            QueryState::from_remote(query, &planned_state),
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
            .delete_query(id)
            .await
            .report(diags, "Could not delete query")
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = QueryState {
            id: string_value(id),
            ..Default::default()
        };
        self.read(diags, state, Default::default(), Default::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::query::state::ScheduleState;
    use crate::testing::{assert_no_errors, connection_for, respond};

    fn daily_users(is_draft: bool) -> serde_json::Value {
        json!({
            "id": 12,
            "name": "Daily users",
            "description": "",
            "query": "SELECT count(*) FROM users",
            "data_source_id": 1,
            "schedule": {"interval": 86400, "time": "03:00", "day_of_week": null, "until": null},
            "tags": [],
            "is_draft": is_draft,
            "is_archived": false,
            "visualizations": [],
        })
    }

    fn config<'a>() -> QueryState<'a> {
        QueryState {
            name: string_value("Daily users"),
            data_source_id: Value::Value(1),
            query: string_value("SELECT count(*) FROM users"),
            schedule: Value::Value(ScheduleState {
                interval: Value::Value(86400),
                time: string_value("03:00"),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_read() {
        let server = MockServer::start().await;
        respond(&server, "POST", "/api/queries", daily_users(true)).await;
        respond(&server, "GET", "/api/queries/12", daily_users(true)).await;

        let resource = QueryResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = config();
        let (planned, private) = resource
            .plan_create(&mut diags, config.clone(), config.clone(), Value::Null)
            .await
            .unwrap();
        let (created, private) = resource
            .create(&mut diags, planned, config.clone(), private, Value::Null)
            .await
            .unwrap();
        assert_eq!(created.id, string_value("12"));
        assert_eq!(created.schedule, config.schedule);
        assert!(created.tags.is_null());
        assert!(created.description.is_null());
        assert_eq!(created.is_draft, Value::Value(true));

        let (read, _) = resource
            .read(&mut diags, created.clone(), private, Value::Null)
            .await
            .unwrap();
        assert_eq!(read, created);
        assert_no_errors(&diags);
    }

    #[tokio::test]
    async fn create_publishes_when_not_draft() {
        let server = MockServer::start().await;
        respond(&server, "POST", "/api/queries", daily_users(true)).await;
        Mock::given(method("POST"))
            .and(path("/api/queries/12"))
            .and(body_partial_json(json!({"is_draft": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(daily_users(false)))
            .expect(1)
            .mount(&server)
            .await;

        let resource = QueryResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = QueryState {
            is_draft: Value::Value(false),
            ..config()
        };
        let (created, _) = resource
            .create(&mut diags, config.clone(), config, Value::Null, Value::Null)
            .await
            .unwrap();
        assert_no_errors(&diags);
        assert_eq!(created.is_draft, Value::Value(false));
    }

    #[tokio::test]
    async fn validate_schedule() {
        let resource = QueryResource::default();
        let mut diags = Diagnostics::default();
        let config = QueryState {
            schedule: Value::Value(ScheduleState {
                interval: Value::Value(-60),
                ..Default::default()
            }),
            ..config()
        };
        assert!(resource.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
