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

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::future::{try_join, try_join_all};
use redash_client::Client;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty, ValueNumber, ValueSet};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::{debug, info};

use crate::connection::RedashConnection;
use crate::utils::{
    check_not_empty, no_errors, numbers_to_set, parse_id, string_value, unknown_if_null,
    ReportError, WithSchema,
};

use super::state::{check_email, UserState};

#[derive(Debug, Default, Clone)]
pub struct UserResource {
    connection: RedashConnection,
}

impl UserResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

/// Groups wanted by the configuration, `None` when membership is left to Redash
fn wanted_groups(groups: &ValueSet<ValueNumber>) -> Option<BTreeSet<i64>> {
    match groups {
        Value::Value(_) => Some(numbers_to_set(groups)),
        Value::Null | Value::Unknown => None,
    }
}

/// Add and remove memberships so the user belongs exactly to `wanted`
async fn sync_groups(
    client: &Client,
    user_id: i64,
    current: &[i64],
    wanted: &BTreeSet<i64>,
) -> redash_client::Result<()> {
    let current: BTreeSet<i64> = current.iter().copied().collect();
    let added = wanted
        .difference(&current)
        .map(|&group_id| client.add_group_member(group_id, user_id));
    let removed = current
        .difference(wanted)
        .map(|&group_id| client.remove_group_member(group_id, user_id));
    debug!(user_id, ?wanted, ?current, "Synchronizing user groups");
    try_join(try_join_all(added), try_join_all(removed)).await?;
    Ok(())
}

#[async_trait]
impl Resource for UserResource {
    type State<'a> = UserState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(UserState::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        check_not_empty(diags, &config.name, "name");
        check_email(diags, &config.email);
        for group_id in numbers_to_set(&config.groups) {
            if group_id <= 0 {
                diags.error_short(
                    format!("`{group_id}` is not a valid group id"),
                    AttributePath::new("groups"),
                );
            }
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
        let user = client
            .get_user(id)
            .await
            .report(diags, "Could not read user")?;
        Some((user.into(), private_state))
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
        unknown_if_null(&mut state.groups);
        unknown_if_null(&mut state.is_disabled);
        unknown_if_null(&mut state.is_invitation_pending);
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
        // Changing the email sends a new verification mail
        if state.email != prior_state.email {
            state.is_invitation_pending = Value::Unknown;
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
        config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let user = client
            .create_user(&planned_state.request())
            .await
            .report(diags, "Could not create user")?;
        info!(id = user.id, email = user.email.as_str(), "Created user");

        // New users start in the Redash default group, which is dropped unless configured
        if let Some(wanted) = wanted_groups(&config_state.groups) {
            sync_groups(&client, user.id, &user.groups, &wanted)
                .await
                .report(diags, "Could not create user")?;
        }

        let state = UserState {
            id: string_value(user.id.to_string()),
            ..Default::default()
        };
        self.read(diags, state, planned_private_state, Default::default())
            .await
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &prior_state.id, "id")?;
        let user = client
            .update_user(id, &planned_state.request())
            .await
            .report(diags, "Could not update user")?;

        if let Some(wanted) = wanted_groups(&config_state.groups) {
            sync_groups(&client, id, &user.groups, &wanted)
                .await
                .report(diags, "Could not update user")?;
        }

        self.read(diags, prior_state, planned_private_state, Default::default())
            .await
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &prior_state.id, "id")?;
        let user = client
            .get_user(id)
            .await
            .report(diags, "Could not delete user")?;

        if user.is_invitation_pending {
            client
                .delete_user(id)
                .await
                .report(diags, "Could not delete user")
        } else {
            // Redash refuses to delete users that have logged in
            info!(id, "Disabling user instead of deleting it");
            client
                .disable_user(id)
                .await
                .report(diags, "Could not delete user")
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = UserState {
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
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::testing::{assert_no_errors, connection_for, respond};
    use crate::utils::numbers_value;

    fn dinesh(groups: &[i64], pending: bool) -> serde_json::Value {
        json!({
            "id": 7,
            "name": "Dinesh",
            "email": "dinesh@piedpiper.com",
            "groups": groups,
            "is_disabled": false,
            "is_invitation_pending": pending,
        })
    }

    #[tokio::test]
    async fn create_syncs_exactly_the_configured_groups() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(body_json(json!({"name": "Dinesh", "email": "dinesh@piedpiper.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(dinesh(&[2], true)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/groups/5/members"))
            .and(body_json(json!({"user_id": 7})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/groups/2/members/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        respond(&server, "GET", "/api/users/7", dinesh(&[5], true)).await;

        let resource = UserResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = UserState {
            name: string_value("Dinesh"),
            email: string_value("dinesh@piedpiper.com"),
            groups: numbers_value([5]),
            ..Default::default()
        };
        let (planned, private) = resource
            .plan_create(&mut diags, config.clone(), config.clone(), Value::Null)
            .await
            .unwrap();
        let (created, _) = resource
            .create(&mut diags, planned.clone(), config, private, Value::Null)
            .await
            .unwrap();
        assert_no_errors(&diags);
        assert_eq!(created.id, string_value("7"));
        assert_eq!(created.groups, planned.groups);
        assert_eq!(created.is_invitation_pending, Value::Value(true));
    }

    #[tokio::test]
    async fn update_diffs_groups() {
        let server = MockServer::start().await;
        respond(&server, "POST", "/api/users/7", dinesh(&[2, 3], false)).await;
        Mock::given(method("POST"))
            .and(path("/api/groups/4/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/groups/3/members/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        respond(&server, "GET", "/api/users/7", dinesh(&[2, 4], false)).await;

        let resource = UserResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let prior = UserState::from(redash_client::User {
            id: 7,
            name: "Dinesh".to_owned(),
            email: "dinesh@piedpiper.com".to_owned(),
            groups: vec![2, 3],
            ..Default::default()
        });
        let planned = UserState {
            groups: numbers_value([2, 4]),
            ..prior.clone()
        };
        let (updated, _) = resource
            .update(
                &mut diags,
                prior,
                planned.clone(),
                planned,
                Value::Null,
                Value::Null,
            )
            .await
            .unwrap();
        assert_no_errors(&diags);
        assert_eq!(updated.groups, numbers_value([2, 4]));
    }

    #[tokio::test]
    async fn destroy_disables_active_users() {
        let server = MockServer::start().await;
        respond(&server, "GET", "/api/users/7", dinesh(&[2], false)).await;
        Mock::given(method("POST"))
            .and(path("/api/users/7/disable"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dinesh(&[2], false)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let resource = UserResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let state = UserState {
            id: string_value("7"),
            ..Default::default()
        };
        assert!(resource
            .destroy(&mut diags, state, Value::Null)
            .await
            .is_some());
        assert_no_errors(&diags);
    }

    #[tokio::test]
    async fn destroy_deletes_pending_invitations() {
        let server = MockServer::start().await;
        respond(&server, "GET", "/api/users/7", dinesh(&[2], true)).await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let resource = UserResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let state = UserState {
            id: string_value("7"),
            ..Default::default()
        };
        assert!(resource
            .destroy(&mut diags, state, Value::Null)
            .await
            .is_some());
        assert_no_errors(&diags);
    }

    #[tokio::test]
    async fn validate_checks_email() {
        let resource = UserResource::default();
        let mut diags = Diagnostics::default();
        let config = UserState {
            name: string_value("Dinesh"),
            email: string_value("dinesh"),
            ..Default::default()
        };
        assert!(resource.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors[0].summary, "Invalid email");
    }
}
