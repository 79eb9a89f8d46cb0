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

//! Access of a group to a data source
//!
//! The attachment has no id of its own in Redash: it is identified by
//! `<group_id>:<data_source_id>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics, Resource};
use tracing::debug;

use crate::connection::RedashConnection;
use crate::utils::{
    attribute, default_if_null, known_number, no_errors, pair_id, parse_pair, replace_if_changed,
    string_value, to_string, ReportError,
};

const ID_FORMAT: &str = "<group_id>:<data_source_id>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttachmentState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub group_id: ValueNumber,
    pub data_source_id: ValueNumber,
    pub view_only: ValueBool,
}

impl<'a> AttachmentState<'a> {
    fn new(group_id: i64, data_source_id: i64, view_only: bool) -> Self {
        Self {
            id: pair_id(group_id, data_source_id),
            group_id: Value::Value(group_id),
            data_source_id: Value::Value(data_source_id),
            view_only: Value::Value(view_only),
        }
    }

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Computed,
                        "Id of the attachment: `<group_id>:<data_source_id>`",
                    ),
                    "group_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the group"),
                    "data_source_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the data source"),
                    "view_only" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::OptionalComputed,
                        "Members of the group can only view query results (default: false)",
                    ),
                },
                description: Description::plain("Give a Redash group access to a data source"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct GroupDataSourceAttachmentResource {
    connection: RedashConnection,
}

impl GroupDataSourceAttachmentResource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Resource for GroupDataSourceAttachmentResource {
    type State<'a> = AttachmentState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AttachmentState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        for (attr, value) in [
            ("group_id", &config.group_id),
            ("data_source_id", &config.data_source_id),
        ] {
            if matches!(value, Value::Value(id) if *id <= 0) {
                diags.error_short(format!("`{attr}` must be positive"), AttributePath::new(attr));
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
        let (group_id, data_source_id) = parse_pair(diags, &to_string(&state.id), ID_FORMAT)?;
        let attached = client
            .get_group_data_source(group_id, data_source_id)
            .await
            .report(diags, "Could not read group data source attachment")?;
        Some((
            AttachmentState::new(group_id, data_source_id, attached.view_only),
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
        state.id = match (&state.group_id, &state.data_source_id) {
            (Value::Value(group_id), Value::Value(data_source_id)) => {
                pair_id(*group_id, *data_source_id)
            }
            _ => Value::Unknown,
        };
        default_if_null(&mut state.view_only, false);
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
        default_if_null(&mut state.view_only, false);

        let mut trigger_replace = Vec::new();
        replace_if_changed(
            &mut trigger_replace,
            "group_id",
            &prior_state.group_id,
            &state.group_id,
        );
        replace_if_changed(
            &mut trigger_replace,
            "data_source_id",
            &prior_state.data_source_id,
            &state.data_source_id,
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
        let group_id = known_number(diags, &planned_state.group_id, "group_id")?;
        let data_source_id = known_number(diags, &planned_state.data_source_id, "data_source_id")?;
        let view_only = planned_state.view_only.unwrap_or(false);

        client
            .add_group_data_source(group_id, data_source_id)
            .await
            .report(diags, "Could not create group data source attachment")?;
        if view_only {
            client
                .set_group_data_source_view_only(group_id, data_source_id, true)
                .await
                .report(diags, "Could not create group data source attachment")?;
        }
        debug!(group_id, data_source_id, view_only, "Attached data source");

        let state = AttachmentState {
            id: pair_id(group_id, data_source_id),
            ..planned_state
        };
        self.read(diags, state, planned_private_state, Default::default())
            .await
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
        let (group_id, data_source_id) =
            parse_pair(diags, &to_string(&prior_state.id), ID_FORMAT)?;
        let view_only = planned_state.view_only.unwrap_or(false);
        client
            .set_group_data_source_view_only(group_id, data_source_id, view_only)
            .await
            .report(diags, "Could not update group data source attachment")?;
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
        let (group_id, data_source_id) =
            parse_pair(diags, &to_string(&prior_state.id), ID_FORMAT)?;
        client
            .remove_group_data_source(group_id, data_source_id)
            .await
            .report(diags, "Could not delete group data source attachment")
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = AttachmentState {
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

    #[tokio::test]
    async fn create_view_only_attachment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/groups/2/data_sources"))
            .and(body_json(json!({"data_source_id": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "pg"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/groups/2/data_sources/5"))
            .and(body_json(json!({"view_only": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "pg"})))
            .expect(1)
            .mount(&server)
            .await;
        respond(
            &server,
            "GET",
            "/api/groups/2/data_sources",
            json!([{"id": 5, "name": "pg", "type": "pg", "view_only": true}]),
        )
        .await;

        let resource = GroupDataSourceAttachmentResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        let config = AttachmentState {
            group_id: Value::Value(2),
            data_source_id: Value::Value(5),
            view_only: Value::Value(true),
            ..Default::default()
        };
        let (planned, private) = resource
            .plan_create(&mut diags, config.clone(), config.clone(), Value::Null)
            .await
            .unwrap();
        assert_eq!(planned.id, string_value("2:5"));

        let (created, _) = resource
            .create(&mut diags, planned.clone(), config, private, Value::Null)
            .await
            .unwrap();
        assert_eq!(created, planned);
        assert_no_errors(&diags);
    }

    #[tokio::test]
    async fn view_only_defaults_to_false() {
        let resource = GroupDataSourceAttachmentResource::default();
        let mut diags = Diagnostics::default();
        let config = AttachmentState {
            group_id: Value::Value(2),
            data_source_id: Value::Unknown,
            ..Default::default()
        };
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, Value::Null)
            .await
            .unwrap();
        assert!(planned.id.is_unknown());
        assert_eq!(planned.view_only, Value::Value(false));
    }

    #[tokio::test]
    async fn changing_group_replaces() {
        let resource = GroupDataSourceAttachmentResource::default();
        let mut diags = Diagnostics::default();
        let prior = AttachmentState::new(2, 5, false);
        let proposed = AttachmentState {
            group_id: Value::Value(3),
            ..prior.clone()
        };
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed,
                Value::Null,
                Value::Null,
            )
            .await
            .unwrap();
        assert_eq!(replace, vec![AttributePath::new("group_id")]);

        let proposed = AttachmentState {
            view_only: Value::Value(true),
            ..prior.clone()
        };
        let (_, _, replace) = resource
            .plan_update(&mut diags, prior, proposed.clone(), proposed, Value::Null, Value::Null)
            .await
            .unwrap();
        assert!(replace.is_empty());
    }

    #[tokio::test]
    async fn import_rejects_malformed_ids() {
        let server = MockServer::start().await;
        let resource = GroupDataSourceAttachmentResource::new(connection_for(&server));
        let mut diags = Diagnostics::default();
        assert!(resource.import(&mut diags, "25".to_owned()).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
