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

use redash_client::{Group, GroupRequest};
use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::ValueString;

use crate::utils::{attribute, string_value, to_string, WithSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    #[serde(rename = "type")]
    pub kind: ValueString<'a>,
}

impl<'a> GroupState<'a> {
    pub fn request(&self) -> GroupRequest {
        GroupRequest {
            name: to_string(&self.name),
        }
    }
}

impl<'a> From<Group> for GroupState<'a> {
    fn from(group: Group) -> Self {
        Self {
            id: string_value(group.id.to_string()),
            name: string_value(group.name),
            kind: string_value(group.kind),
        }
    }
}

impl<'a> WithSchema for GroupState<'a> {
    fn resource_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the group"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Name of the group"),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Computed, "Type of the group (`regular` or `builtin`)"),
                },
                description: Description::plain("Redash group of users"),
                ..Default::default()
            },
        }
    }

    fn data_source_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Id of the group"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Name of the group"),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Computed, "Type of the group"),
                },
                description: Description::plain("Lookup of a Redash group"),
                ..Default::default()
            },
        }
    }
}
