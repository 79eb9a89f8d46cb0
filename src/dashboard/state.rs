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

use redash_client::{Dashboard, DashboardUpdate};
use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueSet, ValueString};

use crate::utils::{attribute, string_value, tags_to_vec, tags_value, to_string, WithSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub slug: ValueString<'a>,
    pub tags: ValueSet<ValueString<'a>>,
    pub is_draft: ValueBool,
    pub is_archived: ValueBool,
    pub dashboard_filters_enabled: ValueBool,
}

impl<'a> DashboardState<'a> {
    /// Update carrying every known attribute
    pub fn update_request(&self) -> DashboardUpdate {
        DashboardUpdate {
            name: to_string(&self.name),
            tags: match self.tags {
                Value::Unknown => None,
                _ => Some(tags_to_vec(&self.tags)),
            },
            is_draft: self.is_draft.as_ref_option().copied(),
            dashboard_filters_enabled: self.dashboard_filters_enabled.as_ref_option().copied(),
        }
    }

    /// Creation only takes a name: anything else needs an update afterwards
    pub fn needs_update_after_create(&self) -> bool {
        self.tags.is_value() || self.is_draft.is_value() || self.dashboard_filters_enabled.is_value()
    }

    pub fn from_remote(dashboard: Dashboard, prior: &DashboardState<'_>) -> Self {
        Self {
            id: string_value(dashboard.id.to_string()),
            name: string_value(dashboard.name),
            slug: string_value(dashboard.slug),
            tags: tags_value(dashboard.tags, &prior.tags),
            is_draft: Value::Value(dashboard.is_draft),
            is_archived: Value::Value(dashboard.is_archived),
            dashboard_filters_enabled: Value::Value(dashboard.dashboard_filters_enabled),
        }
    }
}

impl<'a> WithSchema for DashboardState<'a> {
    fn resource_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the dashboard"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Name of the dashboard"),
                    "slug" => attribute(AttributeType::String, AttributeConstraint::Computed, "Slug of the dashboard, used in its URL"),
                    "tags" => attribute(AttributeType::Set(AttributeType::String.into()), AttributeConstraint::Optional, "Tags of the dashboard"),
                    "is_draft" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "The dashboard is not published yet"),
                    "is_archived" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "The dashboard has been archived"),
                    "dashboard_filters_enabled" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::OptionalComputed,
                        "Query filters apply to the whole dashboard",
                    ),
                },
                description: Description::plain("Redash dashboard"),
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
                    "slug" => attribute(AttributeType::String, AttributeConstraint::Required, "Slug of the dashboard"),
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the dashboard"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Name of the dashboard"),
                    "tags" => attribute(AttributeType::Set(AttributeType::String.into()), AttributeConstraint::Computed, "Tags of the dashboard"),
                    "is_draft" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "The dashboard is not published yet"),
                    "is_archived" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "The dashboard has been archived"),
                    "dashboard_filters_enabled" => attribute(
                        AttributeType::Bool,
                        AttributeConstraint::Computed,
                        "Query filters apply to the whole dashboard",
                    ),
                },
                description: Description::plain("Lookup of a Redash dashboard by slug"),
                ..Default::default()
            },
        }
    }
}
