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

use redash_client::{Visualization, VisualizationRequest};
use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::Diagnostics;

use crate::utils::{
    attribute, json_value, optional_string_value, parse_json, string_value, to_optional_string,
    to_string, WithSchema,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VisualizationState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub query_id: ValueNumber,
    #[serde(rename = "type")]
    pub kind: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub options: ValueString<'a>,
}

impl<'a> VisualizationState<'a> {
    /// Body sent to Redash; `query_id` is only given on creation
    pub fn request(
        &self,
        diags: &mut Diagnostics,
        query_id: Option<i64>,
    ) -> Option<VisualizationRequest> {
        Some(VisualizationRequest {
            query_id,
            kind: to_string(&self.kind),
            name: to_string(&self.name),
            description: to_optional_string(&self.description),
            options: parse_json(diags, &self.options, "options")?,
        })
    }

    pub fn from_remote(
        visualization: Visualization,
        query_id: i64,
        prior: &VisualizationState<'_>,
    ) -> Self {
        Self {
            id: string_value(visualization.id.to_string()),
            query_id: Value::Value(query_id),
            kind: string_value(visualization.kind),
            name: string_value(visualization.name),
            // Redash stores a missing description as an empty one
            description: optional_string_value(visualization.description),
            options: json_value(&prior.options, &visualization.options),
        }
    }
}

impl<'a> WithSchema for VisualizationState<'a> {
    fn resource_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the visualization"),
                    "query_id" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Required,
                        "Id of the query whose results are displayed, changing it recreates the visualization",
                    ),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Required, "Kind of visualization (eg: `TABLE`, `CHART`, `COUNTER`)"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Name of the visualization"),
                    "description" => attribute(AttributeType::String, AttributeConstraint::Optional, "Description of the visualization"),
                    "options" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "JSON encoded options, specific to the visualization type (default: `{}`)",
                    ),
                },
                description: Description::plain("Visualization of the results of a Redash query"),
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
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Id of the visualization"),
                    "query_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the query holding the visualization"),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Computed, "Kind of visualization"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Name of the visualization"),
                    "description" => attribute(AttributeType::String, AttributeConstraint::Computed, "Description of the visualization"),
                    "options" => attribute(AttributeType::String, AttributeConstraint::Computed, "JSON encoded options"),
                },
                description: Description::plain("Lookup of a visualization of a Redash query"),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_without_options() {
        let mut diags = Diagnostics::default();
        let state = VisualizationState {
            kind: string_value("TABLE"),
            name: string_value("Table"),
            ..Default::default()
        };
        let request = state.request(&mut diags, Some(3)).unwrap();
        assert_eq!(request.query_id, Some(3));
        assert_eq!(request.description, None);
        assert_eq!(request.options, json!({}));
    }

    #[test]
    fn empty_description_stays_null() {
        let visualization = Visualization {
            id: 31,
            kind: "TABLE".into(),
            name: "Table".into(),
            description: Some(String::new()),
            options: json!({}),
        };
        let state = VisualizationState::from_remote(visualization, 3, &Default::default());
        assert!(state.description.is_null());
        assert_eq!(state.options, string_value("{}"));
    }
}
