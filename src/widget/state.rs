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

use redash_client::Widget;
use serde::{Deserialize, Serialize};
use tf_provider::map;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};

use crate::utils::{attribute, json_value, optional_string_value, string_value, WithSchema};

pub(super) const DEFAULT_WIDTH: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WidgetState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub dashboard_id: ValueNumber,
    pub visualization_id: ValueNumber,
    pub text: ValueString<'a>,
    pub width: ValueNumber,
    pub options: ValueString<'a>,
}

impl<'a> WidgetState<'a> {
    /// State mirroring `widget`; `options` keeps the prior formatting when equivalent
    pub fn from_remote(widget: Widget, dashboard_id: i64, prior: &WidgetState<'_>) -> Self {
        Self {
            id: string_value(widget.id.to_string()),
            dashboard_id: Value::Value(widget.dashboard_id.unwrap_or(dashboard_id)),
            visualization_id: widget.visualization_id().map_or(Value::Null, Value::Value),
            text: optional_string_value(widget.text),
            width: Value::Value(widget.width),
            options: json_value(&prior.options, &widget.options),
        }
    }
}

impl<'a> WithSchema for WidgetState<'a> {
    fn resource_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the widget"),
                    "dashboard_id" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Required,
                        "Id of the dashboard holding the widget, changing it recreates the widget",
                    ),
                    "visualization_id" => attribute(
                        AttributeType::Number,
                        AttributeConstraint::Optional,
                        "Id of the displayed visualization, changing it recreates the widget",
                    ),
                    "text" => attribute(AttributeType::String, AttributeConstraint::Optional, "Markdown text of text widgets"),
                    "width" => attribute(AttributeType::Number, AttributeConstraint::OptionalComputed, "Width of the widget (default: 1)"),
                    "options" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "JSON encoded options of the widget, including its position (default: `{}`)",
                    ),
                },
                description: Description::plain("Widget of a Redash dashboard: a visualization or a text box"),
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
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Id of the widget"),
                    "dashboard_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the dashboard holding the widget"),
                    "visualization_id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Id of the displayed visualization"),
                    "text" => attribute(AttributeType::String, AttributeConstraint::Computed, "Markdown text of text widgets"),
                    "width" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Width of the widget"),
                    "options" => attribute(AttributeType::String, AttributeConstraint::Computed, "JSON encoded options of the widget"),
                },
                description: Description::plain("Lookup of a widget in a Redash dashboard"),
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
    fn visualization_widget_from_dashboard() {
        let widget: Widget = serde_json::from_value(json!({
            "id": 6,
            "visualization": {"id": 31},
            "text": "",
            "width": 1,
            "options": {"position": {"col": 0, "row": 0, "sizeX": 3, "sizeY": 8}},
        }))
        .unwrap();
        let prior = WidgetState {
            options: string_value(r#"{"position": {"sizeY": 8, "sizeX": 3, "row": 0, "col": 0}}"#),
            ..Default::default()
        };
        let state = WidgetState::from_remote(widget, 2, &prior);
        assert_eq!(state.dashboard_id, Value::Value(2));
        assert_eq!(state.visualization_id, Value::Value(31));
        assert!(state.text.is_null());
        assert_eq!(state.options, prior.options);
    }
}
