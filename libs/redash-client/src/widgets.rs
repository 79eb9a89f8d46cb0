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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Client, RedashError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationRef {
    pub id: i64,
}

/// Element of a dashboard: either a visualization or a text box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    #[serde(default)]
    pub dashboard_id: Option<i64>,
    #[serde(default)]
    pub visualization_id: Option<i64>,
    /// Embedded visualization, as returned inside dashboards
    #[serde(default)]
    pub visualization: Option<VisualizationRef>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_width")]
    pub width: i64,
    #[serde(default)]
    pub options: Value,
}

fn default_width() -> i64 {
    1
}

impl Widget {
    /// Id of the displayed visualization, whichever way the server sent it
    pub fn visualization_id(&self) -> Option<i64> {
        self.visualization_id
            .or_else(|| self.visualization.as_ref().map(|v| v.id))
    }
}

/// Body of a widget creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetRequest {
    pub dashboard_id: i64,
    pub visualization_id: Option<i64>,
    pub text: String,
    pub width: i64,
    pub options: Value,
}

/// Body of a widget update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetUpdate {
    pub text: String,
    pub width: i64,
    pub options: Value,
}

/// Older Redash versions wrap the created widget
#[derive(Deserialize)]
#[serde(untagged)]
enum WidgetEnvelope {
    Wrapped { widget: Widget },
    Plain(Widget),
}

impl From<WidgetEnvelope> for Widget {
    fn from(value: WidgetEnvelope) -> Self {
        match value {
            WidgetEnvelope::Wrapped { widget } | WidgetEnvelope::Plain(widget) => widget,
        }
    }
}

impl Client {
    /// Find a widget inside its dashboard (there is no endpoint to get a single widget)
    pub async fn get_widget(&self, dashboard_id: i64, widget_id: i64) -> Result<Widget> {
        self.get_dashboard(dashboard_id)
            .await?
            .widgets
            .into_iter()
            .find(|widget| widget.id == widget_id)
            .map(|mut widget| {
                widget.dashboard_id.get_or_insert(dashboard_id);
                widget
            })
            .ok_or_else(|| {
                RedashError::NotFound(format!("widget {widget_id} in dashboard {dashboard_id}"))
            })
    }

    pub async fn create_widget(&self, request: &WidgetRequest) -> Result<Widget> {
        let envelope: WidgetEnvelope = self.post("widgets", request).await?;
        Ok(envelope.into())
    }

    pub async fn update_widget(&self, id: i64, request: &WidgetUpdate) -> Result<Widget> {
        let envelope: WidgetEnvelope = self.post(&format!("widgets/{id}"), request).await?;
        Ok(envelope.into())
    }

    pub async fn delete_widget(&self, id: i64) -> Result<()> {
        self.delete(&format!("widgets/{id}")).await
    }
}
