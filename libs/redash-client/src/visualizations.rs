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

/// Rendering of the results of a query (table, chart, counter...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Value,
}

/// Body of a visualization creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualizationRequest {
    /// Only sent on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub options: Value,
}

impl Client {
    /// Find a visualization inside its query
    pub async fn get_visualization(&self, query_id: i64, id: i64) -> Result<Visualization> {
        self.get_query(query_id)
            .await?
            .visualizations
            .into_iter()
            .find(|visualization| visualization.id == id)
            .ok_or_else(|| RedashError::NotFound(format!("visualization {id} in query {query_id}")))
    }

    pub async fn create_visualization(
        &self,
        request: &VisualizationRequest,
    ) -> Result<Visualization> {
        self.post("visualizations", request).await
    }

    pub async fn update_visualization(
        &self,
        id: i64,
        request: &VisualizationRequest,
    ) -> Result<Visualization> {
        self.post(&format!("visualizations/{id}"), request).await
    }

    pub async fn delete_visualization(&self, id: i64) -> Result<()> {
        self.delete(&format!("visualizations/{id}")).await
    }
}
