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

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Client, Result, Widget};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub dashboard_filters_enabled: bool,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// Body of a dashboard update
///
/// Fields left to `None` are not sent and keep their remote value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_filters_enabled: Option<bool>,
}

impl Client {
    /// Get a dashboard either by id or by slug
    pub async fn get_dashboard<K: Display>(&self, id_or_slug: K) -> Result<Dashboard> {
        self.get(&format!("dashboards/{id_or_slug}")).await
    }

    /// Create an empty dashboard
    pub async fn create_dashboard(&self, name: &str) -> Result<Dashboard> {
        self.post("dashboards", &json!({ "name": name })).await
    }

    pub async fn update_dashboard(&self, id: i64, request: &DashboardUpdate) -> Result<Dashboard> {
        self.post(&format!("dashboards/{id}"), request).await
    }

    /// Archive the dashboard
    pub async fn delete_dashboard(&self, id: i64) -> Result<()> {
        self.delete(&format!("dashboards/{id}")).await
    }
}
