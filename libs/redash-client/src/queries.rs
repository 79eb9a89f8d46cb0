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

use crate::{Client, Result, Visualization};

/// Refresh schedule of a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Refresh interval in seconds
    pub interval: Option<i64>,
    /// Time of the day (`HH:MM`) for daily and weekly schedules
    pub time: Option<String>,
    /// Day of the week for weekly schedules
    pub day_of_week: Option<String>,
    /// Last day (`YYYY-MM-DD`) the schedule is active
    pub until: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub query: String,
    pub data_source_id: i64,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub visualizations: Vec<Visualization>,
}

/// Body of a query creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryRequest {
    pub name: String,
    pub data_source_id: i64,
    pub query: String,
    pub description: Option<String>,
    /// `None` clears the schedule
    pub schedule: Option<Schedule>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
}

impl Client {
    pub async fn get_query(&self, id: i64) -> Result<Query> {
        self.get(&format!("queries/{id}")).await
    }

    pub async fn create_query(&self, request: &QueryRequest) -> Result<Query> {
        self.post("queries", request).await
    }

    pub async fn update_query(&self, id: i64, request: &QueryRequest) -> Result<Query> {
        self.post(&format!("queries/{id}"), request).await
    }

    /// Archive the query
    pub async fn delete_query(&self, id: i64) -> Result<()> {
        self.delete(&format!("queries/{id}")).await
    }
}
