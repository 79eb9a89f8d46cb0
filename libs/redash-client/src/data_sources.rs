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

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{Client, Result};

/// Value Redash sends back in place of secret options
pub const MASKED_SECRET: &str = "--------";

/// Connection to a database or an API that queries run against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default, deserialize_with = "paused_flag")]
    pub paused: bool,
}

/// Redash sends `paused` as `0`/`1` (a Redis `exists` count) or as a boolean
fn paused_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Count(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(paused)) => paused,
        Some(Flag::Count(count)) => count != 0,
        None => false,
    })
}

/// Body of a data source creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSourceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub options: Map<String, Value>,
}

impl Client {
    pub async fn get_data_source(&self, id: i64) -> Result<DataSource> {
        self.get(&format!("data_sources/{id}")).await
    }

    pub async fn create_data_source(&self, request: &DataSourceRequest) -> Result<DataSource> {
        self.post("data_sources", request).await
    }

    pub async fn update_data_source(
        &self,
        id: i64,
        request: &DataSourceRequest,
    ) -> Result<DataSource> {
        self.post(&format!("data_sources/{id}"), request).await
    }

    pub async fn delete_data_source(&self, id: i64) -> Result<()> {
        self.delete(&format!("data_sources/{id}")).await
    }
}
