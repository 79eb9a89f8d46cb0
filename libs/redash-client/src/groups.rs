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
use serde_json::json;

use crate::{Client, RedashError, Result};

/// Group of users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// Either `builtin` or `regular`
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Body of a group creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupRequest {
    pub name: String,
}

/// Data source as seen from a group it is attached to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDataSource {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub view_only: bool,
}

impl Client {
    pub async fn get_group(&self, id: i64) -> Result<Group> {
        self.get(&format!("groups/{id}")).await
    }

    pub async fn create_group(&self, request: &GroupRequest) -> Result<Group> {
        self.post("groups", request).await
    }

    pub async fn update_group(&self, id: i64, request: &GroupRequest) -> Result<Group> {
        self.post(&format!("groups/{id}"), request).await
    }

    pub async fn delete_group(&self, id: i64) -> Result<()> {
        self.delete(&format!("groups/{id}")).await
    }

    pub async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.post_unit(
            &format!("groups/{group_id}/members"),
            &json!({ "user_id": user_id }),
        )
        .await
    }

    pub async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.delete(&format!("groups/{group_id}/members/{user_id}"))
            .await
    }

    pub async fn list_group_data_sources(&self, group_id: i64) -> Result<Vec<GroupDataSource>> {
        self.get(&format!("groups/{group_id}/data_sources")).await
    }

    /// Find a single data source attached to a group
    pub async fn get_group_data_source(
        &self,
        group_id: i64,
        data_source_id: i64,
    ) -> Result<GroupDataSource> {
        self.list_group_data_sources(group_id)
            .await?
            .into_iter()
            .find(|data_source| data_source.id == data_source_id)
            .ok_or_else(|| {
                RedashError::NotFound(format!(
                    "data source {data_source_id} in group {group_id}"
                ))
            })
    }

    pub async fn add_group_data_source(&self, group_id: i64, data_source_id: i64) -> Result<()> {
        self.post_unit(
            &format!("groups/{group_id}/data_sources"),
            &json!({ "data_source_id": data_source_id }),
        )
        .await
    }

    /// Change whether the group can only view the data source or also query it
    pub async fn set_group_data_source_view_only(
        &self,
        group_id: i64,
        data_source_id: i64,
        view_only: bool,
    ) -> Result<()> {
        self.post_unit(
            &format!("groups/{group_id}/data_sources/{data_source_id}"),
            &json!({ "view_only": view_only }),
        )
        .await
    }

    pub async fn remove_group_data_source(&self, group_id: i64, data_source_id: i64) -> Result<()> {
        self.delete(&format!("groups/{group_id}/data_sources/{data_source_id}"))
            .await
    }
}
