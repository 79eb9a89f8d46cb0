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

use crate::{Client, Result};

/// Redash user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Ids of the groups the user belongs to
    #[serde(default, deserialize_with = "group_ids")]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_invitation_pending: bool,
}

/// Body of a user creation or update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
}

/// Depending on the endpoint, groups are listed either as ids or as objects
fn group_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GroupRef {
        Id(i64),
        Object { id: i64 },
    }

    let groups = Option::<Vec<GroupRef>>::deserialize(deserializer)?;
    Ok(groups
        .unwrap_or_default()
        .into_iter()
        .map(|group| match group {
            GroupRef::Id(id) | GroupRef::Object { id } => id,
        })
        .collect())
}

impl Client {
    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.get(&format!("users/{id}")).await
    }

    /// List users, optionally filtered by a search string (name or email)
    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        let query: Vec<(&str, String)> = search
            .map(|search| vec![("q", search.to_owned())])
            .unwrap_or_default();
        self.get_all_pages("users", &query).await
    }

    pub async fn create_user(&self, request: &UserRequest) -> Result<User> {
        self.post("users", request).await
    }

    pub async fn update_user(&self, id: i64, request: &UserRequest) -> Result<User> {
        self.post(&format!("users/{id}"), request).await
    }

    /// Disable an active user (Redash never deletes them)
    pub async fn disable_user(&self, id: i64) -> Result<()> {
        self.post_unit(&format!("users/{id}/disable"), &serde_json::json!({}))
            .await
    }

    /// Delete a user whose invitation is still pending
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("users/{id}")).await
    }
}
