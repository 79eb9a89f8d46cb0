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

use std::sync::{Arc, RwLock};

use redash_client::Client;
use tf_provider::Diagnostics;

/// Handle on the Redash client shared by the provider and all its resources
///
/// Resources are registered before the provider is configured, so the handle
/// starts empty and is filled by `configure`.
#[derive(Debug, Clone, Default)]
pub struct RedashConnection {
    client: Arc<RwLock<Option<Client>>>,
}

impl RedashConnection {
    /// Connection that is already configured
    pub fn new(client: Client) -> Self {
        let connection = Self::default();
        connection.set(client);
        connection
    }

    pub fn set(&self, client: Client) {
        let mut guard = self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(client);
    }

    /// Get the configured client
    ///
    /// The lock is released before returning, so the client can be used across awaits.
    pub fn client(&self, diags: &mut Diagnostics) -> Option<Client> {
        let guard = self
            .client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(client) => Some(client.clone()),
            None => {
                diags.root_error(
                    "Provider is not configured",
                    "The Redash client is used before the provider has been configured",
                );
                None
            }
        }
    }
}
