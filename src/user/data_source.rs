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

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{DataSource, Diagnostics};

use crate::connection::RedashConnection;
use crate::utils::{no_errors, parse_id, to_string, ReportError, WithSchema};

use super::state::{check_email, UserState};

#[derive(Debug, Default, Clone)]
pub struct UserDataSource {
    connection: RedashConnection,
}

impl UserDataSource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    type State<'a> = UserState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(UserState::data_source_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        match (config.id.is_null(), config.email.is_null()) {
            (true, true) => diags.root_error_short("One of `id` or `email` must be set"),
            (false, false) => diags.root_error_short("Only one of `id` or `email` can be set"),
            _ => check_email(diags, &config.email),
        }
        no_errors(diags)
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.connection.client(diags)?;

        if let Value::Value(_) = config.id {
            let id = parse_id(diags, &config.id, "id")?;
            let user = client
                .get_user(id)
                .await
                .report(diags, "Could not read user")?;
            return Some(user.into());
        }

        let email = to_string(&config.email);
        let users = client
            .list_users(Some(&email))
            .await
            .report(diags, "Could not read user")?;
        match users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(&email))
        {
            Some(user) => Some(user.into()),
            None => {
                diags.root_error("Could not read user", format!("No user with email `{email}`"));
                None
            }
        }
    }
}
