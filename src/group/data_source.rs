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
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::connection::RedashConnection;
use crate::utils::{parse_id, ReportError, WithSchema};

use super::state::GroupState;

#[derive(Debug, Default, Clone)]
pub struct GroupDataSource {
    connection: RedashConnection,
}

impl GroupDataSource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DataSource for GroupDataSource {
    type State<'a> = GroupState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(GroupState::data_source_schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.connection.client(diags)?;
        let id = parse_id(diags, &config.id, "id")?;
        let group = client
            .get_group(id)
            .await
            .report(diags, "Could not read group")?;
        Some(group.into())
    }
}
