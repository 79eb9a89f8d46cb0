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
use crate::utils::{known_number, parse_id, ReportError, WithSchema};

use super::state::VisualizationState;

#[derive(Debug, Default, Clone)]
pub struct VisualizationDataSource {
    connection: RedashConnection,
}

impl VisualizationDataSource {
    pub fn new(connection: RedashConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DataSource for VisualizationDataSource {
    type State<'a> = VisualizationState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(VisualizationState::data_source_schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.connection.client(diags)?;
        let query_id = known_number(diags, &config.query_id, "query_id")?;
        let id = parse_id(diags, &config.id, "id")?;
        let visualization = client
            .get_visualization(query_id, id)
            .await
            .report(diags, "Could not read visualization")?;
        Some(VisualizationState::from_remote(
            visualization,
            query_id,
            &Default::default(),
        ))
    }
}
