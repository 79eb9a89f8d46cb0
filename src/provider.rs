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

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use redash_client::{Client, Config};
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty, ValueString};
use tf_provider::{
    map, AttributePath, Diagnostics, DynamicDataSource, DynamicResource, Provider,
};
use tracing::info;

use crate::connection::RedashConnection;
use crate::dashboard::{DashboardDataSource, DashboardResource};
use crate::data_source::{DataSourceDataSource, DataSourceResource};
use crate::group::{GroupDataSource, GroupResource};
use crate::group_data_source_attachment::GroupDataSourceAttachmentResource;
use crate::query::{QueryDataSource, QueryResource};
use crate::user::{UserDataSource, UserResource};
use crate::utils::{attribute, check_not_empty, no_errors, sensitive, ReportError};
use crate::visualization::{VisualizationDataSource, VisualizationResource};
use crate::widget::{WidgetDataSource, WidgetResource};

/// Environment variable used when `api_key` is not set
pub const API_KEY_ENV: &str = "REDASH_API_KEY";
/// Environment variable used when `redash_uri` is not set
pub const REDASH_HOST_ENV: &str = "REDASH_HOST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub api_key: ValueString<'a>,
    pub redash_uri: ValueString<'a>,
}

#[derive(Debug, Default, Clone)]
pub struct RedashProvider {
    connection: RedashConnection,
}

impl RedashProvider {
    /// Shared handle given to every resource and data source
    pub fn connection(&self) -> &RedashConnection {
        &self.connection
    }
}

/// Configured value, falling back to the environment when unset.
/// An explicit empty string is not replaced: it is reported as missing, like `validate` does.
fn resolve_setting(value: &ValueString<'_>, env_var: &str) -> Option<String> {
    match value {
        Value::Value(value) => Some(value.to_string()),
        Value::Null | Value::Unknown => env::var(env_var).ok(),
    }
    .filter(|value| !value.is_empty())
}

#[async_trait]
impl Provider for RedashProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "api_key" => sensitive(attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "Redash API key (defaults to the REDASH_API_KEY environment variable)",
                    )),
                    "redash_uri" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "Redash host URL (defaults to the REDASH_HOST environment variable)",
                    ),
                },
                description: Description::plain("Manage Redash data sources, users, groups, queries and dashboards"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        check_not_empty(diags, &config.api_key, "api_key");
        check_not_empty(diags, &config.redash_uri, "redash_uri");
        no_errors(diags)
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let api_key = resolve_setting(&config.api_key, API_KEY_ENV);
        let redash_uri = resolve_setting(&config.redash_uri, REDASH_HOST_ENV);

        if api_key.is_none() {
            diags.error(
                "Missing Redash API key",
                format!("Set `api_key` in the provider block or the {API_KEY_ENV} environment variable"),
                AttributePath::new("api_key"),
            );
        }
        if redash_uri.is_none() {
            diags.error(
                "Missing Redash URI",
                format!("Set `redash_uri` in the provider block or the {REDASH_HOST_ENV} environment variable"),
                AttributePath::new("redash_uri"),
            );
        }
        let (Some(api_key), Some(redash_uri)) = (api_key, redash_uri) else {
            return None;
        };

        let client = Client::new(Config::new(redash_uri, api_key))
            .report(diags, "Redash API Client Error")?;
        info!(
            redash_uri = client.base_url(),
            terraform_version = terraform_version.as_str(),
            "Configured Redash provider"
        );
        self.connection.set(client);
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let connection = &self.connection;
        Some(map! {
            "data_source" => DataSourceResource::new(connection.clone()),
            "user" => UserResource::new(connection.clone()),
            "group" => GroupResource::new(connection.clone()),
            "group_data_source_attachment" => GroupDataSourceAttachmentResource::new(connection.clone()),
            "query" => QueryResource::new(connection.clone()),
            "dashboard" => DashboardResource::new(connection.clone()),
            "widget" => WidgetResource::new(connection.clone()),
            "visualization" => VisualizationResource::new(connection.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        let connection = &self.connection;
        Some(map! {
            "data_source" => DataSourceDataSource::new(connection.clone()),
            "user" => UserDataSource::new(connection.clone()),
            "group" => GroupDataSource::new(connection.clone()),
            "query" => QueryDataSource::new(connection.clone()),
            "dashboard" => DashboardDataSource::new(connection.clone()),
            "widget" => WidgetDataSource::new(connection.clone()),
            "visualization" => VisualizationDataSource::new(connection.clone()),
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::string_value;

    #[test]
    fn registers_every_entity() {
        let provider = RedashProvider::default();
        let mut diags = Diagnostics::default();

        let mut resources: Vec<String> = provider
            .get_resources(&mut diags)
            .unwrap()
            .into_keys()
            .collect();
        resources.sort();
        assert_eq!(
            resources,
            vec![
                "dashboard",
                "data_source",
                "group",
                "group_data_source_attachment",
                "query",
                "user",
                "visualization",
                "widget",
            ]
        );

        let mut data_sources: Vec<String> = provider
            .get_data_sources(&mut diags)
            .unwrap()
            .into_keys()
            .collect();
        data_sources.sort();
        assert_eq!(
            data_sources,
            vec![
                "dashboard",
                "data_source",
                "group",
                "query",
                "user",
                "visualization",
                "widget",
            ]
        );
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn api_key_is_sensitive() {
        let schema = RedashProvider::default()
            .schema(&mut Diagnostics::default())
            .unwrap();
        let api_key = &schema.block.attributes["api_key"];
        assert!(api_key.sensitive);
        assert_eq!(api_key.constraint, AttributeConstraint::Optional);
        assert!(!schema.block.attributes["redash_uri"].sensitive);
    }

    #[test]
    fn settings_fall_back_to_environment() {
        const VAR: &str = "TF_PROVIDER_REDASH_TEST_RESOLVE_SETTING";
        env::set_var(VAR, "from-env");
        assert_eq!(
            resolve_setting(&string_value("explicit"), VAR).as_deref(),
            Some("explicit")
        );
        assert_eq!(resolve_setting(&Value::Null, VAR).as_deref(), Some("from-env"));
        assert_eq!(resolve_setting(&string_value(""), VAR), None);
        env::remove_var(VAR);
        assert_eq!(resolve_setting(&Value::Null, VAR), None);
    }

    #[tokio::test]
    async fn configure_rejects_explicit_empty_api_key() {
        let provider = RedashProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            api_key: string_value(""),
            redash_uri: string_value("https://redash.example.com"),
        };
        assert!(provider
            .configure(&mut diags, "1.9.0".to_owned(), config)
            .await
            .is_none());
        assert_eq!(diags.errors[0].summary, "Missing Redash API key");
        assert!(provider.connection().client(&mut Diagnostics::default()).is_none());
    }

    #[tokio::test]
    async fn configure_builds_client() {
        let provider = RedashProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            api_key: string_value("key"),
            redash_uri: string_value("https://redash.example.com/"),
        };
        assert!(provider
            .configure(&mut diags, "1.8.0".to_owned(), config)
            .await
            .is_some());
        let client = provider.connection().client(&mut diags).unwrap();
        assert_eq!(client.base_url(), "https://redash.example.com");
    }

    #[tokio::test]
    async fn configure_reports_client_errors() {
        let provider = RedashProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            api_key: string_value("key"),
            redash_uri: string_value("redash.example.com"),
        };
        assert!(provider
            .configure(&mut diags, "1.8.0".to_owned(), config)
            .await
            .is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "Redash API Client Error");
    }

    #[tokio::test]
    async fn validate_rejects_empty_settings() {
        let provider = RedashProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            api_key: string_value(""),
            redash_uri: Value::Unknown,
        };
        assert!(provider.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
