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

use redash_client::{DataSource, DataSourceRequest, MASKED_SECRET};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tf_provider::map;
use tf_provider::schema::{
    AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{self, Value, ValueBool, ValueMap, ValueNumber, ValueString};

use crate::utils::{attribute, sensitive, string_value, to_string};

/// Options with a dedicated string attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringOption {
    Host,
    User,
    Password,
    Dbname,
    Sslmode,
    ProjectId,
    JsonKeyFile,
}

impl StringOption {
    const ALL: [StringOption; 7] = [
        StringOption::Host,
        StringOption::User,
        StringOption::Password,
        StringOption::Dbname,
        StringOption::Sslmode,
        StringOption::ProjectId,
        StringOption::JsonKeyFile,
    ];

    /// Name of the option in Redash
    fn key(self) -> &'static str {
        match self {
            StringOption::Host => "host",
            StringOption::User => "user",
            StringOption::Password => "password",
            StringOption::Dbname => "dbname",
            StringOption::Sslmode => "sslmode",
            StringOption::ProjectId => "projectId",
            StringOption::JsonKeyFile => "jsonKeyFile",
        }
    }
}

const PORT_OPTION: &str = "port";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    #[serde(rename = "type")]
    pub kind: ValueString<'a>,
    #[serde(with = "value::serde_as_vec")]
    pub options: Value<OptionsState<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OptionsState<'a> {
    #[serde(borrow = "'a")]
    pub host: ValueString<'a>,
    pub port: ValueNumber,
    pub user: ValueString<'a>,
    pub password: ValueString<'a>,
    pub dbname: ValueString<'a>,
    pub sslmode: ValueString<'a>,
    pub project_id: ValueString<'a>,
    pub json_key_file: ValueString<'a>,
    pub extra: ValueMap<'a, ValueString<'a>>,
}

/// Read-only view of a data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DataSourceLookupState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    #[serde(rename = "type")]
    pub kind: ValueString<'a>,
    pub paused: ValueBool,
}

impl<'a> OptionsState<'a> {
    fn string_option(&self, option: StringOption) -> &ValueString<'a> {
        match option {
            StringOption::Host => &self.host,
            StringOption::User => &self.user,
            StringOption::Password => &self.password,
            StringOption::Dbname => &self.dbname,
            StringOption::Sslmode => &self.sslmode,
            StringOption::ProjectId => &self.project_id,
            StringOption::JsonKeyFile => &self.json_key_file,
        }
    }

    fn string_option_mut(&mut self, option: StringOption) -> &mut ValueString<'a> {
        match option {
            StringOption::Host => &mut self.host,
            StringOption::User => &mut self.user,
            StringOption::Password => &mut self.password,
            StringOption::Dbname => &mut self.dbname,
            StringOption::Sslmode => &mut self.sslmode,
            StringOption::ProjectId => &mut self.project_id,
            StringOption::JsonKeyFile => &mut self.json_key_file,
        }
    }

    /// Options as sent to Redash
    pub fn to_json(&self) -> Map<String, Json> {
        let mut options = Map::new();
        for option in StringOption::ALL {
            if let Value::Value(text) = self.string_option(option) {
                options.insert(option.key().to_owned(), Json::String(text.to_string()));
            }
        }
        if let Value::Value(port) = self.port {
            options.insert(PORT_OPTION.to_owned(), Json::from(port));
        }
        for (key, text) in self.extra.iter().flatten() {
            if let Value::Value(text) = text {
                options.insert(key.to_string(), Json::String(text.to_string()));
            }
        }
        options
    }

    /// Options read from Redash; masked secrets and extra keys come from `prior`
    pub fn from_json(remote: &Map<String, Json>, prior: &OptionsState<'a>) -> Self {
        let mut options = OptionsState::default();
        for option in StringOption::ALL {
            *options.string_option_mut(option) =
                remote_string(remote.get(option.key()), prior.string_option(option));
        }
        options.port = match remote.get(PORT_OPTION) {
            Some(Json::Number(port)) => port.as_i64().map_or(Value::Null, Value::Value),
            Some(Json::String(port)) => port.parse().map_or(Value::Null, Value::Value),
            _ => Value::Null,
        };
        options.extra = match &prior.extra {
            Value::Value(extra) => Value::Value(
                extra
                    .iter()
                    .map(|(key, prior)| {
                        (key.clone(), remote_string(remote.get(&key[..]), prior))
                    })
                    .collect(),
            ),
            _ => Value::Null,
        };
        options
    }
}

fn remote_string<'a>(remote: Option<&Json>, prior: &ValueString<'a>) -> ValueString<'a> {
    match remote {
        Some(Json::String(text)) if text == MASKED_SECRET => prior.clone(),
        Some(Json::String(text)) => string_value(text.as_str()),
        Some(Json::Null) | None => Value::Null,
        Some(other) => string_value(other.to_string()),
    }
}

impl<'a> DataSourceState<'a> {
    pub fn request(&self) -> DataSourceRequest {
        DataSourceRequest {
            name: to_string(&self.name),
            kind: to_string(&self.kind),
            options: self
                .options
                .as_ref_option()
                .map(OptionsState::to_json)
                .unwrap_or_default(),
        }
    }

    /// State mirroring `remote`, using `prior` to fill what Redash hides
    pub fn from_remote(remote: DataSource, prior: &DataSourceState<'a>) -> Self {
        let options = match (&prior.options, remote.options.is_empty()) {
            (Value::Value(prior), _) => Value::Value(OptionsState::from_json(&remote.options, prior)),
            (_, true) => Value::Null,
            (_, false) => Value::Value(OptionsState::from_json(
                &remote.options,
                &OptionsState::default(),
            )),
        };
        Self {
            id: string_value(remote.id.to_string()),
            name: string_value(remote.name),
            kind: string_value(remote.kind),
            options,
        }
    }

    pub fn schema() -> Schema {
        let option = |attr_type, description| {
            attribute(attr_type, AttributeConstraint::Optional, description)
        };
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the data source"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Name of the data source"),
                    "type" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "Query runner of the data source (eg: `pg`, `bigquery`), changing it recreates the data source",
                    ),
                },
                blocks: map! {
                    "options" => NestedBlock::Optional(Block {
                        attributes: map! {
                            "host" => option(AttributeType::String, "Database host"),
                            "port" => option(AttributeType::Number, "Database port"),
                            "user" => option(AttributeType::String, "Database user"),
                            "password" => sensitive(option(AttributeType::String, "Database password")),
                            "dbname" => option(AttributeType::String, "Database name"),
                            "sslmode" => option(AttributeType::String, "SSL mode of PostgreSQL connections"),
                            "project_id" => option(AttributeType::String, "Google Cloud project of BigQuery data sources"),
                            "json_key_file" => sensitive(option(AttributeType::String, "Base64 encoded service account key of BigQuery data sources")),
                            "extra" => option(
                                AttributeType::Map(AttributeType::String.into()),
                                "Other options of the query runner, passed verbatim",
                            ),
                        },
                        description: Description::plain("Connection options of the query runner"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("Redash data source"),
                ..Default::default()
            },
        }
    }
}

impl<'a> From<DataSource> for DataSourceLookupState<'a> {
    fn from(data_source: DataSource) -> Self {
        Self {
            id: string_value(data_source.id.to_string()),
            name: string_value(data_source.name),
            kind: string_value(data_source.kind),
            paused: Value::Value(data_source.paused),
        }
    }
}

impl<'a> DataSourceLookupState<'a> {
    pub fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Id of the data source"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Name of the data source"),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Computed, "Query runner of the data source"),
                    "paused" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "Query execution is paused"),
                },
                description: Description::plain("Lookup of a Redash data source"),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use serde_json::json;

    use super::*;

    fn pg_options<'a>() -> OptionsState<'a> {
        OptionsState {
            host: string_value("db.internal"),
            port: Value::Value(5432),
            password: string_value("hunter2"),
            dbname: string_value("warehouse"),
            extra: Value::Value(
                [(Cow::Borrowed("connect_timeout"), string_value("10"))]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn options_to_json() {
        assert_eq!(
            Json::Object(pg_options().to_json()),
            json!({
                "host": "db.internal",
                "port": 5432,
                "password": "hunter2",
                "dbname": "warehouse",
                "connect_timeout": "10",
            })
        );
    }

    #[test]
    fn every_string_option_has_its_own_field() {
        let mut options = OptionsState::default();
        for option in StringOption::ALL {
            *options.string_option_mut(option) = string_value(option.key());
        }
        assert_eq!(options.project_id, string_value("projectId"));
        assert_eq!(options.json_key_file, string_value("jsonKeyFile"));

        let json = options.to_json();
        assert_eq!(json.len(), StringOption::ALL.len());
        assert_eq!(OptionsState::from_json(&json, &OptionsState::default()), options);
    }

    #[test]
    fn masked_secrets_keep_prior() {
        let prior = DataSourceState {
            name: string_value("warehouse"),
            kind: string_value("pg"),
            options: Value::Value(pg_options()),
            ..Default::default()
        };
        let remote = DataSource {
            id: 3,
            name: "warehouse".to_owned(),
            kind: "pg".to_owned(),
            options: json!({
                "host": "db.internal",
                "port": "5432",
                "password": MASKED_SECRET,
                "dbname": "warehouse",
                "connect_timeout": 10,
                "sslrootcertFile": MASKED_SECRET,
            })
            .as_object()
            .cloned()
            .unwrap_or_default(),
            paused: false,
        };
        let state = DataSourceState::from_remote(remote, &prior);
        assert_eq!(state.id, string_value("3"));
        assert_eq!(state.options, prior.options);
    }

    #[test]
    fn empty_options_stay_null() {
        let remote = DataSource {
            id: 3,
            name: "results".to_owned(),
            kind: "results".to_owned(),
            ..Default::default()
        };
        let state = DataSourceState::from_remote(remote, &DataSourceState::default());
        assert!(state.options.is_null());
    }
}
