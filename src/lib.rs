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

//! Terraform provider for Redash
//!
//! Manages data sources, users, groups, queries, visualizations, dashboards and widgets
//! of a Redash instance through its REST API.
//! The provider is configured with an API key and the URI of the instance,
//! falling back to the `REDASH_API_KEY` and `REDASH_HOST` environment variables.

mod connection;
mod provider;
mod utils;

pub mod dashboard;
pub mod data_source;
pub mod group;
pub mod group_data_source_attachment;
pub mod query;
pub mod user;
pub mod visualization;
pub mod widget;

#[cfg(test)]
mod testing;

pub use connection::RedashConnection;
pub use provider::{ProviderConfig, RedashProvider, API_KEY_ENV, REDASH_HOST_ENV};
