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

//! Client for the Redash REST API
//!
//! All calls are authenticated with a user API key (`Authorization: Key ...`).
//! Rate limiting and gateway errors are retried with exponential backoff,
//! every other error is returned as a [`RedashError`].

mod client;
mod dashboards;
mod data_sources;
mod error;
mod groups;
mod queries;
mod users;
mod visualizations;
mod widgets;

pub use client::{Client, Config, Page};
pub use dashboards::{Dashboard, DashboardUpdate};
pub use data_sources::{DataSource, DataSourceRequest, MASKED_SECRET};
pub use error::{RedashError, Result};
pub use groups::{Group, GroupDataSource, GroupRequest};
pub use queries::{Query, QueryRequest, Schedule};
pub use users::{User, UserRequest};
pub use visualizations::{Visualization, VisualizationRequest};
pub use widgets::{VisualizationRef, Widget, WidgetRequest, WidgetUpdate};
