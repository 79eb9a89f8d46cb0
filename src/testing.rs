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

//! Helpers shared by the resource tests

use std::time::Duration;

use redash_client::{Client, Config};
use tf_provider::Diagnostics;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::connection::RedashConnection;

pub(crate) fn connection_for(server: &MockServer) -> RedashConnection {
    let config =
        Config::new(server.uri(), "test-api-key").with_retries(0, Duration::from_millis(1));
    RedashConnection::new(Client::new(config).expect("mock server uri is valid"))
}

/// Answer `verb path` with a JSON body
pub(crate) async fn respond(
    server: &MockServer,
    verb: &str,
    endpoint: &str,
    body: serde_json::Value,
) {
    Mock::given(method(verb))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub(crate) fn assert_no_errors(diags: &Diagnostics) {
    assert!(diags.errors.is_empty(), "unexpected errors: {:?}", diags.errors);
}
