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

//! Transport behavior: authentication, error mapping, retries and pagination

mod common;

use common::*;
use wiremock::matchers::{header, method, path, query_param};

#[tokio::test]
async fn sends_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/groups/3"))
        .and(header("Authorization", "Key test-api-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 3, "name": "admins", "type": "builtin"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let group = client_for(&server).get_group(3).await.unwrap();
    assert_eq!(group.name, "admins");
    assert_eq!(group.kind, "builtin");
}

#[tokio::test]
async fn not_found_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_query(42).await.unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[tokio::test]
async fn api_error_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/groups"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Group name is taken"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_group(&redash_client::GroupRequest {
            name: "admins".to_owned(),
        })
        .await
        .unwrap_err();
    match err {
        RedashError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Group name is taken");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data_sources/1"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/data_sources/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "warehouse",
            "type": "pg",
            "options": {"host": "db", "port": 5432, "password": "--------"},
        })))
        .mount(&server)
        .await;

    let data_source = client_for(&server).get_data_source(1).await.unwrap();
    assert_eq!(data_source.kind, "pg");
    assert_eq!(data_source.options["port"], json!(5432));
}

#[tokio::test]
async fn paused_is_decoded_from_counts() {
    let server = MockServer::start().await;
    for (id, paused) in [(1, 0), (2, 1)] {
        Mock::given(method("GET"))
            .and(path(format!("/api/data_sources/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": "warehouse",
                "type": "pg",
                "options": {},
                "paused": paused,
            })))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    assert!(!client.get_data_source(1).await.unwrap().paused);
    assert!(client.get_data_source(2).await.unwrap().paused);
}

#[tokio::test]
async fn retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/groups/1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).get_group(1).await.unwrap_err();
    assert!(matches!(err, RedashError::MaxRetriesExceeded(3)), "{err}");
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/widgets/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).delete_widget(9).await.unwrap_err();
    assert!(matches!(err, RedashError::Api { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn users_are_paginated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("q", "piedpiper"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "page": 1,
            "page_size": 250,
            "results": [
                {"id": 1, "name": "Richard", "email": "richard@piedpiper.com", "groups": [{"id": 1}]},
                {"id": 2, "name": "Jared", "email": "jared@piedpiper.com", "groups": [{"id": 1}]},
            ],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("q", "piedpiper"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "page": 2,
            "page_size": 250,
            "results": [
                {"id": 3, "name": "Dinesh", "email": "dinesh@piedpiper.com", "groups": [{"id": 2}]},
            ],
        })))
        .mount(&server)
        .await;

    let users = client_for(&server)
        .list_users(Some("piedpiper"))
        .await
        .unwrap();
    let ids: Vec<i64> = users.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(users[2].groups, vec![2]);
}
