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

//! Endpoints and payload shapes of the Redash entities

mod common;

use common::*;
use redash_client::{QueryRequest, Schedule, VisualizationRequest, WidgetRequest};
use wiremock::matchers::{body_json, method, path};

#[tokio::test]
async fn create_query_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/queries"))
        .and(body_json(json!({
            "name": "Daily users",
            "data_source_id": 1,
            "query": "SELECT 1",
            "description": null,
            "schedule": {"interval": 86400, "time": "03:00", "day_of_week": null, "until": null},
            "tags": ["kpi"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "name": "Daily users",
            "description": null,
            "query": "SELECT 1",
            "data_source_id": 1,
            "schedule": {"interval": 86400, "time": "03:00", "day_of_week": null, "until": null},
            "tags": ["kpi"],
            "is_draft": true,
            "is_archived": false,
            "visualizations": [{"id": 30, "type": "TABLE", "name": "Table", "options": {}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = client_for(&server)
        .create_query(&QueryRequest {
            name: "Daily users".to_owned(),
            data_source_id: 1,
            query: "SELECT 1".to_owned(),
            description: None,
            schedule: Some(Schedule {
                interval: Some(86400),
                time: Some("03:00".to_owned()),
                ..Default::default()
            }),
            tags: vec!["kpi".to_owned()],
            is_draft: None,
        })
        .await
        .unwrap();
    assert_eq!(query.id, 12);
    assert!(query.is_draft);
    assert_eq!(query.visualizations[0].kind, "TABLE");
}

#[tokio::test]
async fn visualization_is_found_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "name": "Daily users",
            "query": "SELECT 1",
            "data_source_id": 1,
            "visualizations": [
                {"id": 30, "type": "TABLE", "name": "Table", "options": {}},
                {"id": 31, "type": "CHART", "name": "Chart", "description": "users", "options": {"globalSeriesType": "line"}},
            ],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let visualization = client.get_visualization(12, 31).await.unwrap();
    assert_eq!(visualization.name, "Chart");
    assert_eq!(visualization.description.as_deref(), Some("users"));

    let err = client.get_visualization(12, 99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_visualization_sends_query_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/visualizations"))
        .and(body_json(json!({
            "query_id": 12,
            "type": "CHART",
            "name": "Chart",
            "description": null,
            "options": {"globalSeriesType": "line"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "type": "CHART", "name": "Chart", "options": {"globalSeriesType": "line"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let visualization = client_for(&server)
        .create_visualization(&VisualizationRequest {
            query_id: Some(12),
            kind: "CHART".to_owned(),
            name: "Chart".to_owned(),
            description: None,
            options: json!({"globalSeriesType": "line"}),
        })
        .await
        .unwrap();
    assert_eq!(visualization.id, 31);
}

#[tokio::test]
async fn widget_lifecycle_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "dashboard_id": 2, "visualization_id": null, "text": "# Title", "width": 1, "options": {},
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "slug": "kpis",
            "name": "KPIs",
            "widgets": [
                {"id": 5, "visualization": null, "text": "# Title", "width": 1, "options": {}},
                {"id": 6, "visualization": {"id": 31}, "text": "", "width": 1, "options": {}},
            ],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let widget = client
        .create_widget(&WidgetRequest {
            dashboard_id: 2,
            visualization_id: None,
            text: "# Title".to_owned(),
            width: 1,
            options: json!({}),
        })
        .await
        .unwrap();
    assert_eq!(widget.id, 5);

    let widget = client.get_widget(2, 6).await.unwrap();
    assert_eq!(widget.dashboard_id, Some(2));
    assert_eq!(widget.visualization_id(), Some(31));
}

#[tokio::test]
async fn group_data_source_attachment_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/groups/3/data_sources"))
        .and(body_json(json!({"data_source_id": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "pg"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/groups/3/data_sources/7"))
        .and(body_json(json!({"view_only": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "pg"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/groups/3/data_sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "pg", "type": "pg", "view_only": true},
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.add_group_data_source(3, 7).await.unwrap();
    client.set_group_data_source_view_only(3, 7, true).await.unwrap();
    let attached = client.get_group_data_source(3, 7).await.unwrap();
    assert!(attached.view_only);
    assert!(client.get_group_data_source(3, 8).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn disable_user_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/4/disable"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).disable_user(4).await.unwrap();
}
