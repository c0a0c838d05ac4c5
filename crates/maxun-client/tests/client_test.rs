//! Integration tests for the robot API client against a mock backend.

use maxun_client::{Client, ExecutionOptions, ScheduleConfig, WebhookConfig};
use maxun_core::{ClientConfig, MaxunError, RobotType, RunStatus, TimeUnit};
use maxun_workflow::WorkflowBuilder;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new("test-key").with_base_url(server.uri())).unwrap()
}

fn robot_json(id: &str, webhooks: Value) -> Value {
    json!({
        "id": "7c1d",
        "recording_meta": {"name": "Books", "id": id, "robotType": "extract"},
        "recording": {"meta": {"name": "Books", "id": id}, "workflow": []},
        "schedule": null,
        "webhooks": webhooks
    })
}

#[tokio::test]
async fn test_get_robots_sends_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots"))
        .and(header("x-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [robot_json("robot_1", Value::Null)]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let robots = client_for(&server).get_robots().await.unwrap();
    assert_eq!(robots.len(), 1);
    assert_eq!(robots[0].robot_id(), "robot_1");
}

#[tokio::test]
async fn test_get_robots_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(client_for(&server).get_robots().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_robot_without_data_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_robot("robot_x").await.unwrap_err();
    assert!(matches!(err, MaxunError::NotFound(_)));
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "Robot robot_x not found");
}

#[tokio::test]
async fn test_error_status_uses_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "Invalid API key"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_3"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.get_robot("robot_1").await.unwrap_err();
    assert_eq!(err.name(), "ApiError");
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(err.to_string(), "Invalid API key");
    assert_eq!(err.details(), Some(&json!({"error": "Invalid API key"})));

    let err = client.get_robot("robot_2").await.unwrap_err();
    assert_eq!(err.to_string(), "boom");

    let err = client.get_robot("robot_3").await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.to_string(), "API request failed");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = Client::new(ClientConfig::new("k").with_base_url("http://127.0.0.1:1")).unwrap();
    let err = client.get_robots().await.unwrap_err();
    assert!(matches!(err, MaxunError::Transport { .. }));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_execute_timeout_has_no_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robots/robot_1/execute"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({"data": {"status": "success", "runId": "r1", "data": {}}})),
        )
        .mount(&server)
        .await;

    let options = ExecutionOptions::new().with_timeout(Duration::from_millis(50));
    let err = client_for(&server)
        .execute_robot("robot_1", &options)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_execute_sends_params_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robots/robot_1/execute"))
        .and(body_json(json!({"params": {"page": 2}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "status": "success",
                "runId": "run_9",
                "data": {"textData": {"title": "Hello"}, "listData": [{"a": 1}, {"a": 2}]},
                "screenshots": []
            }
        })))
        .mount(&server)
        .await;

    let options = ExecutionOptions::new().with_param("page", json!(2));
    let result = client_for(&server)
        .execute_robot("robot_1", &options)
        .await
        .unwrap();
    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.run_id, "run_9");
    assert_eq!(result.data.list_items().len(), 2);
    assert_eq!(result.data.text_fields().unwrap()["title"], "Hello");
}

#[tokio::test]
async fn test_create_robot_mirrors_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robots"))
        .and(body_partial_json(json!({
            "meta": {"name": "Books", "robotType": "extract", "type": "extract"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": robot_json("robot_1", Value::Null)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = WorkflowBuilder::new("Books", RobotType::Extract)
        .navigate("https://books.toscrape.com")
        .capture_text([("title", "h1")], None)
        .into_workflow_file();
    let robot = client_for(&server).create_robot(&file).await.unwrap();
    assert_eq!(robot.robot_id(), "robot_1");
}

#[tokio::test]
async fn test_create_without_data_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let file = WorkflowBuilder::new("Books", RobotType::Extract).into_workflow_file();
    let err = client_for(&server).create_robot(&file).await.unwrap_err();
    assert_eq!(err.name(), "OperationFailedError");
    assert_eq!(err.to_string(), "Failed to create robot");
}

#[tokio::test]
async fn test_get_run_without_data_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots/robot_1/runs/run_7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_run("robot_1", "run_7")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Run run_7 not found");
}

#[tokio::test]
async fn test_invalid_schedule_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .schedule_robot("robot_1", &ScheduleConfig::new(0, TimeUnit::Hours, "UTC"))
        .await
        .unwrap_err();
    assert!(matches!(err, MaxunError::Validation(_)));
}

#[tokio::test]
async fn test_unschedule_sends_null() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/robots/robot_1"))
        .and(body_json(json!({"schedule": null})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": robot_json("robot_1", Value::Null)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let robot = client_for(&server).unschedule_robot("robot_1").await.unwrap();
    assert!(robot.schedule.is_none());
}

#[tokio::test]
async fn test_add_webhook_appends_to_existing() {
    let server = MockServer::start().await;
    let existing = json!([{"id": "webhook_1", "url": "https://old.example/hook", "events": ["run.failed"]}]);
    Mock::given(method("GET"))
        .and(path("/robots/robot_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": robot_json("robot_1", existing.clone())})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/robots/robot_1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": robot_json("robot_1", existing)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .add_webhook("robot_1", &WebhookConfig::new("https://new.example/hook"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    let webhooks = body["webhooks"].as_array().unwrap();
    assert_eq!(webhooks.len(), 2);
    assert_eq!(webhooks[0]["id"], "webhook_1");
    assert_eq!(webhooks[1]["url"], "https://new.example/hook");
    assert_eq!(webhooks[1]["events"], json!(["run.completed", "run.failed"]));
    assert_eq!(webhooks[1]["active"], true);
    assert!(webhooks[1]["id"].as_str().unwrap().starts_with("webhook_"));
}

#[tokio::test]
async fn test_add_webhook_keeps_server_fields_of_existing() {
    let server = MockServer::start().await;
    let existing = json!({
        "id": "webhook_1",
        "url": "https://old.example/hook",
        "events": ["run.completed"],
        "active": false,
        "createdAt": "2025-05-01T10:00:00.000Z",
        "lastCalledAt": "2025-05-02T08:30:00.000Z",
        "retryAttempts": 5,
        "timeout": 10000
    });
    Mock::given(method("GET"))
        .and(path("/robots/robot_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": robot_json("robot_1", json!([existing.clone()]))}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/robots/robot_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": robot_json("robot_1", json!([existing.clone()]))}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let robot = client_for(&server)
        .add_webhook("robot_1", &WebhookConfig::new("https://new.example/hook"))
        .await
        .unwrap();
    let kept = &robot.webhooks.unwrap()[0];
    assert_eq!(kept.extra["retryAttempts"], 5);

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body["webhooks"][0], existing);
    assert!(body["webhooks"][1].get("retryAttempts").is_none());
}

#[tokio::test]
async fn test_extract_with_llm_returns_robot_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract/llm"))
        .and(body_partial_json(json!({"url": "https://a.example", "prompt": "titles"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"robotId": "robot_llm"}})),
        )
        .mount(&server)
        .await;

    let id = client_for(&server)
        .extract_with_llm(
            "https://a.example",
            &maxun_client::LlmExtractOptions::new("titles"),
        )
        .await
        .unwrap();
    assert_eq!(id, "robot_llm");
}
