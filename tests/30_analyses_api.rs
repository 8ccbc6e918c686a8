mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use session_crud_api::analysis::{AnalysisError, TextAnalyzer};
use session_crud_api::auth::AuthGate;
use session_crud_api::AppState;

#[tokio::test]
async fn summary_analysis_is_stored() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/api/analyses"))
        .json(&json!({
            "inputText": "The app is fast. The UI is clean! Support was slow.",
            "operation": "summary"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert!(body["id"].is_i64(), "missing id: {}", body);
    assert_eq!(body["operation"], "summary");
    assert_eq!(body["result"], json!({"summary": "The app is fast. The UI is clean!"}));
    let created_at = body["createdAt"].as_str().expect("createdAt string");
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok(), "bad timestamp {}", created_at);

    let listed = server
        .client
        .get(server.url("/api/analyses"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(listed, vec![body]);
    Ok(())
}

#[tokio::test]
async fn classify_and_chat() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    for (text, operation, expected) in [
        ("There is a bug in checkout", "classify", json!({"label": "bug report"})),
        ("I am upset, I want a refund", "classify", json!({"label": "complaint"})),
    ] {
        let body = server
            .client
            .post(server.url("/api/analyses"))
            .json(&json!({"inputText": text, "operation": operation}))
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert_eq!(body["result"], expected, "for {:?}", text);
    }

    let chat = server
        .client
        .post(server.url("/api/analyses"))
        .json(&json!({"inputText": "hello?", "operation": "chat"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(chat["result"]["reply"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_400() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    for body in [
        json!({}),
        json!({"inputText": "some text"}),
        json!({"operation": "summary"}),
        json!({"inputText": "", "operation": "summary"}),
        json!({"inputText": null, "operation": "summary"}),
        json!({"inputText": 0, "operation": "summary"}),
    ] {
        let res = server.client.post(server.url("/api/analyses")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "for {}", body);
        assert_eq!(
            res.json::<Value>().await?,
            json!({"error": "inputText and operation are required"})
        );
    }
    Ok(())
}

#[tokio::test]
async fn analyzer_failures_are_500_and_not_stored() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    for body in [
        json!({"inputText": "   ", "operation": "summary"}),
        json!({"inputText": "text", "operation": "poetry"}),
        json!({"inputText": "text", "operation": "sentiment"}),
        json!({"inputText": 5, "operation": "summary"}),
        json!({"inputText": "text", "operation": 7}),
    ] {
        let res = server.client.post(server.url("/api/analyses")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "for {}", body);
        assert_eq!(res.json::<Value>().await?, json!({"error": "Failed to analyze text"}));
    }

    assert_eq!(server.state.analyses.len().await, 0);
    Ok(())
}

struct EchoAnalyzer;

impl TextAnalyzer for EchoAnalyzer {
    fn analyze(&self, text: &str, operation: &str) -> Result<Value, AnalysisError> {
        Ok(json!({"echo": text, "op": operation}))
    }
}

#[tokio::test]
async fn analyzer_is_pluggable() -> Result<()> {
    let config = common::test_config();
    let gate = AuthGate::new(&config);
    let state = AppState::with_gate(config, gate).with_analyzer(Arc::new(EchoAnalyzer));
    let server = common::TestServer::spawn_with(state).await?;

    let body = server
        .client
        .post(server.url("/api/analyses"))
        .json(&json!({"inputText": "hi", "operation": "sentiment"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["result"], json!({"echo": "hi", "op": "sentiment"}));
    Ok(())
}

#[tokio::test]
async fn analyses_update_and_delete() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let created = server
        .client
        .post(server.url("/api/analyses"))
        .json(&json!({"inputText": "Great work", "operation": "classify"}))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let path = format!("/api/analyses/{}", created["id"]);

    let res = server
        .client
        .put(server.url(&path))
        .json(&json!({"notes": "follow up"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["notes"], "follow up");
    assert_eq!(updated["result"], json!({"label": "praise"}));
    assert_eq!(updated["inputText"], "Great work");

    let res = server.client.put(server.url("/api/analyses/nope")).json(&json!({})).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let res = server.client.delete(server.url(&path)).send().await?;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
    assert!(server.state.analyses.is_empty().await);
    // Items are a separate collection
    assert!(server.state.items.is_empty().await);
    Ok(())
}
