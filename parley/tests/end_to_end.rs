#![cfg(feature = "http-transport")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parley::{Config, SessionStoreConfig, build_router, build_runtime, build_runtime_with};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::from_yaml("api_key: sk-test\nrequest_timeout_secs: 5\n")
        .expect("config should parse");
    config.base_url = format!("{}/v1", server.uri());
    config
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request should build"),
        )
        .await
        .expect("router should respond")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be json")
}

#[tokio::test]
async fn sync_turn_round_trips_through_remote_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                { "role": "system", "content": "be terse" },
                { "role": "user", "content": "1+1?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-6ptKqrhgRoVchm58Bby0UvJzq2ZuQ",
            "object": "chat.completion",
            "created": 1677825456,
            "model": "gpt-3.5-turbo-0301",
            "usage": { "prompt_tokens": 36, "completion_tokens": 301, "total_tokens": 337 },
            "choices": [{
                "message": { "role": "assistant", "content": "\n\n2" },
                "finish_reason": "stop",
                "index": 0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = build_runtime(&config_for(&server)).expect("runtime should build");
    let app = build_router(runtime.chat.clone());

    let created = json_body(
        call(
            &app,
            "POST",
            "/openai/v1/chats",
            json!({"model": "gpt-3.5-turbo", "prompt": "be terse"}),
        )
        .await,
    )
    .await;
    let id = created["data"].as_str().expect("id").to_string();

    let answered = call(
        &app,
        "POST",
        &format!("/openai/v1/chats/{id}/ask"),
        json!({"content": "1+1?"}),
    )
    .await;
    assert_eq!(answered.status(), StatusCode::OK);
    assert_eq!(json_body(answered).await["data"], "\n\n2");
}

#[tokio::test]
async fn streaming_turn_decodes_newline_delimited_body() {
    let server = MockServer::start().await;
    let body = [
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1677825464,"model":"gpt-3.5-turbo-0301","choices":[{"delta":{"role":"assistant"},"index":0,"finish_reason":null}]}"#,
        "",
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1677825464,"model":"gpt-3.5-turbo-0301","choices":[{"delta":{"content":"\n\n"},"index":0,"finish_reason":null}]}"#,
        "",
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1677825464,"model":"gpt-3.5-turbo-0301","choices":[{"delta":{"content":"2"},"index":0,"finish_reason":null}]}"#,
        "",
        r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","created":1677825464,"model":"gpt-3.5-turbo-0301","choices":[{"delta":{},"index":0,"finish_reason":"stop"}]}"#,
        "",
    ]
    .join("\n");
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = build_runtime(&config_for(&server)).expect("runtime should build");
    let app = build_router(runtime.chat.clone());

    let created =
        json_body(call(&app, "POST", "/openai/v1/chats", json!({"model": "gpt-3.5-turbo"})).await)
            .await;
    let id = created["data"].as_str().expect("id").to_string();

    let streamed = call(
        &app,
        "POST",
        &format!("/openai/v1/chats/{id}/ask?stream=true"),
        json!({"content": "1+1?"}),
    )
    .await;
    assert_eq!(streamed.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(streamed.into_body(), usize::MAX)
        .await
        .expect("stream should end cleanly");
    assert_eq!(&bytes[..], b"\n\n");

    let session_id = parley::SessionId::parse(&id).expect("valid id");
    let stored = runtime.store.find(&session_id).await.expect("stored");
    assert_eq!(
        stored.messages().last().map(|message| message.content.as_str()),
        Some("\n\n2")
    );
}

#[tokio::test]
async fn remote_rejection_is_reported_as_failure_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "message": "The model `gpt-9` does not exist",
                "type": "invalid_request_error",
                "param": null,
                "code": "model_not_found"
            }
        })))
        .mount(&server)
        .await;

    let runtime = build_runtime(&config_for(&server)).expect("runtime should build");
    let app = build_router(runtime.chat.clone());
    let created =
        json_body(call(&app, "POST", "/openai/v1/chats", json!({"model": "gpt-9"})).await).await;
    let id = created["data"].as_str().expect("id").to_string();

    let response = call(
        &app,
        "POST",
        &format!("/openai/v1/chats/{id}/ask"),
        json!({"content": "hello"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["status"], "failure");
    assert_eq!(
        body["msg"],
        "invalid_request_error: The model `gpt-9` does not exist"
    );
}

#[tokio::test]
async fn sqlite_backed_runtime_keeps_sessions_across_rebuilds() {
    let unique = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let db = std::env::temp_dir()
        .join(format!("parley-e2e-{unique}"))
        .join("sessions.sqlite3");
    let server = MockServer::start().await;
    let config = config_for(&server);

    let id = {
        let runtime = build_runtime_with(
            std::sync::Arc::new(
                parley::HttpChatTransport::new(&config.api_key).with_base_url(&config.base_url),
            ),
            SessionStoreConfig::Sqlite { path: db.clone() },
        )
        .expect("runtime should build");
        let session = runtime
            .chat
            .create_session("gpt-3.5-turbo", "remember me", None)
            .await
            .expect("session should be created");
        runtime.store.close().await.expect("store should close");
        session.id
    };

    let reopened = build_runtime_with(
        std::sync::Arc::new(parley::HttpChatTransport::new(&config.api_key)),
        SessionStoreConfig::Sqlite { path: db.clone() },
    )
    .expect("runtime should reopen");
    let session = reopened.chat.find_session(&id).await.expect("session");
    assert_eq!(session.messages()[0].content, "remember me");

    if let Some(dir) = db.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}
