#![cfg(feature = "http-transport")]

use futures_util::StreamExt;
use pprovider::{
    ChatRequest, ChatTransport, FinishReason, HttpChatTransport, Message, Options,
    ProviderErrorKind, Role,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer) -> HttpChatTransport {
    HttpChatTransport::new("sk-test").with_base_url(format!("{}/v1", server.uri()))
}

fn request() -> ChatRequest {
    ChatRequest::new(
        "gpt-3.5-turbo",
        vec![Message::system("be terse"), Message::user("1+1?")],
    )
    .with_options(Options::new().with_temperature(0.2))
}

#[tokio::test]
async fn complete_posts_history_and_decodes_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.2,
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
                "message": { "role": "assistant", "content": "2" },
                "finish_reason": "stop",
                "index": 0
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = transport_for(&server)
        .complete(request())
        .await
        .expect("completion should succeed");

    assert_eq!(response.usage.map(|usage| usage.total_tokens), Some(337));
    let choice = &response.choices[0];
    assert_eq!(choice.finish_reason, Some(FinishReason::Stop));
    let message = choice.message.as_ref().expect("message");
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, "2");
}

#[tokio::test]
async fn non_success_status_surfaces_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server);

    let error = transport
        .complete(request())
        .await
        .expect_err("401 must fail");
    assert_eq!(error.kind, ProviderErrorKind::RemoteApi);
    assert_eq!(
        error.message,
        "invalid_request_error: Incorrect API key provided"
    );

    let error = transport
        .stream(request().with_options(Options::new().with_stream(true)))
        .await
        .err()
        .expect("streaming 401 must fail before any chunk");
    assert_eq!(error.kind, ProviderErrorKind::RemoteApi);
}

#[tokio::test]
async fn non_success_status_without_error_body_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let error = transport_for(&server)
        .complete(request())
        .await
        .expect_err("502 must fail");

    assert_eq!(error.kind, ProviderErrorKind::Transport);
    assert!(error.message.contains("502"));
}

#[tokio::test]
async fn stream_decodes_newline_delimited_chunks() {
    let body = concat!(
        "{\"id\":\"chatcmpl-6ptKyqKOGXZT6iQnqiXAH8adNLUzD\",\"object\":\"chat.completion.chunk\",\"created\":1677825464,\"model\":\"gpt-3.5-turbo-0301\",\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"index\":0,\"finish_reason\":null}]}\n",
        "\n",
        "{\"id\":\"chatcmpl-6ptKyqKOGXZT6iQnqiXAH8adNLUzD\",\"object\":\"chat.completion.chunk\",\"created\":1677825464,\"model\":\"gpt-3.5-turbo-0301\",\"choices\":[{\"delta\":{\"content\":\"\\n\\n\"},\"index\":0,\"finish_reason\":null}]}\n",
        "\n",
        "{\"id\":\"chatcmpl-6ptKyqKOGXZT6iQnqiXAH8adNLUzD\",\"object\":\"chat.completion.chunk\",\"created\":1677825464,\"model\":\"gpt-3.5-turbo-0301\",\"choices\":[{\"delta\":{\"content\":\"2\"},\"index\":0,\"finish_reason\":null}]}\n",
        "\n",
        "{\"id\":\"chatcmpl-6ptKyqKOGXZT6iQnqiXAH8adNLUzD\",\"object\":\"chat.completion.chunk\",\"created\":1677825464,\"model\":\"gpt-3.5-turbo-0301\",\"choices\":[{\"delta\":{},\"index\":0,\"finish_reason\":\"stop\"}]}\n",
    );

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let stream = transport_for(&server)
        .stream(request().with_options(Options::new().with_stream(true)))
        .await
        .expect("stream should open");
    let chunks: Vec<_> = stream.collect().await;

    assert_eq!(chunks.len(), 4);
    let chunks: Vec<_> = chunks
        .into_iter()
        .map(|chunk| chunk.expect("chunk decodes"))
        .collect();
    assert_eq!(chunks[0].created.timestamp(), 1677825464);
    assert_eq!(
        chunks[2].choices[0]
            .delta
            .as_ref()
            .and_then(|delta| delta.content.as_deref()),
        Some("2")
    );
    assert_eq!(chunks[3].choices[0].finish_reason, Some(FinishReason::Stop));
}

#[test]
fn debug_output_redacts_api_key() {
    let transport = HttpChatTransport::new("sk-very-secret");
    let rendered = format!("{transport:?}");

    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("sk-very-secret"));
}
