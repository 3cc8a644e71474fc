//! HTTP façade over [`ChatService`], mounted under `/openai/v1`.
//!
//! Every non-streaming reply uses the envelope
//! `{"status": "success" | "failure", "msg": ..., "data": ...}`. Client errors
//! (bad JSON, malformed ids, invalid patches) answer 400; every other failure
//! answers 422. A streaming ask answers 200 with a `text/plain` body once the
//! remote side accepted the request; a later failure aborts the body.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use pchat::{ChatError, ChatService, FragmentStream, SessionPatch};
use pcommon::SessionId;
use pprovider::Options;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const API_PREFIX: &str = "/openai/v1";

#[derive(Clone)]
pub struct AppState {
    chat: ChatService,
}

pub fn build_router(chat: ChatService) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/chats", post(create_chat))
        .route("/chats/:id", get(get_chat).patch(update_chat))
        .route("/chats/:id/ask", post(ask))
        .with_state(AppState { chat });

    Router::new().nest(API_PREFIX, api)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub status: ResultStatus,
    pub msg: String,
    pub data: T,
}

fn success<T: Serialize>(msg: &str, data: T) -> Response {
    Json(ApiResult {
        status: ResultStatus::Success,
        msg: msg.to_string(),
        data,
    })
    .into_response()
}

/// A failed request, rendered as a `failure` envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ChatError> for ApiFailure {
    fn from(error: ChatError) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        Self {
            status,
            message: error.message,
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ApiResult {
            status: ResultStatus::Failure,
            msg: self.message,
            data: (),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskQuery {
    #[serde(default)]
    pub stream: Option<String>,
}

/// Accepts the usual boolean spellings; anything else counts as `false`.
pub fn parse_stream_flag(value: Option<&str>) -> bool {
    matches!(
        value,
        Some("1" | "t" | "T" | "true" | "TRUE" | "True")
    )
}

fn parse_id(raw: &str) -> Result<SessionId, ApiFailure> {
    SessionId::parse(raw).map_err(|error| ApiFailure::from(ChatError::from(error)))
}

async fn health() -> Response {
    success(
        "service healthy",
        serde_json::json!({
            "service": "parley",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

async fn create_chat(
    State(state): State<AppState>,
    payload: Result<Json<CreateChatRequest>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let Json(request) = payload?;

    let options = request
        .options
        .as_ref()
        .map(Options::from_json)
        .transpose()
        .map_err(ChatError::from)?;

    let session = state
        .chat
        .create_session(&request.model, &request.prompt, options)
        .await?;

    Ok(success("chat created", session.id))
}

async fn update_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SessionPatch>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;

    state.chat.update_session(&id, &patch).await?;
    Ok(success("chat updated", ()))
}

async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiFailure> {
    let id = parse_id(&id)?;
    let session = state.chat.find_session(&id).await?;
    Ok(success("chat found", session))
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AskQuery>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;

    if !parse_stream_flag(query.stream.as_deref()) {
        let answer = state.chat.ask(&id, &request.content).await?;
        return Ok(success("chat answered", answer));
    }

    let fragments = state.chat.ask_stream(&id, &request.content).await?;
    Ok(stream_response(fragments))
}

/// Dropping the body (client gone) drops `fragments`, which cancels the turn.
fn stream_response(fragments: FragmentStream) -> Response {
    let session_id = *fragments.session_id();
    let body = fragments.map(move |item| {
        item.inspect_err(|error| {
            tracing::error!(
                session_id = %session_id,
                action = "ask_stream",
                error = %error,
                "stream aborted after response was committed"
            );
        })
    });

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_flag_accepts_boolean_spellings() {
        for value in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(parse_stream_flag(Some(value)), "{value}");
        }
        for value in ["0", "false", "no", "", "yes"] {
            assert!(!parse_stream_flag(Some(value)), "{value}");
        }
        assert!(!parse_stream_flag(None));
    }

    #[test]
    fn chat_errors_map_to_status_codes() {
        let cases = [
            (ChatError::validation("bad id"), StatusCode::BAD_REQUEST),
            (ChatError::merge("bad options"), StatusCode::BAD_REQUEST),
            (ChatError::not_found("chat not found"), StatusCode::UNPROCESSABLE_ENTITY),
            (ChatError::remote_api("t: m"), StatusCode::UNPROCESSABLE_ENTITY),
            (ChatError::protocol("empty choices"), StatusCode::UNPROCESSABLE_ENTITY),
            (ChatError::transport("reset"), StatusCode::UNPROCESSABLE_ENTITY),
            (ChatError::store("closed"), StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiFailure::from(error).status(), expected);
        }
    }

    #[test]
    fn failure_envelope_carries_bare_message() {
        let failure = ApiFailure::from(ChatError::remote_api("invalid_request_error: bad model"));
        let body = serde_json::to_value(ApiResult {
            status: ResultStatus::Failure,
            msg: failure.message.clone(),
            data: (),
        })
        .expect("serializable");

        assert_eq!(
            body,
            serde_json::json!({
                "status": "failure",
                "msg": "invalid_request_error: bad model",
                "data": null,
            })
        );
    }
}
