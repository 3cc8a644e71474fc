//! reqwest-based transport for the remote chat-completion API.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};

use crate::{
    ChatRequest, ChatResponse, ChatTransport, ChunkStream, DEFAULT_BASE_URL, ProviderError,
    ProviderFuture, decode_chunk_lines,
};

#[derive(Clone)]
pub struct HttpChatTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpChatTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Builds a client whose requests (body reads included) give up after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ProviderError::transport(format!("failed to build http client: {error}")))?;
        Ok(Self::with_client(client, api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: &ChatRequest) -> Result<Response, ProviderError> {
        if request.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(ChatResponse {
            error: Some(api_error),
            ..
        }) = serde_json::from_str::<ChatResponse>(&body)
        {
            return ProviderError::remote_api(api_error);
        }

        let message = format!("chat completion request failed with status {status}");
        match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            _ => ProviderError::transport(message),
        }
    }
}

impl Debug for HttpChatTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ChatTransport for HttpChatTransport {
    fn complete<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move {
            let response = self.send(&request).await?;
            let body = response.text().await?;
            let parsed: ChatResponse = serde_json::from_str(&body).map_err(|error| {
                ProviderError::protocol(format!("failed to decode chat completion: {error}"))
            })?;

            parsed.into_result()
        })
    }

    fn stream<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream, ProviderError>> {
        Box::pin(async move {
            let response = self.send(&request).await?;
            let body = response
                .bytes_stream()
                .map(|item| item.map_err(ProviderError::from));

            Ok(decode_chunk_lines(body))
        })
    }
}
