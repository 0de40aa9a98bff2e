//! API client implementation

use crate::error::ClientError;
use mfe_core::types::{
    HealthResponse, Message, NewMessage, NewTodo, Origin, SuccessResponse, Todo, TodoPatch,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Base URL used when `MFE_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:3003";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Micro frontend API client. Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client with base URL from `MFE_API_BASE`
    /// (default [`DEFAULT_API_BASE`])
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if the variable is not a URL
    pub fn from_env() -> Result<Self, ClientError> {
        let base = std::env::var("MFE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(&base)
    }

    /// Create a client for the API at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` is not a URL
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` is not a URL
    pub fn with_http_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::ResponseParseFailed(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |b| b.error);
        tracing::debug!(status = status.as_u16(), %message, "API returned an error");
        Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    /// `GET /` health banner
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.client.get(self.url("/"))).await
    }

    /// `GET /todos`, oldest first
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn get_todos(&self) -> Result<Vec<Todo>, ClientError> {
        self.send(self.client.get(self.url("/todos"))).await
    }

    /// `POST /todos`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors (400 on blank text),
    /// or parsing failures
    pub async fn create_todo(&self, text: impl Into<String>) -> Result<Todo, ClientError> {
        let body = NewTodo::new(text);
        self.send(self.client.post(self.url("/todos")).json(&body))
            .await
    }

    /// `PATCH /todos/:id`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ApiError` with status 404 if the todo does not
    /// exist, or any other request error
    pub async fn update_todo(&self, id: i64, patch: TodoPatch) -> Result<Todo, ClientError> {
        self.send(
            self.client
                .patch(self.url(&format!("/todos/{id}")))
                .json(&patch),
        )
        .await
    }

    /// `DELETE /todos/:id`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ApiError` with status 404 if the todo does not
    /// exist, or any other request error
    pub async fn delete_todo(&self, id: i64) -> Result<SuccessResponse, ClientError> {
        self.send(self.client.delete(self.url(&format!("/todos/{id}"))))
            .await
    }

    /// `GET /messages`, oldest first
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn get_messages(&self) -> Result<Vec<Message>, ClientError> {
        self.send(self.client.get(self.url("/messages"))).await
    }

    /// `POST /messages`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn create_message(
        &self,
        text: impl Into<String>,
        from: Origin,
    ) -> Result<Message, ClientError> {
        let body = NewMessage::new(text, from);
        self.send(self.client.post(self.url("/messages")).json(&body))
            .await
    }

    /// `DELETE /messages`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn clear_messages(&self) -> Result<SuccessResponse, ClientError> {
        self.send(self.client.delete(self.url("/messages"))).await
    }
}
