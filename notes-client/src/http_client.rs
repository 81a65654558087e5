use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::api::NotesApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{Note, TokenResponse, User, notes_from_raw};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct LoginFormDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct NoteRequestDto<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API заметок.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт клиент с таймаутами по умолчанию (5 с на соединение, 15 с на запрос).
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeouts(base_url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Создаёт клиент с явными таймаутами.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(method = method.as_str(), url = url.as_str(), "sending request");

        let request = self.client.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "request rejected");
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn fetch_notes(&self, path: &str, token: &str) -> ApiResult<Vec<Note>> {
        let response = Self::send(self.request(Method::GET, path, Some(token))).await?;
        let raw: Value = Self::decode(response).await?;
        notes_from_raw(&raw)
    }

    async fn fetch_note(&self, request: RequestBuilder) -> ApiResult<Note> {
        let response = Self::send(request).await?;
        let raw: Value = Self::decode(response).await?;
        Ok(Note::from_raw(&raw))
    }
}

#[async_trait]
impl NotesApi for HttpClient {
    async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let form = LoginFormDto { username, password };
        let response = Self::send(self.request(Method::POST, "/token/", None).form(&form)).await?;
        Self::decode(response).await
    }

    async fn register(&self, username: &str, password: &str) -> ApiResult<()> {
        let payload = RegisterRequestDto { username, password };
        Self::send(self.request(Method::POST, "/user/", None).json(&payload)).await?;
        Ok(())
    }

    async fn fetch_me(&self, token: &str) -> ApiResult<User> {
        let response = Self::send(self.request(Method::GET, "/user/me", Some(token))).await?;
        Self::decode(response).await
    }

    async fn list_my_notes(&self, token: &str) -> ApiResult<Vec<Note>> {
        self.fetch_notes("/note/me", token).await
    }

    async fn list_all_notes(&self, token: &str) -> ApiResult<Vec<Note>> {
        self.fetch_notes("/note/", token).await
    }

    async fn get_note(&self, token: &str, id: i64) -> ApiResult<Note> {
        self.fetch_note(self.request(Method::GET, &format!("/note/{id}"), Some(token)))
            .await
    }

    async fn create_note(&self, token: &str, title: &str, text: &str) -> ApiResult<Note> {
        let payload = NoteRequestDto {
            title,
            description: text,
        };
        self.fetch_note(
            self.request(Method::POST, "/note/", Some(token))
                .json(&payload),
        )
        .await
    }

    async fn update_note(
        &self,
        token: &str,
        id: i64,
        title: &str,
        text: &str,
    ) -> ApiResult<Note> {
        let payload = NoteRequestDto {
            title,
            description: text,
        };
        self.fetch_note(
            self.request(Method::PUT, &format!("/note/{id}"), Some(token))
                .json(&payload),
        )
        .await
    }

    async fn delete_note(&self, token: &str, id: i64) -> ApiResult<()> {
        Self::send(self.request(Method::DELETE, &format!("/note/{id}"), Some(token))).await?;
        Ok(())
    }
}
