use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{Note, TokenResponse, User};

/// Транспорт к API заметок: один метод на эндпоинт.
///
/// Не-2xx ответ возвращается как `ApiError::Status`. Заметки в ответах уже
/// нормализованы (`Note::from_raw`).
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// `POST /token/`, form: `username`, `password`.
    async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse>;
    /// `POST /user/`, JSON: `{username, password}`.
    async fn register(&self, username: &str, password: &str) -> ApiResult<()>;
    /// `GET /user/me`.
    async fn fetch_me(&self, token: &str) -> ApiResult<User>;
    /// `GET /note/me`.
    async fn list_my_notes(&self, token: &str) -> ApiResult<Vec<Note>>;
    /// `GET /note/`.
    async fn list_all_notes(&self, token: &str) -> ApiResult<Vec<Note>>;
    /// `GET /note/{id}`.
    async fn get_note(&self, token: &str, id: i64) -> ApiResult<Note>;
    /// `POST /note/`, JSON: `{title, description}`.
    async fn create_note(&self, token: &str, title: &str, text: &str) -> ApiResult<Note>;
    /// `PUT /note/{id}`, JSON: `{title, description}`.
    async fn update_note(&self, token: &str, id: i64, title: &str, text: &str)
    -> ApiResult<Note>;
    /// `DELETE /note/{id}`.
    async fn delete_note(&self, token: &str, id: i64) -> ApiResult<()>;
}
