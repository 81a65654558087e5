//! Клиентская библиотека для сервиса заметок.
//!
//! Состоит из:
//! - транспорта `NotesApi` и его HTTP-реализации (`reqwest`);
//! - контейнеров состояния `AuthState` и `NotesState` со статусом
//!   `Idle → Loading → Succeeded/Failed`;
//! - хранения токена в cookie `notes_access_token` (`session`);
//! - `AppContext`, который связывает всё это и восстанавливает сессию;
//! - `text_codec` для перевода свободного текста в заголовок и тело.
#![warn(missing_docs)]

mod api;
mod auth_state;
mod context;
mod error;
mod http_client;
mod models;
mod notes_state;
pub mod session;
pub mod text_codec;

#[cfg(test)]
mod testing;

pub use api::NotesApi;
pub use auth_state::AuthState;
pub use context::{AppContext, NotesView};
pub use error::{
    ApiError, ApiResult, AppError, AuthError, AuthOp, NotesError, NotesOp, SessionError,
};
pub use http_client::HttpClient;
pub use models::{Note, RequestStatus, TokenResponse, User};
pub use notes_state::NotesState;
pub use session::{CookieFileStore, MemoryTokenStore, TokenStore};
