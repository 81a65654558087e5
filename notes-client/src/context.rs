use tracing::{info, warn};

use crate::api::NotesApi;
use crate::auth_state::AuthState;
use crate::error::AppError;
use crate::notes_state::NotesState;
use crate::session::TokenStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Какой список заметок показывать.
pub enum NotesView {
    /// Только свои заметки.
    #[default]
    Mine,
    /// Заметки всех пользователей (только для администратора).
    All,
}

/// Контекст приложения: транспорт, хранилище токена и оба контейнера состояния.
///
/// Создаётся явно и передаётся по ссылке; глобального состояния нет.
pub struct AppContext<A, S> {
    api: A,
    store: S,
    auth: AuthState,
    notes: NotesState,
}

impl<A, S> AppContext<A, S>
where
    A: NotesApi,
    S: TokenStore,
{
    /// Создаёт контекст с пустыми состояниями.
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            auth: AuthState::new(),
            notes: NotesState::new(),
        }
    }

    /// Состояние авторизации.
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Состояние заметок.
    pub fn notes(&self) -> &NotesState {
        &self.notes
    }

    /// Хранилище токена.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Восстанавливает сессию при старте.
    ///
    /// Берёт токен из хранилища, если в состоянии его нет, и загружает
    /// пользователя. Недействительный токен удаляется и из хранилища.
    pub async fn bootstrap(&mut self) -> Result<(), AppError> {
        if !self.auth.is_authenticated() {
            if let Some(token) = self.store.get()? {
                info!("restored session token");
                self.auth.set_token(token);
            }
        }

        if self.auth.is_authenticated() && self.auth.user().is_none() {
            if let Err(err) = self.auth.fetch_me(&self.api).await {
                warn!(error = %err, "stored session is no longer valid");
                self.store.clear()?;
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Вход: получает токен, сохраняет его и загружает пользователя.
    ///
    /// Если пользователя загрузить не удалось, сохранённый токен удаляется.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), AppError> {
        self.auth.login(&self.api, username, password).await?;
        if let Some(token) = self.auth.access_token() {
            self.store.set(token)?;
        }
        if let Err(err) = self.auth.fetch_me(&self.api).await {
            warn!(error = %err, "token from login was rejected");
            self.store.clear()?;
            return Err(err.into());
        }
        Ok(())
    }

    /// Регистрация без входа.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<(), AppError> {
        self.auth.register(&self.api, username, password).await?;
        Ok(())
    }

    /// Выход: сбрасывает авторизацию и удаляет сохранённый токен.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.auth.logout();
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }

    /// Загружает список заметок.
    ///
    /// `NotesView::All` доступен только администратору; для остальных
    /// загружаются свои заметки.
    pub async fn list_notes(&mut self, view: NotesView) -> Result<NotesView, AppError> {
        let token = self.auth.access_token().ok_or(AppError::NotAuthenticated)?;

        let view = match view {
            NotesView::All if !self.auth.is_admin() => {
                warn!("all-notes view requires an admin, showing own notes");
                NotesView::Mine
            }
            view => view,
        };

        match view {
            NotesView::Mine => self.notes.list_mine(&self.api, token).await?,
            NotesView::All => self.notes.list_all(&self.api, token).await?,
        }
        Ok(view)
    }

    /// Открывает заметку по id.
    pub async fn open_note(&mut self, id: i64) -> Result<(), AppError> {
        let token = self.auth.access_token().ok_or(AppError::NotAuthenticated)?;
        self.notes.get_by_id(&self.api, token, id).await?;
        Ok(())
    }

    /// Закрывает открытую заметку.
    pub fn close_note(&mut self) {
        self.notes.clear_selected();
    }

    /// Создаёт заметку.
    pub async fn create_note(&mut self, title: &str, text: &str) -> Result<(), AppError> {
        let token = self.auth.access_token().ok_or(AppError::NotAuthenticated)?;
        self.notes.create(&self.api, token, title, text).await?;
        Ok(())
    }

    /// Обновляет заметку.
    pub async fn update_note(&mut self, id: i64, title: &str, text: &str) -> Result<(), AppError> {
        let token = self.auth.access_token().ok_or(AppError::NotAuthenticated)?;
        self.notes.update(&self.api, token, id, title, text).await?;
        Ok(())
    }

    /// Удаляет заметку.
    pub async fn delete_note(&mut self, id: i64) -> Result<(), AppError> {
        let token = self.auth.access_token().ok_or(AppError::NotAuthenticated)?;
        self.notes.delete(&self.api, token, id).await?;
        Ok(())
    }
}
