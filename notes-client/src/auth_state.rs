use tracing::{debug, info, warn};

use crate::api::NotesApi;
use crate::error::{AuthError, AuthOp};
use crate::models::{RequestStatus, User};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Состояние авторизации: пользователь, токен и статус последнего запроса.
///
/// Меняется только через методы ниже. Каждая асинхронная операция переводит
/// статус в `Loading` и сбрасывает ошибку, затем в `Succeeded` или `Failed`.
pub struct AuthState {
    user: Option<User>,
    access_token: Option<String>,
    status: RequestStatus,
    error: Option<String>,
}

impl AuthState {
    /// Пустое состояние: ни пользователя, ни токена, статус `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Загруженный пользователь.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Текущий bearer-токен.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Статус последней операции.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Сообщение последней ошибки.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Есть ли токен.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Загружен ли пользователь-администратор.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Получает токен по логину и паролю.
    ///
    /// При отказе сервера прежние `user` и токен не трогаются.
    pub async fn login<A>(
        &mut self,
        api: &A,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(AuthOp::Login);
        match api.login(username, password).await {
            Ok(token) => {
                self.access_token = Some(token.access_token);
                self.succeed();
                info!(username, "logged in");
                Ok(())
            }
            Err(err) => Err(self.fail(AuthError::from_api(AuthOp::Login, err))),
        }
    }

    /// Загружает текущего пользователя по токену.
    ///
    /// Любая ошибка считается недействительной сессией: `user` и токен
    /// очищаются. Без токена запрос не отправляется.
    pub async fn fetch_me<A>(&mut self, api: &A) -> Result<(), AuthError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(AuthOp::FetchMe);

        let result = match self.access_token.as_deref() {
            Some(token) => api
                .fetch_me(token)
                .await
                .map_err(|err| AuthError::from_api(AuthOp::FetchMe, err)),
            None => Err(AuthError::NoToken),
        };

        match result {
            Ok(user) => {
                self.user = Some(user);
                self.succeed();
                Ok(())
            }
            Err(err) => {
                self.user = None;
                self.access_token = None;
                info!("session invalidated");
                Err(self.fail(err))
            }
        }
    }

    /// Регистрирует пользователя. Вход не выполняется.
    pub async fn register<A>(
        &mut self,
        api: &A,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(AuthOp::Register);
        match api.register(username, password).await {
            Ok(()) => {
                self.succeed();
                Ok(())
            }
            Err(err) => Err(self.fail(AuthError::from_api(AuthOp::Register, err))),
        }
    }

    /// Перезаписывает токен (восстановление сохранённой сессии).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Сбрасывает состояние целиком.
    pub fn logout(&mut self) {
        *self = Self::default();
    }

    fn begin(&mut self, op: AuthOp) {
        debug!(?op, "auth request started");
        self.status = RequestStatus::Loading;
        self.error = None;
    }

    fn succeed(&mut self) {
        self.status = RequestStatus::Succeeded;
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        warn!(error = %err, "auth request failed");
        self.status = RequestStatus::Failed;
        self.error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, Reply, token, user};

    #[test]
    fn initial_state_is_idle_and_empty() {
        let state = AuthState::new();
        assert_eq!(state.user(), None);
        assert_eq!(state.access_token(), None);
        assert_eq!(state.status(), RequestStatus::Idle);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut state = AuthState {
            status: RequestStatus::Failed,
            error: Some("old".to_string()),
            ..AuthState::default()
        };
        state.begin(AuthOp::Login);
        assert_eq!(state.status(), RequestStatus::Loading);
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn login_stores_token_and_keeps_user() {
        let api = FakeApi::new();
        FakeApi::set(&api.login, Reply::Ok(token("tok")));

        let mut state = AuthState {
            user: Some(user(1, "old", None)),
            ..AuthState::default()
        };
        state
            .login(&api, "alice", "secret")
            .await
            .expect("login must succeed");

        assert_eq!(state.status(), RequestStatus::Succeeded);
        assert_eq!(state.access_token(), Some("tok"));
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("old"));
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn login_rejection_keeps_previous_session() {
        let api = FakeApi::new();
        FakeApi::set(&api.login, Reply::Status(401));

        let mut state = AuthState::new();
        state.set_token("previous");
        let err = state
            .login(&api, "alice", "wrong")
            .await
            .expect_err("login must fail");

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(state.status(), RequestStatus::Failed);
        assert_eq!(state.error(), Some("Неверный логин или пароль"));
        assert_eq!(state.access_token(), Some("previous"));
    }

    #[tokio::test]
    async fn login_transport_failure_uses_fallback_message() {
        let api = FakeApi::new();
        FakeApi::set(&api.login, Reply::Broken);

        let mut state = AuthState::new();
        let _ = state.login(&api, "alice", "secret").await;
        assert_eq!(state.error(), Some("Ошибка входа"));
    }

    #[tokio::test]
    async fn fetch_me_replaces_user() {
        let api = FakeApi::new();
        FakeApi::set(&api.me, Reply::Ok(user(5, "alice", Some(true))));

        let mut state = AuthState::new();
        state.set_token("tok");
        state.fetch_me(&api).await.expect("fetch_me must succeed");

        assert_eq!(state.status(), RequestStatus::Succeeded);
        assert_eq!(state.user().map(|u| u.id), Some(5));
        assert!(state.is_admin());
        assert_eq!(api.calls(), vec!["me tok".to_string()]);
    }

    #[tokio::test]
    async fn fetch_me_failure_clears_session() {
        let api = FakeApi::new();
        FakeApi::set(&api.me, Reply::Status(401));

        let mut state = AuthState {
            user: Some(user(1, "alice", None)),
            access_token: Some("tok".to_string()),
            ..AuthState::default()
        };
        let err = state.fetch_me(&api).await.expect_err("fetch_me must fail");

        assert!(matches!(
            err,
            AuthError::Rejected {
                op: AuthOp::FetchMe,
                status: 401
            }
        ));
        assert_eq!(state.user(), None);
        assert_eq!(state.access_token(), None);
        assert_eq!(state.status(), RequestStatus::Failed);
        assert_eq!(
            state.error(),
            Some("Не удалось загрузить данные пользователя")
        );
    }

    #[tokio::test]
    async fn fetch_me_without_token_skips_network() {
        let api = FakeApi::new();
        let mut state = AuthState::new();

        let err = state.fetch_me(&api).await.expect_err("no token");
        assert!(matches!(err, AuthError::NoToken));
        assert_eq!(state.error(), Some("Нет токена"));
        assert_eq!(state.status(), RequestStatus::Failed);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn register_only_updates_status() {
        let api = FakeApi::new();
        let mut state = AuthState::new();

        state
            .register(&api, "bob", "secret")
            .await
            .expect("register must succeed");
        assert_eq!(state.status(), RequestStatus::Succeeded);
        assert_eq!(state.access_token(), None);
        assert_eq!(state.user(), None);

        FakeApi::set(&api.register, Reply::Status(400));
        let _ = state.register(&api, "bob", "secret").await;
        assert_eq!(state.status(), RequestStatus::Failed);
        assert_eq!(state.error(), Some("Не удалось зарегистрироваться"));
    }

    #[test]
    fn logout_resets_everything() {
        let mut state = AuthState {
            user: Some(user(1, "alice", Some(true))),
            access_token: Some("tok".to_string()),
            status: RequestStatus::Failed,
            error: Some("e".to_string()),
        };
        state.logout();
        assert_eq!(state, AuthState::default());
    }
}
