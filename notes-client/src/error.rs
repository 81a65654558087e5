use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки транспортного уровня (`NotesApi`).
pub enum ApiError {
    /// Ошибка HTTP-транспорта (`reqwest`): соединение, таймаут, TLS.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер ответил статусом вне диапазона 2xx.
    #[error("unexpected http status {0}")]
    Status(u16),

    /// Тело ответа не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Результат вызовов `NotesApi`.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Асинхронные операции `AuthState`.
pub enum AuthOp {
    /// Вход.
    Login,
    /// Регистрация.
    Register,
    /// Загрузка текущего пользователя.
    FetchMe,
}

impl AuthOp {
    fn rejected_message(self) -> &'static str {
        match self {
            Self::Login => "Неверный логин или пароль",
            Self::Register => "Не удалось зарегистрироваться",
            Self::FetchMe => "Не удалось загрузить данные пользователя",
        }
    }

    fn failed_message(self) -> &'static str {
        match self {
            Self::Login => "Ошибка входа",
            Self::Register => "Ошибка регистрации",
            Self::FetchMe => "Ошибка загрузки пользователя",
        }
    }
}

#[derive(Debug, Error)]
/// Ошибки операций `AuthState`.
///
/// `Display` даёт фиксированное сообщение для пользователя, именно оно
/// попадает в `AuthState::error`.
pub enum AuthError {
    /// `fetch_me` вызван без токена; сетевой запрос не выполнялся.
    #[error("Нет токена")]
    NoToken,

    /// Сервер отклонил логин/пароль.
    #[error("Неверный логин или пароль")]
    InvalidCredentials,

    /// Сервер ответил не-2xx.
    #[error("{}", .op.rejected_message())]
    Rejected {
        /// Операция.
        op: AuthOp,
        /// HTTP-статус ответа.
        status: u16,
    },

    /// Запрос не дошёл до сервера или ответ не разобран.
    #[error("{}", .op.failed_message())]
    Failed {
        /// Операция.
        op: AuthOp,
        /// Исходная ошибка транспорта.
        #[source]
        source: ApiError,
    },
}

impl AuthError {
    pub(crate) fn from_api(op: AuthOp, err: ApiError) -> Self {
        match err {
            ApiError::Status(_) if op == AuthOp::Login => Self::InvalidCredentials,
            ApiError::Status(status) => Self::Rejected { op, status },
            source => Self::Failed { op, source },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Асинхронные операции `NotesState`.
pub enum NotesOp {
    /// Список своих заметок.
    ListMine,
    /// Список всех заметок (админ).
    ListAll,
    /// Одна заметка по id.
    GetById,
    /// Создание.
    Create,
    /// Обновление.
    Update,
    /// Удаление.
    Delete,
}

impl NotesOp {
    fn rejected_message(self) -> &'static str {
        match self {
            Self::ListMine => "Не удалось загрузить заметки",
            Self::ListAll => "Не удалось загрузить все заметки",
            Self::GetById => "Не удалось загрузить заметку",
            Self::Create => "Не удалось создать заметку",
            Self::Update => "Не удалось обновить заметку",
            Self::Delete => "Не удалось удалить заметку",
        }
    }

    fn failed_message(self) -> &'static str {
        match self {
            Self::ListMine => "Ошибка загрузки заметок",
            Self::ListAll => "Ошибка загрузки всех заметок",
            Self::GetById => "Ошибка загрузки заметки",
            Self::Create => "Ошибка создания заметки",
            Self::Update => "Ошибка обновления заметки",
            Self::Delete => "Ошибка удаления заметки",
        }
    }
}

#[derive(Debug, Error)]
/// Ошибки операций `NotesState`.
pub enum NotesError {
    /// Сервер ответил не-2xx.
    #[error("{}", .op.rejected_message())]
    Rejected {
        /// Операция.
        op: NotesOp,
        /// HTTP-статус ответа.
        status: u16,
    },

    /// Запрос не дошёл до сервера или ответ не разобран.
    #[error("{}", .op.failed_message())]
    Failed {
        /// Операция.
        op: NotesOp,
        /// Исходная ошибка транспорта.
        #[source]
        source: ApiError,
    },
}

impl NotesError {
    pub(crate) fn from_api(op: NotesOp, err: ApiError) -> Self {
        match err {
            ApiError::Status(status) => Self::Rejected { op, status },
            source => Self::Failed { op, source },
        }
    }
}

#[derive(Debug, Error)]
/// Ошибки хранилища токена.
pub enum SessionError {
    /// Ошибка ввода-вывода файлового хранилища.
    #[error("token storage io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
/// Ошибки `AppContext`.
pub enum AppError {
    /// Операция требует токен, а его нет.
    #[error("требуется авторизация")]
    NotAuthenticated,

    /// Ошибка авторизации.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Ошибка работы с заметками.
    #[error(transparent)]
    Notes(#[from] NotesError),

    /// Ошибка хранилища токена.
    #[error(transparent)]
    Session(#[from] SessionError),
}
