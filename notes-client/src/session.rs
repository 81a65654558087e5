//! Хранение токена сессии между запусками.
//!
//! Токен живёт в cookie `notes_access_token`. `TokenStore` скрывает, где
//! именно лежит cookie: в памяти или в файле.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::SessionError;

/// Имя cookie с токеном.
pub const TOKEN_COOKIE: &str = "notes_access_token";

fn cookie_attributes(secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("; Path=/; SameSite=Lax{secure}")
}

/// Строка `Set-Cookie` для сохранения токена.
pub fn set_cookie(token: &str, secure: bool) -> String {
    format!(
        "{TOKEN_COOKIE}={}{}",
        urlencoding::encode(token),
        cookie_attributes(secure)
    )
}

/// Строка `Set-Cookie`, удаляющая токен.
pub fn clear_cookie(secure: bool) -> String {
    format!("{TOKEN_COOKIE}=; Max-Age=0{}", cookie_attributes(secure))
}

/// Достаёт токен из строки cookie.
///
/// Пустое значение считается отсутствием токена. Если значение не
/// декодируется, возвращается как есть.
pub fn token_from_cookie(raw: &str) -> Option<String> {
    raw.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if key != TOKEN_COOKIE {
            return None;
        }
        if value.is_empty() {
            return None;
        }
        Some(
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string()),
        )
    })
}

/// Хранилище токена: get/set/clear.
pub trait TokenStore {
    /// Сохранённый токен, если есть.
    fn get(&self) -> Result<Option<String>, SessionError>;
    /// Сохраняет токен.
    fn set(&mut self, token: &str) -> Result<(), SessionError>;
    /// Удаляет токен.
    fn clear(&mut self) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, Default)]
/// Cookie в памяти процесса.
pub struct MemoryTokenStore {
    cookie: String,
}

impl MemoryTokenStore {
    /// Пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущая строка cookie.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        Ok(token_from_cookie(&self.cookie))
    }

    fn set(&mut self, token: &str) -> Result<(), SessionError> {
        self.cookie = set_cookie(token, false);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.cookie = clear_cookie(false);
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Cookie в файле (одна строка `Set-Cookie`).
pub struct CookieFileStore {
    path: PathBuf,
    secure: bool,
}

impl CookieFileStore {
    /// `secure` добавляет атрибут `Secure` (сервер по TLS).
    pub fn new(path: impl Into<PathBuf>, secure: bool) -> Self {
        Self {
            path: path.into(),
            secure,
        }
    }
}

impl TokenStore for CookieFileStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(token_from_cookie(raw.trim())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, token: &str) -> Result<(), SessionError> {
        debug!(path = %self.path.display(), "persisting session cookie");
        fs::write(&self.path, set_cookie(token, self.secure))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        debug!(path = %self.path.display(), "clearing session cookie");
        fs::write(&self.path, clear_cookie(self.secure))?;
        Ok(())
    }
}
