use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Признак администратора. Отсутствует у обычных пользователей.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl User {
    /// `true` только при явном `is_admin: true`.
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель заметки.
pub struct Note {
    /// Идентификатор заметки.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Текст заметки.
    pub text: String,
    /// Идентификатор автора.
    pub user_id: i64,
    /// Логин автора; сервер заполняет его только в общем списке (админ).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Ответ эндпоинта `/token/`.
pub struct TokenResponse {
    /// Bearer-токен.
    pub access_token: String,
    /// Тип токена (обычно `bearer`).
    #[serde(default)]
    pub token_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Стадия жизненного цикла запроса в контейнере состояния.
pub enum RequestStatus {
    /// Ничего ещё не запрашивалось.
    #[default]
    Idle,
    /// Запрос в полёте.
    Loading,
    /// Последний запрос успешен.
    Succeeded,
    /// Последний запрос завершился ошибкой.
    Failed,
}

const TEXT_KEYS: [&str; 3] = ["description", "text", "content"];
const USER_ID_KEYS: [&str; 2] = ["user_id", "userId"];

impl Note {
    /// Приводит произвольный JSON от сервера к каноническому виду.
    ///
    /// Некорректные числа становятся `0`, отсутствующие строки пустыми.
    /// Текст берётся из `description`, `text` или `content`, автор из
    /// `user_id`, `userId` или вложенного `user.id`.
    pub fn from_raw(raw: &Value) -> Self {
        let nested_user = raw.get("user");

        let text = TEXT_KEYS
            .iter()
            .find_map(|key| raw.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        let user_id = USER_ID_KEYS
            .iter()
            .filter_map(|key| raw.get(*key))
            .chain(nested_user.and_then(|user| user.get("id")))
            .find(|value| !value.is_null())
            .map(coerce_i64)
            .unwrap_or(0);

        let username = raw
            .get("username")
            .and_then(Value::as_str)
            .or_else(|| {
                nested_user
                    .and_then(|user| user.get("username"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string);

        Self {
            id: raw.get("id").map(coerce_i64).unwrap_or(0),
            title: raw
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            text,
            user_id,
            username,
        }
    }
}

/// Разбирает ответ списка заметок: массив или объект с полем `notes`.
pub(crate) fn notes_from_raw(raw: &Value) -> ApiResult<Vec<Note>> {
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("notes") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(ApiError::Decode(
                    "expected an array of notes or an object with `notes`".to_string(),
                ));
            }
        },
        _ => return Err(ApiError::Decode("expected an array of notes".to_string())),
    };

    Ok(entries.iter().map(Note::from_raw).collect())
}

fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_f64))
            .unwrap_or(0),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().and_then(integral_f64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn integral_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_reconciles_aliases() {
        let note = Note::from_raw(&json!({"id": "3", "description": "hi", "userId": 5}));
        assert_eq!(
            note,
            Note {
                id: 3,
                title: String::new(),
                text: "hi".to_string(),
                user_id: 5,
                username: None,
            }
        );
    }

    #[test]
    fn from_raw_reads_nested_user() {
        let raw = json!({
            "id": 7,
            "title": "t",
            "description": null,
            "content": "body",
            "user": {"id": 2, "username": "alice"},
        });
        let note = Note::from_raw(&raw);
        assert_eq!(note.text, "body");
        assert_eq!(note.user_id, 2);
        assert_eq!(note.username.as_deref(), Some("alice"));
    }

    #[test]
    fn from_raw_prefers_top_level_user_id() {
        let raw = json!({"id": 1, "user_id": null, "userId": "9", "user": {"id": 4}});
        assert_eq!(Note::from_raw(&raw).user_id, 9);
    }

    #[test]
    fn from_raw_coerces_garbage_to_defaults() {
        let raw = json!({"id": "abc", "title": 12, "user_id": true});
        let note = Note::from_raw(&raw);
        assert_eq!(note.id, 0);
        assert_eq!(note.title, "");
        assert_eq!(note.text, "");
        assert_eq!(note.user_id, 0);
    }

    #[test]
    fn from_raw_accepts_integral_float() {
        assert_eq!(Note::from_raw(&json!({"id": 4.0})).id, 4);
        assert_eq!(Note::from_raw(&json!({"id": 4.5})).id, 0);
    }

    #[test]
    fn notes_from_raw_accepts_wrapped_list() {
        let raw = json!({"notes": [{"id": 1}, {"id": 2}]});
        let notes = notes_from_raw(&raw).expect("wrapped list must parse");
        assert_eq!(notes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn notes_from_raw_rejects_scalar() {
        let err = notes_from_raw(&json!("nope")).expect_err("scalar is not a list");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn user_without_admin_flag_is_not_admin() {
        let user: User = serde_json::from_str(r#"{"id":1,"username":"u"}"#).expect("valid user");
        assert!(!user.is_admin());
        assert_eq!(user.is_admin, None);
    }
}
