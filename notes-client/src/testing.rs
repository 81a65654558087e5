use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::NotesApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{Note, TokenResponse, User};

#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Status(u16),
    Broken,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> ApiResult<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Status(status) => Err(ApiError::Status(*status)),
            Self::Broken => Err(ApiError::Decode("connection reset".to_string())),
        }
    }
}

#[derive(Clone)]
pub(crate) struct FakeApi {
    pub(crate) login: Arc<Mutex<Reply<TokenResponse>>>,
    pub(crate) register: Arc<Mutex<Reply<()>>>,
    pub(crate) me: Arc<Mutex<Reply<User>>>,
    pub(crate) my_notes: Arc<Mutex<Reply<Vec<Note>>>>,
    pub(crate) all_notes: Arc<Mutex<Reply<Vec<Note>>>>,
    pub(crate) note: Arc<Mutex<Reply<Note>>>,
    pub(crate) delete: Arc<Mutex<Reply<()>>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            login: Arc::new(Mutex::new(Reply::Status(401))),
            register: Arc::new(Mutex::new(Reply::Ok(()))),
            me: Arc::new(Mutex::new(Reply::Status(401))),
            my_notes: Arc::new(Mutex::new(Reply::Ok(Vec::new()))),
            all_notes: Arc::new(Mutex::new(Reply::Ok(Vec::new()))),
            note: Arc::new(Mutex::new(Reply::Status(404))),
            delete: Arc::new(Mutex::new(Reply::Ok(()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn set<T>(slot: &Arc<Mutex<Reply<T>>>, reply: Reply<T>) {
        *slot.lock().expect("reply mutex poisoned") = reply;
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

fn reply<T: Clone>(slot: &Arc<Mutex<Reply<T>>>) -> ApiResult<T> {
    slot.lock().expect("reply mutex poisoned").get()
}

#[async_trait]
impl NotesApi for FakeApi {
    async fn login(&self, username: &str, _password: &str) -> ApiResult<TokenResponse> {
        self.record(format!("login {username}"));
        reply(&self.login)
    }

    async fn register(&self, username: &str, _password: &str) -> ApiResult<()> {
        self.record(format!("register {username}"));
        reply(&self.register)
    }

    async fn fetch_me(&self, token: &str) -> ApiResult<User> {
        self.record(format!("me {token}"));
        reply(&self.me)
    }

    async fn list_my_notes(&self, token: &str) -> ApiResult<Vec<Note>> {
        self.record(format!("list_mine {token}"));
        reply(&self.my_notes)
    }

    async fn list_all_notes(&self, token: &str) -> ApiResult<Vec<Note>> {
        self.record(format!("list_all {token}"));
        reply(&self.all_notes)
    }

    async fn get_note(&self, token: &str, id: i64) -> ApiResult<Note> {
        self.record(format!("get {token} {id}"));
        reply(&self.note)
    }

    async fn create_note(&self, token: &str, title: &str, _text: &str) -> ApiResult<Note> {
        self.record(format!("create {token} {title}"));
        reply(&self.note)
    }

    async fn update_note(
        &self,
        token: &str,
        id: i64,
        title: &str,
        _text: &str,
    ) -> ApiResult<Note> {
        self.record(format!("update {token} {id} {title}"));
        reply(&self.note)
    }

    async fn delete_note(&self, token: &str, id: i64) -> ApiResult<()> {
        self.record(format!("delete {token} {id}"));
        reply(&self.delete)
    }
}

pub(crate) fn token(value: &str) -> TokenResponse {
    TokenResponse {
        access_token: value.to_string(),
        token_type: "bearer".to_string(),
    }
}

pub(crate) fn user(id: i64, username: &str, is_admin: Option<bool>) -> User {
    User {
        id,
        username: username.to_string(),
        is_admin,
    }
}

pub(crate) fn note(id: i64, title: &str) -> Note {
    Note {
        id,
        title: title.to_string(),
        text: format!("{title} text"),
        user_id: 1,
        username: None,
    }
}
