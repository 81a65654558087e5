use tracing::{debug, warn};

use crate::api::NotesApi;
use crate::error::{ApiResult, NotesError, NotesOp};
use crate::models::{Note, RequestStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Состояние заметок: загруженный список, открытая заметка и статус запроса.
///
/// Токен передаёт вызывающий код, `AuthState` здесь не читается. При ошибке
/// `items` и `selected_note` остаются прежними.
pub struct NotesState {
    items: Vec<Note>,
    selected_note: Option<Note>,
    status: RequestStatus,
    error: Option<String>,
}

impl NotesState {
    /// Пустое состояние со статусом `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Заметки в порядке сервера.
    pub fn items(&self) -> &[Note] {
        &self.items
    }

    /// Открытая заметка.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected_note.as_ref()
    }

    /// Статус последней операции.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Сообщение последней ошибки.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Загружает свои заметки, заменяя список целиком.
    pub async fn list_mine<A>(&mut self, api: &A, token: &str) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::ListMine);
        let items = self.settle(NotesOp::ListMine, api.list_my_notes(token).await)?;
        self.items = items;
        Ok(())
    }

    /// Загружает заметки всех пользователей. Права проверяет сервер.
    pub async fn list_all<A>(&mut self, api: &A, token: &str) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::ListAll);
        let items = self.settle(NotesOp::ListAll, api.list_all_notes(token).await)?;
        self.items = items;
        Ok(())
    }

    /// Открывает заметку; список не меняется.
    pub async fn get_by_id<A>(&mut self, api: &A, token: &str, id: i64) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::GetById);
        let note = self.settle(NotesOp::GetById, api.get_note(token, id).await)?;
        self.selected_note = Some(note);
        Ok(())
    }

    /// Создаёт заметку и добавляет её в конец списка.
    pub async fn create<A>(
        &mut self,
        api: &A,
        token: &str,
        title: &str,
        text: &str,
    ) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::Create);
        let note = self.settle(NotesOp::Create, api.create_note(token, title, text).await)?;
        self.items.push(note);
        Ok(())
    }

    /// Обновляет заметку в списке и, если она открыта, в `selected_note`.
    pub async fn update<A>(
        &mut self,
        api: &A,
        token: &str,
        id: i64,
        title: &str,
        text: &str,
    ) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::Update);
        let updated = self.settle(
            NotesOp::Update,
            api.update_note(token, id, title, text).await,
        )?;

        for note in self.items.iter_mut().filter(|note| note.id == updated.id) {
            *note = updated.clone();
        }
        if self.selected_note.as_ref().is_some_and(|note| note.id == updated.id) {
            self.selected_note = Some(updated);
        }
        Ok(())
    }

    /// Удаляет заметку из списка; закрывает её, если она была открыта.
    pub async fn delete<A>(&mut self, api: &A, token: &str, id: i64) -> Result<(), NotesError>
    where
        A: NotesApi + ?Sized,
    {
        self.begin(NotesOp::Delete);
        self.settle(NotesOp::Delete, api.delete_note(token, id).await)?;

        self.items.retain(|note| note.id != id);
        if self.selected_note.as_ref().is_some_and(|note| note.id == id) {
            self.selected_note = None;
        }
        Ok(())
    }

    /// Закрывает открытую заметку.
    pub fn clear_selected(&mut self) {
        self.selected_note = None;
    }

    fn begin(&mut self, op: NotesOp) {
        debug!(?op, "notes request started");
        self.status = RequestStatus::Loading;
        self.error = None;
    }

    fn settle<T>(&mut self, op: NotesOp, result: ApiResult<T>) -> Result<T, NotesError> {
        match result {
            Ok(value) => {
                self.status = RequestStatus::Succeeded;
                Ok(value)
            }
            Err(err) => {
                let err = NotesError::from_api(op, err);
                warn!(?op, error = %err, "notes request failed");
                self.status = RequestStatus::Failed;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
