use crate::backend::{Backend, BackendError};
use crate::models::{fresh_id, Item, ItemId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The one backend call a controller may have outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingOp {
    Load,
    Add,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// Another backend call is still pending. Never stored in `error`.
    #[error("another change is still in progress")]
    Busy,

    #[error("failed to load: {0}")]
    LoadFailed(String),

    #[error("failed to save: {0}")]
    MutationFailed(String),
}

/// Everything the list view renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListState {
    pub items: Vec<Item>,

    /// Text field contents. Mirrors the edited item's text while editing.
    pub input: String,

    /// Item whose text the next submit replaces (none: submit appends).
    pub editing_id: Option<ItemId>,

    pub pending: Option<PendingOp>,

    /// Last load/mutation failure; cleared by the next successful call.
    pub error: Option<ListError>,
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        self.pending == Some(PendingOp::Load)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    fn clear_edit_session(&mut self) {
        self.editing_id = None;
        self.input.clear();
    }
}

pub type Observer = Rc<dyn Fn(&ListState)>;

/// Owns one list and mediates every change through a [`Backend`].
///
/// Local state only changes after the backend confirms; a failed call leaves
/// the collection exactly as it was. At most one backend call is outstanding:
/// anything issued while `pending` is set is rejected with [`ListError::Busy`].
///
/// Results are tagged with a generation. [`ItemListController::load`] and
/// [`ItemListController::detach`] bump it, and a result that comes back under
/// an older generation is dropped instead of applied.
pub struct ItemListController<B> {
    backend: Rc<B>,
    state: Rc<RefCell<ListState>>,
    generation: Rc<Cell<u64>>,
    observer: Rc<RefCell<Option<Observer>>>,
}

impl<B> Clone for ItemListController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            state: Rc::clone(&self.state),
            generation: Rc::clone(&self.generation),
            observer: Rc::clone(&self.observer),
        }
    }
}

impl<B: Backend> ItemListController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
            state: Rc::new(RefCell::new(ListState::default())),
            generation: Rc::new(Cell::new(0)),
            observer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Called with the new state after every transition.
    pub fn set_observer(&self, observer: impl Fn(&ListState) + 'static) {
        *self.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn snapshot(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.borrow().items.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    fn notify(&self) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            let state = self.snapshot();
            observer(&state);
        }
    }

    fn begin(&self, op: PendingOp) -> Result<u64, ListError> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(current) = state.pending {
                tracing::debug!(?op, ?current, "rejected while another call is pending");
                return Err(ListError::Busy);
            }
            state.pending = Some(op);
        }

        if op == PendingOp::Load {
            self.generation.set(self.generation.get() + 1);
        }
        self.notify();
        Ok(self.generation.get())
    }

    /// Apply `f` and clear `pending`, unless the result is stale.
    fn finish(&self, token: u64, f: impl FnOnce(&mut ListState)) -> bool {
        if self.generation.get() != token {
            tracing::debug!(token, current = self.generation.get(), "discarding stale result");
            return false;
        }

        {
            let mut state = self.state.borrow_mut();
            state.pending = None;
            f(&mut state);
        }
        self.notify();
        true
    }

    fn fail<T>(&self, token: u64, err: ListError) -> Result<T, ListError> {
        tracing::warn!(error = %err, "list operation failed");
        let stored = err.clone();
        self.finish(token, move |s| s.error = Some(stored));
        Err(err)
    }

    /// Replace the collection with whatever the backend holds.
    pub async fn load(&self) -> Result<(), ListError> {
        let token = self.begin(PendingOp::Load)?;

        match self.backend.fetch_all().await {
            Ok(fetched) => {
                let mut items: Vec<Item> = Vec::with_capacity(fetched.len());
                for item in fetched {
                    if items.iter().any(|i| i.id == item.id) {
                        tracing::warn!(id = %item.id, "duplicate id in loaded list; keeping first");
                        continue;
                    }
                    items.push(item);
                }

                tracing::debug!(count = items.len(), "list loaded");
                self.finish(token, |s| {
                    if let Some(id) = s.editing_id {
                        if !items.iter().any(|i| i.id == id) {
                            s.clear_edit_session();
                        }
                    }
                    s.items = items;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => self.fail(token, ListError::LoadFailed(e.to_string())),
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.state.borrow_mut();
            if state.input == text {
                return;
            }
            state.input = text;
        }
        self.notify();
    }

    /// Add or update depending on the edit session. Empty text is ignored.
    ///
    /// On success the edit session and input are cleared; on failure both are
    /// kept so the user can retry.
    pub async fn submit(&self, text: &str) -> Result<(), ListError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        if self.is_busy() {
            return Err(ListError::Busy);
        }
        self.set_input(text);

        let editing_id = self.state.borrow().editing_id;
        match editing_id {
            Some(id) => self
                .update_then(id, text, ListState::clear_edit_session)
                .await
                .map(|_| ()),
            None => self
                .add_then(text, ListState::clear_edit_session)
                .await
                .map(|_| ()),
        }
    }

    /// Append a new item. Returns its id, or `None` for empty text.
    pub async fn add(&self, text: &str) -> Result<Option<ItemId>, ListError> {
        self.add_then(text, |_| {}).await
    }

    async fn add_then(
        &self,
        text: &str,
        on_success: impl FnOnce(&mut ListState),
    ) -> Result<Option<ItemId>, ListError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let token = self.begin(PendingOp::Add)?;

        let id = {
            let state = self.state.borrow();
            fresh_id(&state.items)
        };
        let id = match id {
            Ok(id) => id,
            Err(e) => {
                let e = BackendError::RandomSource(e.to_string());
                return self.fail(token, ListError::MutationFailed(e.to_string()));
            }
        };

        let created = match self.backend.create(Item::new(id, text)).await {
            Ok(item) => item,
            Err(e) => return self.fail(token, ListError::MutationFailed(e.to_string())),
        };

        if self.state.borrow().items.iter().any(|i| i.id == created.id) {
            let msg = format!("backend returned an id already in the list ({})", created.id);
            return self.fail(token, ListError::MutationFailed(msg));
        }

        let created_id = created.id;
        let applied = self.finish(token, move |s| {
            s.items.push(created);
            s.error = None;
            on_success(s);
        });
        Ok(applied.then_some(created_id))
    }

    /// Point the edit session at `id` and copy its text into the input.
    /// Unknown ids are ignored.
    pub fn begin_edit(&self, id: ItemId) {
        {
            let mut state = self.state.borrow_mut();
            let Some(text) = state
                .items
                .iter()
                .find(|i| i.id == id)
                .map(|i| i.text.clone())
            else {
                tracing::debug!(%id, "begin_edit for unknown id");
                return;
            };
            state.input = text;
            state.editing_id = Some(id);
        }
        self.notify();
    }

    pub fn cancel_edit(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.is_editing() && state.input.is_empty() {
                return;
            }
            state.clear_edit_session();
        }
        self.notify();
    }

    /// Replace the text of `id` in place. Returns whether anything changed.
    pub async fn update(&self, id: ItemId, text: &str) -> Result<bool, ListError> {
        self.update_then(id, text, |_| {}).await
    }

    async fn update_then(
        &self,
        id: ItemId,
        text: &str,
        on_success: impl FnOnce(&mut ListState),
    ) -> Result<bool, ListError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        if !self.state.borrow().items.iter().any(|i| i.id == id) {
            tracing::debug!(%id, "update for unknown id");
            return Ok(false);
        }

        let token = self.begin(PendingOp::Update)?;

        let updated = match self.backend.update(Item::new(id, text)).await {
            Ok(item) => item,
            Err(e) => return self.fail(token, ListError::MutationFailed(e.to_string())),
        };

        Ok(self.finish(token, move |s| {
            if let Some(item) = s.items.iter_mut().find(|i| i.id == id) {
                item.text = updated.text;
            }
            s.error = None;
            on_success(s);
        }))
    }

    /// Remove `id`. Deleting the edit target also ends the edit session.
    pub async fn delete(&self, id: ItemId) -> Result<bool, ListError> {
        if !self.state.borrow().items.iter().any(|i| i.id == id) {
            tracing::debug!(%id, "delete for unknown id");
            return Ok(false);
        }

        let token = self.begin(PendingOp::Delete)?;

        if let Err(e) = self.backend.delete(id).await {
            return self.fail(token, ListError::MutationFailed(e.to_string()));
        }

        Ok(self.finish(token, |s| {
            s.items.retain(|i| i.id != id);
            if s.editing_id == Some(id) {
                s.clear_edit_session();
            }
            s.error = None;
        }))
    }

    /// Stop applying results of calls that are still in flight.
    ///
    /// Called when the owning view is torn down. Backend calls are not
    /// cancelled; whatever they return is ignored.
    pub fn detach(&self) {
        self.generation.set(self.generation.get() + 1);
        *self.observer.borrow_mut() = None;
    }
}
