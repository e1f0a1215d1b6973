use super::{Backend, BackendError};
use crate::models::{Item, ItemId};
use crate::util::sleep;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Explicitly owned item store.
///
/// Cloning shares the same underlying list, so a page and its backend can hold
/// the same store while two pages (or two tests) never see each other's items.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    items: Rc<RefCell<Vec<Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
        }
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    pub fn replace_all(&self, items: Vec<Item>) {
        *self.items.borrow_mut() = items;
    }

    pub fn push(&self, item: Item) {
        self.items.borrow_mut().push(item);
    }

    /// Replace the matching item in place. Returns whether it was found.
    pub fn replace(&self, item: &Item) -> bool {
        let mut items = self.items.borrow_mut();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item.clone();
                true
            }
            None => false,
        }
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&self, id: ItemId) -> bool {
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|i| i.id != id);
        items.len() != before
    }
}

/// Pure local state: the controller's own collection is the only copy.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoopBackend;

impl Backend for NoopBackend {
    async fn fetch_all(&self) -> Result<Vec<Item>, BackendError> {
        Ok(Vec::new())
    }

    async fn create(&self, item: Item) -> Result<Item, BackendError> {
        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<Item, BackendError> {
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<ItemId, BackendError> {
        Ok(id)
    }
}

/// Fake network API over a [`MemoryStore`]: every call waits `delay` and then
/// succeeds.
#[derive(Clone, Debug)]
pub struct SimulatedBackend {
    store: MemoryStore,
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(store: MemoryStore, delay: Duration) -> Self {
        Self { store, delay }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Backend for SimulatedBackend {
    async fn fetch_all(&self) -> Result<Vec<Item>, BackendError> {
        sleep(self.delay).await;
        Ok(self.store.snapshot())
    }

    async fn create(&self, item: Item) -> Result<Item, BackendError> {
        sleep(self.delay).await;
        self.store.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<Item, BackendError> {
        sleep(self.delay).await;
        if !self.store.replace(&item) {
            tracing::debug!(id = %item.id, "update for unknown id; store unchanged");
        }
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<ItemId, BackendError> {
        sleep(self.delay).await;
        self.store.remove(id);
        Ok(id)
    }
}
