use super::{Backend, BackendError};
use crate::models::{Item, ItemId};
use crate::util::sleep;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// A string key-value slot (window.localStorage in the browser).
pub trait KeyValueSlot {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Default, Debug)]
pub struct BrowserSlot;

impl BrowserSlot {
    fn storage() -> Result<web_sys::Storage, BackendError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| BackendError::Storage("localStorage is not available".to_string()))
    }
}

impl KeyValueSlot for BrowserSlot {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| BackendError::Storage(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| BackendError::Storage(format!("{e:?}")))
    }
}

/// In-process slot. Clones share contents, which is how tests model "the
/// same browser profile" across controller instances.
#[derive(Clone, Default, Debug)]
pub struct MemorySlot {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps the whole list as one JSON array under a fixed key.
///
/// Every mutation reads the full snapshot, edits it and writes it back whole.
/// There is no isolation from other tabs writing the same key.
#[derive(Clone, Debug)]
pub struct LocalStorageBackend<S> {
    slot: S,
    key: String,
    delay: Duration,
}

impl<S: KeyValueSlot> LocalStorageBackend<S> {
    pub fn new(slot: S, key: impl Into<String>, delay: Duration) -> Self {
        Self {
            slot,
            key: key.into(),
            delay,
        }
    }

    fn read_snapshot(&self) -> Result<Vec<Item>, BackendError> {
        match self.slot.get(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_snapshot(&self, items: &[Item]) -> Result<(), BackendError> {
        let json = serde_json::to_string(items)?;
        self.slot.set(&self.key, &json)
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<Item>)) -> Result<(), BackendError> {
        let mut items = self.read_snapshot()?;
        f(&mut items);
        self.write_snapshot(&items)
    }
}

impl<S: KeyValueSlot> Backend for LocalStorageBackend<S> {
    async fn fetch_all(&self) -> Result<Vec<Item>, BackendError> {
        sleep(self.delay).await;
        self.read_snapshot()
    }

    async fn create(&self, item: Item) -> Result<Item, BackendError> {
        sleep(self.delay).await;
        self.modify(|items| items.push(item.clone()))?;
        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<Item, BackendError> {
        sleep(self.delay).await;
        self.modify(|items| {
            if let Some(slot) = items.iter_mut().find(|i| i.id == item.id) {
                slot.text = item.text.clone();
            }
        })?;
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<ItemId, BackendError> {
        sleep(self.delay).await;
        self.modify(|items| items.retain(|i| i.id != id))?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    const KEY: &str = "items";

    fn backend(slot: &MemorySlot) -> LocalStorageBackend<MemorySlot> {
        LocalStorageBackend::new(slot.clone(), KEY, Duration::ZERO)
    }

    #[test]
    fn test_empty_slot_fetches_empty_list() {
        let slot = MemorySlot::new();
        assert!(block_on(backend(&slot).fetch_all()).expect("fetch").is_empty());
    }

    #[test]
    fn test_mutations_rewrite_whole_snapshot() {
        let slot = MemorySlot::new();
        let b = backend(&slot);

        block_on(b.create(Item::new(ItemId(1), "a"))).expect("create");
        block_on(b.create(Item::new(ItemId(2), "b"))).expect("create");
        block_on(b.update(Item::new(ItemId(2), "B"))).expect("update");
        block_on(b.delete(ItemId(1))).expect("delete");

        let raw = slot.get(KEY).expect("get").expect("slot should be written");
        assert_eq!(raw, r#"[{"id":2,"text":"B"}]"#);
    }

    #[test]
    fn test_second_backend_on_same_slot_sees_writes() {
        let slot = MemorySlot::new();
        block_on(backend(&slot).create(Item::new(ItemId(5), "a"))).expect("create");

        let fetched = block_on(backend(&slot).fetch_all()).expect("fetch");
        assert_eq!(fetched, vec![Item::new(ItemId(5), "a")]);
    }

    #[test]
    fn test_corrupt_snapshot_is_decode_error() {
        let slot = MemorySlot::new();
        slot.set(KEY, "{not json").expect("set");

        let err = block_on(backend(&slot).fetch_all()).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));

        // A failed read must not overwrite what is stored.
        let err = block_on(backend(&slot).create(Item::new(ItemId(1), "a"))).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert_eq!(slot.get(KEY).expect("get").as_deref(), Some("{not json"));
    }

    #[test]
    fn test_reads_snapshot_written_by_other_writer() {
        let slot = MemorySlot::new();
        slot.set(KEY, r#"[{"id":1,"text":"from another tab"}]"#)
            .expect("set");

        block_on(backend(&slot).create(Item::new(ItemId(2), "mine"))).expect("create");
        let fetched = block_on(backend(&slot).fetch_all()).expect("fetch");
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].text, "from another tab");
    }
}
