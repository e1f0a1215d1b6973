use serde::{Deserialize, Serialize};
use std::fmt;

/// Ids are kept within 53 bits so they survive a round-trip through JS numbers.
const JS_SAFE_MASK: u64 = (1 << 53) - 1;

/// Opaque, stable identifier of a list item.
///
/// Serialized as a bare JSON number so the local-storage snapshot reads
/// `[{"id": 123, "text": "..."}]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

fn random_id() -> Result<ItemId, getrandom::Error> {
    let mut buf = [0u8; 8];
    getrandom::getrandom(&mut buf)?;
    Ok(ItemId(u64::from_le_bytes(buf) & JS_SAFE_MASK))
}

/// Draw a random id that is not used by any item in `existing`.
///
/// Zero is never handed out; remote sources start their numbering at 1 and
/// a zero id reads like an unset field in the JSON snapshot.
pub fn fresh_id(existing: &[Item]) -> Result<ItemId, getrandom::Error> {
    loop {
        let id = random_id()?;
        if id.0 != 0 && !existing.iter().any(|item| item.id == id) {
            return Ok(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_as_id_text_record() {
        let item = Item::new(ItemId(42), "buy milk");
        let v = serde_json::to_value(&item).expect("should serialize");
        assert_eq!(v, serde_json::json!({ "id": 42, "text": "buy milk" }));
    }

    #[test]
    fn test_fresh_id_is_js_safe_and_nonzero() {
        for _ in 0..64 {
            let id = fresh_id(&[]).expect("random source should be available");
            assert!(id.0 != 0);
            assert!(id.0 <= JS_SAFE_MASK);
        }
    }

    #[test]
    fn test_fresh_id_avoids_existing_ids() {
        let existing: Vec<Item> = (0..200).map(|i| Item::new(ItemId(i), "x")).collect();
        for _ in 0..64 {
            let id = fresh_id(&existing).expect("random source should be available");
            assert!(!existing.iter().any(|i| i.id == id));
        }
    }
}
