//! Persistence capability behind the item list.
//!
//! Every variant of the list page talks to exactly one [`Backend`]. The
//! controller never mutates its collection before the backend confirms, so a
//! backend only has to report success or failure; it never sees rollbacks.

pub mod local;
pub mod memory;
pub mod remote;

use crate::api::ApiError;
use crate::models::{Item, ItemId};

pub use local::{BrowserSlot, KeyValueSlot, LocalStorageBackend, MemorySlot};
pub use memory::{MemoryStore, NoopBackend, SimulatedBackend};
pub use remote::{RemoteBackend, RemoteSource};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("stored snapshot is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("random source failed: {0}")]
    RandomSource(String),
}

/// CRUD surface shared by all list backends.
///
/// Futures are `!Send`: everything runs on the browser's single thread.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn fetch_all(&self) -> Result<Vec<Item>, BackendError>;
    async fn create(&self, item: Item) -> Result<Item, BackendError>;
    async fn update(&self, item: Item) -> Result<Item, BackendError>;
    async fn delete(&self, id: ItemId) -> Result<ItemId, BackendError>;
}

/// Which backend a list page is wired to. Displays as (and parses from) its
/// route slug.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Latency,
    Local,
    Todos,
    Users,
}

impl BackendKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Memory => "In-memory list",
            Self::Latency => "Simulated API",
            Self::Local => "Local storage",
            Self::Todos => "Remote todos",
            Self::Users => "Random users",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Memory => "Pure local state. Every change succeeds immediately.",
            Self::Latency => "Same store behind an artificial delay.",
            Self::Local => "Persists the whole list in window.localStorage.",
            Self::Todos => "Loads todos from a public API. Changes stay local.",
            Self::Users => "Loads generated user names. Changes stay local.",
        }
    }

    /// Remote variants never forward mutations; reloading restores the
    /// server's view.
    pub fn is_read_only_remote(self) -> bool {
        matches!(self, Self::Todos | Self::Users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_backend_kind_slug_roundtrip() {
        for kind in BackendKind::iter() {
            let slug = kind.to_string();
            assert_eq!(slug, kind.as_ref());
            assert_eq!(BackendKind::from_str(&slug).expect("slug should parse"), kind);
        }
    }

    #[test]
    fn test_backend_kind_known_slugs() {
        assert_eq!(BackendKind::from_str("local").ok(), Some(BackendKind::Local));
        assert_eq!(BackendKind::from_str("users").ok(), Some(BackendKind::Users));
        assert!(BackendKind::from_str("nope").is_err());
    }

    #[test]
    fn test_only_remote_kinds_are_read_only() {
        let remote: Vec<_> = BackendKind::iter()
            .filter(|k| k.is_read_only_remote())
            .collect();
        assert_eq!(remote, vec![BackendKind::Todos, BackendKind::Users]);
    }

    #[test]
    fn test_backend_error_messages() {
        let e = BackendError::Storage("quota exceeded".to_string());
        assert_eq!(e.to_string(), "storage unavailable: quota exceeded");

        let e: BackendError = serde_json::from_str::<Vec<Item>>("nope").unwrap_err().into();
        assert!(e.to_string().starts_with("stored snapshot is not valid JSON"));
    }
}
