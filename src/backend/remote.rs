use super::{Backend, BackendError, MemoryStore};
use crate::api::JsonFetcher;
use crate::models::{Item, ItemId};

/// Foreign response shapes the read-only backends know how to map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteSource {
    /// `[{ "id": 1, "title": "...", ... }]`, `title` becomes `text`.
    Todos,
    /// `{ "results": [{ "name": { "first": "...", "last": "..." } }] }`,
    /// numbered from 1 in response order.
    Users,
}

impl RemoteSource {
    pub fn parse(self, data: serde_json::Value) -> Vec<Item> {
        match self {
            Self::Todos => parse_todo_list_response(data),
            Self::Users => parse_user_list_response(data),
        }
    }
}

pub(crate) fn parse_todo_list_response(data: serde_json::Value) -> Vec<Item> {
    let list = data.as_array().cloned().unwrap_or_default();

    let mut out: Vec<Item> = Vec::with_capacity(list.len());
    for entry in list {
        let id = entry.get("id").and_then(|v| v.as_u64());
        let title = entry
            .get("title")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if let Some(id) = id {
            if !title.is_empty() {
                out.push(Item::new(ItemId(id), title));
            }
        }
    }

    out
}

pub(crate) fn parse_user_list_response(data: serde_json::Value) -> Vec<Item> {
    let list = data
        .get("results")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut out: Vec<Item> = Vec::with_capacity(list.len());
    for entry in list {
        let name = entry.get("name");
        let get_s = |k: &str| {
            name.and_then(|n| n.get(k))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let text = format!("{} {}", get_s("first"), get_s("last"))
            .trim()
            .to_string();
        if !text.is_empty() {
            let id = ItemId(out.len() as u64 + 1);
            out.push(Item::new(id, text));
        }
    }

    out
}

/// Loads from a real endpoint; mutations only touch a local mirror.
///
/// After any create/update/delete the client and the server disagree until
/// the next load, which replaces the mirror with the server's list again.
#[derive(Clone)]
pub struct RemoteBackend<F> {
    fetcher: F,
    source: RemoteSource,
    url: String,
    mirror: MemoryStore,
}

impl<F: JsonFetcher> RemoteBackend<F> {
    pub fn new(fetcher: F, source: RemoteSource, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            source,
            url: url.into(),
            mirror: MemoryStore::new(),
        }
    }

    pub fn mirror(&self) -> &MemoryStore {
        &self.mirror
    }
}

impl<F: JsonFetcher> Backend for RemoteBackend<F> {
    async fn fetch_all(&self) -> Result<Vec<Item>, BackendError> {
        let data = self.fetcher.get_json(&self.url).await?;
        let items = self.source.parse(data);
        tracing::debug!(source = ?self.source, count = items.len(), "remote list loaded");
        self.mirror.replace_all(items.clone());
        Ok(items)
    }

    async fn create(&self, item: Item) -> Result<Item, BackendError> {
        self.mirror.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<Item, BackendError> {
        self.mirror.replace(&item);
        Ok(item)
    }

    async fn delete(&self, id: ItemId) -> Result<ItemId, BackendError> {
        self.mirror.remove(id);
        Ok(id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{ApiError, ApiErrorKind, ApiResult};
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Serves the same canned body on every GET and counts requests.
    #[derive(Clone)]
    pub(crate) struct CannedFetcher {
        pub body: Option<serde_json::Value>,
        pub calls: Rc<Cell<usize>>,
    }

    impl CannedFetcher {
        pub(crate) fn ok(body: serde_json::Value) -> Self {
            Self {
                body: Some(body),
                calls: Rc::new(Cell::new(0)),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                body: None,
                calls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl JsonFetcher for CannedFetcher {
        async fn get_json(&self, _url: &str) -> ApiResult<serde_json::Value> {
            self.calls.set(self.calls.get() + 1);
            self.body.clone().ok_or_else(|| ApiError {
                kind: ApiErrorKind::Http,
                message: "Request failed (500 Internal Server Error): ".to_string(),
            })
        }
    }

    pub(crate) fn todos_body() -> serde_json::Value {
        serde_json::json!([
            { "userId": 1, "id": 1, "title": "delectus aut autem", "completed": false },
            { "userId": 1, "id": 2, "title": "quis ut nam facilis", "completed": false },
            { "userId": 1, "id": 3, "title": "fugiat veniam minus", "completed": true }
        ])
    }

    #[test]
    fn test_parse_todos_maps_title_to_text() {
        let items = parse_todo_list_response(todos_body());
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Item::new(ItemId(1), "delectus aut autem"));
        assert_eq!(items[2].id, ItemId(3));
    }

    #[test]
    fn test_parse_todos_skips_malformed_entries() {
        let items = parse_todo_list_response(serde_json::json!([
            { "id": 1, "title": "ok" },
            { "id": "two", "title": "string id" },
            { "id": 3, "title": "   " },
            { "title": "no id" }
        ]));
        assert_eq!(items, vec![Item::new(ItemId(1), "ok")]);
    }

    #[test]
    fn test_parse_todos_non_array_is_empty() {
        assert!(parse_todo_list_response(serde_json::json!({ "error": "x" })).is_empty());
    }

    #[test]
    fn test_parse_users_joins_names_with_sequential_ids() {
        let items = parse_user_list_response(serde_json::json!({
            "results": [
                { "gender": "female", "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" } },
                { "name": { "first": "", "last": "" } },
                { "name": { "first": "Alan", "last": "Turing" } }
            ],
            "info": { "seed": "abc", "results": 3 }
        }));
        assert_eq!(
            items,
            vec![
                Item::new(ItemId(1), "Ada Lovelace"),
                Item::new(ItemId(2), "Alan Turing"),
            ]
        );
    }

    #[test]
    fn test_parse_users_tolerates_missing_last_name() {
        let items = parse_user_list_response(serde_json::json!({
            "results": [{ "name": { "first": "Plato" } }]
        }));
        assert_eq!(items, vec![Item::new(ItemId(1), "Plato")]);
    }

    #[test]
    fn test_mutations_are_not_forwarded() {
        let fetcher = CannedFetcher::ok(todos_body());
        let backend = RemoteBackend::new(fetcher.clone(), RemoteSource::Todos, "http://x/todos");

        block_on(backend.fetch_all()).expect("fetch");
        block_on(backend.delete(ItemId(1))).expect("delete");
        block_on(backend.create(Item::new(ItemId(99), "local"))).expect("create");
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(backend.mirror().snapshot().len(), 3);

        let reloaded = block_on(backend.fetch_all()).expect("fetch");
        assert_eq!(fetcher.calls.get(), 2);
        assert_eq!(reloaded, parse_todo_list_response(todos_body()));
        assert_eq!(backend.mirror().snapshot(), reloaded);
    }

    #[test]
    fn test_fetch_failure_surfaces_api_error() {
        let backend = RemoteBackend::new(CannedFetcher::failing(), RemoteSource::Users, "http://x");
        let err = block_on(backend.fetch_all()).unwrap_err();
        assert!(matches!(err, BackendError::Api(ref e) if e.kind == ApiErrorKind::Http));
    }
}
