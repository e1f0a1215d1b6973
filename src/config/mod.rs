use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub todos_url: String,
    pub users_url: String,
    /// Artificial delay for the simulated and local-storage backends.
    pub latency_ms: u64,
    /// localStorage key holding the JSON snapshot.
    pub storage_key: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            todos_url: "https://jsonplaceholder.typicode.com/todos?_limit=5".to_string(),
            users_url: "https://randomuser.me/api/?results=5".to_string(),
            latency_ms: 500,
            storage_key: "items".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `window.ENV`.
    ///
    /// Both `window.ENV.TODOS_URL` and `window.ENV.todos_url` are accepted;
    /// the upper-case form wins.
    pub fn from_window() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let Some(env) = env else {
            return Self::default();
        };

        Self::default().with_overrides(|key| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string().or_else(|| v.as_f64().map(|n| n.to_string())))
        })
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&key.to_ascii_lowercase()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("TODOS_URL") {
            self.todos_url = v;
        }
        if let Some(v) = get("USERS_URL") {
            self.users_url = v;
        }
        if let Some(v) = get("LATENCY_MS") {
            match v.parse::<f64>() {
                Ok(ms) if ms.is_finite() && ms >= 0.0 => self.latency_ms = ms.round() as u64,
                _ => tracing::warn!(value = %v, "ignoring invalid LATENCY_MS"),
            }
        }
        if let Some(v) = get("STORAGE_KEY") {
            self.storage_key = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v;
        }

        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
