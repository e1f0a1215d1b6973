#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub(crate) fn network(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read-only JSON source.
///
/// The remote backends only ever issue a single GET per load, so this is the
/// whole surface they need; tests substitute canned responses.
#[allow(async_fn_in_trait)]
pub trait JsonFetcher {
    async fn get_json(&self, url: &str) -> ApiResult<serde_json::Value>;
}

/// Plain GET over `reqwest` (browser `fetch` on wasm). No retries, no timeout.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> ApiResult<serde_json::Value> {
        tracing::debug!(url, "GET");
        let res = self.client.get(url).send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_includes_status_and_body() {
        let e = ApiError::http(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            "down".to_string(),
            "Request failed",
        );
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert_eq!(e.to_string(), "Request failed (503 Service Unavailable): down");
    }

    #[test]
    fn test_parse_error_keeps_source_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ApiError::parse(&source);
        assert_eq!(e.kind, ApiErrorKind::Parse);
        assert_eq!(e.message, source.to_string());
    }
}
