//! HTTP client for the analytics backend
//!
//! Thin wrapper over `reqwest` that builds URLs with query parameters,
//! sends JSON, and normalizes failures into [`AppError`]:
//! - backend unreachable -> [`AppError::Unreachable`]
//! - non-2xx status -> [`AppError::Api`] carrying the `detail` message
//! - empty 2xx body -> `{}` deserialized into the expected type

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, error, warn};

/// Single-level query parameters with unique keys, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Insert only when the value is present and not blank
    pub fn insert_opt<V: Display>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.insert(key, value);
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `key=value&...` string
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub params: Option<QueryParams>,
    pub body: Option<Value>,
    /// Extra headers; these override the JSON content type if they set it
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint and optional query parameters
    pub fn build_url(&self, endpoint: &str, params: Option<&QueryParams>) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint);
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.push('?');
            url.push_str(&params.to_query_string());
        }
        url
    }

    /// Issue a request and decode the JSON response
    pub async fn request<T>(&self, method: Method, endpoint: &str, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(endpoint, options.params.as_ref());
        debug!("{} {}", method, url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request_builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = &options.body {
            request_builder = request_builder.body(serde_json::to_vec(body)?);
        }

        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                error!("Backend unreachable at {}: {}", self.base_url, e);
                return Err(AppError::unreachable(&self.base_url, Some(e)));
            }
            Err(e) => return Err(AppError::Http(e)),
        };

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!("{} {} failed with {}: {}", method, endpoint, status.as_u16(), message);
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get<T>(&self, endpoint: &str, params: Option<QueryParams>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut options = RequestOptions::default();
        if let Some(params) = params {
            options = options.with_params(params);
        }
        self.request(Method::GET, endpoint, options).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default().with_json(body)?;
        self.request(Method::POST, endpoint, options).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default().with_json(body)?;
        self.request(Method::PUT, endpoint, options).await
    }

    pub async fn delete<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, endpoint, RequestOptions::default())
            .await
    }
}

/// Message for a non-success response: the `detail` field of a JSON body,
/// `Erro: <status>` when it is missing or blank, and the status line when the
/// body is not JSON
fn error_message(status: StatusCode, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return format!(
            "Erro HTTP: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail) if is_present(detail) => detail.to_string(),
        _ => format!("Erro: {}", status.as_u16()),
    }
}

/// Null, `false`, zero and the empty string count as no detail
fn is_present(detail: &Value) -> bool {
    match detail {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Percent-encode a value for use as one path segment
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> ApiClient {
        let config = AppConfig::default().with_base_url(base_url).unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_query_params_unique_keys() {
        let mut params = QueryParams::new();
        params.insert("limit", 10);
        params.insert("offset", 0);
        params.insert("limit", 20);
        params.insert_opt::<&str>("sport", None);
        params.insert_opt("location", Some(""));

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("limit"), Some("20"));
        assert_eq!(params.to_query_string(), "limit=20&offset=0");
    }

    #[test]
    fn test_build_url_encodes_params() {
        let client = client_for("http://localhost:8000/");
        let params = QueryParams::new()
            .with("sport", "vôlei")
            .with("location", "Recife, PE");

        assert_eq!(client.build_url("/api/events", None), "http://localhost:8000/api/events");
        assert_eq!(
            client.build_url("/api/events", Some(&QueryParams::new())),
            "http://localhost:8000/api/events"
        );
        assert_eq!(
            client.build_url("/api/events", Some(&params)),
            "http://localhost:8000/api/events?sport=v%C3%B4lei&location=Recife%2C%20PE"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, r#"{"detail": "DB unavailable"}"#),
            "DB unavailable"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "Erro HTTP: 502 Bad Gateway"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, r#"{"error": "x"}"#), "Erro: 404");
    }

    #[test]
    fn test_blank_detail_falls_back_to_status() {
        let unavailable = StatusCode::SERVICE_UNAVAILABLE;
        assert_eq!(error_message(unavailable, r#"{"detail": ""}"#), "Erro: 503");
        assert_eq!(error_message(unavailable, r#"{"detail": null}"#), "Erro: 503");
        assert_eq!(error_message(unavailable, r#"{"detail": false}"#), "Erro: 503");
        assert_eq!(error_message(unavailable, r#"{"detail": 0}"#), "Erro: 503");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#""oops""#),
            "Erro: 500"
        );
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail": [{"msg": "x"}]}"#),
            r#"[{"msg":"x"}]"#
        );
    }

    #[tokio::test]
    async fn test_get_sends_query_and_json_header() {
        let router = Router::new().route(
            "/api/echo",
            get(|RawQuery(query): RawQuery, headers: AxumHeaders| async move {
                Json(json!({
                    "query": query,
                    "content_type": headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default(),
                }))
            }),
        );
        let client = client_for(&spawn_server(router).await);

        let params = QueryParams::new().with("limit", 10).with("sport", "corrida");
        let echoed: Value = client.get("/api/echo", Some(params)).await.unwrap();

        assert_eq!(echoed["query"], "limit=10&sport=corrida");
        assert_eq!(echoed["content_type"], "application/json");
    }

    #[tokio::test]
    async fn test_caller_header_overrides_content_type() {
        let router = Router::new().route(
            "/api/echo",
            get(|headers: AxumHeaders| async move {
                Json(json!({
                    "content_type": headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default(),
                }))
            }),
        );
        let client = client_for(&spawn_server(router).await);

        let options = RequestOptions::default()
            .with_params(QueryParams::new().with("limit", 1))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let echoed: Value = client
            .request(Method::GET, "/api/echo", options)
            .await
            .unwrap();

        assert_eq!(echoed["content_type"], "text/plain");
    }

    #[tokio::test]
    async fn test_post_serializes_body() {
        let router = Router::new().route(
            "/api/echo",
            post(|Json(body): Json<Value>| async move { Json(json!({ "received": body })) }),
        );
        let client = client_for(&spawn_server(router).await);

        let echoed: Value = client
            .post("/api/echo", &json!({"type": "market_share"}))
            .await
            .unwrap();
        assert_eq!(echoed["received"]["type"], "market_share");
    }

    #[tokio::test]
    async fn test_http_error_carries_detail() {
        let router = Router::new().route(
            "/api/metrics/dashboard",
            get(|| async {
                (
                    AxumStatus::SERVICE_UNAVAILABLE,
                    Json(json!({"detail": "DB unavailable"})),
                )
            }),
        );
        let client = client_for(&spawn_server(router).await);

        let err = client
            .get::<Value>("/api/metrics/dashboard", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "DB unavailable");
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_http_error_without_json_body() {
        let router = Router::new().route(
            "/api/events",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(&spawn_server(router).await);

        let err = client.get::<Value>("/api/events", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Erro HTTP: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_empty_body_returns_empty_object() {
        let router = Router::new().route("/api/reports/status", get(|| async { AxumStatus::OK }));
        let client = client_for(&spawn_server(router).await);

        let status: crate::api::reports::ReportStatusResponse =
            client.get("/api/reports/status", None).await.unwrap();
        assert!(!status.available);
        assert!(status.model.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let router = Router::new().route("/api/events", get(|| async { "not json" }));
        let client = client_for(&spawn_server(router).await);

        let err = client.get::<Value>("/api/events", None).await.unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base_url = format!("http://{}", addr);
        let client = client_for(&base_url);

        let err = client.get::<Value>("/api/events", None).await.unwrap_err();
        assert!(err.is_unreachable());
        assert!(err.to_string().contains(&base_url));
    }
}
