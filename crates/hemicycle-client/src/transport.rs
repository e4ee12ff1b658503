//! HTTP transport to the parliamentary backend.
//!
//! The transport knows nothing about payload shapes: a 2xx body comes back as
//! raw JSON (`null` when empty or unparseable) and anything else becomes a
//! [`ClientError`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hemicycle_core::Query;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{info, warn};

use crate::{ClientConfig, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// One backend call, relative to the configured base address.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>, query: Query) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Query::new(),
            body: Some(body),
        }
    }
}

/// Anything that can carry an [`ApiRequest`] to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, req: &ApiRequest) -> Result<Value, ClientError>;
}

/// `reqwest`-backed transport with a fixed base URL, timeout, and JSON headers.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// `base_url` should be like `http://localhost:8000`; a trailing slash is dropped.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("hemicycle/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, req: &ApiRequest) -> Result<Value, ClientError> {
        let url = self.url(&req.path);
        let mut builder = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if !req.query.is_empty() {
            let pairs: Vec<(&str, &str)> = req.query.pairs().collect();
            builder = builder.query(&pairs);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        info!(method = %req.method, url = %url, "requesting");
        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &text));
        }
        Ok(parse_body(&url, &text))
    }
}

fn parse_body(url: &str, text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(url, error = %e, "response body is not JSON");
        Value::Null
    })
}
