//! Remote data gateway
//!
//! A thin JSON client over the dashboard's backend API. Host views call it to
//! fetch pages and to apply bulk actions to selected rows. The pagination and
//! selection controller never talks to it directly.
//!
//! Behaviour shared by every request:
//!
//! - relative paths are joined onto the configured base URL;
//! - a per-request timeout overrides the client default;
//! - HTTP 401 runs the [`UnauthorizedHandler`] (a browser host would navigate
//!   to the login page) and fails with [`Error::Unauthorized`];
//! - other failures carry a human-readable message taken from the response.
//!
//! # Example
//!
//! ```rust,no_run
//! use inboxguard_dashboard::config::ApiConfig;
//! use inboxguard_dashboard::gateway::{ApiClient, DataGateway};
//! use inboxguard_dashboard::pagination::PageRequest;
//! use inboxguard_dashboard::records::{Mailbox, Page, Resource};
//!
//! # async fn run() -> inboxguard_dashboard::error::Result<()> {
//! let client = ApiClient::new(&ApiConfig::default())?;
//! let page: Page<Mailbox> = client
//!     .fetch_page(Resource::Mailboxes, PageRequest::default())
//!     .await?;
//! println!("{} mailboxes", page.meta.total);
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use http::{header, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::pagination::PageRequest;
use crate::records::{BulkAction, BulkActionRequest, BulkActionResult, Page, Resource};

/// JSON fields checked, in order, for an error message
const MESSAGE_FIELDS: [&str; 3] = ["error", "message", "detail"];

/// Longest raw-text body echoed back as an error message
const MAX_RAW_MESSAGE_LEN: usize = 200;

/// Method, body and timeout for a single request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// GET with no body
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            timeout: None,
            query: Vec::new(),
        }
    }

    /// POST with a JSON body
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get()
        }
    }

    /// PATCH with a JSON body
    pub fn patch(body: serde_json::Value) -> Self {
        Self {
            method: Method::PATCH,
            body: Some(body),
            ..Self::get()
        }
    }

    /// DELETE with no body
    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get()
        }
    }

    /// Override the client's default timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append query-string pairs
    #[must_use]
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Reaction to a 401 response
///
/// Runs before the request fails with [`Error::Unauthorized`].
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, login_url: &str);
}

/// Default 401 handler: logs and remembers the login URL
#[derive(Debug, Default)]
pub struct LoginRedirect {
    last: Mutex<Option<String>>,
}

impl LoginRedirect {
    /// Login URL from the most recent 401, if any
    pub fn last_redirect(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl UnauthorizedHandler for LoginRedirect {
    fn on_unauthorized(&self, login_url: &str) {
        tracing::warn!(login_url, "Session rejected by API, redirecting to login");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(login_url.to_string());
        }
    }
}

/// The operations host views need from the backend
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Fetch one page of `resource`
    async fn fetch_page<T>(&self, resource: Resource, request: PageRequest) -> Result<Page<T>>
    where
        T: DeserializeOwned + Send;

    /// Apply `action` to the rows in `ids`
    async fn apply_bulk_action(
        &self,
        resource: Resource,
        action: BulkAction,
        ids: Vec<String>,
    ) -> Result<BulkActionResult>;
}

/// HTTP client for the dashboard API
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    login_url: String,
    timeout: Duration,
    token: Option<String>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_url", &self.login_url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiClient {
    /// Create a client from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("inboxguard-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_url: config.login_url.clone(),
            timeout: config.timeout(),
            token: config.token.clone(),
            on_unauthorized: Arc::new(LoginRedirect::default()),
        })
    }

    /// Replace the 401 handler
    #[must_use]
    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.on_unauthorized = handler;
        self
    }

    /// Absolute URL for a relative API path
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request and decode the JSON response
    ///
    /// An empty success body decodes as JSON `null`, so `T = ()` or
    /// `Option<_>` work for endpoints that return nothing.
    pub async fn request<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T> {
        let url = self.url_for(path);
        let timeout = options.timeout.unwrap_or(self.timeout);

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json");
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, path, timeout))?;
        let status = response.status();
        tracing::debug!(method = %options.method, path, status = status.as_u16(), "API request completed");

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized.on_unauthorized(&self.login_url);
            return Err(Error::Unauthorized {
                login_url: self.login_url.clone(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, path, timeout))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(method = %options.method, path, status = status.as_u16(), %message, "API request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&body)
    }

    fn transport_error(&self, err: reqwest::Error, path: &str, timeout: Duration) -> Error {
        if err.is_timeout() {
            tracing::warn!(path, timeout_ms = timeout.as_millis() as u64, "API request timed out");
            Error::Timeout {
                path: path.to_string(),
                after: timeout,
            }
        } else {
            tracing::warn!(path, error = %err, "API request failed to complete");
            Error::from(err)
        }
    }
}

#[async_trait]
impl DataGateway for ApiClient {
    async fn fetch_page<T>(&self, resource: Resource, request: PageRequest) -> Result<Page<T>>
    where
        T: DeserializeOwned + Send,
    {
        let options = RequestOptions::get().with_query(request.query_pairs());
        self.request(resource.path(), options).await
    }

    async fn apply_bulk_action(
        &self,
        resource: Resource,
        action: BulkAction,
        ids: Vec<String>,
    ) -> Result<BulkActionResult> {
        let count = ids.len();
        let body = serde_json::to_value(BulkActionRequest { action, ids })?;
        let result: Option<BulkActionResult> = self
            .request(&resource.bulk_path(), RequestOptions::post(body))
            .await?;
        let result = result.unwrap_or_default();
        tracing::info!(%resource, %action, requested = count, affected = result.affected, "Bulk action applied");
        Ok(result)
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Best human-readable message for a failed response
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in MESSAGE_FIELDS {
            match json.get(field) {
                Some(serde_json::Value::String(message)) if !message.trim().is_empty() => {
                    return message.trim().to_string();
                }
                Some(nested @ serde_json::Value::Object(_)) => {
                    if let Some(message) = nested.get("message").and_then(|m| m.as_str()) {
                        return message.trim().to_string();
                    }
                }
                _ => {}
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.chars().take(MAX_RAW_MESSAGE_LEN).collect();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}
