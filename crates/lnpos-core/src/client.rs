//! HTTP client for the device registry REST API.
//!
//! The registry is mounted under an extension path on the backend host.
//! Two historical mounts exist, [`DEFAULT_MOUNT`] and [`LEGACY_MOUNT`]; both
//! expose the same contract, so the mount is just a client parameter.
//!
//! # Example
//!
//! ```no_run
//! use lnpos_core::{ApiClient, DeviceApi, DEFAULT_MOUNT};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("https://legend.lnbits.com", DEFAULT_MOUNT)?;
//!
//! let devices = client.list_devices("admin-key").await?.unwrap_or_default();
//! println!("{} devices", devices.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use lnpos_types::{DeviceRecord, Payload};

use crate::error::{Error, Result};
use crate::traits::DeviceApi;

/// Current extension mount.
pub const DEFAULT_MOUNT: &str = "lnurldevice";

/// Mount used by older deployments.
pub const LEGACY_MOUNT: &str = "lnpos";

/// Header carrying the wallet credential.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Request timeout used by [`ApiClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const COLLECTION_PATH: [&str; 3] = ["api", "v1", "lnurlpos"];
const CURRENCIES_PATH: [&str; 3] = ["api", "v1", "currencies"];

/// HTTP client for the device registry API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    mount: Vec<String>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend root (e.g. "https://legend.lnbits.com")
    /// * `mount` - Extension mount path (e.g. [`DEFAULT_MOUNT`])
    pub fn new(base_url: &str, mount: &str) -> Result<Self> {
        Self::with_timeout(base_url, mount, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, mount: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Request)?;
        Self::with_client(base_url, mount, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, mount: &str, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            base: parse_base_url(base_url)?,
            mount: parse_mount(mount)?,
        })
    }

    /// Get the base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Get the mount path.
    pub fn mount(&self) -> String {
        self.mount.join("/")
    }

    /// URL of the device collection.
    pub fn collection_url(&self) -> Url {
        self.registry_url(None)
    }

    /// URL of a single device.
    pub fn record_url(&self, id: &str) -> Url {
        self.registry_url(Some(id))
    }

    /// URL of the shared currency list.
    pub fn currencies_url(&self) -> Url {
        self.url(&CURRENCIES_PATH)
    }

    fn registry_url(&self, id: Option<&str>) -> Url {
        let mut segments: Vec<&str> = self.mount.iter().map(String::as_str).collect();
        segments.extend_from_slice(&COLLECTION_PATH);
        segments.extend(id);
        self.url(&segments)
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path, so this cannot fail
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn execute(
        &self,
        method: Method,
        url: Url,
        key: Option<&str>,
        body: Option<&Payload>,
    ) -> Result<Response> {
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url.clone());
        if let Some(key) = key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| Error::NotReachable {
            url: url.to_string(),
            source: e,
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        key: Option<&str>,
        body: Option<&Payload>,
    ) -> Result<T> {
        let response = self.execute(method, url, key, body).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DeviceApi for ApiClient {
    async fn list_devices(&self, key: &str) -> Result<Option<Vec<DeviceRecord>>> {
        let response = self
            .execute(Method::GET, self.collection_url(), Some(key), None)
            .await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_device(&self, key: &str, id: &str) -> Result<DeviceRecord> {
        self.fetch(Method::GET, self.record_url(id), Some(key), None)
            .await
    }

    async fn create_device(&self, key: &str, payload: &Payload) -> Result<DeviceRecord> {
        self.fetch(Method::POST, self.collection_url(), Some(key), Some(payload))
            .await
    }

    async fn update_device(
        &self,
        key: &str,
        id: &str,
        payload: &Payload,
    ) -> Result<DeviceRecord> {
        self.fetch(Method::PUT, self.record_url(id), Some(key), Some(payload))
            .await
    }

    async fn delete_device(&self, key: &str, id: &str) -> Result<()> {
        self.execute(Method::DELETE, self.record_url(id), Some(key), None)
            .await?;
        Ok(())
    }

    async fn currencies(&self) -> Result<Vec<String>> {
        self.fetch(Method::GET, self.currencies_url(), None, None)
            .await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))
}

fn parse_mount(mount: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = mount
        .split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if segments.is_empty() {
        return Err(Error::InvalidUrl("mount path cannot be empty".to_string()));
    }
    Ok(segments)
}

/// Turn a non-success response into [`Error::RequestFailed`].
///
/// The backend reports errors as `{"detail": ...}`; `{"error": ...}` is
/// accepted as well. Without either, the status line is used.
async fn api_error(response: Response) -> Error {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| error_message(&body))
        .unwrap_or_else(|| status.to_string());
    Error::RequestFailed {
        status: status.as_u16(),
        message,
    }
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("detail").or_else(|| body.get("error"))? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
