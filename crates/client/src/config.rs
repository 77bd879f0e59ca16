use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use grimoire_core::CoreError;
use reqwest::Url;

use crate::api::ApiClient;
use crate::source::{RecordSource, RemoteSource, StaticSource};

/// Public API used when `GRIMOIRE_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://hp-api.onrender.com/api";

/// Which adapter feeds the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Remote,
    Static,
}

impl FromStr for SourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "api" => Ok(SourceKind::Remote),
            "static" | "local" => Ok(SourceKind::Static),
            other => Err(CoreError::Validation(format!(
                "GRIMOIRE_SOURCE must be remote or static, got {other}"
            ))),
        }
    }
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for browsing the public API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// Location of the bundled document (`http(s)://` or `file://` URL,
    /// or a plain filesystem path). The remote source reads spells from it.
    pub static_url: Option<String>,
    pub source: SourceKind,
    /// Keep only the main cast that has an image (remote source only).
    pub featured_only: bool,
    /// Backing file for the local key/value store.
    pub store_path: PathBuf,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                            |
    /// |--------------------------|------------------------------------|
    /// | `GRIMOIRE_API_URL`       | `https://hp-api.onrender.com/api`  |
    /// | `GRIMOIRE_STATIC_URL`    | unset                              |
    /// | `GRIMOIRE_SOURCE`        | `static` if a static URL is set, else `remote` |
    /// | `GRIMOIRE_FEATURED_ONLY` | `false`                            |
    /// | `GRIMOIRE_STORE_PATH`    | `grimoire-store.json`              |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                               |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("GRIMOIRE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let static_url = lookup("GRIMOIRE_STATIC_URL").filter(|s| !s.trim().is_empty());

        let source = match lookup("GRIMOIRE_SOURCE") {
            Some(raw) => raw.parse()?,
            None if static_url.is_some() => SourceKind::Static,
            None => SourceKind::Remote,
        };
        if source == SourceKind::Static && static_url.is_none() {
            return Err(CoreError::Validation(
                "GRIMOIRE_SOURCE=static requires GRIMOIRE_STATIC_URL".into(),
            ));
        }

        let featured_only = match lookup("GRIMOIRE_FEATURED_ONLY") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                CoreError::Validation(format!("GRIMOIRE_FEATURED_ONLY must be a boolean, got {raw}"))
            })?,
            None => false,
        };

        let store_path = lookup("GRIMOIRE_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("grimoire-store.json"));

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .map_err(|_| CoreError::Validation("REQUEST_TIMEOUT_SECS must be a valid u64".into()))?;

        Ok(Self {
            api_url,
            static_url,
            source,
            featured_only,
            store_path,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the HTTP client shared by the data source and the quiz.
    pub fn api_client(&self) -> Result<ApiClient, CoreError> {
        ApiClient::new(self.api_url.clone(), self.request_timeout())
            .map_err(|e| CoreError::Transport(e.to_string()))
    }

    /// Build the configured record source.
    pub fn build_source(&self, api: ApiClient) -> Result<Arc<dyn RecordSource>, CoreError> {
        match self.source {
            SourceKind::Remote => {
                let mut source = RemoteSource::new(api.clone(), self.featured_only)?;
                if let Some(raw) = self.static_url.as_deref() {
                    source = source.with_spells(StaticSource::new(api, static_location(raw)?));
                }
                Ok(Arc::new(source))
            }
            SourceKind::Static => {
                let raw = self.static_url.as_deref().ok_or_else(|| {
                    CoreError::Validation("Static source needs GRIMOIRE_STATIC_URL".into())
                })?;
                Ok(Arc::new(StaticSource::new(api, static_location(raw)?)))
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accept a full URL or a filesystem path for the static document.
pub fn static_location(raw: &str) -> Result<Url, CoreError> {
    if let Ok(url) = Url::parse(raw) {
        return Ok(url);
    }
    let path = std::path::absolute(raw)
        .map_err(|e| CoreError::Validation(format!("Invalid static path {raw}: {e}")))?;
    Url::from_file_path(&path)
        .map_err(|_| CoreError::Validation(format!("Invalid static path {}", path.display())))
}
