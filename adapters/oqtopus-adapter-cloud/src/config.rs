//! Credentials for OQTOPUS Cloud.
//!
//! Credentials come from the `OQTOPUS_URL`, `OQTOPUS_API_TOKEN` and
//! `OQTOPUS_PROXY` environment variables when the first two are set, and
//! otherwise from a section of the INI-style file `~/.oqtopus`:
//!
//! ```text
//! [default]
//! url = https://oqtopus.example.com/api
//! api_token = 0123456789abcdef
//! # optional
//! proxy = http://proxy.example.com:8080
//! ```
//!
//! The file follows Python `configparser` defaults: keys are
//! case-insensitive, section names are not, `key: value` is accepted,
//! whole-line `#` and `;` comments are skipped and anything after the
//! value on the same line is part of the value. Repeating a section or a
//! key within a section is an error. Multi-line values and the special
//! `[DEFAULT]` section are not supported.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::error::{OqtopusError, OqtopusResult};

/// Environment variable holding the API base URL.
pub const ENV_URL: &str = "OQTOPUS_URL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "OQTOPUS_API_TOKEN";
/// Environment variable holding an optional proxy URL.
pub const ENV_PROXY: &str = "OQTOPUS_PROXY";
/// Section read when none is named.
pub const DEFAULT_SECTION: &str = "default";
/// Credentials file name inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".oqtopus";

/// Connection settings for OQTOPUS Cloud.
#[derive(Clone, PartialEq, Eq)]
pub struct OqtopusConfig {
    url: String,
    api_token: String,
    proxy: Option<String>,
}

impl fmt::Debug for OqtopusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OqtopusConfig")
            .field("url", &self.url)
            .field("api_token", &"[REDACTED]")
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl OqtopusConfig {
    /// Create a config from explicit values.
    pub fn new(url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: api_token.into(),
            proxy: None,
        }
    }

    /// Route requests through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// API base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// API token sent in the `q-api-token` header.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Proxy URL, if any.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Resolve credentials: environment first, then the named section of
    /// `~/.oqtopus` (`default` when `section` is `None`).
    pub fn load(section: Option<&str>) -> OqtopusResult<Self> {
        if let Some(config) = Self::from_env() {
            tracing::debug!("using OQTOPUS credentials from environment");
            return Ok(config);
        }
        Self::from_file(section)
    }

    /// Read credentials from the environment, if both URL and token are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = lookup(ENV_URL).filter(|v| !v.is_empty())?;
        let api_token = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty())?;
        Some(Self {
            url,
            api_token,
            proxy: lookup(ENV_PROXY).filter(|p| !p.is_empty()),
        })
    }

    /// Default credentials file location.
    pub fn default_path() -> OqtopusResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                OqtopusError::Configuration("cannot determine home directory".into())
            })
    }

    /// Read a section of `~/.oqtopus`.
    pub fn from_file(section: Option<&str>) -> OqtopusResult<Self> {
        Self::from_path(Self::default_path()?, section)
    }

    /// Read a section of the credentials file at `path`.
    pub fn from_path(path: impl AsRef<Path>, section: Option<&str>) -> OqtopusResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            OqtopusError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&contents, section)
    }

    /// Parse credentials file contents.
    pub fn parse(contents: &str, section: Option<&str>) -> OqtopusResult<Self> {
        let section = section.unwrap_or(DEFAULT_SECTION);
        let entries = read_section(contents, section)?
            .ok_or_else(|| OqtopusError::Configuration(format!("section [{section}] not found")))?;

        let get = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };

        let url = get("url").ok_or_else(|| {
            OqtopusError::Configuration(format!("'url' is missing in section [{section}]"))
        })?;
        let api_token = get("api_token").ok_or_else(|| {
            OqtopusError::Configuration(format!("'api_token' is missing in section [{section}]"))
        })?;

        Ok(Self {
            url,
            api_token,
            proxy: get("proxy"),
        })
    }
}

/// Collect the `key = value` pairs of one section, keys lowercased.
///
/// Returns `Ok(None)` when the section does not exist.
fn read_section(contents: &str, wanted: &str) -> OqtopusResult<Option<Vec<(String, String)>>> {
    let mut current: Option<String> = None;
    let mut sections = FxHashSet::default();
    let mut keys = FxHashSet::default();
    let mut entries = Vec::new();

    for (lineno, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let error = |message: String| {
            OqtopusError::Configuration(format!("line {}: {message}", lineno + 1))
        };

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| error("unterminated section header".into()))?
                .trim()
                .to_string();
            if !sections.insert(name.clone()) {
                return Err(error(format!("section [{name}] appears twice")));
            }
            keys.clear();
            current = Some(name);
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .or_else(|| line.split_once(':'))
            .ok_or_else(|| error("expected 'key = value'".into()))?;
        let key = key.trim().to_lowercase();

        let Some(section) = current.as_deref() else {
            return Err(error("entry before any section header".into()));
        };
        if !keys.insert(key.clone()) {
            return Err(error(format!("'{key}' appears twice in section [{section}]")));
        }
        if section == wanted {
            entries.push((key, value.trim().to_string()));
        }
    }

    Ok(sections.contains(wanted).then_some(entries))
}
