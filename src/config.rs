//! Settings file and environment overrides.
//!
//! Settings are read from a TOML file (`badges.toml` unless another path is
//! given). The API credentials can be supplied through `BADGES_API_TOKEN`,
//! `BADGES_API_ACCOUNT` and `BADGES_API_EVENT` so they stay out of the file.
//! Command line flags take precedence over both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BadgeError, Result};
use crate::source::DEFAULT_API_BASE_URL;
use crate::ticket::{DEFAULT_EXHIBITOR_MARKER, DEFAULT_LEVEL_KEY};

/// Settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "badges.toml";

const ENV_TOKEN: &str = "BADGES_API_TOKEN";
const ENV_ACCOUNT: &str = "BADGES_API_ACCOUNT";
const ENV_EVENT: &str = "BADGES_API_EVENT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub badge: BadgeSettings,
    pub fonts: FontSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub account: Option<String>,
    pub event: Option<String>,
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            account: None,
            event: None,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeSettings {
    /// `A4` (folded, two per sheet) or `A5` (flat, one per sheet)
    pub paper_size: String,
    pub title: String,
    pub include_title: bool,
    /// Image printed across the top of the front face
    pub background: Option<PathBuf>,
    /// Logo printed in the middle of the front face
    pub logo: Option<PathBuf>,
    /// Logo printed in the middle of the QR code
    pub qr_logo: Option<PathBuf>,
    /// Icon repeated once per experience level
    pub level_icon: Option<PathBuf>,
    /// Accepted speakers export (JSON)
    pub speakers: Option<PathBuf>,
    pub level_question: String,
    pub exhibitor_release: String,
}

impl Default for BadgeSettings {
    fn default() -> Self {
        Self {
            paper_size: "A4".to_string(),
            title: String::new(),
            include_title: true,
            background: None,
            logo: None,
            qr_logo: None,
            level_icon: None,
            speakers: None,
            level_question: DEFAULT_LEVEL_KEY.to_string(),
            exhibitor_release: DEFAULT_EXHIBITOR_MARKER.to_string(),
        }
    }
}

impl BadgeSettings {
    /// Title to print. `--no-title` wins, then `--title`, then the file.
    pub fn resolve_title(&self, cli_title: Option<&str>, no_title: bool) -> Option<String> {
        if no_title {
            return None;
        }
        match cli_title {
            Some(title) => Some(title.to_string()),
            None if self.include_title && !self.title.trim().is_empty() => Some(self.title.clone()),
            None => None,
        }
    }
}

/// TrueType files for the three text roles; builtin fonts are used when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub reference: Option<PathBuf>,
    pub title: Option<PathBuf>,
    pub name: Option<PathBuf>,
}

/// API coordinates once every required value is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub base_url: String,
    pub account: String,
    pub event: String,
    pub token: String,
}

impl Settings {
    /// Load settings from `path`, or from the default file when it exists.
    ///
    /// An explicitly given path must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    debug!("No settings file, using defaults");
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BadgeError::Config(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Override API values from the environment, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_TOKEN) {
            self.api.token = Some(token);
        }
        if let Some(account) = lookup(ENV_ACCOUNT) {
            self.api.account = Some(account);
        }
        if let Some(event) = lookup(ENV_EVENT) {
            self.api.event = Some(event);
        }
    }

    pub fn credentials(&self) -> Result<ApiCredentials> {
        let missing = |what: &str| {
            BadgeError::Config(format!("missing API {} (settings [api] or environment)", what))
        };
        Ok(ApiCredentials {
            base_url: self.api.base_url.clone(),
            account: self.api.account.clone().ok_or_else(|| missing("account"))?,
            event: self.api.event.clone().ok_or_else(|| missing("event"))?,
            token: self.api.token.clone().ok_or_else(|| missing("token"))?,
        })
    }
}
