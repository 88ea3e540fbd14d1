//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{fmt, fs, path::PathBuf, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::preview::PreviewMarkup;

mod cli;

pub use cli::ClientOverrides;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "jamdesk";
const DEFAULT_RENDER_PATH: &str = "/render";
const DEFAULT_ACTION_PATH: &str = "/jams/action";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully-resolved client settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub site: SiteSettings,
    pub auth: AuthSettings,
    pub http: HttpSettings,
    pub preview: PreviewSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub url: Url,
    pub render_endpoint: Url,
    pub action_endpoint: Url,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub csrf_token: String,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub markup: PreviewMarkup,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to read csrf token file {path}: {source}")]
    TokenFile {
        path: String,
        source: std::io::Error,
    },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &ClientOverrides) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("JAMDESK").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    site: RawSiteSettings,
    auth: RawAuthSettings,
    http: RawHttpSettings,
    preview: RawPreviewSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ClientOverrides) {
        if let Some(site) = overrides.site.as_ref() {
            self.site.url = Some(site.clone());
        }
        if let Some(path) = overrides.render_path.as_ref() {
            self.site.render_path = Some(path.clone());
        }
        if let Some(path) = overrides.action_path.as_ref() {
            self.site.action_path = Some(path.clone());
        }
        if let Some(path) = overrides.token_file.as_ref() {
            self.auth.csrf_token_file = Some(path.clone());
        }
        if let Some(token) = overrides.csrf_token.as_ref() {
            self.auth.csrf_token = Some(token.clone());
        }
        if let Some(seconds) = overrides.timeout_seconds {
            self.http.timeout_seconds = Some(seconds);
        }
        if overrides.raw_html {
            self.preview.sanitize = Some(false);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            site,
            auth,
            http,
            preview,
            logging,
        } = raw;

        Ok(Self {
            site: build_site_settings(site)?,
            auth: build_auth_settings(auth)?,
            http: build_http_settings(http)?,
            preview: build_preview_settings(preview),
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let raw_url = site
        .url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            LoadError::invalid("site.url", "is required (use --site or JAMDESK_SITE_URL)")
        })?;
    let url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("site.url", format!("failed to parse: {err}")))?;

    let render_path = site
        .render_path
        .unwrap_or_else(|| DEFAULT_RENDER_PATH.to_string());
    let render_endpoint = url.join(&render_path).map_err(|err| {
        LoadError::invalid("site.render_path", format!("failed to resolve: {err}"))
    })?;

    let action_path = site
        .action_path
        .unwrap_or_else(|| DEFAULT_ACTION_PATH.to_string());
    let action_endpoint = url.join(&action_path).map_err(|err| {
        LoadError::invalid("site.action_path", format!("failed to resolve: {err}"))
    })?;

    Ok(SiteSettings {
        url,
        render_endpoint,
        action_endpoint,
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let csrf_token = if let Some(path) = auth.csrf_token_file {
        fs::read_to_string(&path)
            .map_err(|source| LoadError::TokenFile {
                path: path.display().to_string(),
                source,
            })?
            .trim()
            .to_string()
    } else {
        auth.csrf_token.ok_or_else(|| {
            LoadError::invalid(
                "auth.csrf_token",
                "is required (use --token-file or JAMDESK_CSRF_TOKEN)",
            )
        })?
    };

    if csrf_token.is_empty() {
        return Err(LoadError::invalid("auth.csrf_token", "must not be empty"));
    }

    Ok(AuthSettings { csrf_token })
}

fn build_http_settings(http: RawHttpSettings) -> Result<HttpSettings, LoadError> {
    let seconds = http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if seconds == 0 {
        return Err(LoadError::invalid(
            "http.timeout_seconds",
            "must be greater than zero",
        ));
    }
    Ok(HttpSettings {
        timeout: Duration::from_secs(seconds),
    })
}

fn build_preview_settings(preview: RawPreviewSettings) -> PreviewSettings {
    let markup = if preview.sanitize.unwrap_or(true) {
        PreviewMarkup::Sanitized
    } else {
        PreviewMarkup::Raw
    };
    PreviewSettings { markup }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    url: Option<String>,
    render_path: Option<String>,
    action_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    csrf_token: Option<String>,
    csrf_token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawHttpSettings {
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPreviewSettings {
    sanitize: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[cfg(test)]
mod tests;
