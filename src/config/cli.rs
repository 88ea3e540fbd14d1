use std::path::PathBuf;

use clap::{Args, ValueHint, builder::BoolishValueParser};

pub const CSRF_TOKEN_ENV: &str = "JAMDESK_CSRF_TOKEN";

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Args, Default, Clone)]
pub struct ClientOverrides {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "JAMDESK_CONFIG_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Site base URL, e.g. <https://example.com>
    #[arg(long, env = "JAMDESK_SITE_URL", value_name = "URL")]
    pub site: Option<String>,

    /// Override the render endpoint path.
    #[arg(long = "render-path", value_name = "PATH")]
    pub render_path: Option<String>,

    /// Override the action endpoint path.
    #[arg(long = "action-path", value_name = "PATH")]
    pub action_path: Option<String>,

    /// Path to file containing the CSRF token (takes precedence over env)
    #[arg(long = "token-file", env = "JAMDESK_CSRF_TOKEN_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub token_file: Option<PathBuf>,

    /// CSRF token, read from `JAMDESK_CSRF_TOKEN` only; there is no flag so
    /// the value never lands in shell history.
    #[arg(skip = std::env::var(CSRF_TOKEN_ENV).ok())]
    pub csrf_token: Option<String>,

    /// Override the per-request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Insert rendered preview markup without sanitizing it.
    #[arg(long = "raw-html", action = clap::ArgAction::SetTrue)]
    pub raw_html: bool,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
