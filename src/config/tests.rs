use std::io::Write;

use tempfile::NamedTempFile;

use super::*;

fn raw_with_site() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.site.url = Some("https://jams.example".to_string());
    raw.auth.csrf_token = Some("from-config".to_string());
    raw
}

fn token_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write token");
    file
}

#[test]
fn defaults_resolve_endpoints_against_site() {
    let settings = Settings::from_raw(raw_with_site()).expect("valid settings");

    assert_eq!(
        settings.site.render_endpoint.as_str(),
        "https://jams.example/render"
    );
    assert_eq!(
        settings.site.action_endpoint.as_str(),
        "https://jams.example/jams/action"
    );
    assert_eq!(settings.http.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    assert_eq!(settings.preview.markup, PreviewMarkup::Sanitized);
    assert_eq!(settings.logging.level, LevelFilter::WARN);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_site();
    raw.http.timeout_seconds = Some(5);
    raw.logging.level = Some("info".to_string());

    let overrides = ClientOverrides {
        site: Some("http://127.0.0.1:9000".to_string()),
        render_path: Some("/preview".to_string()),
        timeout_seconds: Some(12),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.site.render_endpoint.as_str(),
        "http://127.0.0.1:9000/preview"
    );
    assert_eq!(settings.http.timeout, Duration::from_secs(12));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn missing_site_is_rejected() {
    let mut raw = raw_with_site();
    raw.site.url = Some("   ".to_string());

    let err = Settings::from_raw(raw).expect_err("site required");
    assert!(matches!(err, LoadError::Invalid { key: "site.url", .. }));
}

#[test]
fn missing_token_is_rejected() {
    let mut raw = raw_with_site();
    raw.auth.csrf_token = None;

    let err = Settings::from_raw(raw).expect_err("token required");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "auth.csrf_token",
            ..
        }
    ));
}

#[test]
fn token_file_wins_over_inline_token() {
    let file = token_file("file-token\n");
    let mut raw = raw_with_site();

    raw.apply_overrides(&ClientOverrides {
        token_file: Some(file.path().to_path_buf()),
        csrf_token: Some("env-token".to_string()),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.auth.csrf_token, "file-token");
}

#[test]
fn unreadable_token_file_is_reported() {
    let mut raw = raw_with_site();
    raw.auth.csrf_token_file = Some(PathBuf::from("/nonexistent/jamdesk/token"));

    let err = Settings::from_raw(raw).expect_err("missing file");
    assert!(matches!(err, LoadError::TokenFile { .. }));
}

#[test]
fn zero_timeout_is_rejected() {
    let mut raw = raw_with_site();
    raw.http.timeout_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "http.timeout_seconds",
            ..
        }
    ));
}

#[test]
fn raw_html_flag_disables_sanitizing() {
    let mut raw = raw_with_site();
    raw.apply_overrides(&ClientOverrides {
        raw_html: true,
        ..Default::default()
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.preview.markup, PreviewMarkup::Raw);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_site();
    raw.apply_overrides(&ClientOverrides {
        log_json: Some(true),
        ..Default::default()
    });

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn auth_debug_redacts_token() {
    let settings = Settings::from_raw(raw_with_site()).expect("valid settings");
    let rendered = format!("{:?}", settings.auth);
    assert!(!rendered.contains("from-config"));
}

#[test]
fn config_file_is_layered_under_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp config");
    file.write_all(
        b"[site]\nurl = \"https://file.example\"\naction_path = \"/staff/action\"\n\n[auth]\ncsrf_token = \"file-config-token\"\n",
    )
    .expect("write config");

    let overrides = ClientOverrides {
        config_file: Some(file.path().to_path_buf()),
        timeout_seconds: Some(3),
        ..Default::default()
    };
    let settings = load(&overrides).expect("load");

    assert_eq!(
        settings.site.action_endpoint.as_str(),
        "https://file.example/staff/action"
    );
    assert_eq!(settings.auth.csrf_token, "file-config-token");
    assert_eq!(settings.http.timeout, Duration::from_secs(3));
}

#[derive(Debug, clap::Parser)]
struct OverridesOnly {
    #[command(flatten)]
    overrides: ClientOverrides,
}

#[test]
fn csrf_token_has_no_command_line_flag() {
    use clap::Parser;

    let err = OverridesOnly::try_parse_from(["jamdesk-cli", "--csrf-token", "leaked"])
        .expect_err("flag must not exist");
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);

    let parsed = OverridesOnly::try_parse_from(["jamdesk-cli", "--site", "https://jams.example"])
        .expect("parse");
    assert_eq!(parsed.overrides.site.as_deref(), Some("https://jams.example"));
}
