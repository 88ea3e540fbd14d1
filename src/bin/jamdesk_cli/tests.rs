#![deny(clippy::all, clippy::pedantic)]

use httpmock::MockServer;
use jamdesk::application::preview::{MARGIN_ERROR_HTML, RefreshOutcome};
use jamdesk::config::{self, ClientOverrides};
use tempfile::NamedTempFile;

use crate::args::{ActionArgs, Cli, Commands, JamsCmd, PreviewArgs};
use crate::client::{CliError, Ctx, build_ctx_from_cli};
use crate::handlers::{action, jams, preview};

fn ctx(server: &MockServer) -> Ctx {
    let overrides = ClientOverrides {
        site: Some(server.base_url()),
        csrf_token: Some("tok".into()),
        ..Default::default()
    };
    Ctx::new(config::load(&overrides).expect("settings")).expect("ctx")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

#[test]
fn build_ctx_prefers_token_file() -> Result<(), CliError> {
    let file = tmp_file("file-token\n");
    let cli = Cli {
        overrides: ClientOverrides {
            site: Some("https://example.com".to_string()),
            token_file: Some(file.path().to_path_buf()),
            csrf_token: Some("env-token".to_string()),
            ..Default::default()
        },
        command: Commands::Jams(crate::args::JamsArgs {
            action: JamsCmd::Questions,
        }),
    };

    let ctx = build_ctx_from_cli(&cli)?;
    assert_eq!(ctx.settings.auth.csrf_token, "file-token");
    Ok(())
}

#[test]
fn build_ctx_errors_without_site() {
    let cli = Cli {
        overrides: ClientOverrides {
            csrf_token: Some("tok".to_string()),
            ..Default::default()
        },
        command: Commands::Jams(crate::args::JamsArgs {
            action: JamsCmd::Questions,
        }),
    };

    let err = build_ctx_from_cli(&cli).expect_err("missing site should fail");
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn read_value_prefers_file_over_inline() -> Result<(), CliError> {
    let file = tmp_file("from-file");
    let val = crate::io::read_value(Some("inline".into()), Some(file.path().to_path_buf()))?;
    assert_eq!(val, "from-file");
    Ok(())
}

#[test]
fn parse_param_splits_on_first_equals() {
    assert_eq!(
        crate::io::parse_param("q=a=b"),
        Ok(("q".to_string(), "a=b".to_string()))
    );
    assert!(crate::io::parse_param("novalue").is_err());
    assert!(crate::io::parse_param("=x").is_err());
}

#[tokio::test]
async fn preview_reports_rendered_page() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/render")
            .header("x-csrftoken", "tok")
            .json_body(serde_json::json!({"data": "**hi**"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":"<p><strong>hi</strong></p>"}"#);
    });

    let report = preview::run(
        &ctx(&server),
        PreviewArgs {
            title: "Jam".into(),
            body: Some("**hi**".into()),
            body_file: None,
        },
    )
    .await?;

    mock.assert();
    assert_eq!(report.outcome, RefreshOutcome::Rendered);
    assert!(!report.page.submit_disabled);
    assert_eq!(report.page.preview_html, "<p><strong>hi</strong></p>");
    Ok(())
}

#[tokio::test]
async fn preview_reads_body_file_and_reports_annotations() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/render")
            .json_body(serde_json::json!({"data": "line one\nline two"}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"error":"bad line 2","error_lines":[{"row":1,"text":"bad line 2","type":"error"}]}"#);
    });
    let file = tmp_file("line one\nline two");

    let report = preview::run(
        &ctx(&server),
        PreviewArgs {
            title: "Jam".into(),
            body: None,
            body_file: Some(file.path().to_path_buf()),
        },
    )
    .await?;

    mock.assert();
    assert_eq!(report.outcome, RefreshOutcome::Failed { annotated: true });
    assert_eq!(report.page.preview_html, MARGIN_ERROR_HTML);
    assert_eq!(report.annotations.len(), 1);
    assert_eq!(report.annotations[0].row(), Some(1));
    Ok(())
}

#[tokio::test]
async fn preview_with_empty_title_sends_nothing() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.path("/render");
        then.status(200).body("{}");
    });

    let report = preview::run(
        &ctx(&server),
        PreviewArgs {
            title: String::new(),
            body: Some("text".into()),
            body_file: None,
        },
    )
    .await?;

    assert_eq!(report.outcome, RefreshOutcome::Skipped);
    assert!(report.page.submit_disabled);
    mock.assert_calls(0);
    Ok(())
}

#[tokio::test]
async fn action_hits_endpoint_with_params() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/jams/action")
            .header("x-csrftoken", "tok")
            .query_param("action", "infraction")
            .query_param("reason", "late & loud");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"i1"}"#);
    });

    action::handle(
        &ctx(&server),
        ActionArgs {
            name: "infraction".into(),
            method: "post".into(),
            params: vec![("reason".into(), "late & loud".into())],
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn rejected_action_is_an_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/jams/action").query_param("action", "state");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"error_code":403}"#);
    });

    let err = jams::handle(
        &ctx(&server),
        JamsCmd::SetState {
            jam: "42".into(),
            state: "open".into(),
        },
    )
    .await
    .expect_err("rejected");

    mock.assert();
    assert!(matches!(err, CliError::ActionFailed(ref action) if action == "state"));
}

#[tokio::test]
async fn jams_delete_question_uses_delete() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE")
            .path("/jams/action")
            .query_param("action", "question")
            .query_param("id", "q1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"q1"}"#);
    });

    jams::handle(&ctx(&server), JamsCmd::DeleteQuestion { id: "q1".into() }).await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn invalid_method_is_rejected_before_sending() {
    let server = MockServer::start();

    let err = action::handle(
        &ctx(&server),
        ActionArgs {
            name: "questions".into(),
            method: "NOT A METHOD".into(),
            params: Vec::new(),
        },
    )
    .await
    .expect_err("invalid method");

    assert!(matches!(err, CliError::InvalidInput(_)));
}
