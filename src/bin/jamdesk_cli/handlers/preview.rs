#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use jamdesk::api::Annotation;
use jamdesk::application::preview::RefreshOutcome;
use jamdesk::infra::surfaces::{MemoryEditor, MemoryPage, PageState};
use serde::Serialize;

use crate::args::PreviewArgs;
use crate::client::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

#[derive(Debug, Serialize)]
pub struct PreviewReport {
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
    #[serde(flatten)]
    pub page: PageState,
    pub annotations: Vec<Annotation>,
}

pub async fn handle(ctx: &Ctx, args: PreviewArgs) -> Result<(), CliError> {
    let report = run(ctx, args).await?;
    print_json(&report)
}

pub async fn run(ctx: &Ctx, args: PreviewArgs) -> Result<PreviewReport, CliError> {
    let PreviewArgs {
        title,
        body,
        body_file,
    } = args;

    let text = read_value(body, body_file)?;
    let editor = Arc::new(MemoryEditor::new(text));
    let page = Arc::new(MemoryPage::new(title));

    let refresher = ctx.refresher(editor.clone(), page.clone())?;
    let outcome = refresher.refresh().await?;

    Ok(PreviewReport {
        outcome,
        page: page.snapshot(),
        annotations: editor.annotations(),
    })
}
