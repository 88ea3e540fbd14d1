//! Live preview: post the editor contents to the render endpoint and reflect
//! the result on the editor page.
//!
//! Every issued request takes a ticket from a [`RequestSequence`]. When a
//! response arrives after a newer request was issued it is dropped without
//! touching the page, so the preview always reflects the latest edit rather
//! than whichever response happened to land last.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use jamdesk_api_types::{RenderRequest, RenderResponse};
use metrics::counter;
use reqwest::{
    Method, Url,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::error::ClientError;
use crate::domain::input;
use crate::domain::surfaces::{EditorSurface, PageSurface};
use crate::infra::http::{CSRF_HEADER_NAME, HttpRequest, Transport};
use crate::infra::telemetry::{RENDER_REQUESTS_TOTAL, RENDER_STALE_TOTAL};

pub const MARGIN_ERROR_HTML: &str = "<h3>Error - see editor margin</h3>";

/// How server-rendered markup is inserted into the preview container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMarkup {
    /// Strip scripts, event handlers and other unsafe markup first.
    #[default]
    Sanitized,
    /// Insert the server's markup unchanged.
    Raw,
}

/// Result of one [`PreviewRefresher::refresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RefreshOutcome {
    /// Title or editor text empty; no request was issued.
    Skipped,
    /// Preview replaced with the rendered markup.
    Rendered,
    /// Server reported an error; `annotated` when it came with line markers.
    Failed { annotated: bool },
    /// A newer request superseded this one; the page was left alone.
    Stale,
}

#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

pub struct PreviewRefresher {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    csrf: HeaderValue,
    editor: Arc<dyn EditorSurface>,
    page: Arc<dyn PageSurface>,
    markup: PreviewMarkup,
    sanitizer: ammonia::Builder<'static>,
    sequence: RequestSequence,
}

impl PreviewRefresher {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: Url,
        csrf_token: &str,
        editor: Arc<dyn EditorSurface>,
        page: Arc<dyn PageSurface>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport,
            endpoint,
            csrf: HeaderValue::from_str(csrf_token)?,
            editor,
            page,
            markup: PreviewMarkup::default(),
            sanitizer: ammonia::Builder::default(),
            sequence: RequestSequence::default(),
        })
    }

    #[must_use]
    pub fn with_markup(mut self, markup: PreviewMarkup) -> Self {
        self.markup = markup;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Render the current editor contents and update the page.
    ///
    /// Transport and decode failures are returned without touching the page.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        let text = self.editor.text();
        let title = self.page.title();

        // Skips also take a ticket so an in-flight render cannot re-enable
        // submit after the input was cleared.
        let ticket = self.sequence.issue();

        if !input::is_renderable(&text, &title) {
            debug!(ticket, "editor text or title empty; skipping render");
            self.page.set_submit_disabled(true);
            return Ok(RefreshOutcome::Skipped);
        }

        let body = serde_json::to_vec(&RenderRequest::new(text)).map_err(ClientError::Encode)?;
        let request = HttpRequest::new(Method::POST, self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CSRF_HEADER_NAME, self.csrf.clone())
            .body(body);

        counter!(RENDER_REQUESTS_TOTAL).increment(1);
        debug!(ticket, endpoint = %self.endpoint, "requesting preview render");

        let response = self.transport.dispatch(request).await.map_err(|err| {
            warn!(ticket, error = %err, "render request failed");
            ClientError::from(err)
        })?;

        if !self.sequence.is_latest(ticket) {
            counter!(RENDER_STALE_TOTAL).increment(1);
            debug!(ticket, "discarding superseded render response");
            return Ok(RefreshOutcome::Stale);
        }

        let parsed: RenderResponse = serde_json::from_slice(&response.body).map_err(|source| {
            warn!(ticket, status = %response.status, "render response is not valid JSON");
            ClientError::Decode {
                endpoint: "render",
                source,
            }
        })?;

        Ok(self.apply(parsed))
    }

    fn apply(&self, response: RenderResponse) -> RefreshOutcome {
        match response {
            RenderResponse::ErrorWithLines { message, lines } => {
                info!(error = %message, lines = lines.len(), "render failed with line markers");
                self.page.set_submit_disabled(true);
                self.editor.set_annotations(lines);
                self.page.set_preview_html(MARGIN_ERROR_HTML.to_string());
                RefreshOutcome::Failed { annotated: true }
            }
            RenderResponse::Error { message } => {
                info!(error = %message, "render failed");
                self.page.set_submit_disabled(true);
                let html = format!("<h3>Error</h3><p>{}</p>", self.sanitize(&message));
                self.page.set_preview_html(html);
                RefreshOutcome::Failed { annotated: false }
            }
            RenderResponse::Rendered { html } => {
                let html = match self.markup {
                    PreviewMarkup::Sanitized => self.sanitize(&html),
                    PreviewMarkup::Raw => html,
                };
                self.page.set_submit_disabled(false);
                self.page.set_preview_html(html);
                self.editor.clear_annotations();
                RefreshOutcome::Rendered
            }
        }
    }

    fn sanitize(&self, html: &str) -> String {
        self.sanitizer.clean(html).to_string()
    }
}
