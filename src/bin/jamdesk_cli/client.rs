#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use jamdesk::{
    application::{
        actions::ActionClient, error::ClientError, jams::JamActions, preview::PreviewRefresher,
    },
    config::{self, LoadError, Settings},
    domain::surfaces::{EditorSurface, PageSurface},
    infra::{
        error::InfraError,
        http::{ReqwestTransport, Transport},
    },
};
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("action `{0}` was not accepted")]
    ActionFailed(String),
    #[error("failed to render output: {0}")]
    Output(serde_json::Error),
}

#[derive(Clone)]
pub struct Ctx {
    pub settings: Settings,
    pub transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Ctx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctx")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Ctx {
    pub fn new(settings: Settings) -> Result<Self, CliError> {
        let transport = ReqwestTransport::new(settings.http.timeout).map_err(InfraError::from)?;
        Ok(Self {
            settings,
            transport: Arc::new(transport),
        })
    }

    pub fn actions(&self) -> Result<ActionClient, CliError> {
        let client = ActionClient::new(
            self.transport.clone(),
            self.settings.site.action_endpoint.clone(),
            &self.settings.auth.csrf_token,
        )?;
        Ok(client)
    }

    pub fn jams(&self) -> Result<JamActions, CliError> {
        Ok(JamActions::new(self.actions()?))
    }

    pub fn refresher(
        &self,
        editor: Arc<dyn EditorSurface>,
        page: Arc<dyn PageSurface>,
    ) -> Result<PreviewRefresher, CliError> {
        let refresher = PreviewRefresher::new(
            self.transport.clone(),
            self.settings.site.render_endpoint.clone(),
            &self.settings.auth.csrf_token,
            editor,
            page,
        )?
        .with_markup(self.settings.preview.markup);
        Ok(refresher)
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let settings = config::load(&cli.overrides)?;
    Ctx::new(settings)
}
