#![deny(clippy::all, clippy::pedantic)]

use jamdesk::application::actions::ActionParams;
use reqwest::Method;

use crate::args::ActionArgs;
use crate::client::{CliError, Ctx};
use crate::print::print_outcome;

pub async fn handle(ctx: &Ctx, args: ActionArgs) -> Result<(), CliError> {
    let ActionArgs {
        name,
        method,
        params,
    } = args;

    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let params: ActionParams = params.into_iter().collect();

    let outcome = ctx.actions()?.send(&name, method, &params).await?;
    print_outcome(&name, outcome)
}
