#![deny(clippy::all, clippy::pedantic)]

use jamdesk::application::actions::ActionOutcome;
use serde::Serialize;
use serde_json::Value;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(CliError::Output)?;
    println!("{out}");
    Ok(())
}

#[derive(Serialize)]
struct ActionReport<'a> {
    action: &'a str,
    success: bool,
    body: Option<Value>,
}

/// Print an action outcome and turn anything but acceptance into an error.
pub fn print_outcome(action: &str, outcome: ActionOutcome) -> Result<(), CliError> {
    let success = outcome.is_success();
    print_json(&ActionReport {
        action,
        success,
        body: outcome.into_body(),
    })?;
    if success {
        Ok(())
    } else {
        Err(CliError::ActionFailed(action.to_string()))
    }
}
