#![deny(clippy::all, clippy::pedantic)]

use crate::args::JamsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_outcome;

pub async fn handle(ctx: &Ctx, cmd: JamsCmd) -> Result<(), CliError> {
    let jams = ctx.jams()?;
    let (action, outcome) = match cmd {
        JamsCmd::SetState { jam, state } => ("state", jams.set_state(&jam, &state).await?),
        JamsCmd::Questions => ("questions", jams.questions().await?),
        JamsCmd::AssociateQuestion { form, question } => (
            "associate_question",
            jams.associate_question(form, &question).await?,
        ),
        JamsCmd::DisassociateQuestion { form, question } => (
            "disassociate_question",
            jams.disassociate_question(form, &question).await?,
        ),
        JamsCmd::Infraction {
            participant,
            reason,
            number,
        } => (
            "infraction",
            jams.record_infraction(&participant, &reason, number).await?,
        ),
        JamsCmd::DeleteQuestion { id } => ("question", jams.delete_question(&id).await?),
        JamsCmd::DeleteInfraction { id } => ("infraction", jams.delete_infraction(&id).await?),
    };
    print_outcome(action, outcome)
}
