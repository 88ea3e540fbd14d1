//! Typed wrappers for the jam staff actions.

use reqwest::Method;

use crate::application::actions::{ActionClient, ActionOutcome, ActionParams};
use crate::application::error::ClientError;

#[derive(Clone)]
pub struct JamActions {
    client: ActionClient,
}

impl JamActions {
    pub fn new(client: ActionClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ActionClient {
        &self.client
    }

    /// List every question known to the jam forms.
    pub async fn questions(&self) -> Result<ActionOutcome, ClientError> {
        self.client
            .send("questions", Method::GET, &ActionParams::new())
            .await
    }

    pub async fn set_state(&self, jam: &str, state: &str) -> Result<ActionOutcome, ClientError> {
        self.client.set_state(jam, state).await
    }

    pub async fn associate_question(
        &self,
        form: u64,
        question: &str,
    ) -> Result<ActionOutcome, ClientError> {
        self.client
            .send("associate_question", Method::POST, &form_question(form, question))
            .await
    }

    pub async fn disassociate_question(
        &self,
        form: u64,
        question: &str,
    ) -> Result<ActionOutcome, ClientError> {
        self.client
            .send(
                "disassociate_question",
                Method::POST,
                &form_question(form, question),
            )
            .await
    }

    pub async fn record_infraction(
        &self,
        participant: &str,
        reason: &str,
        number: i64,
    ) -> Result<ActionOutcome, ClientError> {
        let params = ActionParams::new()
            .with("participant", participant)
            .with("reason", reason)
            .with("number", number.to_string());
        self.client
            .send("infraction", Method::POST, &params)
            .await
    }

    pub async fn delete_question(&self, id: &str) -> Result<ActionOutcome, ClientError> {
        self.client
            .send("question", Method::DELETE, &ActionParams::new().with("id", id))
            .await
    }

    pub async fn delete_infraction(&self, id: &str) -> Result<ActionOutcome, ClientError> {
        self.client
            .send(
                "infraction",
                Method::DELETE,
                &ActionParams::new().with("id", id),
            )
            .await
    }
}

fn form_question(form: u64, question: &str) -> ActionParams {
    ActionParams::new()
        .with("form", form.to_string())
        .with("question", question)
}
