//! Generic action dispatcher for the staff action endpoint.
//!
//! An action request carries everything in its query string: the action
//! name first, then the caller's parameters in insertion order. No request
//! body is sent, whatever the method.

use std::sync::Arc;

use jamdesk_api_types::{ACTION_KEY, carries_error_code};
use metrics::counter;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, Url, header::HeaderValue};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::error::ClientError;
use crate::infra::http::{CSRF_HEADER_NAME, HttpRequest, Transport};
use crate::infra::telemetry::ACTION_REQUESTS_TOTAL;

/// URI component encoding: everything but `A-Z a-z 0-9 - _ . ! ~ * ( )`.
///
/// `'` stays encoded because URL query serialization escapes it anyway.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Ordered action parameters. Inserting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionParams {
    pairs: Vec<(String, String)>,
}

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy with `action` as the first pair. A caller-supplied `action`
    /// entry is overridden.
    fn for_action(&self, action: &str) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        pairs.push((ACTION_KEY.to_string(), action.to_string()));
        pairs.extend(
            self.pairs
                .iter()
                .filter(|(key, _)| key != ACTION_KEY)
                .cloned(),
        );
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Encode parameters as `key=value` pairs joined by `&`, in order.
pub fn encode_params(params: &ActionParams) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, URI_COMPONENT),
                utf8_percent_encode(value, URI_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Classified action response.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Any JSON body without an `error_code` key.
    Accepted(Value),
    /// JSON object carrying `error_code`.
    Rejected(Value),
    /// Body was not JSON.
    Unreadable,
}

impl ActionOutcome {
    pub fn classify(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Err(_) => Self::Unreadable,
            Ok(value) if carries_error_code(&value) => Self::Rejected(value),
            Ok(value) => Self::Accepted(value),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Accepted(body) | Self::Rejected(body) => Some(body),
            Self::Unreadable => None,
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Self::Accepted(body) | Self::Rejected(body) => Some(body),
            Self::Unreadable => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::Rejected(_) => "rejected",
            Self::Unreadable => "unreadable",
        }
    }
}

#[derive(Clone)]
pub struct ActionClient {
    transport: Arc<dyn Transport>,
    base: Url,
    csrf: HeaderValue,
}

impl ActionClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        base: Url,
        csrf_token: &str,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport,
            base,
            csrf: HeaderValue::from_str(csrf_token)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL an action request is sent to. Any query on the base URL is
    /// replaced.
    pub fn url_for(&self, action: &str, params: &ActionParams) -> Url {
        let mut url = self.base.clone();
        url.set_query(Some(&encode_params(&params.for_action(action))));
        url
    }

    pub async fn send(
        &self,
        action: &str,
        method: Method,
        params: &ActionParams,
    ) -> Result<ActionOutcome, ClientError> {
        let url = self.url_for(action, params);
        let request =
            HttpRequest::new(method.clone(), url).header(CSRF_HEADER_NAME, self.csrf.clone());

        debug!(action, method = %method, "sending action");

        let response = self.transport.dispatch(request).await.map_err(|err| {
            warn!(action, error = %err, "action request failed");
            counter!(ACTION_REQUESTS_TOTAL, "outcome" => "transport_error").increment(1);
            ClientError::from(err)
        })?;

        let outcome = ActionOutcome::classify(&response.body);
        counter!(ACTION_REQUESTS_TOTAL, "outcome" => outcome.label()).increment(1);
        match &outcome {
            ActionOutcome::Accepted(_) => {
                info!(action, status = %response.status, "action accepted");
            }
            ActionOutcome::Rejected(body) => {
                warn!(action, status = %response.status, body = %body, "action rejected");
            }
            ActionOutcome::Unreadable => {
                warn!(action, status = %response.status, "action response is not valid JSON");
            }
        }
        Ok(outcome)
    }

    pub async fn set_state(&self, jam: &str, state: &str) -> Result<ActionOutcome, ClientError> {
        let params = ActionParams::new().with("jam", jam).with("state", state);
        self.send("state", Method::POST, &params).await
    }
}
