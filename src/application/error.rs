use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

use crate::infra::http::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("csrf token is not a valid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}
