//! Request and response shapes for the jam editor endpoints.
//!
//! The render endpoint answers with one of three JSON shapes that are told
//! apart by which keys are present, not by their values, so [`RenderResponse`]
//! is decoded from a raw JSON value rather than a serde tag.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Header carrying the anti-forgery token on every request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Query key the action endpoint dispatches on.
pub const ACTION_KEY: &str = "action";

/// Body key whose presence marks an action response as a failure.
pub const ERROR_CODE_KEY: &str = "error_code";

/// Body posted to the render endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub data: String,
}

impl RenderRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Editor margin marker produced by the render endpoint.
///
/// The record belongs to the editor component, so it is kept as the JSON the
/// server sent and handed over unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(Value);

impl Annotation {
    pub fn error(row: u32, text: impl Into<String>) -> Self {
        Self(json!({ "row": row, "text": text.into(), "type": "error" }))
    }

    pub fn row(&self) -> Option<u64> {
        self.0.get("row").and_then(Value::as_u64)
    }

    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Annotation {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Interpreted render endpoint response.
///
/// A present `error` key wins over `data`, whatever its value; within errors,
/// a present `error_lines` key wins over the plain message. A success without
/// `data` renders as empty markup. Any JSON document decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RenderResponse {
    Rendered { html: String },
    ErrorWithLines { message: String, lines: Vec<Annotation> },
    Error { message: String },
}

impl From<Value> for RenderResponse {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::Rendered {
                html: String::new(),
            };
        };

        match (fields.remove("error"), fields.remove("error_lines")) {
            (Some(error), Some(lines)) => Self::ErrorWithLines {
                message: display_text(error),
                lines: annotation_list(lines),
            },
            (Some(error), None) => Self::Error {
                message: display_text(error),
            },
            (None, _) => Self::Rendered {
                html: fields.remove("data").map(display_text).unwrap_or_default(),
            },
        }
    }
}

impl From<RenderResponse> for Value {
    fn from(response: RenderResponse) -> Self {
        match response {
            RenderResponse::Rendered { html } => json!({ "data": html }),
            RenderResponse::ErrorWithLines { message, lines } => {
                json!({ "error": message, "error_lines": lines })
            }
            RenderResponse::Error { message } => json!({ "error": message }),
        }
    }
}

impl RenderResponse {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Rendered { .. })
    }
}

/// Strings as-is, `null` as empty, anything else as its JSON text.
fn display_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Arrays give one record per element, `null` gives none, and any other value
/// is passed on as a single record.
fn annotation_list(value: Value) -> Vec<Annotation> {
    match value {
        Value::Array(items) => items.into_iter().map(Annotation).collect(),
        Value::Null => Vec::new(),
        other => vec![Annotation(other)],
    }
}

/// Whether an action response body signals failure.
pub fn carries_error_code(body: &Value) -> bool {
    match body {
        Value::Object(map) => map.contains_key(ERROR_CODE_KEY),
        _ => false,
    }
}
