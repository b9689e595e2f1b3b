use finagent_indicators::IndicatorError;
use finagent_sources::SourceError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Function {0} is not supported")]
    UnknownFunction(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn invalid(name: &str, reason: impl ToString) -> Self {
        HandlerError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Render as the response body returned to the agent for `function`.
    pub fn to_body(&self, function: &str) -> Value {
        match self {
            HandlerError::MissingParameters(_) | HandlerError::InvalidParameter { .. } => {
                Value::String(self.to_string())
            }
            HandlerError::UnknownFunction(_) => json!({
                "error": "Invalid function",
                "message": self.to_string(),
            }),
            HandlerError::Source(SourceError::MissingCredential { key }) => json!({
                "error": self.to_string(),
                "missing_config": key,
            }),
            HandlerError::Source(SourceError::Transport { context, message }) => {
                let mut body = serde_json::Map::new();
                body.insert(
                    context.subject_field.to_string(),
                    Value::String(context.subject.clone()),
                );
                body.insert(context.empty_field.to_string(), context.empty_value.clone());
                body.insert("error".to_string(), Value::String(message.clone()));
                Value::Object(body)
            }
            HandlerError::Source(SourceError::Status { .. }) => json!({
                "error": self.to_string(),
            }),
            HandlerError::Source(SourceError::Decode(_))
            | HandlerError::Indicator(_)
            | HandlerError::Internal(_) => json!({
                "error": self.to_string(),
                "message": format!("Failed to execute {function}"),
            }),
        }
    }
}
