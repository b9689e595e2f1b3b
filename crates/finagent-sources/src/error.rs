use thiserror::Error;

/// What a failed fetch was about, so the caller can still render the
/// result shape it would have returned, e.g. `{"ticker": "AAPL", "prices": []}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchContext {
    /// Field naming the subject, usually `ticker` or `query`.
    pub subject_field: &'static str,
    pub subject: String,
    /// Field that would have held the data.
    pub empty_field: &'static str,
    /// Placeholder for `empty_field`: `[]` for collections, `null` for scalars.
    pub empty_value: serde_json::Value,
}

impl FetchContext {
    pub fn collection(subject_field: &'static str, subject: &str, field: &'static str) -> Self {
        Self {
            subject_field,
            subject: subject.to_string(),
            empty_field: field,
            empty_value: serde_json::Value::Array(Vec::new()),
        }
    }

    pub fn scalar(subject_field: &'static str, subject: &str, field: &'static str) -> Self {
        Self {
            subject_field,
            subject: subject.to_string(),
            empty_field: field,
            empty_value: serde_json::Value::Null,
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Missing {key} environment variable")]
    MissingCredential { key: String },

    #[error("Request failed: {message}")]
    Transport {
        context: FetchContext,
        message: String,
    },

    #[error("API returned status code {status}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}
