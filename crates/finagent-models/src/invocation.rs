use serde::{Deserialize, Deserializer, Serialize};

/// A single named argument supplied by the agent platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    /// Type hint from the action group schema ("string", "integer", ...). Informational only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Always text. Numbers and booleans are kept in their JSON spelling;
    /// `null` or an absent value is empty.
    #[serde(default, deserialize_with = "value_as_text")]
    pub value: String,
}

fn value_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// One tool invocation as delivered by the agent platform.
///
/// Consumed once by a handler and never persisted. Missing top-level fields
/// deserialize to empty values so a malformed event still yields a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEnvelope {
    #[serde(default)]
    pub action_group: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl InvocationEnvelope {
    pub fn new(action_group: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            action_group: action_group.into(),
            function: function.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter, keeping insertion order.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            kind: None,
            value: value.into(),
        });
        self
    }
}

/// How a handler family wraps its body inside `functionResponse.responseBody`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyStyle {
    /// The JSON body is placed directly in `responseBody`.
    #[default]
    Plain,
    /// `responseBody` is `{"TEXT": {"body": "<json string>"}}`.
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResponseBody {
    Text {
        #[serde(rename = "TEXT")]
        text: TextBody,
    },
    Plain(serde_json::Value),
}

impl ResponseBody {
    /// Decode the body back into JSON regardless of wrapping style.
    ///
    /// A `TEXT` body that is not valid JSON is returned as a JSON string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResponseBody::Plain(value) => value.clone(),
            ResponseBody::Text { text } => serde_json::from_str(&text.body)
                .unwrap_or_else(|_| serde_json::Value::String(text.body.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

/// The outbound envelope, correlated to its invocation by action group and function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    pub response: ActionResponse,
}

impl ResponseEnvelope {
    pub fn action_group(&self) -> &str {
        &self.response.action_group
    }

    pub fn function(&self) -> &str {
        &self.response.function
    }

    pub fn body_json(&self) -> serde_json::Value {
        self.response.function_response.response_body.to_json()
    }
}
