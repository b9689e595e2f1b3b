use finagent_models::invocation::{
    ActionResponse, BodyStyle, FunctionResponse, InvocationEnvelope, ResponseBody,
    ResponseEnvelope, TextBody,
};
use serde::Serialize;
use tracing::error;

/// Wrap `body` in the response envelope for `invocation`.
///
/// Never fails: if `body` cannot be serialized, a string error body is
/// returned in its place.
pub fn build_response<T>(
    invocation: &InvocationEnvelope,
    body: &T,
    style: BodyStyle,
) -> ResponseEnvelope
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(body).unwrap_or_else(|e| {
        error!(function = %invocation.function, error = %e, "Failed to serialize response body");
        serde_json::Value::String(format!("Error serializing response: {e}"))
    });

    let response_body = match style {
        BodyStyle::Plain => ResponseBody::Plain(value),
        BodyStyle::Text => ResponseBody::Text {
            text: TextBody {
                body: value.to_string(),
            },
        },
    };

    ResponseEnvelope {
        response: ActionResponse {
            action_group: invocation.action_group.clone(),
            function: invocation.function.clone(),
            function_response: FunctionResponse { response_body },
        },
    }
}
