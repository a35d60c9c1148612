use serde_json::Value;

const FALLBACK_REPLY: &str = "Okay!";

/// Pull the assistant's reply out of a `POST /chat/{deviceId}` response.
///
/// The service answers `{ success, message, data: { response } }`; older
/// builds used a top-level `reply`.
pub fn reply_text(response: &Value) -> String {
    let candidates = [
        response.pointer("/data/response"),
        response.get("reply"),
        response.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}
