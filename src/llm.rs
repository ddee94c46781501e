use std::error::Error;
use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::AppState;

const SYSTEM_PROMPT: &str = "You are a receipt parser. Extract item names and their prices from the receipt text. Also extract subtotal, tax, and total. Return as JSON.";
const TEMPERATURE: f64 = 0.3;

#[derive(Debug)]
pub enum CompletionError {
    Request(reqwest::Error),
    MalformedReply(reqwest::Error),
    EmptyReply,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => write!(f, "completion provider request failed: {err}"),
            Self::MalformedReply(err) => {
                write!(f, "completion provider reply was not valid: {err}")
            }
            Self::EmptyReply => write!(f, "completion provider returned no content"),
        }
    }
}

impl Error for CompletionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) | Self::MalformedReply(err) => Some(err),
            Self::EmptyReply => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub async fn extract_receipt(state: &AppState, text: &str) -> Result<String, CompletionError> {
    let payload = json!({
        "model": state.config.openai_model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": text }
        ],
        "temperature": TEMPERATURE,
    });

    let response = state
        .http
        .post(&state.config.openai_endpoint)
        .bearer_auth(&state.config.openai_api_key)
        .json(&payload)
        .send()
        .await
        .map_err(CompletionError::Request)?;

    let reply: ChatReply = response
        .json()
        .await
        .map_err(CompletionError::MalformedReply)?;

    debug!(choices = reply.choices.len(), "completion provider replied");

    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or(CompletionError::EmptyReply)
}

pub fn reply_to_json(reply: &str) -> Value {
    serde_json::from_str(reply).unwrap_or_else(|_| json!({ "raw": reply }))
}

#[cfg(test)]
mod tests {
    use super::reply_to_json;
    use serde_json::json;

    #[test]
    fn valid_json_reply_passes_through() {
        let parsed = reply_to_json(r#"{"items":[],"total":9.99}"#);
        assert_eq!(parsed, json!({"items": [], "total": 9.99}));
    }

    #[test]
    fn non_json_reply_is_wrapped_as_raw() {
        let parsed = reply_to_json("not json");
        assert_eq!(parsed, json!({"raw": "not json"}));
    }

    #[test]
    fn bare_scalar_reply_counts_as_json() {
        let parsed = reply_to_json("9.99");
        assert_eq!(parsed, json!(9.99));
    }
}
