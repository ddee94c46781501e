use std::error::Error;
use std::fmt;

use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::AppState;

const OCR_ENGINE: &str = "2";
const DEFAULT_FILETYPE: &str = "JPG";
const FALLBACK_ERROR_MESSAGE: &str = "OCR processing error";

#[derive(Debug)]
pub enum OcrError {
    ImageFetch(reqwest::Error),
    ImageFetchStatus(reqwest::StatusCode),
    Request(reqwest::Error),
    MalformedReply(reqwest::Error),
    Processing(String),
}

impl fmt::Display for OcrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageFetch(err) => write!(f, "failed to fetch image: {err}"),
            Self::ImageFetchStatus(status) => {
                write!(f, "image fetch returned status {status}")
            }
            Self::Request(err) => write!(f, "OCR provider request failed: {err}"),
            Self::MalformedReply(err) => write!(f, "OCR provider reply was not valid: {err}"),
            Self::Processing(message) => write!(f, "OCR provider processing error: {message}"),
        }
    }
}

impl Error for OcrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ImageFetch(err) | Self::Request(err) | Self::MalformedReply(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OcrSpaceReply {
    #[serde(rename = "ParsedResults", default)]
    pub parsed_results: Vec<OcrParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    pub is_errored_on_processing: bool,
    // ocr.space sends ErrorMessage as either a string or an array of strings
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct OcrParsedResult {
    #[serde(rename = "ParsedText", default)]
    pub parsed_text: String,
}

impl OcrSpaceReply {
    pub fn error_message(&self) -> String {
        match &self.error_message {
            Some(Value::String(message)) if !message.trim().is_empty() => message.clone(),
            Some(Value::Array(parts)) => {
                let joined = parts
                    .iter()
                    .filter_map(|part| part.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                if joined.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    joined
                }
            }
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn first_parsed_text(&self) -> String {
        self.parsed_results
            .first()
            .map(|result| result.parsed_text.clone())
            .unwrap_or_default()
    }
}

pub async fn recognize_by_reference(
    state: &AppState,
    image_url: &str,
    filetype: Option<&str>,
) -> Result<String, OcrError> {
    let form = [
        ("url", image_url),
        ("OCREngine", OCR_ENGINE),
        ("filetype", filetype.unwrap_or(DEFAULT_FILETYPE)),
    ];

    let response = state
        .http
        .post(&state.config.ocr_endpoint)
        .header("apikey", &state.config.ocr_api_key)
        .form(&form)
        .send()
        .await
        .map_err(OcrError::Request)?;

    interpret_reply(response).await
}

pub async fn recognize_by_upload(state: &AppState, image_url: &str) -> Result<String, OcrError> {
    let image = state
        .http
        .get(image_url)
        .send()
        .await
        .map_err(OcrError::ImageFetch)?;

    if !image.status().is_success() {
        return Err(OcrError::ImageFetchStatus(image.status()));
    }

    let bytes = image.bytes().await.map_err(OcrError::ImageFetch)?;

    let file = multipart::Part::bytes(bytes.to_vec()).file_name("receipt");
    let form = multipart::Form::new()
        .text("OCREngine", OCR_ENGINE)
        .part("file", file);

    let response = state
        .http
        .post(&state.config.ocr_endpoint)
        .header("apikey", &state.config.ocr_api_key)
        .multipart(form)
        .send()
        .await
        .map_err(OcrError::Request)?;

    interpret_reply(response).await
}

async fn interpret_reply(response: reqwest::Response) -> Result<String, OcrError> {
    let reply: OcrSpaceReply = response.json().await.map_err(OcrError::MalformedReply)?;

    debug!(
        errored = reply.is_errored_on_processing,
        results = reply.parsed_results.len(),
        "OCR provider replied"
    );

    if reply.is_errored_on_processing {
        return Err(OcrError::Processing(reply.error_message()));
    }

    Ok(reply.first_parsed_text())
}

#[cfg(test)]
mod tests {
    use super::OcrSpaceReply;

    #[test]
    fn extracts_first_parsed_text() {
        let reply: OcrSpaceReply = serde_json::from_str(
            r#"{
                "ParsedResults": [
                    {"ParsedText": "TOTAL 9.99"},
                    {"ParsedText": "ignored"}
                ],
                "IsErroredOnProcessing": false
            }"#,
        )
        .unwrap();

        assert!(!reply.is_errored_on_processing);
        assert_eq!(reply.first_parsed_text(), "TOTAL 9.99");
    }

    #[test]
    fn missing_parsed_results_defaults_to_empty_text() {
        let reply: OcrSpaceReply =
            serde_json::from_str(r#"{"IsErroredOnProcessing": false}"#).unwrap();

        assert_eq!(reply.first_parsed_text(), "");
    }

    #[test]
    fn error_message_as_string() {
        let reply: OcrSpaceReply = serde_json::from_str(
            r#"{
                "IsErroredOnProcessing": true,
                "ErrorMessage": "Unable to recognize the file type"
            }"#,
        )
        .unwrap();

        assert!(reply.is_errored_on_processing);
        assert_eq!(reply.error_message(), "Unable to recognize the file type");
    }

    #[test]
    fn error_message_as_array_is_joined() {
        let reply: OcrSpaceReply = serde_json::from_str(
            r#"{
                "IsErroredOnProcessing": true,
                "ErrorMessage": ["E216: file not found", "timed out"]
            }"#,
        )
        .unwrap();

        assert_eq!(reply.error_message(), "E216: file not found; timed out");
    }

    #[test]
    fn missing_error_message_falls_back() {
        let reply: OcrSpaceReply =
            serde_json::from_str(r#"{"IsErroredOnProcessing": true}"#).unwrap();

        assert_eq!(reply.error_message(), "OCR processing error");
    }
}
