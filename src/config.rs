use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    Reference,
    Upload,
}

impl OcrMode {
    pub fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("upload") {
            Self::Upload
        } else {
            Self::Reference
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub ocr_api_key: String,
    pub ocr_endpoint: String,
    pub ocr_mode: OcrMode,
    pub openai_api_key: String,
    pub openai_endpoint: String,
    pub openai_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let ocr_api_key = env::var("OCR_SPACE_KEY").unwrap_or_default();
        let ocr_endpoint = env::var("OCR_SPACE_ENDPOINT")
            .unwrap_or_else(|_| "https://api.ocr.space/parse/image".to_string());
        let ocr_mode = env::var("OCR_MODE")
            .map(|value| OcrMode::from_env_value(&value))
            .unwrap_or(OcrMode::Reference);

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_endpoint = env::var("OPENAI_ENDPOINT")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        Self {
            port,
            ocr_api_key,
            ocr_endpoint,
            ocr_mode,
            openai_api_key,
            openai_endpoint,
            openai_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OcrMode;

    #[test]
    fn ocr_mode_recognizes_upload() {
        assert_eq!(OcrMode::from_env_value("upload"), OcrMode::Upload);
        assert_eq!(OcrMode::from_env_value("UPLOAD"), OcrMode::Upload);
    }

    #[test]
    fn ocr_mode_defaults_to_reference() {
        assert_eq!(OcrMode::from_env_value("reference"), OcrMode::Reference);
        assert_eq!(OcrMode::from_env_value(""), OcrMode::Reference);
        assert_eq!(OcrMode::from_env_value("anything-else"), OcrMode::Reference);
    }
}
