use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::types::{ChatRequest, ChatResponse, PredictResponse, UploadPayload};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// The two backend calls the page makes. Injected so the controllers can be
/// driven without a network.
#[async_trait(?Send)]
pub trait LensBackend {
    async fn predict(&self, upload: &UploadPayload) -> ApiResult<PredictResponse>;

    async fn chat(&self, message: &str) -> ApiResult<ChatResponse>;
}

pub struct HttpBackend {
    client: Client,
    predict_url: String,
    chat_url: String,
}

impl HttpBackend {
    pub fn new(predict_url: impl Into<String>, chat_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            predict_url: predict_url.into(),
            chat_url: chat_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.predict_url(), config.chat_url())
    }
}

#[async_trait(?Send)]
impl LensBackend for HttpBackend {
    async fn predict(&self, upload: &UploadPayload) -> ApiResult<PredictResponse> {
        let image = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let form = Form::new()
            .part("image", image)
            .text("choice", upload.mode.as_str());

        debug!(
            bytes = upload.bytes.len(),
            mode = %upload.mode,
            "posting image for classification"
        );
        let res = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body_text = res.text().await?;
        decode_body(status, &body_text)
    }

    async fn chat(&self, message: &str) -> ApiResult<ChatResponse> {
        debug!(chars = message.chars().count(), "posting chat message");
        let res = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = res.status().as_u16();
        let body_text = res.text().await?;
        decode_body(status, &body_text)
    }
}

/// Decode a JSON body regardless of HTTP status.
///
/// The backend answers validation failures with 4xx/5xx and a
/// `{ "success": false, "error": ... }` body, which the page must show, so
/// status alone never decides the outcome.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    serde_json::from_str::<T>(body).map_err(|err| {
        warn!(status, %err, "backend returned an undecodable body");
        ApiError::Decode {
            status,
            reason: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultKind;

    #[test]
    fn test_decode_error_body_with_failure_status() {
        let parsed: PredictResponse =
            decode_body(400, r#"{"success": false, "error": "Missing image"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Missing image"));
        assert_eq!(parsed.message, "");
    }

    #[test]
    fn test_decode_html_error_page() {
        let err = decode_body::<ChatResponse>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { status: 502, .. }));
    }

    #[test]
    fn test_decode_localized_kind() {
        let parsed: PredictResponse = decode_body(
            200,
            r#"{"success": true, "low_confidence": false, "confidence": 0.93,
                "class_name": "Chợ Bến Thành", "kind": "địa điểm", "message": "**Hi**"}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, Some(ResultKind::Place));
        assert_eq!(parsed.confidence, Some(0.93));
    }
}
