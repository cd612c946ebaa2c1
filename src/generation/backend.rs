use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;

/// 生成后端错误
///
/// `Display` 输出即为展示给用户的失败原因
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("erreur réseau: {0}")]
    Http(#[from] reqwest::Error),
    #[error("le service a répondu {status}: {message}")]
    Api { status: u16, message: String },
    #[error("réponse mal formée: {0}")]
    MalformedResponse(String),
    #[error("réponse vide du service")]
    EmptyResponse,
}

/// 文本生成后端
///
/// 一次请求对应一次阻塞调用，超时策略由具体实现负责
pub trait TextGenerator: Send + Sync {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini REST 客户端
///
/// 调用 `models/{model}:generateContent`，返回第一个候选的全部文本
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 根据配置创建客户端
    ///
    /// 未配置 API key 时返回 `Ok(None)`，表示后端处于“未配置”状态
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, GenerationError> {
        match config.api_key() {
            Some(key) => Ok(Some(Self::new(
                key,
                config.api_base_url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?)),
            None => Ok(None),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let raw = response.text()?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }

        extract_text(&raw)
    }
}

/// 从错误响应体中取出服务端消息，不是标准格式时原样返回
fn error_message(raw: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(raw)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// 拼接第一个候选的所有文本片段
fn extract_text(raw: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "1. Expliquez...\n"}, {"text": "2. Décrivez..."}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;

        assert_eq!(extract_text(raw).unwrap(), "1. Expliquez...\n2. Décrivez...");
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        assert!(matches!(
            extract_text(r#"{"candidates": []}"#),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_text_malformed() {
        assert!(matches!(
            extract_text("<html>bad gateway</html>"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_message() {
        let raw = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(raw), "Quota exceeded");
        assert_eq!(error_message(" upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_api_error_display() {
        let err = GenerationError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "le service a répondu 403: API key not valid");
    }

    #[test]
    fn test_endpoint() {
        let client =
            GeminiClient::new("key", "https://example.test/v1beta/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
