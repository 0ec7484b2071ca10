//! Chat-completions client for the hosted vision model

use crate::config::ApiConfig;
use crate::constants::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API communication error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API response contained no choices")]
    EmptyResponse,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: &'static str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

/// Build the single-user-message request carrying the fixed prompt and the
/// image as a base64 data URL.
pub fn build_request(data_url: String) -> ChatRequest {
    ChatRequest {
        model: VISION_MODEL,
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: ANALYSIS_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ],
        }],
        temperature: MODEL_TEMPERATURE,
        max_tokens: MODEL_MAX_TOKENS,
        top_p: MODEL_TOP_P,
    }
}

/// Pull the report text out of a parsed response.
pub fn extract_report(response: ChatResponse) -> Result<String, ApiError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(ApiError::EmptyResponse)
}

/// Perform one chat-completion call. No retries; failures surface as messages.
pub async fn generate_report(
    client: &reqwest::Client,
    config: &ApiConfig,
    data_url: String,
) -> Result<String, ApiError> {
    let request = build_request(data_url);
    debug!(model = VISION_MODEL, url = CHAT_COMPLETIONS_URL, "Sending analysis request");

    let response = client
        .post(CHAT_COMPLETIONS_URL)
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: ChatResponse = response.json().await?;
    let report = extract_report(parsed)?;
    info!(chars = report.len(), "Report received");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_openai_shape() {
        let request = build_request("data:image/png;base64,AAAA".into());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], VISION_MODEL);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(json["max_tokens"], 400);
    }

    #[test]
    fn extract_report_takes_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Findings: normal."}},
                {"message":{"role":"assistant","content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_report(response).unwrap(), "Findings: normal.");
    }

    #[test]
    fn extract_report_rejects_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_report(response), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn response_parsing_ignores_unknown_fields() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"cmpl-1","object":"chat.completion","usage":{"total_tokens":12},
                "choices":[{"index":0,"finish_reason":"stop",
                "message":{"role":"assistant","content":"ok"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_report(response).unwrap(), "ok");
    }
}
