use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ChatError;

/// Shown when the request could not complete at all
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";

/// Shown when an error body is missing or is not JSON
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Shown when an error body is JSON but carries no usable detail
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message to `POST /chat` and return the assistant reply.
    ///
    /// The caller is expected to have trimmed `message` already.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        let url = format!("{}/chat", self.base_url);
        debug!(%url, chars = message.chars().count(), "sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable body is treated the same as an unparsable one
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(&body);
            warn!(status = status.as_u16(), %detail, "chat request rejected");
            return Err(ChatError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Decode(e.to_string()))?;
        Ok(chat_response.response)
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<Health, ChatError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Server {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ChatError::Decode(e.to_string()))
    }
}

/// Extract the human-readable detail from an error body.
///
/// Falsy details (`null`, `""`, `false`, `0`) and bodies without a `detail`
/// key fall back to [`GENERIC_FAILURE`]; non-JSON bodies to [`UNKNOWN_ERROR`].
/// Structured details (validation error lists) are shown as their JSON text.
fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return UNKNOWN_ERROR.to_string();
    };

    match value.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(detail @ (Value::Array(_) | Value::Object(_))) => detail.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}
