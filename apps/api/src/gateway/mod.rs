//! AI Gateway — the three screening prompts and their JSON contract.
//!
//! Every operation renders a template, makes one completion call, pulls the JSON
//! object out of the free-form answer and validates its shape. Nothing here
//! retries; a bad answer is a hard error for the operation that asked.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionModel, LlmError};

pub mod assessment;
pub mod criteria;
pub mod cv_parser;
pub mod prompts;

/// Output token budget for every screening call.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{operation}: unusable AI response: {reason}")]
    ResponseFormat {
        operation: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl GatewayError {
    fn format(operation: &'static str, reason: impl Into<String>) -> Self {
        GatewayError::ResponseFormat {
            operation,
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AiGateway {
    model: Arc<dyn CompletionModel>,
}

impl AiGateway {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Sends `prompt`, extracts the JSON object and deserializes it into `T`.
    /// The untouched JSON value is returned alongside for verbatim persistence.
    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        prompt: &str,
    ) -> Result<(T, Value), GatewayError> {
        let text = self
            .model
            .complete(JSON_ONLY_SYSTEM, prompt, MAX_OUTPUT_TOKENS)
            .await?;
        debug!("{operation}: received {} chars from model", text.len());

        let value = extract_json_object(&text).map_err(|reason| {
            warn!("{operation}: no JSON object in model response");
            GatewayError::format(operation, reason)
        })?;
        let typed = serde_json::from_value::<T>(value.clone())
            .map_err(|e| GatewayError::format(operation, format!("unexpected shape: {e}")))?;
        Ok((typed, value))
    }
}

/// Parses the substring between the first `{` and the last `}` of `text`.
/// Prose or code fences around the object are ignored.
pub fn extract_json_object(text: &str) -> Result<Value, String> {
    let start = text.find('{');
    let end = text.rfind('}');
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err("response contains no JSON object".to_string()),
    };
    serde_json::from_str::<Value>(&text[start..=end])
        .map_err(|e| format!("response JSON does not parse: {e}"))
}
