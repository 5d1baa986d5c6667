// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marketplace assistant gateway.

use super::api::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{ChatMessage, ChatReply};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Suggestions offered when the server cannot provide any.
pub const FALLBACK_SUGGESTIONS: [&str; 3] =
    ["Show me available cars", "Cars in Delhi", "SUVs available"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageRequest<'a> {
    message: &'a str,
    conversation_history: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Gateway for `/chatbot` endpoints.
#[derive(Clone)]
pub struct ChatService {
    client: ApiClient,
}

impl ChatService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Send a message along with the prior conversation.
    pub async fn send_message(&self, message: &str, history: &[ChatMessage]) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ApiError::Validation("Message cannot be empty".to_string()));
        }

        let body = MessageRequest {
            message,
            conversation_history: history,
        };
        self.client
            .send_json(self.client.request(Method::POST, "/chatbot/message").json(&body))
            .await
    }

    /// Quick-reply suggestions. Never fails: falls back to built-in prompts.
    pub async fn suggestions(&self) -> Vec<String> {
        let result: Result<SuggestionsResponse> = self
            .client
            .send_json(self.client.request(Method::GET, "/chatbot/suggestions"))
            .await;

        match result {
            Ok(response) if !response.suggestions.is_empty() => response.suggestions,
            Ok(_) => fallback_suggestions(),
            Err(e) => {
                tracing::debug!(error = %e, "Using fallback chat suggestions");
                fallback_suggestions()
            }
        }
    }
}

fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}
