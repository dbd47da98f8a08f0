use crate::error::{RedlineError, Result};
use crate::llm::types::*;
use crate::llm::LanguageModel;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// A client whose requests give up after `timeout`.
    pub fn with_timeout(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ..Self::new(api_key)
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: None,
            },
        };

        debug!(
            "Calling {} with a {} character prompt",
            self.model,
            prompt.len()
        );

        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(RedlineError::ModelCall(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        let text = body
            .candidates
            .ok_or_else(|| RedlineError::ModelCall("No candidates returned".to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| RedlineError::ModelCall("Empty candidates list".to_string()))?
            .content
            .parts
            .into_iter()
            .next()
            .ok_or_else(|| RedlineError::ModelCall("No parts in content".to_string()))?;

        match text {
            Part::Text { text } => Ok(text),
            Part::Other(_) => Err(RedlineError::ModelCall(
                "Model returned non-text content".to_string(),
            )),
        }
    }
}

impl LanguageModel for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        self.generate_content(prompt).boxed()
    }
}
