//! Advisory client: short stage facts and a streaming chat guide.
//!
//! [`Advisor`] is the seam the UI talks to. Every method is total: missing
//! credentials and backend failures come back as fixed display strings,
//! never as errors. [`GeminiAdvisor`] is the live implementation over the
//! blocking `reqwest` client; callers run it on worker threads.

use std::io::BufReader;

use crate::engine::chat::{ChatMessage, Role};
use crate::stage::Stage;

use super::config::AdvisorConfig;
use super::error::AdvisorError;
use super::stream::read_sse_chunks;
use super::wire::{Content, GenerateRequest, GenerateResponse, WireRole};

pub const FACT_MISSING_KEY: &str = "AI service unavailable (Missing API Key).";
pub const FACT_FAILED: &str = "Unable to retrieve cosmic data at this moment.";
pub const FACT_EMPTY: &str = "No response generated.";
pub const CHAT_MISSING_KEY: &str = "Error: API Key missing.";
pub const CHAT_FAILED: &str = "Communication link with Deep Space Network failed.";

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are 'Pulsar', an AI guide specializing in \
neutron stars and astrophysics. Keep answers scientifically accurate but accessible. \
Keep responses relatively brief.";

/// Text service used by the info panel and the chat widget.
pub trait Advisor: Send + Sync {
    /// A fun fact about `stage`, under ~60 words.
    fn stage_fact(&self, stage: Stage) -> String;

    /// Answer a free-text question in the context of `stage`, under ~100 words.
    fn stage_answer(&self, stage: Stage, question: &str) -> String;

    /// Stream a chat reply to `message`.
    ///
    /// `on_chunk` is called once per fragment, in arrival order. On failure
    /// exactly one chunk holding a fixed error string is delivered, then the
    /// call returns. There is no separate error channel.
    fn stream_chat(&self, history: &[ChatMessage], message: &str, on_chunk: &mut dyn FnMut(&str));
}

// ── Prompts ──

fn base_prompt(stage: Stage) -> String {
    format!(
        "You are an expert astrophysicist explaining stellar evolution to a student. \n  \
         The current visual context is: {}.",
        stage.prompt_name()
    )
}

/// Prompt for [`Advisor::stage_fact`].
pub fn fact_prompt(stage: Stage) -> String {
    format!(
        "{}\n\nProvide a concise, fascinating fun fact about this specific stage of formation (under 60 words).",
        base_prompt(stage)
    )
}

/// Prompt for [`Advisor::stage_answer`].
pub fn question_prompt(stage: Stage, question: &str) -> String {
    format!(
        "{}\n\nThe user asks: \"{}\". Keep the answer concise (under 100 words) and engaging.",
        base_prompt(stage),
        question
    )
}

/// Convert the transcript into role-tagged turns.
///
/// Turns before the first user message (the greeting) and empty texts are
/// dropped so the conversation opens with a user turn.
pub fn history_contents(history: &[ChatMessage]) -> Vec<Content> {
    history
        .iter()
        .skip_while(|m| m.role != Role::User)
        .filter(|m| !m.text.trim().is_empty())
        .map(|m| {
            let role = match m.role {
                Role::User => WireRole::User,
                Role::Model => WireRole::Model,
            };
            Content::text(Some(role), &m.text)
        })
        .collect()
}

// ── Live backend ──

/// Advisor backed by a Gemini-compatible REST API.
pub struct GeminiAdvisor {
    config: AdvisorConfig,
    client: reqwest::blocking::Client,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("pulsar-genesis/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdvisorError::Config(format!("HTTP client: {}", e)))?;

        if !config.has_credential() {
            log::warn!("API_KEY is missing from environment variables; AI features degraded");
        }
        log::info!("Advisor: model={} url={}", config.model, config.api_url);

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, AdvisorError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(AdvisorError::MissingCredential)
    }

    fn post(
        &self,
        method: &str,
        sse: bool,
        body: &GenerateRequest,
    ) -> Result<reqwest::blocking::Response, AdvisorError> {
        let key = self.api_key()?;
        let mut url = self.config.endpoint(method)?;
        if sse {
            url.query_pairs_mut().append_pair("alt", "sse");
        }

        log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// One-shot generation for `prompt`.
    pub fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some(WireRole::User), prompt)],
            system_instruction: None,
        };
        let response = self.post("generateContent", false, &request)?;
        let parsed: GenerateResponse = response.json()?;
        if let Some(err) = parsed.error {
            return Err(AdvisorError::Backend(err.message));
        }
        Ok(parsed.text())
    }

    /// Streamed chat generation. Returns the number of fragments delivered.
    pub fn stream(
        &self,
        history: &[ChatMessage],
        message: &str,
        on_chunk: &mut dyn FnMut(&str),
    ) -> Result<usize, AdvisorError> {
        let mut contents = history_contents(history);
        contents.push(Content::text(Some(WireRole::User), message));
        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content::text(None, CHAT_SYSTEM_INSTRUCTION)),
        };
        let response = self.post("streamGenerateContent", true, &request)?;
        read_sse_chunks(BufReader::new(response), |chunk| on_chunk(chunk))
    }

    fn one_shot_or_fallback(&self, prompt: &str) -> String {
        match self.generate(prompt) {
            Ok(text) if text.trim().is_empty() => FACT_EMPTY.to_string(),
            Ok(text) => text,
            Err(AdvisorError::MissingCredential) => FACT_MISSING_KEY.to_string(),
            Err(e) => {
                log::error!("Advisor request failed: {}", e);
                FACT_FAILED.to_string()
            }
        }
    }
}

impl Advisor for GeminiAdvisor {
    fn stage_fact(&self, stage: Stage) -> String {
        self.one_shot_or_fallback(&fact_prompt(stage))
    }

    fn stage_answer(&self, stage: Stage, question: &str) -> String {
        self.one_shot_or_fallback(&question_prompt(stage, question))
    }

    fn stream_chat(&self, history: &[ChatMessage], message: &str, on_chunk: &mut dyn FnMut(&str)) {
        match self.stream(history, message, on_chunk) {
            Ok(n) => log::debug!("Chat stream finished after {} chunks", n),
            Err(AdvisorError::MissingCredential) => on_chunk(CHAT_MISSING_KEY),
            Err(e) => {
                log::error!("Chat error: {}", e);
                on_chunk(CHAT_FAILED);
            }
        }
    }
}
