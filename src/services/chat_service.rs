use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::ChatError;
use crate::models::{AdvisoryParams, ChatTurn, Transcript};
use crate::services::advisory_service::render_advisory_prompt;
use crate::services::llm_service::{GenerationParams, LlmProvider};
use crate::services::transcript_store::TranscriptStore;

/// Sampling temperature for templated advisory turns.
pub const ADVISORY_TEMPERATURE: f32 = 0.7;
/// Sampling temperature for raw transcript turns.
pub const RAW_TEMPERATURE: f32 = 0.9;

/// Transcript-backed chat dispatcher.
///
/// Every turn appends `You: ...` to the session transcript, sends the whole
/// transcript to the model and, on success, appends `AI: ...`.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn LlmProvider>,
    store: TranscriptStore,
    max_output_tokens: u32,
}

impl ChatService {
    pub fn new(provider: Arc<dyn LlmProvider>, store: TranscriptStore, max_output_tokens: u32) -> Self {
        Self {
            provider,
            store,
            max_output_tokens,
        }
    }

    pub fn store(&self) -> &TranscriptStore {
        &self.store
    }

    /// One advisory turn: the rendered instruction is appended after the transcript.
    pub async fn generate_advice(
        &self,
        session_id: &str,
        user_input: Option<&str>,
        params: &AdvisoryParams,
    ) -> Result<String, ChatError> {
        let user_input = require_input(user_input, "Please provide user_input in the JSON body.")?;
        let prompt = render_advisory_prompt(params);

        info!(
            "Advisory turn for session {} (risk: {}, budget: {} {})",
            session_id, params.risk_appetite, params.budget_type, params.budget_amount
        );

        self.dispatch(session_id, user_input, Some(prompt), ADVISORY_TEMPERATURE)
            .await
    }

    /// One raw turn: the transcript is sent as-is.
    pub async fn generate_raw(
        &self,
        session_id: &str,
        input: Option<&str>,
    ) -> Result<String, ChatError> {
        let input = require_input(input, "Please provide input in the JSON body.")?;
        info!("Raw turn for session {}", session_id);

        self.dispatch(session_id, input, None, RAW_TEMPERATURE).await
    }

    pub async fn reset(&self, session_id: &str) {
        self.store.reset(session_id).await;
        info!("Conversation history reset for session {}", session_id);
    }

    async fn dispatch(
        &self,
        session_id: &str,
        user_input: &str,
        instruction: Option<String>,
        temperature: f32,
    ) -> Result<String, ChatError> {
        let session = self.store.session(session_id);
        let mut transcript = session.lock().await;

        transcript.push(ChatTurn::User(user_input.to_string()));
        let outbound = build_outbound(&transcript, instruction.as_deref());

        let params = GenerationParams {
            max_output_tokens: self.max_output_tokens,
            temperature,
        };

        match self.provider.generate_completion(outbound, params).await {
            Ok(reply) => {
                transcript.push(ChatTurn::Ai(reply.clone()));
                info!("Session {} now holds {} turns", session_id, transcript.len());
                Ok(reply)
            }
            Err(e) => {
                let err = ChatError::from(e);
                match &err {
                    ChatError::EmptyModelResponse => {
                        warn!("Model returned an empty reply for session {}", session_id)
                    }
                    other => error!("Model call failed for session {}: {}", session_id, other),
                }
                Err(err)
            }
        }
    }
}

fn require_input<'a>(input: Option<&'a str>, message: &'static str) -> Result<&'a str, ChatError> {
    match input {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ChatError::MissingInput(message)),
    }
}

fn build_outbound(transcript: &Transcript, instruction: Option<&str>) -> String {
    match instruction {
        Some(instruction) => format!("{}\n{}", transcript.render(), instruction),
        None => transcript.render(),
    }
}
