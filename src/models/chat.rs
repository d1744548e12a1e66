use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_ID: &str = "default";
pub const DEFAULT_RISK_APPETITE: &str = "High";
pub const DEFAULT_BUDGET_TYPE: &str = "Medium";
pub const DEFAULT_BUDGET_AMOUNT: f64 = 100000.0;

/// One exchange entry in a transcript
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTurn {
    User(String),
    Ai(String),
}

impl fmt::Display for ChatTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTurn::User(text) => write!(f, "You: {}", text),
            ChatTurn::Ai(text) => write!(f, "AI: {}", text),
        }
    }
}

/// Ordered log of chat turns. Only grows, except for [`Transcript::clear`].
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns = Vec::new();
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Newline-joined tagged turns, as sent to the model.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Risk and budget preferences substituted into the advisory prompt
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryParams {
    pub risk_appetite: String,
    pub budget_type: String,
    pub budget_amount: f64,
}

impl Default for AdvisoryParams {
    fn default() -> Self {
        Self {
            risk_appetite: DEFAULT_RISK_APPETITE.to_string(),
            budget_type: DEFAULT_BUDGET_TYPE.to_string(),
            budget_amount: DEFAULT_BUDGET_AMOUNT,
        }
    }
}

/// Body of `POST /generate`
///
/// Field names follow the wire format used by existing clients
/// (`risk_apetite` included).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub user_input: Option<String>,
    pub budget_amt: Option<f64>,
    pub budget_type: Option<String>,
    pub risk_apetite: Option<String>,
    pub session_id: Option<String>,
}

impl GenerateRequest {
    pub fn advisory_params(&self) -> AdvisoryParams {
        let defaults = AdvisoryParams::default();
        AdvisoryParams {
            risk_appetite: self.risk_apetite.clone().unwrap_or(defaults.risk_appetite),
            budget_type: self.budget_type.clone().unwrap_or(defaults.budget_type),
            budget_amount: self.budget_amt.unwrap_or(defaults.budget_amount),
        }
    }
}

/// Body of `POST /aayush-generate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenerateRequest {
    pub input: Option<String>,
    pub session_id: Option<String>,
}

/// Optional body of `POST /reset`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Resolve the transcript key for a request; blank ids fall back to the default session.
pub fn session_key(session_id: Option<&str>) -> &str {
    match session_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_SESSION_ID,
    }
}
