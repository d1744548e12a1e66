mod chat;
mod mood;

pub use chat::{
    session_key, AdvisoryParams, ChatTurn, GenerateRequest, GenerateResponse, RawGenerateRequest,
    ResetRequest, ResetResponse, Transcript, DEFAULT_BUDGET_AMOUNT, DEFAULT_BUDGET_TYPE,
    DEFAULT_RISK_APPETITE, DEFAULT_SESSION_ID,
};
pub use mood::{MoodDistribution, MoodIndexRequest, MoodLabel, DEFAULT_MMI_SYMBOL};
