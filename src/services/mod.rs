pub mod advisory_service;
pub mod chat_service;
pub mod llm_service;
pub mod mood_service;
pub mod transcript_store;
