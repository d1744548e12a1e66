use std::sync::Arc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::models::Transcript;

/// Thread-safe map of session id to conversation transcript.
///
/// Each transcript sits behind its own async mutex so a whole chat turn
/// (user append, model call, reply append) can hold it across the await.
#[derive(Clone, Default)]
pub struct TranscriptStore {
    sessions: Arc<DashMap<String, Arc<Mutex<Transcript>>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the transcript for `session_id`, created empty on first use.
    pub fn session(&self, session_id: &str) -> Arc<Mutex<Transcript>> {
        if let Some(entry) = self.sessions.get(session_id) {
            return entry.value().clone();
        }
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Empty the transcript for `session_id` and drop the session once no
    /// turn holds it. Unknown sessions are left untouched.
    ///
    /// Sessions that are never reset stay in the map for the life of the
    /// process.
    pub async fn reset(&self, session_id: &str) {
        let transcript = self.sessions.get(session_id).map(|entry| entry.value().clone());
        let Some(transcript) = transcript else {
            return;
        };
        transcript.lock().await.clear();
        drop(transcript);

        // A turn that started after the clear keeps the session alive.
        self.sessions.remove_if(session_id, |_, transcript| {
            Arc::strong_count(transcript) == 1
                && transcript.try_lock().map(|t| t.is_empty()).unwrap_or(false)
        });
    }

    /// Copy of the transcript for `session_id`, empty if the session does not exist.
    pub async fn snapshot(&self, session_id: &str) -> Transcript {
        let transcript = self.sessions.get(session_id).map(|entry| entry.value().clone());
        match transcript {
            Some(transcript) => transcript.lock().await.clone(),
            None => Transcript::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
