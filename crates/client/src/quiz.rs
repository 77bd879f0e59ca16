//! Quiz question fetching with local fallback.

use grimoire_core::quiz::{select_questions, QuestionRecord};

use crate::api::ApiClient;
use crate::loader::RequestHandle;

/// Fetches quiz questions independently of character loads.
pub struct QuizClient {
    api: ApiClient,
}

impl QuizClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the round's questions.
    ///
    /// Uses the built-in set when the endpoint fails or returns nothing
    /// valid. Cancelling `handle` resolves to an empty list. The handle is
    /// the caller's own, so a character reload never cancels it.
    pub async fn fetch_questions(&self, handle: &RequestHandle) -> Vec<QuestionRecord> {
        let fetched = tokio::select! {
            biased;
            _ = handle.cancelled() => {
                tracing::debug!("Question fetch cancelled");
                return Vec::new();
            }
            result = self.api.get_questions() => result,
        };

        match fetched {
            Ok(questions) => {
                tracing::info!(count = questions.len(), "Fetched quiz questions");
                select_questions(questions)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Question endpoint unavailable, using built-in questions");
                select_questions(Vec::new())
            }
        }
    }
}
