/// Failure taxonomy shared by every grimoire crate.
///
/// Transport, parse, and not-found failures never escape the loader or
/// lookup boundary; callers turn them into an empty result plus a
/// user-facing notification.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Parse(err.to_string())
    }
}
