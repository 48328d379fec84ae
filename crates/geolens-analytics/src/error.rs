use thiserror::Error;

/// Failure of an external query-idea generator.
///
/// The suggestion engine treats every variant as "generator unavailable" and
/// falls back; it never propagates these.
#[derive(Debug, Error)]
pub enum IdeaSourceError {
    #[error("query idea generator is not configured")]
    Unavailable,

    #[error("query idea generator failed: {0}")]
    Generator(String),
}
