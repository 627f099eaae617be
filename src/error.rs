use thiserror::Error;

/// Errors raised while constructing a request descriptor or session.
///
/// Deliberately small: transport failures, unexpected status codes, and
/// API-level errors never surface here. They are normalized into the
/// [`ApiResponse`](crate::ApiResponse) envelope so call sites branch on
/// `status` instead of catching errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request build error: {0}")]
    BuildError(String),

    #[error("duplicate header: {0}")]
    DuplicateHeader(String),

    #[error("configuration error: {0}")]
    Config(String),
}
