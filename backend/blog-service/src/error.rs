use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Infrastructure and transport faults.
///
/// A missing post is not an `AppError`; see [`PostNotFound`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Reflection error: {0}")]
    Reflection(String),
}

/// Domain-level absence of a post.
///
/// Travels back to callers as a field on a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Post not found")]
pub struct PostNotFound {
    pub post_id: String,
}

impl PostNotFound {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<tonic_reflection::server::Error> for AppError {
    fn from(err: tonic_reflection::server::Error) -> Self {
        AppError::Reflection(err.to_string())
    }
}
