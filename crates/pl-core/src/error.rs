use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to open store: {message}")]
    Open { message: String },
    #[error("query failed: {message}")]
    Query { message: String },
    #[error("transaction failed: {message}")]
    Transaction { message: String },
    #[error("invalid stored row: {message}")]
    Decode { message: String },
}

#[derive(Debug, Error)]
pub enum PlayerLogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
