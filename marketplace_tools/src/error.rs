use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketplaceApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the marketplace backend: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
