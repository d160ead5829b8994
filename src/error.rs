use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors raised by the persistence collaborator and the I/O around it
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Failed to reach the recipe service
    #[error("Failed to reach recipe service: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Recipe service returned {status}: {body}")]
    ServerError { status: u16, body: String },

    /// The service answered with a body we could not decode
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No recipe with the given id exists
    #[error("Recipe {0} not found")]
    NotFound(u64),

    /// Failed to read a local file (e.g. an image attachment)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to encode a request payload
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Outcome of a rejected `RecipeForm::submit`
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The draft did not pass validation; nothing was sent
    #[error("Recipe draft has {} invalid field(s)", .0.len())]
    Invalid(ValidationErrors),

    /// The collaborator failed; the draft was left untouched for a retry
    #[error("Ошибка соединения с сервером")]
    Connection(#[source] RecipeError),
}
