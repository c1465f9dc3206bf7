use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Form incomplete, missing fields: {}", .missing.join(", "))]
    IncompleteForm { missing: Vec<String> },

    #[error("Invalid value for {field}: {value}")]
    InvalidPayloadValue { field: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FormResult<T> = Result<T, FormError>;
