use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("HTTP {status}: {text}")]
    Status { status: u16, text: String },

    #[error("Could not read response: {0}")]
    Decode(String),

    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Message suitable for the notification banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend(message) => message.clone(),
            ApiError::Status { status, .. } if *status == 404 => {
                "The server could not find that resource.".to_string()
            }
            _ => "Error loading data. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingField(&'static str),

    #[error("Amount must be a positive number.")]
    InvalidAmount(String),

    #[error("Date must be in YYYY-MM-DD format.")]
    InvalidDate(String),

    #[error("Please enter a valid URL starting with http:// or https://")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record has no id")]
    MissingId,

    #[error("record has a non-numeric id {0}")]
    InvalidId(String),

    #[error("record {id}: unparseable amount {raw}")]
    InvalidAmount { id: i64, raw: String },

    #[error("record {id}: unparseable date {raw}")]
    InvalidDate { id: i64, raw: String },

    #[error("record {id}: amount overflows running totals")]
    AmountOverflow { id: i64 },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
