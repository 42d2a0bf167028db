use thiserror::Error;

/// Why a money value could not be constructed or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must be at least one cent")]
    BelowMinimum,

    #[error("amount {value} exceeds maximum supported value")]
    AboveMaximum { value: u64 },

    #[error("amount string is empty")]
    EmptyInput,

    #[error("negative amounts are not allowed")]
    NegativeNotAllowed,

    #[error("amount has {decimals} decimal digits, at most 2 are allowed")]
    TooManyDecimals { decimals: usize },

    #[error("amount contains non-numeric characters")]
    InvalidNumeric,

    #[error("amount string is not a valid decimal")]
    InvalidFormat,

    #[error("amount arithmetic overflowed")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum RemitError {
    #[error("no payment intent detected: {0}")]
    IntentNotDetected(String),

    #[error("no positive amount found in {0}")]
    AmountNotFound(&'static str),

    #[error("unsupported format '{0}'")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {message}")]
    Extraction { message: String, transient: bool },

    #[error("transcription rejected: {0}")]
    Transcription(String),

    #[error("validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemitError {
    /// Transient extraction failures (timeouts, connection drops) are the
    /// only failures the orchestrators will retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemitError::Extraction { transient: true, .. })
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        RemitError::Extraction {
            message: message.into(),
            transient: false,
        }
    }

    pub fn extraction_transient(message: impl Into<String>) -> Self {
        RemitError::Extraction {
            message: message.into(),
            transient: true,
        }
    }
}

pub type Result<T> = std::result::Result<T, RemitError>;
