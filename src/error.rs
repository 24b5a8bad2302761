use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrazeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrazeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Unmappable value for key {key}: {value}")]
    UnmappableValue { key: String, value: String },
}

impl BrazeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn date_parse(message: impl Into<String>) -> Self {
        Self::DateParse(message.into())
    }

    pub fn unmappable(key: impl Into<String>, value: impl ToString) -> Self {
        Self::UnmappableValue {
            key: key.into(),
            value: value.to_string(),
        }
    }

    /// Adds context to an error for better debugging and error reporting
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::Configuration(message) => {
                Self::Configuration(format!("{}: {}", context, message))
            }
            Self::Serialization(message) => {
                Self::Serialization(format!("{}: {}", context, message))
            }
            Self::Validation(message) => Self::Validation(format!("{}: {}", context, message)),
            Self::DateParse(message) => Self::DateParse(format!("{}: {}", context, message)),
            // Key and value already identify the offending field
            Self::UnmappableValue { .. } => self,
        }
    }
}

impl From<serde_json::Error> for BrazeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for BrazeError {
    fn from(err: chrono::ParseError) -> Self {
        Self::DateParse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BrazeError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}
