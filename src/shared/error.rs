use thiserror::Error;
use serde::Serialize;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unit '{unit}' belongs to {actual}, not {expected}")]
    CategoryMismatch {
        unit: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Invalid Rate: {0}")]
    InvalidRate(String),

    #[error("Timezone Error: {0}")]
    Timezone(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Storage Error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(AppError::UnknownUnit("parsec".into())).unwrap();
        assert_eq!(json["type"], "UnknownUnit");
        assert_eq!(json["message"], "parsec");
    }
}
