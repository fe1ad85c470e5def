//! Error types for the storehouse registry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorehouseError {
    #[error("Invalid manager configuration: {0}")]
    InvalidManagerConfig(String),
    #[error("Manager \"{0}\" already exists!")]
    ManagerAlreadyExists(String),
    #[error("Manager \"{0}\" not found")]
    ManagerNotFound(String),
    #[error("Property \"type\" with value \"{0}\" is not supported!")]
    ManagerTypeNotFound(String),
    #[error("{}", model_not_found_message(.model, .manager))]
    ModelNotFound {
        model: String,
        manager: Option<String>,
    },
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Failed to close {} connection(s), {closed} closed: {}", .failures.len(), .failures.join("; "))]
    CloseAllFailed {
        closed: usize,
        failures: Vec<String>,
    },
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

fn model_not_found_message(model: &str, manager: &Option<String>) -> String {
    match manager {
        Some(manager) => format!("Model \"{model}\" not found in manager \"{manager}\""),
        None => format!("Model \"{model}\" not found"),
    }
}

impl StorehouseError {
    /// Build a connection error from any displayable cause
    pub fn connection(cause: impl std::fmt::Display) -> Self {
        StorehouseError::ConnectionError(cause.to_string())
    }
}

impl From<serde_json::Error> for StorehouseError {
    fn from(error: serde_json::Error) -> Self {
        StorehouseError::InvalidManagerConfig(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for StorehouseError {
    fn from(error: config::ConfigError) -> Self {
        StorehouseError::ConfigurationError(error.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorehouseError {
    fn from(error: sqlx::Error) -> Self {
        StorehouseError::ConnectionError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorehouseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        assert_eq!(
            StorehouseError::ManagerAlreadyExists("main".to_string()).to_string(),
            "Manager \"main\" already exists!"
        );
        assert_eq!(
            StorehouseError::ManagerNotFound("default".to_string()).to_string(),
            "Manager \"default\" not found"
        );
        assert_eq!(
            StorehouseError::ManagerTypeNotFound("mongo".to_string()).to_string(),
            "Property \"type\" with value \"mongo\" is not supported!"
        );
    }

    #[test]
    fn test_model_not_found_with_and_without_manager() {
        let scoped = StorehouseError::ModelNotFound {
            model: "users".to_string(),
            manager: Some("main".to_string()),
        };
        assert_eq!(
            scoped.to_string(),
            "Model \"users\" not found in manager \"main\""
        );

        let unscoped = StorehouseError::ModelNotFound {
            model: "users".to_string(),
            manager: None,
        };
        assert_eq!(unscoped.to_string(), "Model \"users\" not found");
    }

    #[test]
    fn test_close_all_failed_lists_failures() {
        let error = StorehouseError::CloseAllFailed {
            closed: 1,
            failures: vec!["a: boom".to_string(), "b: bang".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Failed to close 2 connection(s), 1 closed: a: boom; b: bang"
        );
    }

    #[test]
    fn test_json_error_becomes_invalid_config() {
        let json_error = serde_json::from_str::<u32>("not a number").unwrap_err();
        let error: StorehouseError = json_error.into();
        assert!(matches!(error, StorehouseError::InvalidManagerConfig(_)));
    }
}
