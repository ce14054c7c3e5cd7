use thiserror::Error;

use crate::actions::ProviderState;

#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("Invalid provider action: {0}")]
    InvalidAction(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Field labelled '{label}' not found in the edit form of '{entity}'")]
    FieldNotFound { label: String, entity: String },

    #[error("Element not visible: {0}")]
    ElementNotVisible(String),

    #[error("Expected provider '{entity}' to be {expected}")]
    StateAssertionFailed {
        entity: String,
        expected: ProviderState,
    },

    #[error("No string registered for key '{0}'")]
    MissingString(String),

    #[error("Invalid field table: {0}")]
    InvalidTable(String),

    #[error("Unsupported form field: {0}")]
    UnsupportedField(String),

    #[error("Cannot set field value: {0}")]
    FieldValue(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DirectiveError>;

// headless_chrome reports everything through anyhow
impl From<anyhow::Error> for DirectiveError {
    fn from(err: anyhow::Error) -> Self {
        DirectiveError::Browser(err.to_string())
    }
}

impl DirectiveError {
    /// True for failures where the page did not contain what the locator asked for.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DirectiveError::ElementNotFound(_) | DirectiveError::FieldNotFound { .. }
        )
    }
}
