pub mod dispatcher;
pub mod filter;
pub mod form;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DirectiveError;

pub use dispatcher::ActionDispatcher;
pub use filter::ListFilter;
pub use form::{FieldAssignments, FormFiller};
pub use state::StateAssertion;

/// Row-level controls a directive can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderAction {
    Toggle,
    Edit,
}

impl ProviderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderAction::Toggle => "toggle",
            ProviderAction::Edit => "edit",
        }
    }
}

impl FromStr for ProviderAction {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle" => Ok(ProviderAction::Toggle),
            "edit" => Ok(ProviderAction::Edit),
            other => Err(DirectiveError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    Enabled,
    Disabled,
}

impl From<bool> for ProviderState {
    fn from(enabled: bool) -> Self {
        if enabled {
            ProviderState::Enabled
        } else {
            ProviderState::Disabled
        }
    }
}

impl fmt::Display for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderState::Enabled => f.write_str("enabled"),
            ProviderState::Disabled => f.write_str("disabled"),
        }
    }
}
