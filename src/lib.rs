pub mod actions;
#[cfg(feature = "chrome")]
pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod steps;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::actions::{FieldAssignments, ProviderAction, ProviderState};
#[cfg(feature = "chrome")]
pub use crate::browser::{ChromeFieldSetter, ChromePage};
pub use crate::core::{Config, FieldSetter, Page, StringLookup, StringTable};
pub use crate::dom::{ProviderLocators, XPath};
pub use crate::errors::{DirectiveError, Result};
pub use crate::steps::ProviderSteps;
