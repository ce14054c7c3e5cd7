pub mod locators;
pub mod xpath;

pub use locators::{submit_button_path, ProviderLocators};
pub use xpath::{xpath_literal, Axis, NodeTest, Predicate, Step, XPath};
