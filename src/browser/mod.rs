pub mod chrome;
pub mod field;

pub use chrome::{ChromeElement, ChromePage};
pub use field::ChromeFieldSetter;
