pub mod config;
pub mod field;
pub mod page;
pub mod strings;

pub use config::{Config, MarkupConfig, SessionConfig};
pub use field::{FieldKind, FieldSetter};
pub use page::Page;
pub use strings::{StringLookup, StringTable};
