use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::page::Page;
use crate::errors::Result;

/// Assigns a value to whatever form control an element turns out to be.
#[async_trait]
pub trait FieldSetter<P: Page>: Send + Sync {
    async fn set_field(&self, page: &P, element: &P::Element, value: &str) -> Result<()>;
}

/// Form control families a field setter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    TextArea,
    Select,
    Checkbox,
    Radio,
    Unsupported,
}

impl FieldKind {
    /// Classify a control from its tag name and `type` attribute.
    pub fn detect(tag: &str, input_type: Option<&str>) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "textarea" => FieldKind::TextArea,
            "select" => FieldKind::Select,
            "input" => {
                let input_type = input_type.unwrap_or("text").to_ascii_lowercase();
                match input_type.as_str() {
                    "checkbox" => FieldKind::Checkbox,
                    "radio" => FieldKind::Radio,
                    "submit" | "button" | "reset" | "image" | "file" | "hidden" => {
                        FieldKind::Unsupported
                    }
                    _ => FieldKind::Text,
                }
            }
            _ => FieldKind::Unsupported,
        }
    }

    /// Interpret a table value as the desired checked state of a checkbox.
    pub fn parse_checked(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "checked"
        )
    }
}
