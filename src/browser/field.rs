use async_trait::async_trait;
use headless_chrome::Element;
use serde_json::{json, Value};
use tracing::debug;

use crate::browser::chrome::{ChromeElement, ChromePage};
use crate::core::{FieldKind, FieldSetter};
use crate::errors::{DirectiveError, Result};

const DESCRIBE_JS: &str = r#"
    function() {
        return this.tagName.toLowerCase() + '|' + (this.getAttribute('type') || '');
    }
"#;

const SET_TEXT_JS: &str = r#"
    function(value) {
        this.focus();
        this.value = value;
        this.dispatchEvent(new Event('input', { bubbles: true }));
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
"#;

const SET_SELECT_JS: &str = r#"
    function(value) {
        const option = Array.from(this.options)
            .find(o => o.value === value || o.text.trim() === value);
        if (!option) return false;
        this.value = option.value;
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
"#;

const SET_CHECKED_JS: &str = r#"
    function(checked) {
        if (this.checked !== checked) {
            this.click();
        }
        return true;
    }
"#;

/// Sets form controls on a [`ChromePage`] according to their kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeFieldSetter;

impl ChromeFieldSetter {
    fn kind_of(node: &Element<'_>) -> Result<FieldKind> {
        let description = node
            .call_js_fn(DESCRIBE_JS, vec![], false)?
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let (tag, input_type) = description.split_once('|').unwrap_or((description.as_str(), ""));
        let input_type = (!input_type.is_empty()).then_some(input_type);
        Ok(FieldKind::detect(tag, input_type))
    }

    fn call(node: &Element<'_>, script: &str, arg: Value) -> Result<bool> {
        let result = node.call_js_fn(script, vec![arg], false)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl FieldSetter<ChromePage> for ChromeFieldSetter {
    async fn set_field(&self, page: &ChromePage, element: &ChromeElement, value: &str) -> Result<()> {
        let node = page.resolve(element)?;
        let kind = Self::kind_of(&node)?;
        debug!("Setting {:?} field {} to '{}'", kind, element.xpath(), value);

        let applied = match kind {
            FieldKind::Text | FieldKind::TextArea => Self::call(&node, SET_TEXT_JS, json!(value))?,
            FieldKind::Select => Self::call(&node, SET_SELECT_JS, json!(value))?,
            FieldKind::Checkbox => {
                Self::call(&node, SET_CHECKED_JS, json!(FieldKind::parse_checked(value)))?
            }
            FieldKind::Radio => {
                if !FieldKind::parse_checked(value) {
                    return Err(DirectiveError::FieldValue(
                        "a radio button can only be selected, not cleared".to_string(),
                    ));
                }
                Self::call(&node, SET_CHECKED_JS, json!(true))?
            }
            FieldKind::Unsupported => {
                return Err(DirectiveError::UnsupportedField(element.xpath().to_string()));
            }
        };

        if applied {
            Ok(())
        } else {
            Err(DirectiveError::FieldValue(format!(
                "'{}' rejected by {}",
                value,
                element.xpath()
            )))
        }
    }
}
