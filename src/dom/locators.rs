//! Locators for the provider list.
//!
//! Every provider is a table row whose first cell holds an anchor with the
//! provider name, a `div` of action links and a details `div` with the edit
//! form:
//!
//! ```html
//! <td>
//!   <a href="...">YouTube</a>
//!   <div>
//!     <a class="filter-oembed-visibility"><img src=".../t/hide"></a>
//!     <a class="filter-oembed-edit"><img src=".../t/edit"></a>
//!   </div>
//!   <div class="oembed-provider-details"><form>...</form></div>
//! </td>
//! ```

use crate::actions::{ProviderAction, ProviderState};
use crate::core::MarkupConfig;
use crate::dom::xpath::{Predicate, XPath};

#[derive(Debug, Clone, Default)]
pub struct ProviderLocators {
    markup: MarkupConfig,
}

impl ProviderLocators {
    pub fn new(markup: MarkupConfig) -> Self {
        Self { markup }
    }

    pub fn markup(&self) -> &MarkupConfig {
        &self.markup
    }

    /// The table cell holding the provider named exactly `provider`.
    pub fn provider_cell(&self, provider: &str) -> XPath {
        XPath::anywhere("td").child("a").with_text(provider).parent("td")
    }

    /// Action link in the provider's control container whose class contains
    /// `action_class`.
    pub fn action_path(&self, provider: &str, action_class: &str) -> XPath {
        self.provider_cell(provider)
            .child("div")
            .child("a")
            .with_class(action_class)
    }

    pub fn marker_for(&self, action: ProviderAction) -> &str {
        match action {
            ProviderAction::Toggle => &self.markup.visibility_marker,
            ProviderAction::Edit => &self.markup.edit_marker,
        }
    }

    pub fn provider_action(&self, provider: &str, action: ProviderAction) -> XPath {
        self.action_path(provider, self.marker_for(action))
    }

    pub fn edit_form_path(&self, provider: &str) -> XPath {
        self.provider_cell(provider)
            .child("div")
            .with_class(&self.markup.details_class)
            .child("form")
    }

    /// The control belonging to the label containing `label` inside the
    /// provider's edit form.
    pub fn field_path(&self, provider: &str, label: &str) -> XPath {
        self.edit_form_path(provider).then(self.field_control(label))
    }

    /// Form control for `label`, relative to the form that contains it.
    fn field_control(&self, label: &str) -> XPath {
        XPath::default()
            .descendant("label")
            .containing_text(label)
            .parent("div")
            .parent("div")
            .child("div")
            .with_class(&self.markup.field_container_class)
            .child("*")
    }

    pub fn icon_token(&self, state: ProviderState) -> &str {
        match state {
            ProviderState::Enabled => &self.markup.enabled_icon,
            ProviderState::Disabled => &self.markup.disabled_icon,
        }
    }

    /// Visibility icon shown for a provider in `state`.
    pub fn visibility_icon_path(&self, provider: &str, state: ProviderState) -> XPath {
        self.provider_action(provider, ProviderAction::Toggle)
            .child("img")
            .filter(Predicate::attr_contains("src", self.icon_token(state)))
    }

    pub fn filter_input_path(&self) -> XPath {
        XPath::anywhere("input").filter(Predicate::attr_equals(
            "placeholder",
            self.markup.filter_placeholder.as_str(),
        ))
    }
}

/// Submit control labelled `label`, either an `<input type="submit">` value
/// or a `<button type="submit">` caption.
pub fn submit_button_path(label: &str) -> XPath {
    XPath::anywhere("*")
        .filter(Predicate::attr_equals("type", "submit"))
        .filter(Predicate::AnyOf(vec![
            Predicate::attr_equals("value", label),
            Predicate::NormalizedTextEquals(label.to_string()),
        ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locators() -> ProviderLocators {
        ProviderLocators::default()
    }

    #[test]
    fn test_toggle_path() {
        assert_eq!(
            locators()
                .provider_action("YouTube", ProviderAction::Toggle)
                .to_string(),
            "//td/a[text()='YouTube']/parent::td/div/a[contains(@class,'filter-oembed-visibility')]"
        );
    }

    #[test]
    fn test_edit_path() {
        assert_eq!(
            locators()
                .provider_action("Vimeo", ProviderAction::Edit)
                .to_string(),
            "//td/a[text()='Vimeo']/parent::td/div/a[contains(@class,'filter-oembed-edit')]"
        );
    }

    #[test]
    fn test_markers_never_cross() {
        let locators = locators();
        for provider in ["YouTube", "Vimeo", "Flickr", "Bob's Videos"] {
            let toggle = locators
                .provider_action(provider, ProviderAction::Toggle)
                .to_string();
            let edit = locators
                .provider_action(provider, ProviderAction::Edit)
                .to_string();
            assert!(toggle.contains("filter-oembed-visibility"));
            assert!(!toggle.contains("filter-oembed-edit"));
            assert!(edit.contains("filter-oembed-edit"));
            assert!(!edit.contains("filter-oembed-visibility"));
        }
    }

    #[test]
    fn test_provider_name_is_escaped() {
        let path = locators().provider_action("Bob's Videos", ProviderAction::Toggle);
        assert!(path.to_string().starts_with("//td/a[text()=\"Bob's Videos\"]"));
    }

    #[test]
    fn test_edit_form_path() {
        assert_eq!(
            locators().edit_form_path("Flickr").to_string(),
            "//td/a[text()='Flickr']/parent::td/div[contains(@class,'oembed-provider-details')]/form"
        );
    }

    #[test]
    fn test_field_path() {
        assert_eq!(
            locators().field_path("Flickr", "Width").to_string(),
            "//td/a[text()='Flickr']/parent::td/div[contains(@class,'oembed-provider-details')]/form\
             //label[contains(text(),'Width')]/parent::div/parent::div/div[contains(@class,'felement')]/*"
        );
    }

    #[test]
    fn test_visibility_icon_inverts_state() {
        let locators = locators();
        let enabled = locators
            .visibility_icon_path("Vimeo", ProviderState::Enabled)
            .to_string();
        let disabled = locators
            .visibility_icon_path("Vimeo", ProviderState::Disabled)
            .to_string();
        assert!(enabled.ends_with("/img[contains(@src,'t/hide')]"));
        assert!(disabled.ends_with("/img[contains(@src,'t/show')]"));
    }

    #[test]
    fn test_custom_markup() {
        let markup = MarkupConfig {
            edit_marker: "provider-edit".into(),
            ..Default::default()
        };
        let path = ProviderLocators::new(markup).provider_action("Vimeo", ProviderAction::Edit);
        assert!(path.to_string().ends_with("a[contains(@class,'provider-edit')]"));
    }

    #[test]
    fn test_filter_input_path() {
        assert_eq!(
            locators().filter_input_path().to_string(),
            "//input[@placeholder='Provider']"
        );
    }
}
