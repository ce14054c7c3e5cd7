//! Step handlers a directive engine binds its phrases to.
//!
//! | Directive | Handler |
//! |-----------|---------|
//! | `I "toggle" "YouTube" provider` | [`ProviderSteps::perform_click_action`] |
//! | `the provider "YouTube" is enabled` | [`ProviderSteps::assert_enabled`] |
//! | `the provider "YouTube" is disabled` | [`ProviderSteps::assert_disabled`] |
//! | `I filter the provider list to "You"` | [`ProviderSteps::filter_list`] |
//! | `I edit the provider "Flickr" with the values:` | [`ProviderSteps::edit_entity`] |

use std::sync::Arc;

use crate::actions::{
    ActionDispatcher, FieldAssignments, FormFiller, ListFilter, ProviderState, StateAssertion,
};
use crate::core::{Config, FieldSetter, Page, StringLookup};
use crate::dom::ProviderLocators;
use crate::errors::Result;

pub struct ProviderSteps<P: Page> {
    dispatcher: ActionDispatcher<P>,
    state: StateAssertion<P>,
    filter: ListFilter<P>,
    form: FormFiller<P>,
}

impl<P: Page> ProviderSteps<P> {
    pub fn new(
        page: Arc<P>,
        fields: Arc<dyn FieldSetter<P>>,
        strings: Arc<dyn StringLookup>,
        config: &Config,
    ) -> Self {
        let locators = ProviderLocators::new(config.markup.clone());
        Self {
            dispatcher: ActionDispatcher::new(page.clone(), locators.clone()),
            state: StateAssertion::new(page.clone(), locators.clone()),
            filter: ListFilter::new(page.clone(), fields.clone(), locators.clone()),
            form: FormFiller::new(page, fields, strings, locators),
        }
    }

    /// Like [`ProviderSteps::new`], looking strings up in the config's table.
    pub fn with_config_strings(
        page: Arc<P>,
        fields: Arc<dyn FieldSetter<P>>,
        config: &Config,
    ) -> Self {
        Self::new(page, fields, Arc::new(config.strings.clone()), config)
    }

    pub async fn perform_click_action(&self, action: &str, provider: &str) -> Result<()> {
        self.dispatcher.perform_action(action, provider).await
    }

    pub async fn assert_enabled(&self, provider: &str) -> Result<()> {
        self.state.assert_enabled(provider).await
    }

    pub async fn assert_disabled(&self, provider: &str) -> Result<()> {
        self.state.assert_disabled(provider).await
    }

    pub async fn assert_state(&self, provider: &str, expected: ProviderState) -> Result<()> {
        self.state.assert_state(provider, expected).await
    }

    pub async fn filter_list(&self, text: &str) -> Result<()> {
        self.filter.filter_list(text).await
    }

    pub async fn edit_entity(&self, provider: &str, assignments: &FieldAssignments) -> Result<()> {
        self.form.edit_entity(provider, assignments).await
    }

    pub async fn wait_for_edit_form(&self, provider: &str) -> Result<()> {
        self.form.wait_for_edit_form(provider).await
    }
}
