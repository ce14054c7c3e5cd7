use std::sync::Arc;
use tracing::{debug, info};

use crate::actions::ProviderAction;
use crate::core::Page;
use crate::dom::ProviderLocators;
use crate::errors::Result;

/// Clicks a provider's row-level action controls.
pub struct ActionDispatcher<P: Page> {
    page: Arc<P>,
    locators: ProviderLocators,
}

impl<P: Page> ActionDispatcher<P> {
    pub fn new(page: Arc<P>, locators: ProviderLocators) -> Self {
        Self { page, locators }
    }

    /// Parse `action` and click it for `provider`.
    ///
    /// An unknown action fails with `InvalidAction` before the page is touched.
    pub async fn perform_action(&self, action: &str, provider: &str) -> Result<()> {
        let action: ProviderAction = action.parse()?;
        self.perform(action, provider).await
    }

    pub async fn perform(&self, action: ProviderAction, provider: &str) -> Result<()> {
        let path = self.locators.provider_action(provider, action);
        info!("Clicking {} for provider '{}'", action, provider);
        debug!("Resolved action locator: {}", path);

        let node = self.page.find(&path).await?;
        self.page.ensure_visible(&node).await?;
        self.page.click(&node).await
    }
}
