use std::sync::Arc;
use tracing::{debug, info};

use crate::actions::ProviderState;
use crate::core::Page;
use crate::dom::ProviderLocators;
use crate::errors::{DirectiveError, Result};

/// Checks a provider's enabled state through its visibility icon.
///
/// The page shows the action on offer rather than the current state: an
/// enabled provider carries the "hide" icon, a disabled one the "show" icon.
pub struct StateAssertion<P: Page> {
    page: Arc<P>,
    locators: ProviderLocators,
}

impl<P: Page> StateAssertion<P> {
    pub fn new(page: Arc<P>, locators: ProviderLocators) -> Self {
        Self { page, locators }
    }

    pub async fn assert_state(&self, provider: &str, expected: ProviderState) -> Result<()> {
        let path = self.locators.visibility_icon_path(provider, expected);
        info!("Checking provider '{}' is {}", provider, expected);
        debug!("Resolved icon locator: {}", path);

        if self.page.is_present(&path).await? {
            Ok(())
        } else {
            Err(DirectiveError::StateAssertionFailed {
                entity: provider.to_string(),
                expected,
            })
        }
    }

    pub async fn assert_enabled(&self, provider: &str) -> Result<()> {
        self.assert_state(provider, ProviderState::Enabled).await
    }

    pub async fn assert_disabled(&self, provider: &str) -> Result<()> {
        self.assert_state(provider, ProviderState::Disabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    fn assertion() -> StateAssertion<FakePage> {
        StateAssertion::new(
            Arc::new(FakePage::provider_admin()),
            ProviderLocators::default(),
        )
    }

    #[tokio::test]
    async fn test_enabled_provider() {
        let assertion = assertion();
        assertion.assert_enabled("YouTube").await.unwrap();

        let err = assertion.assert_disabled("YouTube").await.unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::StateAssertionFailed { ref entity, expected: ProviderState::Disabled }
                if entity == "YouTube"
        ));
    }

    #[tokio::test]
    async fn test_disabled_provider_show_icon() {
        let assertion = assertion();
        assertion.assert_disabled("Vimeo").await.unwrap();

        let err = assertion.assert_enabled("Vimeo").await.unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::StateAssertionFailed { expected: ProviderState::Enabled, .. }
        ));
    }

    #[tokio::test]
    async fn test_hide_icon_fails_disabled_check() {
        let page = FakePage::from_html(
            r#"<table><tr><td><a>Vimeo</a><div>
                 <a class="filter-oembed-visibility"><img src="https://lms.test/pix/t/hide.png"></a>
               </div></td></tr></table>"#,
        );
        let assertion = StateAssertion::new(Arc::new(page), ProviderLocators::default());
        let err = assertion.assert_disabled("Vimeo").await.unwrap_err();
        assert!(matches!(err, DirectiveError::StateAssertionFailed { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_missing_provider_fails_assertion() {
        let err = assertion().assert_enabled("Dailymotion").await.unwrap_err();
        assert!(matches!(err, DirectiveError::StateAssertionFailed { .. }));
    }
}
