use async_trait::async_trait;

use crate::dom::locators::submit_button_path;
use crate::dom::XPath;
use crate::errors::Result;

/// The live page the steps act upon.
///
/// Implementations own any waiting policy: `find` and `is_present` may wait
/// for the page to settle before giving up.
#[async_trait]
pub trait Page: Send + Sync {
    type Element: Send + Sync;

    /// Resolve the first element matching `path`.
    ///
    /// Fails with `DirectiveError::ElementNotFound` when nothing matches.
    async fn find(&self, path: &XPath) -> Result<Self::Element>;

    /// Whether at least one element matches `path`.
    async fn is_present(&self, path: &XPath) -> Result<bool>;

    /// Scroll the element into view and wait until it can be interacted with.
    async fn ensure_visible(&self, element: &Self::Element) -> Result<()>;

    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Locate a submit control by its visible label.
    async fn find_button(&self, label: &str) -> Result<Self::Element> {
        self.find(&submit_button_path(label)).await
    }
}
