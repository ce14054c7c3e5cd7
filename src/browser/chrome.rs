use async_trait::async_trait;
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::util::Timeout;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::core::{Config, Page, SessionConfig};
use crate::dom::XPath;
use crate::errors::{DirectiveError, Result};

const VISIBILITY_JS: &str = r#"
    function() {
        this.scrollIntoView({ block: 'center', inline: 'nearest' });
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return rect.width > 0 &&
               rect.height > 0 &&
               style.visibility !== 'hidden' &&
               style.display !== 'none' &&
               parseFloat(style.opacity) > 0;
    }
"#;

/// Whether a driver error only means the XPath matched nothing in time.
fn is_missing(err: &anyhow::Error) -> bool {
    err.is::<Timeout>() || err.is::<NoElementFound>()
}

/// Map a lookup failure: no match becomes `ElementNotFound`, anything else
/// is a broken page and surfaces as `Browser`.
fn lookup_error(xpath: &str, err: anyhow::Error) -> DirectiveError {
    if is_missing(&err) {
        DirectiveError::ElementNotFound(xpath.to_string())
    } else {
        DirectiveError::Browser(format!("{}: {}", xpath, err))
    }
}

/// Element resolved on a Chrome tab.
///
/// Only the XPath is kept; the node is looked up again on every use so a
/// handle never refers to a node from a previous page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeElement {
    xpath: String,
}

impl ChromeElement {
    pub fn xpath(&self) -> &str {
        &self.xpath
    }
}

/// [`Page`] backed by a headless Chrome tab.
pub struct ChromePage {
    // Keeps the browser process alive when the page launched it.
    _browser: Option<Browser>,
    tab: Arc<Tab>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>, session: &SessionConfig) -> Self {
        Self {
            _browser: None,
            tab,
            timeout: Duration::from_millis(session.element_timeout_ms),
            poll_interval: Duration::from_millis(session.poll_interval_ms),
        }
    }

    pub async fn launch(config: &Config) -> Result<Self> {
        let args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
        ];

        let launch_options = LaunchOptions::default_builder()
            .headless(config.session.headless)
            .args(args)
            .build()
            .map_err(|e| DirectiveError::Browser(e.to_string()))?;

        let browser = Browser::new(launch_options)?;
        let tab = browser.new_tab()?;

        let mut page = Self::new(tab, &config.session);
        page._browser = Some(browser);
        Ok(page)
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab.navigate_to(url)?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    /// Look the element up on the current page load.
    pub(crate) fn resolve(&self, element: &ChromeElement) -> Result<Element<'_>> {
        self.tab
            .find_element_by_xpath(&element.xpath)
            .map_err(|e| lookup_error(&element.xpath, e))
    }

    fn is_visible(&self, element: &ChromeElement) -> Result<bool> {
        let node = self.resolve(element)?;
        let result = node.call_js_fn(VISIBILITY_JS, vec![], false)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl Page for ChromePage {
    type Element = ChromeElement;

    async fn find(&self, path: &XPath) -> Result<ChromeElement> {
        let xpath = path.to_string();
        self.tab
            .wait_for_xpath_with_custom_timeout(&xpath, self.timeout)
            .map_err(|e| lookup_error(&xpath, e))?;
        Ok(ChromeElement { xpath })
    }

    async fn is_present(&self, path: &XPath) -> Result<bool> {
        let xpath = path.to_string();
        match self.tab.wait_for_xpath_with_custom_timeout(&xpath, self.timeout) {
            Ok(_) => Ok(true),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(lookup_error(&xpath, e)),
        }
    }

    async fn ensure_visible(&self, element: &ChromeElement) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if self.is_visible(element)? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DirectiveError::ElementNotVisible(element.xpath.clone()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn click(&self, element: &ChromeElement) -> Result<()> {
        self.resolve(element)?.click()?;
        Ok(())
    }
}
