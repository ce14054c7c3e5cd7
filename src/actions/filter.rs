use std::sync::Arc;
use tracing::info;

use crate::core::{FieldSetter, Page};
use crate::dom::ProviderLocators;
use crate::errors::Result;

/// Types into the provider list's filter box.
///
/// Only the input value is set. Nothing is submitted and the list is not
/// awaited, so a caller relying on the filtered rows has to wait for them.
pub struct ListFilter<P: Page> {
    page: Arc<P>,
    fields: Arc<dyn FieldSetter<P>>,
    locators: ProviderLocators,
}

impl<P: Page> ListFilter<P> {
    pub fn new(page: Arc<P>, fields: Arc<dyn FieldSetter<P>>, locators: ProviderLocators) -> Self {
        Self {
            page,
            fields,
            locators,
        }
    }

    pub async fn filter_list(&self, text: &str) -> Result<()> {
        info!("Filtering provider list to '{}'", text);
        let input = self.page.find(&self.locators.filter_input_path()).await?;
        self.fields.set_field(&self.page, &input, text).await
    }
}
