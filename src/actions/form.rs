use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::actions::{ActionDispatcher, ProviderAction};
use crate::core::{FieldSetter, Page, StringLookup};
use crate::dom::ProviderLocators;
use crate::errors::{DirectiveError, Result};

/// Ordered `(label, value)` pairs for one edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldAssignments {
    pairs: Vec<(String, String)>,
}

impl FieldAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from two-column table rows.
    ///
    /// A label given twice keeps its first position and takes the last value.
    pub fn from_rows<R, C>(rows: R) -> Result<Self>
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        let mut assignments = Self::new();
        for (index, row) in rows.into_iter().enumerate() {
            let mut cells = row.into_iter().map(Into::into);
            match (cells.next(), cells.next(), cells.next()) {
                (Some(label), Some(value), None) => assignments.set(label, value),
                _ => {
                    return Err(DirectiveError::InvalidTable(format!(
                        "row {} must have exactly two cells",
                        index + 1
                    )))
                }
            }
        }
        Ok(assignments)
    }

    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(label, value);
        self
    }

    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == label) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((label, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for FieldAssignments {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut assignments = Self::new();
        for (label, value) in iter {
            assignments.set(label, value);
        }
        assignments
    }
}

/// Edits a provider through its inline form, one field per submission.
///
/// The page reloads after every submit, so the field locator is rebuilt from
/// the provider name for each assignment and no element handle outlives a
/// submission.
pub struct FormFiller<P: Page> {
    page: Arc<P>,
    dispatcher: ActionDispatcher<P>,
    fields: Arc<dyn FieldSetter<P>>,
    strings: Arc<dyn StringLookup>,
    locators: ProviderLocators,
}

impl<P: Page> FormFiller<P> {
    pub fn new(
        page: Arc<P>,
        fields: Arc<dyn FieldSetter<P>>,
        strings: Arc<dyn StringLookup>,
        locators: ProviderLocators,
    ) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(page.clone(), locators.clone()),
            page,
            fields,
            strings,
            locators,
        }
    }

    /// Open the provider's edit form and apply `assignments` in order.
    ///
    /// Stops at the first failure; fields submitted before it stay saved.
    pub async fn edit_entity(&self, provider: &str, assignments: &FieldAssignments) -> Result<()> {
        self.dispatcher.perform(ProviderAction::Edit, provider).await?;

        if assignments.is_empty() {
            debug!("No fields to set for provider '{}'", provider);
            return Ok(());
        }

        info!(
            "Editing {} field(s) of provider '{}'",
            assignments.len(),
            provider
        );
        for (label, value) in assignments.iter() {
            self.set_and_submit(provider, label, value).await?;
        }
        Ok(())
    }

    async fn set_and_submit(&self, provider: &str, label: &str, value: &str) -> Result<()> {
        let path = self.locators.field_path(provider, label);
        debug!("Setting '{}' to '{}' via {}", label, value, path);

        let field = self.page.find(&path).await.map_err(|err| match err {
            DirectiveError::ElementNotFound(_) => DirectiveError::FieldNotFound {
                label: label.to_string(),
                entity: provider.to_string(),
            },
            other => other,
        })?;
        self.fields.set_field(&self.page, &field, value).await?;

        let submit_label = self
            .strings
            .get_string(&self.locators.markup().save_changes_key)?;
        let submit = self.page.find_button(&submit_label).await?;
        self.page.click(&submit).await
    }

    /// Wait until the provider's edit form is shown.
    pub async fn wait_for_edit_form(&self, provider: &str) -> Result<()> {
        let path = self.locators.edit_form_path(provider);
        debug!("Waiting for edit form: {}", path);
        let form = self.page.find(&path).await?;
        self.page.ensure_visible(&form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StringTable;
    use crate::dom::XPath;
    use crate::testing::{FakeFieldSetter, FakeNode, FakePage, PageEvent};

    fn filler(page: Arc<FakePage>) -> FormFiller<FakePage> {
        FormFiller::new(
            page,
            Arc::new(FakeFieldSetter),
            Arc::new(StringTable::default()),
            ProviderLocators::default(),
        )
    }

    fn is_edit_control(node: &FakeNode) -> bool {
        node.attr("class")
            .map(|class| class.contains("filter-oembed-edit"))
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_empty_assignments_only_open_edit() {
        let page = Arc::new(FakePage::provider_admin());
        filler(page.clone())
            .edit_entity("Flickr", &FieldAssignments::new())
            .await
            .unwrap();

        let clicks = page.clicks();
        assert_eq!(clicks.len(), 1);
        assert!(is_edit_control(&page.node(clicks[0])));
        assert_eq!(page.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_two_fields_two_submits() {
        let page = Arc::new(FakePage::provider_admin());
        let assignments = FieldAssignments::new()
            .with("Width", "800")
            .with("Height", "600");
        filler(page.clone())
            .edit_entity("Flickr", &assignments)
            .await
            .unwrap();

        assert_eq!(page.submit_count(), 2);
        let locators = ProviderLocators::default();
        assert_eq!(
            page.value_of(&locators.field_path("Flickr", "Width")).as_deref(),
            Some("800")
        );
        assert_eq!(
            page.value_of(&locators.field_path("Flickr", "Height")).as_deref(),
            Some("600")
        );
    }

    #[tokio::test]
    async fn test_field_located_fresh_after_each_submit() {
        let page = Arc::new(FakePage::provider_admin());
        let locators = ProviderLocators::default();
        let assignments = FieldAssignments::new()
            .with("Width", "800")
            .with("Height", "600");
        filler(page.clone())
            .edit_entity("Flickr", &assignments)
            .await
            .unwrap();

        let width = locators.field_path("Flickr", "Width").to_string();
        let height = locators.field_path("Flickr", "Height").to_string();
        let events = page.events();
        let position = |wanted: &PageEvent| events.iter().position(|e| e == wanted).unwrap();

        let find_width = position(&PageEvent::Find(width));
        let find_height = position(&PageEvent::Find(height));
        let first_submit = position(&PageEvent::Submit);
        let last_submit = events.iter().rposition(|e| *e == PageEvent::Submit).unwrap();

        assert!(find_width < first_submit);
        assert!(first_submit < find_height);
        assert!(find_height < last_submit);
        assert!(matches!(events[find_width + 1], PageEvent::SetValue { ref value, .. } if value == "800"));
        assert!(matches!(events[find_height + 1], PageEvent::SetValue { ref value, .. } if value == "600"));
    }

    #[tokio::test]
    async fn test_unknown_label_stops_edit() {
        let page = Arc::new(FakePage::provider_admin());
        let assignments = FieldAssignments::new()
            .with("Width", "800")
            .with("Colour", "red")
            .with("Height", "600");
        let err = filler(page.clone())
            .edit_entity("Flickr", &assignments)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DirectiveError::FieldNotFound { ref label, ref entity } if label == "Colour" && entity == "Flickr"
        ));
        // Width was already saved and is not rolled back.
        assert_eq!(page.submit_count(), 1);
        assert_eq!(
            page.value_of(&ProviderLocators::default().field_path("Flickr", "Width"))
                .as_deref(),
            Some("800")
        );
        assert!(!page
            .events()
            .iter()
            .any(|e| matches!(e, PageEvent::SetValue { value, .. } if value == "600")));
    }

    #[tokio::test]
    async fn test_missing_save_label_propagates() {
        let page = Arc::new(FakePage::provider_admin());
        let filler = FormFiller::new(
            page.clone(),
            Arc::new(FakeFieldSetter),
            Arc::new(StringTable::empty()),
            ProviderLocators::default(),
        );
        let err = filler
            .edit_entity("Flickr", &FieldAssignments::new().with("Width", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectiveError::MissingString(_)));
        assert_eq!(page.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_wait_for_edit_form() {
        let page = FakePage::provider_admin().with_click_handler(|document, node| {
            let is_edit = document
                .node(node)
                .attr("class")
                .map(|c| c.contains("filter-oembed-edit"))
                .unwrap_or(false);
            if is_edit {
                let details = XPath::anywhere("div").with_class("oembed-provider-details");
                for id in document.evaluate(&details) {
                    document.node_mut(id).remove_attr("style");
                }
            }
        });
        let page = Arc::new(page);
        let filler = filler(page.clone());

        let err = filler.wait_for_edit_form("Flickr").await.unwrap_err();
        assert!(matches!(err, DirectiveError::ElementNotVisible(_)));

        filler
            .edit_entity("Flickr", &FieldAssignments::new())
            .await
            .unwrap();
        filler.wait_for_edit_form("Flickr").await.unwrap();
    }

    #[test]
    fn test_rows_hash_semantics() {
        let rows = vec![
            vec!["Width", "800"],
            vec!["Height", "600"],
            vec!["Width", "1024"],
        ];
        let assignments = FieldAssignments::from_rows(rows).unwrap();
        let pairs: Vec<_> = assignments.iter().collect();
        assert_eq!(pairs, vec![("Width", "1024"), ("Height", "600")]);
    }

    #[test]
    fn test_rows_must_have_two_cells() {
        let err = FieldAssignments::from_rows(vec![vec!["Width", "800"], vec!["Height"]])
            .unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidTable(ref msg) if msg.contains("row 2")));

        let err = FieldAssignments::from_rows(vec![vec!["a", "b", "c"]]).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidTable(_)));
    }

    #[test]
    fn test_collect_from_pairs() {
        let assignments: FieldAssignments = [("Width", "1"), ("Height", "2")].into_iter().collect();
        assert_eq!(assignments.len(), 2);
    }
}
