//! In-memory page used to exercise the steps without a browser.
//!
//! HTML fixtures are parsed with `scraper` into a small node tree and the
//! crate's own [`XPath`] values are evaluated against it, so tests run the
//! exact locators the steps build.

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::{Mutex, MutexGuard};

use crate::core::{FieldKind, FieldSetter, Page};
use crate::dom::{Axis, Predicate, Step, XPath};
use crate::errors::{DirectiveError, Result};

pub type NodeId = usize;

const ROOT: NodeId = 0;

/// Provider list with three providers. Only Flickr has its edit form rendered.
pub const PROVIDER_ADMIN_HTML: &str = r##"<!DOCTYPE html>
<html>
<body>
  <input type="text" placeholder="Provider" value="">
  <table class="generaltable">
    <tr>
      <td>
        <a href="https://www.youtube.com">YouTube</a>
        <div class="provider-actions">
          <a class="action filter-oembed-visibility" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/hide.png" alt="Disable"></a>
          <a class="action filter-oembed-edit" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/edit.png" alt="Edit"></a>
        </div>
        <div class="oembed-provider-details"></div>
      </td>
    </tr>
    <tr>
      <td>
        <a href="https://vimeo.com">Vimeo</a>
        <div class="provider-actions">
          <a class="action filter-oembed-visibility" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/show.png" alt="Enable"></a>
          <a class="action filter-oembed-edit" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/edit.png" alt="Edit"></a>
        </div>
        <div class="oembed-provider-details"></div>
      </td>
    </tr>
    <tr>
      <td>
        <a href="https://www.flickr.com">Flickr</a>
        <div class="provider-actions">
          <a class="action filter-oembed-visibility" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/hide.png" alt="Disable"></a>
          <a class="action filter-oembed-edit" href="#"><img src="https://lms.test/theme/image.php/boost/core/1/t/edit.png" alt="Edit"></a>
        </div>
        <div class="oembed-provider-details" style="display: none">
          <form method="post" action="manageproviders.php">
            <div class="form-group row fitem">
              <div class="col-md-3"><label for="id_width">Width</label></div>
              <div class="col-md-9 form-inline felement"><input type="text" name="width" id="id_width" value="400"></div>
            </div>
            <div class="form-group row fitem">
              <div class="col-md-3"><label for="id_height">Height</label></div>
              <div class="col-md-9 form-inline felement"><input type="text" name="height" id="id_height" value="300"></div>
            </div>
            <div class="form-group row fitem">
              <div class="col-md-3"><label for="id_enabled">Enabled</label></div>
              <div class="col-md-9 form-inline felement"><input type="checkbox" name="enabled" id="id_enabled" checked></div>
            </div>
            <div class="form-group row fitem">
              <div class="col-md-3"><label for="id_source">Source</label></div>
              <div class="col-md-9 form-inline felement">
                <select name="source" id="id_source">
                  <option value="download" selected>Downloaded</option>
                  <option value="local">Local</option>
                </select>
              </div>
            </div>
            <input type="submit" name="submitbutton" value="Save changes">
          </form>
        </div>
      </td>
    </tr>
  </table>
</body>
</html>"##;

#[derive(Debug, Clone)]
pub struct FakeNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Direct text children, in document order.
    pub texts: Vec<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl FakeNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }
}

/// Parsed HTML tree. Node ids follow document order.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    nodes: Vec<FakeNode>,
}

impl FakeDocument {
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut document = Self {
            nodes: vec![FakeNode {
                tag: "#document".to_string(),
                attributes: Vec::new(),
                texts: Vec::new(),
                children: Vec::new(),
                parent: None,
            }],
        };
        document.import(parsed.root_element(), ROOT);
        document
    }

    fn import(&mut self, element: ElementRef<'_>, parent: NodeId) -> NodeId {
        let value = element.value();
        let id = self.nodes.len();
        self.nodes.push(FakeNode {
            tag: value.name().to_string(),
            attributes: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            texts: Vec::new(),
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent].children.push(id);

        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                self.import(child_element, id);
            } else if let Some(text) = child.value().as_text() {
                self.nodes[id].texts.push(String::from(&**text));
            }
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        &mut self.nodes[id]
    }

    /// Evaluate `path` from the document root, returning matches in document order.
    pub fn evaluate(&self, path: &XPath) -> Vec<NodeId> {
        if path.is_empty() {
            return Vec::new();
        }

        let mut context = vec![ROOT];
        for step in path.steps() {
            let mut next = Vec::new();
            for &id in &context {
                match step.axis {
                    Axis::Descendant => {
                        let mut found = Vec::new();
                        self.collect_descendants(id, &mut found);
                        next.extend(found.into_iter().filter(|&n| self.step_matches(n, step)));
                    }
                    Axis::Child => next.extend(
                        self.nodes[id]
                            .children
                            .iter()
                            .copied()
                            .filter(|&n| self.step_matches(n, step)),
                    ),
                    Axis::Parent => {
                        if let Some(parent) = self.nodes[id].parent {
                            if self.step_matches(parent, step) {
                                next.push(parent);
                            }
                        }
                    }
                }
            }
            next.sort_unstable();
            next.dedup();
            context = next;
        }
        context
    }

    /// Concatenated text of the node and all its descendants.
    pub fn string_value(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.push_text(id, &mut out);
        out
    }

    /// Whether the node or any ancestor is hidden.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            let display_none = node
                .attr("style")
                .map(|style| style.replace(' ', "").contains("display:none"))
                .unwrap_or(false);
            if display_none || node.has_attr("hidden") {
                return true;
            }
            current = node.parent;
        }
        false
    }

    // Text nodes come before child elements here, which is enough for the
    // flat markup the fixtures use.
    fn push_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        for text in &node.texts {
            out.push_str(text);
        }
        for &child in &node.children {
            self.push_text(child, out);
        }
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    fn step_matches(&self, id: NodeId, step: &Step) -> bool {
        id != ROOT
            && step.node.matches(&self.nodes[id].tag)
            && step
                .predicates
                .iter()
                .all(|predicate| self.predicate_holds(id, predicate))
    }

    fn predicate_holds(&self, id: NodeId, predicate: &Predicate) -> bool {
        let node = &self.nodes[id];
        match predicate {
            Predicate::TextEquals(text) => node.texts.iter().any(|t| t == text),
            Predicate::TextContains(text) => node
                .texts
                .first()
                .map(|t| t.contains(text.as_str()))
                .unwrap_or(false),
            Predicate::AttrEquals { name, value } => node.attr(name) == Some(value.as_str()),
            Predicate::AttrContains { name, value } => node
                .attr(name)
                .map(|attr| attr.contains(value.as_str()))
                .unwrap_or(false),
            Predicate::NormalizedTextEquals(text) => {
                normalize_space(&self.string_value(id)) == *text
            }
            Predicate::AnyOf(options) => options.iter().any(|p| self.predicate_holds(id, p)),
        }
    }
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Interactions observed by a [`FakePage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Find(String),
    Probe(String),
    EnsureVisible(NodeId),
    Click(NodeId),
    SetValue { node: NodeId, value: String },
    Submit,
}

/// Element handle bound to the page load it was resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeElement {
    pub node: NodeId,
    generation: u64,
}

type ClickHandler = Box<dyn Fn(&mut FakeDocument, NodeId) + Send + Sync>;

struct FakeState {
    document: FakeDocument,
    generation: u64,
    events: Vec<PageEvent>,
}

/// A page that records every interaction.
///
/// Clicking a submit control counts as a reload: handles resolved before it
/// become stale and fail on use.
pub struct FakePage {
    state: Mutex<FakeState>,
    on_click: Option<ClickHandler>,
}

impl FakePage {
    pub fn from_html(html: &str) -> Self {
        Self {
            state: Mutex::new(FakeState {
                document: FakeDocument::parse(html),
                generation: 0,
                events: Vec::new(),
            }),
            on_click: None,
        }
    }

    pub fn provider_admin() -> Self {
        Self::from_html(PROVIDER_ADMIN_HTML)
    }

    /// Run `handler` against the document after every click, e.g. to mimic
    /// the server flipping a provider's visibility.
    pub fn with_click_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut FakeDocument, NodeId) + Send + Sync + 'static,
    {
        self.on_click = Some(Box::new(handler));
        self
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.state().events.clone()
    }

    pub fn clicks(&self) -> Vec<NodeId> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                PageEvent::Click(node) => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn submit_count(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| matches!(event, PageEvent::Submit))
            .count()
    }

    pub fn node(&self, id: NodeId) -> FakeNode {
        self.state().document.node(id).clone()
    }

    pub fn string_value(&self, id: NodeId) -> String {
        self.state().document.string_value(id)
    }

    /// Matches of `path` without recording an event.
    pub fn query(&self, path: &XPath) -> Vec<NodeId> {
        self.state().document.evaluate(path)
    }

    /// Value the page currently holds for the first match of `path`.
    pub fn value_of(&self, path: &XPath) -> Option<String> {
        let state = self.state();
        let id = *state.document.evaluate(path).first()?;
        let node = state.document.node(id);
        match FieldKind::detect(&node.tag, node.attr("type")) {
            FieldKind::Checkbox | FieldKind::Radio => Some(node.has_attr("checked").to_string()),
            FieldKind::Select => node.children.iter().find_map(|&option| {
                let option_node = state.document.node(option);
                option_node
                    .has_attr("selected")
                    .then(|| option_node.attr("value").unwrap_or_default().to_string())
            }),
            _ => node.attr("value").map(str::to_string),
        }
    }

    /// Assign `value` to the control behind `element`, honouring its kind.
    pub fn set_value(&self, element: &FakeElement, value: &str) -> Result<()> {
        let mut state = self.state();
        Self::check_fresh(&state, element)?;
        state.events.push(PageEvent::SetValue {
            node: element.node,
            value: value.to_string(),
        });

        let node = state.document.node(element.node).clone();
        match FieldKind::detect(&node.tag, node.attr("type")) {
            FieldKind::Text | FieldKind::TextArea => {
                state.document.node_mut(element.node).set_attr("value", value);
            }
            FieldKind::Checkbox | FieldKind::Radio => {
                let target = state.document.node_mut(element.node);
                if FieldKind::parse_checked(value) {
                    target.set_attr("checked", "");
                } else {
                    target.remove_attr("checked");
                }
            }
            FieldKind::Select => {
                let chosen = node.children.iter().copied().find(|&option| {
                    let option_node = state.document.node(option);
                    option_node.attr("value") == Some(value)
                        || normalize_space(&state.document.string_value(option)) == value
                });
                let Some(chosen) = chosen else {
                    return Err(DirectiveError::FieldValue(format!(
                        "no option '{}' in select",
                        value
                    )));
                };
                for &option in &node.children {
                    state.document.node_mut(option).remove_attr("selected");
                }
                state.document.node_mut(chosen).set_attr("selected", "");
            }
            FieldKind::Unsupported => {
                return Err(DirectiveError::UnsupportedField(node.tag));
            }
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_fresh(state: &FakeState, element: &FakeElement) -> Result<()> {
        if element.generation != state.generation {
            return Err(DirectiveError::Browser(format!(
                "stale element reference: node {} was resolved before the page reloaded",
                element.node
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Page for FakePage {
    type Element = FakeElement;

    async fn find(&self, path: &XPath) -> Result<FakeElement> {
        let mut state = self.state();
        let xpath = path.to_string();
        state.events.push(PageEvent::Find(xpath.clone()));
        let node = state
            .document
            .evaluate(path)
            .first()
            .copied()
            .ok_or(DirectiveError::ElementNotFound(xpath))?;
        Ok(FakeElement {
            node,
            generation: state.generation,
        })
    }

    async fn is_present(&self, path: &XPath) -> Result<bool> {
        let mut state = self.state();
        state.events.push(PageEvent::Probe(path.to_string()));
        Ok(!state.document.evaluate(path).is_empty())
    }

    async fn ensure_visible(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state();
        Self::check_fresh(&state, element)?;
        state.events.push(PageEvent::EnsureVisible(element.node));
        if state.document.is_hidden(element.node) {
            return Err(DirectiveError::ElementNotVisible(format!(
                "<{}> node {}",
                state.document.node(element.node).tag,
                element.node
            )));
        }
        Ok(())
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.state();
        Self::check_fresh(&state, element)?;
        state.events.push(PageEvent::Click(element.node));

        if let Some(handler) = &self.on_click {
            handler(&mut state.document, element.node);
        }

        if state.document.node(element.node).attr("type") == Some("submit") {
            state.events.push(PageEvent::Submit);
            state.generation += 1;
        }
        Ok(())
    }
}

/// Field setter delegating to [`FakePage::set_value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeFieldSetter;

#[async_trait]
impl FieldSetter<FakePage> for FakeFieldSetter {
    async fn set_field(&self, page: &FakePage, element: &FakeElement, value: &str) -> Result<()> {
        page.set_value(element, value)
    }
}

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ProviderAction, ProviderState};
    use crate::dom::ProviderLocators;

    #[test]
    fn test_evaluate_provider_actions() {
        let page = FakePage::provider_admin();
        let locators = ProviderLocators::default();

        let toggle = page.query(&locators.provider_action("YouTube", ProviderAction::Toggle));
        assert_eq!(toggle.len(), 1);
        let node = page.node(toggle[0]);
        assert_eq!(node.tag, "a");
        assert!(node.attr("class").unwrap().contains("filter-oembed-visibility"));

        let container = page.node(node.parent.unwrap());
        assert_eq!(container.attr("class"), Some("provider-actions"));
        let cell = page.node(container.parent.unwrap());
        let anchor = page.node(cell.children[0]);
        assert_eq!(anchor.texts, vec!["YouTube".to_string()]);
    }

    #[test]
    fn test_text_match_is_exact() {
        let page = FakePage::provider_admin();
        let locators = ProviderLocators::default();
        assert!(page
            .query(&locators.provider_action("You", ProviderAction::Toggle))
            .is_empty());
    }

    #[test]
    fn test_icon_state() {
        let page = FakePage::provider_admin();
        let locators = ProviderLocators::default();
        assert_eq!(
            page.query(&locators.visibility_icon_path("Vimeo", ProviderState::Disabled)).len(),
            1
        );
        assert!(page
            .query(&locators.visibility_icon_path("Vimeo", ProviderState::Enabled))
            .is_empty());
    }

    #[test]
    fn test_field_path_resolves_input() {
        let page = FakePage::provider_admin();
        let locators = ProviderLocators::default();
        let found = page.query(&locators.field_path("Flickr", "Height"));
        assert_eq!(found.len(), 1);
        assert_eq!(page.node(found[0]).attr("name"), Some("height"));
    }

    #[test]
    fn test_submit_button_path() {
        let page = FakePage::provider_admin();
        let found = page.query(&crate::dom::submit_button_path("Save changes"));
        assert_eq!(found.len(), 1);
        assert_eq!(page.node(found[0]).attr("name"), Some("submitbutton"));
    }

    #[test]
    fn test_hidden_detection() {
        let page = FakePage::provider_admin();
        let form = page.query(&ProviderLocators::default().edit_form_path("Flickr"));
        let state = page.state();
        assert!(state.document.is_hidden(form[0]));
    }

    #[tokio::test]
    async fn test_stale_handle_after_submit() {
        let page = FakePage::provider_admin();
        let field = page
            .find(&ProviderLocators::default().field_path("Flickr", "Width"))
            .await
            .unwrap();
        let submit = page.find_button("Save changes").await.unwrap();
        page.click(&submit).await.unwrap();

        let err = page.set_value(&field, "10").unwrap_err();
        assert!(matches!(err, DirectiveError::Browser(_)));
        assert_eq!(page.submit_count(), 1);
    }

    #[tokio::test]
    async fn test_set_value_polymorphism() {
        let page = FakePage::provider_admin();
        let locators = ProviderLocators::default();

        let checkbox = page.find(&locators.field_path("Flickr", "Enabled")).await.unwrap();
        page.set_value(&checkbox, "0").unwrap();
        assert_eq!(
            page.value_of(&locators.field_path("Flickr", "Enabled")).as_deref(),
            Some("false")
        );

        let select = page.find(&locators.field_path("Flickr", "Source")).await.unwrap();
        page.set_value(&select, "Local").unwrap();
        assert_eq!(
            page.value_of(&locators.field_path("Flickr", "Source")).as_deref(),
            Some("local")
        );

        let err = page.set_value(&select, "Remote").unwrap_err();
        assert!(matches!(err, DirectiveError::FieldValue(_)));
    }
}
