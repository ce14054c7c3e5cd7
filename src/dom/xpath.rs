//! Structural XPath expressions built from typed steps instead of string
//! concatenation.
//!
//! Every piece of text interpolated into an expression goes through
//! [`xpath_literal`], so entity names and labels containing quotes still
//! produce a well-formed query.

use std::fmt;

/// Relationship between a step and the nodes matched by the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `//node`
    Descendant,
    /// `/node`
    Child,
    /// `/parent::node`
    Parent,
}

/// Element name a step matches, or any element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    Any,
    Tag(String),
}

impl NodeTest {
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            NodeTest::Any => true,
            NodeTest::Tag(expected) => expected.eq_ignore_ascii_case(tag),
        }
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Any => write!(f, "*"),
            NodeTest::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `text()='value'`, true when any direct text node equals the value.
    TextEquals(String),
    /// `contains(text(),'value')`, checked against the first direct text node.
    TextContains(String),
    AttrEquals { name: String, value: String },
    AttrContains { name: String, value: String },
    /// `normalize-space(.)='value'`
    NormalizedTextEquals(String),
    /// Disjunction of the inner predicates.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn attr_equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::AttrEquals {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn attr_contains(name: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::AttrContains {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn class_contains(token: impl Into<String>) -> Self {
        Self::attr_contains("class", token)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::TextEquals(text) => write!(f, "text()={}", xpath_literal(text)),
            Predicate::TextContains(text) => {
                write!(f, "contains(text(),{})", xpath_literal(text))
            }
            Predicate::AttrEquals { name, value } => {
                write!(f, "@{}={}", name, xpath_literal(value))
            }
            Predicate::AttrContains { name, value } => {
                write!(f, "contains(@{},{})", name, xpath_literal(value))
            }
            Predicate::NormalizedTextEquals(text) => {
                write!(f, "normalize-space(.)={}", xpath_literal(text))
            }
            Predicate::AnyOf(options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", option)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub node: NodeTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    pub fn new(axis: Axis, node: NodeTest) -> Self {
        Self {
            axis,
            node,
            predicates: Vec::new(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Axis::Descendant => write!(f, "//{}", self.node)?,
            Axis::Child => write!(f, "/{}", self.node)?,
            Axis::Parent => write!(f, "/parent::{}", self.node)?,
        }
        for predicate in &self.predicates {
            write!(f, "[{}]", predicate)?;
        }
        Ok(())
    }
}

/// An absolute path made of steps, evaluated from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XPath {
    steps: Vec<Step>,
}

impl XPath {
    /// Start a path with `//tag`.
    pub fn anywhere(tag: &str) -> Self {
        Self::default().descendant(tag)
    }

    pub fn descendant(self, tag: &str) -> Self {
        self.step(Axis::Descendant, node_test(tag))
    }

    pub fn child(self, tag: &str) -> Self {
        self.step(Axis::Child, node_test(tag))
    }

    pub fn parent(self, tag: &str) -> Self {
        self.step(Axis::Parent, node_test(tag))
    }

    /// Add a predicate to the last step.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.predicates.push(predicate);
        }
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.filter(Predicate::TextEquals(text.into()))
    }

    pub fn containing_text(self, text: impl Into<String>) -> Self {
        self.filter(Predicate::TextContains(text.into()))
    }

    pub fn with_class(self, token: impl Into<String>) -> Self {
        self.filter(Predicate::class_contains(token))
    }

    /// Append the steps of `other` after this path.
    pub fn then(mut self, other: XPath) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn step(mut self, axis: Axis, node: NodeTest) -> Self {
        self.steps.push(Step::new(axis, node));
        self
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

fn node_test(tag: &str) -> NodeTest {
    if tag == "*" {
        NodeTest::Any
    } else {
        NodeTest::Tag(tag.to_string())
    }
}

/// Quote `value` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so a value holding both quote kinds is
/// split into pieces and joined with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let mut parts = Vec::new();
    for (i, piece) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !piece.is_empty() {
            parts.push(format!("'{}'", piece));
        }
    }
    format!("concat({})", parts.join(", "))
}
