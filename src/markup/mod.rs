//! Markup query primitives
//!
//! Thin wrappers over the `scraper` HTML tree: find the first or every
//! element matching a tag and attribute filter, collect links, and read an
//! element's direct text. Every extractor in [`crate::parser`] is built from
//! these.

use std::fmt;

use scraper::node::Element;
use scraper::{ElementRef, Html};

use crate::compose::{default, maybe};
use crate::pipe;

/// A parsed markup string together with the source it was parsed from.
///
/// Queries hand out [`ElementRef`]s borrowed from the document, so nodes
/// never outlive it.
pub struct Document {
    source: String,
    html: Html,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let html = Html::parse_document(&source);
        Self { source, html }
    }

    /// The root element; the scope for document-wide queries.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The markup this document was parsed from.
    pub fn raw(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .finish()
    }
}

/// Parse markup text. The HTML5 parser recovers from malformed input, so
/// this never fails.
pub fn parse_html(text: &str) -> Document {
    Document::parse(text)
}

/// Attribute part of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrFilter {
    /// Tag name only.
    Any,
    /// `class` matches either the whole attribute value or one of its
    /// whitespace separated classes. An empty string matches elements
    /// without a class.
    Class(String),
    /// Every listed attribute must match. `class` entries use the class
    /// rule above; other attributes compare exactly, and an empty value
    /// matches an absent attribute.
    Attrs(Vec<(String, String)>),
}

/// Tag name plus attribute filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    tag: String,
    filter: AttrFilter,
}

impl Query {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            filter: AttrFilter::Any,
        }
    }

    pub fn class(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            filter: AttrFilter::Class(class.into()),
        }
    }

    pub fn attrs<I, K, V>(tag: impl Into<String>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tag: tag.into(),
            filter: AttrFilter::Attrs(
                attrs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn filter(&self) -> &AttrFilter {
        &self.filter
    }

    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        let element = el.value();
        if !element.name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        match &self.filter {
            AttrFilter::Any => true,
            AttrFilter::Class(class) => attr_matches(element, "class", class),
            AttrFilter::Attrs(attrs) => attrs
                .iter()
                .all(|(name, want)| attr_matches(element, name, want)),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        match &self.filter {
            AttrFilter::Any => Ok(()),
            AttrFilter::Class(class) => write!(f, "[class=\"{}\"]", class),
            AttrFilter::Attrs(attrs) => attrs
                .iter()
                .try_for_each(|(name, value)| write!(f, "[{}=\"{}\"]", name, value)),
        }
    }
}

fn attr_matches(element: &Element, name: &str, want: &str) -> bool {
    let value = element.attr(name);
    if want.is_empty() {
        return value.map_or(true, |v| v.trim().is_empty());
    }
    match value {
        None => false,
        Some(v) if name == "class" => v == want || v.split_whitespace().any(|c| c == want),
        Some(v) => v == want,
    }
}

/// Elements strictly inside `scope`, in document order.
fn elements_within<'a>(scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    scope.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First element inside `scope` matching `query`.
pub fn find_by<'a>(query: &Query, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    elements_within(scope).find(|el| query.matches(*el))
}

pub fn find_by_class<'a>(tag: &str, class: &str, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    find_by(&Query::class(tag, class), scope)
}

/// Every element inside `scope` matching `query`, in document order.
pub fn find_all_by<'a>(query: &Query, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    elements_within(scope)
        .filter(|el| query.matches(*el))
        .collect()
}

/// First element after `from` in document order matching `query`. The
/// search covers `from`'s own descendants and everything that follows it.
pub fn find_next_by<'a>(query: &Query, from: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let node = *from;
    let inside = node.descendants().skip(1);
    let after = std::iter::once(node)
        .chain(node.ancestors())
        .flat_map(|n| n.next_siblings())
        .flat_map(|sibling| sibling.descendants());

    inside
        .chain(after)
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(*el))
}

pub fn find_links(scope: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    find_all_by(&Query::tag("a"), scope)
}

/// Direct text of an element: the text of its only child, descending
/// through single-child wrappers. `None` when the element is empty or has
/// several children. An empty text child still counts as text.
pub fn text_of(el: ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    if let Some(text) = only.value().as_text() {
        let text: &str = text;
        return Some(text.to_owned());
    }
    ElementRef::wrap(only).and_then(text_of)
}

pub fn has_text_content(el: &ElementRef<'_>) -> bool {
    text_of(*el).is_some()
}

/// Text of an optional element, with a missing element and a missing text
/// both collapsing to `""`.
pub fn text_or_empty(node: Option<ElementRef<'_>>) -> String {
    pipe!(maybe(text_of), default(String::new()))(node)
}
