//! In-process model of the host page the newsletter renders into.
//!
//! The host page owns three elements with fixed ids. This module models just
//! enough of a DOM to mutate them the way a browser would: setting text
//! content replaces children, list items are appended in order, and the whole
//! page can be serialized back to HTML for inspection.
//!
//! Text and attribute values are always stored as plain text and escaped on
//! serialization, so nothing fetched is ever interpreted as markup.

use quick_xml::escape::escape;
use std::fmt::Write;
use url::Url;

/// Id of the element showing the digest date.
pub const DATE_REGION: &str = "newsletterDate";
/// Id of the element showing the digest recap.
pub const SUMMARY_REGION: &str = "newsletterSummary";
/// Id of the list element holding one `<li>` per article.
pub const LIST_REGION: &str = "newsletterList";

/// A single element: tag, attributes in insertion order, and content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    content: Content,
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Text(String),
    Children(Vec<Element>),
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            content: Content::Children(Vec::new()),
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Builder form of [`Element::set_attribute`].
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Replace all content with a single text node.
    pub fn set_text_content(&mut self, text: &str) {
        self.content = Content::Text(text.to_string());
    }

    /// Builder form of [`Element::set_text_content`].
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text_content(text);
        self
    }

    /// Remove every child (and any text).
    pub fn clear(&mut self) {
        self.content = Content::Children(Vec::new());
    }

    pub fn append_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Text(_) => self.content = Content::Children(vec![child]),
        }
    }

    /// Builder form of [`Element::append_child`].
    pub fn with_child(mut self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        out.push('>');
        match &self.content {
            Content::Text(t) => out.push_str(&escape(t)),
            Content::Children(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// The host page: a base URL plus the elements addressable by id.
#[derive(Debug, Clone)]
pub struct Page {
    base_url: Url,
    elements: Vec<(String, Element)>,
}

impl Page {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            elements: Vec::new(),
        }
    }

    /// A page carrying the three regions the newsletter widget expects.
    pub fn newsletter_host(base_url: Url) -> Self {
        let mut page = Self::new(base_url);
        page.insert(DATE_REGION, Element::new("span"));
        page.insert(SUMMARY_REGION, Element::new("p"));
        page.insert(LIST_REGION, Element::new("ul"));
        page
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Register an element under `id`; the id attribute is set on it.
    pub fn insert(&mut self, id: &str, element: Element) {
        let element = element.with_attribute("id", id);
        match self.elements.iter_mut().find(|(k, _)| k == id) {
            Some((_, existing)) => *existing = element,
            None => self.elements.push((id.to_string(), element)),
        }
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, e)| e)
    }

    /// Serialize every registered element, one per line, in insertion order.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (_, element) in &self.elements {
            element.write_html(&mut out);
            out.push('\n');
        }
        out
    }
}

/// Read accessors used when inspecting a rendered page.
#[cfg(test)]
impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::Text(t) => t.clone(),
            Content::Children(children) => children.iter().map(Element::text_content).collect(),
        }
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children.as_slice(),
            Content::Text(_) => &[],
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

#[cfg(test)]
impl Page {
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }
}
