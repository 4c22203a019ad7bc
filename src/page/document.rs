//! Owned, mutable HTML document tree
//!
//! Pages are parsed with scraper's HTML5 parser and copied into this small
//! tree so they can be edited in place and written back out.

use scraper::{ElementRef, Html};
use std::fmt::Write;

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written without escaping
///
/// Matches what the parser reads as raw text. Pages are parsed with
/// scripting enabled, so `noscript` content is raw text too.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// HTML taken from a trusted source and inserted without escaping
///
/// Only post bodies from the configured API go through here. Anything that
/// should be shown as text belongs in [`Node::Text`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Marks markup from the carrier API as safe to insert verbatim
    pub fn from_trusted_source(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Doctype(String),
    Comment(String),
    /// Text content, escaped on output
    Text(String),
    Element(Element),
    /// Raw markup, written as-is
    Trusted(TrustedHtml),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text child append
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Replaces all children with a single text node
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Child elements, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First descendant (not including self) matching `pred`
    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        find_in_mut(&mut self.children, pred)
    }

    /// First descendant (not including self) matching `pred`
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.children, pred)
    }

    /// All descendants matching `pred`, in document order
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_matching(&self.children, pred, &mut found);
        found
    }
}

/// A parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Parses an HTML document
    ///
    /// The HTML5 parser always produces `html`, `head` and `body`, so
    /// fragments come back wrapped in a full document.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut children = Vec::new();

        for child in parsed.tree.root().children() {
            match child.value() {
                scraper::Node::Doctype(doctype) => {
                    children.push(Node::Doctype(doctype.name().to_string()))
                }
                scraper::Node::Comment(comment) => {
                    children.push(Node::Comment((**comment).to_string()))
                }
                scraper::Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        children.push(Node::Element(convert_element(el)));
                    }
                }
                _ => {}
            }
        }

        Self { children }
    }

    /// Serializes the tree back to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.children, false, &mut out);
        out
    }

    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.children, pred)
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        find_in_mut(&mut self.children, pred)
    }

    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_matching(&self.children, pred, &mut found);
        found
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|el| el.id() == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.find_mut(&|el| el.id() == Some(id))
    }

    /// Calls `f` on every element in document order
    pub fn for_each_element_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        visit_mut(&mut self.children, f);
    }
}

fn convert_element(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let mut element = Element::new(value.name());
    // Foreign attributes keep their prefix, e.g. `xlink:href` on SVG
    for (name, attr_value) in value.attrs.iter() {
        let qualified = match &name.prefix {
            Some(prefix) => format!("{}:{}", prefix, name.local),
            None => name.local.to_string(),
        };
        element.attrs.push((qualified, attr_value.to_string()));
    }

    for child in el.children() {
        match child.value() {
            scraper::Node::Text(text) => element.children.push(Node::Text((**text).to_string())),
            scraper::Node::Comment(comment) => {
                element.children.push(Node::Comment((**comment).to_string()))
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    element.children.push(Node::Element(convert_element(child_el)));
                }
            }
            _ => {}
        }
    }

    element
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = find_in(&el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(
    nodes: &'a mut [Node],
    pred: &dyn Fn(&Element) -> bool,
) -> Option<&'a mut Element> {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = find_in_mut(&mut el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_matching<'a>(
    nodes: &'a [Node],
    pred: &dyn Fn(&Element) -> bool,
    found: &mut Vec<&'a Element>,
) {
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                found.push(el);
            }
            collect_matching(&el.children, pred, found);
        }
    }
}

fn visit_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Element)) {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            f(el);
            visit_mut(&mut el.children, f);
        }
    }
}

fn write_nodes(nodes: &[Node], raw_text: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Doctype(name) => {
                let _ = write!(out, "<!DOCTYPE {}>", name);
            }
            Node::Comment(text) => {
                let _ = write!(out, "<!--{}-->", text);
            }
            Node::Text(text) if raw_text => out.push_str(text),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Trusted(html) => out.push_str(html.as_str()),
            Node::Element(el) => write_element(el, out),
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in el.attrs() {
        let _ = write!(
            out,
            " {}=\"{}\"",
            name,
            html_escape::encode_double_quoted_attribute(value)
        );
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
    write_nodes(&el.children, raw_text, out);
    let _ = write!(out, "</{}>", el.name);
}
