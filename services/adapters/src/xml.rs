//! Owned, loosely-typed XML element tree
//!
//! Medius status endpoints answer with small attribute-heavy documents whose
//! shape drifts between deployments. Parsing into an owned tree lets the
//! adapter probe attributes and children without holding the source text.

use std::fmt;

/// One XML element with its attributes, trimmed text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Concatenated direct text content, trimmed
    pub text: String,
    pub children: Vec<Element>,
}

/// Document could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let document =
            roxmltree::Document::parse(input).map_err(|e| ParseError(e.to_string()))?;
        Ok(Self::from_node(document.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let mut text = String::new();
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Self::from_node(child));
            } else if child.is_text() {
                if let Some(fragment) = child.text() {
                    text.push_str(fragment);
                }
            }
        }

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            text: text.trim().to_string(),
            children,
        }
    }

    /// Attribute value by exact name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every child element with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text content, if any
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }
}
