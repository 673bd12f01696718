//! In-memory XML element tree
//!
//! The document is parsed once into a flat, pre-order list of elements so the
//! GraphML decoder can walk it twice by index. Element names are local names
//! (namespace prefix stripped) and `xmlns` declarations are dropped.

use crate::error::{DecodeError, DecodeResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str;

/// One XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    /// Local tag name
    pub(crate) name: String,
    /// Attributes in document order
    pub(crate) attrs: Vec<(String, String)>,
    /// Character data preceding the first child element, if any
    pub(crate) text: Option<String>,
    /// Indices of direct children
    pub(crate) children: Vec<usize>,
    /// Set once a child element, comment, or processing instruction is seen
    pub(crate) text_closed: bool,
}

impl Element {
    pub(crate) fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn first_attr_value(&self) -> Option<&str> {
        self.attrs.first().map(|(_, v)| v.as_str())
    }

    pub(crate) fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Parsed document: every element in pre-order, root at index 0
#[derive(Debug, Clone, Default)]
pub(crate) struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Parse `text` into an element tree
    ///
    /// # Errors
    ///
    /// [`DecodeError::MalformedDocument`] on any well-formedness problem:
    /// syntax errors, mismatched or unclosed tags, no root, several roots, or
    /// character data outside the root.
    pub(crate) fn parse(text: &str) -> DecodeResult<Self> {
        let mut reader = Reader::from_str(text);
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                DecodeError::MalformedDocument(format!("{e} (at byte {})", reader.buffer_position()))
            })?;

            match event {
                Event::Start(e) => {
                    let idx = open_element(&mut elements, &stack, &e)?;
                    stack.push(idx);
                }
                Event::Empty(e) => {
                    open_element(&mut elements, &stack, &e)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(t) => {
                    let content = t.unescape()?;
                    push_text(&mut elements, &stack, &content)?;
                }
                Event::CData(c) => {
                    let content = str::from_utf8(&c)?;
                    push_text(&mut elements, &stack, content)?;
                }
                Event::Comment(_) | Event::PI(_) => {
                    if let Some(&current) = stack.last() {
                        elements[current].text_closed = true;
                    }
                }
                Event::Eof => break,
                // Declarations, doctype
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(DecodeError::MalformedDocument(format!(
                "unclosed element <{}>",
                elements[open].name
            )));
        }
        if elements.is_empty() {
            return Err(DecodeError::MalformedDocument("no root element".into()));
        }

        Ok(Self { elements })
    }

    /// All elements in document (pre-)order
    pub(crate) fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Direct children of `element` with local name `name`
    pub(crate) fn children_named<'a>(
        &'a self,
        element: &'a Element,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        element
            .children
            .iter()
            .map(move |&i| &self.elements[i])
            .filter(move |child| child.name == name)
    }
}

fn open_element(
    elements: &mut Vec<Element>,
    stack: &[usize],
    start: &BytesStart<'_>,
) -> DecodeResult<usize> {
    if stack.is_empty() && !elements.is_empty() {
        return Err(DecodeError::MalformedDocument(
            "more than one root element".into(),
        ));
    }

    let name = str::from_utf8(start.local_name().as_ref())?.to_string();

    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        attrs.push((key.to_string(), attr.unescape_value()?.into_owned()));
    }

    let idx = elements.len();
    elements.push(Element {
        name,
        attrs,
        text: None,
        children: Vec::new(),
        text_closed: false,
    });
    if let Some(&parent) = stack.last() {
        elements[parent].children.push(idx);
        elements[parent].text_closed = true;
    }
    Ok(idx)
}

fn push_text(elements: &mut [Element], stack: &[usize], content: &str) -> DecodeResult<()> {
    let Some(&current) = stack.last() else {
        if content.trim().is_empty() {
            return Ok(());
        }
        return Err(DecodeError::MalformedDocument(
            "character data outside the root element".into(),
        ));
    };

    let element = &mut elements[current];
    if element.text_closed || content.is_empty() {
        return Ok(());
    }
    element
        .text
        .get_or_insert_with(String::new)
        .push_str(content);
    Ok(())
}
