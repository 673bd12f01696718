//! Decode errors
//!
//! A single structural problem invalidates the whole decode; no partial
//! graphs are returned. Value coercion never produces an error.

use thiserror::Error;

/// Errors produced while decoding edge-list or GraphML text
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Edge-list line with fewer than two fields
    #[error("line {line}: expected at least two fields, got {content:?}")]
    MalformedLine {
        /// 1-based line number in the source text
        line: usize,
        /// Trimmed content of the offending line
        content: String,
    },

    /// Edge-list delimiter was the empty string
    #[error("edge-list delimiter must not be empty")]
    EmptyDelimiter,

    /// XML is not well formed
    #[error("malformed XML document: {0}")]
    MalformedDocument(String),

    /// Required identity attribute missing on a node, edge, or data element
    #[error("<{element}> element is missing required attribute `{attribute}`")]
    MissingAttribute {
        /// Local element name
        element: &'static str,
        /// Attribute that was expected
        attribute: &'static str,
    },

    /// Edge endpoint names a node id that was never declared
    #[error("edge references unknown node id {id:?}")]
    UnresolvedReference {
        /// The unresolved node id
        id: String,
    },

    /// `data` key not recorded during schema discovery (internal consistency failure)
    #[error("attribute {name:?} missing from discovered schema")]
    SchemaLookup {
        /// The attribute name that had no column
        name: String,
    },
}

impl From<quick_xml::Error> for DecodeError {
    fn from(e: quick_xml::Error) -> Self {
        Self::MalformedDocument(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DecodeError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedDocument(e.to_string())
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::MalformedDocument(e.to_string())
    }
}

/// Result alias for decoder entry points
pub type DecodeResult<T> = Result<T, DecodeError>;
