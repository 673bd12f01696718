//! `GraphData`: the decode target shared by every decoder
//!
//! # Layout
//!
//! ```text
//! GraphML: <node id="n0"><data key="color">red</data></node>
//!          <edge source="n0" target="n1"><data key="weight">5</data></edge>
//!
//! node_attr: ["label", "color"]     nodes: [("n0", "red"), ("n1", null)]
//! edge_attr: ["edge", "weight"]     edges: [((0, 1), 5)]
//! ```
//!
//! Column 0 of a node record is its label; column 0 of an edge record is the
//! `(source, target)` index pair. The remaining columns are [`Value`]s laid
//! out in schema order, with [`Value::Null`] for columns nothing supplied.

use std::collections::BTreeMap;
use std::fmt;

/// Graph-level attribute name carrying directedness
pub const DIRECTED: &str = "directed";

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent marker
    #[default]
    Null,
    /// Boolean (graph-level `directed`)
    Bool(bool),
    /// Base-10 integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Anything that did not parse as a number
    Str(String),
}

impl Value {
    /// True for the absent marker
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer payload, if this is an `Int`
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64` (`Int` or `Float`)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Bool`
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a `Str`
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// One node row: label in column 0, attribute values after it
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub(crate) label: String,
    pub(crate) attrs: Vec<Value>,
}

impl NodeRecord {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attrs: Vec::new(),
        }
    }

    /// Node label/identifier as supplied by the source format
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attribute columns 1.. in `node_attr` order
    #[must_use]
    pub fn attrs(&self) -> &[Value] {
        &self.attrs
    }

    /// Value at schema column `column` (`None` for the label column or out of range)
    #[must_use]
    pub fn attr(&self, column: usize) -> Option<&Value> {
        column.checked_sub(1).and_then(|i| self.attrs.get(i))
    }

    /// Total column count, label included
    #[must_use]
    pub fn width(&self) -> usize {
        self.attrs.len() + 1
    }
}

/// One edge row: `(source, target)` in column 0, attribute values after it
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub(crate) source: usize,
    pub(crate) target: usize,
    pub(crate) attrs: Vec<Value>,
}

impl EdgeRecord {
    pub(crate) const fn new(source: usize, target: usize, attrs: Vec<Value>) -> Self {
        Self {
            source,
            target,
            attrs,
        }
    }

    /// Source node index
    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Target node index
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// `(source, target)` node index pair
    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) {
        (self.source, self.target)
    }

    /// Attribute columns 1.. in `edge_attr` order (raw tokens for edge-lists)
    #[must_use]
    pub fn attrs(&self) -> &[Value] {
        &self.attrs
    }

    /// Value at schema column `column` (`None` for the endpoint column or out of range)
    #[must_use]
    pub fn attr(&self, column: usize) -> Option<&Value> {
        column.checked_sub(1).and_then(|i| self.attrs.get(i))
    }

    /// Total column count, endpoint pair included
    #[must_use]
    pub fn width(&self) -> usize {
        self.attrs.len() + 1
    }
}

/// Decoded graph with a fixed columnar attribute schema
///
/// Built by exactly one decode call and then handed to the caller, which only
/// reads it.
///
/// # Example
///
/// ```
/// use netconv::{decode_edgelist, EdgeListOptions};
///
/// let graph = decode_edgelist("a b\nb c\na c", &EdgeListOptions::default()).unwrap();
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.edges()[2].endpoints(), (0, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    pub(crate) nodes: Vec<NodeRecord>,
    pub(crate) edges: Vec<EdgeRecord>,
    pub(crate) graph_attr: BTreeMap<String, Value>,
    pub(crate) node_attr: Vec<String>,
    pub(crate) edge_attr: Vec<String>,
}

impl GraphData {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Node records in index order
    #[must_use]
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Edge records in source-document order
    #[must_use]
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Graph-level attributes
    #[must_use]
    pub const fn graph_attr(&self) -> &BTreeMap<String, Value> {
        &self.graph_attr
    }

    /// Node column names (`node_attr[0] == "label"` for GraphML)
    #[must_use]
    pub fn node_attr(&self) -> &[String] {
        &self.node_attr
    }

    /// Edge column names (`edge_attr[0] == "edge"` for GraphML)
    #[must_use]
    pub fn edge_attr(&self) -> &[String] {
        &self.edge_attr
    }

    /// Number of nodes
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether `graph_attr["directed"]` is `true`; edge-lists are undirected
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.graph_attr
            .get(DIRECTED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Column index for a node attribute name
    ///
    /// A name repeated in the schema resolves to its last column, matching how
    /// the decoder writes values.
    #[must_use]
    pub fn node_column(&self, name: &str) -> Option<usize> {
        self.node_attr.iter().rposition(|n| n == name)
    }

    /// Column index for an edge attribute name (last occurrence wins)
    #[must_use]
    pub fn edge_column(&self, name: &str) -> Option<usize> {
        self.edge_attr.iter().rposition(|n| n == name)
    }

    /// Node index for a label
    ///
    /// A repeated label resolves to its last record, the same node the
    /// GraphML decoder attaches edges to.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<usize> {
        self.nodes.iter().rposition(|n| n.label == label)
    }

    /// Append a node row and return its index
    pub(crate) fn push_node(&mut self, record: NodeRecord) -> usize {
        self.nodes.push(record);
        self.nodes.len() - 1
    }
}
