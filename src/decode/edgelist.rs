//! Edge-list decoder
//!
//! One edge per line: `node1<delim>node2[<delim>attr...]`. Node labels get
//! sequential indices in first-occurrence order.

use crate::error::{DecodeError, DecodeResult};
use crate::storage::{EdgeRecord, GraphData, NodeRecord, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Edge-list decoding options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeListOptions {
    /// Field delimiter (default: single space)
    pub delimiter: String,
    /// Keep trailing tokens as raw edge attributes
    pub attr: bool,
    /// Input has a header line (recognized, currently not applied)
    pub header: bool,
}

impl Default for EdgeListOptions {
    fn default() -> Self {
        Self {
            delimiter: " ".to_string(),
            attr: false,
            header: false,
        }
    }
}

impl EdgeListOptions {
    /// Options with a custom delimiter
    #[must_use]
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }

    /// Enable or disable attribute capture
    #[must_use]
    pub const fn attr(mut self, attr: bool) -> Self {
        self.attr = attr;
        self
    }

    /// Mark the input as carrying a header line
    #[must_use]
    pub const fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

/// Decode edge-list text into a [`GraphData`]
///
/// Attribute tokens are kept verbatim as [`Value::Str`]; no numeric coercion
/// happens on this path. No schema or graph attributes are set, so the result
/// reads as undirected.
///
/// # Errors
///
/// - [`DecodeError::EmptyDelimiter`] if `options.delimiter` is empty
/// - [`DecodeError::MalformedLine`] if a non-empty line has fewer than two fields
///
/// # Example
///
/// ```
/// use netconv::{decode_edgelist, EdgeListOptions};
///
/// let opts = EdgeListOptions::with_delimiter(",").attr(true);
/// let graph = decode_edgelist("a,b,0.5\nb,c,1", &opts).unwrap();
///
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.edges()[0].attrs()[0].as_str(), Some("0.5"));
/// ```
pub fn decode_edgelist(text: &str, options: &EdgeListOptions) -> DecodeResult<GraphData> {
    let delimiter = options.delimiter.as_str();
    if delimiter.is_empty() {
        return Err(DecodeError::EmptyDelimiter);
    }
    if options.header {
        debug!("edge-list header option set; header lines are not skipped");
    }

    let mut graph = GraphData::new();
    let mut label_to_index: HashMap<&str, usize> = HashMap::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(delimiter);
        let (Some(node1), Some(node2)) = (fields.next(), fields.next()) else {
            return Err(DecodeError::MalformedLine {
                line: line_no + 1,
                content: line.to_string(),
            });
        };

        let source = intern(&mut graph, &mut label_to_index, node1);
        let target = intern(&mut graph, &mut label_to_index, node2);

        let attrs = if options.attr {
            fields.map(Value::from).collect()
        } else {
            Vec::new()
        };

        trace!(line = line_no + 1, source, target, "edge");
        graph.edges.push(EdgeRecord::new(source, target, attrs));
    }

    debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "decoded edge-list"
    );
    Ok(graph)
}

/// Index for `label`, appending a singleton node record the first time it is seen
fn intern<'a>(
    graph: &mut GraphData,
    label_to_index: &mut HashMap<&'a str, usize>,
    label: &'a str,
) -> usize {
    *label_to_index
        .entry(label)
        .or_insert_with(|| graph.push_node(NodeRecord::new(label)))
}
