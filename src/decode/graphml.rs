//! GraphML decoder
//!
//! Two passes over one parsed element tree:
//!
//! 1. **Schema discovery**: assign node indices, collect `data` keys for nodes
//!    and edges (first-seen order), read `edgedefault` and graph-level data.
//! 2. **Population**: resolve edge endpoints and write every coerced `data`
//!    value into its fixed column.
//!
//! Rows are allocated at full width once the schema is known; columns that no
//! `data` element fills stay [`Value::Null`].

use super::value::parse_value;
use super::xml::{Document, Element};
use crate::error::{DecodeError, DecodeResult};
use crate::storage::graph_data::DIRECTED;
use crate::storage::{EdgeRecord, GraphData, NodeRecord, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, trace};

/// Reserved name of node column 0
pub const NODE_LABEL_COLUMN: &str = "label";

/// Reserved name of edge column 0
pub const EDGE_PAIR_COLUMN: &str = "edge";

/// Decode a GraphML document into a [`GraphData`]
///
/// `node_attr` is `["label", ...]` and `edge_attr` is `["edge", ...]`, with
/// discovered `data` keys in first-seen document order. Node and edge `data`
/// values go through [`parse_value`]; graph-level `data` values are kept as
/// raw strings. `graph_attr["directed"]` is always present.
///
/// # Errors
///
/// - [`DecodeError::MalformedDocument`] if the XML is not well formed
/// - [`DecodeError::MissingAttribute`] for a node without `id`, an edge without
///   `source`/`target`, or a `data` element without any attribute
/// - [`DecodeError::UnresolvedReference`] if an edge names an undeclared node
///
/// # Example
///
/// ```
/// use netconv::{decode_graphml, Value};
///
/// let xml = r#"<graphml><graph edgedefault="directed">
///     <node id="n0"/><node id="n1"/>
///     <edge source="n0" target="n1"><data key="weight">5</data></edge>
/// </graph></graphml>"#;
///
/// let graph = decode_graphml(xml).unwrap();
/// assert!(graph.is_directed());
/// assert_eq!(graph.edge_attr(), &["edge", "weight"]);
/// assert_eq!(graph.edges()[0].endpoints(), (0, 1));
/// assert_eq!(graph.edges()[0].attrs(), &[Value::Int(5)]);
/// ```
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn decode_graphml(text: &str) -> DecodeResult<GraphData> {
    let doc = Document::parse(text)?;
    trace!(elements = doc.elements().len(), "parsed document");

    let mut graph = GraphData::new();
    graph.graph_attr.insert(DIRECTED.to_string(), Value::Bool(false));

    // Pass 1: schema discovery
    let mut id_to_index: HashMap<&str, usize> = HashMap::new();
    let mut node_schema = Schema::new(NODE_LABEL_COLUMN);
    let mut edge_schema = Schema::new(EDGE_PAIR_COLUMN);
    let mut num_edges = 0_usize;

    for element in doc.elements() {
        match element.name.as_str() {
            "graph" => read_graph_header(&doc, element, &mut graph.graph_attr),
            "node" => {
                let id = required(element, "node", "id")?;
                for data in doc.children_named(element, "data") {
                    node_schema.discover(data_key(data)?);
                }
                let index = graph.push_node(NodeRecord::new(id));
                id_to_index.insert(id, index);
            }
            "edge" => {
                num_edges += 1;
                for data in doc.children_named(element, "data") {
                    edge_schema.discover(data_key(data)?);
                }
            }
            _ => {}
        }
    }

    trace!(
        nodes = graph.num_nodes(),
        edges = num_edges,
        node_columns = node_schema.width(),
        edge_columns = edge_schema.width(),
        "schema fixed"
    );

    for node in &mut graph.nodes {
        node.attrs = vec![Value::Null; node_schema.width() - 1];
    }
    graph.edges.reserve_exact(num_edges);

    // Pass 2: population
    let mut node_index = 0_usize;
    for element in doc.elements() {
        match element.name.as_str() {
            "node" => {
                let record = &mut graph.nodes[node_index];
                for data in doc.children_named(element, "data") {
                    let slot = node_schema.slot(data_key(data)?)?;
                    record.attrs[slot] = parse_value(data.text());
                }
                node_index += 1;
            }
            "edge" => {
                let source = resolve(&id_to_index, required(element, "edge", "source")?)?;
                let target = resolve(&id_to_index, required(element, "edge", "target")?)?;

                let mut attrs = vec![Value::Null; edge_schema.width() - 1];
                for data in doc.children_named(element, "data") {
                    let slot = edge_schema.slot(data_key(data)?)?;
                    attrs[slot] = parse_value(data.text());
                }
                graph.edges.push(EdgeRecord::new(source, target, attrs));
            }
            _ => {}
        }
    }

    graph.node_attr = node_schema.into_names();
    graph.edge_attr = edge_schema.into_names();

    debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        directed = graph.is_directed(),
        "decoded GraphML"
    );
    Ok(graph)
}

/// Ordered attribute schema: column names plus a name → column lookup
///
/// Column 0 is a reserved placeholder that is never entered in the lookup, so
/// a `data` key spelled like the placeholder gets its own later column.
#[derive(Debug)]
struct Schema {
    names: Vec<String>,
    columns: HashMap<String, usize>,
}

impl Schema {
    fn new(placeholder: &str) -> Self {
        Self {
            names: vec![placeholder.to_string()],
            columns: HashMap::new(),
        }
    }

    /// Record `name`, keeping first-seen order
    fn discover(&mut self, name: &str) {
        if !self.columns.contains_key(name) {
            self.columns.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }

    fn width(&self) -> usize {
        self.names.len()
    }

    /// Position of `name` within a row's attribute values (schema column - 1)
    fn slot(&self, name: &str) -> DecodeResult<usize> {
        self.columns
            .get(name)
            .and_then(|column| column.checked_sub(1))
            .ok_or_else(|| DecodeError::SchemaLookup {
                name: name.to_string(),
            })
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

fn read_graph_header(doc: &Document, graph: &Element, graph_attr: &mut BTreeMap<String, Value>) {
    if graph
        .attr("edgedefault")
        .is_some_and(|d| d.eq_ignore_ascii_case("directed"))
    {
        // Individual edges may override edgedefault; that is not checked.
        graph_attr.insert(DIRECTED.to_string(), Value::Bool(true));
    }

    for data in doc.children_named(graph, "data") {
        if let Some(key) = data.attr("key") {
            let value = data.text().map_or(Value::Null, Value::from);
            graph_attr.insert(key.to_string(), value);
        }
    }
}

/// Attribute name declared by a `data` element: its `key`, else its first attribute value
fn data_key(data: &Element) -> DecodeResult<&str> {
    data.attr("key")
        .or_else(|| data.first_attr_value())
        .ok_or(DecodeError::MissingAttribute {
            element: "data",
            attribute: "key",
        })
}

fn required<'a>(
    element: &'a Element,
    element_name: &'static str,
    attribute: &'static str,
) -> DecodeResult<&'a str> {
    element.attr(attribute).ok_or(DecodeError::MissingAttribute {
        element: element_name,
        attribute,
    })
}

fn resolve(id_to_index: &HashMap<&str, usize>, id: &str) -> DecodeResult<usize> {
    id_to_index
        .get(id)
        .copied()
        .ok_or_else(|| DecodeError::UnresolvedReference { id: id.to_string() })
}
