//! netconv: edge-list and GraphML decoding into a columnar graph
//!
//! # Overview
//!
//! netconv turns plain-text graph serializations into one in-memory
//! representation, [`GraphData`]: ordered node and edge records with a fixed
//! attribute column schema plus a graph-level attribute map.
//!
//! # Quick Start
//!
//! ```
//! use netconv::{decode_edgelist, decode_graphml, EdgeListOptions, Value};
//!
//! // Edge-list: sequential node indices in first-occurrence order
//! let graph = decode_edgelist("a b\nb c\na c", &EdgeListOptions::default()).unwrap();
//! assert_eq!(graph.num_nodes(), 3);
//!
//! // GraphML: two-pass decode with typed attribute columns
//! let xml = r#"<graphml><graph edgedefault="directed">
//!   <node id="n0"><data key="size">3</data></node><node id="n1"/>
//!   <edge source="n0" target="n1"/>
//! </graph></graphml>"#;
//! let graph = decode_graphml(xml).unwrap();
//! assert!(graph.is_directed());
//! assert_eq!(graph.node_attr(), &["label", "size"]);
//! assert_eq!(graph.nodes()[0].attrs(), &[Value::Int(3)]);
//! assert_eq!(graph.nodes()[1].attrs(), &[Value::Null]);
//! ```
//!
//! # Architecture
//!
//! - **Decoders**: value coercion, edge-list, GraphML (schema discovery, then population)
//! - **Storage**: `GraphData` records and Parquet persistence (`storage` feature)
//! - **I/O**: async file loading with format inference

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod error;
pub mod storage;

// Re-export core types
pub use decode::{
    decode_edgelist, decode_file, decode_graphml, parse_value, EdgeListOptions, Format,
};
pub use error::{DecodeError, DecodeResult};
pub use storage::{EdgeRecord, GraphData, NodeRecord, Value};

// Error type
pub use anyhow::{Error, Result};
