//! Graph storage layer
//!
//! Provides the `GraphData` decode target and, with the `storage` feature,
//! its Parquet persistence.

pub mod graph_data;
#[cfg(feature = "storage")]
pub mod parquet;

pub use graph_data::{EdgeRecord, GraphData, NodeRecord, Value};
