//! Text decoders
//!
//! Edge-list and GraphML text in, [`GraphData`](crate::GraphData) out. Each
//! call owns its graph until it returns it; nothing is shared across calls.

pub mod edgelist;
pub mod format;
pub mod graphml;
pub mod value;
mod xml;

pub use edgelist::{decode_edgelist, EdgeListOptions};
pub use format::{decode_file, Format};
pub use graphml::decode_graphml;
pub use value::parse_value;
