//! Input format selection and file loading

use super::{decode_edgelist, decode_graphml, EdgeListOptions};
use crate::error::DecodeResult;
use crate::storage::GraphData;
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Supported text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Delimited edge-list
    EdgeList,
    /// GraphML (XML)
    GraphMl,
}

impl Format {
    /// Guess the format from a file extension (case-insensitive)
    ///
    /// `graphml`/`xml` map to GraphML; `edgelist`, `edges`, `el`, `txt`, `tsv`
    /// and `csv` map to edge-list.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }

    /// Decode `text` in this format
    ///
    /// `options` only applies to [`Format::EdgeList`].
    ///
    /// # Errors
    ///
    /// Propagates the decoder's [`DecodeError`](crate::DecodeError)
    pub fn decode(self, text: &str, options: &EdgeListOptions) -> DecodeResult<GraphData> {
        match self {
            Self::EdgeList => decode_edgelist(text, options),
            Self::GraphMl => decode_graphml(text),
        }
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "graphml" | "xml" => Ok(Self::GraphMl),
            "edgelist" | "edges" | "el" | "txt" | "tsv" | "csv" => Ok(Self::EdgeList),
            other => Err(anyhow!("Unknown graph format: {other}")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EdgeList => "edgelist",
            Self::GraphMl => "graphml",
        })
    }
}

/// Read a file and decode it
///
/// When `format` is `None` it is inferred with [`Format::from_path`].
///
/// # Errors
///
/// Returns error if the format cannot be determined, the file cannot be read
/// as UTF-8, or decoding fails
pub async fn decode_file<P: AsRef<Path>>(
    path: P,
    format: Option<Format>,
    options: &EdgeListOptions,
) -> Result<GraphData> {
    let path = path.as_ref();

    let format = match format {
        Some(f) => f,
        None => Format::from_path(path)
            .with_context(|| format!("Cannot infer graph format from {}", path.display()))?,
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    debug!(path = %path.display(), %format, bytes = text.len(), "decoding file");

    format
        .decode(&text, options)
        .with_context(|| format!("Failed to decode {} as {format}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path("karate.graphml"), Some(Format::GraphMl));
        assert_eq!(Format::from_path("g.XML"), Some(Format::GraphMl));
        assert_eq!(Format::from_path("/tmp/net.edgelist"), Some(Format::EdgeList));
        assert_eq!(Format::from_path("data.tsv"), Some(Format::EdgeList));
        assert_eq!(Format::from_path("graph.gexf"), None);
        assert_eq!(Format::from_path("no_extension"), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("GraphML".parse::<Format>().unwrap(), Format::GraphMl);
        assert!("dot".parse::<Format>().is_err());
        assert_eq!(Format::EdgeList.to_string(), "edgelist");
        assert_eq!(
            Format::GraphMl.to_string().parse::<Format>().unwrap(),
            Format::GraphMl
        );
    }

    #[tokio::test]
    async fn test_decode_file_inferred() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("triangle.edgelist");
        tokio::fs::write(&path, "a b\nb c\nc a\n").await.unwrap();

        let graph = decode_file(&path, None, &EdgeListOptions::default())
            .await
            .unwrap();
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 3);
    }

    #[tokio::test]
    async fn test_decode_file_errors_carry_context() {
        let dir = tempdir().unwrap();

        let unknown = dir.path().join("graph.gexf");
        let err = decode_file(&unknown, None, &EdgeListOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Cannot infer graph format"));

        let missing = dir.path().join("missing.graphml");
        let err = decode_file(&missing, None, &EdgeListOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));

        let broken = dir.path().join("broken.graphml");
        tokio::fs::write(&broken, "<graphml>").await.unwrap();
        let err = decode_file(&broken, None, &EdgeListOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to decode"));
        assert!(err.downcast_ref::<crate::DecodeError>().is_some());
    }
}
