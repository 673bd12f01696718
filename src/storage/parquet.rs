//! Parquet I/O for `GraphData` persistence
//!
//! Based on `DuckDB` (Raasveldt et al., SIGMOD 2019) columnar storage patterns.
//!
//! # Format
//!
//! A graph is stored as two Parquet files:
//! - `{path}_nodes.parquet`: (label, attr...)
//! - `{path}_edges.parquet`: (source, target, attr...)
//!
//! Attribute columns whose non-null values share one type are stored natively
//! (`Int64`, `Float64`, `Boolean`, `Utf8`). Mixed columns fall back to `Utf8`
//! with a one-letter type tag per cell and the field flagged as tagged.
//! Graph-level attributes travel as tagged strings in the edge table's schema
//! metadata.

use super::graph_data::{EdgeRecord, GraphData, NodeRecord, Value};
use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const SCHEMA_KEY: &str = "netconv.schema";
const PAIR_COLUMN_KEY: &str = "netconv.pair_column";
const TAGGED_KEY: &str = "netconv.tagged";
const GRAPH_ATTR_PREFIX: &str = "graph_attr.";

impl GraphData {
    /// Write graph to Parquet files
    ///
    /// Creates two files:
    /// - `{path}_nodes.parquet`: Node rows (label, attributes)
    /// - `{path}_edges.parquet`: Edge rows (source, target, attributes)
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails or Arrow conversion fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let base_path = path.as_ref();

        let nodes = self.nodes_batch()?;
        write_batch(&nodes_path(base_path), &nodes)?;

        let edges = self.edges_batch()?;
        write_batch(&edges_path(base_path), &edges)?;

        debug!(
            path = %base_path.display(),
            nodes = self.num_nodes(),
            edges = self.num_edges(),
            "wrote graph parquet"
        );
        Ok(())
    }

    /// Read graph from Parquet files written by [`GraphData::write_parquet`]
    ///
    /// # Errors
    ///
    /// Returns error if files don't exist, Arrow conversion fails, or an edge
    /// references a node index outside the node table
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref();

        let mut graph = Self::new();
        read_nodes(&nodes_path(base_path), &mut graph)?;
        read_edges(&edges_path(base_path), &mut graph)?;

        debug!(
            path = %base_path.display(),
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            "read graph parquet"
        );
        Ok(graph)
    }

    fn has_schema(&self) -> bool {
        !self.node_attr.is_empty() || !self.edge_attr.is_empty()
    }

    fn nodes_batch(&self) -> Result<RecordBatch> {
        let named = self.has_schema();
        let width = self.nodes.iter().map(NodeRecord::width).max().unwrap_or(1);

        let label_name = self.node_attr.first().map_or("label", String::as_str);
        let labels: Vec<&str> = self.nodes.iter().map(NodeRecord::label).collect();

        let mut fields = vec![Field::new(label_name, DataType::Utf8, false)];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(labels))];

        for column in 1..width {
            let name = column_name(&self.node_attr, column);
            let values: Vec<&Value> = self.nodes.iter().map(|n| cell(n.attr(column))).collect();
            let (field, array) = encode_column(&name, &values);
            fields.push(field);
            columns.push(array);
        }

        let metadata = HashMap::from([(SCHEMA_KEY.to_string(), named.to_string())]);
        let schema = Arc::new(Schema::new(fields).with_metadata(metadata));

        RecordBatch::try_new(schema, columns).context("Failed to create nodes RecordBatch")
    }

    fn edges_batch(&self) -> Result<RecordBatch> {
        let named = self.has_schema();
        let width = self.edges.iter().map(EdgeRecord::width).max().unwrap_or(1);

        let sources: Vec<u64> = self.edges.iter().map(|e| e.source as u64).collect();
        let targets: Vec<u64> = self.edges.iter().map(|e| e.target as u64).collect();

        let mut fields = vec![
            Field::new("source", DataType::UInt64, false),
            Field::new("target", DataType::UInt64, false),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from(sources)),
            Arc::new(UInt64Array::from(targets)),
        ];

        for column in 1..width {
            let name = column_name(&self.edge_attr, column);
            let values: Vec<&Value> = self.edges.iter().map(|e| cell(e.attr(column))).collect();
            let (field, array) = encode_column(&name, &values);
            fields.push(field);
            columns.push(array);
        }

        let mut metadata = HashMap::from([(SCHEMA_KEY.to_string(), named.to_string())]);
        if let Some(pair) = self.edge_attr.first() {
            metadata.insert(PAIR_COLUMN_KEY.to_string(), pair.clone());
        }
        for (key, value) in &self.graph_attr {
            metadata.insert(format!("{GRAPH_ATTR_PREFIX}{key}"), tag(value));
        }
        let schema = Arc::new(Schema::new(fields).with_metadata(metadata));

        RecordBatch::try_new(schema, columns).context("Failed to create edges RecordBatch")
    }
}

fn nodes_path(base_path: &Path) -> String {
    format!("{}_nodes.parquet", base_path.display())
}

fn edges_path(base_path: &Path) -> String {
    format!("{}_edges.parquet", base_path.display())
}

fn column_name(names: &[String], column: usize) -> String {
    names
        .get(column)
        .cloned()
        .unwrap_or_else(|| format!("attr_{column}"))
}

static NULL: Value = Value::Null;

fn cell(value: Option<&Value>) -> &Value {
    value.unwrap_or(&NULL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int,
    Float,
    Str,
    Tagged,
}

fn infer_kind(values: &[&Value]) -> ColumnKind {
    let mut kind = None;
    for value in values {
        let this = match value {
            Value::Null => continue,
            Value::Bool(_) => ColumnKind::Bool,
            Value::Int(_) => ColumnKind::Int,
            Value::Float(_) => ColumnKind::Float,
            Value::Str(_) => ColumnKind::Str,
        };
        match kind {
            None => kind = Some(this),
            Some(prev) if prev == this => {}
            Some(_) => return ColumnKind::Tagged,
        }
    }
    kind.unwrap_or(ColumnKind::Str)
}

fn encode_column(name: &str, values: &[&Value]) -> (Field, ArrayRef) {
    match infer_kind(values) {
        ColumnKind::Bool => (
            Field::new(name, DataType::Boolean, true),
            Arc::new(BooleanArray::from(
                values.iter().map(|v| v.as_bool()).collect::<Vec<_>>(),
            )),
        ),
        ColumnKind::Int => (
            Field::new(name, DataType::Int64, true),
            Arc::new(Int64Array::from(
                values.iter().map(|v| v.as_i64()).collect::<Vec<_>>(),
            )),
        ),
        ColumnKind::Float => (
            Field::new(name, DataType::Float64, true),
            Arc::new(Float64Array::from(
                values.iter().map(|v| v.as_f64()).collect::<Vec<_>>(),
            )),
        ),
        ColumnKind::Str => (
            Field::new(name, DataType::Utf8, true),
            Arc::new(StringArray::from(
                values.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
            )),
        ),
        ColumnKind::Tagged => {
            let tagged: Vec<Option<String>> = values
                .iter()
                .map(|v| (!v.is_null()).then(|| tag(v)))
                .collect();
            let metadata = HashMap::from([(TAGGED_KEY.to_string(), "true".to_string())]);
            (
                Field::new(name, DataType::Utf8, true).with_metadata(metadata),
                Arc::new(StringArray::from(tagged)),
            )
        }
    }
}

/// `b:`/`i:`/`f:`/`s:`/`n:` prefixed text form of a value
fn tag(value: &Value) -> String {
    match value {
        Value::Null => "n:".to_string(),
        Value::Bool(v) => format!("b:{v}"),
        Value::Int(v) => format!("i:{v}"),
        Value::Float(v) => format!("f:{v}"),
        Value::Str(s) => format!("s:{s}"),
    }
}

fn untag(text: &str) -> Result<Value> {
    let (kind, body) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid tagged value {text:?}"))?;
    Ok(match kind {
        "n" => Value::Null,
        "b" => Value::Bool(body.parse().context("Invalid tagged bool")?),
        "i" => Value::Int(body.parse().context("Invalid tagged int")?),
        "f" => Value::Float(body.parse().context("Invalid tagged float")?),
        "s" => Value::Str(body.to_string()),
        other => bail!("Unknown value tag {other:?}"),
    })
}

fn decode_column(array: &ArrayRef, field: &Field) -> Result<Vec<Value>> {
    let rows = 0..array.len();
    let values: Vec<Value> = match field.data_type() {
        DataType::Boolean => {
            let a = downcast::<BooleanArray>(array, field)?;
            rows.map(|i| {
                if a.is_null(i) {
                    Value::Null
                } else {
                    Value::Bool(a.value(i))
                }
            })
            .collect()
        }
        DataType::Int64 => {
            let a = downcast::<Int64Array>(array, field)?;
            rows.map(|i| {
                if a.is_null(i) {
                    Value::Null
                } else {
                    Value::Int(a.value(i))
                }
            })
            .collect()
        }
        DataType::Float64 => {
            let a = downcast::<Float64Array>(array, field)?;
            rows.map(|i| {
                if a.is_null(i) {
                    Value::Null
                } else {
                    Value::Float(a.value(i))
                }
            })
            .collect()
        }
        DataType::Utf8 => {
            let a = downcast::<StringArray>(array, field)?;
            let tagged = field.metadata().get(TAGGED_KEY).is_some_and(|v| v == "true");
            let mut out = Vec::with_capacity(a.len());
            for i in rows {
                out.push(if a.is_null(i) {
                    Value::Null
                } else if tagged {
                    untag(a.value(i))?
                } else {
                    Value::Str(a.value(i).to_string())
                });
            }
            out
        }
        other => bail!("Unsupported column type {other} for {}", field.name()),
    };
    Ok(values)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, field: &Field) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("Invalid {} column type", field.name()))
}

fn write_batch(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {path}"))?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::try_new(3)?,
        ))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(())
}

fn read_batches(path: &str) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read {path}"))?;
    Ok((schema, batches))
}

fn is_named(schema: &Schema) -> bool {
    schema.metadata().get(SCHEMA_KEY).is_some_and(|v| v == "true")
}

/// Positional (schema-less) rows were ragged before padding
fn trim_padding(values: &mut Vec<Value>) {
    while values.last().is_some_and(Value::is_null) {
        values.pop();
    }
}

/// Decode every attribute column of a batch starting at `first`, transposed into rows
fn attribute_rows(batch: &RecordBatch, schema: &Schema, first: usize) -> Result<Vec<Vec<Value>>> {
    let mut rows = vec![Vec::new(); batch.num_rows()];
    for column in first..batch.num_columns() {
        let values = decode_column(batch.column(column), schema.field(column))?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
    Ok(rows)
}

fn read_nodes(path: &str, graph: &mut GraphData) -> Result<()> {
    let (schema, batches) = read_batches(path)?;
    let named = is_named(&schema);

    if named {
        graph.node_attr = schema.fields().iter().map(|f| f.name().clone()).collect();
    }

    for batch in &batches {
        let labels = downcast::<StringArray>(batch.column(0), schema.field(0))?;
        let rows = attribute_rows(batch, &schema, 1)?;

        for (i, mut attrs) in rows.into_iter().enumerate() {
            if !named {
                trim_padding(&mut attrs);
            }
            let mut node = NodeRecord::new(labels.value(i));
            node.attrs = attrs;
            graph.push_node(node);
        }
    }
    Ok(())
}

fn read_edges(path: &str, graph: &mut GraphData) -> Result<()> {
    let (schema, batches) = read_batches(path)?;
    let named = is_named(&schema);
    let metadata = schema.metadata();

    if named {
        let pair = metadata
            .get(PAIR_COLUMN_KEY)
            .cloned()
            .unwrap_or_else(|| "edge".to_string());
        graph.edge_attr = std::iter::once(pair)
            .chain(schema.fields().iter().skip(2).map(|f| f.name().clone()))
            .collect();
    }

    let mut graph_attr = BTreeMap::new();
    for (key, value) in metadata {
        if let Some(name) = key.strip_prefix(GRAPH_ATTR_PREFIX) {
            graph_attr.insert(name.to_string(), untag(value)?);
        }
    }
    graph.graph_attr = graph_attr;

    let num_nodes = graph.num_nodes();
    for batch in &batches {
        let sources = downcast::<UInt64Array>(batch.column(0), schema.field(0))?;
        let targets = downcast::<UInt64Array>(batch.column(1), schema.field(1))?;
        let rows = attribute_rows(batch, &schema, 2)?;

        for (i, mut attrs) in rows.into_iter().enumerate() {
            let source = usize::try_from(sources.value(i))?;
            let target = usize::try_from(targets.value(i))?;
            if source >= num_nodes || target >= num_nodes {
                bail!("Edge ({source}, {target}) references a node outside 0..{num_nodes}");
            }
            if !named {
                trim_padding(&mut attrs);
            }
            graph.edges.push(EdgeRecord::new(source, target, attrs));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_edgelist, decode_graphml, EdgeListOptions};
    use tempfile::tempdir;

    const GRAPHML: &str = r#"<graphml><graph edgedefault="directed">
        <data key="name">demo</data>
        <node id="a"><data key="size">3</data><data key="color">red</data></node>
        <node id="b"><data key="size">4</data></node>
        <node id="c"><data key="color">7</data></node>
        <edge source="a" target="b"><data key="weight">0.5</data></edge>
        <edge source="b" target="c"><data key="weight">2.25</data><data key="kind">x</data></edge>
    </graph></graphml>"#;

    #[tokio::test]
    async fn test_graphml_parquet_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_graph");

        let graph = decode_graphml(GRAPHML).unwrap();
        graph.write_parquet(&path).await.unwrap();

        let loaded = GraphData::read_parquet(&path).await.unwrap();
        assert_eq!(loaded, graph);
        assert!(loaded.is_directed());
        assert_eq!(loaded.graph_attr().get("name"), Some(&Value::from("demo")));
    }

    #[tokio::test]
    async fn test_edgelist_parquet_roundtrip_ragged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edges");

        let opts = EdgeListOptions::default().attr(true);
        let graph = decode_edgelist("a b 1 x\nb c\nc a 3", &opts).unwrap();
        graph.write_parquet(&path).await.unwrap();

        let loaded = GraphData::read_parquet(&path).await.unwrap();
        assert_eq!(loaded, graph);
        assert!(loaded.node_attr().is_empty());
        assert!(loaded.graph_attr().is_empty());
    }

    #[tokio::test]
    async fn test_empty_graph_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty_graph");

        let graph = GraphData::new();
        graph.write_parquet(&path).await.unwrap();

        let loaded = GraphData::read_parquet(&path).await.unwrap();
        assert_eq!(loaded.num_nodes(), 0);
        assert_eq!(loaded.num_edges(), 0);
    }

    #[tokio::test]
    async fn test_missing_files() {
        let dir = tempdir().unwrap();
        let err = GraphData::read_parquet(dir.path().join("nothing"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_column_kinds() {
        let (i, s, f, n) = (Value::Int(1), Value::from("a"), Value::Float(1.5), Value::Null);
        assert_eq!(infer_kind(&[&i, &n, &i]), ColumnKind::Int);
        assert_eq!(infer_kind(&[&f]), ColumnKind::Float);
        assert_eq!(infer_kind(&[&n, &n]), ColumnKind::Str);
        assert_eq!(infer_kind(&[&i, &f]), ColumnKind::Tagged);
        assert_eq!(infer_kind(&[&s, &i]), ColumnKind::Tagged);
    }

    #[test]
    fn test_tag_roundtrip() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Int(-3),
            Value::Float(0.1),
            Value::from("s:with:colons"),
        ] {
            assert_eq!(untag(&tag(&value)).unwrap(), value);
        }
        assert!(untag("no tag").is_err());
        assert!(untag("z:1").is_err());
    }
}
