//! Integration tests for netconv
//!
//! Tests real-world usage scenarios (social networks, weighted dependency graphs)

use netconv::{
    decode_edgelist, decode_file, decode_graphml, DecodeError, EdgeListOptions, Format, GraphData,
    Value,
};

/// Route decoder events to the test output; set `RUST_LOG=netconv=trace` to see them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Zachary-style fragment with a key section, typed data, and a graph-level name
const KARATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key id="club" for="node" attr.name="club" attr.type="string"/>
  <key id="weight" for="edge" attr.name="weight" attr.type="double"/>
  <graph id="G" edgedefault="undirected">
    <data key="name">karate</data>
    <node id="1"><data key="club">Mr. Hi</data></node>
    <node id="2"><data key="club">Mr. Hi</data></node>
    <node id="34"><data key="club">Officer</data></node>
    <edge source="1" target="2"><data key="weight">4</data></edge>
    <edge source="2" target="34"><data key="weight">0.5</data></edge>
    <edge source="34" target="1"/>
  </graph>
</graphml>"#;

#[test]
fn test_karate_fragment() {
    init_tracing();
    let graph = decode_graphml(KARATE).unwrap();

    assert!(!graph.is_directed());
    assert_eq!(graph.graph_attr().get("name"), Some(&Value::from("karate")));

    assert_eq!(graph.node_attr(), &["label", "club"]);
    assert_eq!(graph.edge_attr(), &["edge", "weight"]);

    // Node labels stay strings even when numeric
    let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label()).collect();
    assert_eq!(labels, vec!["1", "2", "34"]);
    assert_eq!(graph.nodes()[2].attrs(), &[Value::from("Officer")]);

    let weights: Vec<&Value> = graph.edges().iter().map(|e| &e.attrs()[0]).collect();
    assert_eq!(weights, vec![&Value::Int(4), &Value::Float(0.5), &Value::Null]);
    assert_eq!(graph.edges()[2].endpoints(), (2, 0));
}

#[test]
fn test_directed_weight_scenario() {
    let xml = r#"<graphml><graph edgedefault="directed">
        <node id="n0"/><node id="n1"/>
        <edge source="n0" target="n1"><data key="weight">5</data></edge>
    </graph></graphml>"#;

    let graph = decode_graphml(xml).unwrap();

    assert_eq!(graph.graph_attr().get("directed"), Some(&Value::Bool(true)));
    assert_eq!(graph.edge_attr(), &["edge", "weight"]);
    assert_eq!(graph.edges()[0].endpoints(), (0, 1));
    assert_eq!(graph.edges()[0].attr(1), Some(&Value::Int(5)));
}

#[test]
fn test_edgelist_scenario() {
    let graph = decode_edgelist("a b\nb c\na c", &EdgeListOptions::default()).unwrap();

    let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label()).collect();
    let pairs: Vec<(usize, usize)> = graph.edges().iter().map(|e| e.endpoints()).collect();

    assert_eq!(labels, vec!["a", "b", "c"]);
    assert_eq!(pairs, vec![(0, 1), (1, 2), (0, 2)]);
    assert_eq!(graph.node_index("c"), Some(2));
}

#[test]
fn test_weighted_csv_edgelist() {
    let text = "lib,core,3\napp,lib,1\napp,core,2\n";
    let opts = EdgeListOptions::with_delimiter(",").attr(true);

    let graph = decode_edgelist(text, &opts).unwrap();

    assert_eq!(graph.num_nodes(), 3);
    // Tokens are not coerced on the edge-list path
    assert_eq!(graph.edges()[0].attrs(), &[Value::from("3")]);
}

#[test]
fn test_decode_twice_is_identical() {
    let first = decode_graphml(KARATE).unwrap();
    let second = decode_graphml(KARATE).unwrap();
    assert_eq!(first, second);

    let text = "x y 1\ny z 2\nz x";
    let opts = EdgeListOptions::default().attr(true);
    assert_eq!(
        decode_edgelist(text, &opts).unwrap(),
        decode_edgelist(text, &opts).unwrap()
    );
}

#[test]
fn test_undeclared_source_fails() {
    let xml = r#"<graphml><graph><node id="a"/><edge source="zz" target="a"/></graph></graphml>"#;
    let err = decode_graphml(xml).unwrap_err();
    assert!(matches!(err, DecodeError::UnresolvedReference { ref id } if id == "zz"));
    assert!(err.to_string().contains("zz"));
}

#[test]
fn test_format_dispatch_matches_direct_calls() {
    let opts = EdgeListOptions::default();
    assert_eq!(
        Format::GraphMl.decode(KARATE, &opts).unwrap(),
        decode_graphml(KARATE).unwrap()
    );
    assert_eq!(
        Format::EdgeList.decode("a b", &opts).unwrap(),
        decode_edgelist("a b", &opts).unwrap()
    );
}

#[tokio::test]
async fn test_file_to_parquet_pipeline() {
    use tempfile::tempdir;
    init_tracing();

    let dir = tempdir().unwrap();
    let source = dir.path().join("karate.graphml");
    tokio::fs::write(&source, KARATE).await.unwrap();

    // Load
    let graph = decode_file(&source, None, &EdgeListOptions::default())
        .await
        .unwrap();
    assert_eq!(graph.num_nodes(), 3);

    // Save
    let base = dir.path().join("karate");
    graph.write_parquet(&base).await.unwrap();

    // Verify files exist
    assert!(std::path::Path::new(&format!("{}_nodes.parquet", base.display())).exists());
    assert!(std::path::Path::new(&format!("{}_edges.parquet", base.display())).exists());

    // Reload
    let loaded = GraphData::read_parquet(&base).await.unwrap();
    assert_eq!(loaded, graph);
}
