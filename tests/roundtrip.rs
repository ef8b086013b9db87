use sbrp_data::io::{csv_read, csv_write};
use sbrp_data::model::NodeRow;
use sbrp_data::parse::{ParseOptions, parse_graph};
use sbrp_data::pipeline::{self, GraphOutputs};
use std::fs;
use tempfile::tempdir;

const SINGLE_STOP: &str = r#"graph [
  node [
    id 1
    label "A"
    pos 0.0
    pos 0.0
    tipologia "fermata"
    ragazzi 2
  ]
  edge [
    source 1
    target 1
    weight 1.5
    time 3.0
  ]
]
"#;

const MIXED: &str = r#"graph [
  node [
    id 0
    label "Deposito"
    pos 13.25
    pos 46.0
    tipologia "deposito"
    ragazzi 9
  ]
  node [
    id 1
    label "Chiesa"
    pos 13.5
    pos 46.25
    tipologia "fermata"
  ]
  node [
    id 2
    label "Piazza"
    pos 13.75
    pos 46.5
    tipologia "fermata"
    ragazzi 4
    ragazzi 3
    ragazzi 2
    ragazzi 1
  ]
  edge [
    source 0
    target 1
    weight 100.0
    time 12.0
  ]
  edge [
    source 1
    target 2
    weight 250.5
    time 30.0
  ]
]
"#;

#[test]
fn single_stop_exports_expected_rows() {
    let records = parse_graph(SINGLE_STOP, &ParseOptions::default()).expect("graph parsed");
    let temp_dir = tempdir().expect("temporary directory");

    let nodes_path = csv_write::write_nodes_csv(&records.nodes, temp_dir.path(), "nodes.csv")
        .expect("nodes written");
    let edges_path = csv_write::write_edges_csv(&records.edges, temp_dir.path(), "edges.csv")
        .expect("edges written")
        .expect("edge file created");

    let nodes = fs::read_to_string(&nodes_path).expect("node file read");
    assert_eq!(
        nodes.lines().collect::<Vec<_>>(),
        vec!["1,1,A,0.0,0.0,fermata,2,0,0,0"]
    );

    let edges = fs::read_to_string(&edges_path).expect("edge file read");
    assert_eq!(
        edges.lines().collect::<Vec<_>>(),
        vec!["source,target,weight,time", "1,1,1.5,3.0"]
    );
}

#[test]
fn every_node_row_has_ten_columns() {
    let records = parse_graph(MIXED, &ParseOptions::default()).expect("graph parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let path = csv_write::write_nodes_csv(&records.nodes, temp_dir.path(), "nodes.csv")
        .expect("nodes written");

    let contents = fs::read_to_string(&path).expect("node file read");
    let widths: Vec<usize> = contents
        .lines()
        .map(|line| line.split(',').count())
        .collect();
    assert_eq!(widths, vec![NodeRow::WIDTH; 3]);
}

#[test]
fn ragazzi_columns_are_zero_for_non_stops_and_padded_for_stops() {
    let records = parse_graph(MIXED, &ParseOptions::default()).expect("graph parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let path = csv_write::write_nodes_csv(&records.nodes, temp_dir.path(), "nodes.csv")
        .expect("nodes written");

    let rows = csv_read::read_nodes_csv(&path).expect("node file read back");
    let ragazzi: Vec<[i64; 4]> = rows.iter().map(NodeRow::ragazzi).collect();
    assert_eq!(ragazzi, vec![[0, 0, 0, 0], [0, 0, 0, 0], [4, 3, 2, 1]]);
}

#[test]
fn exported_files_read_back_to_the_parsed_values() {
    let records = parse_graph(MIXED, &ParseOptions::default()).expect("graph parsed");
    let temp_dir = tempdir().expect("temporary directory");
    let nodes_path = csv_write::write_nodes_csv(&records.nodes, temp_dir.path(), "nodes.csv")
        .expect("nodes written");
    let edges_path = csv_write::write_edges_csv(&records.edges, temp_dir.path(), "edges.csv")
        .expect("edges written")
        .expect("edge file created");

    let expected_rows: Vec<NodeRow> = records
        .nodes
        .iter()
        .map(|(key, node)| NodeRow::from_record(*key, node))
        .collect();
    let restored_rows = csv_read::read_nodes_csv(&nodes_path).expect("nodes read back");
    assert_eq!(expected_rows, restored_rows);

    let restored_edges = csv_read::read_edges_csv(&edges_path).expect("edges read back");
    assert_eq!(records.edges, restored_edges);
}

#[test]
fn empty_edge_list_writes_nothing() {
    let temp_dir = tempdir().expect("temporary directory");
    let written =
        csv_write::write_edges_csv(&[], temp_dir.path(), "edges.csv").expect("no-op succeeds");

    assert!(written.is_none());
    assert!(!temp_dir.path().join("edges.csv").exists());
}

#[test]
fn exporters_create_missing_directories() {
    let temp_dir = tempdir().expect("temporary directory");
    let nested = temp_dir.path().join("BUTTRIO").join("csv");
    let records = parse_graph(SINGLE_STOP, &ParseOptions::default()).expect("graph parsed");

    let path = csv_write::write_nodes_csv(&records.nodes, &nested, "nodes.csv")
        .expect("nodes written");

    assert!(path.starts_with(&nested));
    assert!(path.exists());
}

#[test]
fn reader_skips_rows_of_the_wrong_width() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("nodes.csv");
    fs::write(
        &path,
        "3,3,Stop,1.0,2.0,fermata,1,2,0,0\n4,4,Short,1.0\n5,5,Other,3.0,4.0,scuola,0,0,0,0\n",
    )
    .expect("fixture written");

    let rows = csv_read::read_nodes_csv(&path).expect("nodes read");
    let keys: Vec<i64> = rows.iter().map(|row| row.key).collect();
    assert_eq!(keys, vec![3, 5]);
}

#[test]
fn reader_reports_bad_cells_with_their_column() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("edges.csv");
    fs::write(&path, "source,target,weight,time\n1,2,far,3.0\n").expect("fixture written");

    let err = csv_read::read_edges_csv(&path).expect_err("bad weight rejected");
    assert!(matches!(
        err,
        sbrp_data::ToolError::InvalidLiteral { line: 2, ref column, ref value }
            if column == "weight" && value == "far"
    ));
}

#[test]
fn import_graph_writes_both_files_named_after_the_stem() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("buttrio.txt");
    fs::write(&input, MIXED).expect("input written");
    let output_dir = temp_dir.path().join("out");

    let export = pipeline::import_graph(
        &input,
        &output_dir,
        &GraphOutputs::from_stem("buttrio"),
        &ParseOptions::default(),
    )
    .expect("graph imported");

    assert!(export.is_complete());
    assert_eq!(export.nodes_path, Some(output_dir.join("buttrio_nodes.csv")));
    assert_eq!(export.edges_path, Some(output_dir.join("buttrio_edges.csv")));
    assert_eq!(export.records.node_count(), 3);
    assert!(pipeline::check_references(&export.records).is_none());
}

#[test]
fn import_graph_reports_export_failures_without_aborting() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("buttrio.txt");
    fs::write(&input, MIXED).expect("input written");
    let output_dir = temp_dir.path().join("out");
    fs::create_dir_all(output_dir.join("blocked_edges.csv")).expect("blocking directory");

    let outputs = GraphOutputs {
        nodes_file: "nodes.csv".to_string(),
        edges_file: "blocked_edges.csv".to_string(),
    };
    let export = pipeline::import_graph(&input, &output_dir, &outputs, &ParseOptions::default())
        .expect("parse succeeds despite export failure");

    assert_eq!(export.failures.len(), 1);
    assert!(export.edges_path.is_none());
    assert_eq!(export.nodes_path, Some(output_dir.join("nodes.csv")));
}
