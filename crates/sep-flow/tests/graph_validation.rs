use sep_flow::{Flowsheet, GraphNode, ParamValue, Params, Phase, Stream, UnitOp};

fn leach(id: &str, inputs: &[&str], outputs: &[&str]) -> UnitOp {
    let mut params = Params::new();
    params.insert("extraction".into(), ParamValue::Number(0.8));
    UnitOp::new(
        id,
        "leach",
        params,
        inputs.iter().map(|s| s.to_string()).collect(),
        outputs.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

fn streams(names: &[&str]) -> Vec<Stream> {
    names
        .iter()
        .map(|name| Stream::new(*name, Phase::Solid))
        .collect()
}

#[test]
fn chain_reports_feed_and_sinks_in_declaration_order() {
    let fs = Flowsheet::new(
        "chain",
        vec![
            leach("l1", &["feed"], &["pls", "mid"]),
            leach("l2", &["mid"], &["pls2", "residue"]),
        ],
        streams(&["feed", "mid", "pls", "pls2", "residue"]),
    )
    .unwrap();
    let summary = fs.validate_graph().unwrap();
    assert_eq!(summary.feeds, vec!["feed"]);
    assert_eq!(summary.sinks, vec!["pls", "pls2", "residue"]);
}

#[test]
fn one_feed_one_sink_passes() {
    let fs = Flowsheet::new(
        "single",
        vec![leach("l1", &["a"], &["b"])],
        streams(&["a", "b"]),
    )
    .unwrap();
    let summary = fs.validate_graph().unwrap();
    assert_eq!(summary.feeds, vec!["a"]);
    assert_eq!(summary.sinks, vec!["b"]);
}

#[test]
fn closed_loop_without_feed_fails() {
    // every stream is produced by some unit
    let fs = Flowsheet::new(
        "loop",
        vec![leach("l1", &["a"], &["b"]), leach("l2", &["b"], &["a", "c"])],
        streams(&["a", "b", "c"]),
    )
    .unwrap();
    assert_eq!(fs.validate_graph().unwrap_err().code(), "no-feed");
}

#[test]
fn network_without_sink_fails() {
    // every stream is consumed by some unit
    let fs = Flowsheet::new(
        "sinkless",
        vec![leach("l1", &["a", "b"], &["b"])],
        streams(&["a", "b"]),
    )
    .unwrap();
    assert_eq!(fs.validate_graph().unwrap_err().code(), "no-sink");
}

#[test]
fn dangling_reference_names_unit_and_stream() {
    let fs = Flowsheet::new(
        "dangling",
        vec![leach("l1", &["feed"], &["ghost"])],
        streams(&["feed"]),
    )
    .unwrap();
    let err = fs.validate_graph().unwrap_err();
    assert_eq!(err.code(), "dangling-stream");
    assert!(err.info().message.contains("l1"));
    assert!(err.info().message.contains("ghost"));
}

#[test]
fn duplicate_stream_names_fail() {
    let fs = Flowsheet::new(
        "dupes",
        vec![leach("l1", &["a"], &["b"])],
        streams(&["a", "b", "a"]),
    )
    .unwrap();
    assert_eq!(fs.validate_graph().unwrap_err().code(), "duplicate-stream");
}

#[test]
fn graph_view_links_streams_through_units() {
    let fs = Flowsheet::new(
        "chain",
        vec![
            leach("l1", &["feed"], &["mid"]),
            leach("l2", &["mid"], &["out"]),
        ],
        streams(&["feed", "mid", "out"]),
    )
    .unwrap();
    let graph = fs.graph();
    let ids: Vec<&str> = graph.nodes.iter().map(GraphNode::id).collect();
    assert_eq!(ids, vec!["l1", "feed", "mid", "l2", "out"]);
    assert_eq!(graph.predecessors("l2"), vec!["mid"]);
    assert_eq!(graph.successors("mid"), vec!["l2"]);
    assert!(matches!(
        graph.nodes[0],
        GraphNode::Unit { ref unit_type, .. } if unit_type == "leach"
    ));
}

#[test]
fn canonical_hash_tracks_contents() {
    let build = |extraction: f64| {
        let mut unit = leach("l1", &["a"], &["b"]);
        unit.params
            .insert("extraction".into(), ParamValue::Number(extraction));
        Flowsheet::new("h", vec![unit], streams(&["a", "b"])).unwrap()
    };
    assert_eq!(
        build(0.8).canonical_hash().unwrap(),
        build(0.8).canonical_hash().unwrap()
    );
    assert_ne!(
        build(0.8).canonical_hash().unwrap(),
        build(0.7).canonical_hash().unwrap()
    );
}
