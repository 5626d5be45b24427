mod common;

use std::fs;

use tdb::{Capabilities, Graph, GraphConfig, IndexOrder};
use tempfile::tempdir;

use common::*;

#[test]
fn config_round_trips_through_json() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("graph.json");
    let config = GraphConfig::builder()
        .name("vocab")
        .capabilities(Capabilities {
            iterator_remove_allowed: false,
            ..Capabilities::default()
        })
        .index_orders(vec![IndexOrder::Spo, IndexOrder::Pos])
        .transactions(false)
        .build()
        .expect("build config");
    config.save_to_file(&path).unwrap();
    let loaded = GraphConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let g = Graph::in_memory(loaded).unwrap();
    assert_eq!(g.name(), "vocab");
    assert!(!g.capabilities().iterator_remove_allowed);
}

#[test]
fn missing_or_bad_config_is_an_error() {
    let dir = tempdir().expect("tempdir");
    assert!(GraphConfig::from_file(&dir.path().join("absent.json")).is_err());
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(GraphConfig::from_file(&bad).is_err());
}

#[test]
fn spo_only_graph_answers_every_pattern() {
    let config = GraphConfig::builder()
        .index_orders(vec![IndexOrder::Spo])
        .build()
        .expect("build config");
    let g = Graph::in_memory(config).unwrap();
    for t in triples("a P b; c P d; c Q b") {
        g.add(&t).unwrap();
    }
    assert_eq!(g.find(&triple("?? ?? b")).unwrap().count(), 2);
    assert_eq!(g.find(&triple("?? P ??")).unwrap().count(), 2);
    assert_eq!(g.find(&triple("c ?? b")).unwrap().count(), 1);
}
