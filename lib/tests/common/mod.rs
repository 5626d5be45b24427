#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use tdb::notation::{parse_node, parse_triple, parse_triples};
use tdb::{Capabilities, Graph, GraphConfig, GraphEvent, GraphListener, Node, Triple};

pub fn node(s: &str) -> Node {
    parse_node(s).expect("node")
}

pub fn triple(s: &str) -> Triple {
    parse_triple(s).expect("triple")
}

pub fn triples(s: &str) -> Vec<Triple> {
    parse_triples(s).expect("triples")
}

pub fn graph() -> Graph {
    tdb::util::init_logging();
    Graph::in_memory(GraphConfig::default()).expect("graph")
}

pub fn graph_with(capabilities: Capabilities) -> Graph {
    tdb::util::init_logging();
    let config = GraphConfig::builder()
        .capabilities(capabilities)
        .build()
        .expect("build config");
    Graph::in_memory(config).expect("graph")
}

/// A graph holding the triples written in compact notation.
pub fn graph_of(s: &str) -> Graph {
    let g = graph();
    for t in triples(s) {
        g.add(&t).expect("add");
    }
    g
}

pub fn assert_isomorphic(g: &Graph, expected: &str) {
    let want = graph_of(expected);
    assert!(
        g.is_isomorphic_with(&want).expect("isomorphism"),
        "expected {{{}}}, found {:?}",
        expected,
        g.find(&Triple::any()).and_then(|f| f.to_vec())
    );
}

/// Listener that records every event it sees.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<GraphEvent>>,
}

impl Recorder {
    pub fn attach(g: &Graph) -> Arc<Recorder> {
        let r = Arc::new(Recorder::default());
        g.register(r.clone());
        r
    }

    pub fn take(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl GraphListener for Recorder {
    fn on_event(&self, _graph: &Graph, event: &GraphEvent) {
        self.events.lock().push(event.clone());
    }
}
