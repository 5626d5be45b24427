//! A store: one node table shared by any number of graphs.

use std::sync::Arc;

use log::info;

use crate::config::GraphConfig;
use crate::errors::Result;
use crate::graph::Graph;
use crate::node_table::{MemoryNodeTable, NodeTable};
use crate::term::Triple;

#[derive(Debug, Clone)]
pub struct Store {
    nodes: Arc<dyn NodeTable>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_node_table(Arc::new(MemoryNodeTable::new()))
    }

    pub fn with_node_table(nodes: Arc<dyn NodeTable>) -> Self {
        Self { nodes }
    }

    pub fn node_table(&self) -> &Arc<dyn NodeTable> {
        &self.nodes
    }

    pub fn create_graph(&self, config: GraphConfig) -> Result<Graph> {
        Graph::new(config, self.nodes.clone())
    }

    pub fn create_layered_graph(&self, config: GraphConfig, axioms: &[Triple]) -> Result<Graph> {
        info!("creating layered graph {} with {} axioms", config.name, axioms.len());
        Graph::with_axioms(config, self.nodes.clone(), axioms)
    }
}
