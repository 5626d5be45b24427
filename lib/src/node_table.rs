//! Term ↔ NodeId dictionary.
//!
//! The node table is the only authority that hands out [`NodeId`]s. Ids are
//! dense, start at zero and are never reused for another term while the
//! table lives. Besides the exact mapping the table tracks, for every value
//! key, the ids of all stored terms denoting that value; graphs use this to
//! widen a lookup from one literal to its by-value equivalents without
//! touching the indexes.

use std::collections::HashMap;
use std::fmt::Debug;

use log::debug;
use oxigraph::model::Term;
use parking_lot::RwLock;
use tdb_record::NodeId;

use crate::errors::{Error, Result};
use crate::term::Node;
use crate::value::ValueKey;

pub trait NodeTable: Send + Sync + Debug {
    /// Id for `term`, allocating one on first sight.
    fn lookup_or_create(&self, term: &Term) -> Result<NodeId>;

    /// Id for `term`, or [`NodeId::Missing`] when it was never stored.
    fn lookup(&self, term: &Term) -> NodeId;

    fn resolve(&self, id: NodeId) -> Option<Term>;

    /// Ids of every stored term with the same value as `term`, in id order.
    fn equivalents(&self, term: &Term) -> Vec<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode a pattern node. The wildcard has no stored identity.
    fn encode(&self, node: &Node) -> Result<NodeId> {
        match node {
            Node::Term(t) => self.lookup_or_create(t),
            Node::Any => Err(Error::InvalidTerm("ANY cannot be encoded".to_string())),
        }
    }

    fn decode(&self, id: NodeId) -> Result<Term> {
        self.resolve(id).ok_or(Error::NotFound(id))
    }
}

#[derive(Debug, Default)]
struct Tables {
    terms: Vec<Term>,
    ids: HashMap<Term, NodeId>,
    by_value: HashMap<ValueKey, Vec<NodeId>>,
}

/// In-memory node table.
#[derive(Debug, Default)]
pub struct MemoryNodeTable {
    tables: RwLock<Tables>,
}

impl MemoryNodeTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeTable for MemoryNodeTable {
    fn lookup_or_create(&self, term: &Term) -> Result<NodeId> {
        if let Some(id) = self.tables.read().ids.get(term) {
            return Ok(*id);
        }
        let mut tables = self.tables.write();
        // another writer may have allocated it between the two locks
        if let Some(id) = tables.ids.get(term) {
            return Ok(*id);
        }
        let id = NodeId::new(tables.terms.len() as u64)?;
        tables.terms.push(term.clone());
        tables.ids.insert(term.clone(), id);
        tables.by_value.entry(ValueKey::of(term)).or_default().push(id);
        debug!("allocated {} for {}", id, term);
        Ok(id)
    }

    fn lookup(&self, term: &Term) -> NodeId {
        self.tables
            .read()
            .ids
            .get(term)
            .copied()
            .unwrap_or(NodeId::Missing)
    }

    fn resolve(&self, id: NodeId) -> Option<Term> {
        let index = usize::try_from(id.value()?).ok()?;
        self.tables.read().terms.get(index).cloned()
    }

    fn equivalents(&self, term: &Term) -> Vec<NodeId> {
        self.tables
            .read()
            .by_value
            .get(&ValueKey::of(term))
            .cloned()
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.tables.read().terms.len()
    }
}
