//! The graph facade over a [`TripleIndexSet`].
//!
//! A [`Graph`] translates terms to node ids through a shared [`NodeTable`],
//! enforces its [`Capabilities`], runs every mutation inside a transaction
//! (an explicit one opened with [`Graph::begin`], or an implicit one that
//! spans a single call) and reports changes to registered listeners.
//!
//! Locking: one mutex guards the indexes and the transaction slot. A thread
//! that holds an open transaction owns the graph; every other thread blocks
//! on any operation until that transaction commits or aborts, so readers
//! never see uncommitted changes. Listeners run after the mutex is released.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use tdb_record::NodeId;

use crate::capabilities::Capabilities;
use crate::config::GraphConfig;
use crate::errors::{Error, Result};
use crate::events::{dispatch, EventManager, GraphEvent, GraphListener, ListenerId};
use crate::find::Find;
use crate::index::{IdTriple, TripleIndexSet};
use crate::isomorphism;
use crate::node_table::{MemoryNodeTable, NodeTable};
use crate::term::{Node, Triple};
use crate::transaction::{rollback, Change, Transaction};

struct GraphState {
    indexes: TripleIndexSet,
    /// Triples of a layered graph that delete and clear leave in place.
    axioms: HashSet<IdTriple>,
    txn: Option<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteMode {
    /// `delete`: a concrete request that removed nothing still reports itself.
    Delete,
    /// `remove(s, p, o)`: reports what was removed, then a summary event.
    Remove,
}

pub struct Graph {
    config: GraphConfig,
    nodes: Arc<dyn NodeTable>,
    state: Mutex<GraphState>,
    released: Condvar,
    closed: AtomicBool,
    events: RwLock<EventManager>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.config.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Graph {
    pub fn new(config: GraphConfig, nodes: Arc<dyn NodeTable>) -> Result<Self> {
        let indexes = TripleIndexSet::new(&config.index_orders)?;
        info!(
            "created graph {} with orders {:?}",
            config.name,
            indexes.orders()
        );
        Ok(Self {
            config,
            nodes,
            state: Mutex::new(GraphState {
                indexes,
                axioms: HashSet::new(),
                txn: None,
            }),
            released: Condvar::new(),
            closed: AtomicBool::new(false),
            events: RwLock::new(EventManager::default()),
        })
    }

    /// A graph with its own private node table.
    pub fn in_memory(config: GraphConfig) -> Result<Self> {
        Self::new(config, Arc::new(MemoryNodeTable::new()))
    }

    /// A layered graph: `axioms` are always present and survive `delete`
    /// and `clear`. Such a graph reports `can_be_empty = false`.
    pub fn with_axioms(
        mut config: GraphConfig,
        nodes: Arc<dyn NodeTable>,
        axioms: &[Triple],
    ) -> Result<Self> {
        if !axioms.is_empty() {
            config.capabilities.can_be_empty = false;
        }
        let graph = Self::new(config, nodes)?;
        {
            let mut state = graph.state.lock();
            for axiom in axioms {
                let spo = graph.encode(axiom)?;
                state.indexes.insert(spo)?;
                state.axioms.insert(spo);
            }
        }
        debug!("graph {} pinned {} axioms", graph.name(), axioms.len());
        Ok(graph)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.config.capabilities
    }

    pub fn node_table(&self) -> &Arc<dyn NodeTable> {
        &self.nodes
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait until no other thread holds a transaction on this graph.
    fn wait_turn(&self) -> MutexGuard<'_, GraphState> {
        let mut state = self.state.lock();
        while !self.is_closed() && state.txn.as_ref().is_some_and(|t| !t.is_owned_by_current()) {
            self.released.wait(&mut state);
        }
        state
    }

    fn acquire(&self) -> Result<MutexGuard<'_, GraphState>> {
        let state = self.wait_turn();
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(state)
    }

    /// Run `op` as one atomic step. Changes are kept in the open
    /// transaction if there is one; on error they are undone. Events are
    /// delivered after the lock is released.
    fn mutate<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut GraphState, &mut Vec<Change>, &mut Vec<GraphEvent>) -> Result<()>,
    {
        let mut state = self.acquire()?;
        let mut changes = Vec::new();
        let mut events = Vec::new();
        if let Err(e) = op(&mut *state, &mut changes, &mut events) {
            if let Err(undo) = rollback(&mut state.indexes, &changes) {
                error!("graph {}: undo after '{}' failed: {}", self.name(), e, undo);
            }
            return Err(e);
        }
        if let Some(txn) = state.txn.as_mut() {
            txn.record(changes);
        }
        drop(state);
        self.notify(&events);
        Ok(())
    }

    fn notify(&self, events: &[GraphEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners = self.events.read().snapshot();
        dispatch(self, &listeners, events);
    }

    fn encode(&self, triple: &Triple) -> Result<IdTriple> {
        let [s, p, o] = triple.nodes();
        Ok([self.nodes.encode(s)?, self.nodes.encode(p)?, self.nodes.encode(o)?])
    }

    pub(crate) fn decode(&self, spo: IdTriple) -> Result<Triple> {
        let [s, p, o] = spo;
        Ok(Triple::new(
            self.nodes.decode(s)?,
            self.nodes.decode(p)?,
            self.nodes.decode(o)?,
        ))
    }

    /// Id patterns covering `triple`. With literal typing each bound term
    /// widens to every stored term of the same value; without it only the
    /// identical term counts. A term with no stored match yields no
    /// patterns at all.
    fn patterns(&self, triple: &Triple) -> Vec<IdTriple> {
        let candidates = |node: &Node| -> Vec<NodeId> {
            match node {
                Node::Any => vec![NodeId::Any],
                Node::Term(t) if self.capabilities().handles_literal_typing => {
                    self.nodes.equivalents(t)
                }
                Node::Term(t) => match self.nodes.lookup(t) {
                    NodeId::Missing => Vec::new(),
                    id => vec![id],
                },
            }
        };
        let [s, p, o] = triple.nodes().map(candidates);
        let mut out = Vec::with_capacity(s.len() * p.len() * o.len());
        for s in &s {
            for p in &p {
                for o in &o {
                    out.push([*s, *p, *o]);
                }
            }
        }
        out
    }

    fn matching(&self, state: &GraphState, triple: &Triple) -> Vec<IdTriple> {
        self.patterns(triple)
            .into_iter()
            .flat_map(|pattern| state.indexes.find_matching(pattern).collect::<Vec<_>>())
            .collect()
    }

    /// Add a concrete triple. Adding a triple that is already present
    /// changes nothing but is still reported to listeners.
    pub fn add(&self, triple: &Triple) -> Result<()> {
        self.mutate(|state, changes, events| {
            if !self.capabilities().add_allowed {
                warn!("graph {}: add denied for {}", self.name(), triple);
                return Err(Error::AddDenied);
            }
            if !triple.is_concrete() {
                return Err(Error::InvalidTerm(format!("cannot add pattern {}", triple)));
            }
            let spo = self.encode(triple)?;
            if state.indexes.insert(spo)? {
                changes.push(Change::Added(spo));
            }
            events.push(GraphEvent::AddTriple(triple.clone()));
            Ok(())
        })
    }

    /// Delete every triple matching `triple` (ANY widens). Deleting nothing
    /// is not an error.
    pub fn delete(&self, triple: &Triple) -> Result<()> {
        self.delete_matching(triple, DeleteMode::Delete)
    }

    /// Delete every triple matching the pattern `(s, p, o)`, then report a
    /// single generic event describing the request.
    pub fn remove(&self, s: &Node, p: &Node, o: &Node) -> Result<()> {
        let pattern = Triple::new(s.clone(), p.clone(), o.clone());
        self.delete_matching(&pattern, DeleteMode::Remove)
    }

    fn delete_matching(&self, triple: &Triple, mode: DeleteMode) -> Result<()> {
        self.mutate(|state, changes, events| {
            if !self.capabilities().delete_allowed {
                warn!("graph {}: delete denied for {}", self.name(), triple);
                return Err(Error::DeleteDenied);
            }
            for spo in self.matching(state, triple) {
                if state.axioms.contains(&spo) {
                    continue;
                }
                let removed = self.decode(spo)?;
                if state.indexes.remove(spo)? {
                    changes.push(Change::Removed(spo));
                    events.push(GraphEvent::DeleteTriple(removed));
                }
            }
            match mode {
                DeleteMode::Delete if events.is_empty() && triple.is_concrete() => {
                    events.push(GraphEvent::DeleteTriple(triple.clone()));
                }
                DeleteMode::Delete => {}
                DeleteMode::Remove => {
                    events.push(GraphEvent::Generic(format!(
                        "remove {} {} {}",
                        triple.subject, triple.predicate, triple.object
                    )));
                }
            }
            Ok(())
        })
    }

    pub(crate) fn remove_found(&self, spo: IdTriple, triple: Triple) -> Result<()> {
        self.mutate(|state, changes, events| {
            if !self.capabilities().iterator_remove_allowed {
                return Err(Error::Unsupported("iterator remove"));
            }
            if !self.capabilities().delete_allowed {
                return Err(Error::DeleteDenied);
            }
            if state.axioms.contains(&spo) {
                return Ok(());
            }
            if state.indexes.remove(spo)? {
                changes.push(Change::Removed(spo));
                events.push(GraphEvent::DeleteTriple(triple));
            }
            Ok(())
        })
    }

    /// Remove every triple that is not an axiom. Listeners see a start
    /// event, one delete per removed triple, then an end event.
    pub fn clear(&self) -> Result<()> {
        self.mutate(|state, changes, events| {
            if !self.capabilities().delete_allowed {
                warn!("graph {}: clear denied", self.name());
                return Err(Error::DeleteDenied);
            }
            events.push(GraphEvent::RemoveAllStart);
            let all = self.matching(state, &Triple::any());
            for spo in all {
                if state.axioms.contains(&spo) {
                    continue;
                }
                let removed = self.decode(spo)?;
                state.indexes.remove(spo)?;
                changes.push(Change::Removed(spo));
                events.push(GraphEvent::DeleteTriple(removed));
            }
            events.push(GraphEvent::RemoveAllEnd);
            debug!("graph {}: cleared {} triples", self.name(), changes.len());
            Ok(())
        })
    }

    /// True when some stored triple matches `triple` by value.
    pub fn contains(&self, triple: &Triple) -> Result<bool> {
        let state = self.acquire()?;
        Ok(self
            .patterns(triple)
            .into_iter()
            .any(|pattern| state.indexes.contains_matching(pattern)))
    }

    pub fn contains_spo(&self, s: &Node, p: &Node, o: &Node) -> Result<bool> {
        self.contains(&Triple::new(s.clone(), p.clone(), o.clone()))
    }

    /// Concrete triples matching `pattern`, read lazily in pages. Bound
    /// terms are resolved to ids when the call is made; closing the graph
    /// ends the sequence.
    pub fn find(&self, pattern: &Triple) -> Result<Find<'_>> {
        let state = self.acquire()?;
        let patterns = self.patterns(pattern);
        drop(state);
        Ok(Find::new(self, patterns))
    }

    /// Up to `limit` matches of an id pattern, starting after `resume`.
    pub(crate) fn page(
        &self,
        pattern: IdTriple,
        resume: Option<IdTriple>,
        limit: usize,
    ) -> Result<Vec<IdTriple>> {
        let state = self.acquire()?;
        Ok(state
            .indexes
            .find_matching_after(pattern, resume)
            .take(limit)
            .collect())
    }

    pub fn find_spo(&self, s: &Node, p: &Node, o: &Node) -> Result<Find<'_>> {
        self.find(&Triple::new(s.clone(), p.clone(), o.clone()))
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.acquire()?.indexes.size())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// True when the content of this graph may change because `other`
    /// changes. Graphs here hold their own triples, so only a graph depends
    /// on itself.
    pub fn depends_on(&self, other: &Graph) -> bool {
        std::ptr::eq(self, other)
    }

    pub fn is_isomorphic_with(&self, other: &Graph) -> Result<bool> {
        let ours = self.find(&Triple::any())?.to_vec()?;
        let theirs = other.find(&Triple::any())?.to_vec()?;
        Ok(isomorphism::is_isomorphic(&ours, &theirs))
    }

    /// Close the graph. Every later operation fails with `Closed`. An open
    /// transaction held by the calling thread is aborted. Closing twice is
    /// harmless.
    pub fn close(&self) {
        let mut state = self.wait_turn();
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(txn) = state.txn.take() {
            warn!("graph {}: closing with an open transaction, aborting", self.name());
            if let Err(e) = txn.abort(&mut state.indexes) {
                error!("graph {}: abort on close failed: {}", self.name(), e);
            }
        }
        drop(state);
        self.released.notify_all();
        info!("closed graph {}", self.name());
    }

    /// Register a listener. The returned token unregisters it.
    pub fn register(&self, listener: Arc<dyn GraphListener>) -> ListenerId {
        self.events.write().register(listener)
    }

    pub fn unregister(&self, id: ListenerId) -> bool {
        self.events.write().unregister(id)
    }

    pub fn listener_count(&self) -> usize {
        self.events.read().len()
    }

    /// Start a transaction owned by the calling thread. Other threads block
    /// on this graph until it ends.
    pub fn begin(&self) -> Result<()> {
        if !self.config.transactions {
            return if self.is_closed() { Err(Error::Closed) } else { Ok(()) };
        }
        let mut state = self.acquire()?;
        if state.txn.is_some() {
            warn!("graph {}: nested begin rejected", self.name());
            return Err(Error::TransactionActive);
        }
        let txn = Transaction::begin();
        debug!("graph {}: begin on {:?}", self.name(), txn.owner());
        state.txn = Some(txn);
        Ok(())
    }

    pub fn commit(&self) -> Result<()> {
        if !self.config.transactions {
            return if self.is_closed() { Err(Error::Closed) } else { Ok(()) };
        }
        let txn = self.take_transaction()?;
        info!(
            "graph {}: commit {} changes after {} ms",
            self.name(),
            txn.len(),
            txn.elapsed_ms()
        );
        self.released.notify_all();
        Ok(())
    }

    /// Undo everything since `begin`.
    pub fn abort(&self) -> Result<()> {
        if !self.config.transactions {
            return if self.is_closed() { Err(Error::Closed) } else { Ok(()) };
        }
        let mut state = self.state.lock();
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let txn = match state.txn.take() {
            Some(t) if t.is_owned_by_current() => t,
            other => {
                state.txn = other;
                return Err(Error::NoTransaction);
            }
        };
        let outcome = txn.abort(&mut state.indexes);
        drop(state);
        self.released.notify_all();
        let undone = outcome?;
        info!("graph {}: abort undid {} changes", self.name(), undone);
        Ok(())
    }

    fn take_transaction(&self) -> Result<Transaction> {
        let mut state = self.state.lock();
        if self.is_closed() {
            return Err(Error::Closed);
        }
        match state.txn.take() {
            Some(t) if t.is_owned_by_current() => Ok(t),
            other => {
                state.txn = other;
                Err(Error::NoTransaction)
            }
        }
    }

    /// True when the calling thread holds an open transaction.
    pub fn in_transaction(&self) -> bool {
        self.state
            .lock()
            .txn
            .as_ref()
            .is_some_and(|t| t.is_owned_by_current())
    }

    /// Run `f` inside a transaction: commit on `Ok`, abort on `Err`. A
    /// panic in `f` aborts the transaction before the panic continues.
    pub fn execute_in_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Graph) -> Result<T>,
    {
        self.begin()?;
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(Ok(value)) => {
                self.commit()?;
                Ok(value)
            }
            Ok(Err(e)) => {
                if let Err(abort_err) = self.abort() {
                    warn!("graph {}: abort failed: {}", self.name(), abort_err);
                }
                Err(e)
            }
            Err(payload) => {
                error!("graph {}: transaction body panicked, aborting", self.name());
                if let Err(abort_err) = self.abort() {
                    warn!("graph {}: abort failed: {}", self.name(), abort_err);
                }
                panic::resume_unwind(payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{node, triple};

    fn graph() -> Graph {
        Graph::in_memory(GraphConfig::default()).unwrap()
    }

    #[test]
    fn add_find_delete() {
        let g = graph();
        g.add(&triple("S P O")).unwrap();
        g.add(&triple("S P O2")).unwrap();
        assert_eq!(g.size().unwrap(), 2);
        assert!(g.contains(&triple("S P ??")).unwrap());
        assert_eq!(g.find(&triple("?? ?? O2")).unwrap().count(), 1);
        g.delete(&triple("S P ??")).unwrap();
        assert!(g.is_empty().unwrap());
    }

    #[test]
    fn find_spans_several_pages() {
        let g = graph();
        let total = crate::find::PAGE_SIZE * 2 + 7;
        for i in 0..total {
            g.add(&triple(&format!("s P o{}", i))).unwrap();
        }
        assert_eq!(g.find(&triple("s P ??")).unwrap().count(), total);
        // removing every other item while iterating leaves the rest intact
        let mut seen = 0;
        for (n, found) in g.find(&Triple::any()).unwrap().enumerate() {
            seen += 1;
            if n % 2 == 0 {
                found.unwrap().remove().unwrap();
            }
        }
        assert_eq!(seen, total);
        assert_eq!(g.size().unwrap(), total / 2);
    }

    #[test]
    fn depends_only_on_itself() {
        let g = graph();
        let other = graph();
        assert!(g.depends_on(&g));
        assert!(!g.depends_on(&other));
    }

    #[test]
    fn pattern_add_is_rejected() {
        let g = graph();
        assert!(matches!(g.add(&triple("S ?? O")), Err(Error::InvalidTerm(_))));
        assert_eq!(g.size().unwrap(), 0);
    }

    #[test]
    fn unknown_terms_match_nothing() {
        let g = graph();
        g.add(&triple("a b c")).unwrap();
        assert!(!g.contains_spo(&node("x"), &Node::Any, &Node::Any).unwrap());
        assert_eq!(g.find_spo(&Node::Any, &node("y"), &Node::Any).unwrap().count(), 0);
    }

    #[test]
    fn failed_add_leaves_graph_unchanged() {
        let g = Graph::in_memory(
            GraphConfig::builder()
                .capabilities(Capabilities::read_only())
                .build()
                .unwrap(),
        )
        .unwrap();
        assert!(matches!(g.add(&triple("a b c")), Err(Error::AddDenied)));
        assert!(matches!(g.clear(), Err(Error::DeleteDenied)));
        assert_eq!(g.size().unwrap(), 0);
    }
}
