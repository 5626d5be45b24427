//! Sorted triple indexes over permutations of (S, P, O) node ids.
//!
//! Each [`TripleIndex`] stores 24-byte keys (three big-endian [`NodeId`]s in
//! its own component order) in a [`RecordBuffer`]. A [`TripleIndexSet`]
//! keeps several orders consistent and routes every pattern to the order
//! whose key prefix covers the most bound positions:
//!
//! | bound   | order | prefix |
//! |---------|-------|--------|
//! | S, SP, SPO | SPO | 1–3 |
//! | P, PO   | POS   | 1–2    |
//! | O, SO   | OSP   | 1–2    |
//! | none    | SPO   | full scan |
//!
//! Orders that are not configured fall back to a shorter prefix plus a
//! filter. Patterns use [`NodeId::Any`] for unbound positions.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use tdb_record::{NodeId, RecordBuffer, RecordFactory};

use crate::errors::{Error, Result};

/// A triple of node ids in (S, P, O) order.
pub type IdTriple = [NodeId; 3];

const KEY_LENGTH: usize = 3 * NodeId::SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexOrder {
    Spo,
    Pos,
    Osp,
}

impl IndexOrder {
    pub const ALL: [IndexOrder; 3] = [IndexOrder::Spo, IndexOrder::Pos, IndexOrder::Osp];

    /// Which (S, P, O) position lands in each key column.
    fn columns(self) -> [usize; 3] {
        match self {
            IndexOrder::Spo => [0, 1, 2],
            IndexOrder::Pos => [1, 2, 0],
            IndexOrder::Osp => [2, 0, 1],
        }
    }

    pub fn permute(self, spo: IdTriple) -> IdTriple {
        self.columns().map(|c| spo[c])
    }

    pub fn unpermute(self, key: IdTriple) -> IdTriple {
        let mut spo = [NodeId::Any; 3];
        for (column, position) in self.columns().into_iter().enumerate() {
            spo[position] = key[column];
        }
        spo
    }

    /// Number of leading key columns fixed by `pattern`.
    pub fn prefix_len(self, pattern: &IdTriple) -> usize {
        self.permute(*pattern)
            .iter()
            .take_while(|id| !id.is_any())
            .count()
    }
}

impl fmt::Display for IndexOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexOrder::Spo => "SPO",
            IndexOrder::Pos => "POS",
            IndexOrder::Osp => "OSP",
        };
        write!(f, "{}", name)
    }
}

fn matches(pattern: &IdTriple, ids: &IdTriple) -> bool {
    pattern
        .iter()
        .zip(ids)
        .all(|(p, id)| p.is_any() || p == id)
}

/// One sorted order.
#[derive(Debug, Clone)]
pub struct TripleIndex {
    order: IndexOrder,
    records: RecordBuffer,
}

impl TripleIndex {
    pub fn new(order: IndexOrder) -> Result<Self> {
        let factory = RecordFactory::new(KEY_LENGTH, 0)?;
        Ok(Self {
            order,
            records: RecordBuffer::new(factory),
        })
    }

    pub fn order(&self) -> IndexOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn key(&self, spo: IdTriple) -> Result<[u8; KEY_LENGTH]> {
        let mut key = [0u8; KEY_LENGTH];
        for (column, id) in self.order.permute(spo).into_iter().enumerate() {
            id.to_bytes(&mut key, column * NodeId::SIZE)?;
        }
        Ok(key)
    }

    pub fn insert(&mut self, spo: IdTriple) -> Result<bool> {
        let key = self.key(spo)?;
        let record = self.records.factory().create(&key, None)?;
        Ok(self.records.insert(record)?)
    }

    pub fn remove(&mut self, spo: IdTriple) -> Result<bool> {
        let key = self.key(spo)?;
        Ok(self.records.remove(&key)?.is_some())
    }

    pub fn contains(&self, spo: IdTriple) -> bool {
        self.key(spo).is_ok_and(|key| self.records.contains(&key))
    }

    /// Lazy scan of the triples matching `pattern`, in this index's order.
    pub fn scan(&self, pattern: IdTriple) -> Matches<'_> {
        self.scan_after(pattern, None)
    }

    /// Like [`scan`](Self::scan), but resuming strictly after the triple
    /// `after` in this index's order. `after` need not be stored.
    pub fn scan_after(&self, pattern: IdTriple, after: Option<IdTriple>) -> Matches<'_> {
        let prefix_len = self.order.prefix_len(&pattern) * NodeId::SIZE;
        let mut prefix = [0u8; KEY_LENGTH];
        for (column, id) in self.order.permute(pattern).into_iter().enumerate() {
            if column * NodeId::SIZE >= prefix_len {
                break;
            }
            prefix[column * NodeId::SIZE..(column + 1) * NodeId::SIZE]
                .copy_from_slice(&id.to_be_bytes());
        }
        let mut slot = self.records.lower_bound(&prefix[..prefix_len]);
        if let Some(key) = after.and_then(|spo| self.key(spo).ok()) {
            let resume = match self.records.find(&key) {
                Ok(n) => n + 1,
                Err(n) => n,
            };
            slot = slot.max(resume);
        }
        Matches {
            index: self,
            slot,
            prefix,
            prefix_len,
            pattern,
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn decode(&self, key: &[u8]) -> Option<IdTriple> {
        let mut ids = [NodeId::Any; 3];
        for (column, id) in ids.iter_mut().enumerate() {
            *id = NodeId::from_bytes(key, column * NodeId::SIZE).ok()?;
        }
        Some(self.order.unpermute(ids))
    }
}

/// Iterator returned by [`TripleIndex::scan`]. Yields (S, P, O) id triples.
#[derive(Debug)]
pub struct Matches<'a> {
    index: &'a TripleIndex,
    prefix: [u8; KEY_LENGTH],
    prefix_len: usize,
    slot: usize,
    pattern: IdTriple,
}

impl Iterator for Matches<'_> {
    type Item = IdTriple;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.index.records.key(self.slot)?;
            if !key.starts_with(&self.prefix[..self.prefix_len]) {
                self.slot = self.index.records.len();
                return None;
            }
            self.slot += 1;
            match self.index.decode(key) {
                Some(spo) if matches(&self.pattern, &spo) => return Some(spo),
                _ => continue,
            }
        }
    }
}

/// Mutually consistent indexes. The SPO order is always present and is the
/// reference for size.
#[derive(Debug, Clone)]
pub struct TripleIndexSet {
    indexes: Vec<TripleIndex>,
}

impl TripleIndexSet {
    pub fn new(orders: &[IndexOrder]) -> Result<Self> {
        let mut indexes = vec![TripleIndex::new(IndexOrder::Spo)?];
        for order in orders {
            if indexes.iter().all(|i| i.order != *order) {
                indexes.push(TripleIndex::new(*order)?);
            }
        }
        Ok(Self { indexes })
    }

    pub fn orders(&self) -> Vec<IndexOrder> {
        self.indexes.iter().map(|i| i.order).collect()
    }

    fn check_storable(spo: &IdTriple) -> Result<()> {
        match spo.iter().find(|id| !id.is_real()) {
            Some(id) => Err(Error::InvalidTerm(format!("{} cannot be stored", id))),
            None => Ok(()),
        }
    }

    /// Insert into every order. Returns `false` when the triple was already
    /// present. On failure no order keeps the triple.
    pub fn insert(&mut self, spo: IdTriple) -> Result<bool> {
        Self::check_storable(&spo)?;
        let mut added = false;
        for n in 0..self.indexes.len() {
            match self.indexes[n].insert(spo) {
                Ok(fresh) => added |= fresh,
                Err(e) => {
                    if added {
                        for index in &mut self.indexes[..n] {
                            let _ = index.remove(spo);
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(added)
    }

    /// Remove from every order. Returns `false` when the triple was absent.
    pub fn remove(&mut self, spo: IdTriple) -> Result<bool> {
        Self::check_storable(&spo)?;
        let mut removed = false;
        for index in &mut self.indexes {
            removed |= index.remove(spo)?;
        }
        Ok(removed)
    }

    pub fn contains(&self, spo: IdTriple) -> bool {
        self.indexes[0].contains(spo)
    }

    /// The index with the longest usable key prefix for `pattern`.
    pub fn choose(&self, pattern: &IdTriple) -> &TripleIndex {
        let mut best = &self.indexes[0];
        for index in &self.indexes[1..] {
            if index.order.prefix_len(pattern) > best.order.prefix_len(pattern) {
                best = index;
            }
        }
        best
    }

    /// Matches for `pattern`. A position holding [`NodeId::Missing`] names a
    /// term the store has never seen, so nothing matches.
    pub fn find_matching(&self, pattern: IdTriple) -> impl Iterator<Item = IdTriple> + '_ {
        self.find_matching_after(pattern, None)
    }

    /// Matches for `pattern` that sort after `after` in the order chosen for
    /// `pattern`. Feeding back the last triple seen walks the matches in
    /// pages.
    pub fn find_matching_after(
        &self,
        pattern: IdTriple,
        after: Option<IdTriple>,
    ) -> impl Iterator<Item = IdTriple> + '_ {
        let viable = !pattern.iter().any(|id| id.is_missing());
        let index = self.choose(&pattern);
        if viable && after.is_none() {
            debug!(
                "pattern {} {} {} uses {} (prefix {})",
                pattern[0],
                pattern[1],
                pattern[2],
                index.order,
                index.order.prefix_len(&pattern)
            );
        }
        viable
            .then(|| index.scan_after(pattern, after))
            .into_iter()
            .flatten()
    }

    pub fn contains_matching(&self, pattern: IdTriple) -> bool {
        if pattern.iter().all(|id| id.is_real()) {
            return self.contains(pattern);
        }
        self.find_matching(pattern).next().is_some()
    }

    /// Remove every triple matching `pattern`, returning what was removed.
    pub fn remove_matching(&mut self, pattern: IdTriple) -> Result<Vec<IdTriple>> {
        let doomed: Vec<_> = self.find_matching(pattern).collect();
        for spo in &doomed {
            self.remove(*spo)?;
        }
        Ok(doomed)
    }

    pub fn size(&self) -> usize {
        self.indexes[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn clear(&mut self) {
        for index in &mut self.indexes {
            index.clear();
        }
    }

    /// True when every order holds exactly the same triples.
    pub fn is_consistent(&self) -> bool {
        let reference: Vec<_> = self.indexes[0].scan([NodeId::Any; 3]).collect();
        self.indexes[1..].iter().all(|index| {
            let mut ids: Vec<_> = index.scan([NodeId::Any; 3]).collect();
            ids.sort_by_key(|spo| spo.map(NodeId::to_raw));
            index.len() == reference.len() && ids == reference
        })
    }
}
