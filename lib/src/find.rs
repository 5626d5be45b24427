//! Lazy results of [`Graph::find`].

use std::collections::VecDeque;
use std::vec::IntoIter;

use crate::errors::{Error, Result};
use crate::graph::Graph;
use crate::index::IdTriple;
use crate::term::Triple;

/// Ids fetched from the indexes per lock acquisition.
pub(crate) const PAGE_SIZE: usize = 256;

/// The matches of one `find` call, read from the indexes a page at a time.
///
/// Each page resumes after the last triple of the previous one, so a triple
/// removed behind the cursor (through [`Found::remove`] or otherwise) does
/// not disturb the rest of the sequence. Terms are decoded as the sequence
/// advances. Once the graph is closed the sequence yields a single
/// `Err(Closed)` and ends.
pub struct Find<'g> {
    graph: &'g Graph,
    /// Id patterns still to scan after `current`.
    patterns: IntoIter<IdTriple>,
    current: Option<IdTriple>,
    resume: Option<IdTriple>,
    page: VecDeque<IdTriple>,
    done: bool,
}

impl<'g> Find<'g> {
    pub(crate) fn new(graph: &'g Graph, patterns: Vec<IdTriple>) -> Self {
        let mut patterns = patterns.into_iter();
        Self {
            graph,
            current: patterns.next(),
            patterns,
            resume: None,
            page: VecDeque::new(),
            done: false,
        }
    }

    /// Drain into plain triples.
    pub fn to_vec(self) -> Result<Vec<Triple>> {
        self.map(|found| found.map(Found::into_triple)).collect()
    }

    fn fill(&mut self) -> Result<bool> {
        while self.page.is_empty() {
            let Some(pattern) = self.current else {
                return Ok(false);
            };
            let ids = self.graph.page(pattern, self.resume, PAGE_SIZE)?;
            if ids.len() < PAGE_SIZE {
                self.current = self.patterns.next();
                self.resume = None;
            } else {
                self.resume = ids.last().copied();
            }
            self.page = ids.into();
        }
        Ok(true)
    }
}

impl<'g> Iterator for Find<'g> {
    type Item = Result<Found<'g>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.graph.is_closed() {
            self.done = true;
            return Some(Err(Error::Closed));
        }
        match self.fill() {
            Ok(true) => {}
            Ok(false) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }
        let ids = self.page.pop_front()?;
        Some(self.graph.decode(ids).map(|triple| Found {
            graph: self.graph,
            ids,
            triple,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (self.page.len(), None)
        }
    }
}

/// One match, carrying a handle that can delete exactly this triple.
#[derive(Debug)]
pub struct Found<'g> {
    graph: &'g Graph,
    ids: IdTriple,
    triple: Triple,
}

impl Found<'_> {
    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    pub fn into_triple(self) -> Triple {
        self.triple
    }

    /// Delete this triple from the graph. The rest of the sequence is
    /// unaffected. Fails with `Unsupported` unless the graph allows
    /// iterator removal.
    pub fn remove(self) -> Result<()> {
        self.graph.remove_found(self.ids, self.triple)
    }
}
