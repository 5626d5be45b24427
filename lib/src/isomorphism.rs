//! Graph isomorphism under blank node renaming.
//!
//! Ground terms are compared by value and never renamed. Blank nodes are
//! first colored by iterated neighborhood hashing (blake3 digests of the
//! triples each blank takes part in). Blanks that share a triple are grouped
//! into components with a union-find; each component of one graph is then
//! matched against an unused, equally colored component of the other by
//! backtracking over color-compatible assignments.

use std::collections::{HashMap, HashSet};

use oxigraph::model::Term;
use petgraph::unionfind::UnionFind;

use crate::term::{Node, Triple};
use crate::value::ValueKey;

type Color = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Any,
    Ground(ValueKey),
    Blank(usize),
}

type SlotTriple = [Slot; 3];

/// One side of the comparison, with blank labels replaced by dense indexes.
/// Stored triples that are equal by value stay separate entries.
struct Side {
    ground: HashMap<SlotTriple, usize>,
    /// Triples mentioning at least one blank.
    open: Vec<SlotTriple>,
    blanks: usize,
}

impl Side {
    fn new(triples: &[Triple]) -> Self {
        let mut labels: HashMap<String, usize> = HashMap::new();
        let mut slot = |node: &Node| match node {
            Node::Any => Slot::Any,
            Node::Term(Term::BlankNode(b)) => {
                let next = labels.len();
                Slot::Blank(*labels.entry(b.as_str().to_owned()).or_insert(next))
            }
            Node::Term(t) => Slot::Ground(ValueKey::of(t)),
        };
        let mut ground = HashMap::new();
        let mut open = Vec::new();
        for t in triples {
            let st = [slot(&t.subject), slot(&t.predicate), slot(&t.object)];
            if st.iter().any(|s| matches!(s, Slot::Blank(_))) {
                open.push(st);
            } else {
                *ground.entry(st).or_insert(0) += 1;
            }
        }
        Self {
            ground,
            open,
            blanks: labels.len(),
        }
    }

    /// Stable colors after iterated refinement, plus the per-round color
    /// histograms used to reject early.
    fn refine(&self, rounds: usize) -> Vec<Vec<Color>> {
        let mut colors = vec![*blake3::hash(b"blank").as_bytes(); self.blanks];
        let mut history = Vec::with_capacity(rounds + 1);
        history.push(colors.clone());
        let mut mentions: Vec<Vec<usize>> = vec![Vec::new(); self.blanks];
        for (n, t) in self.open.iter().enumerate() {
            for s in t {
                if let Slot::Blank(b) = s {
                    if mentions[*b].last() != Some(&n) {
                        mentions[*b].push(n);
                    }
                }
            }
        }
        for _ in 0..rounds {
            let next: Vec<Color> = (0..self.blanks)
                .map(|b| {
                    let mut sigs: Vec<Color> = mentions[b]
                        .iter()
                        .map(|n| triple_signature(&self.open[*n], b, &colors))
                        .collect();
                    sigs.sort_unstable();
                    let mut h = blake3::Hasher::new();
                    h.update(&colors[b]);
                    for sig in &sigs {
                        h.update(sig);
                    }
                    *h.finalize().as_bytes()
                })
                .collect();
            let stable = distinct(&next) == distinct(&colors);
            colors = next;
            history.push(colors.clone());
            if stable {
                break;
            }
        }
        history
    }

    /// Blank components: blank indexes grouped by shared triples, with the
    /// triples each group owns.
    fn components(&self) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut uf = UnionFind::<usize>::new(self.blanks);
        for t in &self.open {
            let mut first = None;
            for s in t {
                if let Slot::Blank(b) = s {
                    match first {
                        None => first = Some(*b),
                        Some(f) => {
                            uf.union(f, *b);
                        }
                    }
                }
            }
        }
        let labels = uf.into_labeling();
        let mut groups: HashMap<usize, (Vec<usize>, Vec<usize>)> = HashMap::new();
        for (b, root) in labels.iter().enumerate() {
            groups.entry(*root).or_default().0.push(b);
        }
        for (n, t) in self.open.iter().enumerate() {
            if let Some(Slot::Blank(b)) = t.iter().find(|s| matches!(s, Slot::Blank(_))) {
                groups.entry(labels[*b]).or_default().1.push(n);
            }
        }
        let mut out: Vec<_> = groups.into_values().collect();
        out.sort();
        out
    }
}

fn distinct(colors: &[Color]) -> usize {
    colors.iter().collect::<HashSet<_>>().len()
}

fn feed_value(h: &mut blake3::Hasher, v: &ValueKey) {
    let (tag, parts): (u8, Vec<&str>) = match v {
        ValueKey::Iri(s) => (0, vec![s.as_str()]),
        ValueKey::Blank(s) => (1, vec![s.as_str()]),
        ValueKey::Integer(i) => {
            h.update(&[2]);
            h.update(&i.to_be_bytes());
            return;
        }
        ValueKey::Decimal(s) => (3, vec![s.as_str()]),
        ValueKey::Boolean(b) => {
            h.update(&[4, *b as u8]);
            return;
        }
        ValueKey::Float(bits) => {
            h.update(&[5]);
            h.update(&bits.to_be_bytes());
            return;
        }
        ValueKey::Double(bits) => {
            h.update(&[6]);
            h.update(&bits.to_be_bytes());
            return;
        }
        ValueKey::String(s) => (7, vec![s.as_str()]),
        ValueKey::LangString { lex, lang } => (8, vec![lex.as_str(), lang.as_str()]),
        ValueKey::Typed { datatype, lex } => (9, vec![datatype.as_str(), lex.as_str()]),
    };
    h.update(&[tag]);
    for p in parts {
        h.update(&(p.len() as u64).to_be_bytes());
        h.update(p.as_bytes());
    }
}

fn triple_signature(t: &SlotTriple, me: usize, colors: &[Color]) -> Color {
    let mut h = blake3::Hasher::new();
    for s in t {
        match s {
            Slot::Any => {
                h.update(b"A");
            }
            Slot::Ground(v) => {
                h.update(b"G");
                feed_value(&mut h, v);
            }
            Slot::Blank(b) if *b == me => {
                h.update(b"S");
            }
            Slot::Blank(b) => {
                h.update(b"B");
                h.update(&colors[*b]);
            }
        }
    }
    *h.finalize().as_bytes()
}

fn histogram(colors: &[Color], members: &[usize]) -> Vec<Color> {
    let mut h: Vec<Color> = members.iter().map(|b| colors[*b]).collect();
    h.sort_unstable();
    h
}

fn tally<'a>(triples: impl IntoIterator<Item = &'a SlotTriple>) -> HashMap<&'a SlotTriple, usize> {
    let mut counts = HashMap::new();
    for t in triples {
        *counts.entry(t).or_insert(0) += 1;
    }
    counts
}

fn rename(t: &SlotTriple, mapping: &[Option<usize>]) -> Option<SlotTriple> {
    let mut out = t.clone();
    for s in out.iter_mut() {
        if let Slot::Blank(b) = s {
            *b = mapping[*b]?;
        }
    }
    Some(out)
}

struct Matcher<'a> {
    a: &'a Side,
    a_colors: &'a [Color],
    b_colors: &'a [Color],
    /// Triples of the candidate component on the other side, with counts.
    targets: HashMap<&'a SlotTriple, usize>,
    /// Triples of the component being matched.
    sources: &'a [usize],
    /// Source triples keyed by the blanks they mention.
    by_blank: HashMap<usize, Vec<usize>>,
    order: Vec<usize>,
    candidates: Vec<usize>,
    mapping: Vec<Option<usize>>,
    used: HashSet<usize>,
}

impl Matcher<'_> {
    fn consistent(&self, blank: usize) -> bool {
        self.by_blank.get(&blank).is_none_or(|triples| {
            triples.iter().all(|n| match rename(&self.a.open[*n], &self.mapping) {
                Some(mapped) => self.targets.contains_key(&mapped),
                None => true,
            })
        })
    }

    /// A complete mapping must carry the source triples onto the targets
    /// with the same multiplicities.
    fn complete(&self) -> bool {
        let renamed: Vec<SlotTriple> = self
            .sources
            .iter()
            .filter_map(|n| rename(&self.a.open[*n], &self.mapping))
            .collect();
        renamed.len() == self.sources.len() && tally(&renamed) == self.targets
    }

    fn search(&mut self, depth: usize) -> bool {
        let Some(&blank) = self.order.get(depth) else {
            return self.complete();
        };
        for i in 0..self.candidates.len() {
            let candidate = self.candidates[i];
            if self.used.contains(&candidate) || self.a_colors[blank] != self.b_colors[candidate] {
                continue;
            }
            self.mapping[blank] = Some(candidate);
            self.used.insert(candidate);
            if self.consistent(blank) && self.search(depth + 1) {
                return true;
            }
            self.used.remove(&candidate);
            self.mapping[blank] = None;
        }
        false
    }
}

/// True when some bijection of blank nodes maps `a` onto `b`.
pub fn is_isomorphic(a: &[Triple], b: &[Triple]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let a = Side::new(a);
    let b = Side::new(b);
    if a.ground != b.ground || a.open.len() != b.open.len() || a.blanks != b.blanks {
        return false;
    }
    if a.blanks == 0 {
        return true;
    }
    let a_history = a.refine(a.blanks);
    let b_history = b.refine(a.blanks);
    if a_history.len() != b_history.len() {
        return false;
    }
    let all: Vec<usize> = (0..a.blanks).collect();
    for (ac, bc) in a_history.iter().zip(&b_history) {
        if histogram(ac, &all) != histogram(bc, &all) {
            return false;
        }
    }
    let (Some(a_colors), Some(b_colors)) = (a_history.last(), b_history.last()) else {
        return true;
    };

    let b_components = b.components();
    let mut taken = vec![false; b_components.len()];
    for (a_blanks, a_triples) in a.components() {
        let wanted = histogram(a_colors, &a_blanks);
        let mut matched = false;
        for (j, (b_blanks, b_triples)) in b_components.iter().enumerate() {
            if taken[j]
                || b_blanks.len() != a_blanks.len()
                || b_triples.len() != a_triples.len()
                || histogram(b_colors, b_blanks) != wanted
            {
                continue;
            }
            let mut by_blank: HashMap<usize, Vec<usize>> = HashMap::new();
            for n in &a_triples {
                for s in &a.open[*n] {
                    if let Slot::Blank(x) = s {
                        let entry = by_blank.entry(*x).or_default();
                        if entry.last() != Some(n) {
                            entry.push(*n);
                        }
                    }
                }
            }
            let mut matcher = Matcher {
                a: &a,
                a_colors,
                b_colors,
                targets: tally(b_triples.iter().map(|n| &b.open[*n])),
                sources: &a_triples,
                by_blank,
                order: a_blanks.clone(),
                candidates: b_blanks.clone(),
                mapping: vec![None; a.blanks],
                used: HashSet::new(),
            };
            if matcher.search(0) {
                taken[j] = true;
                matched = true;
                break;
            }
        }
        if !matched {
            return false;
        }
    }
    true
}
