//! Pattern nodes and triples.
//!
//! A [`Node`] is either a concrete RDF term or the `ANY` wildcard. A
//! [`Triple`] whose three nodes are all terms is *concrete* and can be
//! stored; any other triple is a pattern. Positions are not restricted by
//! term kind, so generalized triples (a literal subject, say) are accepted.

use std::fmt;

use oxigraph::model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Any,
    Term(Term),
}

impl Node {
    pub fn is_any(&self) -> bool {
        matches!(self, Node::Any)
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Node::Term(t) => Some(t),
            Node::Any => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Term(Term::BlankNode(_)))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Term(Term::Literal(_)))
    }
}

impl From<Term> for Node {
    fn from(t: Term) -> Self {
        Node::Term(t)
    }
}

impl From<NamedNode> for Node {
    fn from(n: NamedNode) -> Self {
        Node::Term(n.into())
    }
}

impl From<BlankNode> for Node {
    fn from(b: BlankNode) -> Self {
        Node::Term(b.into())
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Node::Term(l.into())
    }
}

impl From<NamedOrBlankNode> for Node {
    fn from(n: NamedOrBlankNode) -> Self {
        Node::Term(n.into())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Any => write!(f, "ANY"),
            Node::Term(t) => write!(f, "{}", t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Node>, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// The all-wildcard pattern.
    pub fn any() -> Self {
        Self::new(Node::Any, Node::Any, Node::Any)
    }

    /// True when no position is `ANY`.
    pub fn is_concrete(&self) -> bool {
        !(self.subject.is_any() || self.predicate.is_any() || self.object.is_any())
    }

    pub fn nodes(&self) -> [&Node; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Borrow the three terms of a concrete triple.
    pub fn terms(&self) -> Option<[&Term; 3]> {
        Some([
            self.subject.as_term()?,
            self.predicate.as_term()?,
            self.object.as_term()?,
        ])
    }
}

impl From<oxigraph::model::Triple> for Triple {
    fn from(t: oxigraph::model::Triple) -> Self {
        Triple::new(t.subject, t.predicate, t.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{} {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concreteness() {
        let s = NamedNode::new_unchecked("eh:/s");
        let t = Triple::new(s.clone(), s.clone(), Literal::new_simple_literal("o"));
        assert!(t.is_concrete());
        assert!(t.terms().is_some());
        let p = Triple::new(s, Node::Any, Node::Any);
        assert!(!p.is_concrete());
        assert!(p.terms().is_none());
        assert!(!Triple::any().is_concrete());
    }
}
