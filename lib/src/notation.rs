//! Compact notation for nodes and triples.
//!
//! ```text
//! S P O; _x P 'chat'en; x R '1'xsd:integer; ?? P ??
//! ```
//!
//! - `??` or `?name`: the wildcard
//! - `_label`: a blank node
//! - `'lex'`, `'lex'lang`, `'lex'prefix:type`: literals
//! - a run of digits: an `xsd:integer` literal
//! - `prefix:local`: an IRI, expanded when the prefix is known
//! - any other word `w`: the IRI `eh:/w`

use oxigraph::model::{BlankNode, Literal, NamedNode};

use crate::consts::{KNOWN_PREFIXES, XSD_INTEGER};
use crate::errors::{Error, Result};
use crate::term::{Node, Triple};

fn invalid(token: &str, why: impl std::fmt::Display) -> Error {
    Error::InvalidTerm(format!("'{}': {}", token, why))
}

fn iri(token: &str) -> Result<NamedNode> {
    let expanded = match token.split_once(':') {
        Some((prefix, local)) => KNOWN_PREFIXES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, ns)| format!("{}{}", ns, local))
            .unwrap_or_else(|| token.to_string()),
        None => format!("eh:/{}", token),
    };
    NamedNode::new(expanded).map_err(|e| invalid(token, e))
}

fn literal(token: &str) -> Result<Literal> {
    let body = &token[1..];
    let Some(close) = body.rfind('\'') else {
        return Err(invalid(token, "unterminated literal"));
    };
    let (lex, suffix) = (&body[..close], &body[close + 1..]);
    if suffix.is_empty() {
        Ok(Literal::new_simple_literal(lex))
    } else if suffix.contains(':') {
        Ok(Literal::new_typed_literal(lex, iri(suffix)?))
    } else {
        Literal::new_language_tagged_literal(lex, suffix).map_err(|e| invalid(token, e))
    }
}

pub fn parse_node(token: &str) -> Result<Node> {
    let token = token.trim();
    let Some(first) = token.chars().next() else {
        return Err(invalid(token, "empty node"));
    };
    match first {
        '?' => Ok(Node::Any),
        '_' => {
            let label = if token.len() > 1 { &token[1..] } else { "b" };
            BlankNode::new(label)
                .map(Node::from)
                .map_err(|e| invalid(token, e))
        }
        '\'' => literal(token).map(Node::from),
        c if c.is_ascii_digit() || (c == '-' && token.len() > 1) => {
            if token[1..].bytes().all(|b| b.is_ascii_digit()) {
                Ok(Literal::new_typed_literal(token, XSD_INTEGER).into())
            } else {
                iri(token).map(Node::from)
            }
        }
        _ => iri(token).map(Node::from),
    }
}

pub fn parse_triple(text: &str) -> Result<Triple> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [s, p, o] => Ok(Triple::new(parse_node(s)?, parse_node(p)?, parse_node(o)?)),
        _ => Err(invalid(text, "expected three nodes")),
    }
}

/// Semicolon-separated triples. Empty entries are skipped.
pub fn parse_triples(text: &str) -> Result<Vec<Triple>> {
    text.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_triple)
        .collect()
}

#[cfg(test)]
pub(crate) fn node(token: &str) -> Node {
    parse_node(token).unwrap()
}

#[cfg(test)]
pub(crate) fn triple(text: &str) -> Triple {
    parse_triple(text).unwrap()
}

#[cfg(test)]
pub(crate) fn triples(text: &str) -> Vec<Triple> {
    parse_triples(text).unwrap()
}
