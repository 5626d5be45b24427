//! Loading RDF files into a graph.

use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfParser};

use crate::graph::Graph;
use crate::term::Triple;

/// Format implied by a file extension; Turtle when unknown.
pub fn format_for(path: &Path) -> RdfFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("nt") => RdfFormat::NTriples,
        Some("xml") | Some("rdf") | Some("owl") => RdfFormat::RdfXml,
        Some("n3") => RdfFormat::N3,
        _ => RdfFormat::Turtle,
    }
}

/// Parse `path` and add every triple to `graph` inside one transaction.
/// Returns the number of triples read.
pub fn read_file(path: &Path, graph: &Graph) -> Result<usize> {
    debug!("Reading file: {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let parser = RdfParser::from_format(format_for(path)).for_reader(BufReader::new(file));
    let mut triples = Vec::new();
    for quad in parser {
        let quad = quad.with_context(|| format!("Failed to parse {}", path.display()))?;
        triples.push(Triple::new(quad.subject, quad.predicate, quad.object));
    }
    let count = triples.len();
    graph.execute_in_transaction(|g| {
        for t in &triples {
            g.add(t)?;
        }
        Ok(())
    })?;
    info!("Loaded {} triples from {} into {}", count, path.display(), graph.name());
    Ok(count)
}
