//! tdb: the storage and query core of an RDF triple store.
//!
//! Terms are mapped to 8-byte node ids by a shared [`NodeTable`]; triples of
//! ids live in several sorted indexes ([`TripleIndexSet`]) built on the
//! `tdb-record` codec. A [`Graph`] puts pattern matching with by-value
//! literal comparison, transactions, listeners and capabilities on top.
//!
//! ```
//! use tdb::{Graph, GraphConfig, notation::parse_triple};
//!
//! let graph = Graph::in_memory(GraphConfig::default()).unwrap();
//! graph.add(&parse_triple("x P '1'xsd:integer").unwrap()).unwrap();
//! assert!(graph.contains(&parse_triple("x P '01'xsd:int").unwrap()).unwrap());
//! ```

extern crate derive_builder;

pub mod capabilities;
pub mod config;
pub mod consts;
pub mod errors;
pub mod events;
pub mod find;
pub mod graph;
pub mod index;
pub mod io;
pub mod isomorphism;
pub mod node_table;
pub mod notation;
pub mod store;
pub mod term;
mod transaction;
pub mod util;
pub mod value;

pub use capabilities::Capabilities;
pub use config::{GraphConfig, GraphConfigBuilder};
pub use errors::{Error, Result};
pub use events::{GraphEvent, GraphListener, ListenerId};
pub use find::{Find, Found};
pub use graph::Graph;
pub use index::{IdTriple, IndexOrder, TripleIndexSet};
pub use node_table::{MemoryNodeTable, NodeTable};
pub use store::Store;
pub use term::{Node, Triple};
pub use value::ValueKey;

pub use tdb_record::NodeId;
