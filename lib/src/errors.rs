// Error kinds surfaced by graphs, node tables and transactions

use std::fmt;

use tdb_record::{NodeId, RecordError};

#[derive(Debug)]
pub enum Error {
    /// The graph has been closed.
    Closed,
    /// The graph's capabilities forbid this delete.
    DeleteDenied,
    /// The graph's capabilities forbid this add.
    AddDenied,
    /// A record or node id did not fit its codec.
    ShapeMismatch(RecordError),
    /// The node table has no term for this id.
    NotFound(NodeId),
    /// The operation is not offered by this graph.
    Unsupported(&'static str),
    /// `begin` was called while this thread already holds a transaction.
    TransactionActive,
    /// `commit` or `abort` without a matching `begin`.
    NoTransaction,
    /// A term that cannot be stored (wildcard) or parsed.
    InvalidTerm(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Closed => write!(f, "graph is closed"),
            Error::DeleteDenied => write!(f, "delete denied by graph capabilities"),
            Error::AddDenied => write!(f, "add denied by graph capabilities"),
            Error::ShapeMismatch(e) => write!(f, "{}", e),
            Error::NotFound(id) => write!(f, "no term for node id {}", id),
            Error::Unsupported(what) => write!(f, "unsupported operation: {}", what),
            Error::TransactionActive => write!(f, "transaction already active on this thread"),
            Error::NoTransaction => write!(f, "no active transaction"),
            Error::InvalidTerm(m) => write!(f, "invalid term: {}", m),
            Error::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ShapeMismatch(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RecordError> for Error {
    fn from(e: RecordError) -> Self {
        Error::ShapeMismatch(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
