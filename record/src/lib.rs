//! tdb-record: fixed-width node ids and key/value records for index storage.
//!
//! This crate holds the two byte-level codecs the triple store is built on:
//!
//! - [`NodeId`]: the 8-byte surrogate identifier that stands in for an RDF
//!   term inside every index. Two reserved values mark "no such node" and the
//!   pattern wildcard; both stay bit-for-bit distinct from real ids.
//! - [`RecordFactory`] / [`Record`]: a fixed-length key (+ optional value)
//!   layout addressed by slot number inside a caller-supplied byte buffer.
//!
//! [`RecordBuffer`] keeps records of one shape sorted by key inside a single
//! contiguous buffer. It is the in-memory equivalent of a B+Tree leaf and
//! supports the prefix scans the triple indexes need.
//!
//! Quick start
//!
//! ```
//! use tdb_record::{NodeId, RecordFactory, RecordBuffer};
//!
//! let factory = RecordFactory::new(3 * NodeId::SIZE, 0).expect("shape");
//! let mut key = vec![0u8; factory.key_length()];
//! for (i, n) in [7u64, 1, 42].into_iter().enumerate() {
//!     NodeId::new(n).unwrap().to_bytes(&mut key, i * NodeId::SIZE).unwrap();
//! }
//! let mut buf = RecordBuffer::new(factory);
//! buf.insert(factory.create(&key, None).unwrap()).unwrap();
//! assert_eq!(buf.scan_prefix(&key[..8]).count(), 1);
//! ```

pub mod buffer;
pub mod node_id;
pub mod record;

pub use buffer::RecordBuffer;
pub use node_id::NodeId;
pub use record::{Record, RecordError, RecordFactory, Result};
