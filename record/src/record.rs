//! Fixed-length key/value records and the factory that shapes them.
//!
//! A [`RecordFactory`] is configured once with `(key_length, value_length)`.
//! Every record it creates, writes or reads has exactly that shape; slot `i`
//! of a buffer occupies bytes `[i * (k + v), (i + 1) * (k + v))`, key first.

use std::fmt;
use std::ops::Range;

/// Errors raised by the record and node id codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Factories need at least one key byte.
    ZeroKeyLength,
    /// Key length differs from the factory configuration.
    KeyLength { expected: usize, got: usize },
    /// Value length differs from the factory configuration.
    ValueLength { expected: usize, got: usize },
    /// A value was supplied to a key-only factory.
    UnexpectedValue,
    /// No value was supplied but the factory requires one.
    MissingValue { expected: usize },
    /// The byte range needed lies outside the buffer.
    OutOfBounds { offset: usize, need: usize, len: usize },
    /// A real id would overlap the sentinel encoding.
    IdOutOfRange(u64),
    /// A raw value that is neither a real id nor a sentinel.
    ReservedId(u64),
}

impl RecordError {
    /// True for the errors that mean "record does not match its factory".
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            RecordError::KeyLength { .. }
                | RecordError::ValueLength { .. }
                | RecordError::UnexpectedValue
                | RecordError::MissingValue { .. }
        )
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::ZeroKeyLength => write!(f, "record key length must be at least 1"),
            RecordError::KeyLength { expected, got } => write!(
                f,
                "key length error: factory manages keys of length {}, not {}",
                expected, got
            ),
            RecordError::ValueLength { expected, got } => write!(
                f,
                "value length error: factory manages values of length {}, not {}",
                expected, got
            ),
            RecordError::UnexpectedValue => {
                write!(f, "value error: factory manages records that are all key")
            }
            RecordError::MissingValue { expected } => {
                write!(f, "value error: factory requires a value of length {}", expected)
            }
            RecordError::OutOfBounds { offset, need, len } => write!(
                f,
                "{} bytes at offset {} exceed buffer of {} bytes",
                need, offset, len
            ),
            RecordError::IdOutOfRange(v) => write!(f, "node id {} is out of range", v),
            RecordError::ReservedId(raw) => write!(f, "raw value {:#x} is not a node id", raw),
        }
    }
}

impl std::error::Error for RecordError {}

pub type Result<T> = std::result::Result<T, RecordError>;

/// A key with an optional value. Only a [`RecordFactory`] builds these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    key: Box<[u8]>,
    value: Option<Box<[u8]>>,
}

impl Record {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    pub fn into_parts(self) -> (Box<[u8]>, Option<Box<[u8]>>) {
        (self.key, self.value)
    }
}

/// Creates, writes and reads records of one fixed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordFactory {
    key_length: usize,
    value_length: usize,
}

impl RecordFactory {
    pub fn new(key_length: usize, value_length: usize) -> Result<Self> {
        if key_length == 0 {
            return Err(RecordError::ZeroKeyLength);
        }
        Ok(Self {
            key_length,
            value_length,
        })
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn value_length(&self) -> usize {
        self.value_length
    }

    pub fn has_value(&self) -> bool {
        self.value_length > 0
    }

    /// Bytes per slot.
    pub fn record_length(&self) -> usize {
        self.key_length + self.value_length
    }

    /// Byte range of slot `slot`, or `None` when it overflows `usize`.
    pub fn slot_range(&self, slot: usize) -> Option<Range<usize>> {
        let need = self.record_length();
        let start = slot.checked_mul(need)?;
        Some(start..start.checked_add(need)?)
    }

    /// Build a record from exactly-sized parts.
    pub fn create(&self, key: &[u8], value: Option<&[u8]>) -> Result<Record> {
        self.check(key, value)?;
        Ok(Record {
            key: key.into(),
            value: value.map(Into::into),
        })
    }

    /// Build a record from a key alone. Factories with a value part get a
    /// zero-filled value.
    pub fn create_key_only(&self, key: &[u8]) -> Result<Record> {
        if self.has_value() {
            let zeros = vec![0u8; self.value_length];
            self.create(key, Some(&zeros))
        } else {
            self.create(key, None)
        }
    }

    /// Write `record` into slot `slot` of `buf`.
    pub fn insert_into(&self, record: &Record, buf: &mut [u8], slot: usize) -> Result<()> {
        self.check(record.key(), record.value())?;
        let range = self.checked_slot(buf.len(), slot)?;
        let (key_part, value_part) = buf[range].split_at_mut(self.key_length);
        key_part.copy_from_slice(record.key());
        if let Some(v) = record.value() {
            value_part.copy_from_slice(v);
        }
        Ok(())
    }

    /// Read slot `slot` of `buf` back into a record.
    pub fn build_from(&self, buf: &[u8], slot: usize) -> Result<Record> {
        let range = self.checked_slot(buf.len(), slot)?;
        let bytes = &buf[range];
        let (key, value) = bytes.split_at(self.key_length);
        Ok(Record {
            key: key.into(),
            value: self.has_value().then(|| value.into()),
        })
    }

    /// Borrow the key bytes of slot `slot` without building a record.
    pub fn key_slice<'a>(&self, buf: &'a [u8], slot: usize) -> Option<&'a [u8]> {
        let range = self.checked_slot(buf.len(), slot).ok()?;
        Some(&buf[range.start..range.start + self.key_length])
    }

    fn checked_slot(&self, len: usize, slot: usize) -> Result<Range<usize>> {
        let need = self.record_length();
        match self.slot_range(slot) {
            Some(range) if range.end <= len => Ok(range),
            range => Err(RecordError::OutOfBounds {
                offset: range.map_or(usize::MAX, |r| r.start),
                need,
                len,
            }),
        }
    }

    fn check(&self, key: &[u8], value: Option<&[u8]>) -> Result<()> {
        if key.len() != self.key_length {
            return Err(RecordError::KeyLength {
                expected: self.key_length,
                got: key.len(),
            });
        }
        match (self.has_value(), value) {
            (false, Some(_)) => Err(RecordError::UnexpectedValue),
            (false, None) => Ok(()),
            (true, None) => Err(RecordError::MissingValue {
                expected: self.value_length,
            }),
            (true, Some(v)) if v.len() != self.value_length => Err(RecordError::ValueLength {
                expected: self.value_length,
                got: v.len(),
            }),
            (true, Some(_)) => Ok(()),
        }
    }
}

impl fmt::Display for RecordFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<RecordFactory k={} v={}>", self.key_length, self.value_length)
    }
}
