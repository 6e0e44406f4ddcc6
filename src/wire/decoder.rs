//! # Snapshot Decoder
//!
//! Decodes a raw poll response into a [`Snapshot`] of entity records.

use bytes::Buf;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::address::{Address, ADDRESS_SIZE};
use super::protocol::{EntityFlags, EntityRecord, Position, ProtocolVersion};
use crate::history::snapshot::Snapshot;

/// What to do with a buffer whose length is not a whole number of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Reject the whole snapshot
    #[default]
    Reject,
    /// Decode the complete leading records and report the dropped tail
    DropTrailing,
}

/// Snapshot decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer length is not a multiple of the record size
    #[error("truncated buffer: {len} bytes is not a multiple of the {record_size}-byte record size ({trailing} trailing bytes)")]
    TruncatedBuffer {
        len: usize,
        record_size: usize,
        trailing: usize,
    },

    /// Buffer holds no records (only reported when empty frames are rejected)
    #[error("empty buffer: no entities visible")]
    EmptyBuffer,
}

impl DecodeError {
    /// Informational errors describe a valid but uninteresting frame
    pub fn is_informational(&self) -> bool {
        matches!(self, DecodeError::EmptyBuffer)
    }
}

/// Snapshot decoder for one protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireDecoder {
    version: ProtocolVersion,
    truncation: TruncationPolicy,
    reject_empty: bool,
}

impl WireDecoder {
    /// Strict decoder: partial frames are rejected, empty frames accepted
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            truncation: TruncationPolicy::Reject,
            reject_empty: false,
        }
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    /// Report empty frames as [`DecodeError::EmptyBuffer`] instead of decoding
    /// them to an empty snapshot
    pub fn with_reject_empty(mut self, reject_empty: bool) -> Self {
        self.reject_empty = reject_empty;
        self
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn truncation(&self) -> TruncationPolicy {
        self.truncation
    }

    /// Decode a complete poll response
    ///
    /// # Arguments
    ///
    /// * `buffer` - Concatenated records, `k × record_size` bytes
    ///
    /// # Returns
    ///
    /// * `Result<Snapshot, DecodeError>` - `k` records in buffer order
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The length is not a multiple of the record size and the policy is
    ///   [`TruncationPolicy::Reject`]
    /// - No complete record is present and empty frames are rejected
    pub fn decode(&self, buffer: &[u8]) -> Result<Snapshot, DecodeError> {
        let record_size = self.version.record_size();
        let trailing = buffer.len() % record_size;

        if trailing != 0 && self.truncation == TruncationPolicy::Reject {
            return Err(DecodeError::TruncatedBuffer {
                len: buffer.len(),
                record_size,
                trailing,
            });
        }

        let chunks = buffer.chunks_exact(record_size);
        if chunks.len() == 0 && self.reject_empty {
            return Err(DecodeError::EmptyBuffer);
        }

        let records: Vec<EntityRecord> = chunks
            .map(|chunk| decode_record(chunk, self.version))
            .collect();

        if trailing != 0 {
            warn!(
                "Dropped {} trailing bytes after {} complete records ({}-byte records)",
                trailing,
                records.len(),
                record_size
            );
        }

        Ok(Snapshot::new(records).with_dropped_bytes(trailing))
    }
}

/// Decode a buffer with the strict default policy
///
/// # Examples
///
/// ```
/// use radiotrail::wire::decoder::decode_snapshot;
/// use radiotrail::wire::protocol::ProtocolVersion;
///
/// let snapshot = decode_snapshot(&[0u8; 40], ProtocolVersion::WithScannerCount)?;
/// assert_eq!(snapshot.len(), 2);
/// # Ok::<(), radiotrail::wire::decoder::DecodeError>(())
/// ```
pub fn decode_snapshot(buffer: &[u8], version: ProtocolVersion) -> Result<Snapshot, DecodeError> {
    WireDecoder::new(version).decode(buffer)
}

/// Decode one record; `record` must be exactly `version.record_size()` bytes
fn decode_record(mut record: &[u8], version: ProtocolVersion) -> EntityRecord {
    debug_assert_eq!(record.len(), version.record_size());

    let mut address = [0u8; ADDRESS_SIZE];
    record.copy_to_slice(&mut address);

    let x = record.get_f32_le();
    let y = record.get_f32_le();
    let z = record.get_f32_le();

    let scanner_count = match version {
        ProtocolVersion::WithScannerCount => Some(record.get_u8()),
        ProtocolVersion::Compact => None,
    };
    let flags = EntityFlags::from_bits(record.get_u8());

    EntityRecord {
        address: Address::new(address),
        position: Position::new(x, y, z),
        scanner_count,
        flags,
    }
}
