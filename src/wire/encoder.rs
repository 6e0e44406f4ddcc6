//! # Snapshot Encoder
//!
//! Encodes entity records into the snapshot wire format. This is the
//! producer side of [`super::decoder`], used to build replay frames.

use bytes::BufMut;

use super::protocol::{EntityRecord, ProtocolVersion};

/// Encode one record
///
/// # Arguments
///
/// * `record` - Record to encode
/// * `version` - Target protocol version
///
/// # Returns
///
/// * `Vec<u8>` - `version.record_size()` bytes
///
/// A missing scanner count is written as 0 in the 20-byte variant; a present
/// one is dropped in the 19-byte variant.
///
/// # Examples
///
/// ```
/// use radiotrail::wire::address::Address;
/// use radiotrail::wire::encoder::encode_record;
/// use radiotrail::wire::protocol::{EntityFlags, EntityRecord, Position, ProtocolVersion};
///
/// let record = EntityRecord {
///     address: Address::new([1, 2, 3, 4, 5, 6]),
///     position: Position::new(0.0, 1.0, 2.0),
///     scanner_count: Some(3),
///     flags: EntityFlags::from_bits(0b001),
/// };
/// assert_eq!(encode_record(&record, ProtocolVersion::WithScannerCount).len(), 20);
/// ```
pub fn encode_record(record: &EntityRecord, version: ProtocolVersion) -> Vec<u8> {
    let mut frame = Vec::with_capacity(version.record_size());
    put_record(&mut frame, record, version);
    frame
}

/// Encode a full snapshot: records concatenated in order
pub fn encode_snapshot(records: &[EntityRecord], version: ProtocolVersion) -> Vec<u8> {
    let mut frame = Vec::with_capacity(records.len() * version.record_size());
    for record in records {
        put_record(&mut frame, record, version);
    }
    frame
}

fn put_record<B: BufMut>(buf: &mut B, record: &EntityRecord, version: ProtocolVersion) {
    buf.put_slice(record.address.as_bytes());
    buf.put_f32_le(record.position.x);
    buf.put_f32_le(record.position.y);
    buf.put_f32_le(record.position.z);
    if version.scanner_count_offset().is_some() {
        buf.put_u8(record.scanner_count.unwrap_or(0));
    }
    buf.put_u8(record.flags.bits());
}
