//! # Identity Correlator
//!
//! Finds an entity in a snapshot by its hardware address.

use super::snapshot::Snapshot;
use crate::wire::address::Address;
use crate::wire::protocol::EntityRecord;

/// Find the record for `address` in `snapshot`
///
/// Exact 6-byte comparison over a linear scan. If several records share the
/// address, the first one in decode order is returned.
pub fn find(snapshot: &Snapshot, address: Address) -> Option<&EntityRecord> {
    snapshot.iter().find(|record| record.address == address)
}
