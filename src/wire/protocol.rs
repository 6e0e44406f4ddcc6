//! # Snapshot Protocol Constants and Types
//!
//! Core definitions for the entity snapshot wire format.
//!
//! Each record is laid out as:
//! ```text
//! Offset  Size  Field
//! 0       6     address
//! 6       4     x (f32, little-endian)
//! 10      4     y (f32, little-endian)
//! 14      4     z (f32, little-endian)
//! 18      1     scanner count (20-byte variant only)
//! 19/18   1     flags
//! ```

use serde::Serialize;
use std::fmt;

use super::address::{Address, ADDRESS_SIZE};

/// Offset of the address within a record
pub const RECORD_ADDRESS_OFFSET: usize = 0;

/// Offset of the x coordinate within a record
pub const RECORD_POSITION_OFFSET: usize = ADDRESS_SIZE;

/// Size of the x/y/z block
pub const RECORD_POSITION_SIZE: usize = 3 * 4;

/// Record size without the scanner count byte
pub const COMPACT_RECORD_SIZE: usize = 19;

/// Record size with the scanner count byte
pub const EXTENDED_RECORD_SIZE: usize = 20;

/// Flag bit: entity is a scanner (otherwise a device)
pub const FLAG_IS_SCANNER: u8 = 0b0000_0001;

/// Flag bit: BLE radio (otherwise classic BT)
pub const FLAG_IS_BLE: u8 = 0b0000_0010;

/// Flag bit: public address (otherwise random/private)
pub const FLAG_IS_PUBLIC_ADDRESS: u8 = 0b0000_0100;

/// Coordinate value the producer writes for entities it could not locate
pub const UNRESOLVED_COORDINATE: f32 = f32::MAX;

/// Wire protocol version, identified by its record size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// 19-byte records, no scanner count
    Compact,
    /// 20-byte records with an 8-bit scanner count
    #[default]
    WithScannerCount,
}

impl ProtocolVersion {
    /// Size of one record in bytes
    pub const fn record_size(self) -> usize {
        match self {
            ProtocolVersion::Compact => COMPACT_RECORD_SIZE,
            ProtocolVersion::WithScannerCount => EXTENDED_RECORD_SIZE,
        }
    }

    /// Look up the version carrying records of `size` bytes
    pub const fn from_record_size(size: usize) -> Option<Self> {
        match size {
            COMPACT_RECORD_SIZE => Some(ProtocolVersion::Compact),
            EXTENDED_RECORD_SIZE => Some(ProtocolVersion::WithScannerCount),
            _ => None,
        }
    }

    /// Offset of the scanner count byte, if this version carries one
    pub const fn scanner_count_offset(self) -> Option<usize> {
        match self {
            ProtocolVersion::Compact => None,
            ProtocolVersion::WithScannerCount => Some(RECORD_POSITION_OFFSET + RECORD_POSITION_SIZE),
        }
    }

    /// Offset of the flags byte (always the last byte of a record)
    pub const fn flags_offset(self) -> usize {
        self.record_size() - 1
    }
}

/// World-space position of an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    /// Position the producer reports for entities it could not locate
    pub const UNRESOLVED: Position = Position {
        x: UNRESOLVED_COORDINATE,
        y: UNRESOLVED_COORDINATE,
        z: UNRESOLVED_COORDINATE,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Whether the producer managed to locate the entity
    ///
    /// The producer only ever checks the x coordinate against the sentinel.
    pub fn is_resolved(&self) -> bool {
        self.x != UNRESOLVED_COORDINATE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        } else {
            f.write_str("(unresolved)")
        }
    }
}

/// Entity flags byte, three independent bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EntityFlags {
    /// Scanner (`true`) or discoverable device (`false`)
    pub is_scanner: bool,

    /// BLE (`true`) or classic BT (`false`)
    pub is_ble: bool,

    /// Public (`true`) or random/private (`false`) address
    pub is_public_address: bool,
}

impl EntityFlags {
    /// Unpack the flags byte; bits above bit 2 are ignored
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            is_scanner: bits & FLAG_IS_SCANNER != 0,
            is_ble: bits & FLAG_IS_BLE != 0,
            is_public_address: bits & FLAG_IS_PUBLIC_ADDRESS != 0,
        }
    }

    /// Pack into the flags byte
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.is_scanner {
            bits |= FLAG_IS_SCANNER;
        }
        if self.is_ble {
            bits |= FLAG_IS_BLE;
        }
        if self.is_public_address {
            bits |= FLAG_IS_PUBLIC_ADDRESS;
        }
        bits
    }
}

/// One decoded observation of a scanner or device
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityRecord {
    /// Hardware address, the correlation key between snapshots
    pub address: Address,

    /// Resolved position
    pub position: Position,

    /// Number of scanners used to place this entity (20-byte variant only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanner_count: Option<u8>,

    /// Kind/radio/address-type flags
    pub flags: EntityFlags,
}

impl EntityRecord {
    pub fn is_scanner(&self) -> bool {
        self.flags.is_scanner
    }
}

impl fmt::Display for EntityRecord {
    /// `Scanner[01:23:45:67:89:AB]: (1, 2, 0.5), (BLE, Public, 3)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}, ({}, {}",
            if self.flags.is_scanner { "Scanner" } else { "Device" },
            self.address,
            self.position,
            if self.flags.is_ble { "BLE" } else { "BT" },
            if self.flags.is_public_address { "Public" } else { "Random" },
        )?;
        if let Some(count) = self.scanner_count {
            write!(f, ", {}", count)?;
        }
        f.write_str(")")
    }
}
