//! # Wire Module
//!
//! Binary snapshot format produced by the master device.
//!
//! This module handles:
//! - Entity record layout (19-byte compact and 20-byte variants)
//! - Snapshot decoding with explicit partial-frame policy
//! - Record encoding (producer side, used for fixtures and replays)
//! - Hardware address text form (`01:23:45:67:89:AB`)
//! - Device configuration command stream

pub mod protocol;
pub mod address;
pub mod decoder;
pub mod encoder;
pub mod command;
