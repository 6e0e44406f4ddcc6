//! # Radiotrail Library
//!
//! Ingest locator snapshots of BLE/BT scanners and devices and keep a rolling
//! trajectory history per entity.
//!
//! This library provides the wire decoder for the master device's snapshot
//! format, a bounded history of snapshots, and the trail builder that matches
//! entities across snapshots by hardware address.

pub mod config;
pub mod error;
pub mod wire;
pub mod history;
pub mod engine;
pub mod source;
pub mod report;
