//! # History Module
//!
//! Bounded rolling history of snapshots and per-entity trajectories.
//!
//! This module handles:
//! - Fixed-depth circular storage of snapshots (runtime-reconfigurable)
//! - Matching an entity across snapshots by address
//! - Building an entity's trail from the retained snapshots

pub mod snapshot;
pub mod ring;
pub mod correlate;
pub mod trajectory;
