//! # Frame Reports
//!
//! Serializable view of the engine at one redraw tick: the current entities
//! and the trails a renderer would draw.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::engine::Engine;
use crate::history::trajectory::segments;
use crate::wire::address::Address;
use crate::wire::protocol::{EntityRecord, Position};

/// Trail of one entity, oldest point first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trail {
    pub address: Address,
    pub points: Vec<Position>,
}

impl Trail {
    /// A trail needs two points to form a segment
    pub fn is_drawable(&self) -> bool {
        segments(&self.points).next().is_some()
    }
}

/// Engine state at one redraw tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub generated_at: DateTime<Utc>,
    pub snapshot_received_at: Option<DateTime<Utc>>,
    pub history_depth: usize,
    pub entities: Vec<EntityRecord>,
    pub trails: Vec<Trail>,
}

impl FrameReport {
    /// Build a report from `engine`
    ///
    /// Trails are built for `trail_for`, or for every entity of the head
    /// snapshot when it is empty. Each trail is anchored at the entity's
    /// current position.
    pub fn build(engine: &Engine, trail_for: &[Address]) -> Self {
        let mut addresses: Vec<Address> = if trail_for.is_empty() {
            engine.current_entities().iter().map(|e| e.address).collect()
        } else {
            trail_for.to_vec()
        };
        // Keep the first occurrence of each address
        let mut seen = HashSet::with_capacity(addresses.len());
        addresses.retain(|a| seen.insert(*a));

        let trails = addresses
            .into_iter()
            .map(|address| Trail {
                address,
                points: engine.anchored_trajectory_for(address),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            snapshot_received_at: engine.head().received_at(),
            history_depth: engine.history_depth(),
            entities: engine.current_entities().to_vec(),
            trails,
        }
    }

    /// One JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Human-readable listing, one entity per line followed by drawable trails
    pub fn render_text(&self) -> String {
        let entities = self.entities.iter().map(|entity| format!("{}\n", entity));
        let trails = self.trails.iter().filter(|t| t.is_drawable()).map(|trail| {
            let points: Vec<String> = trail.points.iter().map(|p| p.to_string()).collect();
            format!("  trail {}: {}\n", trail.address, points.join(" -> "))
        });
        entities.chain(trails).collect()
    }
}
