//! # Telemetry Engine
//!
//! Ties the wire decoder to the history ring.
//!
//! A raw poll response is decoded first and only pushed into the ring when it
//! decodes cleanly, so a malformed frame never disturbs the retained history.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::history::ring::HistoryRing;
use crate::history::snapshot::Snapshot;
use crate::history::trajectory;
use crate::wire::address::Address;
use crate::wire::decoder::{DecodeError, WireDecoder};
use crate::wire::protocol::{EntityRecord, Position};

/// Snapshot ingestion and trajectory queries over an owned history ring
#[derive(Debug, Clone, Default)]
pub struct Engine {
    decoder: WireDecoder,
    ring: HistoryRing,
}

impl Engine {
    pub fn new(decoder: WireDecoder, ring: HistoryRing) -> Self {
        Self { decoder, ring }
    }

    /// Engine with the configured decoder policies and history depth
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.wire.decoder(), HistoryRing::new(config.history.depth))
    }

    /// Decode `raw` and store it as the newest snapshot
    ///
    /// # Errors
    ///
    /// Returns the decode error unchanged; the ring is left untouched and the
    /// previous head stays the most recent snapshot.
    pub fn ingest(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        let snapshot = match self.decoder.decode(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                if e.is_informational() {
                    debug!("Skipping snapshot: {}", e);
                } else {
                    warn!("Discarding snapshot: {}", e);
                }
                return Err(e);
            }
        };

        debug!("Ingested snapshot with {} entities", snapshot.len());
        self.ring.push(snapshot.with_received_at(Utc::now()));
        Ok(())
    }

    /// Entities of the most recent snapshot, in decode order
    pub fn current_entities(&self) -> &[EntityRecord] {
        self.ring.head().records()
    }

    /// Most recent snapshot
    pub fn head(&self) -> &Snapshot {
        self.ring.head()
    }

    /// Past positions of `address`, oldest first, excluding the head
    pub fn trajectory_for(&self, address: Address) -> Vec<Position> {
        trajectory::trajectory(&self.ring, address)
    }

    /// Past positions of `address` followed by its current position
    pub fn anchored_trajectory_for(&self, address: Address) -> Vec<Position> {
        trajectory::trajectory_with_anchor(&self.ring, address)
    }

    /// Change the number of retained snapshots, discarding all history
    ///
    /// Depths below one are ignored.
    pub fn set_history_depth(&mut self, depth: usize) {
        self.ring.reconfigure(depth);
    }

    pub fn history_depth(&self) -> usize {
        self.ring.capacity()
    }

    pub fn ring(&self) -> &HistoryRing {
        &self.ring
    }

    pub fn decoder(&self) -> &WireDecoder {
        &self.decoder
    }
}

/// [`Engine`] behind a single async lock
///
/// Every operation, including reconfiguration, runs as one critical section,
/// so a reader never observes indices from a ring that was resized under it.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub async fn ingest(&self, raw: &[u8]) -> Result<(), DecodeError> {
        self.inner.lock().await.ingest(raw)
    }

    /// Copy of the current entities
    pub async fn current_entities(&self) -> Vec<EntityRecord> {
        self.inner.lock().await.current_entities().to_vec()
    }

    pub async fn trajectory_for(&self, address: Address) -> Vec<Position> {
        self.inner.lock().await.trajectory_for(address)
    }

    pub async fn set_history_depth(&self, depth: usize) {
        self.inner.lock().await.set_history_depth(depth);
    }

    pub async fn history_depth(&self) -> usize {
        self.inner.lock().await.history_depth()
    }

    /// Run `f` against the engine while holding the lock
    pub async fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.inner.lock().await;
        f(&mut engine)
    }
}
