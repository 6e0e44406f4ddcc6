//! # Snapshot Sources
//!
//! Where raw poll responses come from. Transport is out of scope for the
//! engine; a source only hands over complete frames.

use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::{RadiotrailError, Result};
use crate::wire::decoder::DecodeError;

/// File extension of recorded frames
pub const FRAME_EXTENSION: &str = "bin";

/// Trait for anything that yields raw snapshot frames
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotSource: Send {
    /// Next raw frame, or `None` when the source is exhausted
    fn next_frame(&mut self) -> Result<Option<Bytes>>;
}

/// Replays recorded frames (`*.bin`) from a directory in file name order
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    loop_frames: bool,
}

impl DirectorySource {
    /// Scan `dir` for recorded frames
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be read
    pub fn open<P: AsRef<Path>>(dir: P, loop_frames: bool) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == FRAME_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            warn!("No .{} frames found in {}", FRAME_EXTENSION, dir.display());
        } else {
            info!("Replaying {} frames from {}", files.len(), dir.display());
        }

        Ok(Self {
            dir,
            files,
            cursor: 0,
            loop_frames,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_count(&self) -> usize {
        self.files.len()
    }
}

impl SnapshotSource for DirectorySource {
    fn next_frame(&mut self) -> Result<Option<Bytes>> {
        if self.cursor >= self.files.len() {
            if !self.loop_frames || self.files.is_empty() {
                return Ok(None);
            }
            debug!("Restarting replay of {}", self.dir.display());
            self.cursor = 0;
        }

        let path = &self.files[self.cursor];
        let frame = fs::read(path).map_err(|e| {
            RadiotrailError::Source(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.cursor += 1;

        debug!("Read {} bytes from {}", frame.len(), path.display());
        Ok(Some(Bytes::from(frame)))
    }
}

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Frame stored; number of entities now visible
    Ingested(usize),
    /// Frame discarded; history unchanged
    Rejected(DecodeError),
    /// Source has no more frames
    Exhausted,
}

/// Pull one frame from `source` and feed it to `engine`
///
/// Decode failures are reported in the outcome rather than as an error so a
/// poll loop keeps running past bad frames.
///
/// # Errors
///
/// Returns error only if the source itself fails
pub fn poll_once(source: &mut dyn SnapshotSource, engine: &mut Engine) -> Result<PollOutcome> {
    let Some(frame) = source.next_frame()? else {
        return Ok(PollOutcome::Exhausted);
    };

    Ok(match engine.ingest(&frame) {
        Ok(()) => PollOutcome::Ingested(engine.current_entities().len()),
        Err(e) => PollOutcome::Rejected(e),
    })
}
