//! # Trajectory Builder
//!
//! Builds an entity's movement trail from the snapshots retained in a
//! [`HistoryRing`].

use super::correlate;
use super::ring::HistoryRing;
use crate::wire::address::Address;
use crate::wire::protocol::Position;

/// Past positions of `address`, oldest first
///
/// Walks every retained snapshot except the head, from the oldest towards the
/// newest. Snapshots where the address is absent are skipped, so a trail
/// jumps over gaps instead of breaking. Fewer than two points means there is
/// no trail to draw.
///
/// # Examples
///
/// ```
/// use radiotrail::history::ring::HistoryRing;
/// use radiotrail::history::trajectory::trajectory;
/// use radiotrail::wire::address::Address;
///
/// let ring = HistoryRing::new(3);
/// assert!(trajectory(&ring, Address::new([1; 6])).is_empty());
/// ```
pub fn trajectory(ring: &HistoryRing, address: Address) -> Vec<Position> {
    ring.iter_from_head()
        .skip(1)
        .rev()
        .filter_map(|snapshot| correlate::find(snapshot, address))
        .map(|record| record.position)
        .collect()
}

/// [`trajectory`] followed by the head position, when the entity is in the head
pub fn trajectory_with_anchor(ring: &HistoryRing, address: Address) -> Vec<Position> {
    let mut points = trajectory(ring, address);
    if let Some(record) = correlate::find(ring.head(), address) {
        points.push(record.position);
    }
    points
}

/// Polyline edges between consecutive points
pub fn segments(points: &[Position]) -> impl Iterator<Item = (Position, Position)> + '_ {
    points.windows(2).map(|pair| (pair[0], pair[1]))
}
