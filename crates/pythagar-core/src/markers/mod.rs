use log::debug;

use crate::math::{Point3, distance};

/// A placed measurement point, tagged with the order it was dropped in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub index: u64,
    pub position: Point3,
}

/// Append-only sequence of markers for the lifetime of one AR session.
#[derive(Debug, Default, Clone)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    next_index: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a marker at `position` after every existing one.
    pub fn append(&mut self, position: Point3) -> Marker {
        let marker = Marker {
            index: self.next_index,
            position,
        };
        self.next_index = self.next_index.saturating_add(1);
        self.markers.push(marker);
        debug!(
            target: "pythagar_core::markers",
            "Placed marker {} at {:.3?}",
            marker.index,
            position
        );
        marker
    }

    pub fn last(&self) -> Option<&Marker> {
        self.markers.last()
    }

    pub fn get(&self, index: u64) -> Option<&Marker> {
        // Indices are dense from zero until the next reset.
        usize::try_from(index)
            .ok()
            .and_then(|idx| self.markers.get(idx))
    }

    pub fn count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Distance between the newest marker and the one placed just before it.
    pub fn latest_distance(&self) -> Option<f64> {
        match self.markers.as_slice() {
            [.., previous, latest] => Some(distance(&previous.position, &latest.position)),
            _ => None,
        }
    }

    /// Length of the polyline through every marker in placement order.
    pub fn total_path_length(&self) -> f64 {
        self.markers
            .windows(2)
            .map(|pair| distance(&pair[0].position, &pair[1].position))
            .sum()
    }

    pub fn reset(&mut self) {
        debug!(
            target: "pythagar_core::markers",
            "Clearing {} markers",
            self.markers.len()
        );
        self.markers.clear();
        self.next_index = 0;
    }
}
