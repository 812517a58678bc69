//! Validation of candidate area partitions.
//!
//! A partition is accepted only if every area is connected through door
//! edges, every area fits inside the size limits, and the Toilet shares an
//! area with the room it overlaps. Any single violation rejects it.

use serde::{Deserialize, Serialize};

use crate::graph::DoorGraph;
use crate::layout::Layout;
use crate::rooms::RoomSet;

/// Footprint of a placed room; `max_*` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomExtent {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

/// Extent of every room, index-aligned with the room table.
pub fn room_extents(rooms: &RoomSet, layout: &Layout) -> Vec<RoomExtent> {
    rooms
        .rooms()
        .iter()
        .zip(layout.iter())
        .map(|(room, placed)| RoomExtent {
            min_x: placed.x,
            max_x: placed.x + room.width() as i64,
            min_y: placed.y,
            max_y: placed.y + room.height() as i64,
        })
        .collect()
}

/// Largest allowed area bounding box, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaLimits {
    pub max_width: i64,
    pub max_height: i64,
}

/// Why a partition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The area's rooms are not connected by in-area edges (or it is empty).
    Disconnected { area: usize },
    TooWide { area: usize, width: i64 },
    TooTall { area: usize, height: i64 },
    ToiletSplit { toilet_area: usize, partner_area: usize },
}

/// Checks partitions of one episode's graph.
pub struct ValidityChecker<'a> {
    graph: &'a DoorGraph,
    /// Indexed by vertex.
    extents: Vec<RoomExtent>,
    limits: AreaLimits,
    toilet: usize,
    partner: usize,
    areas: usize,
}

impl<'a> ValidityChecker<'a> {
    /// `extents` is per room; `toilet` and `partner` are room indices and
    /// must both be vertices of `graph`.
    pub fn new(
        graph: &'a DoorGraph,
        extents: &[RoomExtent],
        limits: AreaLimits,
        areas: usize,
        toilet: usize,
        partner: usize,
    ) -> Option<Self> {
        Some(Self {
            graph,
            extents: graph.rooms().iter().map(|&r| extents[r]).collect(),
            limits,
            toilet: graph.vertex(toilet)?,
            partner: graph.vertex(partner)?,
            areas,
        })
    }

    pub fn is_valid(&self, labels: &[usize]) -> bool {
        self.violations(labels).is_empty()
    }

    /// Every violation of `labels` (area per vertex).
    pub fn violations(&self, labels: &[usize]) -> Vec<Violation> {
        let members = self.members(labels);
        let mut found = self.check_connectivity(&members);
        found.extend(self.check_bounds(&members));
        found.extend(self.check_toilet(labels));
        found
    }

    fn members(&self, labels: &[usize]) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.areas];
        for (v, &area) in labels.iter().enumerate() {
            members[area].push(v);
        }
        members
    }

    fn check_connectivity(&self, members: &[Vec<usize>]) -> Vec<Violation> {
        members
            .iter()
            .enumerate()
            .filter(|(_, m)| !self.graph.is_connected(m))
            .map(|(area, _)| Violation::Disconnected { area })
            .collect()
    }

    fn check_bounds(&self, members: &[Vec<usize>]) -> Vec<Violation> {
        let mut found = Vec::new();
        for (area, m) in members.iter().enumerate() {
            let Some(first) = m.first().map(|&v| self.extents[v]) else {
                continue;
            };
            let mut bounds = first;
            for &v in &m[1..] {
                let e = self.extents[v];
                bounds.min_x = bounds.min_x.min(e.min_x);
                bounds.max_x = bounds.max_x.max(e.max_x);
                bounds.min_y = bounds.min_y.min(e.min_y);
                bounds.max_y = bounds.max_y.max(e.max_y);
            }
            let width = bounds.max_x - bounds.min_x;
            let height = bounds.max_y - bounds.min_y;
            if width > self.limits.max_width {
                found.push(Violation::TooWide { area, width });
            }
            if height > self.limits.max_height {
                found.push(Violation::TooTall { area, height });
            }
        }
        found
    }

    fn check_toilet(&self, labels: &[usize]) -> Option<Violation> {
        let toilet_area = labels[self.toilet];
        let partner_area = labels[self.partner];
        (toilet_area != partner_area).then_some(Violation::ToiletSplit {
            toilet_area,
            partner_area,
        })
    }
}
