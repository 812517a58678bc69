//! One episode end to end: placement → door graph → areas → map record.

use serde::Serialize;

use crate::blockmodel::CommunityDetector;
use crate::config::PartitionConfig;
use crate::doors::{pair_doors, toilet_partner, DoorPair};
use crate::error::{DecodeError, EpisodeError};
use crate::graph::DoorGraph;
use crate::layout::Layout;
use crate::normalize::normalize_areas;
use crate::rooms::RoomSet;
use crate::search::{search_partition, SearchResult};
use crate::validity::{room_extents, ValidityChecker};

/// The persisted description of one partitioned map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRecord {
    /// `[x, y]` origin per room, index-aligned with the room table.
    pub rooms: Vec<[i64; 2]>,
    pub doors: Vec<DoorPair>,
    pub toilet_intersections: Vec<usize>,
    /// Area per room; `None` (JSON `null`) for rooms absent from the episode.
    pub area: Vec<Option<usize>>,
}

/// Summary of the search behind a record, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchStats {
    pub trial: u64,
    pub trials_run: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Mapped { record: MapRecord, stats: SearchStats },
    /// No valid partition within the trial budget.
    Skipped { trials: u64 },
}

/// Decode one encoded placement record and map it.
pub fn process_episode<D: CommunityDetector + ?Sized>(
    rooms: &RoomSet,
    record: &[i64],
    config: &PartitionConfig,
    detector: &D,
) -> Result<Outcome, EpisodeError> {
    let layout = Layout::decode(record, rooms.len())?;
    map_layout(rooms, &layout, config, detector)
}

/// Build the door graph for `layout` and partition it into areas.
///
/// `layout` must cover exactly the rooms of `rooms`; a mismatch is reported
/// as a decode error, like any other malformed placement.
pub fn map_layout<D: CommunityDetector + ?Sized>(
    rooms: &RoomSet,
    layout: &Layout,
    config: &PartitionConfig,
    detector: &D,
) -> Result<Outcome, EpisodeError> {
    if layout.len() != rooms.len() {
        return Err(DecodeError::RoomCount {
            layout: layout.len(),
            rooms: rooms.len(),
        }
        .into());
    }

    let anchor = rooms.anchor();
    if !layout.is_present(anchor) {
        return Err(EpisodeError::AnchorAbsent(anchor));
    }

    let doors = pair_doors(rooms, layout)?;
    let toilet = rooms.toilet();
    let partner = toilet_partner(rooms, layout)?;
    let graph = DoorGraph::build(layout, &doors, toilet, partner);
    log::debug!(
        "door graph: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    let extents = room_extents(rooms, layout);
    let Some(checker) = ValidityChecker::new(
        &graph,
        &extents,
        config.limits(),
        config.num_areas,
        toilet,
        partner,
    ) else {
        // toilet_partner only returns present rooms
        return Err(EpisodeError::ToiletAbsent(toilet));
    };

    let Some(SearchResult {
        labels,
        cost,
        trial,
        trials_run,
    }) = search_partition(&graph, &checker, detector, config)?
    else {
        return Ok(Outcome::Skipped {
            trials: config.trials,
        });
    };

    let anchor_vertex = graph
        .vertex(anchor)
        .ok_or(EpisodeError::AnchorAbsent(anchor))?;
    let labels = normalize_areas(&labels, anchor_vertex, config.num_areas);

    let mut area = vec![None; rooms.len()];
    for (v, &room) in graph.rooms().iter().enumerate() {
        area[room] = Some(labels[v]);
    }

    Ok(Outcome::Mapped {
        record: MapRecord {
            rooms: layout.positions(),
            doors,
            toilet_intersections: vec![partner],
            area,
        },
        stats: SearchStats {
            trial,
            trials_run,
            cost,
        },
    })
}
