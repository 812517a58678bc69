//! Fixed values shared by the decoder, graph builder and partition search.
//!
//! Defaults for [`crate::config::PartitionConfig`] live here so that tests
//! and the batch driver agree on them.

/// Number of integers per step of an encoded placement record: `(room, x, y)`.
pub const STEP_WIDTH: usize = 3;

pub mod defaults {
    /// Number of areas every accepted partition must have.
    pub const NUM_AREAS: usize = 6;
    /// Randomized partitioning attempts per episode.
    pub const TRIALS: u64 = 2000;
    /// Widest allowed area bounding box, in map tiles.
    pub const MAX_AREA_WIDTH: i64 = 58;
    /// Tallest allowed area bounding box, in map tiles.
    pub const MAX_AREA_HEIGHT: i64 = 28;
    pub const TOILET_ROOM: &str = "Toilet";
    /// Room whose area is always relabelled to 0.
    pub const ANCHOR_ROOM: &str = "Landing Site";
}

/// Vertical band scanned below the Toilet's origin, as local row offsets
/// `[start, end)` relative to the Toilet's y position.
pub mod toilet {
    pub const BAND_START: i64 = 2;
    pub const BAND_END: i64 = 8;
}

/// Limits for a single block-model pass.
pub mod blockmodel {
    /// Maximum number of full vertex sweeps before a pass stops.
    pub const MAX_SWEEPS: usize = 64;
}
