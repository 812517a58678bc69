//! Pure map logic for areamap.
//!
//! Takes a room table and one encoded placement of those rooms, rebuilds
//! which doors connect which rooms, and splits the resulting graph into a
//! fixed number of connected, size-bounded areas. Nothing here touches the
//! filesystem; the `areamap-gen` binary owns all I/O.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`blockmodel`] | Degree-corrected block model detector and its description length |
//! | [`config`] | Partition settings and search policy |
//! | [`constants`] | Defaults, record width, Toilet band, sweep cap |
//! | [`doors`] | Door keys, door pairing, Toilet overlap rule |
//! | [`episode`] | Single-episode pipeline producing a [`episode::MapRecord`] |
//! | [`error`] | Data, decode, config, detector and episode errors |
//! | [`graph`] | Room adjacency multigraph with induced connectivity |
//! | [`layout`] | Decoding of `(room, x, y)` placement records |
//! | [`normalize`] | Relabelling so the anchor room is area 0 |
//! | [`rooms`] | Room table: maps, doors, special-room lookup |
//! | [`search`] | Budgeted, seeded partition search |
//! | [`validity`] | Connectivity, bounding-box and Toilet checks |

pub mod blockmodel;
pub mod config;
pub mod constants;
pub mod doors;
pub mod episode;
pub mod error;
pub mod graph;
pub mod layout;
pub mod normalize;
pub mod rooms;
pub mod search;
pub mod validity;
