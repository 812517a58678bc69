//! Error types for the map pipeline.
//!
//! Errors split by blast radius: [`DataError`], [`DecodeError`] and
//! [`ConfigError`] mean the upstream contract is broken and the whole batch
//! stops; [`EpisodeError`] aborts a single episode and the batch moves on.
//! A decode failure reached through [`EpisodeError::Decode`] keeps its
//! batch-wide meaning; see [`EpisodeError::is_batch_fatal`].

use thiserror::Error;

use crate::doors::DoorKey;

/// Problems with the static room table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("room table is empty")]
    Empty,

    #[error("room #{index} ({name}) has an empty occupancy map")]
    EmptyMap { index: usize, name: String },

    #[error("room #{index} ({name}): map row {row} has {len} cells, expected {width}")]
    RaggedMap {
        index: usize,
        name: String,
        row: usize,
        len: usize,
        width: usize,
    },

    #[error("room #{index} ({name}): door at ({x},{y}) lies outside the {width}x{height} room")]
    DoorOutOfBounds {
        index: usize,
        name: String,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error(
        "door pointers ({exit_ptr:#x}, {entrance_ptr:#x}) appear in rooms #{first} and #{second}"
    )]
    DuplicateDoor {
        exit_ptr: u64,
        entrance_ptr: u64,
        first: usize,
        second: usize,
    },

    #[error("no room named {0:?}")]
    MissingRoom(String),

    #[error("failed to parse room table: {0}")]
    Parse(String),
}

/// A malformed encoded placement record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record length {len} is not a multiple of the step width {width}")]
    Length { len: usize, width: usize },

    #[error("step {step}: room index {room} out of range for {room_count} rooms")]
    RoomIndex {
        step: usize,
        room: i64,
        room_count: usize,
    },

    #[error("step {step}: room #{room} was already placed at step {first}")]
    DuplicatePlacement {
        step: usize,
        room: usize,
        first: usize,
    },

    #[error("layout covers {layout} rooms but the room table has {rooms}")]
    RoomCount { layout: usize, rooms: usize },
}

/// Invalid partition settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("num_areas must be at least 1")]
    NoAreas,

    #[error("trials must be at least 1")]
    NoTrials,

    #[error("area limits must be positive (got {width}x{height})")]
    Limits { width: i64, height: i64 },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Failure inside a community-detection pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectorError {
    #[error("block count must be positive")]
    ZeroBlocks,

    #[error("cannot split {vertices} vertices into {blocks} non-empty blocks")]
    TooFewVertices { vertices: usize, blocks: usize },

    #[error("seed {seed}: proposal labels {len} vertices, graph has {vertices}")]
    ProposalLength {
        seed: u64,
        len: usize,
        vertices: usize,
    },

    #[error("seed {seed}: proposal uses block {label}, only {blocks} requested")]
    ProposalLabel {
        seed: u64,
        label: usize,
        blocks: usize,
    },
}

/// Fatal for one episode only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpisodeError {
    #[error("door key {key} groups {count} doors (rooms: {})", rooms.join(", "))]
    DoorMismatch {
        key: DoorKey,
        count: usize,
        rooms: Vec<String>,
    },

    #[error("doors at key {key} do not face each other (rooms: {})", rooms.join(", "))]
    DoorFacing { key: DoorKey, rooms: Vec<String> },

    #[error("toilet intersects {} rooms {found:?}, expected exactly one", found.len())]
    ToiletIntersections { found: Vec<usize> },

    #[error("toilet room #{0} is not placed")]
    ToiletAbsent(usize),

    #[error("anchor room #{0} is not placed")]
    AnchorAbsent(usize),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl EpisodeError {
    /// Whether this error means the input contract is broken, so no later
    /// episode can be trusted either.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
