//! Room layout decoding.
//!
//! An encoded placement record is the flat action sequence the placement
//! environment emitted: one `(room_index, x, y)` triple per step. Index
//! `room_count` is the environment's no-op room and places nothing. The step
//! budget equals the number of room slots, so trailing steps past it are
//! ignored, exactly as the environment ignored them.

use serde::{Deserialize, Serialize};

use crate::constants::STEP_WIDTH;
use crate::error::DecodeError;

/// Absolute origin of one room for one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub x: i64,
    pub y: i64,
    /// Absent rooms keep a defined `(0, 0)` origin that must not be used.
    pub present: bool,
}

/// Per-room placement for one episode, index-aligned with the room table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rooms: Vec<PlacedRoom>,
}

impl Layout {
    /// Decode `record` for a table of `room_count` rooms.
    pub fn decode(record: &[i64], room_count: usize) -> Result<Self, DecodeError> {
        if record.len() % STEP_WIDTH != 0 {
            return Err(DecodeError::Length {
                len: record.len(),
                width: STEP_WIDTH,
            });
        }

        let mut rooms = vec![PlacedRoom::default(); room_count];
        let mut placed_at: Vec<Option<usize>> = vec![None; room_count];

        for (step, chunk) in record
            .chunks_exact(STEP_WIDTH)
            .take(room_count + 1)
            .enumerate()
        {
            let (room, x, y) = (chunk[0], chunk[1], chunk[2]);
            if room < 0 || room as usize > room_count {
                return Err(DecodeError::RoomIndex {
                    step,
                    room,
                    room_count,
                });
            }
            let room = room as usize;
            if room == room_count {
                continue;
            }
            if let Some(first) = placed_at[room] {
                return Err(DecodeError::DuplicatePlacement { step, room, first });
            }
            placed_at[room] = Some(step);
            rooms[room] = PlacedRoom {
                x,
                y,
                present: true,
            };
        }

        Ok(Self { rooms })
    }

    /// A layout with every room present at the given origins.
    pub fn from_positions(positions: &[(i64, i64)]) -> Self {
        Self {
            rooms: positions
                .iter()
                .map(|&(x, y)| PlacedRoom {
                    x,
                    y,
                    present: true,
                })
                .collect(),
        }
    }

    pub fn from_rooms(rooms: Vec<PlacedRoom>) -> Self {
        Self { rooms }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PlacedRoom> {
        self.rooms.get(index).copied()
    }

    /// Origin of a present room; `None` for absent or unknown rooms.
    pub fn placed(&self, index: usize) -> Option<(i64, i64)> {
        self.get(index).filter(|r| r.present).map(|r| (r.x, r.y))
    }

    pub fn is_present(&self, index: usize) -> bool {
        self.placed(index).is_some()
    }

    /// Indices of present rooms in ascending order.
    pub fn present_indices(&self) -> Vec<usize> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.present)
            .map(|(i, _)| i)
            .collect()
    }

    /// `[x, y]` for every room, absent rooms included.
    pub fn positions(&self) -> Vec<[i64; 2]> {
        self.rooms.iter().map(|r| [r.x, r.y]).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.rooms.iter()
    }
}
