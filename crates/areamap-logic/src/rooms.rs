//! Static room and door data.
//!
//! A [`RoomSet`] is loaded once per batch and shared read-only by every
//! episode. Room width and height are derived from the occupancy bitmap, so
//! a room cannot disagree with its own map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::DataError;

/// Which wall of its cell a door sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Up/down doors connect vertically stacked rooms.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Left/up doors are keyed to their own cell; right/down doors to the
    /// cell beyond the room edge.
    pub fn is_entry_side(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSubtype {
    #[default]
    Normal,
    /// Sand transitions only loosely line up with their partner.
    Sand,
}

/// The `(exit_ptr, entrance_ptr)` pair identifying a door in game data.
/// Serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorPtrs(pub u64, pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Cell offset within the room.
    pub x: i64,
    pub y: i64,
    pub direction: Direction,
    #[serde(default)]
    pub subtype: DoorSubtype,
    pub exit_ptr: u64,
    pub entrance_ptr: u64,
}

impl Door {
    pub fn ptrs(&self) -> DoorPtrs {
        DoorPtrs(self.exit_ptr, self.entrance_ptr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Occupancy rows, top to bottom; `1` marks a filled cell.
    pub map: Vec<Vec<u8>>,
    #[serde(default)]
    pub doors: Vec<Door>,
}

impl Room {
    pub fn width(&self) -> usize {
        self.map.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.map.len()
    }

    /// Whether local cell `(x, y)` is filled. Out-of-bounds cells are empty.
    pub fn is_filled(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.map
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .is_some_and(|&cell| cell == 1)
    }

    fn validate(&self, index: usize) -> Result<(), DataError> {
        let width = self.width();
        let height = self.height();
        if width == 0 {
            return Err(DataError::EmptyMap {
                index,
                name: self.name.clone(),
            });
        }
        for (row, cells) in self.map.iter().enumerate() {
            if cells.len() != width {
                return Err(DataError::RaggedMap {
                    index,
                    name: self.name.clone(),
                    row,
                    len: cells.len(),
                    width,
                });
            }
        }
        for door in &self.doors {
            if door.x < 0 || door.y < 0 || door.x >= width as i64 || door.y >= height as i64 {
                return Err(DataError::DoorOutOfBounds {
                    index,
                    name: self.name.clone(),
                    x: door.x,
                    y: door.y,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

/// Immutable room table with the special rooms resolved by name.
#[derive(Debug, Clone)]
pub struct RoomSet {
    rooms: Vec<Room>,
    toilet: usize,
    anchor: usize,
    door_rooms: HashMap<DoorPtrs, usize>,
}

impl RoomSet {
    /// Validate `rooms` and resolve the Toilet and anchor rooms.
    pub fn new(rooms: Vec<Room>, toilet_name: &str, anchor_name: &str) -> Result<Self, DataError> {
        if rooms.is_empty() {
            return Err(DataError::Empty);
        }

        let mut door_rooms = HashMap::new();
        for (index, room) in rooms.iter().enumerate() {
            room.validate(index)?;
            for door in &room.doors {
                if let Some(first) = door_rooms.insert(door.ptrs(), index) {
                    return Err(DataError::DuplicateDoor {
                        exit_ptr: door.exit_ptr,
                        entrance_ptr: door.entrance_ptr,
                        first,
                        second: index,
                    });
                }
            }
        }

        let find = |name: &str| {
            rooms
                .iter()
                .position(|r| r.name == name)
                .ok_or_else(|| DataError::MissingRoom(name.to_string()))
        };
        let toilet = find(toilet_name)?;
        let anchor = find(anchor_name)?;

        Ok(Self {
            rooms,
            toilet,
            anchor,
            door_rooms,
        })
    }

    /// Parse a JSON array of rooms, then validate as [`RoomSet::new`].
    pub fn from_json(json: &str, toilet_name: &str, anchor_name: &str) -> Result<Self, DataError> {
        let rooms: Vec<Room> =
            serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))?;
        Self::new(rooms, toilet_name, anchor_name)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn toilet(&self) -> usize {
        self.toilet
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Room owning the door with these pointers.
    pub fn room_of(&self, ptrs: DoorPtrs) -> Option<usize> {
        self.door_rooms.get(&ptrs).copied()
    }

    /// `#index name`, for diagnostics.
    pub fn label(&self, index: usize) -> String {
        match self.rooms.get(index) {
            Some(room) => format!("#{} {}", index, room.name),
            None => format!("#{}", index),
        }
    }
}
