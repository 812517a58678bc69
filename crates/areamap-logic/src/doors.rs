//! Door pairing and the Toilet overlap rule.
//!
//! Every door of a placed room is keyed to an absolute boundary cell. Right
//! and down doors sit on the far edge of their cell, so they are keyed one
//! cell further along; that makes two facing doors land on the same key.
//! Every key must collect exactly two opposite-facing doors.
//!
//! The Toilet's doors pair like any other room's. On top of that it gets one
//! non-door link to whichever room it overlaps in a short vertical band
//! below its origin.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::toilet;
use crate::error::EpisodeError;
use crate::layout::Layout;
use crate::rooms::{Direction, Door, DoorPtrs, DoorSubtype, RoomSet};

/// Absolute boundary cell a door is keyed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorKey {
    pub x: i64,
    pub y: i64,
    pub vertical: bool,
}

impl DoorKey {
    /// Key for `door` in a room whose origin is `(room_x, room_y)`.
    pub fn of(door: &Door, room_x: i64, room_y: i64) -> Self {
        let mut x = room_x + door.x;
        let mut y = room_y + door.y;
        match door.direction {
            Direction::Right => x += 1,
            Direction::Down => y += 1,
            _ => {}
        }
        Self {
            x,
            y,
            vertical: door.direction.is_vertical(),
        }
    }
}

impl fmt::Display for DoorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = if self.vertical { "vertical" } else { "horizontal" };
        write!(f, "({}, {}, {})", self.x, self.y, axis)
    }
}

/// Two doors joined at one boundary cell.
///
/// `entry` is the left/up-facing door. `strict` is false when either door is
/// a sand transition; the looser sand geometry is accepted as-is here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorPair {
    pub entry: DoorPtrs,
    pub other: DoorPtrs,
    pub strict: bool,
    pub entry_room: usize,
    pub other_room: usize,
}

impl Serialize for DoorPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.entry, self.other, self.strict).serialize(serializer)
    }
}

/// Pair every door of every present room.
///
/// Pairs come out ordered by key. Any key with a count other than two, or
/// with two doors that do not face each other, fails the episode.
pub fn pair_doors(rooms: &RoomSet, layout: &Layout) -> Result<Vec<DoorPair>, EpisodeError> {
    let mut by_key: BTreeMap<DoorKey, Vec<(usize, &Door)>> = BTreeMap::new();
    for (index, room) in rooms.rooms().iter().enumerate() {
        let Some((room_x, room_y)) = layout.placed(index) else {
            continue;
        };
        for door in &room.doors {
            by_key
                .entry(DoorKey::of(door, room_x, room_y))
                .or_default()
                .push((index, door));
        }
    }

    let mut pairs = Vec::with_capacity(by_key.len());
    for (key, doors) in by_key {
        let names = || doors.iter().map(|(i, _)| rooms.label(*i)).collect::<Vec<_>>();
        if doors.len() != 2 {
            return Err(EpisodeError::DoorMismatch {
                key,
                count: doors.len(),
                rooms: names(),
            });
        }
        let (mut a, mut b) = (doors[0], doors[1]);
        if a.1.direction.opposite() != b.1.direction {
            return Err(EpisodeError::DoorFacing {
                key,
                rooms: names(),
            });
        }
        if !a.1.direction.is_entry_side() {
            std::mem::swap(&mut a, &mut b);
        }
        pairs.push(DoorPair {
            entry: a.1.ptrs(),
            other: b.1.ptrs(),
            strict: a.1.subtype != DoorSubtype::Sand && b.1.subtype != DoorSubtype::Sand,
            entry_room: a.0,
            other_room: b.0,
        });
    }
    Ok(pairs)
}

/// Every present room with a filled cell in the Toilet's band.
pub fn toilet_intersections(rooms: &RoomSet, layout: &Layout) -> Result<Vec<usize>, EpisodeError> {
    let toilet_idx = rooms.toilet();
    let (toilet_x, toilet_y) = layout
        .placed(toilet_idx)
        .ok_or(EpisodeError::ToiletAbsent(toilet_idx))?;

    let mut found = Vec::new();
    for (index, room) in rooms.rooms().iter().enumerate() {
        if index == toilet_idx {
            continue;
        }
        let Some((room_x, room_y)) = layout.placed(index) else {
            continue;
        };
        let rel_x = toilet_x - room_x;
        if rel_x < 0 || rel_x >= room.width() as i64 {
            continue;
        }
        let rel_y = toilet_y - room_y;
        let mut band = rel_y + toilet::BAND_START..rel_y + toilet::BAND_END;
        if band.any(|y| room.is_filled(rel_x, y)) {
            found.push(index);
        }
    }
    Ok(found)
}

/// The one room the Toilet overlaps.
pub fn toilet_partner(rooms: &RoomSet, layout: &Layout) -> Result<usize, EpisodeError> {
    let found = toilet_intersections(rooms, layout)?;
    match found.as_slice() {
        [only] => Ok(*only),
        _ => Err(EpisodeError::ToiletIntersections { found }),
    }
}
