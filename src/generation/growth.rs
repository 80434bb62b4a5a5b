//! # Growth Phase
//!
//! Breadth-first expansion from the centre tile. Every placed room is visited in
//! placement order and may sprout a normal room on each side, subject to a
//! coin flip and to the new room touching nothing but its parent.

use crate::config;
use crate::generation::{Direction, FloorRng, Grid, Position, RoomKind, RoomList};
use crate::WarrenResult;
use log::trace;
use rand::Rng;

/// Places the start room and grows normal rooms until the queue runs dry.
///
/// Returns the number of rooms placed, start included. The caller decides
/// whether that count is acceptable; growth itself never fails.
pub fn grow_rooms(
    grid: &mut Grid,
    rooms: &mut RoomList,
    max_rooms: u32,
    rng: &mut FloorRng,
) -> WarrenResult<u32> {
    let start = grid.center();
    grid.place_room(start, RoomKind::Start, 1)?;
    rooms.insert(start);

    let mut cursor = 0;
    while let Some(current) = rooms.get(cursor) {
        for direction in Direction::ALL {
            let candidate = current.offset(direction);
            if !accepts_room(grid, candidate, rooms.len() as u32, max_rooms, rng) {
                continue;
            }

            let region = rooms.len() as u32 + 1;
            grid.place_room(candidate, RoomKind::Normal, region)?;
            grid.connect(current, direction)?;
            rooms.insert(candidate);
        }
        cursor += 1;
    }

    trace!("growth placed {} of {} rooms", rooms.len(), max_rooms);
    Ok(rooms.len() as u32)
}

/// Decides whether `pos` becomes a new room.
///
/// The coin flip is drawn last so rejected tiles never consume randomness.
fn accepts_room(
    grid: &Grid,
    pos: Position,
    placed: u32,
    max_rooms: u32,
    rng: &mut FloorRng,
) -> bool {
    match grid.kind_at(pos) {
        Some(RoomKind::Empty) => {}
        _ => return false,
    }

    if grid.bordering_rooms(pos) > 1 {
        return false;
    }

    if placed >= max_rooms {
        return false;
    }

    rng.gen_bool(config::GROWTH_CHANCE)
}
