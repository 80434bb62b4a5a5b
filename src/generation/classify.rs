//! # Classification Phases
//!
//! Turns leaves of the grown room graph into the special rooms of a floor:
//! end-room detection, then boss, shop and locked item rooms in that order.
//!
//! Boss and shop selection scan end rooms in insertion order and compare with
//! `>=` / `<=`, so the last candidate in order wins a distance tie. Output
//! depends on this; do not switch to strict comparisons.

use crate::generation::{Grid, Position, RoomKind, RoomList};
use crate::WarrenResult;
use log::trace;

/// Collects every normal room with exactly one door that touches no other room.
///
/// Returns the number of end rooms found.
pub fn find_end_rooms(grid: &Grid, rooms: &RoomList, end_rooms: &mut RoomList) -> WarrenResult<usize> {
    for pos in rooms.iter() {
        let tile = grid.tile(pos)?;
        if tile.kind != RoomKind::Normal {
            continue;
        }
        if tile.door_count() != 1 {
            continue;
        }
        if grid.bordering_rooms(pos) <= 1 {
            end_rooms.insert(pos);
        }
    }

    trace!("found {} end rooms", end_rooms.len());
    Ok(end_rooms.len())
}

/// Marks the end room farthest from the start as the boss room.
pub fn pick_boss_room(
    grid: &mut Grid,
    end_rooms: &RoomList,
    start: Position,
) -> WarrenResult<Option<Position>> {
    let mut best: Option<(f64, Position)> = None;
    for pos in end_rooms.iter() {
        if grid.tile(pos)?.kind != RoomKind::Normal {
            continue;
        }
        let distance = pos.euclidean_distance(start);
        if best.map_or(true, |(farthest, _)| distance >= farthest) {
            best = Some((distance, pos));
        }
    }

    let boss = best.map(|(_, pos)| pos);
    if let Some(pos) = boss {
        grid.set_kind(pos, RoomKind::Boss)?;
    }
    Ok(boss)
}

/// Marks the remaining end room nearest to the start as the shop.
pub fn pick_shop_room(
    grid: &mut Grid,
    end_rooms: &RoomList,
    start: Position,
) -> WarrenResult<Option<Position>> {
    let mut best: Option<(f64, Position)> = None;
    for pos in end_rooms.iter() {
        if grid.tile(pos)?.kind != RoomKind::Normal {
            continue;
        }
        let distance = pos.euclidean_distance(start);
        if best.map_or(true, |(nearest, _)| distance <= nearest) {
            best = Some((distance, pos));
        }
    }

    let shop = best.map(|(_, pos)| pos);
    if let Some(pos) = shop {
        grid.set_kind(pos, RoomKind::Shop)?;
    }
    Ok(shop)
}

/// Locks remaining normal end rooms, in order, until `max_item_rooms` are locked.
///
/// Returns how many rooms were locked. Falling short is not an error here.
pub fn assign_locked_rooms(
    grid: &mut Grid,
    end_rooms: &RoomList,
    locked_rooms: &mut RoomList,
    max_item_rooms: u32,
) -> WarrenResult<u32> {
    let mut locked = 0;
    for pos in end_rooms.iter() {
        if locked >= max_item_rooms {
            break;
        }
        if grid.tile(pos)?.kind != RoomKind::Normal {
            continue;
        }
        grid.set_kind(pos, RoomKind::Locked)?;
        locked_rooms.insert(pos);
        locked += 1;
    }
    Ok(locked)
}
