//! # Secret Phases
//!
//! Hidden rooms are carved from empty tiles that border the room graph.
//!
//! 1. Every placed room except the start and the boss raises the
//!    `secret_chance` of each empty neighbor by one. Empty tiles next to a
//!    normal room and away from the boss become secret candidates.
//! 2. Candidates are promoted greedily, highest chance first, under a fixed
//!    step budget (the lifespan).
//! 3. Candidates touching exactly one room, a normal one, are eligible for the
//!    single super secret room, picked uniformly at random.
//!
//! Hidden rooms connect through secret doors only. The regular door flags of
//! the floor are never touched here.

use crate::generation::{Direction, FloorRng, Grid, Position, RoomKind, RoomList};
use crate::WarrenResult;
use log::trace;
use rand::Rng;

/// Accumulates secret chances around placed rooms and collects candidates.
///
/// A tile keeps counting after it became a candidate; candidacy is decided by
/// coordinate, once.
pub fn compute_secret_chances(
    grid: &mut Grid,
    rooms: &RoomList,
    candidates: &mut RoomList,
) -> WarrenResult<usize> {
    for pos in rooms.iter() {
        let kind = grid.tile(pos)?.kind;
        if matches!(kind, RoomKind::Start | RoomKind::Boss) {
            continue;
        }

        for direction in Direction::ALL {
            let neighbor = pos.offset(direction);
            if grid.kind_at(neighbor) != Some(RoomKind::Empty) {
                continue;
            }
            let chance = grid.bump_secret_chance(neighbor)?;
            if chance > 0 && is_secret_candidate(grid, neighbor, candidates) {
                candidates.insert(neighbor);
            }
        }
    }

    trace!("{} secret candidates", candidates.len());
    Ok(candidates.len())
}

fn is_secret_candidate(grid: &Grid, pos: Position, candidates: &RoomList) -> bool {
    grid.count_neighbors(pos, RoomKind::Normal) >= 1
        && grid.count_neighbors(pos, RoomKind::Boss) == 0
        && !candidates.contains(pos)
}

/// Promotes up to `max_secrets` candidates to secret rooms.
///
/// Each step takes the candidate with the highest chance, the last one in
/// order on a tie. At most `lifespan` steps are taken. Accepted rooms are then
/// linked by secret doors to every neighboring visible room except the boss.
pub fn select_secret_rooms(
    grid: &mut Grid,
    candidates: &RoomList,
    secrets: &mut RoomList,
    max_secrets: u32,
    lifespan: u32,
) -> WarrenResult<usize> {
    let mut remaining = lifespan;
    while secrets.len() < max_secrets as usize && remaining > 0 {
        remaining -= 1;

        let mut best: Option<(u8, Position)> = None;
        for pos in candidates.iter() {
            if secrets.contains(pos) {
                continue;
            }
            let tile = grid.tile(pos)?;
            if !tile.is_empty() {
                continue;
            }
            if best.map_or(true, |(highest, _)| tile.secret_chance >= highest) {
                best = Some((tile.secret_chance, pos));
            }
        }

        match best {
            Some((_, pos)) => {
                secrets.insert(pos);
            }
            None => break,
        }
    }

    for pos in secrets.iter() {
        grid.set_kind(pos, RoomKind::Secret)?;
        for direction in Direction::ALL {
            let accepts_door = grid
                .neighbor(pos, direction)
                .map(|tile| accepts_secret_door(tile.kind))
                .unwrap_or(false);
            if accepts_door {
                grid.connect_secret(pos, direction)?;
            }
        }
    }

    trace!("accepted {} of {} secret rooms", secrets.len(), max_secrets);
    Ok(secrets.len())
}

/// Visible rooms a secret room may open onto.
fn accepts_secret_door(kind: RoomKind) -> bool {
    !matches!(
        kind,
        RoomKind::Empty | RoomKind::Boss | RoomKind::Secret | RoomKind::SuperSecret
    )
}

/// Filters secret candidates down to the tiles that can host the super secret room.
pub fn find_super_candidates(
    grid: &Grid,
    candidates: &RoomList,
    super_candidates: &mut RoomList,
) -> WarrenResult<usize> {
    for pos in candidates.iter() {
        let tile = grid.tile(pos)?;
        if !tile.is_empty() || tile.secret_chance != 1 {
            continue;
        }
        if grid.bordering_rooms(pos) > 1 {
            continue;
        }
        if grid.count_neighbors(pos, RoomKind::Normal) == 0 {
            continue;
        }
        super_candidates.insert(pos);
    }
    Ok(super_candidates.len())
}

/// Picks one super secret candidate at random and links it to its normal neighbor.
pub fn place_super_secret(
    grid: &mut Grid,
    super_candidates: &RoomList,
    rng: &mut FloorRng,
) -> WarrenResult<Option<Position>> {
    if super_candidates.is_empty() {
        return Ok(None);
    }

    let index = rng.gen_range(0..super_candidates.len());
    let Some(pos) = super_candidates.get(index) else {
        return Ok(None);
    };

    grid.set_kind(pos, RoomKind::SuperSecret)?;
    for direction in Direction::ALL {
        if grid.neighbor(pos, direction).map(|tile| tile.kind) == Some(RoomKind::Normal) {
            grid.connect_secret(pos, direction)?;
        }
    }
    Ok(Some(pos))
}
