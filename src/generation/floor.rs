//! # Floor
//!
//! The finished product of generation: the grid, every room list built along
//! the way and the budgets the winning attempt rolled.

use crate::generation::{Direction, FloorParameters, Grid, Position, RoomKind, RoomSets, Tile};
use crate::{WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};

/// A fully generated floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    /// Seed the floor was generated from
    pub seed: u64,
    /// Attempts used, the successful one included
    pub attempts: u32,
    /// Budgets rolled by the successful attempt
    pub parameters: FloorParameters,
    pub grid: Grid,
    pub rooms: RoomSets,
}

impl Floor {
    /// Position of the start room.
    pub fn start(&self) -> Position {
        self.grid.center()
    }

    /// Position of the boss room.
    pub fn boss(&self) -> Option<Position> {
        self.find(RoomKind::Boss)
    }

    /// Position of the shop.
    pub fn shop(&self) -> Option<Position> {
        self.find(RoomKind::Shop)
    }

    /// Position of the super secret room.
    pub fn super_secret(&self) -> Option<Position> {
        self.find(RoomKind::SuperSecret)
    }

    /// Tile at `pos`.
    pub fn tile(&self, pos: Position) -> WarrenResult<&Tile> {
        self.grid.tile(pos)
    }

    /// Every tile of the given kind, row-major.
    pub fn tiles_of(&self, kind: RoomKind) -> impl Iterator<Item = &Tile> + '_ {
        self.grid.tiles().iter().filter(move |tile| tile.kind == kind)
    }

    /// Number of tiles of the given kind.
    pub fn count(&self, kind: RoomKind) -> usize {
        self.tiles_of(kind).count()
    }

    fn find(&self, kind: RoomKind) -> Option<Position> {
        self.tiles_of(kind).next().map(|tile| tile.position)
    }

    /// Checks the structural guarantees of a generated floor.
    ///
    /// `require_all_item_rooms` additionally demands that every budgeted item
    /// room was locked.
    pub fn check_invariants(&self, require_all_item_rooms: bool) -> WarrenResult<()> {
        let params = &self.parameters;

        for (kind, name) in [
            (RoomKind::Start, "start"),
            (RoomKind::Boss, "boss"),
            (RoomKind::Shop, "shop"),
            (RoomKind::SuperSecret, "super secret"),
        ] {
            let count = self.count(kind);
            if count != 1 {
                return Err(invalid(format!("expected one {} room, found {}", name, count)));
            }
        }

        if self.grid.kind_at(self.start()) != Some(RoomKind::Start) {
            return Err(invalid("start room is not at the grid centre".to_string()));
        }

        if self.rooms.rooms.len() != params.max_rooms as usize {
            return Err(invalid(format!(
                "{} rooms grown, budget was {}",
                self.rooms.rooms.len(),
                params.max_rooms
            )));
        }

        let visible = self
            .grid
            .tiles()
            .iter()
            .filter(|tile| !tile.is_empty() && !tile.kind.is_hidden())
            .count();
        if visible != params.max_rooms as usize {
            return Err(invalid(format!(
                "{} visible rooms on the grid, budget was {}",
                visible, params.max_rooms
            )));
        }

        let locked = self.count(RoomKind::Locked);
        if locked > params.max_item_rooms as usize
            || (require_all_item_rooms && locked != params.max_item_rooms as usize)
        {
            return Err(invalid(format!(
                "{} locked rooms, item budget was {}",
                locked, params.max_item_rooms
            )));
        }

        let secrets = self.count(RoomKind::Secret);
        if secrets != params.max_secrets as usize {
            return Err(invalid(format!(
                "{} secret rooms, expected {}",
                secrets, params.max_secrets
            )));
        }

        for tile in self.grid.tiles() {
            self.check_tile(tile)?;
        }

        Ok(())
    }

    fn check_tile(&self, tile: &Tile) -> WarrenResult<()> {
        let pos = tile.position;

        for direction in Direction::ALL {
            if tile.doors.has(direction) {
                let linked = self
                    .grid
                    .neighbor(pos, direction)
                    .map_or(false, |other| other.doors.has(direction.opposite()));
                if !linked {
                    return Err(invalid(format!("one-sided door at {:?} {:?}", pos, direction)));
                }
            }
            if tile.secret_doors.has(direction) {
                let linked = self
                    .grid
                    .neighbor(pos, direction)
                    .map_or(false, |other| other.secret_doors.has(direction.opposite()));
                if !linked {
                    return Err(invalid(format!(
                        "one-sided secret door at {:?} {:?}",
                        pos, direction
                    )));
                }
            }
        }

        match tile.kind {
            RoomKind::Empty => {
                if tile.door_count() > 0 || tile.secret_door_count() > 0 || tile.region.is_some() {
                    return Err(invalid(format!("empty tile {:?} carries room data", pos)));
                }
            }
            RoomKind::Secret | RoomKind::SuperSecret => {
                if tile.door_count() > 0 || tile.region.is_some() {
                    return Err(invalid(format!("hidden room {:?} has regular doors", pos)));
                }
                if tile.secret_door_count() == 0 {
                    return Err(invalid(format!("hidden room {:?} is unreachable", pos)));
                }
                if tile.kind == RoomKind::SuperSecret {
                    let only_normal = tile.secret_door_count() == 1
                        && tile.secret_doors.directions().all(|dir| {
                            self.grid.neighbor(pos, dir).map(|other| other.kind)
                                == Some(RoomKind::Normal)
                        });
                    if !only_normal {
                        return Err(invalid(format!(
                            "super secret room {:?} must open onto exactly one normal room",
                            pos
                        )));
                    }
                }
            }
            RoomKind::Boss | RoomKind::Shop | RoomKind::Locked => {
                if tile.door_count() != 1 {
                    return Err(invalid(format!(
                        "{:?} room {:?} is not an end room",
                        tile.kind, pos
                    )));
                }
            }
            RoomKind::Normal | RoomKind::Start => {}
        }

        Ok(())
    }
}

fn invalid(message: String) -> WarrenError {
    WarrenError::InvalidState(message)
}
