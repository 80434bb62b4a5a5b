//! Room shapes derived from door layouts, for hosts that pick room templates.

use crate::generation::{Direction, Doors, RoomKind, Tile};
use serde::{Deserialize, Serialize};

/// Axis of a straight corridor room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Doors north and south
    Vertical,
    /// Doors east and west
    Horizontal,
}

/// Layout of a room's doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomShape {
    /// No doors
    Sealed,
    /// One door, on the given side
    DeadEnd(Direction),
    /// Two doors on adjacent sides, in scan order
    Corner(Direction, Direction),
    /// Two doors on opposite sides
    Straight(Axis),
    /// Three doors; holds the closed side
    Junction(Direction),
    /// Doors on all four sides
    Cross,
}

impl RoomShape {
    /// Classifies a set of door flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{Direction, Doors, RoomShape};
    ///
    /// let doors = Doors { top: true, right: false, bottom: true, left: true };
    /// assert_eq!(RoomShape::from_doors(&doors), RoomShape::Junction(Direction::East));
    /// ```
    pub fn from_doors(doors: &Doors) -> Self {
        let open: Vec<Direction> = doors.directions().collect();
        match open.as_slice() {
            [] => RoomShape::Sealed,
            [only] => RoomShape::DeadEnd(*only),
            [a, b] if b.opposite() == *a => match a {
                Direction::North | Direction::South => RoomShape::Straight(Axis::Vertical),
                Direction::East | Direction::West => RoomShape::Straight(Axis::Horizontal),
            },
            [a, b] => RoomShape::Corner(*a, *b),
            [_, _, _] => Direction::ALL
                .into_iter()
                .find(|dir| !doors.has(*dir))
                .map_or(RoomShape::Cross, RoomShape::Junction),
            _ => RoomShape::Cross,
        }
    }

    /// Number of doors the shape has.
    pub fn door_count(self) -> u8 {
        match self {
            RoomShape::Sealed => 0,
            RoomShape::DeadEnd(_) => 1,
            RoomShape::Corner(..) | RoomShape::Straight(_) => 2,
            RoomShape::Junction(_) => 3,
            RoomShape::Cross => 4,
        }
    }
}

impl Tile {
    /// Shape formed by the regular doors.
    pub fn shape(&self) -> RoomShape {
        RoomShape::from_doors(&self.doors)
    }

    /// Shape formed by the secret doors.
    pub fn secret_shape(&self) -> RoomShape {
        RoomShape::from_doors(&self.secret_doors)
    }

    /// Whether this tile is only reachable through secret doors.
    pub fn hidden(&self) -> bool {
        self.kind.is_hidden()
    }

    /// Whether a host should draw this tile as a room.
    pub fn is_room(&self) -> bool {
        self.kind != RoomKind::Empty
    }
}
