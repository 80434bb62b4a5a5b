//! # Grid
//!
//! The tile grid every generation phase works on, plus the cardinal table used
//! by all neighbor scans.
//!
//! Rooms occupy exactly one tile. Two rooms are connected when the shared pair
//! of door flags is set on both sides; the grid only ever sets such pairs
//! together so the symmetry cannot be broken from the outside.

use crate::{config, WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};

/// A tile coordinate on the grid.
///
/// # Examples
///
/// ```
/// use warren::{Direction, Position};
///
/// let pos = Position::new(7, 7);
/// assert_eq!(pos.offset(Direction::North), Position::new(7, 6));
/// assert_eq!(pos.euclidean_distance(Position::new(10, 11)), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position one step away in the given direction.
    pub fn offset(self, direction: Direction) -> Position {
        let delta = direction.to_delta();
        Position::new(self.x + delta.x, self.y + delta.y)
    }
}

/// The four cardinal directions.
///
/// North is the top of the grid (decreasing `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Scan order shared by every neighbor walk. Changing it changes output.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Converts a direction to a position delta.
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::East => Position::new(1, 0),
            Direction::South => Position::new(0, 1),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// The direction pointing back.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// What occupies a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// No room
    Empty,
    /// Plain room placed during growth
    Normal,
    /// The centre room generation grows from
    Start,
    /// Farthest end room from the start
    Boss,
    /// Nearest end room from the start
    Shop,
    /// Locked item room
    Locked,
    /// Hidden room bordering several rooms
    Secret,
    /// Hidden room bordering exactly one normal room
    SuperSecret,
}

impl RoomKind {
    /// Returns `true` for tiles without a room.
    pub fn is_empty(self) -> bool {
        self == RoomKind::Empty
    }

    /// Returns `true` for rooms only reachable through secret doors.
    pub fn is_hidden(self) -> bool {
        matches!(self, RoomKind::Secret | RoomKind::SuperSecret)
    }
}

/// One set of door flags, indexed by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Doors {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Doors {
    /// Whether the door on the given side is open.
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.top,
            Direction::East => self.right,
            Direction::South => self.bottom,
            Direction::West => self.left,
        }
    }

    fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.top = true,
            Direction::East => self.right = true,
            Direction::South => self.bottom = true,
            Direction::West => self.left = true,
        }
    }

    /// Number of open doors.
    pub fn count(&self) -> u8 {
        Direction::ALL.iter().filter(|&&dir| self.has(dir)).count() as u8
    }

    /// Open sides in scan order.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |&dir| self.has(dir))
    }
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Coordinates of this tile
    pub position: Position,
    /// 1-based placement order for grown rooms
    pub region: Option<u32>,
    /// Room occupying the tile
    pub kind: RoomKind,
    /// Regular doors
    pub doors: Doors,
    /// Doors into and out of hidden rooms
    pub secret_doors: Doors,
    /// Number of placed rooms bordering this tile, counted for empty tiles only
    pub secret_chance: u8,
}

impl Tile {
    /// Creates an empty tile at the given position.
    pub fn empty(position: Position) -> Self {
        Self {
            position,
            region: None,
            kind: RoomKind::Empty,
            doors: Doors::default(),
            secret_doors: Doors::default(),
            secret_chance: 0,
        }
    }

    /// Returns `true` if no room occupies this tile.
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Number of regular doors.
    pub fn door_count(&self) -> u8 {
        self.doors.count()
    }

    /// Number of secret doors.
    pub fn secret_door_count(&self) -> u8 {
        self.secret_doors.count()
    }
}

/// Fixed-size grid of tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// Both dimensions must be odd so the start room sits on the exact centre.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::Grid;
    ///
    /// assert!(Grid::new(15, 15).is_ok());
    /// assert!(Grid::new(14, 15).is_err());
    /// ```
    pub fn new(width: u32, height: u32) -> WarrenResult<Self> {
        let size = check_dimensions(width, height)?;

        let mut tiles = Vec::with_capacity(size);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                tiles.push(Tile::empty(Position::new(x, y)));
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The tile the start room is placed on.
    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Checks whether a position lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Gets the tile at a position, if inside the grid.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|index| &self.tiles[index])
    }

    /// Gets a mutable tile at a position, if inside the grid.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |index| &mut self.tiles[index])
    }

    /// Gets the tile at a position, treating out-of-bounds access as a contract violation.
    pub fn tile(&self, pos: Position) -> WarrenResult<&Tile> {
        self.get(pos).ok_or_else(|| out_of_bounds(pos, self))
    }

    fn tile_mut(&mut self, pos: Position) -> WarrenResult<&mut Tile> {
        let index = self.index(pos).ok_or_else(|| out_of_bounds(pos, self))?;
        Ok(&mut self.tiles[index])
    }

    /// Room kind at a position, `None` outside the grid.
    pub fn kind_at(&self, pos: Position) -> Option<RoomKind> {
        self.get(pos).map(|tile| tile.kind)
    }

    /// The in-bounds neighbor in the given direction.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<&Tile> {
        self.get(pos.offset(direction))
    }

    /// Number of sides of `pos` that are not open space.
    ///
    /// Out-of-bounds sides count as bordered. Unlike the door count this ignores
    /// whether the neighboring room is actually connected.
    pub fn bordering_rooms(&self, pos: Position) -> u8 {
        let empty_sides = Direction::ALL
            .iter()
            .filter(|&&dir| {
                self.neighbor(pos, dir)
                    .map(|tile| tile.is_empty())
                    .unwrap_or(false)
            })
            .count() as u8;
        4 - empty_sides
    }

    /// Number of in-bounds neighbors of the given kind.
    pub fn count_neighbors(&self, pos: Position, kind: RoomKind) -> u8 {
        Direction::ALL
            .iter()
            .filter(|&&dir| self.neighbor(pos, dir).map(|tile| tile.kind) == Some(kind))
            .count() as u8
    }

    /// Changes the room kind of a tile.
    pub fn set_kind(&mut self, pos: Position, kind: RoomKind) -> WarrenResult<()> {
        self.tile_mut(pos)?.kind = kind;
        Ok(())
    }

    /// Places a grown room, recording its region.
    pub(crate) fn place_room(
        &mut self,
        pos: Position,
        kind: RoomKind,
        region: u32,
    ) -> WarrenResult<()> {
        let tile = self.tile_mut(pos)?;
        tile.kind = kind;
        tile.region = Some(region);
        Ok(())
    }

    /// Adds one to the secret chance of an empty tile.
    pub(crate) fn bump_secret_chance(&mut self, pos: Position) -> WarrenResult<u8> {
        let tile = self.tile_mut(pos)?;
        tile.secret_chance = tile.secret_chance.saturating_add(1);
        Ok(tile.secret_chance)
    }

    /// Opens a regular door between `pos` and its neighbor, on both sides.
    pub fn connect(&mut self, pos: Position, direction: Direction) -> WarrenResult<()> {
        let other = self.linked_pair(pos, direction)?;
        self.tile_mut(pos)?.doors.open(direction);
        self.tile_mut(other)?.doors.open(direction.opposite());
        Ok(())
    }

    /// Opens a secret door between `pos` and its neighbor, on both sides.
    pub fn connect_secret(&mut self, pos: Position, direction: Direction) -> WarrenResult<()> {
        let other = self.linked_pair(pos, direction)?;
        self.tile_mut(pos)?.secret_doors.open(direction);
        self.tile_mut(other)?.secret_doors.open(direction.opposite());
        Ok(())
    }

    fn linked_pair(&self, pos: Position, direction: Direction) -> WarrenResult<Position> {
        let other = pos.offset(direction);
        if !self.contains(pos) || !self.contains(other) {
            return Err(WarrenError::InvalidArgument(format!(
                "cannot link {:?} towards {:?}: outside the {}x{} grid",
                pos, direction, self.width, self.height
            )));
        }
        Ok(other)
    }
}

/// Validates the odd-size precondition without allocating anything.
///
/// Returns the number of tiles the grid holds.
pub fn check_dimensions(width: u32, height: u32) -> WarrenResult<usize> {
    let valid = |side: u32| (3..=config::MAX_GRID_DIMENSION).contains(&side) && side % 2 == 1;
    if !valid(width) || !valid(height) {
        return Err(WarrenError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(WarrenError::InvalidDimensions { width, height })
}

/// Serialized grid, checked before it becomes a [`Grid`].
#[derive(Deserialize)]
struct RawGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = WarrenError;

    fn try_from(raw: RawGrid) -> WarrenResult<Self> {
        let size = check_dimensions(raw.width, raw.height)?;
        if raw.tiles.len() != size {
            return Err(WarrenError::InvalidState(format!(
                "{} tiles stored for a {}x{} grid",
                raw.tiles.len(),
                raw.width,
                raw.height
            )));
        }

        let grid = Grid {
            width: raw.width,
            height: raw.height,
            tiles: raw.tiles,
        };
        for (index, tile) in grid.tiles.iter().enumerate() {
            if grid.index(tile.position) != Some(index) {
                return Err(WarrenError::InvalidState(format!(
                    "tile {} is stored at {:?}, out of row-major order",
                    index, tile.position
                )));
            }
        }
        Ok(grid)
    }
}

fn out_of_bounds(pos: Position, grid: &Grid) -> WarrenError {
    WarrenError::InvalidArgument(format!(
        "position {:?} is outside the {}x{} grid",
        pos, grid.width, grid.height
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(7, 5).unwrap();
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.tiles().len(), 35);
        assert_eq!(grid.center(), Position::new(3, 2));
        assert!(grid.tiles().iter().all(|tile| tile.is_empty()));
        assert_eq!(grid.tile(Position::new(6, 4)).unwrap().position, Position::new(6, 4));
    }

    #[test]
    fn test_even_dimensions_rejected() {
        assert!(matches!(
            Grid::new(14, 15),
            Err(WarrenError::InvalidDimensions { width: 14, height: 15 })
        ));
        assert!(Grid::new(15, 8).is_err());
        assert!(Grid::new(1, 1).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(matches!(
            check_dimensions(70_001, 70_001),
            Err(WarrenError::InvalidDimensions { width: 70_001, .. })
        ));
        assert!(Grid::new(config::MAX_GRID_DIMENSION + 2, 15).is_err());
        assert!(Grid::new(u32::MAX, u32::MAX).is_err());

        let max = config::MAX_GRID_DIMENSION;
        assert_eq!(check_dimensions(max, 3).unwrap(), max as usize * 3);
    }

    #[test]
    fn test_grid_json_round_trip() {
        let mut grid = Grid::new(5, 3).unwrap();
        grid.connect(grid.center(), Direction::West).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_grid_json_with_missing_tiles_rejected() {
        let grid = Grid::new(5, 3).unwrap();
        let mut value = serde_json::to_value(&grid).unwrap();
        value["tiles"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<Grid>(value).is_err());

        let mut value = serde_json::to_value(&grid).unwrap();
        value["width"] = serde_json::json!(7);
        assert!(serde_json::from_value::<Grid>(value).is_err());
    }

    #[test]
    fn test_grid_json_with_shuffled_tiles_rejected() {
        let grid = Grid::new(3, 3).unwrap();
        let mut value = serde_json::to_value(&grid).unwrap();
        value["tiles"].as_array_mut().unwrap().swap(0, 4);
        assert!(serde_json::from_value::<Grid>(value).is_err());
    }

    #[test]
    fn test_direction_table() {
        for dir in Direction::ALL {
            let delta = dir.to_delta();
            let back = dir.opposite().to_delta();
            assert_eq!(delta.x + back.x, 0);
            assert_eq!(delta.y + back.y, 0);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_bordering_rooms_counts_edges() {
        let mut grid = Grid::new(5, 5).unwrap();

        // Corner: two sides are off the grid
        assert_eq!(grid.bordering_rooms(Position::new(0, 0)), 2);
        assert_eq!(grid.bordering_rooms(Position::new(2, 2)), 0);

        grid.set_kind(Position::new(2, 1), RoomKind::Normal).unwrap();
        grid.set_kind(Position::new(3, 2), RoomKind::Boss).unwrap();
        assert_eq!(grid.bordering_rooms(Position::new(2, 2)), 2);
        assert_eq!(grid.count_neighbors(Position::new(2, 2), RoomKind::Normal), 1);
        assert_eq!(grid.count_neighbors(Position::new(2, 2), RoomKind::Boss), 1);
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut grid = Grid::new(5, 5).unwrap();
        let center = grid.center();

        grid.connect(center, Direction::East).unwrap();
        let a = grid.tile(center).unwrap();
        let b = grid.tile(Position::new(3, 2)).unwrap();
        assert!(a.doors.right);
        assert!(b.doors.left);
        assert_eq!(a.door_count(), 1);
        assert_eq!(b.door_count(), 1);
        assert_eq!(a.secret_door_count(), 0);

        grid.connect_secret(center, Direction::North).unwrap();
        assert!(grid.tile(center).unwrap().secret_doors.top);
        assert!(grid.tile(Position::new(2, 1)).unwrap().secret_doors.bottom);
    }

    #[test]
    fn test_connect_outside_grid_is_rejected() {
        let mut grid = Grid::new(3, 3).unwrap();
        let result = grid.connect(Position::new(0, 0), Direction::West);
        assert!(matches!(result, Err(WarrenError::InvalidArgument(_))));
        assert_eq!(grid.tile(Position::new(0, 0)).unwrap().door_count(), 0);

        assert!(grid.set_kind(Position::new(3, 0), RoomKind::Normal).is_err());
    }

    #[test]
    fn test_doors_directions_follow_scan_order() {
        let doors = Doors {
            top: true,
            right: false,
            bottom: true,
            left: true,
        };
        let dirs: Vec<_> = doors.directions().collect();
        assert_eq!(dirs, vec![Direction::North, Direction::South, Direction::West]);
        assert_eq!(doors.count(), 3);
    }
}
