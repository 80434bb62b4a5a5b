//! # Rendering Module
//!
//! Text rendering of generated grids for terminals, logs and tests.
//!
//! Each tile becomes one glyph; connections are drawn in the gaps between
//! tiles, so a `w x h` grid renders as `(2w - 1) x (2h - 1)` characters.

use crate::generation::{Doors, Grid, RoomKind, RoomSets, Tile};

/// Glyph used for a room kind.
pub fn glyph(kind: RoomKind) -> char {
    match kind {
        RoomKind::Empty => '.',
        RoomKind::Normal => '#',
        RoomKind::Start => 'S',
        RoomKind::Boss => 'B',
        RoomKind::Shop => '$',
        RoomKind::Locked => 'I',
        RoomKind::Secret => '?',
        RoomKind::SuperSecret => '!',
    }
}

/// ASCII renderer for floor grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiRenderer {
    /// Print `secret_chance` on empty tiles instead of `.`
    pub show_chances: bool,
}

impl AsciiRenderer {
    /// Creates a renderer without the chance overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the secret chance overlay.
    pub fn with_chances(mut self, show_chances: bool) -> Self {
        self.show_chances = show_chances;
        self
    }

    /// Renders the grid, one text line per row of the output.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{AsciiRenderer, Grid};
    ///
    /// let grid = Grid::new(3, 3).unwrap();
    /// assert_eq!(AsciiRenderer::new().render(&grid), ". . .\n     \n. . .\n     \n. . .\n");
    /// ```
    pub fn render(&self, grid: &Grid) -> String {
        let width = grid.width() as usize;
        let mut out = String::new();

        for row in grid.tiles().chunks(width) {
            let mut below = String::new();
            for (index, tile) in row.iter().enumerate() {
                out.push(self.tile_glyph(tile));
                below.push(vertical_link(tile));
                if index + 1 < width {
                    out.push(horizontal_link(tile));
                    below.push(' ');
                }
            }
            out.push('\n');

            let last_row = row
                .first()
                .map_or(true, |tile| tile.position.y as u32 + 1 == grid.height());
            if !last_row {
                out.push_str(&below);
                out.push('\n');
            }
        }

        out
    }

    fn tile_glyph(&self, tile: &Tile) -> char {
        if self.show_chances && tile.is_empty() && tile.secret_chance > 0 {
            return char::from_digit(u32::from(tile.secret_chance.min(9)), 10).unwrap_or('9');
        }
        glyph(tile.kind)
    }

    /// Per-list counters for debug output.
    pub fn summary(&self, rooms: &RoomSets) -> String {
        format!(
            "rooms: {}  end rooms: {}  locked: {}  secret candidates: {}  secrets: {}  super candidates: {}",
            rooms.rooms.len(),
            rooms.end_rooms.len(),
            rooms.locked_rooms.len(),
            rooms.secret_candidates.len(),
            rooms.secrets.len(),
            rooms.super_candidates.len()
        )
    }
}

fn horizontal_link(tile: &Tile) -> char {
    if tile.doors.right {
        '-'
    } else if tile.secret_doors.right {
        '~'
    } else {
        ' '
    }
}

fn vertical_link(tile: &Tile) -> char {
    if tile.doors.bottom {
        '|'
    } else if tile.secret_doors.bottom {
        ':'
    } else {
        ' '
    }
}

/// Multi-line description of one tile.
pub fn describe_tile(tile: &Tile) -> String {
    let region = tile
        .region
        .map_or_else(|| "none".to_string(), |region| region.to_string());

    format!(
        "tile ({}, {})\n  kind: {:?}\n  region: {}\n  doors: {}\n  secret doors: {}\n  secret chance: {}\n",
        tile.position.x,
        tile.position.y,
        tile.kind,
        region,
        door_names(&tile.doors),
        door_names(&tile.secret_doors),
        tile.secret_chance
    )
}

fn door_names(doors: &Doors) -> String {
    let names: Vec<&str> = [
        (doors.top, "top"),
        (doors.right, "right"),
        (doors.bottom, "bottom"),
        (doors.left, "left"),
    ]
    .into_iter()
    .filter(|(open, _)| *open)
    .map(|(_, name)| name)
    .collect();

    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_with, Direction, GenerationConfig, Position};

    #[test]
    fn test_glyphs_are_distinct() {
        let kinds = [
            RoomKind::Empty,
            RoomKind::Normal,
            RoomKind::Start,
            RoomKind::Boss,
            RoomKind::Shop,
            RoomKind::Locked,
            RoomKind::Secret,
            RoomKind::SuperSecret,
        ];
        let mut glyphs: Vec<char> = kinds.iter().map(|&kind| glyph(kind)).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), kinds.len());
    }

    #[test]
    fn test_render_draws_doors_between_tiles() {
        let mut grid = Grid::new(3, 3).unwrap();
        let center = grid.center();
        grid.place_room(center, RoomKind::Start, 1).unwrap();
        grid.place_room(Position::new(2, 1), RoomKind::Normal, 2).unwrap();
        grid.connect(center, Direction::East).unwrap();
        grid.set_kind(Position::new(1, 2), RoomKind::Secret).unwrap();
        grid.connect_secret(center, Direction::South).unwrap();

        let rendered = AsciiRenderer::new().render(&grid);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], ". S-#");
        assert_eq!(lines[3], "  :  ");
        assert_eq!(lines[4], ". ? .");
    }

    #[test]
    fn test_chance_overlay_only_on_empty_tiles() {
        let floor = generate_with(&GenerationConfig::for_testing(5)).unwrap();
        let plain = AsciiRenderer::new().render(&floor.grid);
        let overlay = AsciiRenderer::new().with_chances(true).render(&floor.grid);

        assert_eq!(plain.len(), overlay.len());
        assert!(!plain.chars().any(|c| c.is_ascii_digit()));
        assert!(overlay.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(
            plain.matches('S').count(),
            overlay.matches('S').count()
        );
    }

    #[test]
    fn test_summary_lists_counts() {
        let floor = generate_with(&GenerationConfig::for_testing(5)).unwrap();
        let summary = AsciiRenderer::new().summary(&floor.rooms);
        assert!(summary.contains(&format!("rooms: {}", floor.parameters.max_rooms)));
        assert!(summary.contains("secrets: 1"));
    }

    #[test]
    fn test_describe_tile() {
        let mut grid = Grid::new(3, 3).unwrap();
        let center = grid.center();
        grid.place_room(center, RoomKind::Start, 1).unwrap();
        grid.place_room(Position::new(1, 0), RoomKind::Normal, 2).unwrap();
        grid.connect(center, Direction::North).unwrap();

        let text = describe_tile(grid.tile(center).unwrap());
        assert!(text.contains("kind: Start"));
        assert!(text.contains("region: 1"));
        assert!(text.contains("doors: top"));
        assert!(text.contains("secret doors: none"));
        assert!(text.starts_with("tile (1, 1)\n"));
        assert!(text.ends_with("secret chance: 0\n"));

        let empty = describe_tile(grid.tile(Position::new(0, 0)).unwrap());
        assert!(empty.contains("region: none"));
        assert!(empty.contains("\n  doors: none\n"));
    }
}
