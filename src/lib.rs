//! # Warren
//!
//! Procedural floor-plan generation for room-grid dungeons.
//!
//! ## Architecture Overview
//!
//! A floor is a fixed-size grid of single-cell rooms linked by doors. Generation
//! runs as a sequence of phases over one owned [`Grid`]:
//!
//! - **Growth**: breadth-first expansion from the centre tile places normal rooms
//! - **Classification**: leaves of the room graph become boss, shop and item rooms
//! - **Secrets**: empty tiles bordering the graph are ranked and promoted to
//!   secret rooms plus exactly one super secret room
//!
//! Every phase has a postcondition. When one fails the whole attempt is thrown
//! away and generation restarts from an empty grid, up to a configurable
//! attempt bound. Callers only ever see a fully validated [`Floor`] or an error.
//!
//! ```
//! use warren::{generate, RoomKind};
//!
//! let floor = generate(0, 12345).unwrap();
//! assert_eq!(floor.count(RoomKind::Start), 1);
//! assert_eq!(floor.count(RoomKind::SuperSecret), 1);
//! ```

pub mod generation;
pub mod rendering;

pub use generation::*;
pub use rendering::*;


/// Core error type for the Warren generator.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Grid dimensions violate the odd-size precondition
    #[error("Invalid grid dimensions {width}x{height}: both must be odd and between 3 and {max}", max = config::MAX_GRID_DIMENSION)]
    InvalidDimensions { width: u32, height: u32 },

    /// A caller broke an API contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A produced floor does not satisfy its invariants
    #[error("Invalid floor state: {0}")]
    InvalidState(String),

    /// Every attempt up to the bound failed a phase postcondition
    #[error("Generation failed after {attempts} attempts (last failure: {last_failure})")]
    GenerationFailed {
        attempts: u32,
        last_failure: PhaseFailure,
    },
}

/// Result type used throughout the Warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation configuration constants.
pub mod config {
    /// Default grid width in tiles
    pub const DEFAULT_GRID_WIDTH: u32 = 15;

    /// Default grid height in tiles
    pub const DEFAULT_GRID_HEIGHT: u32 = 15;

    /// Largest accepted grid width or height
    pub const MAX_GRID_DIMENSION: u32 = 255;

    /// Difficulty values above this are clamped
    pub const MAX_DIFFICULTY: u32 = 10;

    /// Default bound on full restarts before giving up
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

    /// Default step budget for secret room selection
    pub const DEFAULT_SECRET_LIFESPAN: u32 = 64;

    /// Rooms always placed on top of the per-difficulty rooms (start included)
    pub const BASE_ROOMS: u32 = 4;

    /// Extra rooms per difficulty step
    pub const ROOMS_PER_DIFFICULTY: u32 = 2;

    /// Upper bound (inclusive) of the random room jitter
    pub const MAX_ROOM_JITTER: u32 = 2;

    /// Chance that an otherwise valid neighbor is grown into a room
    pub const GROWTH_CHANCE: f64 = 0.5;
}
