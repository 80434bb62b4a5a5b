//! # Generation Module
//!
//! Procedural floor generation: grid model, room growth, room classification,
//! secret rooms and the restart-on-failure controller that ties them together.
//!
//! Generation is deterministic for a given [`GenerationConfig`]: one seeded
//! stream feeds every random decision in a fixed order, across restarts.

pub mod classify;
pub mod controller;
pub mod floor;
pub mod grid;
pub mod growth;
pub mod parameters;
pub mod room_sets;
pub mod secrets;
pub mod shape;

pub use controller::*;
pub use floor::*;
pub use grid::*;
pub use parameters::*;
pub use room_sets::*;
pub use shape::*;

use crate::{config, WarrenError, WarrenResult};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The random stream every generation attempt draws from.
pub type FloorRng = ChaCha8Rng;

/// Configuration for floor generation.
///
/// Controls grid size, difficulty and the bounds that keep generation
/// reproducible and finite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles, must be odd
    pub width: u32,
    /// Grid height in tiles, must be odd
    pub height: u32,
    /// Level difficulty, clamped to `config::MAX_DIFFICULTY`
    pub difficulty: u32,
    /// Full restarts allowed before giving up
    pub max_attempts: u32,
    /// Step budget of the secret room selection
    pub secret_lifespan: u32,
    /// Treat a short locked-room count as a phase failure.
    ///
    /// A safeguard only: the end-room guard already reserves one end room per
    /// item room, so the locked count cannot fall short after it passes.
    pub require_all_item_rooms: bool,
    /// Report phase progress to the attached observer
    pub visualize: bool,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.width % 2, 1);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_GRID_WIDTH,
            height: config::DEFAULT_GRID_HEIGHT,
            difficulty: 1,
            max_attempts: config::DEFAULT_MAX_ATTEMPTS,
            secret_lifespan: config::DEFAULT_SECRET_LIFESPAN,
            require_all_item_rooms: false,
            visualize: false,
        }
    }

    /// Creates a configuration for testing with the easiest floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            difficulty: 0,
            ..Self::new(seed)
        }
    }

    /// Returns a copy with the given difficulty.
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Returns a copy with the given grid size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Checks every precondition before any tile is touched.
    pub fn validate(&self) -> WarrenResult<()> {
        check_dimensions(self.width, self.height)?;

        if self.max_attempts == 0 {
            return Err(WarrenError::InvalidArgument(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.secret_lifespan == 0 {
            return Err(WarrenError::InvalidArgument(
                "secret_lifespan must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Generators produce content from a configuration and a caller-owned random
/// stream, and can re-check content they (or anyone else) produced.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut FloorRng) -> WarrenResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> WarrenResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates a floor on the default grid.
///
/// Deterministic for a given `(level_difficulty, seed)`.
///
/// # Examples
///
/// ```
/// use warren::generate;
///
/// let a = generate(2, 99).unwrap();
/// let b = generate(2, 99).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate(level_difficulty: u32, seed: u64) -> WarrenResult<Floor> {
    let config = GenerationConfig::new(seed).with_difficulty(level_difficulty);
    generate_with(&config)
}

/// Generates a floor from a full configuration.
pub fn generate_with(config: &GenerationConfig) -> WarrenResult<Floor> {
    let mut rng = utils::create_rng(config);
    FloorGenerator::new().generate(config, &mut rng)
}

/// Utility functions for generation.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> FloorRng {
        rng_from_seed(config.seed)
    }

    /// Creates a seeded random number generator.
    pub fn rng_from_seed(seed: u64) -> FloorRng {
        FloorRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.width, config::DEFAULT_GRID_WIDTH);
        assert_eq!(config.height, config::DEFAULT_GRID_HEIGHT);
        assert!(!config.visualize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let even = GenerationConfig::new(1).with_size(14, 15);
        assert!(matches!(
            even.validate(),
            Err(WarrenError::InvalidDimensions { .. })
        ));

        let huge = GenerationConfig::new(1).with_size(70_001, 70_001);
        assert!(matches!(
            huge.validate(),
            Err(WarrenError::InvalidDimensions { .. })
        ));

        let no_attempts = GenerationConfig {
            max_attempts: 0,
            ..GenerationConfig::new(1)
        };
        assert!(matches!(
            no_attempts.validate(),
            Err(WarrenError::InvalidArgument(_))
        ));

        let no_lifespan = GenerationConfig {
            secret_lifespan: 0,
            ..GenerationConfig::new(1)
        };
        assert!(no_lifespan.validate().is_err());
    }

    #[test]
    fn test_config_missing_fields_fall_back_to_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{ "seed": 5, "difficulty": 3 }"#).unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.difficulty, 3);
        assert_eq!(config.max_attempts, config::DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_utils_rng_creation() {
        use rand::RngCore;

        let config = GenerationConfig::new(12345);
        let mut a = utils::create_rng(&config);
        let mut b = utils::rng_from_seed(12345);
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
