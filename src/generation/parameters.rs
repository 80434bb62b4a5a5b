//! Per-attempt room budgets derived from difficulty and the random stream.

use crate::config;
use crate::generation::FloorRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Room budgets rolled at the start of every generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorParameters {
    /// Difficulty after clamping
    pub difficulty: u32,
    /// Exact number of rooms the growth phase must place, start included
    pub max_rooms: u32,
    /// Exact number of secret rooms
    pub max_secrets: u32,
    /// Upper bound on locked item rooms
    pub max_item_rooms: u32,
}

impl FloorParameters {
    /// Rolls the budgets for one attempt.
    ///
    /// Draw order is fixed: room jitter, then secrets, then item rooms. At
    /// difficulty 0 the secret and item counts are both 1 and consume no draws.
    pub fn roll(difficulty: u32, rng: &mut FloorRng) -> Self {
        let difficulty = difficulty.min(config::MAX_DIFFICULTY);

        let jitter = rng.gen_range(0..=config::MAX_ROOM_JITTER);
        let max_rooms = jitter + config::BASE_ROOMS + config::ROOMS_PER_DIFFICULTY * difficulty;

        let (max_secrets, max_item_rooms) = if difficulty == 0 {
            (1, 1)
        } else {
            let secrets = 1 + rng.gen_range(0..=1);
            let items = 1 + rng.gen_range(0..=difficulty / 4);
            (secrets, items)
        };

        Self {
            difficulty,
            max_rooms,
            max_secrets,
            max_item_rooms,
        }
    }

    /// End rooms needed to host the boss, the shop and every item room.
    pub fn required_end_rooms(&self) -> usize {
        2 + self.max_item_rooms as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_difficulty_zero_has_single_secret_and_item_room() {
        for seed in 0..50 {
            let mut rng = FloorRng::seed_from_u64(seed);
            let params = FloorParameters::roll(0, &mut rng);
            assert_eq!(params.max_secrets, 1);
            assert_eq!(params.max_item_rooms, 1);
            assert!((4..=6).contains(&params.max_rooms));
            assert_eq!(params.required_end_rooms(), 3);
        }
    }

    #[test]
    fn test_difficulty_is_clamped() {
        let mut rng = FloorRng::seed_from_u64(9);
        let params = FloorParameters::roll(250, &mut rng);
        assert_eq!(params.difficulty, config::MAX_DIFFICULTY);
        assert!(params.max_rooms >= 24 && params.max_rooms <= 26);
        assert!((1..=2).contains(&params.max_secrets));
        assert!((1..=3).contains(&params.max_item_rooms));
    }

    #[test]
    fn test_same_seed_rolls_same_parameters() {
        let mut a = FloorRng::seed_from_u64(77);
        let mut b = FloorRng::seed_from_u64(77);
        assert_eq!(
            FloorParameters::roll(6, &mut a),
            FloorParameters::roll(6, &mut b)
        );
    }
}
