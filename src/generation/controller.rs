//! # Generation Controller
//!
//! Runs the phases of one attempt in order and restarts from an empty grid
//! whenever a phase postcondition fails.
//!
//! ```text
//! Reset -> Grow -> FindEnds -> PickBoss -> PickShop -> PickItems
//!       -> ScanSecretChance -> PickSecrets -> FindSuperCandidates -> PickSuper -> Done
//! ```
//!
//! A failed guard always goes back to `Reset`; a single phase is never retried
//! on its own. Attempts are bounded by `GenerationConfig::max_attempts`.

use crate::generation::classify::{
    assign_locked_rooms, find_end_rooms, pick_boss_room, pick_shop_room,
};
use crate::generation::growth::grow_rooms;
use crate::generation::secrets::{
    compute_secret_chances, find_super_candidates, place_super_secret, select_secret_rooms,
};
use crate::generation::{
    Floor, FloorParameters, FloorRng, GenerationConfig, Generator, Grid, RoomSets,
};
use crate::{WarrenError, WarrenResult};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// Controller states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Reset,
    Grow,
    FindEnds,
    PickBoss,
    PickShop,
    PickItems,
    ScanSecretChance,
    PickSecrets,
    FindSuperCandidates,
    PickSuper,
    Done,
}

impl Phase {
    /// The state entered after this one succeeds.
    pub fn next(self) -> Phase {
        match self {
            Phase::Reset => Phase::Grow,
            Phase::Grow => Phase::FindEnds,
            Phase::FindEnds => Phase::PickBoss,
            Phase::PickBoss => Phase::PickShop,
            Phase::PickShop => Phase::PickItems,
            Phase::PickItems => Phase::ScanSecretChance,
            Phase::ScanSecretChance => Phase::PickSecrets,
            Phase::PickSecrets => Phase::FindSuperCandidates,
            Phase::FindSuperCandidates => Phase::PickSuper,
            Phase::PickSuper => Phase::Done,
            Phase::Done => Phase::Done,
        }
    }
}

/// A phase postcondition that did not hold. Recovered by a full restart.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFailure {
    #[error("growth placed {placed} rooms, expected exactly {expected}")]
    RoomCountMismatch { expected: u32, placed: u32 },

    #[error("found {found} end rooms, need at least {required}")]
    InsufficientEndRooms { found: usize, required: usize },

    #[error("no end room left for the boss")]
    NoBossRoom,

    #[error("no end room left for the shop")]
    NoShopRoom,

    #[error("locked {locked} item rooms, need {required}")]
    InsufficientItemRooms { locked: u32, required: u32 },

    #[error("accepted {accepted} secret rooms, need {required}")]
    InsufficientSecretRooms { accepted: usize, required: u32 },

    #[error("no tile can host the super secret room")]
    NoSuperSecretCandidate,
}

impl PhaseFailure {
    /// The phase whose guard failed.
    pub fn phase(&self) -> Phase {
        match self {
            PhaseFailure::RoomCountMismatch { .. } => Phase::Grow,
            PhaseFailure::InsufficientEndRooms { .. } => Phase::FindEnds,
            PhaseFailure::NoBossRoom => Phase::PickBoss,
            PhaseFailure::NoShopRoom => Phase::PickShop,
            PhaseFailure::InsufficientItemRooms { .. } => Phase::PickItems,
            PhaseFailure::InsufficientSecretRooms { .. } => Phase::PickSecrets,
            PhaseFailure::NoSuperSecretCandidate => Phase::PickSuper,
        }
    }
}

/// Receives progress from the controller when `GenerationConfig::visualize` is set.
///
/// The grid passed here belongs to an attempt in flight and may still be
/// thrown away; hosts should only draw it.
pub trait PhaseObserver {
    /// Called after a phase's guard passed.
    fn phase_completed(&mut self, phase: Phase, grid: &Grid, rooms: &RoomSets);

    /// Called after an attempt was discarded.
    fn attempt_restarted(&mut self, attempt: u32, failure: &PhaseFailure) {
        let _ = (attempt, failure);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PhaseObserver for NoopObserver {
    fn phase_completed(&mut self, _phase: Phase, _grid: &Grid, _rooms: &RoomSets) {}
}

/// State owned by a single attempt. Dropped wholesale on restart.
struct Attempt {
    grid: Grid,
    rooms: RoomSets,
    parameters: FloorParameters,
}

enum AttemptOutcome {
    Completed(Attempt),
    Restart(PhaseFailure),
}

/// Floor generator running the phased room-grid algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorGenerator;

impl FloorGenerator {
    /// Creates a new floor generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{FloorGenerator, GenerationConfig, Generator};
    /// use warren::generation::utils::create_rng;
    ///
    /// let config = GenerationConfig::for_testing(3);
    /// let mut rng = create_rng(&config);
    /// let floor = FloorGenerator::new().generate(&config, &mut rng).unwrap();
    /// assert_eq!(floor.rooms.rooms.len() as u32, floor.parameters.max_rooms);
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Generates a floor, reporting progress to `observer` if the config asks for it.
    pub fn generate_observed(
        &self,
        config: &GenerationConfig,
        rng: &mut FloorRng,
        observer: &mut dyn PhaseObserver,
    ) -> WarrenResult<Floor> {
        config.validate()?;

        let mut last_failure = None;
        for attempt in 1..=config.max_attempts {
            match run_attempt(config, rng, observer)? {
                AttemptOutcome::Completed(state) => {
                    let floor = Floor {
                        seed: config.seed,
                        attempts: attempt,
                        grid: state.grid,
                        rooms: state.rooms,
                        parameters: state.parameters,
                    };
                    self.validate(&floor, config)?;

                    info!(
                        "generated floor (seed {}, difficulty {}) after {} attempt(s): {} rooms, {} secret",
                        config.seed,
                        floor.parameters.difficulty,
                        attempt,
                        floor.parameters.max_rooms,
                        floor.parameters.max_secrets
                    );
                    return Ok(floor);
                }
                AttemptOutcome::Restart(failure) => {
                    debug!(
                        "attempt {} failed in {:?}: {}",
                        attempt,
                        failure.phase(),
                        failure
                    );
                    if config.visualize {
                        observer.attempt_restarted(attempt, &failure);
                    }
                    last_failure = Some(failure);
                }
            }
        }

        match last_failure {
            Some(last_failure) => Err(WarrenError::GenerationFailed {
                attempts: config.max_attempts,
                last_failure,
            }),
            None => Err(WarrenError::InvalidArgument(
                "max_attempts must be at least 1".to_string(),
            )),
        }
    }
}

impl Generator<Floor> for FloorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut FloorRng) -> WarrenResult<Floor> {
        self.generate_observed(config, rng, &mut NoopObserver)
    }

    fn validate(&self, floor: &Floor, config: &GenerationConfig) -> WarrenResult<()> {
        floor.check_invariants(config.require_all_item_rooms)
    }

    fn generator_type(&self) -> &'static str {
        "FloorGenerator"
    }
}

/// Runs one attempt through the state machine.
///
/// Contract violations surface as `Err`; failed guards as `Restart`.
fn run_attempt(
    config: &GenerationConfig,
    rng: &mut FloorRng,
    observer: &mut dyn PhaseObserver,
) -> WarrenResult<AttemptOutcome> {
    let mut state = Attempt {
        parameters: FloorParameters::roll(config.difficulty, rng),
        grid: Grid::new(config.width, config.height)?,
        rooms: RoomSets::new(),
    };
    let start = state.grid.center();
    let params = state.parameters;

    let mut phase = Phase::Reset;
    loop {
        if phase == Phase::Done {
            return Ok(AttemptOutcome::Completed(state));
        }
        let Attempt { grid, rooms, .. } = &mut state;

        let guard = match phase {
            Phase::Reset => Ok(()),
            Phase::Grow => {
                let placed = grow_rooms(grid, &mut rooms.rooms, params.max_rooms, rng)?;
                if placed == params.max_rooms {
                    Ok(())
                } else {
                    Err(PhaseFailure::RoomCountMismatch {
                        expected: params.max_rooms,
                        placed,
                    })
                }
            }
            Phase::FindEnds => {
                let found = find_end_rooms(grid, &rooms.rooms, &mut rooms.end_rooms)?;
                let required = params.required_end_rooms();
                if found >= required {
                    Ok(())
                } else {
                    Err(PhaseFailure::InsufficientEndRooms { found, required })
                }
            }
            Phase::PickBoss => match pick_boss_room(grid, &rooms.end_rooms, start)? {
                Some(_) => Ok(()),
                None => Err(PhaseFailure::NoBossRoom),
            },
            Phase::PickShop => match pick_shop_room(grid, &rooms.end_rooms, start)? {
                Some(_) => Ok(()),
                None => Err(PhaseFailure::NoShopRoom),
            },
            Phase::PickItems => {
                let locked = assign_locked_rooms(
                    grid,
                    &rooms.end_rooms,
                    &mut rooms.locked_rooms,
                    params.max_item_rooms,
                )?;
                // Unreachable while FindEnds reserves an end room per item room
                if config.require_all_item_rooms && locked < params.max_item_rooms {
                    Err(PhaseFailure::InsufficientItemRooms {
                        locked,
                        required: params.max_item_rooms,
                    })
                } else {
                    Ok(())
                }
            }
            Phase::ScanSecretChance => {
                compute_secret_chances(grid, &rooms.rooms, &mut rooms.secret_candidates)?;
                Ok(())
            }
            Phase::PickSecrets => {
                let accepted = select_secret_rooms(
                    grid,
                    &rooms.secret_candidates,
                    &mut rooms.secrets,
                    params.max_secrets,
                    config.secret_lifespan,
                )?;
                if accepted == params.max_secrets as usize {
                    Ok(())
                } else {
                    Err(PhaseFailure::InsufficientSecretRooms {
                        accepted,
                        required: params.max_secrets,
                    })
                }
            }
            Phase::FindSuperCandidates => {
                let found = find_super_candidates(
                    grid,
                    &rooms.secret_candidates,
                    &mut rooms.super_candidates,
                )?;
                if found > 0 {
                    Ok(())
                } else {
                    Err(PhaseFailure::NoSuperSecretCandidate)
                }
            }
            Phase::PickSuper => match place_super_secret(grid, &rooms.super_candidates, rng)? {
                Some(_) => Ok(()),
                None => Err(PhaseFailure::NoSuperSecretCandidate),
            },
            Phase::Done => Ok(()),
        };

        if let Err(failure) = guard {
            return Ok(AttemptOutcome::Restart(failure));
        }

        trace!("phase {:?} complete", phase);
        if config.visualize {
            observer.phase_completed(phase, grid, rooms);
        }
        phase = phase.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::rng_from_seed;

    #[derive(Default)]
    struct Recorder {
        phases: Vec<Phase>,
        restarts: u32,
    }

    impl PhaseObserver for Recorder {
        fn phase_completed(&mut self, phase: Phase, _grid: &Grid, _rooms: &RoomSets) {
            self.phases.push(phase);
        }

        fn attempt_restarted(&mut self, _attempt: u32, _failure: &PhaseFailure) {
            self.restarts += 1;
            self.phases.clear();
        }
    }

    #[test]
    fn test_phase_sequence_ends_in_done() {
        let mut phase = Phase::Reset;
        let mut steps = 0;
        while phase != Phase::Done {
            phase = phase.next();
            steps += 1;
        }
        assert_eq!(steps, 10);
        assert_eq!(Phase::Done.next(), Phase::Done);
    }

    #[test]
    fn test_failures_map_to_their_phase() {
        assert_eq!(
            PhaseFailure::RoomCountMismatch { expected: 5, placed: 3 }.phase(),
            Phase::Grow
        );
        assert_eq!(PhaseFailure::NoSuperSecretCandidate.phase(), Phase::PickSuper);
    }

    #[test]
    fn test_observer_sees_every_phase_of_the_winning_attempt() {
        let config = GenerationConfig {
            visualize: true,
            ..GenerationConfig::for_testing(2024)
        };
        let mut rng = rng_from_seed(config.seed);
        let mut recorder = Recorder::default();

        let floor = FloorGenerator::new()
            .generate_observed(&config, &mut rng, &mut recorder)
            .unwrap();

        assert_eq!(
            recorder.phases,
            vec![
                Phase::Reset,
                Phase::Grow,
                Phase::FindEnds,
                Phase::PickBoss,
                Phase::PickShop,
                Phase::PickItems,
                Phase::ScanSecretChance,
                Phase::PickSecrets,
                Phase::FindSuperCandidates,
                Phase::PickSuper,
            ]
        );
        assert_eq!(recorder.restarts, floor.attempts - 1);
    }

    #[test]
    fn test_observer_silent_without_visualize() {
        let config = GenerationConfig::for_testing(2024);
        let mut rng = rng_from_seed(config.seed);
        let mut recorder = Recorder::default();

        FloorGenerator::new()
            .generate_observed(&config, &mut rng, &mut recorder)
            .unwrap();
        assert!(recorder.phases.is_empty());
        assert_eq!(recorder.restarts, 0);
    }

    #[test]
    fn test_attempt_bound_surfaces_generation_failed() {
        // A 3x3 grid cannot fit four rooms that only touch their parent
        let config = GenerationConfig {
            max_attempts: 25,
            ..GenerationConfig::for_testing(1).with_size(3, 3)
        };
        let mut rng = rng_from_seed(config.seed);

        match FloorGenerator::new().generate(&config, &mut rng) {
            Err(WarrenError::GenerationFailed {
                attempts,
                last_failure,
            }) => {
                assert_eq!(attempts, 25);
                assert_eq!(last_failure.phase(), Phase::Grow);
            }
            other => panic!("expected GenerationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_item_room_gate_locks_full_budget() {
        for seed in 0..20 {
            let config = GenerationConfig {
                require_all_item_rooms: true,
                ..GenerationConfig::new(seed).with_difficulty(8)
            };
            let mut rng = rng_from_seed(config.seed);
            let floor = FloorGenerator::new().generate(&config, &mut rng).unwrap();

            assert_eq!(
                floor.rooms.locked_rooms.len() as u32,
                floor.parameters.max_item_rooms
            );
            assert_eq!(
                floor.count(crate::generation::RoomKind::Locked) as u32,
                floor.parameters.max_item_rooms
            );
        }
    }

    #[test]
    fn test_item_room_gate_keeps_the_random_stream() {
        let gated = GenerationConfig {
            require_all_item_rooms: true,
            ..GenerationConfig::new(606).with_difficulty(5)
        };
        let plain = GenerationConfig::new(606).with_difficulty(5);

        let a = FloorGenerator::new()
            .generate(&gated, &mut rng_from_seed(606))
            .unwrap();
        let b = FloorGenerator::new()
            .generate(&plain, &mut rng_from_seed(606))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_type() {
        assert_eq!(FloorGenerator::new().generator_type(), "FloorGenerator");
    }
}
