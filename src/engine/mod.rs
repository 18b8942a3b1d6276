//! Engine — the puzzle core.
//!
//! Generates combinations and tracks clicks against them. The engine
//! knows nothing about terminals, tweens, or layers; it only reports
//! `OutcomeEvent`s.

pub mod combination;
pub mod tracker;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::GameConfig;
use crate::error::PuzzleError;
use crate::types::{Direction, OutcomeEvent};

pub use combination::{DEFAULT_STEP_COUNT, generate};
pub use tracker::{PUNISH_RADIANS, PuzzleState, TURN_RADIANS};

/// One game: the live puzzle state plus the random source feeding it.
pub struct Session<R = StdRng> {
    state: PuzzleState,
    rng: R,
    step_count: usize,
}

impl Session<StdRng> {
    /// Build a session from configuration, seeded when `seed` is set.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(config.step_count, rng).context("Failed to start a puzzle session")
    }
}

impl<R: Rng> Session<R> {
    pub fn new(step_count: usize, mut rng: R) -> Result<Self, PuzzleError> {
        let combination = generate(step_count, &mut rng)?;
        info!(%combination, "new combination");
        Ok(Self {
            state: PuzzleState::new(combination),
            rng,
            step_count,
        })
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Process one click.
    pub fn click(&mut self, direction: Direction) -> OutcomeEvent {
        self.state.handle_input(direction, &mut self.rng)
    }

    /// Start over with a fresh combination, e.g. after the door opened.
    pub fn restart(&mut self) -> Result<(), PuzzleError> {
        let combination = generate(self.step_count, &mut self.rng)?;
        info!(%combination, "session restarted");
        self.state.reset(combination);
        Ok(())
    }
}
