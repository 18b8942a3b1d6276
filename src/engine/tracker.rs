//! Input tracker — the combination state machine.
//!
//! Consumes one direction click at a time and reports exactly one
//! `OutcomeEvent` per click. It never touches visuals; the rotation it
//! accumulates is a number for the presentation layer to animate towards.

use std::f64::consts::PI;

use rand::Rng;
use tracing::{debug, info};

use crate::types::{Combination, Direction, OutcomeEvent};

use super::combination;

/// Handle rotation per accepted click (60°).
pub const TURN_RADIANS: f64 = PI / 3.0;

/// Magnitude of the spin played on a wrong click (3200°).
pub const PUNISH_RADIANS: f64 = 3200.0 * PI / 180.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleState {
    combination: Combination,
    step_index: usize,
    progress: u8,
    total_rotation: f64,
}

impl PuzzleState {
    /// Start a round on the given combination with the handle at rest.
    pub fn new(combination: Combination) -> Self {
        Self {
            combination,
            step_index: 0,
            progress: 0,
            total_rotation: 0.0,
        }
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    pub fn is_solved(&self) -> bool {
        self.step_index == self.combination.len()
    }

    /// Swap in a new combination and rewind to its first step.
    ///
    /// The accumulated rotation is kept so the handle never jumps.
    pub fn reset(&mut self, combination: Combination) {
        self.combination = combination;
        self.step_index = 0;
        self.progress = 0;
    }

    /// Feed one click into the state machine.
    ///
    /// `rng` is only consumed on a mismatch, to draw the replacement
    /// combination and the sign of the punish spin.
    pub fn handle_input<R: Rng>(&mut self, direction: Direction, rng: &mut R) -> OutcomeEvent {
        let Some(step) = self.combination.get(self.step_index).copied() else {
            debug!(%direction, "input ignored, door already open");
            return OutcomeEvent::AlreadySolved;
        };

        if direction != step.direction() {
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            let punish_delta = sign * PUNISH_RADIANS;
            self.total_rotation += punish_delta;

            let fresh = combination::redraw(&self.combination, rng);
            info!(
                expected = %step.direction(),
                got = %direction,
                step_index = self.step_index,
                combination = %fresh,
                "wrong turn, combination replaced"
            );
            self.reset(fresh);
            return OutcomeEvent::Mismatch { punish_delta };
        }

        self.progress += 1;
        self.total_rotation += direction.sign() * TURN_RADIANS;

        if self.progress < step.count() {
            return OutcomeEvent::Progress {
                step_index: self.step_index,
                progress: self.progress,
            };
        }

        self.step_index += 1;
        self.progress = 0;
        if self.is_solved() {
            info!(combination = %self.combination, "combination solved");
            OutcomeEvent::Solved
        } else {
            debug!(step_index = self.step_index, "step complete");
            OutcomeEvent::StepAdvanced {
                step_index: self.step_index,
            }
        }
    }
}
