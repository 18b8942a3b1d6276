//! Dispatcher — turns outcomes into presentation effects.
//!
//! Holds no puzzle logic. Given the event the engine reported and a
//! read-only view of the state it left behind, it lists the `Effect`s the
//! presentation layer must play. The timings here are part of that
//! contract.

use tracing::debug;

use crate::engine::PuzzleState;
use crate::types::{Easing, Effect, Layer, OutcomeEvent, Property, SPARKLE_COUNT, Tween};

/// Handle turn after an accepted click.
pub const HANDLE_TURN_SECS: f64 = 0.5;
/// Punish spin after a wrong click.
pub const PUNISH_SPIN_SECS: f64 = 2.0;
/// Fade-out of the closed door, handle, and shadow.
pub const DOOR_FADE_SECS: f64 = 1.0;
/// Fade-in of the open door layers, starting once the closed door is gone.
pub const OPEN_FADE_SECS: f64 = 1.0;
/// One half-cycle of the sparkle pulse.
pub const SPARKLE_PULSE_SECS: f64 = 1.0;
/// Start offsets that keep the sparkles out of phase with each other.
pub const SPARKLE_STAGGER_SECS: [f64; SPARKLE_COUNT as usize] = [0.0, 0.3, 0.6];

const CLOSED_LAYERS: [Layer; 3] = [Layer::Door, Layer::HandleShadow, Layer::Handle];
const OPEN_LAYERS: [Layer; 2] = [Layer::DoorOpenShadow, Layer::DoorOpen];

pub struct Dispatcher;

impl Dispatcher {
    /// Effects for one outcome, in the order they should be applied.
    pub fn dispatch(event: &OutcomeEvent, state: &PuzzleState) -> Vec<Effect> {
        match event {
            OutcomeEvent::Progress { .. } => turn_handle(state.total_rotation()),
            OutcomeEvent::StepAdvanced { step_index } => {
                let mut effects = turn_handle(state.total_rotation());
                effects.push(Effect::Status {
                    message: format!(
                        "Step {step_index} of {} set",
                        state.combination().len()
                    ),
                });
                effects
            }
            OutcomeEvent::Mismatch { punish_delta } => {
                debug!(
                    punish_delta,
                    combination = %state.combination(),
                    "lock reset with new combination"
                );
                let mut effects = spin_handle(state.total_rotation());
                effects.push(Effect::Status {
                    message: "Wrong way! The lock spins and resets.".into(),
                });
                effects
            }
            OutcomeEvent::Solved => {
                let mut effects = turn_handle(state.total_rotation());
                effects.extend(open_door());
                effects
            }
            OutcomeEvent::AlreadySolved => Vec::new(),
        }
    }
}

fn handle_rotation(to: f64, duration: f64, easing: Easing) -> Vec<Effect> {
    [Layer::Handle, Layer::HandleShadow]
        .into_iter()
        .map(|layer| {
            Effect::Animate(Tween::to(layer, Property::Rotation, to, duration).easing(easing))
        })
        .collect()
}

fn turn_handle(total_rotation: f64) -> Vec<Effect> {
    handle_rotation(total_rotation, HANDLE_TURN_SECS, Easing::CubicOut)
}

fn spin_handle(total_rotation: f64) -> Vec<Effect> {
    handle_rotation(total_rotation, PUNISH_SPIN_SECS, Easing::QuadInOut)
}

fn open_door() -> Vec<Effect> {
    let mut effects = Vec::new();

    for layer in CLOSED_LAYERS {
        effects.push(Effect::Animate(Tween::to(
            layer,
            Property::Opacity,
            0.0,
            DOOR_FADE_SECS,
        )));
        effects.push(Effect::Detach {
            layer,
            delay: DOOR_FADE_SECS,
        });
    }

    for layer in OPEN_LAYERS {
        effects.push(Effect::Attach {
            layer,
            delay: DOOR_FADE_SECS,
        });
        effects.push(Effect::Animate(
            Tween::to(layer, Property::Opacity, 1.0, OPEN_FADE_SECS)
                .starting_at(0.0)
                .delay(DOOR_FADE_SECS),
        ));
    }

    let pulse_start = DOOR_FADE_SECS + OPEN_FADE_SECS;
    for (i, stagger) in SPARKLE_STAGGER_SECS.iter().enumerate() {
        let layer = Layer::Sparkle(i as u8);
        let delay = pulse_start + stagger;
        effects.push(Effect::Attach {
            layer,
            delay: DOOR_FADE_SECS,
        });
        for (property, from, to) in [
            (Property::Scale, 0.6, 1.2),
            (Property::Rotation, -0.3, 0.3),
            (Property::Opacity, 0.2, 1.0),
        ] {
            effects.push(Effect::Animate(
                Tween::to(layer, property, to, SPARKLE_PULSE_SECS)
                    .starting_at(from)
                    .delay(delay)
                    .easing(Easing::SineInOut)
                    .yoyo_forever(),
            ));
        }
    }

    effects.push(Effect::Status {
        message: "Click! The door swings open.".into(),
    });
    effects
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::types::{Combination, Direction, Repeat, RotationStep};

    fn state() -> PuzzleState {
        PuzzleState::new(
            Combination::new(vec![
                RotationStep::new(Direction::Clockwise, 2).unwrap(),
                RotationStep::new(Direction::CounterClockwise, 1).unwrap(),
            ])
            .unwrap(),
        )
    }

    fn tweens(effects: &[Effect]) -> Vec<&Tween> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Animate(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn progress_turns_handle_and_shadow_briefly() {
        let event = OutcomeEvent::Progress { step_index: 0, progress: 1 };
        let effects = Dispatcher::dispatch(&event, &state());
        let tweens = tweens(&effects);
        assert_eq!(tweens.len(), 2);
        for t in tweens {
            assert_eq!(t.property, Property::Rotation);
            assert_eq!(t.duration, HANDLE_TURN_SECS);
            assert_eq!(t.repeat, Repeat::Once);
        }
    }

    #[test]
    fn mismatch_spins_longer_than_progress() {
        let effects =
            Dispatcher::dispatch(&OutcomeEvent::Mismatch { punish_delta: 1.0 }, &state());
        let tweens = tweens(&effects);
        assert!(!tweens.is_empty());
        assert!(tweens.iter().all(|t| t.duration == PUNISH_SPIN_SECS));
        assert!(PUNISH_SPIN_SECS > HANDLE_TURN_SECS);
    }

    #[test]
    fn already_solved_has_no_effects() {
        assert!(Dispatcher::dispatch(&OutcomeEvent::AlreadySolved, &state()).is_empty());
    }

    #[test]
    fn solved_fades_detaches_and_opens() {
        let effects = Dispatcher::dispatch(&OutcomeEvent::Solved, &state());

        for layer in CLOSED_LAYERS {
            assert!(effects.contains(&Effect::Detach {
                layer,
                delay: DOOR_FADE_SECS
            }));
        }
        for layer in OPEN_LAYERS {
            assert!(effects.contains(&Effect::Attach {
                layer,
                delay: DOOR_FADE_SECS
            }));
        }
    }

    #[test]
    fn solving_click_still_turns_the_handle() {
        let mut state = state();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for direction in [Direction::Clockwise, Direction::Clockwise] {
            state.handle_input(direction, &mut rng);
        }
        let event = state.handle_input(Direction::CounterClockwise, &mut rng);
        assert_eq!(event, OutcomeEvent::Solved);

        let effects = Dispatcher::dispatch(&event, &state);
        for layer in [Layer::Handle, Layer::HandleShadow] {
            let turn = tweens(&effects)
                .into_iter()
                .find(|t| t.layer == layer && t.property == Property::Rotation)
                .unwrap();
            assert_eq!(turn.to, state.total_rotation());
            assert_eq!(turn.duration, HANDLE_TURN_SECS);
        }
    }

    #[test]
    fn sparkles_pulse_forever_with_staggered_starts() {
        let effects = Dispatcher::dispatch(&OutcomeEvent::Solved, &state());
        let mut delays = Vec::new();
        for i in 0..SPARKLE_COUNT {
            let pulses: Vec<_> = tweens(&effects)
                .into_iter()
                .filter(|t| t.layer == Layer::Sparkle(i))
                .collect();
            assert_eq!(pulses.len(), 3);
            assert!(pulses.iter().all(|t| t.repeat == Repeat::Forever && t.yoyo));
            delays.push(pulses[0].delay);
        }
        assert!(delays.windows(2).all(|w| w[1] > w[0]));
        assert!((delays[1] - delays[0] - 0.3).abs() < 1e-9);
    }
}
