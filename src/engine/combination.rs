//! Combination generator.

use rand::Rng;

use crate::error::PuzzleError;
use crate::types::{
    Combination, Direction, MAX_ROTATION_COUNT, MIN_ROTATION_COUNT, RotationStep,
};

pub const DEFAULT_STEP_COUNT: usize = 3;

/// Draw a fresh combination of `step_count` steps.
///
/// Each step gets a uniformly drawn direction and a count in 1..=9. The
/// returned order is the play order.
pub fn generate<R: Rng>(
    step_count: usize,
    rng: &mut R,
) -> Result<Combination, PuzzleError> {
    let steps = (0..step_count).map(|_| draw_step(rng)).collect();
    Combination::new(steps)
}

/// Draw a replacement for `current` with the same number of steps.
pub fn redraw<R: Rng>(current: &Combination, rng: &mut R) -> Combination {
    current.redrawn(|| draw_step(rng))
}

fn draw_step<R: Rng>(rng: &mut R) -> RotationStep {
    let direction = if rng.random::<bool>() {
        Direction::Clockwise
    } else {
        Direction::CounterClockwise
    };
    let count = rng.random_range(MIN_ROTATION_COUNT..=MAX_ROTATION_COUNT);
    RotationStep::clamped(direction, count)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn default_combination_has_three_valid_steps() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let combination = generate(DEFAULT_STEP_COUNT, &mut rng).unwrap();
            assert_eq!(combination.len(), 3);
            for step in combination.steps() {
                assert!((1..=9).contains(&step.count()));
            }
        }
    }

    #[test]
    fn redraw_keeps_the_step_count() {
        let mut rng = StdRng::seed_from_u64(21);
        for len in 1..=5 {
            let current = generate(len, &mut rng).unwrap();
            let fresh = redraw(&current, &mut rng);
            assert_eq!(fresh.len(), len);
            assert!(fresh.steps().iter().all(|s| (1..=9).contains(&s.count())));
        }
    }

    #[test]
    fn zero_steps_fails_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate(0, &mut rng), Err(PuzzleError::EmptyCombination));
    }

    #[test]
    fn draws_cover_both_directions_and_full_count_range() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen_counts = [false; 10];
        let mut clockwise = 0usize;
        let mut counter = 0usize;
        for _ in 0..400 {
            for step in generate(3, &mut rng).unwrap().steps() {
                seen_counts[step.count() as usize] = true;
                match step.direction() {
                    Direction::Clockwise => clockwise += 1,
                    Direction::CounterClockwise => counter += 1,
                }
            }
        }
        assert!(!seen_counts[0]);
        assert!(seen_counts[1..].iter().all(|seen| *seen));
        assert!(clockwise > 400 && counter > 400);
    }

    #[test]
    fn repeated_calls_are_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<_> = (0..20).map(|_| generate(3, &mut rng).unwrap()).collect();
        assert!(draws.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
