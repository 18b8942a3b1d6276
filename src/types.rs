//! Shared boundary types for the vault door puzzle.
//!
//! This module defines the three data contracts:
//! - Engine state: `Direction`, `RotationStep`, `Combination`
//! - Engine → Dispatcher: `OutcomeEvent`, one per click
//! - Dispatcher → Presentation: `Effect`s built from `Tween`s on `Layer`s

use std::fmt;

use serde::Serialize;

use crate::error::PuzzleError;

// ---------------------------------------------------------------------------
// Combination model
// ---------------------------------------------------------------------------

pub const MIN_ROTATION_COUNT: u8 = 1;
pub const MAX_ROTATION_COUNT: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Sign applied to handle rotation; clockwise turns are positive.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => f.write_str("clockwise"),
            Direction::CounterClockwise => f.write_str("counterclockwise"),
        }
    }
}

/// One step of a combination. The count is always within 1..=9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationStep {
    direction: Direction,
    count: u8,
}

impl RotationStep {
    pub fn new(direction: Direction, count: u8) -> Result<Self, PuzzleError> {
        if !(MIN_ROTATION_COUNT..=MAX_ROTATION_COUNT).contains(&count) {
            return Err(PuzzleError::CountOutOfRange(count));
        }
        Ok(Self { direction, count })
    }

    /// Build a step from a count already drawn within 1..=9.
    pub(crate) fn clamped(direction: Direction, count: u8) -> Self {
        Self {
            direction,
            count: count.clamp(MIN_ROTATION_COUNT, MAX_ROTATION_COUNT),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.count)
    }
}

/// The secret sequence. Steps are played back in the order they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Combination {
    steps: Vec<RotationStep>,
}

impl Combination {
    pub fn new(steps: Vec<RotationStep>) -> Result<Self, PuzzleError> {
        if steps.is_empty() {
            return Err(PuzzleError::EmptyCombination);
        }
        Ok(Self { steps })
    }

    /// A combination of the same length with every step replaced by `draw`.
    pub(crate) fn redrawn(&self, mut draw: impl FnMut() -> RotationStep) -> Self {
        Self {
            steps: self.steps.iter().map(|_| draw()).collect(),
        }
    }

    pub fn steps(&self) -> &[RotationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: construction rejects empty combinations.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RotationStep> {
        self.steps.get(index)
    }

    /// Number of correct clicks needed to open the door.
    pub fn total_clicks(&self) -> usize {
        self.steps.iter().map(|s| s.count as usize).sum()
    }

    /// The click sequence that solves this combination.
    pub fn solution(&self) -> impl Iterator<Item = Direction> + '_ {
        self.steps
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.direction, s.count as usize))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine → Dispatcher boundary
// ---------------------------------------------------------------------------

/// Result of feeding one click to the tracker. Exactly one per click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeEvent {
    Progress { step_index: usize, progress: u8 },
    StepAdvanced { step_index: usize },
    Mismatch { punish_delta: f64 },
    Solved,
    AlreadySolved,
}

// ---------------------------------------------------------------------------
// Dispatcher → Presentation boundary
// ---------------------------------------------------------------------------

pub const SPARKLE_COUNT: u8 = 3;

/// Visual layers of the scene, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Door,
    HandleShadow,
    Handle,
    DoorOpenShadow,
    DoorOpen,
    Sparkle(u8),
}

impl Layer {
    pub fn z_order(self) -> i32 {
        match self {
            Layer::Background => 0,
            Layer::Door => 10,
            Layer::HandleShadow => 20,
            Layer::Handle => 30,
            Layer::DoorOpenShadow => 40,
            Layer::DoorOpen => 50,
            Layer::Sparkle(i) => 60 + i as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    X,
    Y,
    Scale,
    /// Radians, positive is clockwise.
    Rotation,
    Opacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadInOut,
    CubicOut,
    SineInOut,
}

impl Easing {
    /// Map linear progress in 0..=1 to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    Once,
    Forever,
}

/// A timed transition of one property of one layer.
///
/// `from: None` starts from whatever value the property holds when the
/// tween begins (after its delay). Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tween {
    pub layer: Layer,
    pub property: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    pub to: f64,
    pub duration: f64,
    pub delay: f64,
    pub easing: Easing,
    pub repeat: Repeat,
    pub yoyo: bool,
}

impl Tween {
    pub fn to(layer: Layer, property: Property, to: f64, duration: f64) -> Self {
        Self {
            layer,
            property,
            from: None,
            to,
            duration,
            delay: 0.0,
            easing: Easing::Linear,
            repeat: Repeat::Once,
            yoyo: false,
        }
    }

    pub fn starting_at(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Loop forever, alternating direction each cycle.
    pub fn yoyo_forever(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self.yoyo = true;
        self
    }
}

/// What the presentation layer must do in response to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Animate(Tween),
    Attach { layer: Layer, delay: f64 },
    Detach { layer: Layer, delay: f64 },
    Status { message: String },
}

// ---------------------------------------------------------------------------
// Renderer ↔ Player boundary (cell grids, in-memory only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Size of the drawing canvas in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u16,
    pub height: u16,
}
