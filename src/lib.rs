//! A combination-lock door puzzle.
//!
//! The player turns a handle clockwise or counterclockwise through a hidden
//! sequence of rotation counts. The `engine` tracks clicks against the
//! combination, the `dispatch` layer turns each outcome into animation
//! effects, and the `scene`, `renderer`, and `player` modules play them in
//! a terminal.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod logging;
pub mod menubar;
pub mod player;
pub mod renderer;
pub mod scene;
pub mod types;
