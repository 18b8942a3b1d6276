//! Renderer — the deterministic rasterizer.
//!
//! Turns a `Scene` into a fixed-size cell grid, and computes cell-level
//! diffs between grids so the player only writes what changed.
//!
//! The renderer is pure and stateless. Given the same scene, it always
//! produces the same grid. It knows nothing about time or puzzle rules.

mod art;

use crate::scene::{Renderable, Scene};
use crate::types::{Canvas, Cell, CellChange, Layer, Property};

pub use art::Resolve;

/// Canvas the door is composed on.
pub const DEFAULT_CANVAS: Canvas = Canvas {
    width: 64,
    height: 24,
};

pub struct Renderer;

impl Renderer {
    /// Rasterize the attached layers of a scene.
    ///
    /// Draw operations are sorted by z-order so that higher layers paint
    /// over lower ones.
    pub fn rasterize(scene: &Scene, canvas: Canvas) -> Vec<Vec<Cell>> {
        let w = canvas.width as usize;
        let h = canvas.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops = Vec::new();
        for sprite in scene.visible() {
            sprite.resolve(canvas, &mut ops);
        }
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                grid[y][x] = Cell {
                    ch: op.ch,
                    style: op.style,
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: *next_cell,
                    });
                }
            }
        }
        changes
    }

    /// Canvas column of the handle's hub; clicks left of it turn the
    /// handle counterclockwise.
    pub fn handle_column(scene: &Scene, canvas: Canvas) -> f64 {
        let offset = scene
            .sprite(Layer::Handle)
            .map_or(0.0, |s| s.property(Property::X));
        canvas.width as f64 / 2.0 + offset
    }
}
