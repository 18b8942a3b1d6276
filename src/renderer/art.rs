//! Per-layer drawings.
//!
//! Each layer resolves to `DrawOp`s around the canvas centre, offset by the
//! sprite's position and transformed by its rotation, scale, and opacity.

use std::f64::consts::TAU;

use crate::scene::{Renderable, Sprite};
use crate::types::{Canvas, Color, DrawOp, Layer, NamedColor, Property, Style};

/// Half-extent of the closed door, in cells.
const DOOR_HALF_WIDTH: i32 = 17;
const DOOR_HALF_HEIGHT: i32 = 10;
/// Radius of the handle wheel in rows; columns are doubled for cell aspect.
const HANDLE_RADIUS: f64 = 5.0;

const SPOKES: usize = 3;

struct WheelStyle {
    rim: char,
    spoke: char,
    knob: char,
    hub: char,
    color: Color,
    knob_color: Color,
}

const HANDLE_WHEEL: WheelStyle = WheelStyle {
    rim: '○',
    spoke: '•',
    knob: '●',
    hub: '◉',
    color: STEEL,
    knob_color: BRASS,
};

const SHADOW_WHEEL: WheelStyle = WheelStyle {
    rim: '░',
    spoke: '░',
    knob: '░',
    hub: '░',
    color: SHADOW,
    knob_color: SHADOW,
};

const STEEL: Color = Color::Rgb { r: 150, g: 160, b: 170 };
const SHADOW: Color = Color::Rgb { r: 45, g: 45, b: 50 };
const BRASS: Color = Color::Rgb { r: 190, g: 150, b: 60 };

/// Resolve a drawable into concrete `DrawOp`s.
pub trait Resolve {
    fn resolve(&self, canvas: Canvas, ops: &mut Vec<DrawOp>);
}

impl Resolve for Sprite {
    fn resolve(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        let opacity = self.property(Property::Opacity);
        if opacity < 0.1 {
            return;
        }
        let mut pen = Pen {
            canvas,
            cx: canvas.width as f64 / 2.0 + self.property(Property::X),
            cy: canvas.height as f64 / 2.0 + self.property(Property::Y),
            z_order: self.layer().z_order(),
            dim: opacity < 0.6,
            ops,
        };
        match self.layer() {
            Layer::Background => background(&mut pen),
            Layer::Door => closed_door(&mut pen),
            Layer::HandleShadow => wheel(&mut pen, self, &SHADOW_WHEEL),
            Layer::Handle => wheel(&mut pen, self, &HANDLE_WHEEL),
            Layer::DoorOpenShadow => doorway(&mut pen),
            Layer::DoorOpen => open_door(&mut pen),
            Layer::Sparkle(_) => sparkle(&mut pen, self),
        }
    }
}

struct Pen<'a> {
    canvas: Canvas,
    cx: f64,
    cy: f64,
    z_order: i32,
    dim: bool,
    ops: &'a mut Vec<DrawOp>,
}

impl Pen<'_> {
    /// Plot at an offset from the pen's centre; off-canvas points are dropped.
    fn put(&mut self, dx: f64, dy: f64, ch: char, color: Color, bold: bool) {
        let x = (self.cx + dx).round();
        let y = (self.cy + dy).round();
        if x < 0.0 || y < 0.0 || x >= self.canvas.width as f64 || y >= self.canvas.height as f64 {
            return;
        }
        self.ops.push(DrawOp {
            x: x as u16,
            y: y as u16,
            ch,
            style: Style {
                fg: Some(color),
                bg: None,
                bold: bold && !self.dim,
                dim: self.dim,
            },
            z_order: self.z_order,
        });
    }
}

fn background(pen: &mut Pen) {
    let w = pen.canvas.width as i32;
    let h = pen.canvas.height as i32;
    let (ox, oy) = (pen.cx.round() as i32, pen.cy.round() as i32);
    for y in 0..h {
        for x in 0..w {
            if (x + 3 * y) % 7 == 0 {
                pen.put(
                    (x - ox) as f64,
                    (y - oy) as f64,
                    '·',
                    Color::Named(NamedColor::Blue),
                    false,
                );
            }
        }
    }
}

fn closed_door(pen: &mut Pen) {
    for dy in -DOOR_HALF_HEIGHT..=DOOR_HALF_HEIGHT {
        for dx in -DOOR_HALF_WIDTH..=DOOR_HALF_WIDTH {
            let edge = dy.abs() == DOOR_HALF_HEIGHT || dx.abs() == DOOR_HALF_WIDTH;
            let rivet = (dx.abs() == DOOR_HALF_WIDTH - 2 && dy.abs() == DOOR_HALF_HEIGHT - 1)
                || (dx.abs() == DOOR_HALF_WIDTH - 2 && dy == 0);
            let (ch, color) = if edge {
                ('█', STEEL)
            } else if rivet {
                ('●', BRASS)
            } else {
                ('▒', SHADOW)
            };
            pen.put(dx as f64, dy as f64, ch, color, edge);
        }
    }
}

/// The handle wheel: a rim, a hub, and spokes turned by the sprite's rotation.
fn wheel(pen: &mut Pen, sprite: &Sprite, style: &WheelStyle) {
    let radius = HANDLE_RADIUS * sprite.property(Property::Scale);
    let rotation = sprite.property(Property::Rotation);

    let rim_points = (radius * 8.0).ceil().max(8.0) as usize;
    for i in 0..rim_points {
        let angle = TAU * i as f64 / rim_points as f64;
        let (dx, dy) = polar(angle, radius);
        pen.put(dx, dy, style.rim, style.color, false);
    }

    for spoke in 0..SPOKES {
        let angle = rotation + TAU * spoke as f64 / SPOKES as f64;
        let mut r = 1.0;
        while r < radius {
            let (dx, dy) = polar(angle, r);
            pen.put(dx, dy, style.spoke, style.color, true);
            r += 0.5;
        }
        let (dx, dy) = polar(angle, radius);
        pen.put(dx, dy, style.knob, style.knob_color, true);
    }
    pen.put(0.0, 0.0, style.hub, style.color, true);
}

/// Offset for an angle measured clockwise from straight up.
fn polar(angle: f64, radius: f64) -> (f64, f64) {
    (angle.sin() * radius * 2.0, -angle.cos() * radius)
}

fn doorway(pen: &mut Pen) {
    for dy in -DOOR_HALF_HEIGHT..=DOOR_HALF_HEIGHT {
        for dx in -DOOR_HALF_WIDTH..=DOOR_HALF_WIDTH {
            pen.put(dx as f64, dy as f64, '░', SHADOW, false);
        }
    }
}

/// The door swung outwards, seen edge-on to the right of the frame.
fn open_door(pen: &mut Pen) {
    let hinge = DOOR_HALF_WIDTH + 1;
    for step in 0..6 {
        let dx = hinge + step;
        let reach = DOOR_HALF_HEIGHT + step / 2;
        for dy in -reach..=reach {
            let ch = if dy.abs() == reach { '▀' } else { '▓' };
            pen.put(dx as f64, dy as f64, ch, STEEL, step == 0);
        }
    }
}

fn sparkle(pen: &mut Pen, sprite: &Sprite) {
    let scale = sprite.property(Property::Scale);
    let ch = if scale < 0.8 {
        '·'
    } else if scale < 1.0 {
        '+'
    } else if sprite.property(Property::Rotation) > 0.0 {
        '✧'
    } else {
        '✦'
    };
    pen.put(0.0, 0.0, ch, Color::Named(NamedColor::Yellow), true);
    if scale >= 1.1 {
        for (dx, dy) in [(-2.0, 0.0), (2.0, 0.0), (0.0, -1.0), (0.0, 1.0)] {
            pen.put(dx, dy, '·', Color::Named(NamedColor::Yellow), false);
        }
    }
}
