//! Scene — the presentation adapter.
//!
//! Owns the visual layers of the door and plays the `Effect`s the
//! dispatcher produces. Layer positions are in terminal cells relative to
//! the canvas centre; the renderer decides what each layer looks like.

mod timeline;

use tracing::trace;

use crate::types::{Effect, Layer, Property, SPARKLE_COUNT, Tween};

pub use timeline::Timeline;

/// A positioned, scalable visual layer.
pub trait Renderable {
    fn layer(&self) -> Layer;
    fn property(&self, property: Property) -> f64;
    fn set_property(&mut self, property: Property, value: f64);
    fn is_attached(&self) -> bool;
    fn set_attached(&mut self, attached: bool);
}

/// Start or cancel timed property transitions.
///
/// Starting a tween on a layer/property that is already animating replaces
/// the running tween.
pub trait Animator {
    fn start(&mut self, tween: Tween);
    fn cancel(&mut self, layer: Layer, property: Property);
}

/// Lookup of layers by identity, for anything that animates them.
pub trait SceneGraph {
    fn renderable_mut(&mut self, layer: Layer) -> Option<&mut dyn Renderable>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    layer: Layer,
    x: f64,
    y: f64,
    scale: f64,
    rotation: f64,
    opacity: f64,
    attached: bool,
}

impl Sprite {
    fn new(layer: Layer, x: f64, y: f64) -> Self {
        Self {
            layer,
            x,
            y,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            attached: true,
        }
    }

    /// Starts detached and transparent; attached when the door opens.
    fn hidden(mut self) -> Self {
        self.attached = false;
        self.opacity = 0.0;
        self
    }
}

impl Renderable for Sprite {
    fn layer(&self) -> Layer {
        self.layer
    }

    fn property(&self, property: Property) -> f64 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::Scale => self.scale,
            Property::Rotation => self.rotation,
            Property::Opacity => self.opacity,
        }
    }

    fn set_property(&mut self, property: Property, value: f64) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Scale => self.scale = value.max(0.0),
            Property::Rotation => self.rotation = value,
            Property::Opacity => self.opacity = value.clamp(0.0, 1.0),
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}

const SPARKLE_POSITIONS: [(f64, f64); SPARKLE_COUNT as usize] =
    [(-15.0, -6.0), (13.0, -4.0), (3.0, 6.0)];

/// All layers of the door, kept in z-order.
#[derive(Debug, Clone)]
pub struct Scene {
    sprites: Vec<Sprite>,
}

impl Scene {
    pub fn new() -> Self {
        let mut sprites = vec![
            Sprite::new(Layer::Background, 0.0, 0.0),
            Sprite::new(Layer::Door, 0.0, 0.0),
            Sprite::new(Layer::HandleShadow, 1.0, 1.0),
            Sprite::new(Layer::Handle, 0.0, 0.0),
            Sprite::new(Layer::DoorOpenShadow, 0.0, 0.0).hidden(),
            Sprite::new(Layer::DoorOpen, 0.0, 0.0).hidden(),
        ];
        for (i, (x, y)) in SPARKLE_POSITIONS.iter().enumerate() {
            let mut sparkle = Sprite::new(Layer::Sparkle(i as u8), *x, *y).hidden();
            sparkle.scale = 0.6;
            sprites.push(sparkle);
        }
        sprites.sort_by_key(|s| s.layer.z_order());
        Self { sprites }
    }

    pub fn sprite(&self, layer: Layer) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.layer == layer)
    }

    fn sprite_mut(&mut self, layer: Layer) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.layer == layer)
    }

    /// Attached layers, bottom to top.
    pub fn visible(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| s.attached)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Scene {
    fn renderable_mut(&mut self, layer: Layer) -> Option<&mut dyn Renderable> {
        self.sprite_mut(layer).map(|s| s as &mut dyn Renderable)
    }
}

/// Scene plus the timeline animating it.
#[derive(Debug, Default)]
pub struct Stage {
    scene: Scene,
    timeline: Timeline,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh stage whose handle and shadow already sit at `rotation`.
    pub fn at_rotation(rotation: f64) -> Self {
        let mut stage = Self::new();
        for layer in [Layer::Handle, Layer::HandleShadow] {
            if let Some(sprite) = stage.scene.sprite_mut(layer) {
                sprite.set_property(Property::Rotation, rotation);
            }
        }
        stage
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_animating(&self) -> bool {
        self.timeline.is_animating()
    }

    /// Play a batch of effects. Returns the last status message, if any.
    pub fn apply(&mut self, effects: &[Effect]) -> Option<String> {
        let mut status = None;
        for effect in effects {
            trace!(?effect, "apply effect");
            match effect {
                Effect::Animate(tween) => self.timeline.start(tween.clone()),
                Effect::Attach { layer, delay } => self.set_attached(*layer, *delay, true),
                Effect::Detach { layer, delay } => self.set_attached(*layer, *delay, false),
                Effect::Status { message } => status = Some(message.clone()),
            }
        }
        status
    }

    fn set_attached(&mut self, layer: Layer, delay: f64, attached: bool) {
        if delay > 0.0 {
            self.timeline.schedule(layer, delay, attached);
        } else if let Some(sprite) = self.scene.sprite_mut(layer) {
            sprite.set_attached(attached);
        }
    }

    /// Advance all animations by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        self.timeline.advance(dt, &mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DOOR_FADE_SECS, Dispatcher, OPEN_FADE_SECS};
    use crate::engine::PuzzleState;
    use crate::types::{Combination, Direction, OutcomeEvent, RotationStep};

    fn solved_effects() -> Vec<Effect> {
        let state = PuzzleState::new(
            Combination::new(vec![RotationStep::new(Direction::Clockwise, 1).unwrap()]).unwrap(),
        );
        Dispatcher::dispatch(&OutcomeEvent::Solved, &state)
    }

    #[test]
    fn new_scene_shows_only_the_closed_door() {
        let scene = Scene::new();
        let layers: Vec<_> = scene.visible().map(|s| s.layer()).collect();
        assert_eq!(
            layers,
            vec![Layer::Background, Layer::Door, Layer::HandleShadow, Layer::Handle]
        );
    }

    #[test]
    fn solved_effects_swap_closed_for_open_door() {
        let mut stage = Stage::new();
        let status = stage.apply(&solved_effects());
        assert!(status.is_some());

        stage.tick(DOOR_FADE_SECS + 0.01);
        let scene = stage.scene();
        assert!(!scene.sprite(Layer::Door).unwrap().is_attached());
        assert!(!scene.sprite(Layer::Handle).unwrap().is_attached());
        assert!(scene.sprite(Layer::DoorOpen).unwrap().is_attached());

        stage.tick(OPEN_FADE_SECS);
        let open = stage.scene().sprite(Layer::DoorOpen).unwrap();
        assert_eq!(open.property(Property::Opacity), 1.0);
        assert!(!stage.is_animating());
    }

    #[test]
    fn stage_at_rotation_turns_handle_and_shadow() {
        let stage = Stage::at_rotation(2.5);
        for layer in [Layer::Handle, Layer::HandleShadow] {
            let sprite = stage.scene().sprite(layer).unwrap();
            assert_eq!(sprite.property(Property::Rotation), 2.5);
        }
        assert!(!stage.is_animating());
    }

    #[test]
    fn sparkles_keep_pulsing_after_the_door_opens() {
        let mut stage = Stage::new();
        stage.apply(&solved_effects());
        stage.tick(DOOR_FADE_SECS + OPEN_FADE_SECS + 1.5);
        let first = stage.scene().sprite(Layer::Sparkle(0)).unwrap().clone();
        stage.tick(0.4);
        let later = stage.scene().sprite(Layer::Sparkle(0)).unwrap();
        assert!(later.is_attached());
        assert_ne!(first.property(Property::Scale), later.property(Property::Scale));
    }
}
