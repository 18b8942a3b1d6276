use crate::types::{Layer, Property, Repeat, Tween};

use super::{Animator, SceneGraph};

#[derive(Debug, Clone)]
struct Running {
    tween: Tween,
    started_at: f64,
    /// Resolved start value; filled in when the delay elapses if the tween
    /// did not fix one.
    from: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at: f64,
    layer: Layer,
    attach: bool,
}

/// Clock-driven tween runner.
///
/// Time only moves when `advance` is called, so tests can step it with
/// exact durations.
#[derive(Debug, Default)]
pub struct Timeline {
    clock: f64,
    running: Vec<Running>,
    scheduled: Vec<Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach or detach `layer` once `delay` seconds have passed.
    pub fn schedule(&mut self, layer: Layer, delay: f64, attach: bool) {
        self.scheduled.push(Scheduled {
            at: self.clock + delay,
            layer,
            attach,
        });
    }

    /// True while any tween that will eventually finish is pending or running.
    /// Looping tweens never count.
    pub fn is_animating(&self) -> bool {
        self.running
            .iter()
            .any(|r| r.tween.repeat == Repeat::Once)
    }

    pub fn advance<G: SceneGraph + ?Sized>(&mut self, dt: f64, scene: &mut G) {
        self.clock += dt.max(0.0);
        let clock = self.clock;

        self.scheduled.retain(|s| {
            if s.at > clock {
                return true;
            }
            if let Some(target) = scene.renderable_mut(s.layer) {
                target.set_attached(s.attach);
            }
            false
        });

        self.running.retain_mut(|r| {
            let local = clock - r.started_at - r.tween.delay;
            if local < 0.0 {
                return true;
            }
            let Some(target) = scene.renderable_mut(r.tween.layer) else {
                return false;
            };
            let from = *r
                .from
                .get_or_insert_with(|| target.property(r.tween.property));
            let (t, done) = sample(&r.tween, local);
            let eased = r.tween.easing.apply(t);
            target.set_property(r.tween.property, from + (r.tween.to - from) * eased);
            !done
        });
    }
}

impl Animator for Timeline {
    fn start(&mut self, tween: Tween) {
        self.cancel(tween.layer, tween.property);
        let from = tween.from;
        self.running.push(Running {
            tween,
            started_at: self.clock,
            from,
        });
    }

    fn cancel(&mut self, layer: Layer, property: Property) {
        self.running
            .retain(|r| r.tween.layer != layer || r.tween.property != property);
    }
}

/// Linear progress of a tween `local` seconds after its delay, and whether
/// it has finished.
fn sample(tween: &Tween, local: f64) -> (f64, bool) {
    if tween.duration <= 0.0 {
        return (1.0, true);
    }
    if tween.repeat == Repeat::Once {
        let cycles = if tween.yoyo { 2.0 } else { 1.0 };
        if local >= cycles * tween.duration {
            return (if tween.yoyo { 0.0 } else { 1.0 }, true);
        }
    }
    let position = local / tween.duration;
    let cycle = position.floor();
    let frac = position - cycle;
    let reversed = tween.yoyo && (cycle as u64) % 2 == 1;
    (if reversed { 1.0 - frac } else { frac }, false)
}
