//! Property tweening and the per-frame animation ticker
//!
//! Tweens interpolate a `Vec3` property (translation, scale or orbit target)
//! of one entity from its value on the first tick to a goal value. A single
//! registry owns every running tween; [`advance_tweens`] steps them once per
//! frame, removes the finished ones and announces each completion with a
//! [`TweenCompleted`] message so dependent steps can chain off it.

use bevy::prelude::*;
use std::time::Duration;

use crate::camera::OrbitRig;

/// Easing curves, all mapping [0, 1] onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let k = t - 1.0;
                k * k * k + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let k = 2.0 * t - 2.0;
                    0.5 * k * k * k + 1.0
                }
            }
        }
    }
}

/// Property path a tween writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    Translation,
    Scale,
    /// `OrbitRig::target` of a camera
    OrbitTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

#[derive(Debug, Clone)]
pub struct Tween {
    pub id: TweenId,
    pub target: Entity,
    pub property: TweenProperty,
    from: Option<Vec3>,
    to: Vec3,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(id: TweenId, target: Entity, property: TweenProperty, to: Vec3, duration: Duration, easing: Easing) -> Self {
        Self {
            id,
            target,
            property,
            from: None,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Advance by `dt` and return the value to write
    ///
    /// The start value is captured from `current` on the first call. Once
    /// the duration has elapsed the goal is returned exactly.
    pub fn step(&mut self, current: Vec3, dt: Duration) -> Vec3 {
        let from = *self.from.get_or_insert(current);
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.is_finished() {
            return self.to;
        }
        from.lerp(self.to, self.easing.apply(self.progress()))
    }
}

/// Announced once for every tween that ran to completion
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TweenCompleted {
    pub id: TweenId,
    pub target: Entity,
    pub property: TweenProperty,
}

/// Global registry of running tweens
#[derive(Resource, Debug, Default)]
pub struct TweenRegistry {
    next_id: u64,
    tweens: Vec<Tween>,
}

impl TweenRegistry {
    /// Start a tween, superseding any tween already driving the same
    /// property of the same entity
    pub fn start(
        &mut self,
        target: Entity,
        property: TweenProperty,
        to: Vec3,
        duration: Duration,
        easing: Easing,
    ) -> TweenId {
        let before = self.tweens.len();
        self.tweens
            .retain(|t| !(t.target == target && t.property == property));
        if self.tweens.len() != before {
            tracing::debug!(?target, ?property, "Superseded running tween");
        }

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens
            .push(Tween::new(id, target, property, to, duration, easing));
        id
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id == id)
    }

    pub fn is_animating(&self, target: Entity, property: TweenProperty) -> bool {
        self.tweens
            .iter()
            .any(|t| t.target == target && t.property == property)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

/// System set containing the ticker; camera and controller systems order
/// themselves around it
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TweenSystems;

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TweenRegistry>()
            .add_message::<TweenCompleted>()
            .add_systems(Update, advance_tweens.in_set(TweenSystems));
    }
}

/// Advance every registered tween by the frame's elapsed time
pub fn advance_tweens(
    time: Res<Time>,
    mut registry: ResMut<TweenRegistry>,
    mut transforms: Query<&mut Transform>,
    mut rigs: Query<&mut OrbitRig>,
    mut completed: MessageWriter<TweenCompleted>,
) {
    if registry.is_empty() {
        return;
    }

    let dt = time.delta();
    let mut orphaned = Vec::new();

    for tween in registry.tweens.iter_mut() {
        let applied = match tween.property {
            TweenProperty::Translation | TweenProperty::Scale => {
                match transforms.get_mut(tween.target) {
                    Ok(mut transform) => {
                        let slot = if tween.property == TweenProperty::Translation {
                            &mut transform.translation
                        } else {
                            &mut transform.scale
                        };
                        *slot = tween.step(*slot, dt);
                        true
                    }
                    Err(_) => false,
                }
            }
            TweenProperty::OrbitTarget => match rigs.get_mut(tween.target) {
                Ok(mut rig) => {
                    rig.target = tween.step(rig.target, dt);
                    true
                }
                Err(_) => false,
            },
        };

        if !applied {
            orphaned.push(tween.id);
        }
    }

    registry.tweens.retain(|tween| {
        if orphaned.contains(&tween.id) {
            tracing::debug!(entity = ?tween.target, "Dropping tween for missing entity");
            return false;
        }
        if tween.is_finished() {
            completed.write(TweenCompleted {
                id: tween.id,
                target: tween.target,
                property: tween.property,
            });
            return false;
        }
        true
    });
}
