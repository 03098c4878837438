//! Dimension toggle: flatten the floor into a 2D plan and back
//!
//! Requests are queued on [`DimensionController`] and turned into scale and
//! camera tweens. The controller remembers which tweens it dispatched and
//! only settles the new mode once every one of them has completed, at which
//! point it announces [`DimensionChanged`]. A request arriving mid-transition
//! starts fresh tweens that supersede the running ones.

use bevy::prelude::*;
use rackview_core::dimension::vertical_scale;
use rackview_core::DimensionMode;
use std::collections::HashSet;

use crate::camera::{MainCamera, OrbitRig};
use crate::equipment::IsolationGroup;
use crate::tween::{Easing, TweenCompleted, TweenId, TweenProperty, TweenRegistry, TweenSystems};
use crate::types::{vec3, ViewerSettings};

/// Root of every floor shell; the target of the flatten tween
#[derive(Component)]
pub struct FloorGroup;

/// Which part of the scene a transition flattens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionScope {
    /// The whole floor, with the camera moving between framings
    Floor,
    /// Only isolated equipment, camera untouched
    Isolated,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionStarted {
    pub scope: DimensionScope,
    pub mode: DimensionMode,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionChanged {
    pub scope: DimensionScope,
    pub mode: DimensionMode,
}

#[derive(Debug, Clone)]
struct Transition {
    mode: DimensionMode,
    waiting: HashSet<TweenId>,
}

#[derive(Debug, Default)]
struct ScopeState {
    settled: DimensionMode,
    transition: Option<Transition>,
}

impl ScopeState {
    fn target(&self) -> DimensionMode {
        self.transition
            .as_ref()
            .map(|t| t.mode)
            .unwrap_or(self.settled)
    }
}

#[derive(Resource, Debug, Default)]
pub struct DimensionController {
    floor: ScopeState,
    isolated: ScopeState,
    requests: Vec<(DimensionScope, DimensionMode)>,
}

impl DimensionController {
    fn scope(&self, scope: DimensionScope) -> &ScopeState {
        match scope {
            DimensionScope::Floor => &self.floor,
            DimensionScope::Isolated => &self.isolated,
        }
    }

    fn scope_mut(&mut self, scope: DimensionScope) -> &mut ScopeState {
        match scope {
            DimensionScope::Floor => &mut self.floor,
            DimensionScope::Isolated => &mut self.isolated,
        }
    }

    /// Last mode a transition finished in
    pub fn settled(&self, scope: DimensionScope) -> DimensionMode {
        self.scope(scope).settled
    }

    /// Mode the scope is at or heading to
    pub fn target(&self, scope: DimensionScope) -> DimensionMode {
        self.scope(scope).target()
    }

    pub fn is_transitioning(&self, scope: DimensionScope) -> bool {
        self.scope(scope).transition.is_some()
    }

    /// Queue a request; it is applied on the next frame
    pub fn request(&mut self, scope: DimensionScope, mode: DimensionMode) {
        self.requests.push((scope, mode));
    }

    /// Queue a request for the opposite of the current target
    pub fn request_toggle(&mut self, scope: DimensionScope) {
        let mode = self.target(scope).toggled();
        self.request(scope, mode);
    }
}

pub struct DimensionPlugin;

impl Plugin for DimensionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DimensionController>()
            .add_message::<DimensionStarted>()
            .add_message::<DimensionChanged>()
            .add_systems(
                Update,
                (
                    handle_dimension_requests.before(TweenSystems),
                    track_dimension_transitions.after(TweenSystems),
                ),
            );
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_dimension_requests(
    mut controller: ResMut<DimensionController>,
    mut registry: ResMut<TweenRegistry>,
    settings: Res<ViewerSettings>,
    floors: Query<Entity, With<FloorGroup>>,
    isolated: Query<Entity, With<IsolationGroup>>,
    cameras: Query<Entity, (With<MainCamera>, With<OrbitRig>)>,
    mut started: MessageWriter<DimensionStarted>,
    mut changed: MessageWriter<DimensionChanged>,
) {
    if controller.requests.is_empty() {
        return;
    }

    let animation = &settings.0.animation;
    let duration = settings.flatten_duration();

    for (scope, mode) in std::mem::take(&mut controller.requests) {
        if controller.target(scope) == mode {
            tracing::debug!(?scope, %mode, "Already heading to requested mode");
            continue;
        }

        let mut waiting = HashSet::new();
        match scope {
            DimensionScope::Floor => {
                let scale = Vec3::new(1.0, vertical_scale(mode, animation.flat_scale), 1.0);
                for floor in floors.iter() {
                    waiting.insert(registry.start(floor, TweenProperty::Scale, scale, duration, Easing::CubicOut));
                }

                let position = match mode {
                    DimensionMode::TwoD => animation.overhead_camera,
                    DimensionMode::ThreeD => animation.oblique_camera,
                };
                for camera in cameras.iter() {
                    waiting.insert(registry.start(
                        camera,
                        TweenProperty::Translation,
                        vec3(position),
                        duration,
                        Easing::CubicOut,
                    ));
                    waiting.insert(registry.start(
                        camera,
                        TweenProperty::OrbitTarget,
                        vec3(animation.scene_anchor),
                        duration,
                        Easing::CubicOut,
                    ));
                }
            }
            DimensionScope::Isolated => {
                let scale = Vec3::new(1.0, vertical_scale(mode, animation.isolated_flat_scale), 1.0);
                for group in isolated.iter() {
                    waiting.insert(registry.start(group, TweenProperty::Scale, scale, duration, Easing::Linear));
                }
            }
        }

        tracing::info!(?scope, %mode, tweens = waiting.len(), "Dimension transition started");
        started.write(DimensionStarted { scope, mode });

        let state = controller.scope_mut(scope);
        if waiting.is_empty() {
            // Nothing to animate
            state.settled = mode;
            state.transition = None;
            changed.write(DimensionChanged { scope, mode });
        } else {
            state.transition = Some(Transition { mode, waiting });
        }
    }
}

fn track_dimension_transitions(
    mut controller: ResMut<DimensionController>,
    registry: Res<TweenRegistry>,
    mut completed: MessageReader<TweenCompleted>,
    mut changed: MessageWriter<DimensionChanged>,
) {
    let finished: Vec<TweenId> = completed.read().map(|c| c.id).collect();

    for scope in [DimensionScope::Floor, DimensionScope::Isolated] {
        let state = controller.scope_mut(scope);
        let Some(transition) = state.transition.as_mut() else {
            continue;
        };

        for id in &finished {
            transition.waiting.remove(id);
        }
        // Tweens superseded by someone else never complete
        transition.waiting.retain(|id| {
            let alive = registry.contains(*id);
            if !alive {
                tracing::debug!(?scope, ?id, "Transition tween superseded");
            }
            alive
        });

        if transition.waiting.is_empty() {
            let mode = transition.mode;
            state.settled = mode;
            state.transition = None;
            tracing::info!(?scope, %mode, "Dimension changed");
            changed.write(DimensionChanged { scope, mode });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::TweenPlugin;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Changes(Vec<DimensionChanged>);

    fn collect_changes(mut reader: MessageReader<DimensionChanged>, mut changes: ResMut<Changes>) {
        changes.0.extend(reader.read().copied());
    }

    struct Scene {
        app: App,
        floor: Entity,
        camera: Entity,
        isolated: Entity,
    }

    fn scene() -> Scene {
        let mut app = App::new();
        app.add_plugins((TweenPlugin, DimensionPlugin))
            .init_resource::<Time>()
            .init_resource::<ViewerSettings>()
            .init_resource::<Changes>()
            .add_systems(Update, collect_changes.after(track_dimension_transitions));

        let floor = app
            .world_mut()
            .spawn((FloorGroup, Transform::default()))
            .id();
        let isolated = app
            .world_mut()
            .spawn((IsolationGroup, Transform::from_xyz(4.0, 0.0, 0.0)))
            .id();
        let camera = app
            .world_mut()
            .spawn((
                MainCamera,
                OrbitRig::default(),
                Transform::from_xyz(5.0, 25.0, 50.0),
            ))
            .id();

        Scene {
            app,
            floor,
            camera,
            isolated,
        }
    }

    impl Scene {
        fn tick(&mut self, millis: u64) {
            self.app
                .world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(millis));
            self.app.update();
        }

        fn request(&mut self, scope: DimensionScope, mode: DimensionMode) {
            self.app
                .world_mut()
                .resource_mut::<DimensionController>()
                .request(scope, mode);
        }

        fn transform(&self, entity: Entity) -> Transform {
            *self.app.world().get::<Transform>(entity).unwrap()
        }

        fn controller(&self) -> &DimensionController {
            self.app.world().resource::<DimensionController>()
        }

        fn changes(&self) -> &[DimensionChanged] {
            &self.app.world().resource::<Changes>().0
        }
    }

    #[test]
    fn test_flatten_then_restore() {
        let mut scene = scene();
        scene.request(DimensionScope::Floor, DimensionMode::TwoD);

        scene.tick(500);
        assert!(scene.controller().is_transitioning(DimensionScope::Floor));
        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::ThreeD);
        assert_eq!(scene.controller().target(DimensionScope::Floor), DimensionMode::TwoD);
        assert!(scene.changes().is_empty());

        scene.tick(500);
        assert_eq!(scene.transform(scene.floor).scale, Vec3::new(1.0, 0.01, 1.0));
        assert_eq!(scene.transform(scene.camera).translation, Vec3::new(0.0, 60.0, 0.0));
        let rig = scene.app.world().get::<OrbitRig>(scene.camera).unwrap();
        assert_eq!(rig.target, Vec3::new(0.0, 1.0, 0.0));
        assert!(!scene.controller().is_transitioning(DimensionScope::Floor));
        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::TwoD);
        assert_eq!(
            scene.changes(),
            &[DimensionChanged {
                scope: DimensionScope::Floor,
                mode: DimensionMode::TwoD
            }]
        );

        // Isolated equipment is its own scope
        assert_eq!(scene.transform(scene.isolated).scale, Vec3::ONE);

        scene.request(DimensionScope::Floor, DimensionMode::ThreeD);
        scene.tick(1000);
        assert_eq!(scene.transform(scene.floor).scale, Vec3::ONE);
        assert_eq!(scene.transform(scene.camera).translation, Vec3::new(5.0, 25.0, 50.0));
        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::ThreeD);
        assert_eq!(scene.changes().len(), 2);
    }

    #[test]
    fn test_request_mid_transition_retargets() {
        let mut scene = scene();
        scene.request(DimensionScope::Floor, DimensionMode::TwoD);
        scene.tick(400);
        let midway = scene.transform(scene.floor).scale.y;
        assert!(midway < 1.0 && midway > 0.01);

        scene.request(DimensionScope::Floor, DimensionMode::ThreeD);
        scene.tick(500);
        assert!(scene.controller().is_transitioning(DimensionScope::Floor));
        assert!(scene.changes().is_empty());

        scene.tick(500);
        assert_eq!(scene.transform(scene.floor).scale, Vec3::ONE);
        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::ThreeD);
        assert_eq!(scene.changes().len(), 1);
        assert_eq!(scene.changes()[0].mode, DimensionMode::ThreeD);
    }

    #[test]
    fn test_repeated_request_is_ignored() {
        let mut scene = scene();
        scene.request(DimensionScope::Floor, DimensionMode::ThreeD);
        scene.tick(16);
        assert!(!scene.controller().is_transitioning(DimensionScope::Floor));
        assert!(scene.app.world().resource::<TweenRegistry>().is_empty());
    }

    #[test]
    fn test_isolate_leaves_camera_alone() {
        let mut scene = scene();
        scene
            .app
            .world_mut()
            .resource_mut::<DimensionController>()
            .request_toggle(DimensionScope::Isolated);
        scene.tick(1000);

        assert_eq!(scene.transform(scene.isolated).scale, Vec3::new(1.0, 0.001, 1.0));
        assert_eq!(scene.transform(scene.isolated).translation, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(scene.transform(scene.floor).scale, Vec3::ONE);
        assert_eq!(scene.transform(scene.camera).translation, Vec3::new(5.0, 25.0, 50.0));
        assert_eq!(scene.controller().settled(DimensionScope::Isolated), DimensionMode::TwoD);
        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::ThreeD);
    }

    #[test]
    fn test_superseded_camera_tween_still_settles() {
        let mut scene = scene();
        scene.request(DimensionScope::Floor, DimensionMode::TwoD);
        scene.tick(100);

        // A focus gesture takes over the orbit target mid-flatten
        let camera = scene.camera;
        scene.app.world_mut().resource_mut::<TweenRegistry>().start(
            camera,
            TweenProperty::OrbitTarget,
            Vec3::new(3.0, 0.0, 3.0),
            Duration::from_millis(100),
            Easing::CubicOut,
        );
        scene.tick(900);

        assert_eq!(scene.controller().settled(DimensionScope::Floor), DimensionMode::TwoD);
        assert_eq!(scene.changes().len(), 1);
    }
}
