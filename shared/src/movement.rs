use nalgebra::{UnitQuaternion, Vector3};

use crate::{
    AnimationState, COLLISION_CLEARANCE_M, GroundProbe, MovementIntent, ROTATION_SPEED_RADPS,
    RUN_SPEED_MPS, WALK_SPEED_MPS,
    heading::{direction_offset, rotate_towards, yaw_direction, yaw_to_quat},
};

/// Tuning for the locomotion resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    /// Ground-ray hits at or below this distance block the move.
    pub collision_clearance: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED_MPS,
            run_speed: RUN_SPEED_MPS,
            rotation_speed: ROTATION_SPEED_RADPS,
            collision_clearance: COLLISION_CLEARANCE_M,
        }
    }
}

/// Committed character pose. The character only ever turns about +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CharacterTransform {
    pub translation: Vector3<f32>,
    /// Heading in radians, wrapped into `(-PI, PI]`.
    pub yaw: f32,
}

impl CharacterTransform {
    pub fn new(translation: Vector3<f32>, yaw: f32) -> Self {
        Self { translation, yaw }
    }

    #[inline]
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        yaw_to_quat(self.yaw)
    }
}

/// Outcome of a candidate move against the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No directional input this frame.
    Stationary,
    /// The candidate position was committed.
    Accepted,
    /// The ground ray hit within clearance; only the heading changed.
    Blocked,
}

/// Output of a single [`LocomotionResolver::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepMovementResult {
    pub transform: CharacterTransform,
    /// Requested planar speed (m/s), `0` when stationary.
    pub speed: f32,
    /// Speed tier derived from `speed` with the controller rule.
    pub tier: AnimationState,
    pub outcome: MoveOutcome,
}

impl StepMovementResult {
    pub fn is_moving(&self) -> bool {
        self.outcome != MoveOutcome::Stationary
    }
}

/// Turns movement intent into a committed transform, testing each step against static geometry.
///
/// The geometry is injected once and only read afterwards.
#[derive(Clone, Debug)]
pub struct LocomotionResolver<G> {
    settings: LocomotionSettings,
    geometry: G,
}

impl<G: GroundProbe> LocomotionResolver<G> {
    pub fn new(settings: LocomotionSettings, geometry: G) -> Self {
        Self { settings, geometry }
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Requested speed for the current intent.
    #[inline]
    pub fn speed_for(&self, intent: &MovementIntent) -> f32 {
        if !intent.is_moving() {
            0.0
        } else if intent.sprint() {
            self.settings.run_speed
        } else {
            self.settings.walk_speed
        }
    }

    /// Perform one frame of locomotion.
    ///
    /// Behavior
    /// - Stationary intent returns `current` untouched (no heading drift).
    /// - Heading turns toward `camera_yaw + offset` by at most `rotation_speed * dt`.
    /// - The displacement follows the target heading, not the turned heading.
    /// - A downward ray at the candidate position blocks the move when the nearest hit is
    ///   `<= collision_clearance`. This is a ground/obstacle-top proxy, not a swept volume test.
    pub fn step(
        &self,
        intent: &MovementIntent,
        current: CharacterTransform,
        camera_yaw: f32,
        dt_seconds: f32,
    ) -> StepMovementResult {
        let dt = dt_seconds.max(0.0);
        let speed = self.speed_for(intent);
        let tier = AnimationState::from_controller_speed(speed, self.settings.run_speed);

        if !intent.is_moving() {
            return StepMovementResult {
                transform: current,
                speed,
                tier,
                outcome: MoveOutcome::Stationary,
            };
        }

        let target_yaw = camera_yaw + direction_offset(intent);
        let yaw = rotate_towards(current.yaw, target_yaw, dt * self.settings.rotation_speed);

        let candidate = current.translation + yaw_direction(target_yaw) * (speed * dt);

        let (translation, outcome) = if self.is_blocked(&candidate) {
            log::trace!("Move to {:?} blocked by ground ray", candidate);
            (current.translation, MoveOutcome::Blocked)
        } else {
            (candidate, MoveOutcome::Accepted)
        };

        StepMovementResult {
            transform: CharacterTransform { translation, yaw },
            speed,
            tier,
            outcome,
        }
    }

    /// True when the nearest downward hit from `candidate` is within clearance.
    #[inline]
    pub fn is_blocked(&self, candidate: &Vector3<f32>) -> bool {
        self.geometry
            .ground_hit_distance(candidate)
            .is_some_and(|distance| distance <= self.settings.collision_clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntentFlag, NoObstacles, heading::wrap_angle};
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1.0e-5;

    /// Every ray reports the same hit distance.
    struct FixedHit(Option<f32>);

    impl GroundProbe for FixedHit {
        fn ground_hit_distance(&self, _origin: &Vector3<f32>) -> Option<f32> {
            self.0
        }
    }

    fn held(flags: &[IntentFlag]) -> MovementIntent {
        let mut intent = MovementIntent::default();
        for &flag in flags {
            intent.on_flag_edge(flag, true);
        }
        intent
    }

    fn resolver<G: GroundProbe>(geometry: G) -> LocomotionResolver<G> {
        LocomotionResolver::new(LocomotionSettings::default(), geometry)
    }

    #[test]
    fn stationary_intent_keeps_transform_for_any_dt() {
        let r = resolver(NoObstacles);
        let start = CharacterTransform::new(Vector3::new(1.0, 0.0, -2.0), 0.3);
        for dt in [0.0, 0.016, 0.5, 10.0] {
            let out = r.step(&held(&[IntentFlag::Sprint]), start, 2.0, dt);
            assert_eq!(out.transform, start);
            assert_eq!(out.speed, 0.0);
            assert_eq!(out.tier, AnimationState::Idle);
            assert_eq!(out.outcome, MoveOutcome::Stationary);
        }
    }

    #[test]
    fn walk_and_sprint_speeds() {
        let r = resolver(NoObstacles);
        assert_eq!(r.speed_for(&held(&[IntentFlag::Forward])), WALK_SPEED_MPS);
        assert_eq!(
            r.speed_for(&held(&[IntentFlag::Forward, IntentFlag::Sprint])),
            RUN_SPEED_MPS
        );

        let out = r.step(
            &held(&[IntentFlag::Left, IntentFlag::Sprint]),
            CharacterTransform::default(),
            0.0,
            0.1,
        );
        assert_eq!(out.tier, AnimationState::Run);
    }

    #[test]
    fn forward_moves_along_camera_yaw() {
        let r = resolver(NoObstacles);
        let out = r.step(
            &held(&[IntentFlag::Forward]),
            CharacterTransform::default(),
            0.0,
            0.5,
        );
        assert_eq!(out.outcome, MoveOutcome::Accepted);
        assert!((out.transform.translation - Vector3::new(0.0, 0.0, 1.0)).norm() < EPS);
        assert_eq!(out.tier, AnimationState::Walk);
    }

    #[test]
    fn left_strafe_moves_toward_positive_x_when_facing_z() {
        let r = resolver(NoObstacles);
        let out = r.step(
            &held(&[IntentFlag::Left]),
            CharacterTransform::default(),
            0.0,
            1.0,
        );
        assert!((out.transform.translation - Vector3::new(2.0, 0.0, 0.0)).norm() < 1.0e-4);
        // Full 90 degree turn fits in 7 rad/s * 1 s.
        assert!((out.transform.yaw - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn heading_step_is_bounded_by_rotation_speed() {
        let r = resolver(NoObstacles);
        let dt = 0.02;
        let start = CharacterTransform::default();
        let out = r.step(&held(&[IntentFlag::Backward]), start, 0.0, dt);

        let applied = wrap_angle(out.transform.yaw - start.yaw).abs();
        assert!(applied <= ROTATION_SPEED_RADPS * dt + EPS);
        assert!(applied > 0.0);

        // The move itself already follows the target heading.
        let moved = out.transform.translation.normalize();
        assert!((moved - Vector3::new(PI.sin(), 0.0, PI.cos())).norm() < 1.0e-4);
    }

    #[test]
    fn hit_at_clearance_blocks_but_still_turns() {
        let r = resolver(FixedHit(Some(COLLISION_CLEARANCE_M)));
        let start = CharacterTransform::new(Vector3::new(3.0, 0.0, 3.0), 0.0);
        let out = r.step(&held(&[IntentFlag::Right]), start, 0.0, 0.05);

        assert_eq!(out.outcome, MoveOutcome::Blocked);
        assert_eq!(out.transform.translation, start.translation);
        assert!(out.transform.yaw < 0.0);
        assert_eq!(out.tier, AnimationState::Walk);
    }

    #[test]
    fn hit_beyond_clearance_or_no_hit_accepts() {
        let start = CharacterTransform::default();
        let intent = held(&[IntentFlag::Forward]);

        let above = resolver(FixedHit(Some(COLLISION_CLEARANCE_M + 1.0e-3)));
        assert_eq!(
            above.step(&intent, start, 0.0, 0.1).outcome,
            MoveOutcome::Accepted
        );

        let below = resolver(FixedHit(Some(COLLISION_CLEARANCE_M - 1.0e-3)));
        assert_eq!(
            below.step(&intent, start, 0.0, 0.1).outcome,
            MoveOutcome::Blocked
        );

        let miss = resolver(FixedHit(None));
        assert_eq!(
            miss.step(&intent, start, 0.0, 0.1).outcome,
            MoveOutcome::Accepted
        );
    }

    #[test]
    fn box_obstacle_stops_the_character() {
        use crate::{WorldStaticDef, build_static_query_world};

        // Box spanning z in [1, 3], from below ground up to y = 1.
        let world = build_static_query_world([WorldStaticDef::cuboid(
            1,
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(2.0, 2.0, 2.0),
        )]);
        let r = resolver(&world);
        let intent = held(&[IntentFlag::Forward]);

        let mut transform = CharacterTransform::default();
        for _ in 0..200 {
            transform = r.step(&intent, transform, 0.0, 0.016).transform;
        }
        assert!(transform.translation.z < 1.0);
        assert!(transform.translation.z > 0.9);
    }
}
