use nalgebra::Vector3;

use crate::{
    CAMERA_LERP_FACTOR, CAMERA_LOOK_HEIGHT_M, CAMERA_OFFSET_LOCAL, CAMERA_REFERENCE_FPS,
    CharacterTransform,
};

/// Live camera pose, copied in from and back out to the render surface each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraRig {
    pub position: Vector3<f32>,
    pub look_at: Vector3<f32>,
}

/// How the follower eases toward its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraEasing {
    /// Fixed fraction per frame. Smoothness depends on frame rate.
    PerFrame,
    /// The per-frame factor re-expressed as exponential decay tuned for `reference_fps`.
    TimeNormalized { reference_fps: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Offset in the character's heading frame.
    pub offset: Vector3<f32>,
    pub lerp_factor: f32,
    pub look_height: f32,
    pub easing: CameraEasing,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset: Vector3::from(CAMERA_OFFSET_LOCAL),
            lerp_factor: CAMERA_LERP_FACTOR,
            look_height: CAMERA_LOOK_HEIGHT_M,
            easing: CameraEasing::PerFrame,
        }
    }
}

impl CameraSettings {
    pub fn time_normalized() -> Self {
        Self {
            easing: CameraEasing::TimeNormalized {
                reference_fps: CAMERA_REFERENCE_FPS,
            },
            ..Self::default()
        }
    }
}

/// Eases the camera toward a point behind the character while it moves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraFollower {
    settings: CameraSettings,
}

impl CameraFollower {
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Where the camera wants to be for `transform`.
    pub fn target_position(&self, transform: &CharacterTransform) -> Vector3<f32> {
        transform.translation + transform.rotation() * self.settings.offset
    }

    /// Eye-height point above the character.
    pub fn look_target(&self, transform: &CharacterTransform) -> Vector3<f32> {
        transform.translation + Vector3::new(0.0, self.settings.look_height, 0.0)
    }

    /// Interpolation factor used this frame.
    pub fn frame_factor(&self, dt: f32) -> f32 {
        let f = self.settings.lerp_factor.clamp(0.0, 1.0);
        match self.settings.easing {
            CameraEasing::PerFrame => f,
            CameraEasing::TimeNormalized { reference_fps } => {
                1.0 - (1.0 - f).powf(dt.max(0.0) * reference_fps.max(0.0))
            }
        }
    }

    /// Ease `rig` toward the character. While stationary the rig holds its last pose.
    ///
    /// Returns whether the rig was touched.
    pub fn follow(
        &self,
        rig: &mut CameraRig,
        transform: &CharacterTransform,
        moving: bool,
        dt: f32,
    ) -> bool {
        if !moving {
            return false;
        }
        let target = self.target_position(transform);
        rig.position = rig.position.lerp(&target, self.frame_factor(dt));
        rig.look_at = self.look_target(transform);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn stationary_character_never_moves_camera() {
        let follower = CameraFollower::default();
        let rig0 = CameraRig {
            position: Vector3::new(4.0, 3.0, 2.0),
            look_at: Vector3::new(0.0, 1.0, 0.0),
        };
        let mut rig = rig0;
        let transform = CharacterTransform::new(Vector3::new(10.0, 0.0, 10.0), 1.0);
        for _ in 0..10 {
            assert!(!follower.follow(&mut rig, &transform, false, 0.016));
        }
        assert_eq!(rig, rig0);
    }

    #[test]
    fn target_sits_behind_character_heading() {
        let follower = CameraFollower::default();
        let facing_z = CharacterTransform::default();
        assert!((follower.target_position(&facing_z) - Vector3::new(0.0, 2.0, -5.0)).norm() < EPS);

        let facing_x = CharacterTransform::new(Vector3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert!((follower.target_position(&facing_x) - Vector3::new(-4.0, 2.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn per_frame_easing_moves_a_fixed_fraction() {
        let follower = CameraFollower::default();
        let mut rig = CameraRig::default();
        let transform = CharacterTransform::default();

        assert!(follower.follow(&mut rig, &transform, true, 0.5));
        let expected = Vector3::new(0.0, 2.0, -5.0) * CAMERA_LERP_FACTOR;
        assert!((rig.position - expected).norm() < EPS);
        assert!((rig.look_at - Vector3::new(0.0, CAMERA_LOOK_HEIGHT_M, 0.0)).norm() < EPS);
    }

    #[test]
    fn time_normalized_easing_matches_per_frame_at_reference_rate() {
        let follower = CameraFollower::new(CameraSettings::time_normalized());
        let at_ref = follower.frame_factor(1.0 / CAMERA_REFERENCE_FPS);
        assert!((at_ref - CAMERA_LERP_FACTOR).abs() < 1.0e-4);

        // Two half-length frames cover the same distance as one reference frame.
        let half = follower.frame_factor(0.5 / CAMERA_REFERENCE_FPS);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - at_ref).abs() < 1.0e-4);
        assert_eq!(follower.frame_factor(0.0), 0.0);
    }
}
