//! Conversions between bevy render types and the nalgebra types used by the simulation.

use avatar_shared::{CameraRig, CharacterTransform};
use bevy::prelude::*;
use nalgebra::Vector3;

#[inline]
pub fn to_na(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_na(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Render transform for a committed character pose.
pub fn render_transform(character: &CharacterTransform) -> Transform {
    Transform::from_translation(from_na(&character.translation))
        .with_rotation(Quat::from_rotation_y(character.yaw))
}

/// Snapshot of the live camera. The look-at point is re-derived each moving frame, so only the
/// position matters on the way in.
pub fn rig_from_camera(camera: &Transform, look_at: Vec3) -> CameraRig {
    CameraRig {
        position: to_na(camera.translation),
        look_at: to_na(look_at),
    }
}

/// Write a rig back onto the camera transform.
pub fn apply_rig(camera: &mut Transform, rig: &CameraRig) {
    camera.translation = from_na(&rig.position);
    camera.look_at(from_na(&rig.look_at), Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_rotation_matches_simulation_forward() {
        let pose = CharacterTransform::new(Vector3::new(1.0, 0.0, 2.0), 0.6);
        let tf = render_transform(&pose);
        let forward = tf.rotation * Vec3::Z;
        let expected = pose.rotation() * Vector3::z();
        assert!((to_na(forward) - expected).norm() < 1.0e-5);
        assert_eq!(tf.translation, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn apply_rig_faces_look_target() {
        let mut camera = Transform::default();
        let rig = CameraRig {
            position: Vector3::new(0.0, 2.0, -5.0),
            look_at: Vector3::new(0.0, 1.0, 0.0),
        };
        apply_rig(&mut camera, &rig);
        assert_eq!(camera.translation, Vec3::new(0.0, 2.0, -5.0));
        let dir = (Vec3::new(0.0, 1.0, 0.0) - camera.translation).normalize();
        assert!((camera.forward().as_vec3() - dir).length() < 1.0e-5);
    }
}
