//! Yaw helpers: 8-way direction offsets, shortest-arc turning and camera view yaw.
//!
//! Convention: a yaw of `0` faces +Z and positive yaw turns toward +X, so a yaw `y` faces
//! `(sin y, 0, cos y)`.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use nalgebra::{UnitQuaternion, Vector3};

use crate::{MovementIntent, YAW_EPS};

/// Heading offset (radians) relative to the camera view yaw for the held directional flags.
///
/// Branch priority is forward, then backward, then left, then right. Inside the forward and
/// backward branches left is checked before right. So opposing flags resolve deterministically:
/// forward+backward acts as forward, left+right acts as left.
pub fn direction_offset(intent: &MovementIntent) -> f32 {
    if intent.forward() {
        if intent.left() {
            FRAC_PI_4
        } else if intent.right() {
            -FRAC_PI_4
        } else {
            0.0
        }
    } else if intent.backward() {
        if intent.left() {
            FRAC_PI_4 + FRAC_PI_2
        } else if intent.right() {
            -FRAC_PI_4 - FRAC_PI_2
        } else {
            PI
        }
    } else if intent.left() {
        FRAC_PI_2
    } else if intent.right() {
        -FRAC_PI_2
    } else {
        0.0
    }
}

/// Wrap an angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Turn `current` toward `target` along the shortest arc by at most `max_step` radians.
///
/// The result is wrapped into `(-PI, PI]`.
#[inline]
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let max_step = max_step.max(0.0);
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_step {
        return wrap_angle(target);
    }
    wrap_angle(current + max_step.copysign(delta))
}

/// Planar direction for a yaw.
#[inline]
pub fn yaw_direction(yaw: f32) -> Vector3<f32> {
    Vector3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw-only rotation about +Y.
#[inline]
pub fn yaw_to_quat(yaw: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
}

/// Yaw the camera looks along, projected on the ground plane.
///
/// Returns `None` when camera and character share the same XZ position.
pub fn view_yaw(camera: &Vector3<f32>, character: &Vector3<f32>) -> Option<f32> {
    let dx = character.x - camera.x;
    let dz = character.z - camera.z;
    if dx * dx + dz * dz <= YAW_EPS {
        return None;
    }
    Some(dx.atan2(dz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntentFlag;

    const EPS: f32 = 1.0e-5;

    fn intent(flags: &[IntentFlag]) -> MovementIntent {
        let mut intent = MovementIntent::default();
        for &flag in flags {
            intent.on_flag_edge(flag, true);
        }
        intent
    }

    #[test]
    fn eight_way_offsets_match_table() {
        use IntentFlag::*;
        let table: &[(&[IntentFlag], f32)] = &[
            (&[Forward], 0.0),
            (&[Forward, Left], 45.0),
            (&[Forward, Right], -45.0),
            (&[Backward], 180.0),
            (&[Backward, Left], 135.0),
            (&[Backward, Right], -135.0),
            (&[Left], 90.0),
            (&[Right], -90.0),
        ];
        for (flags, degrees) in table {
            let got = direction_offset(&intent(flags)).to_degrees();
            assert!((got - degrees).abs() < 1.0e-3, "{flags:?}: {got} != {degrees}");
        }
    }

    #[test]
    fn opposing_flags_follow_branch_priority() {
        use IntentFlag::*;
        assert_eq!(direction_offset(&intent(&[Forward, Backward])), 0.0);
        assert_eq!(direction_offset(&intent(&[Left, Right])), FRAC_PI_2);
        assert_eq!(direction_offset(&intent(&[Forward, Left, Right])), FRAC_PI_4);
        assert_eq!(
            direction_offset(&intent(&[Backward, Left, Right])),
            FRAC_PI_4 + FRAC_PI_2
        );
        // Sprint never changes the direction.
        assert_eq!(direction_offset(&intent(&[Sprint, Right])), -FRAC_PI_2);
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        for raw in [-10.0_f32, -PI, -3.0, 0.0, 3.0, PI, 7.0, 20.0] {
            let w = wrap_angle(raw);
            assert!(w > -PI - EPS && w <= PI + EPS, "{raw} -> {w}");
            assert!((w.sin() - raw.sin()).abs() < 1.0e-4);
            assert!((w.cos() - raw.cos()).abs() < 1.0e-4);
        }
    }

    #[test]
    fn rotate_towards_never_overshoots() {
        let cases = [
            (0.0_f32, 3.0_f32, 0.1_f32),
            (0.0, -3.0, 0.5),
            (3.0, -3.0, 0.05),
            (-2.5, 2.5, 0.2),
            (1.0, 1.2, 7.0),
        ];
        for (current, target, step) in cases {
            let next = rotate_towards(current, target, step);
            let applied = wrap_angle(next - current).abs();
            assert!(applied <= step + EPS, "{current}->{target}: {applied} > {step}");

            let before = wrap_angle(target - current).abs();
            let after = wrap_angle(target - next).abs();
            assert!(after <= before + EPS);
        }
    }

    #[test]
    fn rotate_towards_takes_shortest_arc_across_pi() {
        // 3.0 -> -3.0 is a 0.283 rad turn through PI, not 6 rad the long way.
        let next = rotate_towards(3.0, -3.0, 0.1);
        assert!((next - 3.1).abs() < EPS);
        let done = rotate_towards(3.0, -3.0, 1.0);
        assert!((done + 3.0).abs() < EPS);
    }

    #[test]
    fn view_yaw_points_from_camera_to_character() {
        let character = Vector3::new(0.0, 0.0, 0.0);
        let behind = Vector3::new(0.0, 2.0, -5.0);
        let yaw = view_yaw(&behind, &character).unwrap();
        assert!(yaw.abs() < EPS);

        let from_left = Vector3::new(-5.0, 2.0, 0.0);
        let yaw = view_yaw(&from_left, &character).unwrap();
        assert!((yaw - FRAC_PI_2).abs() < EPS);

        assert!(view_yaw(&Vector3::new(0.0, 3.0, 0.0), &character).is_none());
    }

    #[test]
    fn yaw_quaternion_rotates_forward_onto_yaw_direction() {
        let yaw = 0.7;
        let rotated = yaw_to_quat(yaw) * Vector3::z();
        assert!((rotated - yaw_direction(yaw)).norm() < EPS);
    }
}
