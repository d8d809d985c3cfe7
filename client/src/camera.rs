use avatar_shared::{CameraFollower, CharacterTransform};
use bevy::prelude::*;

use crate::{
    settings::ViewerSettings,
    transform::{from_na, to_na},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
}

/// Place the camera at the follower's target for the spawn pose so the first frame does not
/// swing in from the origin.
fn add_camera(mut commands: Commands, settings: Res<ViewerSettings>) {
    let follower = CameraFollower::new(settings.camera);
    let spawn = CharacterTransform::new(to_na(settings.spawn_translation), 0.0);
    let eye = from_na(&follower.target_position(&spawn));
    let look = from_na(&follower.look_target(&spawn));

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(eye).looking_at(look, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}
