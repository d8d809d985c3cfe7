//! Debug/performance tooling for native dev builds.
//!
//! Frame diagnostics go to the log. F3 toggles a gizmo overlay with the avatar heading and the
//! ground ray used for obstacle checks.

use avatar_shared::{COLLISION_CLEARANCE_M, heading::yaw_direction};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin,
    SystemInformationDiagnosticsPlugin,
};
use bevy::input::common_conditions::input_just_pressed;
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;

use crate::{FrameSet, player::Avatar, transform::from_na};

const TOGGLE_KEY: KeyCode = KeyCode::F3;

#[derive(Resource, Default)]
struct ShowOverlay(bool);

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        LogDiagnosticsPlugin::default(),
    ));

    app.init_resource::<ShowOverlay>();
    app.add_systems(
        Update,
        (
            toggle_overlay.run_if(input_just_pressed(TOGGLE_KEY)),
            draw_overlay
                .after(FrameSet::Simulate)
                .run_if(|show: Res<ShowOverlay>| show.0),
        ),
    );
}

fn toggle_overlay(mut show: ResMut<ShowOverlay>) {
    show.0 = !show.0;
    info!("Debug overlay {}", if show.0 { "on" } else { "off" });
}

fn draw_overlay(avatar: Single<&Avatar>, mut gizmos: Gizmos) {
    let transform = avatar.0.transform();
    let feet = from_na(&transform.translation);
    let heading = from_na(&yaw_direction(transform.yaw));
    let chest = feet + Vec3::Y;

    gizmos.arrow(chest, chest + heading, Color::srgb(0.2, 0.9, 0.3));
    gizmos.line(feet, feet - Vec3::Y * 2.0, Color::srgb(0.9, 0.3, 0.2));
    gizmos.circle(
        Isometry3d::new(feet, Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        COLLISION_CLEARANCE_M,
        Color::srgb(0.9, 0.8, 0.2),
    );
}
