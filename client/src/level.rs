use std::sync::Arc;

use avatar_shared::{StaticQueryWorld, WorldStaticDef, build_static_query_world};
use bevy::prelude::*;

use crate::transform::to_na;

/// Side length of the (visual only) ground plane.
const GROUND_SIZE: f32 = 30.0;

/// Obstacle boxes as `(center, full size)`.
///
/// Each box is sunk slightly into the ground so a character standing at `y = 0` is inside it
/// and the ground ray reports a zero distance.
const OBSTACLES: [(Vec3, Vec3); 3] = [
    (Vec3::new(-5.0, 0.75, -5.0), Vec3::new(2.0, 2.0, 2.0)),
    (Vec3::new(5.0, 1.75, -3.0), Vec3::new(2.0, 4.0, 2.0)),
    (Vec3::new(0.0, 0.25, -8.0), Vec3::new(4.0, 1.0, 4.0)),
];

/// Static collision geometry shared with the character controller.
///
/// Built once in `Startup`, read-only afterwards.
#[derive(Resource, Clone)]
pub struct SceneColliders(pub Arc<StaticQueryWorld>);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

/// Obstacle collider definitions. The ground plane is deliberately absent: walking over it must
/// never be blocked.
pub fn obstacle_defs() -> impl Iterator<Item = WorldStaticDef> {
    OBSTACLES
        .iter()
        .enumerate()
        .map(|(i, (center, size))| WorldStaticDef::cuboid(i as u32, to_na(*center), to_na(*size)))
}

pub(super) fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(48, 48, 48),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    let obstacle_material = materials.add(Color::srgb_u8(102, 102, 102));
    for (center, size) in OBSTACLES {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(obstacle_material.clone()),
            Transform::from_translation(center),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let world = build_static_query_world(obstacle_defs());
    info!("Scene ready with {} obstacle colliders", world.len());
    commands.insert_resource(SceneColliders(Arc::new(world)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatar_shared::GroundProbe;

    #[test]
    fn obstacles_block_from_inside_and_open_ground_does_not() {
        let world = build_static_query_world(obstacle_defs());
        assert_eq!(world.len(), OBSTACLES.len());

        for (center, _) in OBSTACLES {
            let feet = to_na(Vec3::new(center.x, 0.0, center.z));
            assert_eq!(world.ground_hit_distance(&feet), Some(0.0));
        }

        let open = to_na(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(world.ground_hit_distance(&open), None);
    }
}
