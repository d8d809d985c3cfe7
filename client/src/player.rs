use std::sync::Arc;

use avatar_shared::{
    AnimationState, CharacterController, CharacterTransform, ClipPlayback, ClipSet,
    StaticQueryWorld,
};
use bevy::prelude::*;

use crate::{
    FrameSet,
    level::{self, SceneColliders},
    settings::ViewerSettings,
    transform::{apply_rig, render_transform, rig_from_camera, to_na},
};

pub type AvatarController = CharacterController<Arc<StaticQueryWorld>, ClipPlayback>;

/// The user-controlled character and its frame pipeline.
#[derive(Component)]
pub struct Avatar(pub AvatarController);

/// Clip asset handles requested for the avatar, consumed once they have loaded.
#[derive(Component, Debug, Clone)]
pub struct AvatarClips(pub ClipSet<Handle<AnimationClip>>);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_avatar.after(level::setup));
    app.add_systems(Update, drive_character.in_set(FrameSet::Simulate));
}

fn spawn_avatar(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
    colliders: Res<SceneColliders>,
) {
    let start = CharacterTransform::new(to_na(settings.spawn_translation), 0.0);
    let controller = AvatarController::new(
        colliders.0.clone(),
        start,
        settings.locomotion,
        settings.camera,
        settings.blend,
    );

    let clips = ClipSet::from_fn(|state: AnimationState| {
        asset_server.load(
            GltfAssetLabel::Animation(settings.clip_index(state)).from_asset(settings.model_path),
        )
    });

    commands.spawn((
        Name::new("Avatar"),
        Avatar(controller),
        AvatarClips(clips),
        render_transform(&start),
        SceneRoot(
            asset_server.load(GltfAssetLabel::Scene(0).from_asset(settings.model_path)),
        ),
    ));
    info!("Spawned avatar from {}", settings.model_path);
}

/// One frame of locomotion, clip selection and camera follow.
fn drive_character(
    time: Res<Time>,
    avatar: Single<(&mut Avatar, &mut Transform), Without<Camera3d>>,
    mut camera: Single<&mut Transform, With<Camera3d>>,
) {
    let (mut avatar, mut avatar_tf) = avatar.into_inner();
    let look_at = avatar_tf.translation;
    let mut rig = rig_from_camera(&camera, look_at);

    let report = avatar.0.update(time.delta_secs(), &mut rig);

    if report.step.is_moving() {
        *avatar_tf = render_transform(avatar.0.transform());
    }
    if report.camera_moved {
        apply_rig(&mut camera, &rig);
    }
    if let Some(transition) = report.transition {
        debug!("Avatar clip {:?} -> {:?}", transition.from, transition.to);
    }
}

#[cfg(test)]
pub(crate) fn test_avatar() -> Avatar {
    Avatar(AvatarController::with_defaults(
        Arc::new(avatar_shared::build_static_query_world([])),
        CharacterTransform::default(),
    ))
}
