use avatar_shared::{AnimationState, BlendProfile, CameraSettings, ClipSet, LocomotionSettings};
use bevy::prelude::*;

/// Character model with embedded idle/walk/run clips.
pub const CHARACTER_MODEL_PATH: &str = "models/character.glb";

/// Index of each locomotion clip among the model's glTF animations.
pub const CLIP_INDICES: ClipSet<usize> = ClipSet {
    idle: 0,
    walk: 3,
    run: 1,
};

/// Viewer-wide tuning, read when the avatar and camera are spawned.
#[derive(Resource, Debug, Clone)]
pub struct ViewerSettings {
    pub model_path: &'static str,
    pub clip_indices: ClipSet<usize>,
    pub spawn_translation: Vec3,
    pub locomotion: LocomotionSettings,
    pub camera: CameraSettings,
    pub blend: BlendProfile,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            model_path: CHARACTER_MODEL_PATH,
            clip_indices: CLIP_INDICES,
            spawn_translation: Vec3::ZERO,
            locomotion: LocomotionSettings::default(),
            camera: CameraSettings::default(),
            blend: BlendProfile::default(),
        }
    }
}

impl ViewerSettings {
    pub fn clip_index(&self, state: AnimationState) -> usize {
        *self.clip_indices.get(state)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ViewerSettings>();
}
