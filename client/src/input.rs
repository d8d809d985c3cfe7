use avatar_shared::IntentFlag;
use bevy::prelude::*;

use crate::{FrameSet, player::Avatar};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, read_key_edges.in_set(FrameSet::Input));
}

/// Physical key to logical intent flag. Letter and arrow keys share a flag.
pub fn intent_flag_for_key(key: KeyCode) -> Option<IntentFlag> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(IntentFlag::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(IntentFlag::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(IntentFlag::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(IntentFlag::Right),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(IntentFlag::Sprint),
        _ => None,
    }
}

/// Feed this frame's press and release edges into the avatar's intent.
fn read_key_edges(keys: Res<ButtonInput<KeyCode>>, mut avatar: Single<&mut Avatar>) {
    for key in keys.get_just_pressed() {
        avatar.0.on_key_edge(intent_flag_for_key(*key), true);
    }
    for key in keys.get_just_released() {
        avatar.0.on_key_edge(intent_flag_for_key(*key), false);
    }
}
