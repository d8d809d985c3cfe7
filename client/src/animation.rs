//! Bridges the simulated clip handles onto bevy's `AnimationPlayer`.
//!
//! The avatar's [`ClipPlayback`] handles own time, fades and warps. Bevy only renders: every
//! node is paused and seeked to the handle's cursor each frame, weighted by its effective weight.

use avatar_shared::{ClipHandle, ClipPlayback, ClipSet};
use bevy::prelude::*;

use crate::{
    FrameSet,
    player::{Avatar, AvatarClips},
};

/// Links an avatar to the scene entity holding its `AnimationPlayer`.
#[derive(Component, Debug, Clone)]
pub struct AvatarAnimation {
    pub player_entity: Entity,
    pub nodes: ClipSet<AnimationNodeIndex>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, attach_clips.before(FrameSet::Input));
    app.add_systems(Update, sync_players.in_set(FrameSet::Present));
}

fn attach_clips(
    mut commands: Commands,
    clip_assets: Res<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut avatars: Query<(Entity, &mut Avatar, &AvatarClips), Without<AvatarAnimation>>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for (entity, mut avatar, clips) in &mut avatars {
        let (Some(idle), Some(walk), Some(run)) = (
            clip_assets.get(&clips.0.idle),
            clip_assets.get(&clips.0.walk),
            clip_assets.get(&clips.0.run),
        ) else {
            trace!("Waiting for avatar clips");
            continue;
        };
        let durations = ClipSet {
            idle: idle.duration(),
            walk: walk.duration(),
            run: run.duration(),
        };

        // The scene spawns asynchronously; the player shows up some frames after the clips.
        let Some(player_entity) = find_player(entity, &children, &players) else {
            continue;
        };

        let (graph, node_list) = AnimationGraph::from_clips([
            clips.0.idle.clone(),
            clips.0.walk.clone(),
            clips.0.run.clone(),
        ]);
        let &[idle_node, walk_node, run_node] = node_list.as_slice() else {
            warn!("Animation graph for avatar has {} nodes", node_list.len());
            continue;
        };
        let nodes = ClipSet {
            idle: idle_node,
            walk: walk_node,
            run: run_node,
        };

        let Ok(mut player) = players.get_mut(player_entity) else {
            continue;
        };
        for (_, node) in nodes.iter() {
            player.play(*node).repeat().set_weight(0.0).pause();
        }

        avatar
            .0
            .attach_animations(ClipSet::from_fn(|state| {
                ClipPlayback::new(*durations.get(state))
            }));

        commands
            .entity(player_entity)
            .insert(AnimationGraphHandle(graphs.add(graph)));
        commands
            .entity(entity)
            .insert(AvatarAnimation {
                player_entity,
                nodes,
            })
            .remove::<AvatarClips>();
        info!(
            "Avatar clips attached (idle {:.2}s, walk {:.2}s, run {:.2}s)",
            durations.idle, durations.walk, durations.run
        );
    }
}

fn find_player(
    root: Entity,
    children: &Query<&Children>,
    players: &Query<&mut AnimationPlayer>,
) -> Option<Entity> {
    if players.contains(root) {
        return Some(root);
    }
    children
        .iter_descendants(root)
        .find(|entity| players.contains(*entity))
}

/// Copy each handle's weight and cursor onto its player node.
fn sync_players(
    avatars: Query<(&Avatar, &AvatarAnimation)>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for (avatar, link) in &avatars {
        let Some(machine) = avatar.0.animation() else {
            continue;
        };
        let Ok(mut player) = players.get_mut(link.player_entity) else {
            continue;
        };
        for ((_, handle), (_, node)) in machine.clips().iter().zip(link.nodes.iter()) {
            if let Some(active) = player.animation_mut(*node) {
                active
                    .set_weight(handle.effective_weight())
                    .seek_to(handle.time());
            }
        }
    }
}
