//! Downward ground-ray queries against the static scene.

use std::sync::Arc;

use nalgebra::{Isometry3, Translation3, Vector3};
use rapier3d::prelude::{
    BroadPhaseBvh, ColliderSet, IntegrationParameters, NarrowPhase, QueryFilter, QueryPipeline,
    Ray, RigidBodySet,
};

use crate::{GROUND_RAY_MAX_DISTANCE_M, WorldStaticDef, collider_from_def};

/// Scene collaborator answering "what is directly below this point?".
///
/// Implementations return the distance to the nearest hit along `-Y` starting at `origin`, or
/// `None` when nothing is hit. A ray starting inside a solid reports `Some(0.0)`.
pub trait GroundProbe {
    fn ground_hit_distance(&self, origin: &Vector3<f32>) -> Option<f32>;
}

/// A scene without collidable geometry. Every ray misses.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoObstacles;

impl GroundProbe for NoObstacles {
    fn ground_hit_distance(&self, _origin: &Vector3<f32>) -> Option<f32> {
        None
    }
}

impl<T: GroundProbe + ?Sized> GroundProbe for &T {
    fn ground_hit_distance(&self, origin: &Vector3<f32>) -> Option<f32> {
        (**self).ground_hit_distance(origin)
    }
}

impl<T: GroundProbe + ?Sized> GroundProbe for Arc<T> {
    fn ground_hit_distance(&self, origin: &Vector3<f32>) -> Option<f32> {
        (**self).ground_hit_distance(origin)
    }
}

impl<T: GroundProbe> GroundProbe for Option<T> {
    fn ground_hit_distance(&self, origin: &Vector3<f32>) -> Option<f32> {
        self.as_ref()
            .and_then(|probe| probe.ground_hit_distance(origin))
    }
}

/// In-memory Rapier structures for ray queries against immutable statics.
///
/// Built once at startup and only read afterwards.
pub struct StaticQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticQueryWorld {
    pub fn as_query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl GroundProbe for StaticQueryWorld {
    fn ground_hit_distance(&self, origin: &Vector3<f32>) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let ray = Ray::new((*origin).into(), -Vector3::y());
        self.as_query_pipeline(QueryFilter::default())
            .cast_ray(&ray, GROUND_RAY_MAX_DISTANCE_M, true)
            .map(|(_handle, toi)| toi)
    }
}

/// Build the query world from static collider definitions.
///
/// Definitions are inserted sorted by `id`. Invalid definitions are skipped with a warning
/// rather than aborting the scene.
pub fn build_static_query_world(
    world_statics: impl IntoIterator<Item = WorldStaticDef>,
) -> StaticQueryWorld {
    let mut defs: Vec<WorldStaticDef> = world_statics.into_iter().collect();
    defs.sort_by_key(|d| d.id);

    let bodies = RigidBodySet::new();
    let mut colliders = ColliderSet::new();
    let mut modified_colliders = Vec::with_capacity(defs.len());

    for def in &defs {
        if let Err(reason) = def.validate() {
            log::warn!("Skipping static collider {}: {}", def.id, reason);
            continue;
        }
        let mut collider = collider_from_def(def);
        let pose = Isometry3::from_parts(Translation3::from(def.translation), def.rotation);
        let local = *collider.position();
        collider.set_position(pose * local);
        modified_colliders.push(colliders.insert(collider));
    }

    let mut broad_phase = BroadPhaseBvh::new();
    let mut events = Vec::new();
    broad_phase.update(
        &IntegrationParameters::default(),
        &colliders,
        &bodies,
        &modified_colliders,
        &[],
        &mut events,
    );

    log::debug!("Built static query world with {} colliders", colliders.len());

    StaticQueryWorld {
        bodies,
        colliders,
        broad_phase,
        narrow_phase: NarrowPhase::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColliderShapeDef;
    use nalgebra::UnitQuaternion;

    fn unit_box_world() -> StaticQueryWorld {
        // 2x2x2 box centered at the origin: top face at y = 1.
        build_static_query_world([WorldStaticDef::cuboid(
            1,
            Vector3::zeros(),
            Vector3::new(2.0, 2.0, 2.0),
        )])
    }

    #[test]
    fn ray_above_box_reports_distance_to_top_face() {
        let world = unit_box_world();
        let hit = world
            .ground_hit_distance(&Vector3::new(0.0, 3.0, 0.0))
            .expect("box is below");
        assert!((hit - 2.0).abs() < 1.0e-4);
    }

    #[test]
    fn ray_beside_box_misses() {
        let world = unit_box_world();
        assert_eq!(world.ground_hit_distance(&Vector3::new(5.0, 3.0, 0.0)), None);
    }

    #[test]
    fn ray_starting_inside_box_is_zero() {
        let world = unit_box_world();
        let hit = world.ground_hit_distance(&Vector3::new(0.0, 0.5, 0.0));
        assert_eq!(hit, Some(0.0));
    }

    #[test]
    fn plane_offset_survives_pose() {
        let world = build_static_query_world([WorldStaticDef {
            id: 1,
            translation: Vector3::new(0.0, -1.0, 0.0),
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.5,
            },
        }]);
        let hit = world
            .ground_hit_distance(&Vector3::new(3.0, 1.0, -2.0))
            .expect("plane is below");
        assert!((hit - 1.5).abs() < 1.0e-4);
    }

    #[test]
    fn invalid_defs_are_skipped() {
        let world = build_static_query_world([
            WorldStaticDef::cuboid(2, Vector3::zeros(), Vector3::new(0.0, 1.0, 1.0)),
            WorldStaticDef::cuboid(1, Vector3::new(4.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)),
        ]);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn empty_world_and_missing_probe_never_hit() {
        let origin = Vector3::new(0.0, 1.0, 0.0);
        assert!(build_static_query_world([]).ground_hit_distance(&origin).is_none());
        assert!(NoObstacles.ground_hit_distance(&origin).is_none());
        assert!(None::<NoObstacles>.ground_hit_distance(&origin).is_none());
    }
}
