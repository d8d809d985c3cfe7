use rapier3d::{na::UnitQuaternion, prelude::*};

/// Canonical definition of one immutable scene collider.
///
/// The client maps its obstacle table to this type, then builds a
/// [`StaticQueryWorld`](crate::StaticQueryWorld) once at startup.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable identifier used to keep insertion order deterministic.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space). The normal is `rotation * +Y`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

impl WorldStaticDef {
    /// Axis-aligned box obstacle centered at `translation` with full `size`.
    pub fn cuboid(id: u32, translation: Vector<f32>, size: Vector<f32>) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Cuboid {
                half_extents: size * 0.5,
            },
        }
    }

    /// Checks that the definition can be turned into a collider without panicking.
    ///
    /// Checks:
    /// - translation and rotation components are finite
    /// - extents and radii are strictly positive and finite
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.translation.iter().all(|v| v.is_finite()) {
            return Err("Static translation is not finite");
        }
        if !self.rotation.coords.iter().all(|v| v.is_finite()) {
            return Err("Static rotation is not finite");
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        let shape_ok = match &self.shape {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => offset_along_normal.is_finite(),
            ColliderShapeDef::Cuboid { half_extents } => half_extents.iter().all(|&v| positive(v)),
            ColliderShapeDef::Sphere { radius } => positive(*radius),
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            }
            | ColliderShapeDef::CylinderY {
                radius,
                half_height,
            } => positive(*radius) && positive(*half_height),
        };

        if shape_ok {
            Ok(())
        } else {
            Err("Static shape has non-positive or non-finite dimensions")
        }
    }
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The collider's position is local to the definition's pose (identity except for the plane
/// offset); callers compose it with that pose.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The pose is applied by the caller, so the half-space is expressed in local space:
            // normal +Y, shifted along it by the offset.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius).build(),
    }
}
