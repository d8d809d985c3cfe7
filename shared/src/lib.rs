pub mod animation;
pub mod bitmask_flags;
pub mod camera;
pub mod constants;
pub mod controller;
pub mod ground;
pub mod heading;
pub mod intent;
pub mod movement;
pub mod rapier;

pub use animation::{
    AnimationState, AnimationStateMachine, BlendProfile, ClipHandle, ClipPlayback, ClipSet,
    Transition,
};
pub use camera::{CameraEasing, CameraFollower, CameraRig, CameraSettings};
pub use constants::{
    CAMERA_LERP_FACTOR, CAMERA_LOOK_HEIGHT_M, CAMERA_OFFSET_LOCAL, CAMERA_REFERENCE_FPS,
    COLLISION_CLEARANCE_M, CONTROLLER_FADE_SECS, GROUND_RAY_MAX_DISTANCE_M, ROTATION_SPEED_RADPS,
    RUN_SPEED_MPS, SPEED_DRIVEN_FADE_SECS, SPEED_DRIVEN_RUN_THRESHOLD_MPS,
    SPEED_DRIVEN_WALK_THRESHOLD_MPS, WALK_SPEED_MPS, YAW_EPS,
};
pub use controller::{CharacterController, FrameReport};
pub use ground::{GroundProbe, NoObstacles, StaticQueryWorld, build_static_query_world};
pub use intent::{IntentFlag, MovementIntent};
pub use movement::{
    CharacterTransform, LocomotionResolver, LocomotionSettings, MoveOutcome, StepMovementResult,
};
pub use rapier::{ColliderShapeDef, WorldStaticDef, collider_from_def};
