/// Planar walking speed (meters per second).
pub const WALK_SPEED_MPS: f32 = 2.0;

/// Planar running speed while sprint is held (meters per second).
pub const RUN_SPEED_MPS: f32 = 4.0;

/// Maximum heading change per second while turning toward the intended direction (radians).
pub const ROTATION_SPEED_RADPS: f32 = 7.0;

/// Ground-ray clearance (meters).
///
/// A candidate move whose downward ray hits something at a distance `<=` this value is rejected.
pub const COLLISION_CLEARANCE_M: f32 = 0.5;

/// Upper bound for the downward ground ray (meters). Hits farther away than this count as "no hit".
pub const GROUND_RAY_MAX_DISTANCE_M: f32 = 1_000.0;

/// Camera offset in the character's local heading frame: behind and above.
pub const CAMERA_OFFSET_LOCAL: [f32; 3] = [0.0, 2.0, -5.0];

/// Fraction of the remaining camera distance covered per frame.
pub const CAMERA_LERP_FACTOR: f32 = 0.1;

/// Height above the character origin the camera looks at (meters).
pub const CAMERA_LOOK_HEIGHT_M: f32 = 1.0;

/// Frame rate the per-frame camera factor was tuned against.
pub const CAMERA_REFERENCE_FPS: f32 = 60.0;

/// Cross-fade duration for tier changes requested by the controller (seconds).
pub const CONTROLLER_FADE_SECS: f32 = 0.5;

/// Cross-fade duration for tier changes derived from a measured speed (seconds).
pub const SPEED_DRIVEN_FADE_SECS: f32 = 0.2;

/// Measured speed above which the speed-driven profile selects the run clip (m/s).
pub const SPEED_DRIVEN_RUN_THRESHOLD_MPS: f32 = 0.5;

/// Measured speed above which the speed-driven profile selects the walk clip (m/s).
pub const SPEED_DRIVEN_WALK_THRESHOLD_MPS: f32 = 0.1;

/// Minimum planar distance (squared) between camera and character to derive a view yaw.
pub const YAW_EPS: f32 = 1.0e-6;
