use crate::{
    AnimationStateMachine, BlendProfile, CameraFollower, CameraRig, CameraSettings,
    CharacterTransform, ClipHandle, ClipSet, GroundProbe, IntentFlag, LocomotionResolver,
    LocomotionSettings, MovementIntent, StepMovementResult, Transition, heading::view_yaw,
};

/// What happened during one [`CharacterController::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub step: StepMovementResult,
    /// `None` when no tier change fired or no clips are attached yet.
    pub transition: Option<Transition>,
    pub camera_moved: bool,
}

/// Owns the per-character frame pipeline: intent, transform, clips and camera follow.
///
/// The frame order is fixed: resolve movement first, then drive animation and the camera from
/// the committed transform.
pub struct CharacterController<G, H> {
    intent: MovementIntent,
    transform: CharacterTransform,
    resolver: LocomotionResolver<G>,
    animation: Option<AnimationStateMachine<H>>,
    blend_profile: BlendProfile,
    camera: CameraFollower,
}

impl<G: GroundProbe, H: ClipHandle> CharacterController<G, H> {
    pub fn new(
        geometry: G,
        transform: CharacterTransform,
        locomotion: LocomotionSettings,
        camera: CameraSettings,
        blend_profile: BlendProfile,
    ) -> Self {
        Self {
            intent: MovementIntent::default(),
            transform,
            resolver: LocomotionResolver::new(locomotion, geometry),
            animation: None,
            blend_profile,
            camera: CameraFollower::new(camera),
        }
    }

    /// Controller with default tuning at `transform`.
    pub fn with_defaults(geometry: G, transform: CharacterTransform) -> Self {
        Self::new(
            geometry,
            transform,
            LocomotionSettings::default(),
            CameraSettings::default(),
            BlendProfile::default(),
        )
    }

    /// Hand over the clip handles once the model's clips are available.
    pub fn attach_animations(&mut self, clips: ClipSet<H>) {
        self.animation = Some(AnimationStateMachine::new(clips, self.blend_profile));
    }

    pub fn animation(&self) -> Option<&AnimationStateMachine<H>> {
        self.animation.as_ref()
    }

    pub fn intent(&self) -> &MovementIntent {
        &self.intent
    }

    pub fn transform(&self) -> &CharacterTransform {
        &self.transform
    }

    pub fn camera(&self) -> &CameraFollower {
        &self.camera
    }

    /// Forward a key edge that has already been mapped to a logical flag (or not).
    pub fn on_key_edge(&mut self, flag: Option<IntentFlag>, pressed: bool) {
        self.intent.on_key_edge(flag, pressed);
    }

    pub fn release_all(&mut self) {
        self.intent.clear();
    }

    /// Run one frame. `rig` is the live camera; its position also defines the view yaw.
    pub fn update(&mut self, dt: f32, rig: &mut CameraRig) -> FrameReport {
        let camera_yaw =
            view_yaw(&rig.position, &self.transform.translation).unwrap_or(self.transform.yaw);

        let previous = self.transform.translation;
        let step = self
            .resolver
            .step(&self.intent, self.transform, camera_yaw, dt);
        self.transform = step.transform;

        let transition = self.animation.as_mut().and_then(|machine| {
            let tier = match machine.profile() {
                BlendProfile::Controller { .. } => step.tier,
                profile @ BlendProfile::SpeedDriven { .. } => {
                    // Measured, so a blocked move reads as standing still.
                    let measured = if dt > 0.0 {
                        (step.transform.translation - previous).norm() / dt
                    } else {
                        0.0
                    };
                    profile.tier_for(measured, self.resolver.settings().run_speed)
                }
            };
            machine.update(tier, dt)
        });

        let camera_moved = self
            .camera
            .follow(rig, &self.transform, step.is_moving(), dt);

        FrameReport {
            step,
            transition,
            camera_moved,
        }
    }
}
