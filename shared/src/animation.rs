//! Clip playback handles and the idle/walk/run cross-fade state machine.

use crate::{
    CONTROLLER_FADE_SECS, SPEED_DRIVEN_FADE_SECS, SPEED_DRIVEN_RUN_THRESHOLD_MPS,
    SPEED_DRIVEN_WALK_THRESHOLD_MPS,
};

/// The closed set of locomotion clips. Doubles as the speed tier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Walk,
    Run,
}

impl AnimationState {
    pub const ALL: [AnimationState; 3] = [
        AnimationState::Idle,
        AnimationState::Walk,
        AnimationState::Run,
    ];

    /// Tier for a speed requested by the controller: `0` is idle, exactly `run_speed` is run,
    /// anything else walks.
    #[inline]
    pub fn from_controller_speed(speed: f32, run_speed: f32) -> Self {
        if speed == 0.0 {
            AnimationState::Idle
        } else if speed == run_speed {
            AnimationState::Run
        } else {
            AnimationState::Walk
        }
    }

    /// Tier for a measured speed, using fixed thresholds.
    #[inline]
    pub fn from_measured_speed(speed: f32) -> Self {
        if speed > SPEED_DRIVEN_RUN_THRESHOLD_MPS {
            AnimationState::Run
        } else if speed > SPEED_DRIVEN_WALK_THRESHOLD_MPS {
            AnimationState::Walk
        } else {
            AnimationState::Idle
        }
    }
}

/// One value per [`AnimationState`]. Lookups are exhaustive, so there is no missing-clip case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipSet<T> {
    pub idle: T,
    pub walk: T,
    pub run: T,
}

impl<T> ClipSet<T> {
    /// Build a set by calling `f` once per state, in `Idle, Walk, Run` order.
    pub fn from_fn(mut f: impl FnMut(AnimationState) -> T) -> Self {
        Self {
            idle: f(AnimationState::Idle),
            walk: f(AnimationState::Walk),
            run: f(AnimationState::Run),
        }
    }

    pub fn get(&self, state: AnimationState) -> &T {
        match state {
            AnimationState::Idle => &self.idle,
            AnimationState::Walk => &self.walk,
            AnimationState::Run => &self.run,
        }
    }

    pub fn get_mut(&mut self, state: AnimationState) -> &mut T {
        match state {
            AnimationState::Idle => &mut self.idle,
            AnimationState::Walk => &mut self.walk,
            AnimationState::Run => &mut self.run,
        }
    }

    /// Mutable access to two distinct entries at once.
    ///
    /// Returns `None` when `a == b`.
    pub fn pair_mut(&mut self, a: AnimationState, b: AnimationState) -> Option<(&mut T, &mut T)> {
        use AnimationState::*;
        let Self { idle, walk, run } = self;
        match (a, b) {
            (Idle, Walk) => Some((idle, walk)),
            (Idle, Run) => Some((idle, run)),
            (Walk, Idle) => Some((walk, idle)),
            (Walk, Run) => Some((walk, run)),
            (Run, Idle) => Some((run, idle)),
            (Run, Walk) => Some((run, walk)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimationState, &T)> {
        [
            (AnimationState::Idle, &self.idle),
            (AnimationState::Walk, &self.walk),
            (AnimationState::Run, &self.run),
        ]
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AnimationState, &mut T)> {
        [
            (AnimationState::Idle, &mut self.idle),
            (AnimationState::Walk, &mut self.walk),
            (AnimationState::Run, &mut self.run),
        ]
        .into_iter()
    }
}

/// Playback control for a single animation clip.
///
/// Effective weight is the base weight scaled by a fade interpolant; a handle that is stopped or
/// disabled contributes nothing.
pub trait ClipHandle {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Sets the time scale and cancels any warp in progress.
    fn set_time_scale(&mut self, scale: f32);
    fn time_scale(&self) -> f32;
    /// Sets the base weight and cancels any fade in progress.
    fn set_weight(&mut self, weight: f32);
    fn effective_weight(&self) -> f32;
    /// Rewind to the start and cancel fades and warps.
    fn reset(&mut self);
    fn fade_in(&mut self, duration: f32);
    fn fade_out(&mut self, duration: f32);
    /// Fade `self` out and `target` in over the same window; optionally warp both time scales so
    /// clips of different lengths stay in phase.
    fn cross_fade_to(&mut self, target: &mut Self, duration: f32, warp: bool);
    fn advance(&mut self, dt: f32);
    /// Playback cursor in seconds.
    fn time(&self) -> f32;
}

/// A linear ramp from `from` to `to` over `duration` seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Ramp {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Ramp {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance and return `(value, finished)`.
    fn tick(&mut self, dt: f32) -> (f32, bool) {
        self.elapsed += dt.max(0.0);
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return (self.to, true);
        }
        let t = self.elapsed / self.duration;
        (self.from + (self.to - self.from) * t, false)
    }
}

/// Engine-agnostic [`ClipHandle`] for a looping clip of known length.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPlayback {
    clip_duration: f32,
    time: f32,
    time_scale: f32,
    weight: f32,
    fade: f32,
    enabled: bool,
    running: bool,
    fading: Option<Ramp>,
    warping: Option<Ramp>,
}

impl ClipPlayback {
    pub fn new(clip_duration: f32) -> Self {
        Self {
            clip_duration: clip_duration.max(0.0),
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            fade: 1.0,
            enabled: true,
            running: false,
            fading: None,
            warping: None,
        }
    }

    pub fn clip_duration(&self) -> f32 {
        self.clip_duration
    }

    pub fn is_fading(&self) -> bool {
        self.fading.is_some()
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) {
        self.fade = from;
        self.fading = Some(Ramp::new(from, to, duration));
    }

    fn warp(&mut self, from: f32, to: f32, duration: f32) {
        self.time_scale = from;
        self.warping = Some(Ramp::new(from, to, duration));
    }
}

impl ClipHandle for ClipPlayback {
    fn play(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.fading = None;
        self.warping = None;
        self.time = 0.0;
        self.fade = 0.0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
        self.warping = None;
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
        self.fading = None;
    }

    fn effective_weight(&self) -> f32 {
        if self.running && self.enabled {
            self.weight * self.fade
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        self.enabled = true;
        self.time = 0.0;
        self.fading = None;
        self.warping = None;
    }

    fn fade_in(&mut self, duration: f32) {
        // A clip that is still contributing ramps up from where it is.
        let from = if self.running { self.fade } else { 0.0 };
        self.schedule_fade(from, 1.0, duration);
    }

    fn fade_out(&mut self, duration: f32) {
        if !self.running {
            return;
        }
        self.schedule_fade(self.fade, 0.0, duration);
    }

    fn cross_fade_to(&mut self, target: &mut Self, duration: f32, warp: bool) {
        self.fade_out(duration);
        target.fade_in(duration);
        target.play();

        if warp && self.clip_duration > 0.0 && target.clip_duration > 0.0 {
            let out_over_in = self.clip_duration / target.clip_duration;
            let in_over_out = target.clip_duration / self.clip_duration;
            self.warp(1.0, out_over_in, duration);
            target.warp(in_over_out, 1.0, duration);
        }
    }

    fn advance(&mut self, dt: f32) {
        if !self.running || !self.enabled {
            return;
        }
        let dt = dt.max(0.0);

        if let Some(ramp) = self.fading.as_mut() {
            let (value, finished) = ramp.tick(dt);
            self.fade = value;
            if finished {
                self.fading = None;
                if value <= 0.0 {
                    self.stop();
                    self.enabled = false;
                    return;
                }
            }
        }

        if let Some(ramp) = self.warping.as_mut() {
            let (value, finished) = ramp.tick(dt);
            self.time_scale = value;
            if finished {
                self.warping = None;
            }
        }

        self.time += dt * self.time_scale.max(0.0);
        if self.clip_duration > 0.0 {
            self.time = self.time.rem_euclid(self.clip_duration);
        }
    }

    fn time(&self) -> f32 {
        self.time
    }
}

/// How tier changes are detected and blended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BlendProfile {
    /// Tier from the controller's requested speed; warped cross-fade.
    Controller { fade_secs: f32 },
    /// Tier from a measured speed via thresholds; previous clip fades out while the target is
    /// reset and faded in.
    SpeedDriven { fade_secs: f32 },
}

impl Default for BlendProfile {
    fn default() -> Self {
        BlendProfile::Controller {
            fade_secs: CONTROLLER_FADE_SECS,
        }
    }
}

impl BlendProfile {
    pub fn speed_driven() -> Self {
        BlendProfile::SpeedDriven {
            fade_secs: SPEED_DRIVEN_FADE_SECS,
        }
    }

    pub fn fade_secs(&self) -> f32 {
        match *self {
            BlendProfile::Controller { fade_secs } | BlendProfile::SpeedDriven { fade_secs } => {
                fade_secs
            }
        }
    }

    /// Tier for `speed` under this profile.
    pub fn tier_for(&self, speed: f32, run_speed: f32) -> AnimationState {
        match self {
            BlendProfile::Controller { .. } => {
                AnimationState::from_controller_speed(speed, run_speed)
            }
            BlendProfile::SpeedDriven { .. } => AnimationState::from_measured_speed(speed),
        }
    }
}

/// A fired tier change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: AnimationState,
    pub to: AnimationState,
}

/// Picks the clip for the current tier and cross-fades between clips on tier changes.
#[derive(Clone, Debug)]
pub struct AnimationStateMachine<H> {
    clips: ClipSet<H>,
    active: AnimationState,
    profile: BlendProfile,
}

impl<H: ClipHandle> AnimationStateMachine<H> {
    /// Start with the idle clip playing at full weight.
    pub fn new(mut clips: ClipSet<H>, profile: BlendProfile) -> Self {
        for (state, clip) in clips.iter_mut() {
            if state == AnimationState::Idle {
                clip.set_enabled(true);
                clip.set_weight(1.0);
                clip.play();
            } else {
                clip.stop();
            }
        }
        Self {
            clips,
            active: AnimationState::Idle,
            profile,
        }
    }

    pub fn active(&self) -> AnimationState {
        self.active
    }

    pub fn profile(&self) -> BlendProfile {
        self.profile
    }

    pub fn clips(&self) -> &ClipSet<H> {
        &self.clips
    }

    /// Advance every clip by `dt`, then transition if `tier` differs from the active state.
    ///
    /// Staying in the same tier is a no-op.
    pub fn update(&mut self, tier: AnimationState, dt: f32) -> Option<Transition> {
        for (_, clip) in self.clips.iter_mut() {
            clip.advance(dt);
        }
        self.transition_to(tier)
    }

    /// Request a tier. Fades already in flight continue from their current weights.
    pub fn transition_to(&mut self, next: AnimationState) -> Option<Transition> {
        let previous = self.active;
        if previous == next {
            return None;
        }

        let duration = self.profile.fade_secs();

        // Any third clip still fading out restarts its ramp on the new window so the total
        // weight stays at or below one.
        for (state, clip) in self.clips.iter_mut() {
            if state != previous && state != next {
                clip.fade_out(duration);
            }
        }

        let (from, to) = self.clips.pair_mut(previous, next)?;
        match self.profile {
            BlendProfile::Controller { .. } => {
                to.set_enabled(true);
                to.set_time_scale(1.0);
                to.set_weight(1.0);
                from.cross_fade_to(to, duration, true);
            }
            BlendProfile::SpeedDriven { .. } => {
                from.fade_out(duration);
                to.reset();
                to.set_weight(1.0);
                to.fade_in(duration);
                to.play();
            }
        }

        self.active = next;
        log::debug!("Animation transition {:?} -> {:?}", previous, next);
        Some(Transition { from: previous, to: next })
    }

    /// Sum of effective weights across all clips.
    pub fn total_weight(&self) -> f32 {
        self.clips.iter().map(|(_, c)| c.effective_weight()).sum()
    }
}
