//! Session core: one playback session per UI context.
//!
//! [`SessionController`] owns the engine unit, the revocable audio/cover
//! resources, the amplitude animator and the bound control widgets. The UI
//! only calls controller methods and reads [`BoundControls`].

mod animator;
mod controller;
mod controls;
mod resources;

pub use animator::{AmplitudeAnimator, FrameRequest, NEUTRAL_SCALE, PulseMode, pulse_scale};
pub use controller::{
    PlaybackSession, REPEAT_GUARD, SessionController, SessionSettings, SessionState,
};
pub use controls::{BoundControls, CoverView, Subscription, TransportIcon, UiEvent, format_time};
pub use resources::{COVER_SIZE, ResourceHandle, ResourceKind, ResourceRegistry};
