use crate::host::HostEvent;
use thiserror::Error;

/// Failures an effect can hit while mounting or drawing.
///
/// None of these reach the host page: the web layer logs them and the effect
/// simply does not appear.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("could not register listener for {event:?}: {reason}")]
    ListenerRegistration { event: HostEvent, reason: String },
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(&'static str),
    #[error("render failed: {0}")]
    Render(String),
}
