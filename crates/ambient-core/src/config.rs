use crate::constants::{HEADER_OFFSET_PX, SCROLL_EVENT_NAME};
use serde::Deserialize;

/// Host-page configuration for the effects.
///
/// Deserialized from the optional object handed to the JS constructor; any
/// missing field falls back to [`EffectsConfig::default`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    pub particles: bool,
    pub scene: bool,
    pub cursor: bool,
    pub smooth_scroll: bool,
    /// Name of the DOM event carrying `{scrollOffset, scrollLimit, progress}`.
    pub scroll_event: String,
    /// Added to an anchor target's top edge; negative keeps it clear of a
    /// fixed header.
    pub header_offset_px: f64,
    /// Fixed RNG seed for the particle field; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particles: true,
            scene: true,
            cursor: true,
            smooth_scroll: true,
            scroll_event: SCROLL_EVENT_NAME.to_string(),
            header_offset_px: HEADER_OFFSET_PX,
            seed: None,
        }
    }
}
