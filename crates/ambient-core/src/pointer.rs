use crate::constants::{INFLUENCE_DECAY_LERP, MOUSE_LERP};
use crate::host::Viewport;
use crate::math::lerp;
use glam::Vec2;

/// Where the pointer is and how much it still matters.
///
/// `target` is the pointer offset from the viewport centre in `[-0.5, 0.5]`,
/// `smoothed` chases it each frame, and `influence` drops to 1 on movement
/// and decays toward 0 otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub target: Vec2,
    pub smoothed: Vec2,
    pub influence: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            // far off-screen so nothing is repelled before the first move
            position: Vec2::splat(-10_000.0),
            target: Vec2::ZERO,
            smoothed: Vec2::ZERO,
            influence: 0.0,
        }
    }
}

impl PointerState {
    pub fn moved(&mut self, x: f32, y: f32, viewport: &Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.target = Vec2::new(x / viewport.width - 0.5, y / viewport.height - 0.5);
        self.position = Vec2::new(x, y);
        self.influence = 1.0;
    }

    pub fn left(&mut self) {
        self.target = Vec2::ZERO;
        self.influence = 0.0;
    }

    /// Per-frame smoothing and influence decay.
    pub fn advance(&mut self) {
        self.smoothed.x = lerp(self.smoothed.x, self.target.x, MOUSE_LERP);
        self.smoothed.y = lerp(self.smoothed.y, self.target.y, MOUSE_LERP);
        self.influence = lerp(self.influence, 0.0, INFLUENCE_DECAY_LERP);
    }
}
