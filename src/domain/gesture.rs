//! Mapping of drag gestures and key presses onto review commands.

use crate::domain::types::Decision;

/// Drag distance in pixels a card must travel before it counts as a decision.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 150.0;

/// Card displacement at the moment the pointer was released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeGesture {
    pub dx: f64,
    pub dy: f64,
}

impl SwipeGesture {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Decision implied by the release point, `None` when the card snaps back.
    ///
    /// Horizontal movement wins over vertical movement.
    pub fn classify(&self, threshold: f64) -> Option<Decision> {
        if self.dx > threshold {
            Some(Decision::Engage)
        } else if self.dx < -threshold {
            Some(Decision::Skip)
        } else if self.dy < -threshold {
            Some(Decision::Action)
        } else {
            None
        }
    }
}

/// Command triggered by a keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Decide(Decision),
    Undo,
}

impl KeyCommand {
    /// Interprets a `KeyboardEvent.key` value. `modifier` is true when Ctrl or
    /// Meta was held.
    pub fn from_key(key: &str, modifier: bool) -> Option<Self> {
        match key {
            "Enter" | "a" | "A" => Some(Self::Decide(Decision::Action)),
            "ArrowLeft" | "s" | "S" => Some(Self::Decide(Decision::Skip)),
            "ArrowRight" | "l" | "L" => Some(Self::Decide(Decision::Engage)),
            "z" if modifier => Some(Self::Undo),
            _ => None,
        }
    }
}
