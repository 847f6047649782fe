//! Forms posted by the review page. Each carries the cursor the page was
//! rendered at.

use serde::Deserialize;
use validator::Validate;

use crate::domain::gesture::SwipeGesture;
use crate::domain::types::Decision;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct DecisionForm {
    pub cursor: usize,
    #[validate(length(min = 1, max = 16))]
    pub decision: String,
}

pub struct DecisionPayload {
    pub cursor: usize,
    pub decision: Decision,
}

impl TryFrom<DecisionForm> for DecisionPayload {
    type Error = FormError;

    fn try_from(form: DecisionForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let decision = form
            .decision
            .parse()
            .map_err(|_| FormError::InvalidDecision)?;
        Ok(Self {
            cursor: form.cursor,
            decision,
        })
    }
}

/// Card displacement in pixels when the pointer was released.
#[derive(Debug, Deserialize, Validate)]
pub struct SwipeForm {
    pub cursor: usize,
    #[validate(range(min = -10000.0, max = 10000.0))]
    pub dx: f64,
    #[validate(range(min = -10000.0, max = 10000.0))]
    pub dy: f64,
}

pub struct SwipePayload {
    pub cursor: usize,
    pub gesture: SwipeGesture,
}

impl TryFrom<SwipeForm> for SwipePayload {
    type Error = FormError;

    fn try_from(form: SwipeForm) -> Result<Self, Self::Error> {
        if !form.dx.is_finite() || !form.dy.is_finite() {
            return Err(FormError::InvalidGesture);
        }
        form.validate()?;
        Ok(Self {
            cursor: form.cursor,
            gesture: SwipeGesture::new(form.dx, form.dy),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct KeyForm {
    pub cursor: usize,
    #[validate(length(min = 1, max = 32))]
    pub key: String,
    /// Ctrl or Meta held.
    #[serde(default)]
    pub modifier: bool,
}

#[derive(Debug, Deserialize)]
pub struct UndoForm {
    pub cursor: usize,
}
