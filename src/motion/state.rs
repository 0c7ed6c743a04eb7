/// Logical inputs the motion controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKey {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

/// Vertical state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Airborne,
}

/// Held keys plus the continuous jump state.
///
/// `height` is the actor's elevation above the ground plane and is exactly
/// `0.0` whenever `is_jumping` is false. `jump_velocity` keeps its last value
/// after landing; it is only meaningful while airborne.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub is_jumping: bool,
    pub jump_velocity: f32,
    pub height: f32,
}

impl MotionState {
    #[must_use]
    pub fn phase(&self) -> JumpPhase {
        if self.is_jumping {
            JumpPhase::Airborne
        } else {
            JumpPhase::Grounded
        }
    }
}

/// Translation produced by one step, in the actor's local space.
///
/// `dy` is the raw integrated vertical displacement before ground clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionDelta {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

impl MotionDelta {
    pub const ZERO: Self = Self {
        dx: 0.0,
        dy: 0.0,
        dz: 0.0,
    };

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
