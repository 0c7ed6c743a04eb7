use crate::motion::state::{JumpPhase, MotionDelta, MotionKey, MotionState};
use crate::settings::MotionSettings;

/// Integrates held direction keys and a single-axis jump arc.
///
/// Horizontal movement is `speed * dt` per held key along the local axes
/// (forward is `-Z`, right is `+X`). Opposing keys cancel.
///
/// Vertical movement follows constant-gravity kinematics while airborne:
/// `dy = v*dt - g*dt^2/2`, then `v -= g*dt`. The arc is exact for any step
/// size, so splitting a step in two yields the same height.
#[derive(Debug, Clone, Default)]
pub struct MotionController {
    settings: MotionSettings,
    state: MotionState,
}

impl MotionController {
    #[must_use]
    pub fn new(settings: MotionSettings) -> Self {
        Self {
            settings,
            state: MotionState::default(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> JumpPhase {
        self.state.phase()
    }

    /// Elevation above the ground plane, never negative.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.state.height
    }

    /// Records a key transition.
    ///
    /// Pressing `Jump` while grounded launches the actor; while airborne it
    /// is ignored. Releasing `Jump` has no effect on an arc in progress.
    pub fn set_key(&mut self, key: MotionKey, pressed: bool) {
        match key {
            MotionKey::Forward => self.state.forward = pressed,
            MotionKey::Backward => self.state.backward = pressed,
            MotionKey::Left => self.state.left = pressed,
            MotionKey::Right => self.state.right = pressed,
            MotionKey::Jump => {
                if pressed && !self.state.is_jumping {
                    self.state.is_jumping = true;
                    self.state.jump_velocity = self.settings.jump_speed;
                    log::debug!("Jump started (v = {})", self.settings.jump_speed);
                }
            }
        }
    }

    /// Clears every held direction key. The jump arc is unaffected.
    pub fn release_all(&mut self) {
        self.state.forward = false;
        self.state.backward = false;
        self.state.left = false;
        self.state.right = false;
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Returns zero and leaves the state untouched when `dt` is zero,
    /// negative or not finite.
    pub fn step(&mut self, dt: f32) -> MotionDelta {
        if !(dt.is_finite() && dt > 0.0) {
            return MotionDelta::ZERO;
        }

        let distance = self.settings.speed * dt;
        let axis = |positive: bool, negative: bool| -> f32 {
            let mut v = 0.0;
            if positive {
                v += distance;
            }
            if negative {
                v -= distance;
            }
            v
        };

        let dx = axis(self.state.right, self.state.left);
        let dz = axis(self.state.backward, self.state.forward);
        let dy = if self.state.is_jumping {
            self.integrate_jump(dt)
        } else {
            0.0
        };

        MotionDelta { dx, dy, dz }
    }

    fn integrate_jump(&mut self, dt: f32) -> f32 {
        let gravity = self.settings.gravity;
        let dy = self.state.jump_velocity * dt - 0.5 * gravity * dt * dt;
        self.state.height += dy;
        self.state.jump_velocity -= gravity * dt;

        if self.state.height <= 0.0 {
            self.state.height = 0.0;
            self.state.is_jumping = false;
            log::debug!("Landed");
        }
        dy
    }
}
