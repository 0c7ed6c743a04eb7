//! Keyboard-driven character motion: held direction keys and a gravity jump.

pub mod controller;
pub mod state;

pub use controller::MotionController;
pub use state::{JumpPhase, MotionDelta, MotionKey, MotionState};
