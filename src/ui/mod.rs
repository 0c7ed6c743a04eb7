//! Debug UI state and the egui control panel.

pub mod morph_controls;
pub mod panel;

pub use morph_controls::{MorphControlSet, MorphFolder, MorphSlider};
pub use panel::{ControlPanel, PanelContext, PanelEvent};
