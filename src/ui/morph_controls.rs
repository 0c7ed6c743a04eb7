use crate::scene::NodeHandle;

/// Slider range and granularity used for morph influences.
pub const MORPH_SLIDER_MIN: f32 = 0.0;
pub const MORPH_SLIDER_MAX: f32 = 1.0;
pub const MORPH_SLIDER_STEP: f32 = 0.01;

/// One slider bound to a single morph channel of a mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphSlider {
    pub node: NodeHandle,
    pub channel: usize,
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl MorphSlider {
    #[must_use]
    pub fn new(node: NodeHandle, channel: usize, label: impl Into<String>) -> Self {
        Self {
            node,
            channel,
            label: label.into(),
            min: MORPH_SLIDER_MIN,
            max: MORPH_SLIDER_MAX,
            step: MORPH_SLIDER_STEP,
        }
    }
}

/// Sliders of one mesh, grouped under the mesh's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphFolder {
    pub label: String,
    pub node: NodeHandle,
    pub sliders: Vec<MorphSlider>,
}

/// Morph section of the debug panel.
///
/// The set is never diffed: every actor swap calls [`destroy_all`] and
/// repopulates it from the new actor.
///
/// [`destroy_all`]: MorphControlSet::destroy_all
#[derive(Debug, Clone, Default)]
pub struct MorphControlSet {
    visible: bool,
    folders: Vec<MorphFolder>,
}

impl MorphControlSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty folder and returns its index.
    pub fn add_folder(&mut self, label: impl Into<String>, node: NodeHandle) -> usize {
        self.folders.push(MorphFolder {
            label: label.into(),
            node,
            sliders: Vec::new(),
        });
        self.folders.len() - 1
    }

    /// Adds a slider to folder `folder`. Returns `false` if there is no such folder.
    pub fn add_control(&mut self, folder: usize, slider: MorphSlider) -> bool {
        match self.folders.get_mut(folder) {
            Some(f) => {
                f.sliders.push(slider);
                true
            }
            None => false,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Removes every folder and slider. Visibility is left as is.
    pub fn destroy_all(&mut self) {
        self.folders.clear();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn folders(&self) -> &[MorphFolder] {
        &self.folders
    }

    #[must_use]
    pub fn slider_count(&self) -> usize {
        self.folders.iter().map(|f| f.sliders.len()).sum()
    }

    pub fn sliders(&self) -> impl Iterator<Item = &MorphSlider> {
        self.folders.iter().flat_map(|f| f.sliders.iter())
    }
}
