//! egui debug panel: asset selector, load status and morph sliders.

use crate::scene::Scene;
use crate::ui::morph_controls::MorphControlSet;

/// What the user asked for this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    SelectAsset(String),
}

/// Read-only state the panel displays.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext<'a> {
    pub catalog: &'a [String],
    /// Asset currently being loaded, if any.
    pub pending: Option<&'a str>,
    pub last_error: Option<&'a str>,
    pub morph_controls: &'a MorphControlSet,
}

#[derive(Debug, Clone)]
pub struct ControlPanel {
    selected: String,
}

impl ControlPanel {
    #[must_use]
    pub fn new(initial_asset: impl Into<String>) -> Self {
        Self {
            selected: initial_asset.into(),
        }
    }

    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Shows `name` as selected without emitting an event.
    pub fn set_selected(&mut self, name: impl Into<String>) {
        self.selected = name.into();
    }

    /// Changes the selection as if picked in the combo box. Returns an
    /// event only when `name` is in the catalog and differs from the
    /// current selection.
    pub fn select(&mut self, catalog: &[String], name: &str) -> Option<PanelEvent> {
        if self.selected == name || !catalog.iter().any(|c| c == name) {
            return None;
        }
        self.selected = name.to_string();
        Some(PanelEvent::SelectAsset(self.selected.clone()))
    }

    /// Draws the panel. Slider edits are written straight into the morph
    /// influences of the scene's nodes.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        state: PanelContext<'_>,
        scene: &mut Scene,
    ) -> Option<PanelEvent> {
        let mut event = None;

        egui::Window::new("Controls")
            .default_pos([10.0, 10.0])
            .default_width(280.0)
            .show(ctx, |ui| {
                let previous = self.selected.clone();
                ui.horizontal(|ui| {
                    ui.label("Model:");
                    egui::ComboBox::from_id_salt("asset_selector")
                        .selected_text(previous.clone())
                        .show_ui(ui, |ui| {
                            for name in state.catalog {
                                ui.selectable_value(&mut self.selected, name.clone(), name.as_str());
                            }
                        });
                });
                if self.selected != previous {
                    event = Some(PanelEvent::SelectAsset(self.selected.clone()));
                }

                if let Some(name) = state.pending {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {name}..."));
                    });
                }
                if let Some(e) = state.last_error {
                    ui.colored_label(egui::Color32::RED, format!("Error: {e}"));
                }

                if state.morph_controls.is_visible() {
                    ui.separator();
                    ui.collapsing("Morphs", |ui| {
                        show_morph_folders(ui, state.morph_controls, scene);
                    });
                }
            });

        event
    }
}

fn show_morph_folders(ui: &mut egui::Ui, controls: &MorphControlSet, scene: &mut Scene) {
    for folder in controls.folders() {
        ui.collapsing(folder.label.as_str(), |ui| {
            for slider in &folder.sliders {
                let Some(node) = scene.get_node_mut(slider.node) else {
                    continue;
                };
                let Some(mut value) = node
                    .morph_targets()
                    .and_then(|m| m.influences().get(slider.channel).copied())
                else {
                    continue;
                };

                let response = ui.add(
                    egui::Slider::new(&mut value, slider.min..=slider.max)
                        .step_by(f64::from(slider.step))
                        .text(slider.label.as_str()),
                );
                if response.changed() {
                    node.set_morph_influence(slider.channel, value);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        vec!["Walking".to_string(), "Jump".to_string()]
    }

    #[test]
    fn select_reports_changes_only() {
        let catalog = catalog();
        let mut panel = ControlPanel::new("Walking");

        assert_eq!(panel.select(&catalog, "Walking"), None);
        assert_eq!(panel.select(&catalog, "Dance"), None);
        assert_eq!(
            panel.select(&catalog, "Jump"),
            Some(PanelEvent::SelectAsset("Jump".to_string()))
        );
        assert_eq!(panel.selected(), "Jump");
    }

    #[test]
    fn show_without_input_emits_nothing() {
        let catalog = catalog();
        let controls = MorphControlSet::new();
        let mut scene = Scene::new();
        let mut panel = ControlPanel::new("Walking");

        let ctx = egui::Context::default();
        ctx.begin_pass(egui::RawInput::default());
        let event = panel.show(
            &ctx,
            PanelContext {
                catalog: &catalog,
                pending: Some("Walking"),
                last_error: Some("Jump: asset not found"),
                morph_controls: &controls,
            },
            &mut scene,
        );
        let _ = ctx.end_pass();

        assert_eq!(event, None);
        assert_eq!(panel.selected(), "Walking");
    }
}
