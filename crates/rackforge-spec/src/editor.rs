//! Interactive control placement on a module panel.
//!
//! [`PanelEditor`] owns the control list of the module being edited. Every
//! mutation clamps coordinates to `[0, 100]`, so the list it hands out is
//! always safe to project.

use std::sync::Arc;

use thiserror::Error;

use crate::context::{Clock, IdGenerator};
use crate::module::{ControlPlacement, ControlType, ModuleSpec};

/// Errors from editor operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("no control with id '{0}'")]
    UnknownControl(String),
}

/// What a click on the panel does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Clicks do nothing; controls can be dragged and edited.
    #[default]
    Select,
    /// Clicks place a control of the current tool type.
    Add,
}

/// Clamps a percentage coordinate into `[0, 100]`. NaN maps to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Editor state for one module's panel.
pub struct PanelEditor {
    controls: Vec<ControlPlacement>,
    mode: EditorMode,
    tool: ControlType,
    clock: Arc<dyn Clock>,
    ids: Arc<IdGenerator>,
}

impl PanelEditor {
    /// Creates an empty editor in select mode with the knob tool.
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<IdGenerator>) -> Self {
        Self {
            controls: Vec::new(),
            mode: EditorMode::Select,
            tool: ControlType::Knob,
            clock,
            ids,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn tool(&self) -> ControlType {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ControlType) {
        self.tool = tool;
    }

    /// The current controls, in placement order.
    pub fn controls(&self) -> &[ControlPlacement] {
        &self.controls
    }

    /// Places a control at `(x, y)` when in add mode.
    ///
    /// Returns the new control, or `None` in select mode.
    pub fn click(&mut self, x: f64, y: f64) -> Option<&ControlPlacement> {
        if self.mode != EditorMode::Add {
            return None;
        }
        let id = self.ids.control_id(self.clock.now());
        let control = ControlPlacement::new(self.tool.as_str(), clamp_percent(x), clamp_percent(y))
            .with_id(id);
        tracing::debug!(id = %control.id, kind = %self.tool, x = control.x, y = control.y, "placed control");
        self.controls.push(control);
        self.controls.last()
    }

    /// Moves a control, clamping the target into the panel.
    pub fn drag(&mut self, id: &str, x: f64, y: f64) -> Result<(), EditorError> {
        let control = self.find_mut(id)?;
        control.x = clamp_percent(x);
        control.y = clamp_percent(y);
        Ok(())
    }

    pub fn set_label(&mut self, id: &str, label: &str) -> Result<(), EditorError> {
        self.find_mut(id)?.label = label.trim().to_string();
        Ok(())
    }

    /// Removes and returns a control.
    pub fn remove(&mut self, id: &str) -> Result<ControlPlacement, EditorError> {
        let index = self
            .controls
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| EditorError::UnknownControl(id.to_string()))?;
        Ok(self.controls.remove(index))
    }

    /// Removes every control.
    pub fn clear(&mut self) {
        self.controls.clear();
    }

    /// An owned copy of the control list.
    pub fn snapshot(&self) -> Vec<ControlPlacement> {
        self.controls.clone()
    }

    /// Returns a copy of `module` carrying the editor's controls.
    pub fn commit(&self, module: &ModuleSpec) -> ModuleSpec {
        let mut committed = module.clone();
        committed.controls = self.snapshot();
        committed.refresh_derived();
        committed
    }

    /// Replaces the editor's controls with a copy of `module`'s.
    pub fn load(&mut self, module: &ModuleSpec) {
        self.controls = module
            .controls
            .iter()
            .cloned()
            .map(|mut c| {
                c.x = clamp_percent(c.x);
                c.y = clamp_percent(c.y);
                c
            })
            .collect();
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut ControlPlacement, EditorError> {
        self.controls
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditorError::UnknownControl(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ManualClock;
    use chrono::{TimeZone, Utc};

    fn editor() -> PanelEditor {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap());
        PanelEditor::new(Arc::new(clock), Arc::new(IdGenerator::seeded(9)))
    }

    #[test]
    fn test_click_only_adds_in_add_mode() {
        let mut editor = editor();
        assert!(editor.click(10.0, 10.0).is_none());
        editor.set_mode(EditorMode::Add);
        editor.set_tool(ControlType::Jack);
        let control = editor.click(10.0, 20.0).unwrap().clone();
        assert_eq!(control.control_type, "jack");
        assert_eq!((control.x, control.y), (10.0, 20.0));
        assert_eq!(editor.controls().len(), 1);
    }

    #[test]
    fn test_ids_increase_within_one_millisecond() {
        let mut editor = editor();
        editor.set_mode(EditorMode::Add);
        let a = editor.click(1.0, 1.0).unwrap().id.clone();
        let b = editor.click(2.0, 2.0).unwrap().id.clone();
        assert_ne!(a, b);
        assert!(a.len() < b.len() || (a.len() == b.len() && a < b));
    }

    #[test]
    fn test_drag_clamps() {
        let mut editor = editor();
        editor.set_mode(EditorMode::Add);
        let id = editor.click(50.0, 50.0).unwrap().id.clone();
        editor.drag(&id, 130.0, -4.0).unwrap();
        assert_eq!((editor.controls()[0].x, editor.controls()[0].y), (100.0, 0.0));
        editor.drag(&id, f64::NAN, 42.5).unwrap();
        assert_eq!((editor.controls()[0].x, editor.controls()[0].y), (0.0, 42.5));
    }

    #[test]
    fn test_unknown_control() {
        let mut editor = editor();
        assert_eq!(
            editor.drag("ctl_missing", 1.0, 1.0),
            Err(EditorError::UnknownControl("ctl_missing".to_string()))
        );
        assert!(editor.remove("ctl_missing").is_err());
    }

    #[test]
    fn test_label_remove_clear() {
        let mut editor = editor();
        editor.set_mode(EditorMode::Add);
        let first = editor.click(10.0, 10.0).unwrap().id.clone();
        editor.click(20.0, 20.0);
        editor.set_label(&first, "  Cutoff ").unwrap();
        assert_eq!(editor.controls()[0].label, "Cutoff");

        let removed = editor.remove(&first).unwrap();
        assert_eq!(removed.label, "Cutoff");
        assert_eq!(editor.controls().len(), 1);

        editor.clear();
        assert!(editor.controls().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut editor = editor();
        editor.set_mode(EditorMode::Add);
        let id = editor.click(10.0, 10.0).unwrap().id.clone();
        let module = editor.commit(&ModuleSpec::builder("LFO", 4, 128.5, 25.0).build());
        editor.drag(&id, 90.0, 90.0).unwrap();
        assert_eq!(module.controls[0].x, 10.0);
        assert_eq!(module.hp_width, 4.0 * 5.08);
    }

    #[test]
    fn test_load_clamps_copies() {
        let module = ModuleSpec::builder("Env", 4, 128.5, 25.0)
            .control(ControlPlacement::new("knob", 120.0, 50.0).with_id("ctl_a"))
            .build();
        let mut editor = editor();
        editor.load(&module);
        assert_eq!(editor.controls()[0].x, 100.0);
        assert_eq!(module.controls[0].x, 120.0);
    }
}
