//! Parameter control gestures.
//!
//! Knobs and switches differ only in how a drag gesture maps onto the
//! parameter value, so the variants are independent strategy objects
//! behind two small capability traits: [`Draggable`] for the gesture
//! lifecycle and [`IndexSettable`] for controls whose face shows one of
//! several discrete frames. A control picks its strategy at construction;
//! there is no behavioral inheritance between variants.

use egui::Vec2;

use crate::graph::ParameterDefinition;

/// A mutable view of one module parameter plus its definition.
///
/// All writes clamp to the definition's range.
pub struct ParamValue<'a> {
    def: &'a ParameterDefinition,
    value: &'a mut f32,
}

impl<'a> ParamValue<'a> {
    /// Wraps a parameter slot and its definition.
    pub fn new(def: &'a ParameterDefinition, value: &'a mut f32) -> Self {
        Self { def, value }
    }

    /// Returns the parameter definition.
    pub fn definition(&self) -> &ParameterDefinition {
        self.def
    }

    /// Returns the current value.
    pub fn get(&self) -> f32 {
        *self.value
    }

    /// Sets the value, clamped to the definition's range.
    pub fn set(&mut self, value: f32) {
        *self.value = self.def.clamp(value);
    }

    /// Restores the default value.
    pub fn reset(&mut self) {
        *self.value = self.def.default;
    }

    /// Returns the discrete position index for switch-style parameters.
    ///
    /// A range of [0.0, 3.0] has positions 0, 1, 2, and 3.
    pub fn index(&self) -> usize {
        (self.get() - self.def.min).round().max(0.0) as usize
    }
}

/// Capability: reacts to a drag gesture over a parameter control.
pub trait Draggable {
    /// Called when the drag gesture begins.
    fn on_drag_start(&mut self, param: &mut ParamValue<'_>);

    /// Called for each pointer movement while dragging.
    fn on_drag_move(&mut self, _param: &mut ParamValue<'_>, _delta: Vec2) {}

    /// Called when the drag gesture ends.
    fn on_drag_end(&mut self, _param: &mut ParamValue<'_>) {}
}

/// Capability: shows one of several discrete face frames.
pub trait IndexSettable {
    /// Selects the frame for the given switch position.
    fn set_index(&mut self, index: usize);
}

/// Relative vertical dragging, the standard knob behavior.
///
/// Dragging upward increases the value; the full range maps to a drag of
/// `1.0 / sensitivity` pixels.
pub struct KnobDrag {
    /// Fraction of the parameter range per pixel of vertical drag.
    pub sensitivity: f32,
}

impl Default for KnobDrag {
    fn default() -> Self {
        Self { sensitivity: 0.002 }
    }
}

impl Draggable for KnobDrag {
    fn on_drag_start(&mut self, _param: &mut ParamValue<'_>) {}

    fn on_drag_move(&mut self, param: &mut ParamValue<'_>, delta: Vec2) {
        let range = param.def.max - param.def.min;
        param.set(param.get() - delta.y * self.sensitivity * range);
    }
}

/// A switch that cycles through each mechanical position on press.
///
/// Past the last position it wraps back to the first.
pub struct ToggleSwitch;

impl Draggable for ToggleSwitch {
    fn on_drag_start(&mut self, param: &mut ParamValue<'_>) {
        let next = param.get() + 1.0;
        if next <= param.def.max {
            param.set(next);
        } else {
            param.set(param.def.min);
        }
    }
}

/// A switch that is on only while held.
pub struct MomentarySwitch;

impl Draggable for MomentarySwitch {
    fn on_drag_start(&mut self, param: &mut ParamValue<'_>) {
        param.set(param.def.max);
    }

    fn on_drag_end(&mut self, param: &mut ParamValue<'_>) {
        param.set(param.def.min);
    }
}

/// A switch control: a drag strategy composed with a frame visual.
///
/// The strategy mutates the value; after every gesture step the visual is
/// told which position frame to show.
pub struct SwitchControl {
    behavior: Box<dyn Draggable>,
}

impl SwitchControl {
    /// Creates a cycling toggle switch control.
    pub fn toggle() -> Self {
        Self {
            behavior: Box::new(ToggleSwitch),
        }
    }

    /// Creates a momentary switch control.
    pub fn momentary() -> Self {
        Self {
            behavior: Box::new(MomentarySwitch),
        }
    }

    /// Creates a control with a custom drag strategy.
    pub fn with_behavior(behavior: Box<dyn Draggable>) -> Self {
        Self { behavior }
    }

    /// Begins the gesture and refreshes the visual frame.
    pub fn on_press(&mut self, param: &mut ParamValue<'_>, visual: &mut dyn IndexSettable) {
        self.behavior.on_drag_start(param);
        visual.set_index(param.index());
    }

    /// Ends the gesture and refreshes the visual frame.
    pub fn on_release(&mut self, param: &mut ParamValue<'_>, visual: &mut dyn IndexSettable) {
        self.behavior.on_drag_end(param);
        visual.set_index(param.index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ParameterDisplay;
    use egui::vec2;

    static MODE: ParameterDefinition = ParameterDefinition {
        id: "mode",
        name: "Mode",
        min: 0.0,
        max: 3.0,
        default: 0.0,
        display: ParameterDisplay::Discrete {
            labels: &["A", "B", "C", "D"],
        },
    };

    static GATE: ParameterDefinition = ParameterDefinition {
        id: "gate",
        name: "Gate",
        min: 0.0,
        max: 1.0,
        default: 0.0,
        display: ParameterDisplay::Toggle {
            off_label: "Off",
            on_label: "On",
        },
    };

    static LEVEL: ParameterDefinition = ParameterDefinition {
        id: "level",
        name: "Level",
        min: 0.0,
        max: 10.0,
        default: 5.0,
        display: ParameterDisplay::Linear { unit: "V" },
    };

    struct TestVisual {
        last_index: Option<usize>,
    }

    impl IndexSettable for TestVisual {
        fn set_index(&mut self, index: usize) {
            self.last_index = Some(index);
        }
    }

    #[test]
    fn test_param_value_set_clamps() {
        let mut value = 5.0;
        let mut param = ParamValue::new(&LEVEL, &mut value);
        param.set(25.0);
        assert_eq!(param.get(), 10.0);
        param.set(-3.0);
        assert_eq!(param.get(), 0.0);
    }

    #[test]
    fn test_param_value_reset() {
        let mut value = 9.0;
        let mut param = ParamValue::new(&LEVEL, &mut value);
        param.reset();
        assert_eq!(param.get(), 5.0);
    }

    #[test]
    fn test_toggle_cycles_and_wraps() {
        let mut value = 0.0;
        let mut switch = ToggleSwitch;

        for expected in [1.0, 2.0, 3.0, 0.0, 1.0] {
            let mut param = ParamValue::new(&MODE, &mut value);
            switch.on_drag_start(&mut param);
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn test_momentary_high_while_held() {
        let mut value = 0.0;
        let mut switch = MomentarySwitch;

        let mut param = ParamValue::new(&GATE, &mut value);
        switch.on_drag_start(&mut param);
        assert_eq!(value, 1.0);

        let mut param = ParamValue::new(&GATE, &mut value);
        switch.on_drag_end(&mut param);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_knob_drag_upward_increases() {
        let mut value = 5.0;
        let mut knob = KnobDrag { sensitivity: 0.01 };

        let mut param = ParamValue::new(&LEVEL, &mut value);
        knob.on_drag_move(&mut param, vec2(0.0, -10.0));
        assert!((value - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_knob_drag_clamps_at_range_edges() {
        let mut value = 9.9;
        let mut knob = KnobDrag { sensitivity: 0.01 };

        let mut param = ParamValue::new(&LEVEL, &mut value);
        knob.on_drag_move(&mut param, vec2(0.0, -500.0));
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_switch_control_drives_visual() {
        let mut value = 0.0;
        let mut control = SwitchControl::toggle();
        let mut visual = TestVisual { last_index: None };

        let mut param = ParamValue::new(&MODE, &mut value);
        control.on_press(&mut param, &mut visual);
        assert_eq!(visual.last_index, Some(1));

        let mut param = ParamValue::new(&MODE, &mut value);
        control.on_press(&mut param, &mut visual);
        assert_eq!(visual.last_index, Some(2));
    }

    #[test]
    fn test_momentary_control_releases_to_zero() {
        let mut value = 0.0;
        let mut control = SwitchControl::momentary();
        let mut visual = TestVisual { last_index: None };

        let mut param = ParamValue::new(&GATE, &mut value);
        control.on_press(&mut param, &mut visual);
        assert_eq!(visual.last_index, Some(1));

        let mut param = ParamValue::new(&GATE, &mut value);
        control.on_release(&mut param, &mut visual);
        assert_eq!(visual.last_index, Some(0));
        assert_eq!(value, 0.0);
    }
}
