//! The structured instruction-manual record produced by the pipeline.
//!
//! The shapes here mirror the response contract sent to the vision model
//! (see [`crate::prompts::RESPONSE_SCHEMA`]) exactly, so a conforming model
//! reply deserialises without any intermediate massaging:
//!
//! * each component group is a **sequence of single-entry maps** keyed by the
//!   identifier printed in the part drawing (`[{"1": {…}}, {"2": {…}}]`),
//!   not one big map — the drawing's identifiers are arbitrary strings and
//!   their order matters for review;
//! * assembly steps are an ordered sequence matching the depicted sequence.
//!
//! Identifiers referenced in step text are expected to match identifiers
//! declared in the component groups, but that depends on model fidelity and
//! is not mechanically enforced here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named component group: a sequence of entries, each a single-key map
/// from the drawing identifier to the entry body.
pub type ComponentGroup = Vec<BTreeMap<String, ComponentEntry>>;

/// A complete instruction manual extracted from a part drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionManual {
    /// Parts, hardware, and tools recognised in the drawing.
    #[serde(default)]
    pub components: Components,
    /// Assembly steps, ordered to match the sequence depicted in the drawing.
    #[serde(default)]
    pub assembly_instructions: Vec<AssemblyStep>,
    /// Free-text description of the finished product.
    #[serde(default)]
    pub final_product: String,
}

/// The three component groups of a part drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub parts: ComponentGroup,
    #[serde(default)]
    pub hardware: ComponentGroup,
    #[serde(default)]
    pub tools: ComponentGroup,
}

/// A single part, hardware item, or tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub name: String,
    /// Hardware specifications (thread size, length, …). Only present for
    /// hardware entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    /// Group tag: "part", "hardware", or "tool". Matches the group the entry
    /// appears in.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One assembly step, numbered as in the drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyStep {
    pub step: u32,
    pub instructions: String,
}

impl InstructionManual {
    /// Total number of component entries across all three groups.
    pub fn component_count(&self) -> usize {
        self.components.parts.len()
            + self.components.hardware.len()
            + self.components.tools.len()
    }

    /// Number of assembly steps.
    pub fn step_count(&self) -> usize {
        self.assembly_instructions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r##"{
            "components": {
                "parts": [
                    {"1": {"name": "Bracket", "quantity": 2, "description": "L-bracket", "type": "part"}}
                ],
                "hardware": [
                    {"A": {"name": "Wood screw", "specs": "M4 x 30mm", "quantity": 8, "description": "Countersunk", "type": "hardware"}}
                ],
                "tools": [
                    {"T1": {"name": "Phillips screwdriver", "quantity": 1, "description": "#2 head", "type": "tool"}}
                ]
            },
            "assembly_instructions": [
                {"step": 1, "instructions": "Attach bracket to base."},
                {"step": 2, "instructions": "Drive screws A through bracket 1."}
            ],
            "final_product": "Assembled shelf."
        }"##
    }

    #[test]
    fn deserialises_full_manual() {
        let manual: InstructionManual = serde_json::from_str(sample_json()).unwrap();

        assert_eq!(manual.component_count(), 3);
        assert_eq!(manual.step_count(), 2);
        assert_eq!(manual.final_product, "Assembled shelf.");

        let bracket = &manual.components.parts[0]["1"];
        assert_eq!(bracket.name, "Bracket");
        assert_eq!(bracket.quantity, 2);
        assert_eq!(bracket.kind, "part");
        assert!(bracket.specs.is_none());

        let screw = &manual.components.hardware[0]["A"];
        assert_eq!(screw.specs.as_deref(), Some("M4 x 30mm"));
    }

    #[test]
    fn round_trips_structurally_equal() {
        let manual: InstructionManual = serde_json::from_str(sample_json()).unwrap();
        let encoded = serde_json::to_string(&manual).unwrap();
        let decoded: InstructionManual = serde_json::from_str(&encoded).unwrap();
        assert_eq!(manual, decoded);
    }

    #[test]
    fn specs_omitted_for_parts_on_serialise() {
        let manual: InstructionManual = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&manual).unwrap();
        let part = &value["components"]["parts"][0]["1"];
        assert!(part.get("specs").is_none(), "parts must not carry specs");
        assert_eq!(part["type"], "part");
    }

    #[test]
    fn missing_groups_default_to_empty() {
        let manual: InstructionManual =
            serde_json::from_str(r#"{"final_product": "A chair."}"#).unwrap();
        assert_eq!(manual.component_count(), 0);
        assert_eq!(manual.step_count(), 0);
        assert_eq!(manual.final_product, "A chair.");
    }

    #[test]
    fn step_order_is_preserved() {
        let manual: InstructionManual = serde_json::from_str(sample_json()).unwrap();
        let steps: Vec<u32> = manual.assembly_instructions.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2]);
    }
}
