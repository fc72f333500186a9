//! The fixed instruction prompt and response-shape contract.
//!
//! Centralising the prompt text here serves two purposes:
//!
//! 1. **Single source of truth** — the extraction rules and the JSON contract
//!    the model is asked to follow live in exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    calling a real vision model, so accidental edits to the contract are
//!    caught immediately.
//!
//! The schema below is sent as text inside the system message
//! ("schema-as-prompt"); the strict check happens afterwards in
//! [`crate::pipeline::parse`] when the reply is deserialised.

/// The JSON response shape the model is asked to produce, reproduced inside
/// the system message. Mirrors [`crate::manual::InstructionManual`].
pub const RESPONSE_SCHEMA: &str = r#"{
    "components": {
        "parts": [
            {
                "[Number given in the drawing]": {
                    "name": "<part_name>",
                    "quantity": <quantity_number>,
                    "description": "<description>",
                    "type": "part"
                }
            },
            ...
        ],
        "hardware": [
            {
                "[Number given in the drawing]": {
                    "name": "<hardware_name>",
                    "specs": "<specifications>",
                    "quantity": <quantity_number>,
                    "description": "<description>",
                    "type": "hardware"
                }
            },
            ...
        ],
        "tools": [
            {
                "[Number given in the drawing]": {
                    "name": "<tool_name>",
                    "quantity": <quantity_number>,
                    "description": "<description>",
                    "type": "tool"
                }
            },
            ...
        ]
    },
    "assembly_instructions": [
        {
            "step": <step_number>,
            "instructions": "<detailed_instructions>"
        }
    ],
    "final_product": "<final_product_description>"
}"#;

/// Role framing and the four extraction rules, without the schema.
const SYSTEM_ROLE: &str = r#"You are an assembly line expert having expertise in recognising the parts, hardwares and tools with their names and specifications and also with writing instructions for the assembly of the products.
You are provided with an assembly part drawing for a product.
The part drawing will be consisting of three types of objects:-
1. Parts
2. Hardwares
3. Tools
Along with the above objects, it will also consist a step by step pictorial tutorial for assembly of the product.
You will be given a JSON schema that represents the structure of the expected output of the instruction manual for the given product. By analyzing the part drawing make an instruction manual for the product as per the given schema.
Follow the given instructions:-
1. Give the number of the objects as per the drawing only.
2. The assembly instructions should also be in the sequence similar to that given in the image.
3. The product numbers given in the assembly instructions should also be same as in the drawing.
4. Give each and every assembly instruction in very detail."#;

/// Short text label preceding the page images in the user message.
pub const USER_LABEL: &str = "The image of the instruction manual.";

/// Output constraint: the reply must be one bare JSON object. The parser
/// rejects fenced or wrapped replies outright, so the request has to steer
/// the model away from them.
const OUTPUT_CONSTRAINT: &str =
    "Return only a single JSON object conforming to the schema, with no markdown fences and no text outside the JSON object.";

/// Assemble the complete system message: role framing, extraction rules, the
/// JSON response-shape contract, and the bare-JSON output constraint.
pub fn system_prompt() -> String {
    format!("{SYSTEM_ROLE}\nThe JSON schema is as follows:\n{RESPONSE_SCHEMA}\n{OUTPUT_CONSTRAINT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_all_four_rules() {
        let prompt = system_prompt();
        assert!(prompt.contains("1. Give the number of the objects as per the drawing only."));
        assert!(prompt.contains("2. The assembly instructions should also be in the sequence"));
        assert!(prompt.contains("3. The product numbers given in the assembly instructions"));
        assert!(prompt.contains("4. Give each and every assembly instruction in very detail."));
    }

    #[test]
    fn system_prompt_embeds_schema_verbatim() {
        let prompt = system_prompt();
        assert!(prompt.contains(RESPONSE_SCHEMA));
        assert!(prompt.contains("\"assembly_instructions\""));
        assert!(prompt.contains("\"final_product\""));
    }

    #[test]
    fn system_prompt_demands_one_bare_json_object() {
        // The strict parser rejects fenced replies, so the request must tell
        // the model not to produce them.
        let prompt = system_prompt();
        assert!(prompt.contains("only a single JSON object"));
        assert!(prompt.contains("no markdown fences"));
        assert!(
            prompt.ends_with(OUTPUT_CONSTRAINT),
            "output constraint must come after the schema"
        );
    }

    #[test]
    fn schema_names_all_three_groups() {
        for group in ["\"parts\"", "\"hardware\"", "\"tools\""] {
            assert!(RESPONSE_SCHEMA.contains(group), "schema missing {group}");
        }
        // specs is a hardware-only field
        assert_eq!(RESPONSE_SCHEMA.matches("\"specs\"").count(), 1);
    }
}
