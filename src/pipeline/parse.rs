//! Strict parsing of the model reply into an [`InstructionManual`].
//!
//! The reply is untrusted text. It is parsed under the strict JSON grammar
//! via `serde_json` and nothing else — never evaluated as an expression,
//! never "repaired". Permissive evaluators accept a superset of JSON that
//! includes code-like constructs (call expressions, identifiers), which is
//! exactly what must not run against model output.
//!
//! Anything that fails the grammar or the expected shape comes back as
//! [`ManualError::MalformedResponse`] with a bounded excerpt of the raw text
//! for diagnostics. No silent recovery, no guessing.

use crate::error::ManualError;
use crate::manual::InstructionManual;
use serde_json::Value;
use tracing::debug;

/// Parse the raw model reply into an [`InstructionManual`].
///
/// Two-phase: first the strict JSON grammar (rejects unquoted keys, single
/// quotes, trailing code), then typed deserialisation into the manual record.
/// Unknown fields are ignored; missing groups default to empty.
pub fn parse_manual(raw: &str) -> Result<InstructionManual, ManualError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ManualError::malformed(format!("invalid JSON: {e}"), raw))?;

    let manual: InstructionManual = serde_json::from_value(value)
        .map_err(|e| ManualError::malformed(format!("unexpected shape: {e}"), raw))?;

    debug!(
        "Parsed manual: {} components, {} steps",
        manual.component_count(),
        manual.step_count()
    );

    Ok(manual)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_RESPONSE: &str = r#"{"components":{"parts":[{"1":{"name":"Bracket","quantity":2,"description":"L-bracket","type":"part"}}],"hardware":[],"tools":[]},"assembly_instructions":[{"step":1,"instructions":"Attach bracket to base."}],"final_product":"Assembled shelf."}"#;

    #[test]
    fn parses_valid_manual() {
        let manual = parse_manual(MOCK_RESPONSE).unwrap();
        assert_eq!(manual.component_count(), 1);
        assert_eq!(manual.assembly_instructions[0].step, 1);
        assert_eq!(manual.final_product, "Assembled shelf.");
    }

    #[test]
    fn round_trip_is_structurally_equal() {
        let manual = parse_manual(MOCK_RESPONSE).unwrap();
        let encoded = serde_json::to_string(&manual).unwrap();
        let again = parse_manual(&encoded).unwrap();
        assert_eq!(manual, again);
    }

    #[test]
    fn rejects_unquoted_keys() {
        // Valid as a JS object literal, invalid JSON. A permissive evaluator
        // would accept this; we must not.
        let raw = r#"{components: {}, final_product: "chair"}"#;
        let err = parse_manual(raw).unwrap_err();
        assert!(matches!(err, ManualError::MalformedResponse { .. }));
    }

    #[test]
    fn rejects_call_expressions() {
        let raw = r#"make_manual({"final_product": "chair"})"#;
        let err = parse_manual(raw).unwrap_err();
        match err {
            ManualError::MalformedResponse { excerpt, .. } => {
                assert!(excerpt.contains("make_manual"), "excerpt should aid diagnosis");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_single_quoted_literals() {
        // Python dict repr — accepted by literal evaluators, not by JSON.
        let raw = "{'final_product': 'chair'}";
        assert!(matches!(
            parse_manual(raw),
            Err(ManualError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn rejects_fenced_markdown_wrapping() {
        // The contract asks for a bare JSON object; a fenced reply is a
        // malformed response, not something to silently unwrap.
        let raw = format!("```json\n{MOCK_RESPONSE}\n```");
        assert!(matches!(
            parse_manual(&raw),
            Err(ManualError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn rejects_wrong_shape_with_excerpt() {
        // Syntactically valid JSON, but steps are strings, not objects.
        let raw = r#"{"assembly_instructions": ["step one", "step two"]}"#;
        match parse_manual(raw).unwrap_err() {
            ManualError::MalformedResponse { detail, .. } => {
                assert!(detail.contains("unexpected shape"), "got: {detail}");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = r#"{"final_product": "chair", "confidence": 0.93}"#;
        let manual = parse_manual(raw).unwrap();
        assert_eq!(manual.final_product, "chair");
    }
}
