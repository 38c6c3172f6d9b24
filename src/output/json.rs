//! JSON output renderer.
//!
//! Outputs `{"<name>": {"kind", "value", "default", "source", "usage"}, ...}`.

use crate::models::SlotView;
use crate::output::Renderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, slots: &[SlotView]) -> String {
        let output: serde_json::Map<String, serde_json::Value> = slots
            .iter()
            .map(|slot| {
                let entry = serde_json::json!({
                    "kind": slot.kind,
                    "value": slot.value,
                    "default": slot.default,
                    "source": slot.source,
                    "usage": slot.usage,
                });
                (slot.name.clone(), entry)
            })
            .collect();

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
