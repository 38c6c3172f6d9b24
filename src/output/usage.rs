//! Usage listing shown for `-h`/`--help`.

use crate::models::{SlotValue, SlotView};
use crate::output::{Renderer, align};

/// Renders `Usage of <program>:` followed by one line per slot.
pub struct UsageRenderer {
    pub program: String,
}

impl Renderer for UsageRenderer {
    fn render(&self, slots: &[SlotView]) -> String {
        let rows: Vec<Vec<String>> = slots
            .iter()
            .map(|slot| {
                vec![
                    format!("-{}", slot.name),
                    slot.kind.to_string(),
                    default_text(&slot.default),
                    slot.source.to_string(),
                    slot.usage.clone(),
                ]
            })
            .collect();

        format!("Usage of {}:\n{}", self.program, align(&rows))
    }
}

/// Textual default, quoted as `""` when empty so the column stays readable.
fn default_text(value: &SlotValue) -> String {
    let text = value.to_string();
    if text.is_empty() { "\"\"".to_string() } else { text }
}
