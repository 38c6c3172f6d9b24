//! Aligned `name value source` table of resolved values.

use crate::models::SlotView;
use crate::output::{Renderer, align};

pub struct ValuesRenderer;

impl Renderer for ValuesRenderer {
    fn render(&self, slots: &[SlotView]) -> String {
        let rows: Vec<Vec<String>> = slots
            .iter()
            .map(|slot| {
                vec![
                    slot.name.clone(),
                    slot.value.to_string(),
                    format!("({})", slot.source),
                ]
            })
            .collect();
        align(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Format, SlotKind, SlotValue, Source};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_value_and_source() {
        let slots = vec![
            SlotView {
                name: "port".into(),
                kind: SlotKind::Int,
                value: SlotValue::Int(9090),
                default: SlotValue::Int(8080),
                source: Source::File(Format::Toml),
                usage: String::new(),
            },
            SlotView {
                name: "tags".into(),
                kind: SlotKind::List,
                value: SlotValue::List(vec!["a".into(), "b".into()]),
                default: SlotValue::List(Vec::new()),
                source: Source::Flag,
                usage: String::new(),
            },
        ];
        assert_eq!(
            ValuesRenderer.render(&slots),
            "  port  9090  (toml)\n  tags  a,b   (flag)\n"
        );
    }
}
