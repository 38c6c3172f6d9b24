//! Output renderers over slot snapshots: usage listing, value table, JSON.

pub mod json;
pub mod usage;
pub mod values;

use strum::{Display, EnumString};

use crate::models::SlotView;

/// Trait for rendering slot snapshots to an output format.
pub trait Renderer {
    /// Render slots to a string.
    fn render(&self, slots: &[SlotView]) -> String;
}

/// Formats the demo binary can print its resolved configuration in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Values,
    Json,
}

impl OutputFormat {
    /// Render slots using the renderer for this format.
    pub fn render(&self, slots: &[SlotView]) -> String {
        match self {
            OutputFormat::Values => values::ValuesRenderer.render(slots),
            OutputFormat::Json => json::JsonRenderer.render(slots),
        }
    }
}

/// Lay out rows as columns separated by two spaces, each line indented by
/// two. The last cell of a row is never padded.
pub(crate) fn align(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let mut line = String::from("  ");
        for (col, cell) in row.iter().enumerate() {
            if col + 1 == row.len() {
                line.push_str(cell);
            } else {
                let width = widths[col];
                line.push_str(&format!("{cell:<width$}  "));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
