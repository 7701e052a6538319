//! ASCII rendering of responsibility section trees.
//!
//! Renders a simplified tree as a horizontal bar chart: one row per
//! section in pre-order, each bar positioned and scaled within the root
//! range, with an optional date axis underneath. A diagnostic formatter,
//! not part of the invoice computation.

use super::section::SectionNode;

/// Default chart width in characters (bar field only).
pub const DEFAULT_WIDTH: usize = 72;

/// Render the section tree as a horizontal bar chart.
///
/// `width` is the width of the bar field; labels and range annotations come
/// on top of that. Returns an empty string for a degenerate root.
#[must_use]
pub fn render(root: &SectionNode, width: usize) -> String {
    let root_days = root.range().days();
    if root_days <= 0 || width == 0 {
        return String::new();
    }

    let label_width = label_width(root);
    let mut out = String::new();
    render_rows(root, root, width, label_width, &mut out);

    // Date axis under the bar field.
    let low = root.range().low().to_string();
    let high = root.range().high().to_string();
    let gap = (width + 2).saturating_sub(low.len() + high.len());
    out.push_str(&" ".repeat(label_width + 1));
    out.push_str(&low);
    out.push_str(&" ".repeat(gap));
    out.push_str(&high);
    out.push('\n');

    out
}

fn label_width(node: &SectionNode) -> usize {
    let own = node.occupant().map_or(0, |p| p.name.len());
    node.children()
        .iter()
        .map(label_width)
        .fold(own, usize::max)
}

fn render_rows(
    node: &SectionNode,
    root: &SectionNode,
    width: usize,
    label_width: usize,
    out: &mut String,
) {
    let root_days = root.range().days() as f64;
    let offset_days = (node.range().low() - root.range().low()).num_days().max(0) as f64;

    let offset = ((offset_days / root_days) * width as f64).round() as usize;
    let offset = offset.min(width.saturating_sub(1));
    let bar = (((node.range().days() as f64) / root_days) * width as f64).round() as usize;
    let bar = bar.clamp(1, width - offset);

    let name = node.occupant().map_or("", |p| p.name.as_str());
    out.push_str(&format!(
        "{name:>label_width$} │{lead}{bar}{trail}│ {range}\n",
        lead = " ".repeat(offset),
        bar = "█".repeat(bar),
        trail = " ".repeat(width - offset - bar),
        range = node.range(),
    ));

    for child in node.children() {
        render_rows(child, root, width, label_width, out);
    }
}
