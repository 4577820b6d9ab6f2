use unicode_width::UnicodeWidthStr;

use crate::format::clip;

/// Columns kept back from the label so the bar always has room.
const LABEL_RESERVE: usize = 20;
/// Columns kept back from the bar: the separator, both brackets and slack
/// on the right edge.
const BAR_RESERVE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeGlyphs {
    pub fill: char,
    pub empty: char,
}

impl Default for GaugeGlyphs {
    fn default() -> Self {
        GaugeGlyphs {
            fill: '#',
            empty: '.',
        }
    }
}

/// Renders `"{label} [####....]"` in at most `max_width` columns.
///
/// The label is clipped to `max_width - 20` columns and the bar takes
/// `max_width - label - 10`. `percentage` is expected in [0, 100]; the fill
/// never spills past the bar either way. Widths below the reserved budget
/// degrade to a clipped label and an empty bar.
pub fn format_bar(label: &str, percentage: f64, max_width: usize, glyphs: GaugeGlyphs) -> String {
    let label = clip(label, max_width.saturating_sub(LABEL_RESERVE));
    let bar_length = max_width.saturating_sub(label.width() + BAR_RESERVE);
    let filled = filled_length(bar_length, percentage);

    let mut bar = String::with_capacity(label.len() + bar_length + 3);
    bar.push_str(&label);
    bar.push_str(" [");
    bar.extend(std::iter::repeat_n(glyphs.fill, filled));
    bar.extend(std::iter::repeat_n(glyphs.empty, bar_length - filled));
    bar.push(']');
    clip(&bar, max_width)
}

/// `floor(bar_length * percentage / 100)`, held inside the bar.
pub fn filled_length(bar_length: usize, percentage: f64) -> usize {
    let filled = (bar_length as f64 * percentage / 100.0).floor();
    (filled as usize).min(bar_length)
}
