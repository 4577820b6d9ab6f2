use unicode_width::UnicodeWidthStr;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Cuts `s` to at most `max_width` display columns. No ellipsis is added.
pub fn clip(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    // Measured as a whole string: some sequences (emoji + VS16) are wider
    // than the sum of their chars.
    let mut result = String::new();
    for ch in s.chars() {
        result.push(ch);
        if result.width() > max_width {
            result.pop();
            break;
        }
    }
    result
}

/// Left-aligns `s` in exactly `width` columns, clipping when it is wider.
pub fn pad_right(s: &str, width: usize) -> String {
    let mut out = clip(s, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Replaces control characters so a name cannot move the cursor.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prints a value rounded to two decimals with trailing zeros trimmed,
/// keeping at least one decimal (`12.0`, `11.73`, `75.5`).
pub fn format_round2(value: f64) -> String {
    let text = format!("{:.2}", round2(value));
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

pub fn format_gib(bytes: u64) -> String {
    format!("{}GB", format_round2(bytes as f64 / GIB))
}
