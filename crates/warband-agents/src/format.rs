//! Small text helpers for status lines and log output.

/// Pad `text` on the right with `fill` up to `width` characters.
///
/// Text already at or beyond `width` is returned unchanged.
pub fn pad_right(text: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(text.chars().count());
    let mut out = String::with_capacity(text.len().saturating_add(missing));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, missing));
    out
}

/// Pad `text` on the left with `fill` up to `width` characters.
pub fn pad_left(text: &str, width: usize, fill: char) -> String {
    let missing = width.saturating_sub(text.chars().count());
    let mut out: String = std::iter::repeat_n(fill, missing).collect();
    out.push_str(text);
    out
}

/// Render a fraction as a percentage with `decimals` digits, e.g. `"42.5%"`.
pub fn to_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding() {
        assert_eq!(pad_right("ab", 5, '.'), "ab...");
        assert_eq!(pad_left("7", 3, '0'), "007");
        assert_eq!(pad_right("toolong", 3, ' '), "toolong");
        assert_eq!(pad_left("", 2, '-'), "--");
    }

    #[test]
    fn percentages() {
        assert_eq!(to_percent(0.425, 1), "42.5%");
        assert_eq!(to_percent(1.0, 0), "100%");
        assert_eq!(to_percent(0.0, 2), "0.00%");
    }
}
