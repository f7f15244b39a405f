use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `text` to at most `max` terminal cells, marking the cut with `…`.
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// The last characters of `text` that fit in `max` cells (text fields show
/// the end of what is being typed).
pub fn tail_width(text: &str, max: usize) -> String {
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        tail.push(c);
        used += w;
    }
    tail.into_iter().rev().collect()
}

/// Number of filled cells of a `width` cells wide bar at `percentage`
pub fn filled_cells(percentage: u8, width: usize) -> usize {
    (percentage.min(100) as usize * width + 50) / 100
}
