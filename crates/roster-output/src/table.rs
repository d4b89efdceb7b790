pub(crate) const BOX_WIDTH: usize = 60;

/// Shortens `text` to at most `width` characters, marking the cut with "...".
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width - text.chars().count();
    format!("{}{}", text, " ".repeat(fill))
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        line.push(if i + 1 == widths.len() { right } else { mid });
    }
    line
}

fn row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {} │", pad(cell, *width)));
    }
    line
}

pub(crate) fn render_table(headers: &[&str], widths: &[usize], rows: &[Vec<String>]) -> String {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![
        rule(widths, '┌', '┬', '┐'),
        row(&headers, widths),
        rule(widths, '├', '┼', '┤'),
    ];
    for cells in rows {
        lines.push(row(cells, widths));
    }
    lines.push(rule(widths, '└', '┴', '┘'));
    lines.join("\n")
}

/// A single-column box of `BOX_WIDTH` characters. `None` entries become
/// separators.
pub(crate) fn render_box(entries: &[Option<String>]) -> String {
    let widths = [BOX_WIDTH - 2];
    let mut lines = vec![rule(&widths, '┌', '┬', '┐')];
    for entry in entries {
        match entry {
            Some(text) => lines.push(row(std::slice::from_ref(text), &widths)),
            None => lines.push(rule(&widths, '├', '┼', '┤')),
        }
    }
    lines.push(rule(&widths, '└', '┴', '┘'));
    lines.join("\n")
}
