//! Aligned text rendering of report tables (`--show`, `duplicates` without `--output`).

use stockrecon_recon::Table;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may render before its cells are truncated.
const MAX_COL_WIDTH: usize = 32;

pub fn render_table(title: &str, table: &Table) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ({} row{}) ==\n", title, table.len(), if table.len() == 1 { "" } else { "s" }));

    if table.headers.is_empty() {
        return out;
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            cells
                .iter()
                .filter_map(|r| r.get(col))
                .map(|s| s.width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    out.push_str(&line(table.headers.iter().map(String::as_str), &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str), &widths));
    }

    out
}

fn line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = values.zip(widths).map(|(v, w)| fit(v, *w)).collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// Pad `s` to `width` display columns, cutting it short with ".." when it
/// does not fit. Double-width characters count as two columns.
fn fit(s: &str, width: usize) -> String {
    let w = s.width();
    if w <= width {
        return format!("{s}{}", " ".repeat(width - w));
    }

    let room = width.saturating_sub(2);
    let mut used = 0;
    let mut out = String::with_capacity(width);
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > room {
            break;
        }
        used += cw;
        out.push(c);
    }
    out.push_str("..");
    out.push_str(&" ".repeat(width.saturating_sub(used + 2)));
    out
}
