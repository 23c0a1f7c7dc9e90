use crate::error::{FmError, FmResult};

/// Positional argument `index`, or `InvalidArgument` naming what is missing.
pub(crate) fn required_arg<'a>(args: &'a [String], index: usize, what: &str) -> FmResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| FmError::InvalidArgument(format!("{what} is required")))
}

/// Name of the user running the shell.
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            dirs::home_dir()
                .and_then(|home| home.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Render rows as a boxed table with a leading `(index)` column.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut columns: Vec<Vec<String>> = Vec::with_capacity(headers.len() + 1);
    columns.push(
        std::iter::once("(index)".to_string())
            .chain((0..rows.len()).map(|i| i.to_string()))
            .collect(),
    );
    for (col, header) in headers.iter().enumerate() {
        columns.push(
            std::iter::once((*header).to_string())
                .chain(rows.iter().map(|row| row.get(col).cloned().unwrap_or_default()))
                .collect(),
        );
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|cells| cells.iter().map(|c| c.chars().count()).max().unwrap_or(0) + 2)
        .collect();

    let border = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        format!("{left}{}{right}\n", segments.join(mid))
    };
    let line = |row: usize| {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(cells, width)| {
                let cell = &cells[row];
                let pad = width - 1 - cell.chars().count();
                format!(" {cell}{}", " ".repeat(pad))
            })
            .collect();
        format!("│{}│\n", cells.join("│"))
    };

    let mut out = border("┌", "┬", "┐");
    out.push_str(&line(0));
    out.push_str(&border("├", "┼", "┤"));
    for row in 1..=rows.len() {
        out.push_str(&line(row));
    }
    out.push_str(&border("└", "┴", "┘"));
    out
}

/// Incremental UTF-8 decoder for streamed file content.
///
/// A multi-byte sequence split across two reads is held back until the
/// next chunk completes it. Invalid bytes become U+FFFD.
#[derive(Default)]
pub(crate) struct Utf8Stream {
    pending: Vec<u8>,
}

impl Utf8Stream {
    pub(crate) fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let keep = incomplete_suffix_len(&self.pending);
        let tail = self.pending.split_off(self.pending.len() - keep);
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending = tail;
        text
    }

    pub(crate) fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

/// Length of a trailing, not yet complete UTF-8 sequence.
fn incomplete_suffix_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let needed = match byte {
            0xF0..=0xF7 => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if needed > back { back } else { 0 };
    }
    0
}
