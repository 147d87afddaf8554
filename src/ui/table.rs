//! ui::table
//!
//! Two-column table output for listings and help.
//!
//! # Design
//!
//! On a terminal the key column is green, both columns are padded, and rows
//! are truncated to the terminal width. Otherwise rows are tab-separated with
//! no styling, so output pipes cleanly into `cut` and friends.

use std::io::{self, Write};

use console::{measure_text_width, pad_str, style, truncate_str, Alignment, Term};

/// How rows are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// Styled, padded, and truncated to `width` columns.
    Terminal { width: usize },
    /// Tab-separated.
    Plain,
}

impl TableMode {
    /// Detect the mode for stdout.
    pub fn detect() -> Self {
        let term = Term::stdout();
        if term.is_term() {
            let (_, width) = term.size();
            TableMode::Terminal {
                width: usize::from(width),
            }
        } else {
            TableMode::Plain
        }
    }
}

/// Write `(key, description)` rows.
pub fn write_rows<W: Write>(
    out: &mut W,
    rows: &[(String, String)],
    mode: TableMode,
) -> io::Result<()> {
    match mode {
        TableMode::Plain => {
            for (key, description) in rows {
                writeln!(out, "{}\t{}", key, description)?;
            }
        }
        TableMode::Terminal { width } => {
            let key_width = rows
                .iter()
                .map(|(key, _)| measure_text_width(key))
                .max()
                .unwrap_or(0);
            for (key, description) in rows {
                let key_cell = pad_str(key, key_width, Alignment::Left, None);
                let line = format!("{}  {}", key_cell, description);
                let line = truncate_str(&line, width, "...");
                // Style after truncation so escape codes are not cut.
                let (key_part, rest) = split_key(&line, key_width);
                writeln!(out, "{}{}", style(key_part).green(), rest.trim_end())?;
            }
        }
    }
    Ok(())
}

/// Print rows to stdout in the detected mode.
pub fn print_rows(rows: &[(String, String)]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_rows(&mut lock, rows, TableMode::detect())
}

fn split_key(line: &str, key_width: usize) -> (&str, &str) {
    let mut end = line.len();
    for (count, (index, _)) in line.char_indices().enumerate() {
        if count == key_width {
            end = index;
            break;
        }
    }
    line.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(String, String)> {
        vec![
            ("octo/a".into(), "First template".into()),
            ("octo/long-name".into(), String::new()),
        ]
    }

    fn render(mode: TableMode) -> String {
        let mut out = Vec::new();
        write_rows(&mut out, &rows(), mode).unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[test]
    fn plain_is_tab_separated() {
        assert_eq!(
            render(TableMode::Plain),
            "octo/a\tFirst template\nocto/long-name\t\n"
        );
    }

    #[test]
    fn terminal_pads_keys() {
        assert_eq!(
            render(TableMode::Terminal { width: 80 }),
            "octo/a          First template\nocto/long-name\n"
        );
    }

    #[test]
    fn terminal_truncates_to_width() {
        let output = render(TableMode::Terminal { width: 20 });
        let first = output.lines().next().unwrap();
        assert_eq!(measure_text_width(first), 20);
        assert!(first.ends_with("..."));
    }

    #[test]
    fn empty_rows_write_nothing() {
        let mut out = Vec::new();
        write_rows(&mut out, &[], TableMode::Terminal { width: 80 }).unwrap();
        assert!(out.is_empty());
    }
}
