//! Terminal rendering for listings and presence matrices.
//!
//! Color is decided once by the caller and passed in as a [`Style`];
//! nothing here reads global state.

use std::io::IsTerminal;

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::config::ColorChoice;
use crate::matrix::{ChannelListing, PresenceMatrix};

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Resolve `--color` against the environment. `auto` means color only
    /// on a real terminal, with `TERM` not `dumb` and `NO_COLOR` unset.
    pub fn detect(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Always => Self::colored(),
            ColorChoice::Never => Self::plain(),
            ColorChoice::Auto => {
                let dumb = std::env::var("TERM").is_ok_and(|t| t == "dumb");
                let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
                Self {
                    color: !dumb && !no_color && std::io::stdout().is_terminal(),
                }
            }
        }
    }

    pub fn is_colored(self) -> bool {
        self.color
    }

    fn channel(self, name: &str) -> String {
        if self.color {
            name.yellow().to_string()
        } else {
            name.to_string()
        }
    }

    fn header(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// `channel: [member member …]`, one line per channel.
pub fn render_listing(listing: &[ChannelListing], style: Style) -> String {
    let mut out = String::new();
    for entry in listing {
        out.push_str(&format!(
            "{}: [{}]\n",
            style.channel(&entry.channel),
            entry.members.join(" ")
        ));
    }
    out
}

/// Borderless table: lowercase header, dashed rule, one line per row.
pub fn render_matrix(matrix: &PresenceMatrix, style: Style) -> String {
    let header: Vec<String> = std::iter::once(&matrix.corner)
        .chain(&matrix.columns)
        .map(|h| h.to_lowercase())
        .collect();
    let body: Vec<Vec<String>> = matrix
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.label.to_lowercase())
                .chain(row.cells.iter().map(|c| c.marker().to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for line in &body {
        for (i, cell) in line.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let rule_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);

    let mut out = String::new();
    out.push_str(&style.header(&layout(&header, &widths)));
    out.push('\n');
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');
    for line in &body {
        out.push_str(&layout(line, &widths));
        out.push('\n');
    }
    out
}

fn layout(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell}{}", " ".repeat(w.saturating_sub(cell.width()))))
        .collect();
    padded.join(COLUMN_GAP).trim_end().to_string()
}
