//! The four status line sections.
//!
//! Each formatter is total: absent input renders a fixed placeholder.

use super::theme::{Palette, Style};
use crate::vcs::VcsState;

/// Paths longer than this are shortened from the left.
pub const MAX_DIR_CHARS: usize = 50;
/// Prompts longer than this (after whitespace collapsing) are cut.
pub const MAX_PROMPT_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

/// A rendered section: the styled text and the plain text it shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    rendered: String,
}

impl Fragment {
    fn push(&mut self, palette: Palette, style: Style, text: &str) {
        self.text.push_str(text);
        self.rendered.push_str(&palette.paint(style, text));
    }

    fn push_unstyled(&mut self, text: &str) {
        self.text.push_str(text);
        self.rendered.push_str(text);
    }

    fn styled(palette: Palette, style: Style, text: &str) -> Self {
        let mut fragment = Self::default();
        fragment.push(palette, style, text);
        fragment
    }

    /// Visible content without escape codes.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content with escape codes, ready to print.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

pub fn directory(path: Option<&str>, palette: Palette) -> Fragment {
    match path {
        Some(path) => Fragment::styled(
            palette,
            Style::Directory,
            &format!("📁 {}", shorten_path(path)),
        ),
        None => Fragment::styled(palette, Style::Placeholder, "📁 unknown"),
    }
}

/// Keep the last characters of an over-long path behind an ellipsis,
/// so the result is exactly [`MAX_DIR_CHARS`] long.
fn shorten_path(path: &str) -> String {
    let path = replace_controls(path);
    let len = path.chars().count();
    if len <= MAX_DIR_CHARS {
        return path;
    }
    let keep = MAX_DIR_CHARS - ELLIPSIS.len();
    let tail: String = path.chars().skip(len - keep).collect();
    format!("{ELLIPSIS}{tail}")
}

/// Control characters would break the single line (or inject escapes).
fn replace_controls(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

pub fn vcs(state: Option<&VcsState>, palette: Palette) -> Fragment {
    let Some(state) = state else {
        return Fragment::styled(palette, Style::Placeholder, "🌳 no git");
    };

    let mut fragment = Fragment::styled(palette, Style::Branch, &format!("🌳 {}", state.branch));

    let (glyph, style) = if state.is_clean {
        ("✓", Style::Clean)
    } else {
        ("●", Style::Dirty)
    };
    let details = format!("{glyph}{}{}", sync_counts(state), diff_counts(state));

    if !details.is_empty() {
        fragment.push_unstyled(" ");
        fragment.push(palette, Style::Separator, "|");
        fragment.push_unstyled(" ");
        fragment.push(palette, style, &details);
    }
    fragment
}

/// ` ↑N ↓M`, dropping whichever side is zero.
fn sync_counts(state: &VcsState) -> String {
    let mut out = String::new();
    if state.ahead > 0 {
        out.push_str(&format!(" ↑{}", state.ahead));
    }
    if state.behind > 0 {
        out.push_str(&format!(" ↓{}", state.behind));
    }
    out
}

/// ` (+A,-R)`, dropping zero terms and the whole group when both are zero.
fn diff_counts(state: &VcsState) -> String {
    let mut parts = Vec::new();
    if state.lines_added > 0 {
        parts.push(format!("+{}", state.lines_added));
    }
    if state.lines_removed > 0 {
        parts.push(format!("-{}", state.lines_removed));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(","))
    }
}

pub fn cost(total_usd: Option<f64>, palette: Palette) -> Fragment {
    let total = total_usd.filter(|c| c.is_finite() && *c > 0.0).unwrap_or(0.0);
    Fragment::styled(palette, Style::Cost, &format!("💰 ${total:.2}"))
}

pub fn prompt(text: Option<&str>, palette: Palette) -> Fragment {
    let collapsed = text
        .map(|t| replace_controls(&t.split_whitespace().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty());
    match collapsed {
        Some(text) => Fragment::styled(
            palette,
            Style::Prompt,
            &format!("💭 {}", shorten_prompt(text)),
        ),
        None => Fragment::styled(palette, Style::Placeholder, "💭 no prompt"),
    }
}

/// Cut to [`MAX_PROMPT_CHARS`] total, ellipsis included.
fn shorten_prompt(text: String) -> String {
    if text.chars().count() <= MAX_PROMPT_CHARS {
        return text;
    }
    let head: String = text.chars().take(MAX_PROMPT_CHARS - ELLIPSIS.len()).collect();
    format!("{head}{ELLIPSIS}")
}
