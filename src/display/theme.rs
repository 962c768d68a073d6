//! Status line styles.
//!
//! Sections refer to styles by [`Style`] identifier and a [`Palette`] turns
//! identifiers into terminal styles, so formatting stays independent of the
//! terminal. The assignment is fixed.
//!
//! Colors are named ANSI colors only so they follow the user's terminal
//! theme; separators use `Attribute::Dim` rather than a grey. `NO_COLOR` is
//! honoured by crossterm when the line is rendered.

use crossterm::style::{Attribute, Color, ContentStyle};

/// Every style the status line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Directory,
    Branch,
    Clean,
    Dirty,
    Cost,
    Prompt,
    /// Stand-in text such as `unknown` or `no prompt`.
    Placeholder,
    Separator,
    Error,
}

impl Style {
    fn content_style(self) -> ContentStyle {
        let color = match self {
            Style::Separator => {
                return ContentStyle {
                    attributes: Attribute::Dim.into(),
                    ..Default::default()
                };
            }
            Style::Directory | Style::Branch => Color::Cyan,
            Style::Clean => Color::Green,
            Style::Dirty | Style::Cost => Color::Yellow,
            Style::Prompt => Color::Magenta,
            Style::Placeholder => Color::White,
            Style::Error => Color::Red,
        };
        ContentStyle {
            foreground_color: Some(color),
            ..Default::default()
        }
    }
}

/// Maps [`Style`] identifiers to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    /// The fixed color palette.
    pub const fn ansi() -> Self {
        Self { colored: true }
    }

    /// No escape codes at all.
    pub const fn plain() -> Self {
        Self { colored: false }
    }

    pub fn content_style(self, style: Style) -> ContentStyle {
        if self.colored {
            style.content_style()
        } else {
            ContentStyle::default()
        }
    }

    /// Render `text` in `style`.
    pub fn paint(self, style: Style, text: &str) -> String {
        self.content_style(style).apply(text).to_string()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}
