use super::sections::Fragment;
use super::theme::{Palette, Style};

/// Shown instead of the status line when it can't be built at all.
pub const DEGRADED_TEXT: &str = "📁 dir error | 🌳 git error | 💰 cost error | 💭 prompt error";

/// Join the sections in display order with a dim ` | ` between each pair.
pub fn compose(
    directory: &Fragment,
    vcs: &Fragment,
    cost: &Fragment,
    prompt: &Fragment,
    palette: Palette,
) -> String {
    let separator = format!(" {} ", palette.paint(Style::Separator, "|"));
    [directory, vcs, cost, prompt]
        .map(Fragment::rendered)
        .join(separator.as_str())
}

/// The fixed fallback line, one error marker per section.
pub fn degraded(palette: Palette) -> String {
    palette.paint(Style::Error, DEGRADED_TEXT)
}
