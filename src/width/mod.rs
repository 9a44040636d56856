//! Display width helpers.
//!
//! Character budgets used by the text wrapper are counted in display columns
//! so wide glyphs and embedded ANSI escapes do not skew line lengths.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}
