//! Terminal styling and capability detection.
//!
//! Colors are resolved once into a [`ColorPalette`]; renderers interpolate
//! its fields so plain output needs no separate code path.

/// ANSI escape codes used by the table renderers.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bright bold white for headings and material keys.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for ranks, rules and units.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for dimensions.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for positive buoyancy.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for the governing failure mode.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for margins below the requested safety factor.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub dimension: &'static str,
    pub positive: &'static str,
    pub caution: &'static str,
    pub danger: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            heading: colors::WHITE_BOLD,
            muted: colors::GRAY,
            dimension: colors::CYAN,
            positive: colors::GREEN,
            caution: colors::YELLOW,
            danger: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            heading: "",
            muted: "",
            dimension: "",
            positive: "",
            caution: "",
            danger: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Palette for the `--no-color` flag combined with terminal detection.
    #[must_use]
    pub fn for_flags(no_color: bool) -> Self {
        if no_color {
            Self::plain()
        } else {
            Self::detect()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check whether ANSI colors should be emitted.
///
/// Honors `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check for a UTF-8 locale in `LANG` or `LC_ALL`.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LANG"].iter().any(|var| {
        std::env::var(var)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Horizontal rule of `width` characters, box-drawing when Unicode is available.
#[must_use]
pub fn rule(width: usize) -> String {
    let glyph = if supports_unicode() { "─" } else { "-" };
    glyph.repeat(width)
}

/// Format a count with thousand separators, e.g. `1,234,567`.
///
/// ```
/// # use buoyancy_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1000), "1,000");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
