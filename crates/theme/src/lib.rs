pub mod colors;

pub use colors::Color;

use tread_config::{DisplayConfig, ThemeConfig};
use tread_core::{Comparison, Severity};

const RESET: &str = "\x1b[0m";

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings. Calling [`Theme::from_config`]
/// is infallible; invalid color strings fall back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub foreground: Color,
    pub accent:     Color,
    pub normal:     Color,
    pub warning:    Color,
    pub critical:   Color,
    pub faster:     Color,
    pub slower:     Color,
    pub equal:      Color,
    /// When `false`, [`Theme::paint`] returns text unchanged.
    pub use_color:  bool,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` and `[display]` sections.
    pub fn from_config(cfg: &ThemeConfig, display: &DisplayConfig) -> Self {
        Self {
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE),
            accent:     Color::from_hex(&cfg.accent).unwrap_or(Color::BLUE),
            normal:     Color::from_hex(&cfg.normal).unwrap_or(Color::GREEN),
            warning:    Color::from_hex(&cfg.warning).unwrap_or(Color::YELLOW),
            critical:   Color::from_hex(&cfg.critical).unwrap_or(Color::RED),
            faster:     Color::from_hex(&cfg.faster).unwrap_or(Color::GREEN),
            slower:     Color::from_hex(&cfg.slower).unwrap_or(Color::RED),
            equal:      Color::from_hex(&cfg.equal).unwrap_or(Color::GREY),
            use_color:  display.color,
        }
    }

    /// Monochrome theme, for logs and tests.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            ..Self::default()
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Normal => self.normal,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    /// Equal laps get a neutral colour rather than "slower".
    pub fn comparison(&self, comparison: Comparison) -> Color {
        match comparison {
            Comparison::Faster => self.faster,
            Comparison::Slower => self.slower,
            Comparison::Equal => self.equal,
        }
    }

    /// Wrap `text` in `color` (no-op without colour support).
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            format!("{}{text}{RESET}", color.ansi_fg())
        } else {
            text.to_string()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default(), &DisplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hex_falls_back() {
        let cfg = ThemeConfig {
            critical: "not-a-colour".into(),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&cfg, &DisplayConfig::default());
        assert_eq!(theme.critical, Color::RED);
    }

    #[test]
    fn plain_theme_does_not_escape() {
        let theme = Theme::plain();
        assert_eq!(theme.paint("12.0", theme.critical), "12.0");
    }

    #[test]
    fn coloured_paint_wraps_and_resets() {
        let theme = Theme::default();
        let out = theme.paint("x", theme.faster);
        assert!(out.starts_with("\x1b[38;2;"));
        assert!(out.ends_with("x\x1b[0m"));
    }

    #[test]
    fn tiers_map_to_distinct_colours() {
        let theme = Theme::default();
        assert_ne!(theme.comparison(Comparison::Equal), theme.comparison(Comparison::Slower));
        assert_eq!(theme.severity(Severity::Warning), Color::YELLOW);
    }
}
