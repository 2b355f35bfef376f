use ratatui::style::Color;
use std::str::FromStr;

use crate::models::ThemeConfig;

/// Resolved colors, built once from config and handed to every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub border: Color,
    pub error: Color,
    pub success: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let fallback = Self::default();
        Self {
            accent: parse_color(&config.accent_color, fallback.accent),
            border: parse_color(&config.border_color, fallback.border),
            error: parse_color(&config.error_color, fallback.error),
            success: parse_color(&config.success_color, fallback.success),
            muted: fallback.muted,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::LightBlue,
            border: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            muted: Color::DarkGray,
        }
    }
}

fn parse_color(raw: &str, fallback: Color) -> Color {
    Color::from_str(raw.trim()).unwrap_or_else(|_| {
        tracing::warn!("unknown theme color {raw:?}, using {fallback}");
        fallback
    })
}
