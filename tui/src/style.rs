//! Style registry: SGR code bodies to concrete terminal styles.
//!
//! Span tags coming out of the translator are opaque strings (`"31"`,
//! `"1;33"`). This registry is the single place that knows what they look
//! like on screen. Codes are enumerated: 1 is bold, 30–37 foreground,
//! 40–47 background; a compound body applies each part in order. Unknown
//! parts resolve to no styling.

use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug)]
pub struct StyleRegistry {
    /// With the palette off every tag resolves to the default style; span
    /// structure is preserved, so toggling color never changes layout.
    enabled: bool,
}

impl StyleRegistry {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn resolve(&self, body: &str) -> Style {
        if !self.enabled {
            return Style::default();
        }
        body.split(';').fold(Style::default(), apply)
    }
}

fn apply(style: Style, code: &str) -> Style {
    match code {
        "1" => style.add_modifier(Modifier::BOLD),
        "30" => style.fg(Color::Black),
        "31" => style.fg(Color::Red),
        "32" => style.fg(Color::Green),
        "33" => style.fg(Color::Yellow),
        "34" => style.fg(Color::Blue),
        "35" => style.fg(Color::Magenta),
        "36" => style.fg(Color::Cyan),
        "37" => style.fg(Color::White),
        "40" => style.bg(Color::Black),
        "41" => style.bg(Color::Red),
        "42" => style.bg(Color::Green),
        "43" => style.bg(Color::Yellow),
        "44" => style.bg(Color::Blue),
        "45" => style.bg(Color::Magenta),
        "46" => style.bg(Color::Cyan),
        "47" => style.bg(Color::White),
        _ => style,
    }
}
