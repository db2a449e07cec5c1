//! Terminal styling for the benchmark summary, using the Catppuccin Mocha palette.

use nu_ansi_term::{Color, Style};

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);

        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

use catppuccin::Mocha as P;

/// Styles for each part of the summary block. With `color` off every
/// style renders as plain text.
pub struct SummaryTheme {
    pub heading: Style,
    pub label: Style,
    pub fastest: Style,
    pub typical: Style,
    pub slow: Style,
    pub slowest: Style,
    color: bool,
}

impl SummaryTheme {
    pub fn new(color: bool) -> Self {
        Self {
            heading: Style::new().fg(P::TEXT).bold(),
            label: Style::new().fg(P::SURFACE2),
            fastest: accent(P::GREEN),
            typical: accent(P::SKY),
            slow: accent(P::YELLOW),
            slowest: accent(P::RED),
            color,
        }
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn accent(color: Color) -> Style {
    Style::new().fg(color).bold()
}
