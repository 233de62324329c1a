//! Colours of the panels around the grid. Grid cells use
//! [`pathviz_grid::Palette`].

use pathviz_core::Color;

use crate::status::Severity;

/// Default terminal foreground (reset).
pub const FG: Color = Color::DEFAULT;
/// Dimmed foreground for key hints.
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
/// Bright white for titles.
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

pub const RED: Color = Color::from_rgb(255, 85, 85);
pub const GREEN: Color = Color::from_rgb(80, 200, 80);
pub const YELLOW: Color = Color::from_rgb(220, 200, 60);
pub const BLUE: Color = Color::from_rgb(100, 130, 255);

/// Toast foreground by severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => BLUE,
        Severity::Success => GREEN,
        Severity::Error => RED,
    }
}
