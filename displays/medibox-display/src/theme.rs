//! Colors, as raw RGB565

/// RGB565 color value
pub type Color = u16;

pub const BLACK: Color = 0x0000;
pub const WHITE: Color = 0xFFFF;
pub const RED: Color = 0xF800;
pub const GREEN: Color = 0x07E0;
pub const YELLOW: Color = 0xFFE0;
pub const ORANGE: Color = 0xFD20;
pub const CYAN: Color = 0x07FF;
pub const NAVY: Color = 0x000F;
pub const DARK_GREY: Color = 0x7BEF;

pub const BACKGROUND: Color = BLACK;
pub const TEXT: Color = WHITE;
pub const MUTED: Color = DARK_GREY;
pub const STATUS_BAR: Color = NAVY;
pub const OK: Color = GREEN;
pub const WARN: Color = ORANGE;
pub const ALERT: Color = RED;
pub const ACCENT: Color = CYAN;
pub const HIGHLIGHT: Color = YELLOW;

/// Button fill
pub const BUTTON: Color = 0x2945;
pub const CONFIRM_BUTTON: Color = 0x0400;
pub const CANCEL_BUTTON: Color = 0x8000;
