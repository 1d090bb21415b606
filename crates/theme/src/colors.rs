/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE:  Self = Self { r: 0xcd, g: 0xd6, b: 0xf4 }; // #cdd6f4
    pub const BLUE:   Self = Self { r: 0x89, g: 0xb4, b: 0xfa }; // #89b4fa
    pub const GREEN:  Self = Self { r: 0xa6, g: 0xe3, b: 0xa1 }; // #a6e3a1
    pub const YELLOW: Self = Self { r: 0xf9, g: 0xe2, b: 0xaf }; // #f9e2af
    pub const RED:    Self = Self { r: 0xf3, g: 0x8b, b: 0xa8 }; // #f38ba8
    pub const GREY:   Self = Self { r: 0x93, g: 0x99, b: 0xb2 }; // #9399b2

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RGB`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };
        // `#abc` → `#aabbcc`
        let nibble = |s: &str| -> Option<u8> { byte(s).map(|n| n * 0x11) };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
            }),
            3 => Some(Self {
                r: nibble(&hex[0..1])?,
                g: nibble(&hex[1..2])?,
                b: nibble(&hex[2..3])?,
            }),
            _ => None,
        }
    }

    /// 24-bit foreground escape sequence.
    #[inline]
    pub fn ansi_fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}
