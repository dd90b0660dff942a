//! The drawing palette

use haze_core::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteColor {
    pub hex: u32,
    pub name: &'static str,
}

impl PaletteColor {
    pub fn color(&self) -> Color {
        Color::from_hex(self.hex)
    }
}

const fn entry(hex: u32, name: &'static str) -> PaletteColor {
    PaletteColor { hex, name }
}

/// Twelve colors in picker order: eight hues, then four greys from black to white
pub const PALETTE: [PaletteColor; 12] = [
    entry(0xED1C24, "Red"),
    entry(0xFF7F27, "Orange"),
    entry(0xFCD404, "Yellow"),
    entry(0x00B300, "Green"),
    entry(0x4CEAEF, "Cyan"),
    entry(0x3C50F0, "Blue"),
    entry(0x6B50F6, "Purple"),
    entry(0xEC1F80, "Fuchsia"),
    entry(0x000000, "Black"),
    entry(0x444444, "Gray"),
    entry(0x787878, "Light Gray"),
    entry(0xFFFFFF, "White"),
];

/// Palette name of `color`, compared at 8-bit precision
pub fn color_name(color: Color) -> Option<&'static str> {
    let rgba = color.to_rgba8();
    PALETTE
        .iter()
        .find(|p| p.color().to_rgba8() == rgba)
        .map(|p| p.name)
}

/// Palette name, or the hex code for colors outside the palette
pub fn display_name(color: Color) -> String {
    color_name(color).map_or_else(|| color.to_hex(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_colors() {
        assert_eq!(color_name(Color::WHITE), Some("White"));
        assert_eq!(color_name(Color::BLACK), Some("Black"));
        assert_eq!(
            color_name(Color::parse_hex("#ed1c24").unwrap()),
            Some("Red")
        );
    }

    #[test]
    fn unknown_color_shows_hex() {
        let teal = Color::parse_hex("#008080").unwrap();
        assert_eq!(color_name(teal), None);
        assert_eq!(display_name(teal), "#008080");
        assert_eq!(display_name(Color::from_hex(0x787878)), "Light Gray");
    }

    #[test]
    fn palette_entries_are_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a.hex, b.hex);
                assert_ne!(a.name, b.name);
            }
        }
    }
}
