//! Cell attribute bits and colour representation.
//!
//! The attribute bitset and the tagged fg/bg colour encoding follow the same
//! shape as the reference terminal's `ATTR_*` bitset and the teacher's
//! `AttributeColor` pack/unpack (`Palette`/`Rgb`/tag-byte scheme), adapted to
//! the smaller colour space this spec calls for (palette index or direct RGB,
//! no SAUCE "extended palette").

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u16 {
        const NONE       = 0;
        const BOLD       = 1 << 0;
        const FAINT      = 1 << 1;
        const ITALIC     = 1 << 2;
        const UNDERLINE  = 1 << 3;
        const BLINK      = 1 << 4;
        const REVERSE    = 1 << 5;
        const INVISIBLE  = 1 << 6;
        const STRIKE     = 1 << 7;
        const WRAP       = 1 << 8;
        const WIDE       = 1 << 9;
        const WDUMMY     = 1 << 10;
    }
}

/// A foreground or background colour: a palette index (0..=255) or a direct
/// RGB triple, distinguished by a tag so both fit in one small value.
///
/// `Default` is the "use the terminal's default colour" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Palette(u8),
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

const TAG_DEFAULT: u32 = 0xFF00_0000;
const TAG_RGB: u32 = 0x0200_0000;
const TAG_PALETTE: u32 = 0x0100_0000;

impl Color {
    /// Pack into a tagged `u32`, the form used when a colour needs to be
    /// stored inline in a `Cell` rather than carried as an enum.
    pub fn to_u32(self) -> u32 {
        match self {
            Color::Default => TAG_DEFAULT,
            Color::Palette(idx) => TAG_PALETTE | u32::from(idx),
            Color::Rgb(r, g, b) => TAG_RGB | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b),
        }
    }

    pub fn from_u32(v: u32) -> Color {
        match v & 0xFF00_0000 {
            TAG_DEFAULT => Color::Default,
            TAG_RGB => Color::Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8),
            TAG_PALETTE => Color::Palette(v as u8),
            _ => Color::Default,
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, Color::Default)
    }

    /// The 8 standard ANSI colours, `30..=37` / `40..=47`.
    pub fn from_ansi_index(n: u8) -> Color {
        Color::Palette(n)
    }

    /// The 8 bright ANSI colours, `90..=97` / `100..=107`.
    pub fn from_bright_ansi_index(n: u8) -> Color {
        Color::Palette(n + 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default() {
        assert_eq!(Color::from_u32(Color::Default.to_u32()), Color::Default);
    }

    #[test]
    fn roundtrip_palette() {
        let c = Color::Palette(200);
        assert_eq!(Color::from_u32(c.to_u32()), c);
    }

    #[test]
    fn roundtrip_rgb() {
        let c = Color::Rgb(10, 20, 30);
        assert_eq!(Color::from_u32(c.to_u32()), c);
    }

    #[test]
    fn bright_offsets_by_eight() {
        assert_eq!(Color::from_bright_ansi_index(0), Color::Palette(8));
        assert_eq!(Color::from_bright_ansi_index(7), Color::Palette(15));
    }
}
