use crate::attribute::{Attr, Color};
use crate::position::Position;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CursorFlags: u8 {
        const WRAPNEXT = 1 << 0;
        const ORIGIN   = 1 << 1;
    }
}

/// The cursor position plus the SGR state stamped onto the next printed
/// cell, and the two sticky flags the escape state machine toggles.
///
/// Grounded in the teacher's `Caret`, generalised from DOS font-page/legacy
/// attribute-byte state to the wider SGR attribute set this spec needs, and
/// with `flags` added for WRAPNEXT/ORIGIN (the teacher has no analogue —
/// its buffers don't model deferred line wrap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub pos: Position,
    pub attr: Attr,
    pub fg: Color,
    pub bg: Color,
    pub flags: CursorFlags,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            pos: Position::default(),
            attr: Attr::NONE,
            fg: Color::Default,
            bg: Color::Default,
            flags: CursorFlags::empty(),
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Cursor::default()
    }

    pub fn reset_attr(&mut self) {
        self.attr = Attr::NONE;
        self.fg = Color::Default;
        self.bg = Color::Default;
    }

    pub fn is_wrapnext(&self) -> bool {
        self.flags.contains(CursorFlags::WRAPNEXT)
    }

    pub fn set_wrapnext(&mut self, on: bool) {
        self.flags.set(CursorFlags::WRAPNEXT, on);
    }

    pub fn is_origin(&self) -> bool {
        self.flags.contains(CursorFlags::ORIGIN)
    }

    pub fn set_origin(&mut self, on: bool) {
        self.flags.set(CursorFlags::ORIGIN, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cursor_at_origin_no_flags() {
        let c = Cursor::default();
        assert_eq!(c.pos, Position::new(0, 0));
        assert!(!c.is_wrapnext());
        assert!(!c.is_origin());
    }

    #[test]
    fn reset_attr_clears_colors() {
        let mut c = Cursor::default();
        c.fg = Color::Palette(3);
        c.attr = Attr::BOLD;
        c.reset_attr();
        assert_eq!(c.fg, Color::Default);
        assert!(c.attr.is_empty());
    }
}
