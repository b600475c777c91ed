//! Keyboard event encoding (§4.F).
//!
//! The matching rules (mask vs. ignored modifiers, tri-state mode
//! requirements, first-match-wins ordering) are the spec's; the *shape* of
//! an ordered static table matched top-to-bottom is grounded in the
//! `vtio` keyboard-encoding table this crate's mouse/selection code is
//! otherwise grounded in `icy_engine` instead, since the teacher's own
//! terminal client has no comparable keymap of its own.

use crate::mode::{Mode, ModeRegister};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModMask: u16 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

/// Matches any modifier combination.
pub const ANY: Option<ModMask> = None;

/// Tri-state mode requirement: `0` = don't care, `>0` = mode must be on,
/// `<0` = mode must be off.
pub type ModeReq = i8;

pub struct KeymapEntry {
    pub keysym: u32,
    pub mask: Option<ModMask>,
    pub output: &'static [u8],
    pub appkey_req: ModeReq,
    pub appcursor_req: ModeReq,
    pub crlf_req: ModeReq,
}

const fn entry(keysym: u32, mask: Option<ModMask>, output: &'static [u8], appkey: ModeReq, appcursor: ModeReq, crlf: ModeReq) -> KeymapEntry {
    KeymapEntry { keysym, mask, output, appkey_req: appkey, appcursor_req: appcursor, crlf_req: crlf }
}

// A representative xterm-compatible keymap. Arrow keys and the keypad
// switch encoding under DECCKM/DECPAM; Enter switches under CRLF. `ANY`
// entries must sort last for a given keysym so specific modifier
// combinations are tried first.
pub const KEYSYM_UP: u32 = 0xFF52;
pub const KEYSYM_DOWN: u32 = 0xFF54;
pub const KEYSYM_RIGHT: u32 = 0xFF53;
pub const KEYSYM_LEFT: u32 = 0xFF51;
pub const KEYSYM_HOME: u32 = 0xFF50;
pub const KEYSYM_END: u32 = 0xFF57;
pub const KEYSYM_RETURN: u32 = 0xFF0D;
pub const KEYSYM_KP_ENTER: u32 = 0xFF8D;
pub const KEYSYM_BACKSPACE: u32 = 0xFF08;
pub const KEYSYM_TAB: u32 = 0xFF09;
pub const KEYSYM_DELETE: u32 = 0xFFFF;

static KEYMAP: &[KeymapEntry] = &[
    entry(KEYSYM_UP, ANY, b"\x1BOA", 0, 1, 0),
    entry(KEYSYM_UP, ANY, b"\x1B[A", 0, -1, 0),
    entry(KEYSYM_DOWN, ANY, b"\x1BOB", 0, 1, 0),
    entry(KEYSYM_DOWN, ANY, b"\x1B[B", 0, -1, 0),
    entry(KEYSYM_RIGHT, ANY, b"\x1BOC", 0, 1, 0),
    entry(KEYSYM_RIGHT, ANY, b"\x1B[C", 0, -1, 0),
    entry(KEYSYM_LEFT, ANY, b"\x1BOD", 0, 1, 0),
    entry(KEYSYM_LEFT, ANY, b"\x1B[D", 0, -1, 0),
    entry(KEYSYM_HOME, ANY, b"\x1B[H", 0, 0, 0),
    entry(KEYSYM_END, ANY, b"\x1B[F", 0, 0, 0),
    entry(KEYSYM_RETURN, ANY, b"\r\n", 0, 0, 1),
    entry(KEYSYM_RETURN, ANY, b"\r", 0, 0, -1),
    entry(KEYSYM_KP_ENTER, ANY, b"\x1BOM", 1, 0, 0),
    entry(KEYSYM_KP_ENTER, ANY, b"\r", -1, 0, 0),
    entry(KEYSYM_BACKSPACE, ANY, b"\x7F", 0, 0, 0),
    entry(KEYSYM_TAB, ANY, b"\t", 0, 0, 0),
    entry(KEYSYM_DELETE, ANY, b"\x1B[3~", 0, 0, 0),
];

fn mode_req_satisfied(req: ModeReq, on: bool) -> bool {
    match req.signum() {
        0 => true,
        1 => on,
        _ => !on,
    }
}

/// Look up a keysym + modifier mask against the keymap, honouring
/// `ignore_mask` (e.g. numlock/layout-switch bits the caller has already
/// decided don't participate in matching). Returns the first entry whose
/// mask and mode requirements are all satisfied.
pub fn encode_key(keysym: u32, state: ModMask, ignore_mask: ModMask, mode: &ModeRegister) -> Option<&'static [u8]> {
    let effective = state & !ignore_mask;
    let appkey_on = mode.is_set(Mode::APPKEYPAD);
    let appcursor_on = mode.is_set(Mode::APPCURSOR);
    let crlf_on = mode.is_set(Mode::CRLF);

    KEYMAP.iter().find_map(|e| {
        if e.keysym != keysym {
            return None;
        }
        if let Some(m) = e.mask {
            if m != effective {
                return None;
            }
        }
        if !mode_req_satisfied(e.appkey_req, appkey_on) {
            return None;
        }
        if !mode_req_satisfied(e.appcursor_req, appcursor_on) {
            return None;
        }
        if !mode_req_satisfied(e.crlf_req, crlf_on) {
            return None;
        }
        Some(e.output)
    })
}

/// Encode a printable key's text. Pre-pends ESC when Alt is held, or sets
/// bit 7 of the first byte when mode 8BIT is on instead.
pub fn encode_text(text: &str, alt_held: bool, mode: &ModeRegister) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    if alt_held {
        if mode.is_set(Mode::EIGHT_BIT) {
            if let Some(first) = bytes.first_mut() {
                *first |= 0x80;
            }
        } else {
            bytes.insert(0, 0x1B);
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_switch_on_appcursor() {
        let mut mode = ModeRegister::new();
        assert_eq!(encode_key(KEYSYM_UP, ModMask::empty(), ModMask::empty(), &mode), Some(&b"\x1B[A"[..]));
        mode.set(Mode::APPCURSOR, true);
        assert_eq!(encode_key(KEYSYM_UP, ModMask::empty(), ModMask::empty(), &mode), Some(&b"\x1BOA"[..]));
    }

    #[test]
    fn enter_switches_on_crlf() {
        let mut mode = ModeRegister::new();
        assert_eq!(encode_key(KEYSYM_RETURN, ModMask::empty(), ModMask::empty(), &mode), Some(&b"\r"[..]));
        mode.set(Mode::CRLF, true);
        assert_eq!(encode_key(KEYSYM_RETURN, ModMask::empty(), ModMask::empty(), &mode), Some(&b"\r\n"[..]));
    }

    #[test]
    fn alt_prepends_esc() {
        let mode = ModeRegister::new();
        assert_eq!(encode_text("a", true, &mode), vec![0x1B, b'a']);
        assert_eq!(encode_text("a", false, &mode), vec![b'a']);
    }

    #[test]
    fn eight_bit_sets_high_bit_instead_of_esc() {
        let mut mode = ModeRegister::new();
        mode.set(Mode::EIGHT_BIT, true);
        assert_eq!(encode_text("a", true, &mode), vec![b'a' | 0x80]);
    }
}
