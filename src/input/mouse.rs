//! Mouse event encoding (§4.F), subject to the `MOUSE*` mode bits.
//!
//! Grounded in the teacher's `mouse_handling.rs` X10/VT200/ButtonEvents
//! encoding (`generate_mouse_report`), generalised to the spec's exact wire
//! formats and with SGR mode implemented properly rather than left as the
//! teacher's commented-out sketch.

use crate::mode::{Mode, ModeRegister};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    None,
}

impl MouseButton {
    fn code(self) -> i32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::WheelUp => 64,
            MouseButton::WheelDown => 65,
            MouseButton::None => 3,
        }
    }

    fn is_wheel(self) -> bool {
        matches!(self, MouseButton::WheelUp | MouseButton::WheelDown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    /// `forceselmod`: the default configurable mask is Shift.
    pub fn bypasses_mouse_mode(self, force_mask: Modifiers) -> bool {
        (force_mask.shift && self.shift) || (force_mask.ctrl && self.ctrl) || (force_mask.meta && self.meta)
    }
}

fn modifier_bits(m: Modifiers) -> i32 {
    (if m.shift { 4 } else { 0 }) | (if m.meta { 8 } else { 0 }) | (if m.ctrl { 16 } else { 0 })
}

/// Clamp xterm-style unsigned-byte coordinates at 223 (so `32+coord` never
/// exceeds 255), used by every mode except SGR.
fn clamp_legacy(v: i32) -> i32 {
    v.min(223)
}

/// Encode a mouse event per the active mouse mode. Returns `None` when no
/// mouse mode is enabled, or when the event shouldn't be reported under the
/// active mode (e.g. a release under MOUSEX10).
pub fn encode_mouse(
    mode: &ModeRegister,
    kind: MouseEventKind,
    button: MouseButton,
    x: i32,
    y: i32,
    mods: Modifiers,
    motion_button_held: bool,
) -> Option<Vec<u8>> {
    if !mode.mouse_enabled() {
        return None;
    }

    if matches!(kind, MouseEventKind::Motion) {
        let reports_any_motion = mode.is_set(Mode::MOUSEMANY);
        let reports_button_motion = mode.is_set(Mode::MOUSEMOTION) && motion_button_held;
        if !reports_any_motion && !reports_button_motion {
            return None;
        }
    }

    if mode.is_set(Mode::MOUSEX10) {
        if !matches!(kind, MouseEventKind::Press) {
            return None;
        }
        let cb = 32 + button.code();
        return Some(vec![
            0x1B,
            b'[',
            b'M',
            cb as u8,
            (32 + clamp_legacy(x + 1)) as u8,
            (32 + clamp_legacy(y + 1)) as u8,
        ]);
    }

    if mode.is_set(Mode::MOUSESGR) {
        let mut cb = button.code();
        if matches!(kind, MouseEventKind::Motion) {
            cb += 32;
        }
        if !button.is_wheel() {
            cb += modifier_bits(mods);
        }
        let final_byte = if matches!(kind, MouseEventKind::Release) { 'm' } else { 'M' };
        return Some(format!("\x1B[<{};{};{}{}", cb, x + 1, y + 1, final_byte).into_bytes());
    }

    // VT200 / ButtonEvents / AnyEvents legacy encoding.
    let mut cb = if matches!(kind, MouseEventKind::Release) { 3 } else { button.code() };
    if matches!(kind, MouseEventKind::Motion) {
        cb = if motion_button_held { button.code() + 32 } else { 32 + 3 };
    }
    if !button.is_wheel() {
        cb += modifier_bits(mods);
    }
    let cb = 32 + cb;
    Some(vec![
        0x1B,
        b'[',
        b'M',
        cb as u8,
        (32 + clamp_legacy(x + 1)) as u8,
        (32 + clamp_legacy(y + 1)) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_press_no_modifiers() {
        let mut mode = ModeRegister::new();
        mode.set(Mode::MOUSEBTN, true);
        mode.set(Mode::MOUSESGR, true);
        let bytes = encode_mouse(&mode, MouseEventKind::Press, MouseButton::Left, 3, 7, Modifiers::default(), false).unwrap();
        assert_eq!(bytes, b"\x1B[<0;4;8M".to_vec());
    }

    #[test]
    fn sgr_release() {
        let mut mode = ModeRegister::new();
        mode.set(Mode::MOUSEBTN, true);
        mode.set(Mode::MOUSESGR, true);
        let bytes = encode_mouse(&mode, MouseEventKind::Release, MouseButton::Left, 3, 7, Modifiers::default(), false).unwrap();
        assert_eq!(bytes, b"\x1B[<0;4;8m".to_vec());
    }

    #[test]
    fn x10_press_only() {
        let mut mode = ModeRegister::new();
        mode.set(Mode::MOUSEX10, true);
        assert!(encode_mouse(&mode, MouseEventKind::Release, MouseButton::Left, 0, 0, Modifiers::default(), false).is_none());
        let bytes = encode_mouse(&mode, MouseEventKind::Press, MouseButton::Left, 0, 0, Modifiers::default(), false).unwrap();
        assert_eq!(bytes, vec![0x1B, b'[', b'M', 32, 33, 33]);
    }

    #[test]
    fn no_mouse_mode_reports_nothing() {
        let mode = ModeRegister::new();
        assert!(encode_mouse(&mode, MouseEventKind::Press, MouseButton::Left, 0, 0, Modifiers::default(), false).is_none());
    }

    #[test]
    fn wheel_encodes_as_64_65_no_release() {
        let mut mode = ModeRegister::new();
        mode.set(Mode::MOUSEBTN, true);
        mode.set(Mode::MOUSESGR, true);
        let bytes = encode_mouse(&mode, MouseEventKind::Press, MouseButton::WheelUp, 0, 0, Modifiers::default(), false).unwrap();
        assert_eq!(bytes, b"\x1B[<64;1;1M".to_vec());
    }
}
