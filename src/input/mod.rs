//! Input encoder (§4.F, component F): keyboard and mouse event → PTY bytes.

pub mod keymap;
pub mod mouse;

pub use keymap::{encode_key, encode_text, ModMask};
pub use mouse::{encode_mouse, MouseButton, MouseEventKind, Modifiers};
