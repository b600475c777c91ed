//! Reply / query handlers (§4.G, component G).
//!
//! Static replies are plain byte-string constants; the handful that carry a
//! parameter (cursor position) are small formatting functions. None of this
//! allocates more than the one `String`/`Vec` it returns — these are called
//! once per incoming query, not on the hot per-byte path.

/// DA1 (Primary Device Attributes) response to `CSI c` / `CSI 0c`.
pub const DA1_RESPONSE: &[u8] = b"\x1B[?65;1;2;7;9;12;18;19;21;22;23;24;42;44;45;46c";

/// DA2 (Secondary Device Attributes) response to `CSI > c`.
pub const DA2_RESPONSE: &[u8] = b"\x1B[>41;1;0c";

/// DECID, the VT52-era equivalent of DA1.
pub const DECID_RESPONSE: &[u8] = b"\x1B[?6c";

/// DECRQSS reply confirming DECSCL (VT level 65, "1" = no further
/// qualification bits in this implementation).
pub const DECRQSS_DECSCL_RESPONSE: &[u8] = b"\x1BP65;1\"p\x1B\\";

/// Bracketed-paste start/end framing (mode 2004).
pub const BRACKETED_PASTE_BEGIN: &[u8] = b"\x1B[200~";
pub const BRACKETED_PASTE_END: &[u8] = b"\x1B[201~";

/// Focus-in/out reports (mode 1004).
pub const FOCUS_IN: &[u8] = b"\x1B[I";
pub const FOCUS_OUT: &[u8] = b"\x1B[O";

/// OSC 52 empty-clipboard reply: the security policy of §4.C.v means a
/// `payload == "?"` query is always answered with nothing, regardless of
/// what the clipboard backend actually holds.
pub fn osc52_empty_reply(target: char) -> Vec<u8> {
    format!("\x1B]52;{target};\x1B\\").into_bytes()
}

/// DSR cursor-position reply: `CSI <y+1> ; <x+1> R`, 1-based.
pub fn dsr_cursor_reply(x: i32, y: i32) -> Vec<u8> {
    format!("\x1B[{};{}R", y + 1, x + 1).into_bytes()
}

/// Wrap paste text in bracketed-paste framing when mode 2004 is on.
pub fn bracket_paste(text: &str, bracketed: bool) -> Vec<u8> {
    if !bracketed {
        return text.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(text.len() + BRACKETED_PASTE_BEGIN.len() + BRACKETED_PASTE_END.len());
    out.extend_from_slice(BRACKETED_PASTE_BEGIN);
    out.extend_from_slice(text.as_bytes());
    out.extend_from_slice(BRACKETED_PASTE_END);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsr_cursor_is_one_based() {
        assert_eq!(dsr_cursor_reply(0, 0), b"\x1B[1;1R".to_vec());
        assert_eq!(dsr_cursor_reply(7, 3), b"\x1B[4;8R".to_vec());
    }

    #[test]
    fn osc52_query_reply_is_empty() {
        assert_eq!(osc52_empty_reply('c'), b"\x1B]52;c;\x1B\\".to_vec());
    }

    #[test]
    fn bracket_paste_framing() {
        assert_eq!(bracket_paste("hi", true), b"\x1B[200~hi\x1B[201~".to_vec());
        assert_eq!(bracket_paste("hi", false), b"hi".to_vec());
    }
}
