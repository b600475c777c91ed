//! Plain-data configuration record (§10 Ambient Stack: Configuration).
//!
//! Loading this from a file or the CLI surface described in SPEC_FULL.md §6
//! is out of scope for this crate (§1); an embedder constructs one in code,
//! the way `icy_engine`'s `TerminalState`/`Caret` take plain constructor
//! arguments rather than reading environment/config themselves.

use crate::decode::C1Utf8As;
use crate::input::Modifiers;

/// Tunables referenced throughout §4 and §9.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Policy for C1 controls arriving while UTF8 mode is on (§4.A).
    pub c1utf8_as: C1Utf8As,
    /// Characters treated as word-selection delimiters (§4.E), default a
    /// single space.
    pub word_delimiters: String,
    /// Maximum gap between clicks counted as a double click (§4.E).
    pub double_click_ms: i64,
    /// Maximum gap between clicks counted as a triple click (§4.E).
    pub triple_click_ms: i64,
    /// Modifier mask that routes a mouse event to the selection engine
    /// instead of the running application's mouse-tracking mode (§4.F).
    pub forceselmod: Modifiers,
    /// Column spacing of hardware tab stops (§4.D).
    pub tab_width: i32,
    /// Whether DECCOLM (CSI ?3h/l) is allowed to resize the screen (§4.H).
    pub enable_column_change: bool,
    /// Whether a DECCOLM-triggered resize also clears the screen (§4.H).
    pub clear_on_deccolm: bool,
    /// Whether OSC 0/1/2 may set the window title (§4.C.v); this project's
    /// deliberate policy is more restrictive than xterm's.
    pub writable_status_line: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            c1utf8_as: C1Utf8As::empty(),
            word_delimiters: " ".to_string(),
            double_click_ms: 300,
            triple_click_ms: 600,
            forceselmod: Modifiers { shift: true, ctrl: false, meta: false },
            tab_width: 8,
            enable_column_change: false,
            clear_on_deccolm: false,
            writable_status_line: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let o = Options::default();
        assert_eq!(o.word_delimiters, " ");
        assert!(!o.enable_column_change);
        assert!(!o.writable_status_line);
    }
}
