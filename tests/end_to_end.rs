//! End-to-end scenarios driving a full `Emulator` through its public API,
//! the way the teacher's `tests/parser/*` integration tests drive a full
//! `Buffer`/`Parser` pair rather than a single internal function.

use pretty_assertions::assert_eq;
use termcore::input::{MouseButton, MouseEventKind, Modifiers};
use termcore::{Attr, ClipboardTarget, Color, DriverEvent, Emulator, Options, Position};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn emu(cols: i32, rows: i32) -> Emulator {
    init();
    Emulator::new(cols, rows, Options::default())
}

#[test]
fn da1_and_da2_replies() {
    let mut e = emu(80, 24);
    let out = e.feed(b"\x1B[c");
    assert_eq!(out.reply, b"\x1B[?65;1;2;7;9;12;18;19;21;22;23;24;42;44;45;46c".to_vec());

    let out = e.feed(b"\x1B[>c");
    assert_eq!(out.reply, b"\x1B[>41;1;0c".to_vec());
}

#[test]
fn dsr_cursor_position_report() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B[10;20H");
    let out = e.feed(b"\x1B[6n");
    assert_eq!(out.reply, b"\x1B[10;20R".to_vec());
}

#[test]
fn decrqss_decscl_reply() {
    let mut e = emu(80, 24);
    let out = e.feed(b"\x1BP$q\"p\x1B\\");
    assert_eq!(out.reply, b"\x1BP65;1\"p\x1B\\".to_vec());
}

#[test]
fn title_change_requires_writable_status_line() {
    let mut opts = Options::default();
    opts.writable_status_line = false;
    let mut e = Emulator::new(80, 24, opts);
    let out = e.feed(b"\x1B]2;ignored title\x07");
    assert!(out.events.is_empty());

    let mut opts = Options::default();
    opts.writable_status_line = true;
    let mut e = Emulator::new(80, 24, opts);
    let out = e.feed(b"\x1B]2;my title\x07");
    assert_eq!(out.events, vec![DriverEvent::TitleChanged("my title".to_string())]);
}

#[test]
fn osc52_set_then_query_reads_back_via_selection_not_pty() {
    let mut e = emu(80, 24);
    // "hello" base64-encoded.
    let out = e.feed(b"\x1B]52;c;aGVsbG8=\x07");
    assert!(out.reply.is_empty());
    assert_eq!(e.selection.clipboard_text(), Some("hello"));

    // A query never echoes the stored text back, by policy.
    let out = e.feed(b"\x1B]52;c;?\x07");
    assert_eq!(out.reply, b"\x1B]52;c;\x1B\\".to_vec());
}

#[test]
fn osc4_palette_set_and_reset_round_trip() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B]4;5;#112233\x07");
    assert_eq!(e.palette.get(5), Color::Rgb(0x11, 0x22, 0x33));
    e.feed(b"\x1B]104;5\x07");
    assert_eq!(e.palette.get(5), Color::Palette(5));
}

#[test]
fn bracketed_paste_round_trip() {
    let mut e = emu(80, 24);
    assert_eq!(e.paste_text("hi"), b"hi".to_vec());
    e.feed(b"\x1B[?2004h");
    assert_eq!(e.paste_text("hi"), b"\x1B[200~hi\x1B[201~".to_vec());
}

#[test]
fn focus_events_gated_by_mode_and_state_change() {
    let mut e = emu(80, 24);
    assert!(e.set_focus(false).is_empty()); // mode off: nothing emitted
    e.feed(b"\x1B[?1004h");
    assert!(e.set_focus(false).is_empty()); // already unfocused: no change
    assert_eq!(e.set_focus(true), b"\x1B[I".to_vec());
    assert_eq!(e.set_focus(false), b"\x1B[O".to_vec());
}

#[test]
fn selection_survives_scroll_and_extracts_text() {
    let mut e = emu(10, 5);
    e.feed(b"AAAAAAAAAA\r\nBBBBBBBBBB\r\nCCCCCCCCCC\r\nDDDDDDDDDD\r\nEEEEEEEEEE");
    e.selection.start(Position::new(0, 1), termcore::SelectionKind::Regular, false, 0);
    e.selection.extend(Position::new(9, 1), &e.screen);
    assert_eq!(e.selection.extract_text(&e.screen), "BBBBBBBBBB");

    // Cursor is on the bottom scroll-region row; one more newline scrolls
    // everything up by one, and the selection's row index follows it.
    e.feed(b"\r\nFFFFFFFFFF");
    assert_eq!(e.screen.get_cell(0, 0).ch, 'B');
    assert_eq!(e.selection.extract_text(&e.screen), "BBBBBBBBBB");
}

#[test]
fn decstbm_single_param_keeps_bottom_margin_at_last_row() {
    let mut e = emu(10, 10);
    // Top-only form: bottom margin must default to the last row, not
    // collapse the region back to the full screen.
    e.feed(b"\x1B[5r");
    e.feed(b"\x1B[1;1H");
    for _ in 0..20 {
        e.feed(b"X\r\n");
    }
    // Row 0 sits above the scroll region (top margin = row 4) and is
    // written exactly once before the cursor reaches the region; later
    // scrolling must not touch it, even after the region's bottom has
    // wrapped around many times.
    assert_eq!(e.screen.get_cell(0, 0).ch, 'X');
    // Row 4 (the scroll-region top) was overwritten by scroll-up shifting
    // row 5's content into it, so it no longer holds its original write.
    assert_ne!(e.screen.get_cell(0, 4).ch, ' ');
}

#[test]
fn mouse_press_then_release_legacy_encoding() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B[?1000h");
    let press = e.encode_mouse(MouseEventKind::Press, MouseButton::Left, 0, 0, Modifiers::default(), false).unwrap();
    assert_eq!(press, vec![0x1B, b'[', b'M', 32, 33, 33]);
    let release = e.encode_mouse(MouseEventKind::Release, MouseButton::Left, 0, 0, Modifiers::default(), false).unwrap();
    assert_eq!(release, vec![0x1B, b'[', b'M', 32 + 3, 33, 33]);
}

#[test]
fn forceselmod_bypasses_mouse_mode() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B[?1000h");
    let shifted = Modifiers { shift: true, ctrl: false, meta: false };
    assert!(e.encode_mouse(MouseEventKind::Press, MouseButton::Left, 0, 0, shifted, false).is_none());
}

#[test]
fn resize_preserves_cursor_relative_content() {
    let mut e = emu(10, 10);
    e.feed(b"hello");
    e.screen.resize(10, 4);
    e.screen.resize(10, 4);
    assert_eq!(e.screen.get_cell(0, 0).ch, 'h');
}

#[test]
fn sgr_256_and_rgb_colors() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B[38;5;200mA");
    assert_eq!(e.screen.get_cell(0, 0).fg, Color::Palette(200));
    e.feed(b"\x1B[48;2;10;20;30mB");
    assert_eq!(e.screen.get_cell(1, 0).bg, Color::Rgb(10, 20, 30));
}

#[test]
fn bold_and_underline_compose_and_clear_independently() {
    let mut e = emu(80, 24);
    e.feed(b"\x1B[1;4mA\x1B[24mB");
    assert_eq!(e.screen.get_cell(0, 0).attr, Attr::BOLD | Attr::UNDERLINE);
    assert_eq!(e.screen.get_cell(1, 0).attr, Attr::BOLD);
}

#[test]
fn clipboard_write_event_emitted_for_embedder() {
    let mut e = emu(80, 24);
    let out = e.feed(b"\x1B]52;p;aGk=\x07");
    assert_eq!(out.events, vec![DriverEvent::ClipboardWrite { target: ClipboardTarget::Primary, text: "hi".to_string() }]);
}
