//! Anchored selection tracking over the grid (§4.E).
//!
//! Shaped after the teacher's `Selection`/`Shape` (anchor + lead, rectangular
//! vs. linear), but grounded directly in the spec's state machine: a 3-state
//! lifecycle (`Idle`/`Empty`/`Ready`), word/line snapping driven by the
//! screen's WRAP attribute rather than a generic "delimiter mask", and
//! `on_scroll` clamping instead of the teacher's scroll-free buffer model.

use crate::attribute::Attr;
use crate::position::Position;
use crate::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Idle,
    Empty,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionKind {
    #[default]
    Regular,
    Rectangular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Snap {
    #[default]
    None,
    Word,
    Line,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub mode: SelectionMode,
    pub kind: SelectionKind,
    pub snap: Snap,
    origin_begin: Position,
    origin_end: Position,
    normalized_begin: Position,
    normalized_end: Position,
    which_screen_alt: bool,
    t_click1: i64,
    t_click2: i64,
    pub word_delimiters: String,
    pub double_click_ms: i64,
    pub triple_click_ms: i64,
    /// The "primary" selection buffer (OSC 52 target `p`), owned here per
    /// §5 ("clipboard buffers are owned by the selection engine but read by
    /// the reply handler").
    primary_text: Option<String>,
    /// The "clipboard" buffer (OSC 52 target `c`).
    clipboard_text: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection {
            word_delimiters: " ".to_string(),
            double_click_ms: 300,
            triple_click_ms: 600,
            origin_begin: Position::new(-1, -1),
            origin_end: Position::new(-1, -1),
            // Far enough in the past that the very first click a caller
            // ever reports can't be misread as the second or third of a
            // sequence, no matter what monotonic epoch `now_ms` uses.
            t_click1: i64::MIN / 2,
            t_click2: i64::MIN / 2,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.mode, SelectionMode::Idle)
    }

    pub fn clear(&mut self) {
        self.mode = SelectionMode::Idle;
        self.origin_begin = Position::new(-1, -1);
        self.origin_end = Position::new(-1, -1);
    }

    /// Button-down: start a fresh selection anchored at `pos`. `now_ms` is a
    /// monotonic timestamp supplied by the caller (the engine never reads a
    /// wall clock itself).
    pub fn start(&mut self, pos: Position, kind: SelectionKind, alt: bool, now_ms: i64) {
        self.snap = if now_ms.saturating_sub(self.t_click2) <= self.triple_click_ms {
            Snap::Line
        } else if now_ms.saturating_sub(self.t_click1) <= self.double_click_ms {
            Snap::Word
        } else {
            Snap::None
        };
        self.t_click2 = self.t_click1;
        self.t_click1 = now_ms;

        self.mode = SelectionMode::Empty;
        self.kind = kind;
        self.which_screen_alt = alt;
        self.origin_begin = pos;
        self.origin_end = pos;
        self.normalized_begin = pos;
        self.normalized_end = pos;
    }

    /// Drag: update the end anchor and recompute the normalized range.
    pub fn extend(&mut self, pos: Position, screen: &Screen) {
        if matches!(self.mode, SelectionMode::Idle) {
            return;
        }
        self.mode = SelectionMode::Ready;
        self.origin_end = pos;
        self.normalize(screen);
    }

    fn normalize(&mut self, screen: &Screen) {
        let (begin, end) = if self.origin_begin <= self.origin_end {
            (self.origin_begin, self.origin_end)
        } else {
            (self.origin_end, self.origin_begin)
        };
        self.normalized_begin = begin;
        self.normalized_end = end;

        match self.snap {
            Snap::None => {}
            Snap::Word => self.snap_word(screen),
            Snap::Line => self.snap_line(screen),
        }

        if matches!(self.kind, SelectionKind::Regular) {
            let line_len = line_length(screen, self.normalized_begin.y);
            if self.normalized_begin.x > line_len {
                self.normalized_begin.x = line_len;
            }
            let end_len = line_length(screen, self.normalized_end.y);
            if self.normalized_end.x >= end_len {
                self.normalized_end.x = screen.cols() - 1;
            }
        }
    }

    fn is_delimiter(&self, ch: char) -> bool {
        self.word_delimiters.contains(ch)
    }

    fn snap_word(&mut self, screen: &Screen) {
        let is_delim = |x: i32, y: i32, sel: &Selection| sel.is_delimiter(screen.get_cell(x, y).ch);

        let mut by = self.normalized_begin.y;
        let mut bx = self.normalized_begin.x;
        loop {
            let cur = is_delim(bx, by, self);
            let prev_x = bx - 1;
            if prev_x >= 0 {
                if is_delim(prev_x, by, self) == cur {
                    bx = prev_x;
                    continue;
                }
            } else if by > 0 && row_wrapped(screen, by - 1) {
                by -= 1;
                bx = screen.cols() - 1;
                continue;
            }
            break;
        }

        let mut ey = self.normalized_end.y;
        let mut ex = self.normalized_end.x;
        loop {
            let cur = is_delim(ex, ey, self);
            let next_x = ex + 1;
            if next_x < screen.cols() {
                if is_delim(next_x, ey, self) == cur {
                    ex = next_x;
                    continue;
                }
            } else if row_wrapped(screen, ey) {
                ey += 1;
                ex = 0;
                continue;
            }
            break;
        }

        self.normalized_begin = Position::new(bx, by);
        self.normalized_end = Position::new(ex, ey);
    }

    fn snap_line(&mut self, screen: &Screen) {
        let mut by = self.normalized_begin.y;
        while by > 0 && row_wrapped(screen, by - 1) {
            by -= 1;
        }
        let mut ey = self.normalized_end.y;
        while row_wrapped(screen, ey) && ey + 1 < screen.rows() {
            ey += 1;
        }
        self.normalized_begin = Position::new(0, by);
        self.normalized_end = Position::new(screen.cols() - 1, ey);
    }

    /// O(1) membership predicate.
    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        if self.is_empty() {
            return false;
        }
        let (b, e) = (self.normalized_begin, self.normalized_end);
        match self.kind {
            SelectionKind::Rectangular => {
                let (x1, x2) = (b.x.min(e.x), b.x.max(e.x));
                let (y1, y2) = (b.y.min(e.y), b.y.max(e.y));
                x >= x1 && x <= x2 && y >= y1 && y <= y2
            }
            SelectionKind::Regular => {
                if y < b.y || y > e.y {
                    return false;
                }
                if b.y == e.y {
                    x >= b.x && x <= e.x
                } else if y == b.y {
                    x >= b.x
                } else if y == e.y {
                    x <= e.x
                } else {
                    true
                }
            }
        }
    }

    /// `extract_text`: UTF-8 text for the selected rows.
    pub fn extract_text(&self, screen: &Screen) -> String {
        if self.is_empty() {
            return String::new();
        }
        let (b, e) = (self.normalized_begin, self.normalized_end);
        let mut out = String::new();
        for y in b.y..=e.y {
            let (row_start, row_end) = match self.kind {
                SelectionKind::Rectangular => (b.x.min(e.x), b.x.max(e.x)),
                SelectionKind::Regular => {
                    let start = if y == b.y { b.x } else { 0 };
                    let end = if y == e.y { e.x } else { screen.cols() - 1 };
                    (start, end)
                }
            };
            let mut last_non_space = row_start - 1;
            for x in row_start..=row_end.min(screen.cols() - 1) {
                let cell = screen.get_cell(x, y);
                if cell.is_wdummy() {
                    continue;
                }
                if !self.is_selected(x, y) {
                    continue;
                }
                if cell.ch != ' ' {
                    last_non_space = x;
                }
                out.push(cell.ch);
            }
            // Trim trailing spaces we just appended past the last non-space.
            let trim = (row_end.min(screen.cols() - 1) - last_non_space).max(0) as usize;
            out.truncate(out.len().saturating_sub(trim));

            let line_wrapped = row_wrapped(screen, y);
            let covers_end = row_end >= line_length(screen, y).max(0) - 1 || row_end >= screen.cols() - 1;
            if y != e.y && !(line_wrapped && covers_end) {
                out.push('\n');
            }
        }
        out
    }

    /// `on_scroll`: shift or clear the selection when its rows scroll.
    pub fn on_scroll(&mut self, origin: i32, bot: i32, delta: i32) {
        if self.is_empty() || delta == 0 {
            return;
        }
        let begin_in = self.normalized_begin.y >= origin && self.normalized_begin.y <= bot;
        let end_in = self.normalized_end.y >= origin && self.normalized_end.y <= bot;
        if !begin_in && !end_in {
            return;
        }
        self.normalized_begin.y += delta;
        self.normalized_end.y += delta;
        self.origin_begin.y += delta;
        self.origin_end.y += delta;

        if self.normalized_end.y < origin || self.normalized_begin.y > bot {
            self.clear();
            return;
        }
        if matches!(self.kind, SelectionKind::Regular) {
            if self.normalized_begin.y < origin {
                self.normalized_begin.y = origin;
                self.normalized_begin.x = 0;
            }
            if self.normalized_end.y > bot {
                self.normalized_end.y = bot;
            }
        }
    }

    /// OSC 52 target `p`: read the primary selection buffer.
    pub fn primary_text(&self) -> Option<&str> {
        self.primary_text.as_deref()
    }

    /// OSC 52 target `c`: read the clipboard buffer.
    pub fn clipboard_text(&self) -> Option<&str> {
        self.clipboard_text.as_deref()
    }

    pub fn set_primary_text(&mut self, text: String) {
        self.primary_text = Some(text);
    }

    pub fn set_clipboard_text(&mut self, text: String) {
        self.clipboard_text = Some(text);
    }

    /// Mutation inside the selection's rectangle (e.g. `clear_region`)
    /// invalidates it.
    pub fn clear_if_intersects(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if self.is_empty() {
            return;
        }
        for y in y1..=y2 {
            for x in x1..=x2 {
                if self.is_selected(x, y) {
                    self.clear();
                    return;
                }
            }
        }
    }
}

fn row_wrapped(screen: &Screen, y: i32) -> bool {
    let cols = screen.cols();
    if cols == 0 {
        return false;
    }
    screen.get_cell(cols - 1, y).attr.contains(Attr::WRAP)
}

fn line_length(screen: &Screen, y: i32) -> i32 {
    let mut len = 0;
    for x in 0..screen.cols() {
        if screen.get_cell(x, y).ch != ' ' {
            len = x + 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_screen() -> Screen {
        let mut s = Screen::new(10, 5);
        for y in 0..5 {
            for x in 0..10 {
                s.move_to_absolute(x, y);
                s.write_character('a', 1);
            }
        }
        s
    }

    #[test]
    fn regular_selection_predicate() {
        let screen = filled_screen();
        let mut sel = Selection::new();
        sel.start(Position::new(2, 1), SelectionKind::Regular, false, 0);
        sel.extend(Position::new(4, 2), &screen);
        assert!(sel.is_selected(5, 1));
        assert!(!sel.is_selected(1, 1));
        assert!(sel.is_selected(0, 2));
        assert!(!sel.is_selected(5, 2));
    }

    #[test]
    fn rectangular_selection_predicate() {
        let screen = filled_screen();
        let mut sel = Selection::new();
        sel.start(Position::new(2, 1), SelectionKind::Rectangular, false, 0);
        sel.extend(Position::new(4, 2), &screen);
        assert!(sel.is_selected(3, 1));
        assert!(!sel.is_selected(1, 1));
        assert!(!sel.is_selected(5, 2));
    }

    #[test]
    fn on_scroll_shifts_and_clears() {
        let mut sel = Selection::new();
        let screen = filled_screen();
        sel.start(Position::new(0, 2), SelectionKind::Regular, false, 0);
        sel.extend(Position::new(0, 3), &screen);
        sel.on_scroll(0, 4, -1);
        assert!(!sel.is_empty());
        assert_eq!(sel.is_selected(0, 1), true);
        sel.on_scroll(0, 4, -5);
        assert!(sel.is_empty());
    }

    #[test]
    fn extract_text_trims_trailing_spaces() {
        let mut screen = Screen::new(5, 1);
        screen.move_to_absolute(0, 0);
        for c in "ab".chars() {
            screen.write_character(c, 1);
        }
        let mut sel = Selection::new();
        sel.start(Position::new(0, 0), SelectionKind::Regular, false, 0);
        sel.extend(Position::new(4, 0), &screen);
        assert_eq!(sel.extract_text(&screen), "ab");
    }
}
