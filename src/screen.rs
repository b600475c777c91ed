//! The grid of cells, cursor, scroll region and tab stops (§4.D).
//!
//! Rows are stored as independently heap-allocated `Vec<Cell>`s inside an
//! outer `Vec`, so `scroll_up`/`scroll_down` rotate row pointers (`rotate_left`
//! on the outer `Vec`) instead of copying `row * col` cells, and
//! `swap_screens` is a pointer swap between the primary and alternate grids
//! — the "arena-free lifetime" shape the design notes call for.

use crate::attribute::Attr;
use crate::cell::Cell;
use crate::cursor::Cursor;
use crate::mode::{Mode, ModeRegister};

/// A rectangle of cleared cells, reported back to the caller so it can
/// clear a selection that intersects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// A scroll within `[origin, bot]` by `delta` rows (negative = up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub origin: i32,
    pub bot: i32,
    pub delta: i32,
}

#[derive(Debug, Clone)]
struct Grid {
    cells: Vec<Vec<Cell>>,
    dirty: Vec<bool>,
}

impl Grid {
    fn new(cols: i32, rows: i32) -> Self {
        Grid {
            cells: vec![vec![Cell::blank(); cols as usize]; rows as usize],
            dirty: vec![true; rows as usize],
        }
    }

    fn mark_dirty(&mut self, y: i32) {
        if let Some(d) = self.dirty.get_mut(y as usize) {
            *d = true;
        }
    }

    fn mark_all_dirty(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d = true);
    }
}

pub struct Screen {
    cols: i32,
    rows: i32,
    primary: Grid,
    alternate: Grid,
    active_is_alt: bool,
    pub cursor: Cursor,
    saved_cursor: [Cursor; 2],
    pub top: i32,
    pub bot: i32,
    tabs: Vec<bool>,
    pub tab_width: i32,
    pub mode: ModeRegister,
}

impl Screen {
    pub fn new(cols: i32, rows: i32) -> Self {
        let mut s = Screen {
            cols,
            rows,
            primary: Grid::new(cols, rows),
            alternate: Grid::new(cols, rows),
            active_is_alt: false,
            cursor: Cursor::default(),
            saved_cursor: [Cursor::default(), Cursor::default()],
            top: 0,
            bot: rows - 1,
            tabs: Vec::new(),
            tab_width: 8,
            mode: ModeRegister::new(),
        };
        s.reset_tabs();
        s
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    fn reset_tabs(&mut self) {
        self.tabs = (0..self.cols).map(|x| x % self.tab_width == 0 && x != 0).collect();
    }

    fn active(&self) -> &Grid {
        if self.active_is_alt {
            &self.alternate
        } else {
            &self.primary
        }
    }

    fn active_mut(&mut self) -> &mut Grid {
        if self.active_is_alt {
            &mut self.alternate
        } else {
            &mut self.primary
        }
    }

    pub fn is_dirty(&self, y: i32) -> bool {
        self.active().dirty.get(y as usize).copied().unwrap_or(false)
    }

    pub fn clear_dirty(&mut self, y: i32) {
        if let Some(d) = self.active_mut().dirty.get_mut(y as usize) {
            *d = false;
        }
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= self.cols || y >= self.rows {
            return Cell::blank();
        }
        self.active().cells[y as usize][x as usize]
    }

    fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 || x >= self.cols || y >= self.rows {
            return;
        }
        let grid = self.active_mut();
        grid.cells[y as usize][x as usize] = cell;
        grid.mark_dirty(y);
    }

    fn margins(&self) -> (i32, i32) {
        if self.cursor.is_origin() {
            (self.top, self.bot)
        } else {
            (0, self.rows - 1)
        }
    }

    /// CUP/HVP-style absolute move, honouring ORIGIN.
    pub fn move_to(&mut self, x: i32, y: i32) {
        let (miny, maxy) = if self.cursor.is_origin() { (self.top, self.bot) } else { (0, self.rows - 1) };
        self.cursor.pos.x = x.clamp(0, self.cols - 1);
        self.cursor.pos.y = y.clamp(miny, maxy);
        self.cursor.set_wrapnext(false);
    }

    /// Absolute move in screen-space coordinates, not margin-clamped to
    /// ORIGIN — callers who need the origin-relative variant (CUP/VPA) use
    /// `move_to`/`cup`/`vpa` instead, which add `self.top` themselves.
    pub fn move_to_absolute(&mut self, x: i32, y: i32) {
        self.cursor.pos.x = x.clamp(0, self.cols - 1);
        self.cursor.pos.y = y.clamp(0, self.rows - 1);
        self.cursor.set_wrapnext(false);
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let x = self.cursor.pos.x + dx;
        let y = self.cursor.pos.y + dy;
        self.move_to(x, y);
    }

    /// LF/VT/FF (and IND): newline semantics. Returns a scroll event if one
    /// occurred, so selection can be notified.
    pub fn newline(&mut self, first_col: bool) -> Option<ScrollEvent> {
        let mut ev = None;
        if self.cursor.pos.y == self.bot {
            ev = Some(self.scroll_up(self.top, 1));
        } else {
            self.cursor.pos.y = (self.cursor.pos.y + 1).min(self.rows - 1);
        }
        if first_col {
            self.cursor.pos.x = 0;
        }
        self.cursor.set_wrapnext(false);
        ev
    }

    /// RI: reverse index.
    pub fn reverse_index(&mut self) -> Option<ScrollEvent> {
        if self.cursor.pos.y == self.top {
            Some(self.scroll_down(self.top, 1))
        } else {
            self.cursor.pos.y = (self.cursor.pos.y - 1).max(0);
            None
        }
    }

    pub fn set_tab(&mut self) {
        let x = self.cursor.pos.x as usize;
        if x < self.tabs.len() {
            self.tabs[x] = true;
        }
    }

    pub fn clear_tab_at_cursor(&mut self) {
        let x = self.cursor.pos.x as usize;
        if x < self.tabs.len() {
            self.tabs[x] = false;
        }
    }

    pub fn clear_all_tabs(&mut self) {
        self.tabs.iter_mut().for_each(|t| *t = false);
    }

    pub fn next_tab(&mut self, n: i32) {
        for _ in 0..n.max(1) {
            let mut x = self.cursor.pos.x + 1;
            while x < self.cols && !self.tabs[x as usize] {
                x += 1;
            }
            self.cursor.pos.x = x.min(self.cols - 1);
        }
    }

    pub fn prev_tab(&mut self, n: i32) {
        for _ in 0..n.max(1) {
            let mut x = self.cursor.pos.x - 1;
            while x > 0 && !self.tabs[x as usize] {
                x -= 1;
            }
            self.cursor.pos.x = x.max(0);
        }
    }

    /// §4.D write_character contract.
    pub fn write_character(&mut self, u: char, width: i32) -> Option<ScrollEvent> {
        if self.mode.is_set(Mode::PRINT) {
            // Print-sink forwarding is the embedder's responsibility; the
            // core only exposes the mode bit (§1 scope).
        }

        let mut ev = None;
        if self.cursor.is_wrapnext() && self.mode.is_set(Mode::WRAP) {
            let (x, y) = (self.cursor.pos.x, self.cursor.pos.y);
            let mut cell = self.get_cell(x, y);
            cell.attr |= Attr::WRAP;
            self.set_cell(x, y, cell);
            ev = self.newline(true);
        }

        if self.mode.is_set(Mode::INSERT) && self.cursor.pos.x + width <= self.cols {
            self.shift_right(self.cursor.pos.x, self.cursor.pos.y, width);
        }

        if self.cursor.pos.x + width > self.cols {
            ev = self.newline(true).or(ev);
        }

        let (x, y) = (self.cursor.pos.x, self.cursor.pos.y);
        let prev = self.get_cell(x, y);
        if prev.is_wdummy() && x > 0 {
            let mut pred = self.get_cell(x - 1, y);
            pred.attr.remove(Attr::WIDE);
            pred.ch = ' ';
            self.set_cell(x - 1, y, pred);
        }

        let mut cell = Cell::new(u, self.cursor.attr, self.cursor.fg, self.cursor.bg);
        if width == 2 {
            cell.attr |= Attr::WIDE;
        }
        self.set_cell(x, y, cell);
        if width == 2 {
            let dummy = Cell::new('\0', Attr::WDUMMY, self.cursor.fg, self.cursor.bg);
            self.set_cell(x + 1, y, dummy);
        }

        if x + width >= self.cols {
            self.cursor.pos.x = self.cols - 1;
            self.cursor.set_wrapnext(true);
        } else {
            self.cursor.pos.x = x + width;
        }
        ev
    }

    fn shift_right(&mut self, x: i32, y: i32, n: i32) {
        let row = &mut self.active_mut().cells[y as usize];
        let len = row.len();
        let x = x as usize;
        let n = n as usize;
        if x >= len {
            return;
        }
        let keep = len - x;
        if n >= keep {
            for c in &mut row[x..] {
                *c = Cell::blank();
            }
        } else {
            row.copy_within(x..len - n, x + n);
            for c in &mut row[x..x + n] {
                *c = Cell::blank();
            }
        }
        self.active_mut().mark_dirty(y);
    }

    /// ICH: insert `n` blanks at the cursor, shifting the rest of the line
    /// right (content past the end of the line is dropped).
    pub fn insert_blank(&mut self, n: i32) {
        self.shift_right(self.cursor.pos.x, self.cursor.pos.y, n);
    }

    /// DCH: delete `n` chars at the cursor, shifting the rest of the line
    /// left and filling the vacated tail with blanks.
    pub fn delete_chars(&mut self, n: i32) {
        let y = self.cursor.pos.y;
        let x = self.cursor.pos.x as usize;
        let n = n.max(0) as usize;
        let row = &mut self.active_mut().cells[y as usize];
        let len = row.len();
        if x >= len {
            return;
        }
        if n >= len - x {
            for c in &mut row[x..] {
                *c = Cell::blank();
            }
        } else {
            row.copy_within(x + n..len, x);
            for c in &mut row[len - n..] {
                *c = Cell::blank();
            }
        }
        self.active_mut().mark_dirty(y);
    }

    /// ECH: erase `n` chars at the cursor in place (no shifting).
    pub fn erase_chars(&mut self, n: i32) {
        let y = self.cursor.pos.y;
        let x1 = self.cursor.pos.x;
        let x2 = (x1 + n.max(1) - 1).min(self.cols - 1);
        self.fill_rect(x1, y, x2, y, Cell::blank_with(self.cursor.attr, self.cursor.fg, self.cursor.bg));
    }

    fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, fill: Cell) {
        for y in y1..=y2 {
            if y < 0 || y >= self.rows {
                continue;
            }
            for x in x1.max(0)..=x2.min(self.cols - 1) {
                self.set_cell(x, y, fill);
            }
        }
    }

    /// `clear_region` (§4.D): normalises, clamps, fills with the current
    /// SGR state, and returns the rectangle actually cleared.
    pub fn clear_region(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> ClearedRect {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        let x1c = x1.clamp(0, self.cols - 1);
        let x2c = x2.clamp(0, self.cols - 1);
        let y1c = y1.clamp(0, self.rows - 1);
        let y2c = y2.clamp(0, self.rows - 1);
        let fill = Cell::blank_with(self.cursor.attr, self.cursor.fg, self.cursor.bg);
        self.fill_rect(x1c, y1c, x2c, y2c, fill);
        ClearedRect { x1: x1c, y1: y1c, x2: x2c, y2: y2c }
    }

    /// `scroll_up(origin, n)`: rotate `[origin, bot]` up by `n`, clearing the
    /// newly exposed bottom rows.
    pub fn scroll_up(&mut self, origin: i32, n: i32) -> ScrollEvent {
        let n = n.clamp(0, self.bot - origin + 1);
        if n > 0 {
            let grid = self.active_mut();
            grid.cells[origin as usize..=self.bot as usize].rotate_left(n as usize);
            let blank_from = (self.bot - n + 1) as usize;
            for row in &mut grid.cells[blank_from..=self.bot as usize] {
                row.iter_mut().for_each(|c| *c = Cell::blank());
            }
            for y in origin..=self.bot {
                grid.mark_dirty(y);
            }
        }
        ScrollEvent { origin, bot: self.bot, delta: -n }
    }

    /// `scroll_down(origin, n)`: symmetric to `scroll_up`.
    pub fn scroll_down(&mut self, origin: i32, n: i32) -> ScrollEvent {
        let n = n.clamp(0, self.bot - origin + 1);
        if n > 0 {
            let grid = self.active_mut();
            grid.cells[origin as usize..=self.bot as usize].rotate_right(n as usize);
            for row in &mut grid.cells[origin as usize..(origin + n) as usize] {
                row.iter_mut().for_each(|c| *c = Cell::blank());
            }
            for y in origin..=self.bot {
                grid.mark_dirty(y);
            }
        }
        ScrollEvent { origin, bot: self.bot, delta: n }
    }

    /// IL: insert `n` blank lines at the cursor row, within the scroll
    /// region.
    pub fn insert_lines(&mut self, n: i32) -> ScrollEvent {
        let y = self.cursor.pos.y;
        if y < self.top || y > self.bot {
            return ScrollEvent { origin: y, bot: y, delta: 0 };
        }
        let saved_top = self.top;
        self.top = y;
        let ev = self.scroll_down(y, n);
        self.top = saved_top;
        ev
    }

    /// DL: delete `n` lines at the cursor row, within the scroll region.
    pub fn delete_lines(&mut self, n: i32) -> ScrollEvent {
        let y = self.cursor.pos.y;
        if y < self.top || y > self.bot {
            return ScrollEvent { origin: y, bot: y, delta: 0 };
        }
        let saved_top = self.top;
        self.top = y;
        let ev = self.scroll_up(y, n);
        self.top = saved_top;
        ev
    }

    /// DECSTBM: set scroll region (1-based, inclusive) and home the cursor.
    pub fn set_scroll_region(&mut self, top: i32, bot: i32) {
        let top = top.clamp(0, self.rows - 1);
        let bot = bot.clamp(0, self.rows - 1);
        if top < bot {
            self.top = top;
            self.bot = bot;
        } else {
            self.top = 0;
            self.bot = self.rows - 1;
        }
        self.move_to_absolute(0, if self.cursor.is_origin() { self.top } else { 0 });
    }

    /// `swap_screens`: swap active grid, toggle ALTSCREEN, mark everything
    /// dirty; each screen keeps its own saved cursor.
    pub fn swap_screens(&mut self) {
        self.saved_cursor[self.active_is_alt as usize] = self.cursor;
        self.active_is_alt = !self.active_is_alt;
        self.cursor = self.saved_cursor[self.active_is_alt as usize];
        self.mode.set(Mode::ALTSCREEN, self.active_is_alt);
        self.active_mut().mark_all_dirty();
    }

    /// Clear the alternate screen in place, used when entering it via mode
    /// 1047/1049 (which clears on entry, unlike a bare 47-toggle swap).
    pub fn clear_alternate(&mut self) {
        let is_alt = self.active_is_alt;
        self.active_is_alt = true;
        self.clear_region(0, 0, self.cols - 1, self.rows - 1);
        self.active_is_alt = is_alt;
    }

    pub fn save_cursor(&mut self) {
        self.saved_cursor[self.active_is_alt as usize] = self.cursor;
    }

    pub fn restore_cursor(&mut self) {
        self.cursor = self.saved_cursor[self.active_is_alt as usize];
    }

    pub fn is_alt_screen(&self) -> bool {
        self.active_is_alt
    }

    /// `resize(col,row)`: reallocate both grids to the new dimensions,
    /// preserving as much content as possible and clamping cursor/region.
    ///
    /// Per §4.D, rows are only dropped from the top when shrinking would
    /// otherwise push the cursor off the bottom of the new grid; the drop
    /// count is exactly enough to bring the cursor back on-screen, so
    /// content above an upper-screen cursor survives a shrink untouched.
    pub fn resize(&mut self, cols: i32, rows: i32) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        let drop_top = if rows < self.rows { (self.cursor.pos.y - rows + 1).max(0) } else { 0 };
        for grid in [&mut self.primary, &mut self.alternate] {
            resize_grid(grid, cols, rows, drop_top);
        }
        self.cols = cols;
        self.rows = rows;
        self.reset_tabs();
        self.top = self.top.clamp(0, rows - 1);
        self.bot = self.bot.clamp(self.top, rows - 1);
        self.cursor.pos.x = self.cursor.pos.x.clamp(0, cols - 1);
        self.cursor.pos.y = (self.cursor.pos.y - drop_top).clamp(0, rows - 1);
        self.primary.mark_all_dirty();
        self.alternate.mark_all_dirty();
    }

    /// SUB (0x1A): overwrite the cell under the cursor in place, current
    /// SGR state, without moving the cursor.
    pub fn overwrite_cursor_cell(&mut self, ch: char) {
        let (x, y) = (self.cursor.pos.x, self.cursor.pos.y);
        let cell = Cell::new(ch, self.cursor.attr, self.cursor.fg, self.cursor.bg);
        self.set_cell(x, y, cell);
    }

    /// CUP/HVP (`H`/`f`): absolute move to 1-based `(row, col)`, honouring
    /// ORIGIN (row is relative to the scroll region top when set).
    pub fn cup(&mut self, row: i32, col: i32) {
        let y = if self.cursor.is_origin() { self.top + row - 1 } else { row - 1 };
        self.move_to(col - 1, y);
    }

    /// VPA (`d`): absolute move to a 1-based row, column unchanged, also
    /// honouring ORIGIN the same way CUP does.
    pub fn vpa(&mut self, row: i32) {
        let x = self.cursor.pos.x;
        let y = if self.cursor.is_origin() { self.top + row - 1 } else { row - 1 };
        self.move_to(x, y);
    }

    pub fn fill_all(&mut self, ch: char) {
        let fill = Cell::new(ch, Attr::NONE, crate::attribute::Color::Default, crate::attribute::Color::Default);
        let (cols, rows) = (self.cols, self.rows);
        self.fill_rect(0, 0, cols - 1, rows - 1, fill);
    }
}

/// Reallocate one grid to `new_cols`/`new_rows`, first dropping `drop_top`
/// rows from the top (the cursor-relative amount `resize` computed), then
/// letting `Vec::resize` trim any remaining excess off the *bottom* — so a
/// cursor sitting in the upper part of the screen keeps everything above it.
fn resize_grid(grid: &mut Grid, new_cols: i32, new_rows: i32, drop_top: i32) {
    let drop_top = (drop_top as usize).min(grid.cells.len());
    if drop_top > 0 {
        grid.cells.drain(0..drop_top);
        grid.dirty.drain(0..drop_top.min(grid.dirty.len()));
    }
    grid.cells.resize(new_rows as usize, vec![Cell::blank(); new_cols as usize]);
    grid.dirty.resize(new_rows as usize, true);
    for row in &mut grid.cells {
        row.resize(new_cols as usize, Cell::blank());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Color;

    #[test]
    fn write_character_advances_cursor() {
        let mut s = Screen::new(80, 24);
        s.write_character('A', 1);
        assert_eq!(s.get_cell(0, 0).ch, 'A');
        assert_eq!(s.cursor.pos, crate::position::Position::new(1, 0));
    }

    #[test]
    fn wrapnext_then_wrap_on_write() {
        let mut s = Screen::new(3, 2);
        s.write_character('A', 1);
        s.write_character('B', 1);
        s.write_character('C', 1);
        assert_eq!(s.cursor.pos.x, 2);
        assert!(s.cursor.is_wrapnext());
        s.write_character('D', 1);
        assert_eq!(s.get_cell(2, 0).attr.contains(Attr::WRAP), true);
        assert_eq!(s.get_cell(0, 1).ch, 'D');
    }

    #[test]
    fn wide_char_sets_wdummy() {
        let mut s = Screen::new(10, 1);
        s.write_character('\u{6C49}', 2);
        assert!(s.get_cell(0, 0).is_wide());
        assert!(s.get_cell(1, 0).is_wdummy());
        assert_eq!(s.cursor.pos.x, 2);
    }

    #[test]
    fn scroll_up_preserves_outside_rows() {
        let mut s = Screen::new(5, 5);
        s.set_scroll_region(2, 4);
        for y in 0..5 {
            s.move_to_absolute(0, y);
            s.write_character(char::from_u32(b'A' as u32 + y as u32).unwrap(), 1);
        }
        s.scroll_up(2, 1);
        assert_eq!(s.get_cell(0, 0).ch, 'A');
        assert_eq!(s.get_cell(0, 1).ch, 'B');
        assert_eq!(s.get_cell(0, 2).ch, 'D');
        assert_eq!(s.get_cell(0, 3).ch, 'E');
        assert_eq!(s.get_cell(0, 4).ch, ' ');
    }

    #[test]
    fn clear_region_stamps_current_sgr() {
        let mut s = Screen::new(5, 5);
        s.cursor.fg = Color::Palette(2);
        let rect = s.clear_region(1, 1, 3, 1);
        assert_eq!(rect, ClearedRect { x1: 1, y1: 1, x2: 3, y2: 1 });
        for x in 1..=3 {
            let cell = s.get_cell(x, 1);
            assert_eq!(cell.ch, ' ');
            assert_eq!(cell.fg, Color::Palette(2));
        }
    }

    #[test]
    fn swap_is_involution() {
        let mut s = Screen::new(5, 5);
        s.move_to_absolute(2, 2);
        s.write_character('X', 1);
        let cursor_before = s.cursor;
        s.swap_screens();
        assert!(s.is_alt_screen());
        s.move_to_absolute(0, 0);
        s.swap_screens();
        assert!(!s.is_alt_screen());
        assert_eq!(s.cursor, cursor_before);
        assert_eq!(s.get_cell(2, 2).ch, 'X');
    }

    #[test]
    fn shrink_keeps_top_content_when_cursor_is_near_top() {
        let mut s = Screen::new(10, 10);
        s.write_character('Z', 1);
        s.resize(10, 4);
        assert_eq!(s.get_cell(0, 0).ch, 'Z');
        assert_eq!(s.cursor.pos, crate::position::Position::new(1, 0));
    }

    #[test]
    fn shrink_drops_from_top_when_cursor_would_fall_off_bottom() {
        let mut s = Screen::new(10, 10);
        for y in 0..10 {
            s.move_to_absolute(0, y);
            s.write_character(char::from_u32(b'A' as u32 + y as u32).unwrap(), 1);
        }
        s.move_to_absolute(0, 9);
        s.resize(10, 4);
        // Cursor was at row 9; only the top 6 rows had to go to keep it
        // on-screen, so row 3 of the new grid is what was row 9 ('J').
        assert_eq!(s.cursor.pos, crate::position::Position::new(0, 3));
        assert_eq!(s.get_cell(0, 3).ch, 'J');
        assert_eq!(s.get_cell(0, 0).ch, 'G');
    }

    #[test]
    fn resize_is_idempotent() {
        let mut s = Screen::new(10, 10);
        s.write_character('Z', 1);
        s.resize(20, 5);
        let snapshot: Vec<_> = (0..5).map(|y| (0..20).map(|x| s.get_cell(x, y)).collect::<Vec<_>>()).collect();
        s.resize(20, 5);
        let snapshot2: Vec<_> = (0..5).map(|y| (0..20).map(|x| s.get_cell(x, y)).collect::<Vec<_>>()).collect();
        assert_eq!(snapshot, snapshot2);
    }

    #[test]
    fn vpa_honours_origin_mode_like_cup() {
        let mut s = Screen::new(10, 10);
        s.set_scroll_region(2, 8);
        s.cursor.set_origin(true);
        s.move_to_absolute(4, 0);
        s.vpa(1);
        assert_eq!(s.cursor.pos, crate::position::Position::new(4, 2));

        s.cursor.set_origin(false);
        s.vpa(1);
        assert_eq!(s.cursor.pos, crate::position::Position::new(4, 0));
    }
}
