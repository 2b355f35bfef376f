// Editor/preview pane state

/// Document shown when the editor is opened without generating.
pub const BLANK_DOCUMENT: &str = "<!-- Start editing here -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneStatus {
    /// Nothing generated or opened yet
    Idle,
    /// Waiting on the proxy
    Loading,
    /// Code is present and editable
    Ready,
}

/// The working document. Stored as lines; the cursor column counts chars, not bytes.
///
/// Incoming code has its line endings normalized to `\n` (`\r\n` and lone `\r`
/// both become line breaks), so copies and downloads are always LF.
#[derive(Debug)]
pub struct EditorPane {
    status: PaneStatus,
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll: usize,
    refresh_key: u64,
}

impl EditorPane {
    pub fn new() -> Self {
        Self {
            status: PaneStatus::Idle,
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            refresh_key: 0,
        }
    }

    pub const fn status(&self) -> PaneStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == PaneStatus::Loading
    }

    pub fn code(&self) -> String {
        self.lines.join("\n")
    }

    pub fn has_code(&self) -> bool {
        self.lines.iter().any(|line| !line.is_empty()) || self.lines.len() > 1
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub const fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    pub const fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    pub fn begin_generation(&mut self) {
        self.status = PaneStatus::Loading;
    }

    /// Replaces the whole document with a fresh generation result.
    pub fn complete_generation(&mut self, code: &str) {
        self.replace_code(code);
        self.status = PaneStatus::Ready;
    }

    /// Leaves the previous document in place.
    pub fn fail_generation(&mut self) {
        self.status = PaneStatus::Ready;
    }

    pub fn open_blank(&mut self) {
        self.replace_code(BLANK_DOCUMENT);
        self.status = PaneStatus::Ready;
    }

    pub fn refresh_preview(&mut self) {
        self.refresh_key = self.refresh_key.wrapping_add(1);
    }

    fn replace_code(&mut self, code: &str) {
        let normalized = code.replace("\r\n", "\n").replace('\r', "\n");
        self.lines = normalized.split('\n').map(str::to_string).collect();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll = 0;
    }

    fn begin_edit(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.status = PaneStatus::Ready;
        true
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor_row].chars().count()
    }

    fn byte_offset(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.begin_edit() {
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_offset(line, self.cursor_col);
        line.insert(at, c);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        if !self.begin_edit() {
            return;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = Self::byte_offset(line, self.cursor_col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    pub fn backspace(&mut self) {
        if !self.begin_edit() {
            return;
        }
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_offset(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
            self.lines[self.cursor_row].push_str(&removed);
        }
    }

    pub fn delete(&mut self) {
        if !self.begin_edit() {
            return;
        }
        if self.cursor_col < self.current_line_len() {
            let line = &mut self.lines[self.cursor_row];
            let at = Self::byte_offset(line, self.cursor_col);
            line.remove(at);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self, amount: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(amount);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    pub fn move_down(&mut self, amount: usize) {
        self.cursor_row = (self.cursor_row + amount).min(self.lines.len() - 1);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    pub const fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    /// Keeps the cursor row inside a viewport of `height` rows.
    pub const fn follow_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + height {
            self.scroll = self.cursor_row + 1 - height;
        }
    }
}

impl Default for EditorPane {
    fn default() -> Self {
        Self::new()
    }
}
