use std::ops::Range;

use crate::config::CoreConfig;
use crate::model::buffer::TextBuffer;
use crate::model::cursor::Cursor;
use crate::model::mode::Mode;

/// Word-motion separators: space, tab, newline.
fn is_word_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

/// Modal editor over a single text buffer.
///
/// Owns the buffer, the cursor, the mode, the visual-selection anchor and
/// the search register. Hosts hold an `Editor` handle and drive it through
/// these methods; operations that can be rejected return `bool`, queries on
/// missing data return `Option`, and nothing panics on bad input.
#[derive(Debug)]
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    mode: Mode,
    /// Other end of the visual selection, when one is active.
    selection_anchor: Option<usize>,
    search_pattern: String,
    config: CoreConfig,
}

impl Editor {
    /// New editor with an empty document, in normal mode.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            buffer: TextBuffer::new(&config),
            cursor: Cursor::new(),
            mode: Mode::Normal,
            selection_anchor: None,
            search_pattern: String::new(),
            config,
        }
    }

    /// Replace the document. The cursor returns to the start and any visual
    /// selection is dropped; the anchor indexed the old buffer. The mode is
    /// left alone.
    pub fn load_text(&mut self, text: &str) {
        tracing::debug!(len = text.len(), "load text");
        self.buffer = TextBuffer::from_bytes(text.as_bytes(), &self.config);
        self.cursor = Cursor::new();
        self.selection_anchor = None;
    }

    // ===== Document queries =====

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn line_count(&mut self) -> usize {
        self.buffer.line_count()
    }

    /// Copy of the whole document.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.text()).into_owned()
    }

    /// Copy of line `index` without its trailing newline.
    pub fn line(&mut self, index: usize) -> Option<String> {
        self.buffer
            .line(index)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.buffer.byte_at(pos)
    }

    // ===== Host-level edits =====
    //
    // These edit at an explicit position rather than the cursor, so after a
    // success the cursor is clamped and rederived to keep it on a valid
    // document position.

    pub fn insert_at(&mut self, pos: usize, text: &str) -> bool {
        if self.buffer.insert(pos, text.as_bytes()).is_err() {
            tracing::warn!(pos, "insert rejected");
            return false;
        }
        self.cursor.clamp(&mut self.buffer);
        true
    }

    pub fn delete_range(&mut self, pos: usize, count: usize) -> bool {
        if self.buffer.delete(pos, count).is_err() {
            tracing::warn!(pos, count, "delete rejected");
            return false;
        }
        self.cursor.clamp(&mut self.buffer);
        true
    }

    pub fn replace_range(&mut self, pos: usize, old_len: usize, text: &str) -> bool {
        if self.buffer.replace(pos, old_len, text.as_bytes()).is_err() {
            return false;
        }
        self.cursor.clamp(&mut self.buffer);
        true
    }

    // ===== Cursor =====

    pub fn position(&self) -> usize {
        self.cursor.position
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor.line
    }

    pub fn cursor_column(&self) -> usize {
        self.cursor.column
    }

    /// Move the cursor to `pos`, clamped into the document.
    pub fn set_position(&mut self, pos: usize) {
        self.cursor.position = pos;
        self.cursor.clamp(&mut self.buffer);
        self.cursor.remember_column();
    }

    // ===== Mode =====

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_name(&self) -> &'static str {
        self.mode.name()
    }

    /// Switch modes. Entering visual mode anchors a selection at the cursor;
    /// entering normal mode drops it. Other transitions leave it untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Visual => self.selection_anchor = Some(self.cursor.position),
            Mode::Normal => self.selection_anchor = None,
            _ => {}
        }
        self.mode = mode;
    }

    // ===== Motions =====
    //
    // All byte-oriented, all clamped to [0, len], all no-ops at the edges.

    /// One byte left (`h`); crosses line boundaries.
    pub fn move_left(&mut self) {
        if self.cursor.position == 0 {
            return;
        }
        self.cursor.position -= 1;
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// One byte right (`l`); crosses line boundaries.
    pub fn move_right(&mut self) {
        if self.cursor.position >= self.buffer.len() {
            return;
        }
        self.cursor.position += 1;
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// Next line (`j`), aiming for the preferred column.
    pub fn move_down(&mut self) {
        if self.cursor.line + 1 >= self.buffer.line_count() {
            return;
        }
        self.move_to_line(self.cursor.line + 1);
    }

    /// Previous line (`k`), aiming for the preferred column.
    pub fn move_up(&mut self) {
        if self.cursor.line == 0 {
            return;
        }
        self.move_to_line(self.cursor.line - 1);
    }

    fn move_to_line(&mut self, target: usize) {
        let column = self
            .cursor
            .preferred_column
            .min(self.buffer.line_content_len(target));
        self.cursor.position = self.buffer.line_start(target) + column;
        self.cursor.sync(&mut self.buffer);
    }

    fn separator_at(&self, pos: usize) -> bool {
        self.buffer.byte_at(pos).is_some_and(is_word_separator)
    }

    /// Start of the next word (`w`): leave the current word, then skip the
    /// separators after it.
    pub fn word_forward(&mut self) {
        let len = self.buffer.len();
        let mut pos = self.cursor.position;
        while pos < len && !self.separator_at(pos) {
            pos += 1;
        }
        while pos < len && self.separator_at(pos) {
            pos += 1;
        }
        self.cursor.position = pos;
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// Start of the previous word (`b`).
    pub fn word_backward(&mut self) {
        if self.cursor.position == 0 {
            return;
        }
        let mut pos = self.cursor.position - 1;
        while pos > 0 && self.separator_at(pos) {
            pos -= 1;
        }
        while pos > 0 && !self.separator_at(pos - 1) {
            pos -= 1;
        }
        self.cursor.position = pos;
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// End of the current or next word (`e`); always advances at least one
    /// byte when it can.
    pub fn word_end(&mut self) {
        let len = self.buffer.len();
        if len == 0 {
            return;
        }
        let mut pos = self.cursor.position;
        if pos < len {
            pos += 1;
        }
        while pos < len && self.separator_at(pos) {
            pos += 1;
        }
        while pos + 1 < len && !self.separator_at(pos + 1) {
            pos += 1;
        }
        self.cursor.position = pos;
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// Start of the current line (`0`).
    pub fn line_start(&mut self) {
        self.cursor.position = self.buffer.line_start(self.cursor.line);
        self.cursor.sync(&mut self.buffer);
        self.cursor.preferred_column = 0;
    }

    /// End of the current line, before any trailing newline (`$`).
    pub fn line_end(&mut self) {
        let line = self.cursor.line;
        self.cursor.position = self.buffer.line_start(line) + self.buffer.line_content_len(line);
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    /// First line of the document (`gg`).
    pub fn goto_first_line(&mut self) {
        self.cursor.position = 0;
        self.cursor.sync(&mut self.buffer);
        self.cursor.preferred_column = 0;
    }

    /// Start of the last line (`G`).
    pub fn goto_last_line(&mut self) {
        let last = self.buffer.line_count() - 1;
        self.cursor.position = self.buffer.line_start(last);
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
    }

    // ===== Edits at the cursor =====

    /// Insert one character at the cursor; the cursor lands after it.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut encoded = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut encoded))
    }

    /// Insert a string at the cursor; the cursor lands after it.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if self.buffer.insert(self.cursor.position, text.as_bytes()).is_err() {
            return false;
        }
        self.cursor.position += text.len();
        self.cursor.sync(&mut self.buffer);
        self.cursor.remember_column();
        true
    }

    /// Delete the byte before the cursor (backspace).
    pub fn delete_char_before(&mut self) -> bool {
        if self.cursor.position == 0 {
            return false;
        }
        if self.buffer.delete(self.cursor.position - 1, 1).is_err() {
            return false;
        }
        self.cursor.position -= 1;
        self.cursor.sync(&mut self.buffer);
        true
    }

    /// Delete the byte under the cursor (`x`); the cursor stays put.
    pub fn delete_char_after(&mut self) -> bool {
        if self.cursor.position >= self.buffer.len() {
            return false;
        }
        if self.buffer.delete(self.cursor.position, 1).is_err() {
            return false;
        }
        self.cursor.sync(&mut self.buffer);
        true
    }

    /// Delete the whole current line including its newline (`dd`). The
    /// cursor moves to where the line started, clamped into the document.
    pub fn delete_line(&mut self) -> bool {
        let line = self.cursor.line;
        let start = self.buffer.line_start(line);
        let count = self.buffer.line_len(line);
        if self.buffer.delete(start, count).is_err() {
            return false;
        }
        self.cursor.position = start;
        self.cursor.clamp(&mut self.buffer);
        true
    }

    // ===== Selection =====

    pub fn has_selection(&self) -> bool {
        self.selection_anchor.is_some()
    }

    /// Lower end of the selection; the cursor position when there is none.
    pub fn selection_start(&self) -> usize {
        self.selection_anchor
            .map_or(self.cursor.position, |anchor| {
                anchor.min(self.cursor.position)
            })
    }

    /// Upper end of the selection; the cursor position when there is none.
    pub fn selection_end(&self) -> usize {
        self.selection_anchor
            .map_or(self.cursor.position, |anchor| {
                anchor.max(self.cursor.position)
            })
    }

    /// The selection as a half-open byte range; empty when the anchor sits
    /// on the cursor.
    pub fn selection_range(&self) -> Range<usize> {
        self.selection_start()..self.selection_end()
    }

    /// Copy of the selected bytes.
    pub fn selected_text(&self) -> String {
        let range = self.selection_range();
        let bytes = self
            .buffer
            .text_range(range.start, range.end - range.start)
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    // ===== Search =====

    /// Store a literal search pattern, truncated to the configured byte
    /// budget (backing off to a character boundary).
    pub fn set_search_pattern(&mut self, pattern: &str) {
        let mut budget = self.config.max_search_pattern.min(pattern.len());
        while !pattern.is_char_boundary(budget) {
            budget -= 1;
        }
        self.search_pattern.clear();
        self.search_pattern.push_str(&pattern[..budget]);
    }

    pub fn search_pattern(&self) -> &str {
        &self.search_pattern
    }

    /// Jump to the next match after the cursor, wrapping to the start of the
    /// document when none is ahead.
    pub fn search_next(&mut self) -> bool {
        if self.search_pattern.is_empty() {
            return false;
        }
        let hit = self
            .buffer
            .find_next(self.cursor.position + 1, self.search_pattern.as_bytes())
            .or_else(|| self.buffer.find_next(0, self.search_pattern.as_bytes()));
        self.jump_to_match(hit)
    }

    /// Jump to the previous match before the cursor, wrapping to the end of
    /// the document when none is behind.
    pub fn search_prev(&mut self) -> bool {
        if self.search_pattern.is_empty() {
            return false;
        }
        let hit = self
            .buffer
            .find_prev(self.cursor.position, self.search_pattern.as_bytes())
            .or_else(|| {
                self.buffer
                    .find_prev(self.buffer.len(), self.search_pattern.as_bytes())
            });
        self.jump_to_match(hit)
    }

    fn jump_to_match(&mut self, hit: Option<usize>) -> bool {
        match hit {
            Some(pos) => {
                self.cursor.position = pos;
                self.cursor.sync(&mut self.buffer);
                self.cursor.remember_column();
                true
            }
            None => false,
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
