use crate::config::CoreConfig;
use crate::model::piece_table::{BufferError, Piece, PieceTable};

/// Text buffer: piece-table storage plus a lazily rebuilt line index.
///
/// Every mutation marks the index dirty; the next line-oriented query pays
/// for a full rebuild. Queries that touch the index therefore take
/// `&mut self`, the same shape the lazily loaded structures in the rest of
/// the editor use.
#[derive(Debug)]
pub struct TextBuffer {
    table: PieceTable,
    /// Byte offset of each line start; entry 0 is always 0.
    line_starts: Vec<usize>,
    lines_dirty: bool,
}

impl TextBuffer {
    pub fn new(config: &CoreConfig) -> Self {
        Self::from_bytes(&[], config)
    }

    pub fn from_bytes(initial: &[u8], config: &CoreConfig) -> Self {
        Self {
            table: PieceTable::new(initial, config),
            line_starts: Vec::with_capacity(config.line_capacity),
            lines_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        self.table.pieces()
    }

    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.table.byte_at(pos)
    }

    pub fn text_range(&self, start: usize, count: usize) -> Option<Vec<u8>> {
        self.table.copy_range(start, count)
    }

    /// Copy of the whole document.
    pub fn text(&self) -> Vec<u8> {
        self.table.snapshot()
    }

    pub fn insert(&mut self, pos: usize, bytes: &[u8]) -> Result<(), BufferError> {
        self.table.insert(pos, bytes)?;
        tracing::trace!(pos, len = bytes.len(), "buffer insert");
        self.lines_dirty = true;
        Ok(())
    }

    pub fn delete(&mut self, pos: usize, count: usize) -> Result<(), BufferError> {
        self.table.delete(pos, count)?;
        tracing::trace!(pos, count, "buffer delete");
        self.lines_dirty = true;
        Ok(())
    }

    /// Delete `old_len` bytes at `pos`, then insert `bytes` there. The delete
    /// validates the whole range first, so a failure leaves the document
    /// untouched.
    pub fn replace(&mut self, pos: usize, old_len: usize, bytes: &[u8]) -> Result<(), BufferError> {
        self.delete(pos, old_len)?;
        if !bytes.is_empty() {
            self.insert(pos, bytes)?;
        }
        Ok(())
    }

    fn rebuild_line_index(&mut self) {
        if !self.lines_dirty {
            return;
        }
        let text = self.table.snapshot();
        self.line_starts.clear();
        self.line_starts.push(0);
        for (i, &byte) in text.iter().enumerate() {
            if byte == b'\n' {
                self.line_starts.push(i + 1);
            }
        }
        self.lines_dirty = false;
    }

    /// Number of lines; at least 1 even for an empty document.
    pub fn line_count(&mut self) -> usize {
        self.rebuild_line_index();
        self.line_starts.len()
    }

    /// Copy of line `index` with any trailing newline excluded.
    pub fn line(&mut self, index: usize) -> Option<Vec<u8>> {
        self.rebuild_line_index();
        if index >= self.line_starts.len() {
            return None;
        }
        let count = self.line_content_len(index);
        let start = self.line_starts[index];
        self.table.copy_range(start, count)
    }

    /// Start offset of line `index`; the total length when the line does not
    /// exist.
    pub fn line_start(&mut self, index: usize) -> usize {
        self.rebuild_line_index();
        self.line_starts
            .get(index)
            .copied()
            .unwrap_or(self.table.len())
    }

    /// Length of line `index` in bytes, trailing newline included.
    pub fn line_len(&mut self, index: usize) -> usize {
        self.rebuild_line_index();
        if index >= self.line_starts.len() {
            return 0;
        }
        let start = self.line_starts[index];
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.table.len());
        end - start
    }

    /// Length of line `index` with the trailing newline, if any, excluded.
    pub fn line_content_len(&mut self, index: usize) -> usize {
        let len = self.line_len(index);
        if len == 0 {
            return 0;
        }
        let start = self.line_start(index);
        if self.table.byte_at(start + len - 1) == Some(b'\n') {
            len - 1
        } else {
            len
        }
    }

    /// Line and byte column for a position in `[0, len]`.
    pub fn pos_to_line_col(&mut self, pos: usize) -> (usize, usize) {
        self.rebuild_line_index();
        // line_starts is sorted and begins with 0, so the partition point is
        // at least 1: the line is the last start at or before pos.
        let line = self.line_starts.partition_point(|&start| start <= pos) - 1;
        (line, pos - self.line_starts[line])
    }

    /// Position for a line/column pair, clamping to the last line and to that
    /// line's content length. Inverse of `pos_to_line_col` for every valid
    /// position.
    pub fn line_col_to_pos(&mut self, line: usize, col: usize) -> usize {
        self.rebuild_line_index();
        let line = line.min(self.line_starts.len() - 1);
        let col = col.min(self.line_content_len(line));
        self.line_starts[line] + col
    }

    /// Smallest offset `>= from` where `needle` matches, byte for byte.
    pub fn find_next(&self, from: usize, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.table.len() {
            return None;
        }
        let text = self.table.snapshot();
        (from..=text.len() - needle.len()).find(|&i| &text[i..i + needle.len()] == needle)
    }

    /// Largest offset where `needle` matches entirely before `from`, i.e.
    /// match start `i` with `i + needle.len() <= from`.
    pub fn find_prev(&self, from: usize, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let from = from.min(self.table.len());
        if from < needle.len() {
            return None;
        }
        let text = self.table.snapshot();
        (0..=from - needle.len())
            .rev()
            .find(|&i| &text[i..i + needle.len()] == needle)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(initial: &str) -> TextBuffer {
        TextBuffer::from_bytes(initial.as_bytes(), &CoreConfig::default())
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let mut buffer = buffer("");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0).unwrap(), b"");
        assert_eq!(buffer.line_start(0), 0);
        assert_eq!(buffer.line_len(0), 0);
    }

    #[test]
    fn test_line_queries() {
        let mut buffer = buffer("ab\ncd\nef");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(0).unwrap(), b"ab");
        assert_eq!(buffer.line(1).unwrap(), b"cd");
        assert_eq!(buffer.line(2).unwrap(), b"ef");
        assert_eq!(buffer.line(3), None);
        assert_eq!(buffer.line_start(2), 6);
        assert_eq!(buffer.line_start(9), 8);
        assert_eq!(buffer.line_len(0), 3);
        assert_eq!(buffer.line_len(2), 2);
        assert_eq!(buffer.line_content_len(0), 2);
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let mut buffer = buffer("ab\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1).unwrap(), b"");
        assert_eq!(buffer.line_start(1), 3);
        assert_eq!(buffer.line_len(1), 0);
    }

    #[test]
    fn test_edits_invalidate_line_index() {
        let mut buffer = buffer("ab");
        assert_eq!(buffer.line_count(), 1);
        buffer.insert(1, b"\n").unwrap();
        assert_eq!(buffer.line_count(), 2);
        buffer.delete(1, 1).unwrap();
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_pos_to_line_col() {
        let mut buffer = buffer("ab\ncd");
        assert_eq!(buffer.pos_to_line_col(0), (0, 0));
        assert_eq!(buffer.pos_to_line_col(2), (0, 2));
        assert_eq!(buffer.pos_to_line_col(3), (1, 0));
        assert_eq!(buffer.pos_to_line_col(5), (1, 2));
    }

    #[test]
    fn test_line_col_to_pos_clamps() {
        let mut buffer = buffer("ab\ncd\n");
        assert_eq!(buffer.line_col_to_pos(0, 0), 0);
        assert_eq!(buffer.line_col_to_pos(0, 99), 2);
        assert_eq!(buffer.line_col_to_pos(99, 0), 6);
        assert_eq!(buffer.line_col_to_pos(1, 1), 4);
    }

    #[test]
    fn test_replace() {
        let mut buffer = buffer("hello world");
        buffer.replace(6, 5, b"there").unwrap();
        assert_eq!(buffer.text(), b"hello there");
        assert!(buffer.replace(0, 0, b"x").is_err());
        assert!(buffer.replace(0, 99, b"x").is_err());
        assert_eq!(buffer.text(), b"hello there");
    }

    #[test]
    fn test_find_next() {
        let buffer = buffer("the cat and the dog");
        assert_eq!(buffer.find_next(0, b"the"), Some(0));
        assert_eq!(buffer.find_next(1, b"the"), Some(12));
        assert_eq!(buffer.find_next(13, b"the"), None);
        assert_eq!(buffer.find_next(0, b""), None);
        assert_eq!(buffer.find_next(99, b"the"), None);
    }

    #[test]
    fn test_find_prev() {
        let buffer = buffer("the cat and the dog");
        assert_eq!(buffer.find_prev(19, b"the"), Some(12));
        assert_eq!(buffer.find_prev(15, b"the"), Some(12));
        assert_eq!(buffer.find_prev(14, b"the"), Some(0));
        assert_eq!(buffer.find_prev(3, b"the"), Some(0));
        assert_eq!(buffer.find_prev(2, b"the"), None);
        assert_eq!(buffer.find_prev(19, b""), None);
    }

    #[test]
    fn test_find_across_piece_boundaries() {
        let mut buffer = buffer("needle");
        buffer.insert(3, b"XYZ").unwrap();
        buffer.delete(3, 3).unwrap();
        // The match now spans two pieces.
        assert_eq!(buffer.find_next(0, b"needle"), Some(0));
    }
}
