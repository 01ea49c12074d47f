use crate::model::buffer::TextBuffer;

/// Cursor state: a byte position plus the line/column pair derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Byte offset into the document; edits happen here.
    pub position: usize,
    /// Line containing the position (0-indexed).
    pub line: usize,
    /// Byte column within the line.
    pub column: usize,
    /// Column vertical motions aim for when the target line is long enough.
    /// Horizontal motions and edits refresh it; vertical motions never do.
    pub preferred_column: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rederive line and column from the byte position.
    pub fn sync(&mut self, buffer: &mut TextBuffer) {
        let (line, column) = buffer.pos_to_line_col(self.position);
        self.line = line;
        self.column = column;
    }

    /// Clamp the position into the document, then rederive line and column.
    pub fn clamp(&mut self, buffer: &mut TextBuffer) {
        self.position = self.position.min(buffer.len());
        self.sync(buffer);
    }

    /// Remember the current column for later vertical motions.
    pub fn remember_column(&mut self) {
        self.preferred_column = self.column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;

    #[test]
    fn test_sync_derives_line_and_column() {
        let mut buffer = TextBuffer::from_bytes(b"ab\ncd", &CoreConfig::default());
        let mut cursor = Cursor::new();
        cursor.position = 4;
        cursor.sync(&mut buffer);
        assert_eq!((cursor.line, cursor.column), (1, 1));
    }

    #[test]
    fn test_clamp_pulls_position_back_into_document() {
        let mut buffer = TextBuffer::from_bytes(b"abc", &CoreConfig::default());
        let mut cursor = Cursor::new();
        cursor.position = 99;
        cursor.clamp(&mut buffer);
        assert_eq!(cursor.position, 3);
        assert_eq!((cursor.line, cursor.column), (0, 3));
    }

    #[test]
    fn test_remember_column() {
        let mut cursor = Cursor::new();
        cursor.column = 7;
        cursor.remember_column();
        assert_eq!(cursor.preferred_column, 7);
    }
}
