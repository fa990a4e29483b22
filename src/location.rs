//! Byte offset to line/column conversion for oxc spans.
//!
//! Lines are 1-based; columns are 0-based UTF-16 code units, matching JavaScript
//! string indices and source map columns. Line terminators follow ECMAScript:
//! `\n`, `\r\n`, lone `\r`, U+2028 and U+2029.

pub struct LineIndex<'s> {
    source: &'s str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                // `\r\n` ends its line at the `\n`
                '\r' if matches!(chars.peek(), Some((_, '\n'))) => {}
                '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                    line_starts.push((i + c.len_utf8()) as u32);
                }
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Returns `None` when `offset` is out of range or not on a character boundary.
    pub fn line_column(&self, offset: u32) -> Option<(u32, u32)> {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1] as usize;
        let prefix = self.source.get(line_start..offset as usize)?;
        let column = prefix.encode_utf16().count() as u32;
        Some((line as u32, column))
    }
}
