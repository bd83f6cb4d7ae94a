use std::io::{self, BufRead};

/// One physical line of the source document, terminator included.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character in the (lossily decoded) source.
    pub offset: usize,
    /// The raw text, including the trailing `\n` or `\r\n` when present.
    pub text: String,
}

impl Line {
    pub fn new(number: usize, offset: usize, text: impl Into<String>) -> Self {
        Line {
            number,
            offset,
            text: text.into(),
        }
    }

    /// The line without its terminator. Handles LF and CRLF endings.
    pub fn content(&self) -> &str {
        let text = self.text.strip_suffix('\n').unwrap_or(&self.text);
        text.strip_suffix('\r').unwrap_or(text)
    }

    pub fn has_terminator(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// A blank line is a terminator with nothing in front of it.
    pub fn is_blank(&self) -> bool {
        self.has_terminator() && self.content().is_empty()
    }

    /// Byte range of `content()[start..end]` within the whole source.
    pub fn span(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        self.offset + start..self.offset + end
    }
}

/// Reads a document one full line at a time, with a single line of pushback
/// so the following line can be inspected without consuming it.
pub struct LineSource<R> {
    reader: R,
    pending: Option<Line>,
    next_number: usize,
    next_offset: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        LineSource {
            reader,
            pending: None,
            next_number: 1,
            next_offset: 0,
            buf: Vec::new(),
        }
    }

    /// Advance to the next line. Returns `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        self.read_line()
    }

    /// Look at the next line without advancing. Peeking past the end of input
    /// yields `Ok(None)`, and repeated peeks return the same line.
    pub fn peek_line(&mut self) -> io::Result<Option<&Line>> {
        if self.pending.is_none() {
            self.pending = self.read_line()?;
        }
        Ok(self.pending.as_ref())
    }

    fn read_line(&mut self) -> io::Result<Option<Line>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        let line = Line::new(self.next_number, self.next_offset, text);
        self.next_number += 1;
        self.next_offset += line.text.len();
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<Line> {
        let mut source = LineSource::new(input.as_bytes());
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn numbers_and_offsets() {
        let lines = collect("one\ntwo\r\nthree");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].offset, 4);
        assert_eq!(lines[1].content(), "two");
        assert_eq!(lines[2].offset, 9);
        assert!(!lines[2].has_terminator());
    }

    #[test]
    fn peek_does_not_advance() {
        let mut source = LineSource::new("a\nb\n".as_bytes());
        assert_eq!(source.peek_line().unwrap().unwrap().content(), "a");
        assert_eq!(source.peek_line().unwrap().unwrap().content(), "a");
        assert_eq!(source.next_line().unwrap().unwrap().content(), "a");
        assert_eq!(source.peek_line().unwrap().unwrap().content(), "b");
        assert_eq!(source.next_line().unwrap().unwrap().content(), "b");
        assert!(source.peek_line().unwrap().is_none());
        assert!(source.next_line().unwrap().is_none());
        assert!(source.peek_line().unwrap().is_none());
    }

    #[test]
    fn long_lines_are_not_truncated() {
        let long = "x".repeat(10_000);
        let lines = collect(&format!("{}\nend\n", long));
        assert_eq!(lines[0].content().len(), 10_000);
        assert_eq!(lines[1].content(), "end");
    }

    #[test]
    fn blank_lines() {
        let lines = collect("\n\r\n  \n");
        assert!(lines[0].is_blank());
        assert!(lines[1].is_blank());
        assert!(!lines[2].is_blank());
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut source = LineSource::new(&b"caf\xe9\n"[..]);
        let line = source.next_line().unwrap().unwrap();
        assert_eq!(line.content(), "caf\u{fffd}");
    }
}
