use crate::error::FormatError;
use crate::scan::scan_f32;

/// Bounds-checked read position over a fully buffered file.
///
/// Every advance stays inside the buffer; running out of bytes where the
/// line format demands more becomes `FormatError::TruncatedLine`.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    /// 1-based number of the line `pos` is on
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            line: 1,
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    #[inline]
    fn truncated(&self) -> FormatError {
        FormatError::TruncatedLine {
            line: self.line,
            offset: self.pos,
        }
    }

    /// Take the rest of the current line (without its `\n`) and move to the next one.
    pub fn take_line(&mut self) -> &'a [u8] {
        let buf = self.buf;
        let rest = &buf[self.pos..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                self.pos += i + 1;
                self.line += 1;
                &rest[..i]
            }
            None => {
                self.pos = self.buf.len();
                rest
            }
        }
    }

    /// Move past the next `\n`, or to the end of the buffer if there is none.
    #[inline]
    pub fn skip_line(&mut self) {
        let _ = self.take_line();
    }

    /// Take the bytes up to the next space and consume the space.
    ///
    /// The returned slice borrows the buffer; nothing is copied.
    pub fn take_token(&mut self) -> Result<&'a [u8], FormatError> {
        let buf = self.buf;
        let rest = &buf[self.pos..];
        match rest.iter().position(|&b| b == b' ' || b == b'\n') {
            Some(i) if rest[i] == b' ' => {
                self.pos += i + 1;
                Ok(&rest[..i])
            }
            Some(i) => Err(FormatError::TruncatedLine {
                line: self.line,
                offset: self.pos + i,
            }),
            None => Err(FormatError::TruncatedLine {
                line: self.line,
                offset: self.buf.len(),
            }),
        }
    }

    /// Scan the numeral at the cursor.
    ///
    /// Bytes the scanner does not consume (an exponent suffix, say) are
    /// passed over up to the next space or newline. A field that would
    /// start at a newline or at the end of the buffer is a truncated line.
    pub fn scan_field(&mut self) -> Result<f32, FormatError> {
        match self.peek() {
            None | Some(b'\n') => return Err(self.truncated()),
            _ => {}
        }

        let (value, consumed) = scan_f32(&self.buf[self.pos..]);
        self.pos += consumed;

        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\n' {
                break;
            }
            self.pos += 1;
        }

        Ok(value)
    }

    /// Consume the single space that separates two fields.
    #[inline]
    pub fn expect_separator(&mut self) -> Result<(), FormatError> {
        match self.peek() {
            Some(b' ') => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.truncated()),
        }
    }
}
