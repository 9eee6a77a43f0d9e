//! Line splitting for spot list files
//!
//! - Leading and trailing blanks (space, tab) are dropped
//! - `\n`, `\r`, `\r\n` and `\n\r` each end one line
//! - A doubled identical terminator (`\n\n`, `\r\r`) ends two lines
//! - A non-blank character after trailing blanks is rejected
//! - Content longer than the line buffer is rejected

use std::io::{BufReader, Bytes, Read};

use super::errors::{SpotListError, SpotListResult};

/// Line buffer size in characters, excluding the terminator
pub const DEFAULT_MAX_LINE: usize = 255;

/// One trimmed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number
    pub number: u64,
    /// Line content without blanks at either end and without terminator
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    Before,
    In,
    After,
}

fn is_blank(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

fn is_eol(ch: u8) -> bool {
    ch == b'\n' || ch == b'\r'
}

/// Byte-at-a-time line reader with one byte of pushback
pub struct LineReader<R: Read> {
    bytes: Bytes<BufReader<R>>,
    pushback: Option<u8>,
    eof: bool,
    number: u64,
    max_line: usize,
}

impl<R: Read> LineReader<R> {
    /// Wraps `reader`; lines longer than `max_line` are rejected
    pub fn new(reader: R, max_line: usize) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            pushback: None,
            eof: false,
            number: 0,
            max_line,
        }
    }

    /// Changes the line buffer size for lines not yet read
    pub fn set_max_line(&mut self, max_line: usize) {
        self.max_line = max_line;
    }

    /// Number of the last line returned
    pub fn line_number(&self) -> u64 {
        self.number
    }

    fn read_byte(&mut self) -> SpotListResult<Option<u8>> {
        if let Some(ch) = self.pushback.take() {
            return Ok(Some(ch));
        }
        match self.bytes.next() {
            Some(Ok(ch)) => Ok(Some(ch)),
            Some(Err(e)) => Err(SpotListError::io(
                format!("on line {} while reading file", self.number),
                e,
            )),
            None => {
                self.eof = true;
                Ok(None)
            }
        }
    }

    /// Reads the next line. Returns `None` at end of input.
    ///
    /// Blank lines come back with empty text.
    pub fn next_line(&mut self) -> SpotListResult<Option<Line>> {
        if self.eof {
            return Ok(None);
        }

        let mut text: Vec<u8> = Vec::new();
        let mut lane = Lane::Before;
        let mut consumed = false;

        while let Some(ch) = self.read_byte()? {
            if !consumed {
                consumed = true;
                self.number += 1;
            }

            match lane {
                Lane::Before if is_blank(ch) => continue,
                Lane::Before => lane = Lane::In,
                Lane::In if is_blank(ch) => {
                    lane = Lane::After;
                    continue;
                }
                Lane::After if is_blank(ch) => continue,
                Lane::After if !is_eol(ch) => {
                    return Err(SpotListError::bad_symbol(
                        self.number,
                        &String::from_utf8_lossy(&text),
                        char::from(ch),
                    ));
                }
                _ => {}
            }

            if is_eol(ch) {
                if let Some(next) = self.read_byte()? {
                    if !is_eol(next) || next == ch {
                        self.pushback = Some(next);
                    }
                }
                return Ok(Some(self.line(text)));
            }

            if text.len() >= self.max_line {
                return Err(SpotListError::line_too_long(
                    self.number,
                    &String::from_utf8_lossy(&text),
                    self.max_line,
                ));
            }
            text.push(ch);
        }

        if consumed {
            Ok(Some(self.line(text)))
        } else {
            Ok(None)
        }
    }

    fn line(&self, text: Vec<u8>) -> Line {
        Line {
            number: self.number,
            text: String::from_utf8_lossy(&text).into_owned(),
        }
    }
}
