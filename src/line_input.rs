//! Incremental line input.
//!
//! This module provides a small adapter that turns any `std::io::Read` into
//! a pull-based stream of numbered lines with a one-line pushback slot. The
//! pushback is what lets the lazy sequence iterator stop reading exactly at
//! an item boundary: the boundary line is read, recognized, and parked here
//! until the next demand.

use std::io::{BufRead, BufReader, Read};

use crate::error::Error;

/// One raw input line with its 1-indexed position in the stream.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub(crate) no: u32,
    pub(crate) text: String,
}

impl Line {
    /// Number of leading spaces. Only spaces count as indentation; the
    /// grammar recognizes no tabs.
    #[inline]
    pub(crate) fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    /// The line with surrounding whitespace removed.
    #[inline]
    pub(crate) fn content(&self) -> &str {
        self.text.trim()
    }

    #[inline]
    pub(crate) fn is_blank(&self) -> bool {
        self.content().is_empty()
    }
}

/// Buffered line reader over any `Read`, with a single pushback slot.
pub(crate) struct LineInput<R: Read> {
    reader: BufReader<R>,
    pushed: Option<Line>,
    next_no: u32,
}

impl<R: Read> LineInput<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pushed: None,
            next_no: 1,
        }
    }

    /// Pull the next line, or `None` at end of input. Trailing `\n` / `\r\n`
    /// are stripped; the rest of the line is kept verbatim.
    pub(crate) fn next_line(&mut self) -> Result<Option<Line>, Error> {
        if let Some(line) = self.pushed.take() {
            return Ok(Some(line));
        }
        let mut text = String::new();
        let read = self.reader.read_line(&mut text)?;
        if read == 0 {
            return Ok(None);
        }
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        let line = Line {
            no: self.next_no,
            text,
        };
        self.next_no += 1;
        Ok(Some(line))
    }

    /// Park one line to be returned by the next `next_line` call.
    /// The slot holds at most one line; the boundary scanner never needs more.
    pub(crate) fn push_back(&mut self, line: Line) {
        debug_assert!(self.pushed.is_none());
        self.pushed = Some(line);
    }
}

/// Split borrowed text into numbered lines for the eager entry points.
pub(crate) fn lines_of_str(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .map(|(i, l)| Line {
            no: (i + 1) as u32,
            text: l.to_string(),
        })
        .collect()
}
