use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use streaming_iterator::StreamingIterator;

/// A lending iterator over the whitespace separated tokens of a type implementing Read.
///
/// Reading stops at the first IO error, which can be obtained with [TokenIterator::take_error].
pub struct TokenIterator<T: Read> {
    reader: BufReader<T>,
    line: String,
    line_number: usize,

    /// The byte range of the current token within `line`.
    token: Option<(usize, usize)>,
    cursor: usize,

    error: Option<io::Error>,
}

impl<T: Read> TokenIterator<T> {
    pub fn new(reader: T) -> TokenIterator<T> {
        TokenIterator {
            reader: BufReader::new(reader),
            line: String::new(),
            line_number: 0,
            token: None,
            cursor: 0,
            error: None,
        }
    }

    /// Returns the (one based) line number of the current token.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the IO error that ended the iteration, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Finds the next token in the current line, starting at the cursor.
    fn next_in_line(&mut self) -> Option<(usize, usize)> {
        let rest = &self.line[self.cursor..];
        let start = self.cursor + rest.find(|c: char| !c.is_whitespace())?;
        let end = self.line[start..]
            .find(char::is_whitespace)
            .map_or(self.line.len(), |length| start + length);

        Some((start, end))
    }
}

impl<T: Read> StreamingIterator for TokenIterator<T> {
    type Item = str;

    fn advance(&mut self) {
        loop {
            if let Some((start, end)) = self.next_in_line() {
                self.token = Some((start, end));
                self.cursor = end;
                return;
            }

            self.line.clear();
            self.cursor = 0;
            match self.reader.read_line(&mut self.line) {
                Ok(n) if n > 0 => self.line_number += 1,
                Ok(_) => {
                    self.token = None;
                    return;
                }
                Err(error) => {
                    self.error = Some(error);
                    self.token = None;
                    return;
                }
            }
        }
    }

    fn get(&self) -> Option<&Self::Item> {
        self.token.map(|(start, end)| &self.line[start..end])
    }
}
