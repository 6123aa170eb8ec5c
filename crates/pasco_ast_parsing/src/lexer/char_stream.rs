//! Character level access to the source

use crate::lexer::{LexErrorKind, LexResult, LexingError};
use pasco_tokens::Position;
use std::collections::VecDeque;
use std::io;
use std::io::{BufReader, Read};

/// Decodes UTF-8 characters from a reader, tracking the position of the next
/// character to be read.
///
/// One consumed character can be given back with [`pushback`](Self::pushback),
/// which also restores the position it was read at.
#[derive(Debug)]
pub struct CharStream<R> {
    reader: BufReader<R>,
    pending: VecDeque<char>,
    position: Position,
    last: Option<(char, Position)>,
}

impl<R: Read> CharStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: VecDeque::new(),
            position: Position::default(),
            last: None,
        }
    }

    /// The position of the next character
    pub fn position(&self) -> Position {
        self.position
    }

    /// Looks at the next character without consuming it
    pub fn peek(&mut self) -> LexResult<Option<char>> {
        if self.pending.is_empty() {
            match self.read_char() {
                Ok(Some(c)) => self.pending.push_back(c),
                Ok(None) => return Ok(None),
                Err(kind) => return Err(LexingError::new(kind, self.position)),
            }
        }
        Ok(self.pending.front().copied())
    }

    /// Consumes the next character
    pub fn advance(&mut self) -> LexResult<Option<char>> {
        self.peek()?;
        let Some(c) = self.pending.pop_front() else {
            return Ok(None);
        };
        self.last = Some((c, self.position));
        self.position = self.position.advance(c);
        Ok(Some(c))
    }

    /// Gives back the last consumed character.
    ///
    /// Only a single character can be pushed back between advances.
    pub fn pushback(&mut self) {
        if let Some((c, position)) = self.last.take() {
            self.pending.push_front(c);
            self.position = position;
        }
    }

    fn read_char(&mut self) -> Result<Option<char>, LexErrorKind> {
        let mut buffer = [0_u8; 4];
        match self.reader.read_exact(&mut buffer[..1]) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let width = match buffer[0] {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(LexErrorKind::InvalidUtf8),
        };
        self.reader
            .read_exact(&mut buffer[1..width])
            .map_err(|_| LexErrorKind::InvalidUtf8)?;
        std::str::from_utf8(&buffer[..width])
            .map_err(|_| LexErrorKind::InvalidUtf8)
            .map(|s| s.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_advance_tracks_lines() {
        let mut stream = CharStream::new("ab\nc".as_bytes());
        assert_eq!(stream.advance().unwrap(), Some('a'));
        assert_eq!(stream.advance().unwrap(), Some('b'));
        assert_eq!(stream.position(), Position::new(1, 3));
        assert_eq!(stream.advance().unwrap(), Some('\n'));
        assert_eq!(stream.position(), Position::new(2, 1));
        assert_eq!(stream.advance().unwrap(), Some('c'));
        assert_eq!(stream.advance().unwrap(), None);
        assert_eq!(stream.peek().unwrap(), None);
    }

    #[test]
    fn test_pushback_restores_column_before_newline() {
        let mut stream = CharStream::new("xy\nz".as_bytes());
        stream.advance().unwrap();
        stream.advance().unwrap();
        stream.advance().unwrap();
        assert_eq!(stream.position(), Position::new(2, 1));
        stream.pushback();
        assert_eq!(stream.position(), Position::new(1, 3));
        assert_eq!(stream.peek().unwrap(), Some('\n'));
        assert_eq!(stream.advance().unwrap(), Some('\n'));
        assert_eq!(stream.advance().unwrap(), Some('z'));
    }

    #[test]
    fn test_pushback_after_peek() {
        let mut stream = CharStream::new("..".as_bytes());
        stream.advance().unwrap();
        assert_eq!(stream.peek().unwrap(), Some('.'));
        stream.pushback();
        assert_eq!(stream.position(), Position::new(1, 1));
        assert_eq!(stream.advance().unwrap(), Some('.'));
        assert_eq!(stream.advance().unwrap(), Some('.'));
        assert_eq!(stream.advance().unwrap(), None);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut stream = CharStream::new("é'".as_bytes());
        assert_eq!(stream.advance().unwrap(), Some('é'));
        assert_eq!(stream.position(), Position::new(1, 2));
        assert_eq!(stream.advance().unwrap(), Some('\''));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes: &[u8] = &[b'a', 0xFF];
        let mut stream = CharStream::new(bytes);
        stream.advance().unwrap();
        let err = stream.peek().unwrap_err();
        assert!(matches!(err.kind(), LexErrorKind::InvalidUtf8));
        assert_eq!(err.position(), Some(Position::new(1, 2)));
    }
}
