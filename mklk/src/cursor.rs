//! Bounds checked reading over an in-memory buffer.
//!
//! The cursor runs `nom` parsers at its current offset and moves past whatever
//! they consumed. Any failure to read is reported as [`MklkError::OutOfBounds`]
//! and leaves the offset untouched, so callers can stop a loop and keep what
//! they already have.
use nom::{
    bytes::complete::take,
    number::complete::{le_u16, le_u32},
    Parser,
};

use crate::{
    error::{MklkError, Result},
    types::Tag,
};

pub type NomError<'a> = nom::error::Error<&'a [u8]>;

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    // always <= data.len()
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Unread bytes.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    fn out_of_bounds(&self) -> MklkError {
        MklkError::OutOfBounds {
            offset: self.offset,
            remaining: self.remaining(),
        }
    }

    /// Applies `parser` at the current offset and advances past the consumed bytes.
    pub fn run<P>(&mut self, mut parser: P) -> Result<P::Output>
    where
        P: Parser<&'a [u8], Error = NomError<'a>>,
    {
        let input = self.rest();
        let (rest, res) = parser.parse(input).map_err(|_| self.out_of_bounds())?;

        self.offset += input.len() - rest.len();

        Ok(res)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.run(le_u16::<&'a [u8], NomError<'a>>)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.run(le_u32::<&'a [u8], NomError<'a>>)
    }

    pub fn read_slice(&mut self, length: usize) -> Result<&'a [u8]> {
        self.run(take::<usize, &'a [u8], NomError<'a>>(length))
    }

    pub fn read_tag<const N: usize>(&mut self) -> Result<Tag<N>> {
        self.read_slice(N).map(Tag::from_slice)
    }

    /// Skips `length` bytes. Fails without moving if fewer remain.
    pub fn advance(&mut self, length: usize) -> Result<()> {
        self.read_slice(length).map(|_| ())
    }

    /// Moves to an absolute position. The end of the buffer is a valid position.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(MklkError::OutOfBounds {
                offset: position,
                remaining: 0,
            });
        }

        self.offset = position;

        Ok(())
    }

    /// Moves to the end of the buffer.
    pub fn exhaust(&mut self) {
        self.offset = self.data.len();
    }
}

#[cfg(test)]
mod test {
    use nom::number::complete::le_u32;

    use super::*;

    #[test]
    fn reads_advance() {
        let bytes = [b'l', b'z', b'4', b' ', 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = Cursor::new(&bytes);

        let tag = cursor.read_tag::<4>().unwrap();
        assert_eq!(tag, *b"lz4 ");
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert!(cursor.at_end());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn short_read_keeps_offset() {
        let bytes = [1, 2, 3];
        let mut cursor = Cursor::new(&bytes);

        cursor.advance(1).unwrap();

        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(
            err,
            MklkError::OutOfBounds {
                offset: 1,
                remaining: 2
            }
        ));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x0302);
    }

    #[test]
    fn seek_and_exhaust() {
        let bytes = [0u8; 8];
        let mut cursor = Cursor::new(&bytes);

        cursor.seek(8).unwrap();
        assert!(cursor.at_end());

        assert!(cursor.seek(9).is_err());
        assert_eq!(cursor.offset(), 8);

        cursor.seek(2).unwrap();
        assert_eq!(cursor.read_slice(3).unwrap().len(), 3);

        cursor.exhaust();
        assert!(cursor.at_end());
        assert!(cursor.read_slice(1).is_err());
    }

    #[test]
    fn runs_tuple_parser() {
        let bytes = [1, 0, 0, 0, 2, 0, 0, 0, 9];
        let mut cursor = Cursor::new(&bytes);

        let (a, b) = cursor
            .run((le_u32::<&[u8], NomError>, le_u32::<&[u8], NomError>))
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(cursor.rest(), &[9]);
    }
}
