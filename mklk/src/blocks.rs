//! Image block stream that follows the file header.
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    cursor::Cursor,
    error::Result,
    types::{BLOCK_CHUNK_PREFIX_LENGTH, BLOCK_HEADER_LENGTH},
    ImageBlock,
};

/// Bytes between the end of the payload and the next block.
///
/// `block_size` covers everything after the chunk prefix, so the padding is
/// whatever it declares beyond the header fields and the payload.
pub fn block_padding(block_size: u32, data_size: u32) -> usize {
    let header_fields = (BLOCK_HEADER_LENGTH - BLOCK_CHUNK_PREFIX_LENGTH) as i64;
    let adjust = block_size as i64 - data_size as i64 - header_fields;

    adjust.max(0) as usize
}

/// Fixed 104 byte block header. `raw_data` is left empty.
///
/// A short header fails with the offset of the field that did not fit.
pub fn read_block_header(cursor: &mut Cursor) -> Result<ImageBlock> {
    let block_tag = cursor.read_tag::<4>()?;
    let block_size = cursor.read_u32()?;
    let image_type = cursor.read_tag::<12>()?;
    let name = cursor.read_tag::<24>()?;
    let unknown_hash = cursor.read_u32()?;
    let unknown2 = cursor.read_u32()?;

    let mut reserved = [0u8; 32];
    reserved.copy_from_slice(cursor.read_slice(32)?);

    Ok(ImageBlock {
        block_tag,
        block_size,
        image_type,
        name,
        unknown_hash,
        unknown2,
        reserved,
        hash2: cursor.read_u32()?,
        data_type: cursor.read_tag()?,
        width: cursor.read_u16()?,
        height: cursor.read_u16()?,
        data_tag: cursor.read_tag()?,
        data_size: cursor.read_u32()?,
        raw_data: vec![],
        data: None,
    })
}

/// Parses one block and skips its padding.
///
/// Only a short fixed header is an error. A payload or padding that runs past
/// the end of the buffer ends the stream but keeps the block, with whatever
/// payload bytes were there.
pub fn parse_block(cursor: &mut Cursor) -> Result<ImageBlock> {
    let mut block = read_block_header(cursor)?;

    let data_size = block.data_size as usize;

    if data_size > cursor.remaining() {
        warn!(
            "Payload of block {:?} is {} bytes short",
            block.name.get_string(),
            data_size - cursor.remaining()
        );

        block.raw_data = cursor.rest().to_vec();
        cursor.exhaust();

        return Ok(block);
    }

    block.raw_data = cursor.read_slice(data_size)?.to_vec();

    let padding = block_padding(block.block_size, block.data_size);

    if padding > 0 && cursor.advance(padding).is_err() {
        debug!(
            "Padding of {padding} bytes after block {:?} runs past the end ({} bytes left)",
            block.name.get_string(),
            cursor.remaining()
        );

        cursor.exhaust();
    }

    Ok(block)
}

/// Parses blocks until the buffer runs out.
///
/// A block that cannot be parsed stops the stream. Everything before it is kept.
pub fn parse_blocks(cursor: &mut Cursor) -> Vec<ImageBlock> {
    let mut blocks = vec![];

    while !cursor.at_end() {
        let block_start = cursor.offset();

        match parse_block(cursor) {
            Ok(block) => blocks.push(block),
            Err(err) => {
                warn!(
                    "Failed to parse block {} at offset {block_start}: {err}",
                    blocks.len()
                );
                break;
            }
        }
    }

    blocks
}

/// Decodes every block payload. Payloads are independent so they can go in parallel.
pub fn decode_blocks(blocks: &mut [ImageBlock], parallel: bool) {
    if parallel {
        blocks.par_iter_mut().for_each(|block| {
            block.decode();
        });
    } else {
        blocks.iter_mut().for_each(|block| {
            block.decode();
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Tag;

    fn block(name: &str, data_type: &[u8; 4], payload: &[u8], padding: usize) -> ImageBlock {
        ImageBlock {
            block_tag: Tag(*b"IMAG"),
            block_size: (payload.len() + 96 + padding) as u32,
            image_type: Tag::from_str_padded("texture"),
            name: Tag::from_str_padded(name),
            unknown_hash: 0xdead_beef,
            unknown2: 0,
            reserved: [0u8; 32],
            hash2: 0,
            data_type: Tag(*data_type),
            width: 1,
            height: 1,
            data_tag: Tag(*b"DATA"),
            data_size: payload.len() as u32,
            raw_data: payload.to_vec(),
            data: None,
        }
    }

    #[test]
    fn padding() {
        assert_eq!(block_padding(96 + 10, 10), 0);
        assert_eq!(block_padding(96 + 10 + 6, 10), 6);
        // smaller than the block itself
        assert_eq!(block_padding(4, 10), 0);
        assert_eq!(block_padding(0, u32::MAX), 0);
    }

    #[test]
    fn block_header_length() {
        let mut bytes = block("name", b"lz4 ", &[7, 8, 9], 0).to_bytes();
        bytes.push(10);

        let mut cursor = Cursor::new(&bytes);
        let header = read_block_header(&mut cursor).unwrap();

        assert_eq!(cursor.offset(), BLOCK_HEADER_LENGTH);
        assert_eq!(header.data_size, 3);
        assert_eq!(header.data_type, *b"lz4 ");
        assert_eq!(header.image_type.get_string(), "texture");
        assert_eq!(header.unknown_hash, 0xdead_beef);
        assert_eq!((header.width, header.height), (1, 1));
        assert!(header.raw_data.is_empty());
        assert_eq!(cursor.rest(), [7, 8, 9, 10]);
    }

    #[test]
    fn short_block_header_fails() {
        let bytes = block("name", b"lz4 ", &[], 0).to_bytes();

        let mut cursor = Cursor::new(&bytes[..BLOCK_HEADER_LENGTH - 1]);

        assert!(read_block_header(&mut cursor).is_err());
    }

    #[test]
    fn skips_padding_between_blocks() {
        let first = block("first", b"raw ", &[1, 2, 3], 5);
        let second = block("second", b"raw ", &[4], 0);

        let mut bytes = first.to_bytes();
        assert_eq!(bytes.len(), BLOCK_HEADER_LENGTH + 3 + 5);
        bytes.extend(second.to_bytes());

        let mut cursor = Cursor::new(&bytes);
        let blocks = parse_blocks(&mut cursor);

        assert_eq!(blocks, vec![first, second]);
        assert!(cursor.at_end());
    }

    #[test]
    fn padding_past_end_keeps_block() {
        let first = block("first", b"raw ", &[1, 2, 3], 50);

        let mut bytes = first.to_bytes();
        bytes.truncate(BLOCK_HEADER_LENGTH + 3 + 10);

        let mut cursor = Cursor::new(&bytes);
        let blocks = parse_blocks(&mut cursor);

        assert_eq!(blocks.len(), 1);
        assert!(cursor.at_end());
    }

    #[test]
    fn truncated_second_header_keeps_first() {
        let first = block("first", b"raw ", &[1, 2, 3], 0);
        let second = block("second", b"raw ", &[4, 5], 0);

        let mut bytes = first.to_bytes();
        let second_bytes = second.to_bytes();
        bytes.extend(&second_bytes[..BLOCK_HEADER_LENGTH / 2]);

        let mut cursor = Cursor::new(&bytes);
        let blocks = parse_blocks(&mut cursor);

        assert_eq!(blocks, vec![first]);
    }

    #[test]
    fn truncated_payload_keeps_block() {
        let first = block("first", b"raw ", &[1, 2, 3], 0);

        let mut bytes = first.to_bytes();
        bytes.pop();

        let mut cursor = Cursor::new(&bytes);
        let mut blocks = parse_blocks(&mut cursor);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data_size, 3);
        assert_eq!(blocks[0].raw_data, [1, 2]);
        assert!(cursor.at_end());

        decode_blocks(&mut blocks, false);
        assert!(blocks[0].data.is_none());
    }

    #[test]
    fn truncated_last_lz4_payload_keeps_both_blocks() {
        let pixels: Vec<u8> = (0..16u8).collect();
        let mut first = block("a", b"lz4 ", &lz4_flex::block::compress(&pixels), 0);
        first.width = 2;
        first.height = 2;
        let mut second = first.clone();
        second.name = Tag::from_str_padded("b");

        let mut bytes = first.to_bytes();
        bytes.extend(second.to_bytes());
        bytes.pop();

        let mut cursor = Cursor::new(&bytes);
        let mut blocks = parse_blocks(&mut cursor);
        decode_blocks(&mut blocks, false);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].data.as_deref(), Some(pixels.as_slice()));
        assert_eq!(blocks[1].name.get_string(), "b");
        assert_eq!(blocks[1].raw_data.len(), second.raw_data.len() - 1);
        assert!(blocks[1].data.is_none());
    }

    #[test]
    fn unsupported_blocks_are_kept_undecoded() {
        let mut blocks = vec![
            block("a", b"dxt1", &[0; 8], 0),
            block("b", b"lz4\0", &[0; 8], 0),
        ];

        decode_blocks(&mut blocks, false);

        assert!(blocks.iter().all(|block| block.data.is_none()));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn parallel_matches_sequential() {
        let pixels: Vec<u8> = (0..16u8).collect();
        let mut good = block("good", b"lz4 ", &lz4_flex::block::compress(&pixels), 0);
        good.width = 2;
        good.height = 2;

        let bad = block("bad", b"lz4 ", &[0xff, 0xff], 0);

        let mut sequential = vec![good.clone(), bad.clone(), good.clone()];
        let mut parallel = vec![good, bad, sequential[2].clone()];

        decode_blocks(&mut sequential, false);
        decode_blocks(&mut parallel, true);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0].data.as_deref(), Some(pixels.as_slice()));
        assert!(sequential[1].data.is_none());
    }
}
