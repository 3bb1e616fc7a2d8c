//! Sprite section embedded in the file header.
//!
//! The section starts with a 16 byte header holding the sprite count. The
//! records themselves are packed against the end of the section, with an
//! unknown amount of unparsed bytes between the header and the first record.
use log::warn;

use crate::{
    cursor::Cursor,
    error::Result,
    parser::{parse_sprite_record, parse_sprite_section_header},
    types::SPRITE_RECORD_LENGTH,
    SpriteRecord, SpriteSection,
};

/// Start of the record array, counted back from the end of the section.
///
/// `None` when the records would not fit in the section.
pub fn sprite_records_start(
    section_start: usize,
    section_len: usize,
    sprite_count: u32,
) -> Option<usize> {
    let records_len = (sprite_count as usize).checked_mul(SPRITE_RECORD_LENGTH)?;

    section_start
        .checked_add(section_len)?
        .checked_sub(records_len)
}

/// Parses the section header and its records.
///
/// Only a section too short for its own header is an error. A record that
/// cannot be read stops the loop and the records before it are returned.
pub fn parse_sprite_section(section: &[u8]) -> Result<SpriteSection> {
    let mut cursor = Cursor::new(section);
    let header = cursor.run(parse_sprite_section_header)?;

    let Some(records_start) = sprite_records_start(0, section.len(), header.sprite_count) else {
        warn!(
            "{} sprite records do not fit in a {} byte sprite section",
            header.sprite_count,
            section.len()
        );

        return Ok(SpriteSection {
            header,
            sprites: vec![],
        });
    };

    cursor.seek(records_start)?;

    let mut sprites = Vec::with_capacity(header.sprite_count as usize);

    for index in 0..header.sprite_count as usize {
        match cursor.run(parse_sprite_record) {
            Ok(record) => sprites.push(SpriteRecord { index, ..record }),
            Err(err) => {
                warn!("Failed to parse sprite record {index}: {err}");
                break;
            }
        }
    }

    Ok(SpriteSection { header, sprites })
}
