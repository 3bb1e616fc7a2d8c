use nom::{
    bytes::complete::take,
    combinator::map,
    number::complete::le_u32,
    IResult as _IResult, Parser,
};

use crate::{FileHeader, SpriteRecord, SpriteSectionHeader, Tag};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

pub fn parse_array<const N: usize>(i: &[u8]) -> IResult<'_, [u8; N]> {
    map(take(N), |bytes: &[u8]| {
        let mut res = [0u8; N];
        res.copy_from_slice(bytes);
        res
    })
    .parse(i)
}

pub fn parse_tag<const N: usize>(i: &[u8]) -> IResult<'_, Tag<N>> {
    map(parse_array::<N>, Tag).parse(i)
}

/// File header, including the raw sprite section.
///
/// Tags are captured as they are. Checking them is up to a [`crate::HeaderCheck`].
pub fn parse_file_header(i: &[u8]) -> IResult<'_, FileHeader> {
    let (i, (riff, total_size, sprite_tag, sprite_tag2, sprite_size)) = (
        parse_tag::<4>,
        le_u32,
        parse_tag::<4>,
        parse_tag::<4>,
        le_u32,
    )
        .parse(i)?;

    let (i, sprite_data) = take(sprite_size as usize).parse(i)?;

    let (i, (list_tag, list_size, list_type_tag)) =
        (parse_tag::<4>, le_u32, parse_tag::<4>).parse(i)?;

    Ok((
        i,
        FileHeader {
            riff,
            total_size,
            sprite_tag,
            sprite_tag2,
            sprite_size,
            sprite_data: sprite_data.to_vec(),
            list_tag,
            list_size,
            list_type_tag,
        },
    ))
}

pub fn parse_sprite_section_header(i: &[u8]) -> IResult<'_, SpriteSectionHeader> {
    map(
        (le_u32, le_u32, le_u32, le_u32),
        |(unknown0, unknown1, sprite_count, padding0)| SpriteSectionHeader {
            unknown0,
            unknown1,
            sprite_count,
            padding0,
        },
    )
    .parse(i)
}

/// One 56 byte sprite record. `index` is left at 0 for the caller to fill in.
pub fn parse_sprite_record(i: &[u8]) -> IResult<'_, SpriteRecord> {
    map(
        (
            le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32, le_u32,
            le_u32, le_u32, le_u32,
        ),
        |(
            xpos,
            ypos,
            width,
            height,
            width2,
            height2,
            unknown2,
            unknown3,
            unknown4,
            unknown5,
            unknown6,
            sheet_index,
            unknown7,
            unknown8,
        )| SpriteRecord {
            index: 0,
            xpos,
            ypos,
            width,
            height,
            width2,
            height2,
            unknown2,
            unknown3,
            unknown4,
            unknown5,
            unknown6,
            sheet_index,
            unknown7,
            unknown8,
            data: None,
        },
    )
    .parse(i)
}
