use image::RgbaImage;

use crate::{
    codec::LZ4_DATA_TYPE,
    types::{BLOCK_CHUNK_PREFIX_LENGTH, BLOCK_HEADER_LENGTH},
    validate::{LIST_TAG, RIFF_TAG},
    FileHeader, ImageBlock, MklkFile, SpriteRecord, SpriteSection, Tag,
};

/// Sets every alpha byte to 255.
///
/// Shows whether anything is hiding behind fully transparent pixels.
pub fn force_opaque(rgba: &mut [u8]) {
    rgba.chunks_exact_mut(4).for_each(|pixel| pixel[3] = 255);
}

impl ImageBlock {
    /// Decoded sheet as an image, if it was decoded.
    pub fn to_rgba8(&self) -> Option<RgbaImage> {
        let data = self.data.as_ref()?;

        RgbaImage::from_raw(self.width as u32, self.height as u32, data.clone())
    }

    /// Lz4 block holding `rgba`, with no padding.
    ///
    /// `rgba` must be `width * height * 4` bytes for the block to decode.
    pub fn from_rgba8(name: &str, width: u16, height: u16, rgba: &[u8]) -> Self {
        let raw_data = lz4_flex::block::compress(rgba);
        let data_size = raw_data.len() as u32;

        Self {
            block_tag: Tag::default(),
            block_size: data_size + (BLOCK_HEADER_LENGTH - BLOCK_CHUNK_PREFIX_LENGTH) as u32,
            image_type: Tag::default(),
            name: Tag::from_str_padded(name),
            unknown_hash: 0,
            unknown2: 0,
            reserved: [0u8; 32],
            hash2: 0,
            data_type: Tag(LZ4_DATA_TYPE),
            width,
            height,
            data_tag: Tag::default(),
            data_size,
            raw_data,
            data: None,
        }
    }
}

impl SpriteRecord {
    pub fn to_rgba8(&self) -> Option<RgbaImage> {
        let data = self.data.as_ref()?;

        RgbaImage::from_raw(self.width, self.height, data.clone())
    }
}

impl MklkFile {
    /// Assembles a file around a sprite section and blocks, filling in the size fields.
    ///
    /// Tags other than the RIFF framing are left zeroed.
    pub fn new(sprite_section: &SpriteSection, sheets: Vec<ImageBlock>) -> Self {
        let sprite_data = sprite_section.to_bytes();
        let blocks_len: usize = sheets.iter().map(|sheet| sheet.to_bytes().len()).sum();

        // list type tag plus the blocks
        let list_size = (4 + blocks_len) as u32;
        // everything after the RIFF size field
        let total_size = (4 + 4 + 4 + sprite_data.len() + 4 + 4 + list_size as usize) as u32;

        let header = FileHeader {
            riff: Tag(RIFF_TAG),
            total_size,
            sprite_tag: Tag::default(),
            sprite_tag2: Tag::default(),
            sprite_size: sprite_data.len() as u32,
            sprite_data,
            list_tag: Tag(LIST_TAG),
            list_size,
            list_type_tag: Tag::default(),
        };

        Self {
            header,
            sheets,
            sprite_section: Some(sprite_section.clone()),
        }
    }
}
