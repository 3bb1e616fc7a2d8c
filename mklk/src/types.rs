use std::fmt::{self, Write};

/// Length of the sprite section header.
pub const SPRITE_SECTION_HEADER_LENGTH: usize = 16;
/// Stride of one sprite record in the trailing array.
pub const SPRITE_RECORD_LENGTH: usize = 56;
/// Fixed part of an image block, chunk prefix included.
pub const BLOCK_HEADER_LENGTH: usize = 104;
/// `block_size` counts from after the tag and size fields.
pub const BLOCK_CHUNK_PREFIX_LENGTH: usize = 8;
/// Offset of the sprite section bytes inside the file.
pub const SPRITE_SECTION_OFFSET: usize = 20;

/// Fixed length byte tag.
///
/// Bytes are kept verbatim. Display stops at the first NUL.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag<const N: usize>(pub [u8; N]);

impl<const N: usize> Tag<N> {
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut res = [0u8; N];
        let used = bytes.len().min(N);

        res[..used].copy_from_slice(&bytes[..used]);

        Self(res)
    }

    /// NUL padded tag from a string, truncated to `N` bytes.
    pub fn from_str_padded(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn get_string(&self) -> String {
        self.to_string()
    }
}

impl<const N: usize> Default for Tag<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Display for Tag<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.iter().take_while(|c| **c != 0) {
            f.write_char(*c as char)?;
        }

        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Tag<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.get_string())
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Tag<N> {
    fn eq(&self, other: &[u8; N]) -> bool {
        &self.0 == other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileHeader {
    pub riff: Tag<4>,
    pub total_size: u32,
    pub sprite_tag: Tag<4>,
    pub sprite_tag2: Tag<4>,
    pub sprite_size: u32,
    /// Raw sprite section. Parsed separately.
    pub sprite_data: Vec<u8>,
    pub list_tag: Tag<4>,
    pub list_size: u32,
    pub list_type_tag: Tag<4>,
}

/// One compressed image block, a sprite sheet once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub block_tag: Tag<4>,
    pub block_size: u32,
    pub image_type: Tag<12>,
    pub name: Tag<24>,
    pub unknown_hash: u32,
    pub unknown2: u32,
    pub reserved: [u8; 32],
    pub hash2: u32,
    pub data_type: Tag<4>,
    pub width: u16,
    pub height: u16,
    pub data_tag: Tag<4>,
    pub data_size: u32,
    pub raw_data: Vec<u8>,
    /// RGBA8, `width * height * 4` bytes. Only set when decoding succeeded.
    pub data: Option<Vec<u8>>,
}

impl ImageBlock {
    pub fn pixel_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    pub fn is_decoded(&self) -> bool {
        self.data.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteSectionHeader {
    pub unknown0: u32,
    pub unknown1: u32,
    pub sprite_count: u32,
    pub padding0: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteRecord {
    /// Position in the record array.
    pub index: usize,
    pub xpos: u32,
    pub ypos: u32,
    pub width: u32,
    pub height: u32,
    pub width2: u32,
    pub height2: u32,
    pub unknown2: u32,
    pub unknown3: u32,
    pub unknown4: u32,
    pub unknown5: u32,
    pub unknown6: u32,
    /// Which sheet holds the pixels.
    pub sheet_index: u32,
    pub unknown7: u32,
    pub unknown8: u32,
    /// RGBA8, `width * height * 4` bytes. Only set when extraction succeeded.
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteSection {
    pub header: SpriteSectionHeader,
    pub sprites: Vec<SpriteRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MklkFile {
    pub header: FileHeader,
    pub sheets: Vec<ImageBlock>,
    /// Missing when the section cannot hold its own header.
    pub sprite_section: Option<SpriteSection>,
}

impl MklkFile {
    pub fn sprites(&self) -> &[SpriteRecord] {
        self.sprite_section
            .as_ref()
            .map(|section| section.sprites.as_slice())
            .unwrap_or_default()
    }
}
