//! MKLK sprite sheet archive decoding
//!
//! A RIFF framed file: a header carrying a raw sprite section, then a stream of
//! lz4 compressed RGBA8 sheets. The sprite section describes rectangles inside
//! those sheets.
//!
//! Only a header that cannot be read is fatal. Anything after that is decoded
//! as far as it goes, with problems logged and the rest of the data kept.
use std::{ffi::OsStr, path::Path};

use log::{info, warn};

pub mod blocks;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod extract;
mod parser;
pub mod sprites;
mod types;
mod utils;
pub mod validate;
mod writer;

pub use types::*;
pub use utils::force_opaque;
pub use validate::{HeaderCheck, Lenient, Strict};

use crate::{
    blocks::{decode_blocks, parse_blocks},
    cursor::Cursor,
    error::Result,
    extract::extract_sprites,
    parser::parse_file_header,
    sprites::parse_sprite_section,
};

pub struct MklkDecoder {
    header_check: Box<dyn HeaderCheck>,
    parallel: bool,
    opaque: bool,
}

impl Default for MklkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MklkDecoder {
    pub fn new() -> Self {
        Self {
            header_check: Box::new(Lenient),
            parallel: false,
            opaque: false,
        }
    }

    pub fn header_check(&mut self, check: impl HeaderCheck + 'static) -> &mut Self {
        self.header_check = Box::new(check);
        self
    }

    /// Shorthand for [`Strict`] or [`Lenient`].
    pub fn strict(&mut self, strict: bool) -> &mut Self {
        if strict {
            self.header_check(Strict)
        } else {
            self.header_check(Lenient)
        }
    }

    /// Decode sheet payloads on the rayon pool.
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    /// Force decoded sheets to full alpha, before sprites are cut from them.
    pub fn opaque(&mut self, opaque: bool) -> &mut Self {
        self.opaque = opaque;
        self
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<MklkFile> {
        let mut cursor = Cursor::new(bytes);

        let header = cursor.run(parse_file_header)?;
        self.header_check.check(&header)?;

        let mut sheets = parse_blocks(&mut cursor);
        decode_blocks(&mut sheets, self.parallel);

        if self.opaque {
            sheets
                .iter_mut()
                .filter_map(|sheet| sheet.data.as_mut())
                .for_each(|data| force_opaque(data));
        }

        let sprite_section = match parse_sprite_section(&header.sprite_data) {
            Ok(mut section) => {
                extract_sprites(&mut section.sprites, &sheets);
                Some(section)
            }
            Err(err) => {
                warn!("Failed to parse sprite section: {err}");
                None
            }
        };

        let file = MklkFile {
            header,
            sheets,
            sprite_section,
        };

        info!(
            "Decoded {} sheets ({} with pixels) and {} sprites ({} with pixels)",
            file.sheets.len(),
            file.sheets.iter().filter(|sheet| sheet.is_decoded()).count(),
            file.sprites().len(),
            file.sprites()
                .iter()
                .filter(|sprite| sprite.data.is_some())
                .count()
        );

        Ok(file)
    }
}

impl MklkFile {
    pub fn open_from_bytes(bytes: &[u8]) -> Result<Self> {
        MklkDecoder::new().decode(bytes)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;

        Self::open_from_bytes(&bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::MklkError;

    // 4x4, every pixel [x, y, 0x80, 0xff]
    fn small_image() -> Vec<u8> {
        (0..4u8)
            .flat_map(|y| (0..4u8).flat_map(move |x| [x, y, 0x80, 0xff]))
            .collect()
    }

    fn empty_section() -> SpriteSection {
        SpriteSection::default()
    }

    fn sprite(index: usize, sheet_index: u32, xpos: u32, ypos: u32) -> SpriteRecord {
        SpriteRecord {
            index,
            xpos,
            ypos,
            width: 2,
            height: 2,
            width2: 2,
            height2: 2,
            sheet_index,
            ..Default::default()
        }
    }

    #[test]
    fn single_sheet_no_sprites() {
        let file = MklkFile::new(
            &empty_section(),
            vec![ImageBlock::from_rgba8("sheet0", 4, 4, &small_image())],
        );
        let bytes = file.write_to_bytes();

        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(file.header.sprite_size, 16);

        let decoded = MklkFile::open_from_bytes(&bytes).unwrap();

        assert_eq!(decoded.sheets.len(), 1);
        assert_eq!(decoded.sheets[0].data.as_deref().map(|d| d.len()), Some(64));
        assert_eq!(decoded.sheets[0].data.as_deref(), Some(small_image().as_slice()));
        assert_eq!(decoded.sheets[0].name.get_string(), "sheet0");
        assert!(decoded.sprites().is_empty());
        assert_eq!(decoded.header, file.header);
    }

    #[test]
    fn truncated_second_block() {
        let file = MklkFile::new(
            &empty_section(),
            vec![
                ImageBlock::from_rgba8("a", 4, 4, &small_image()),
                ImageBlock::from_rgba8("b", 4, 4, &small_image()),
            ],
        );
        let bytes = file.write_to_bytes();
        let second_len = file.sheets[1].to_bytes().len();

        // halfway into the second block header
        let cut = bytes.len() - second_len + BLOCK_HEADER_LENGTH / 2;
        let decoded = MklkFile::open_from_bytes(&bytes[..cut]).unwrap();

        assert_eq!(decoded.sheets.len(), 1);
        assert!(decoded.sheets[0].is_decoded());
    }

    #[test]
    fn truncated_last_payload() {
        let file = MklkFile::new(
            &empty_section(),
            vec![
                ImageBlock::from_rgba8("a", 4, 4, &small_image()),
                ImageBlock::from_rgba8("b", 4, 4, &small_image()),
            ],
        );
        let bytes = file.write_to_bytes();

        let decoded = MklkFile::open_from_bytes(&bytes[..bytes.len() - 1]).unwrap();

        assert_eq!(decoded.sheets.len(), 2);
        assert!(decoded.sheets[0].is_decoded());
        assert_eq!(decoded.sheets[1].name.get_string(), "b");
        assert!(!decoded.sheets[1].is_decoded());
    }

    #[test]
    fn sprites_from_sheets() {
        let section = SpriteSection {
            header: SpriteSectionHeader {
                unknown0: 1,
                unknown1: 0x100,
                sprite_count: 3,
                padding0: 0,
            },
            sprites: vec![sprite(0, 0, 0, 0), sprite(1, 0, 2, 2), sprite(2, 5, 0, 0)],
        };
        let file = MklkFile::new(
            &section,
            vec![ImageBlock::from_rgba8("sheet0", 4, 4, &small_image())],
        );

        let decoded = MklkFile::open_from_bytes(&file.write_to_bytes()).unwrap();
        let sprites = decoded.sprites();

        assert_eq!(sprites.len(), 3);
        assert_eq!(
            sprites[0].data.as_deref(),
            Some([0, 0, 0x80, 0xff, 1, 0, 0x80, 0xff, 0, 1, 0x80, 0xff, 1, 1, 0x80, 0xff].as_slice())
        );
        assert_eq!(
            sprites[1].data.as_deref(),
            Some([2, 2, 0x80, 0xff, 3, 2, 0x80, 0xff, 2, 3, 0x80, 0xff, 3, 3, 0x80, 0xff].as_slice())
        );
        // sheet 5 does not exist
        assert!(sprites[2].data.is_none());
        assert_eq!(sprites[2].sheet_index, 5);
    }

    #[test]
    fn unsupported_sheet_keeps_sprite_descriptors() {
        let mut sheet = ImageBlock::from_rgba8("odd", 4, 4, &small_image());
        sheet.data_type = Tag(*b"dxt5");

        let section = SpriteSection {
            header: SpriteSectionHeader {
                sprite_count: 1,
                ..Default::default()
            },
            sprites: vec![sprite(0, 0, 0, 0)],
        };

        let decoded =
            MklkFile::open_from_bytes(&MklkFile::new(&section, vec![sheet]).write_to_bytes())
                .unwrap();

        assert_eq!(decoded.sheets.len(), 1);
        assert!(decoded.sheets[0].data.is_none());
        assert!(!decoded.sheets[0].raw_data.is_empty());
        assert_eq!(decoded.sprites().len(), 1);
        assert!(decoded.sprites()[0].data.is_none());
    }

    #[test]
    fn truncated_header_is_fatal() {
        let file = MklkFile::new(&empty_section(), vec![]);
        let bytes = file.write_to_bytes();

        let err = MklkFile::open_from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, MklkError::OutOfBounds { .. }));

        // sprite section longer than the file
        let mut bytes = bytes;
        bytes[16..20].copy_from_slice(&1000u32.to_le_bytes());
        assert!(MklkFile::open_from_bytes(&bytes).is_err());
    }

    #[test]
    fn short_sprite_section_is_not_fatal() {
        let mut file = MklkFile::new(
            &empty_section(),
            vec![ImageBlock::from_rgba8("a", 4, 4, &small_image())],
        );
        file.header.sprite_data = vec![1, 2, 3];
        file.header.sprite_size = 3;

        let decoded = MklkFile::open_from_bytes(&file.write_to_bytes()).unwrap();

        assert!(decoded.sprite_section.is_none());
        assert_eq!(decoded.sheets.len(), 1);
    }

    #[test]
    fn strict_rejects_foreign_files() {
        let mut file = MklkFile::new(&empty_section(), vec![]);
        file.header.riff = Tag(*b"RIFX");
        let bytes = file.write_to_bytes();

        assert!(MklkFile::open_from_bytes(&bytes).is_ok());

        let err = MklkDecoder::new().strict(true).decode(&bytes).unwrap_err();
        assert!(matches!(err, MklkError::UnexpectedTag { .. }));
    }

    #[test]
    fn decoder_options() {
        let mut pixels = small_image();
        pixels.chunks_exact_mut(4).for_each(|pixel| pixel[3] = 0);

        let file = MklkFile::new(
            &empty_section(),
            vec![
                ImageBlock::from_rgba8("a", 4, 4, &pixels),
                ImageBlock::from_rgba8("b", 4, 4, &pixels),
            ],
        );
        let bytes = file.write_to_bytes();

        let plain = MklkFile::open_from_bytes(&bytes).unwrap();
        let parallel = MklkDecoder::new().parallel(true).decode(&bytes).unwrap();
        assert_eq!(plain, parallel);

        let opaque = MklkDecoder::new().opaque(true).decode(&bytes).unwrap();
        assert!(opaque
            .sheets
            .iter()
            .filter_map(|sheet| sheet.data.as_ref())
            .all(|data| data.chunks_exact(4).all(|pixel| pixel[3] == 255)));
        assert_eq!(opaque.sheets.len(), 2);
    }

    #[test]
    fn decoding_is_pure() {
        let file = MklkFile::new(
            &empty_section(),
            vec![ImageBlock::from_rgba8("a", 4, 4, &small_image())],
        );
        let bytes = file.write_to_bytes();
        let copy = bytes.clone();

        let first = MklkFile::open_from_bytes(&bytes).unwrap();
        let second = MklkFile::open_from_bytes(&bytes).unwrap();

        assert_eq!(first, second);
        assert_eq!(bytes, copy);
    }
}
