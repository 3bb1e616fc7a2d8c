//! JSON description of a decoded archive, written next to the exported images.
use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
};

use mklk::{FileHeader, ImageBlock, MklkFile, SpriteRecord, SpriteSection};
use serde::Serialize;

use super::misc::{sheet_file_name, sprite_file_name};

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    pub header: HeaderMetadata,
    pub sheets: Vec<SheetMetadata>,
    pub sprite_section: Option<SpriteSectionMetadata>,
}

#[derive(Debug, Serialize)]
pub struct HeaderMetadata {
    pub riff: String,
    pub total_size: u32,
    pub sprite_tag: String,
    pub sprite_tag2: String,
    pub sprite_size: u32,
    pub list_tag: String,
    pub list_size: u32,
    pub list_type_tag: String,
}

#[derive(Debug, Serialize)]
pub struct SheetMetadata {
    pub index: usize,
    pub name: String,
    pub block_tag: String,
    pub block_size: u32,
    pub image_type: String,
    pub unknown_hash: u32,
    pub unknown2: u32,
    pub hash2: u32,
    pub data_type: String,
    pub width: u16,
    pub height: u16,
    pub data_tag: String,
    pub data_size: u32,
    pub decoded: bool,
    /// Relative to the metadata file. Only set for exported images.
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpriteSectionMetadata {
    pub unknown0: u32,
    pub unknown1: u32,
    pub sprite_count: u32,
    pub padding0: u32,
    pub sprites: Vec<SpriteMetadata>,
}

#[derive(Debug, Serialize)]
pub struct SpriteMetadata {
    pub index: usize,
    pub xpos: u32,
    pub ypos: u32,
    pub width: u32,
    pub height: u32,
    pub width2: u32,
    pub height2: u32,
    pub sheet_index: u32,
    /// `unknown2` to `unknown8` in record order.
    pub unknown: [u32; 7],
    pub extracted: bool,
    pub file: Option<String>,
}

impl From<&FileHeader> for HeaderMetadata {
    fn from(header: &FileHeader) -> Self {
        Self {
            riff: header.riff.get_string(),
            total_size: header.total_size,
            sprite_tag: header.sprite_tag.get_string(),
            sprite_tag2: header.sprite_tag2.get_string(),
            sprite_size: header.sprite_size,
            list_tag: header.list_tag.get_string(),
            list_size: header.list_size,
            list_type_tag: header.list_type_tag.get_string(),
        }
    }
}

impl SheetMetadata {
    fn new(index: usize, sheet: &ImageBlock, exported: bool) -> Self {
        let name = sheet.name.get_string();
        let non_empty = sheet.width > 0 && sheet.height > 0;

        Self {
            index,
            file: (exported && sheet.is_decoded() && non_empty)
                .then(|| sheet_file_name(index, &name)),
            name,
            block_tag: sheet.block_tag.get_string(),
            block_size: sheet.block_size,
            image_type: sheet.image_type.get_string(),
            unknown_hash: sheet.unknown_hash,
            unknown2: sheet.unknown2,
            hash2: sheet.hash2,
            data_type: sheet.data_type.get_string(),
            width: sheet.width,
            height: sheet.height,
            data_tag: sheet.data_tag.get_string(),
            data_size: sheet.data_size,
            decoded: sheet.is_decoded(),
        }
    }
}

impl SpriteMetadata {
    fn new(sprite: &SpriteRecord, exported: bool) -> Self {
        let extracted = sprite.data.is_some();
        let non_empty = sprite.width > 0 && sprite.height > 0;

        Self {
            index: sprite.index,
            xpos: sprite.xpos,
            ypos: sprite.ypos,
            width: sprite.width,
            height: sprite.height,
            width2: sprite.width2,
            height2: sprite.height2,
            sheet_index: sprite.sheet_index,
            unknown: [
                sprite.unknown2,
                sprite.unknown3,
                sprite.unknown4,
                sprite.unknown5,
                sprite.unknown6,
                sprite.unknown7,
                sprite.unknown8,
            ],
            extracted,
            file: (exported && extracted && non_empty).then(|| sprite_file_name(sprite.index)),
        }
    }
}

impl SpriteSectionMetadata {
    fn new(section: &SpriteSection, exported: bool) -> Self {
        Self {
            unknown0: section.header.unknown0,
            unknown1: section.header.unknown1,
            sprite_count: section.header.sprite_count,
            padding0: section.header.padding0,
            sprites: section
                .sprites
                .iter()
                .map(|sprite| SpriteMetadata::new(sprite, exported))
                .collect(),
        }
    }
}

impl Metadata {
    /// `export_sheets` and `export_sprites` decide whether `file` entries are filled in.
    pub fn new(name: &str, file: &MklkFile, export_sheets: bool, export_sprites: bool) -> Self {
        Self {
            name: name.to_string(),
            header: HeaderMetadata::from(&file.header),
            sheets: file
                .sheets
                .iter()
                .enumerate()
                .map(|(index, sheet)| SheetMetadata::new(index, sheet, export_sheets))
                .collect(),
            sprite_section: file
                .sprite_section
                .as_ref()
                .map(|section| SpriteSectionMetadata::new(section, export_sprites)),
        }
    }

    pub fn write_to_file(&self, path: &Path) -> eyre::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }
}
