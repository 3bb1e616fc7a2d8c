use byte_writer::ByteWriter;

use crate::{
    blocks::block_padding, FileHeader, ImageBlock, MklkFile, SpriteRecord, SpriteSection,
    SpriteSectionHeader,
};

trait WriteToWriter {
    fn write_to_writer(&self, writer: &mut ByteWriter);
}

impl WriteToWriter for FileHeader {
    fn write_to_writer(&self, writer: &mut ByteWriter) {
        let Self {
            riff,
            total_size,
            sprite_tag,
            sprite_tag2,
            sprite_size,
            sprite_data,
            list_tag,
            list_size,
            list_type_tag,
        } = self;

        writer.append_u8_slice(riff.as_bytes());
        writer.append_u32(*total_size);
        writer.append_u8_slice(sprite_tag.as_bytes());
        writer.append_u8_slice(sprite_tag2.as_bytes());
        writer.append_u32(*sprite_size);
        writer.append_u8_slice(sprite_data);
        writer.append_u8_slice(list_tag.as_bytes());
        writer.append_u32(*list_size);
        writer.append_u8_slice(list_type_tag.as_bytes());
    }
}

impl WriteToWriter for ImageBlock {
    fn write_to_writer(&self, writer: &mut ByteWriter) {
        let Self {
            block_tag,
            block_size,
            image_type,
            name,
            unknown_hash,
            unknown2,
            reserved,
            hash2,
            data_type,
            width,
            height,
            data_tag,
            data_size,
            raw_data,
            data: _,
        } = self;

        writer.append_u8_slice(block_tag.as_bytes());
        writer.append_u32(*block_size);
        writer.append_u8_slice(image_type.as_bytes());
        writer.append_u8_slice(name.as_bytes());
        writer.append_u32(*unknown_hash);
        writer.append_u32(*unknown2);
        writer.append_u8_slice(reserved);
        writer.append_u32(*hash2);
        writer.append_u8_slice(data_type.as_bytes());
        writer.append_u16(*width);
        writer.append_u16(*height);
        writer.append_u8_slice(data_tag.as_bytes());
        writer.append_u32(*data_size);
        writer.append_u8_slice(raw_data);
        writer.append_zeroes(block_padding(*block_size, *data_size));
    }
}

impl WriteToWriter for SpriteSectionHeader {
    fn write_to_writer(&self, writer: &mut ByteWriter) {
        let Self {
            unknown0,
            unknown1,
            sprite_count,
            padding0,
        } = self;

        writer.append_u32(*unknown0);
        writer.append_u32(*unknown1);
        writer.append_u32(*sprite_count);
        writer.append_u32(*padding0);
    }
}

impl WriteToWriter for SpriteRecord {
    fn write_to_writer(&self, writer: &mut ByteWriter) {
        let Self {
            index: _,
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
            data: _,
        } = self;

        [
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
        ]
        .into_iter()
        .for_each(|field| writer.append_u32(*field));
    }
}

impl FileHeader {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to_writer(&mut writer);
        writer.data
    }
}

impl ImageBlock {
    /// Block bytes including the padding declared by `block_size`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to_writer(&mut writer);
        writer.data
    }
}

impl SpriteSection {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with_gap(0)
    }

    /// Section bytes with `gap` zero bytes between the header and the records.
    pub fn to_bytes_with_gap(&self, gap: usize) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        self.header.write_to_writer(&mut writer);
        writer.append_zeroes(gap);
        self.sprites
            .iter()
            .for_each(|sprite| sprite.write_to_writer(&mut writer));

        writer.data
    }
}

impl MklkFile {
    /// Writes the header and blocks as they are. Size fields are not recomputed.
    pub fn write_to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        self.header.write_to_writer(&mut writer);
        self.sheets
            .iter()
            .for_each(|sheet| sheet.write_to_writer(&mut writer));

        writer.data
    }
}
