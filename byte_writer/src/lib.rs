//! Little-endian byte builder used to serialise archive structures.

pub struct ByteWriter {
    pub data: Vec<u8>,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
    }

    /// Appends `count` zero bytes.
    pub fn append_zeroes(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, 0);
    }
}

#[cfg(test)]
mod test {
    use super::ByteWriter;

    #[test]
    fn little_endian() {
        let mut writer = ByteWriter::new();

        writer.append_u16(0x0102);
        writer.append_u32(0x0304_0506);

        assert_eq!(writer.data, [0x02, 0x01, 0x06, 0x05, 0x04, 0x03]);
    }

    #[test]
    fn tags_and_padding() {
        let mut writer = ByteWriter::new();

        writer.append_u8_slice(b"lz4 ");
        writer.append_zeroes(3);
        writer.append_zeroes(0);

        assert_eq!(&writer.data, b"lz4 \0\0\0");
    }
}
