use log::{info, warn};

use crate::{
    error::{MklkError, Result},
    ImageBlock, Tag,
};

pub const LZ4_DATA_TYPE: [u8; 4] = *b"lz4 ";

/// How a block payload is stored, from its data type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Raw lz4 block holding RGBA8 pixels.
    Lz4,
    Unsupported(Tag<4>),
}

impl DataType {
    pub fn from_tag(tag: &Tag<4>) -> Self {
        if *tag == LZ4_DATA_TYPE {
            Self::Lz4
        } else {
            Self::Unsupported(*tag)
        }
    }

    /// Decodes `raw` into exactly `expected_size` bytes of RGBA8.
    pub fn decode(&self, raw: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        match self {
            Self::Lz4 => decompress_lz4(raw, expected_size),
            Self::Unsupported(tag) => Err(MklkError::UnsupportedCodec {
                data_type: tag.get_string(),
            }),
        }
    }
}

/// Payloads carry no size prefix, the size comes from the block dimensions.
pub fn decompress_lz4(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let res = lz4_flex::block::decompress(compressed, expected_size)
        .map_err(|source| MklkError::DecodeFailure { source })?;

    if res.len() != expected_size {
        return Err(MklkError::DecodedSizeMismatch {
            expect: expected_size,
            have: res.len(),
        });
    }

    Ok(res)
}

impl ImageBlock {
    pub fn data_type(&self) -> DataType {
        DataType::from_tag(&self.data_type)
    }

    pub fn decode_pixels(&self) -> Result<Vec<u8>> {
        self.data_type().decode(&self.raw_data, self.pixel_len())
    }

    /// Decodes the payload into `data`.
    ///
    /// Failures are logged and leave `data` empty. Returns whether pixels are present.
    pub fn decode(&mut self) -> bool {
        self.data = match self.decode_pixels() {
            Ok(pixels) => Some(pixels),
            Err(err @ MklkError::UnsupportedCodec { .. }) => {
                info!("Sheet {:?}: {err}", self.name.get_string());
                None
            }
            Err(err) => {
                warn!(
                    "Sheet {:?} ({}x{}): {err}",
                    self.name.get_string(),
                    self.width,
                    self.height
                );
                None
            }
        };

        self.data.is_some()
    }
}
