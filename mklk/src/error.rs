#[derive(Debug, thiserror::Error)]
pub enum MklkError {
    #[error("Read out of bounds at offset {offset} ({remaining} bytes remaining)")]
    OutOfBounds { offset: usize, remaining: usize },
    #[error("Unsupported data type: {data_type:?}")]
    UnsupportedCodec { data_type: String },
    #[error("Failed to decompress lz4 payload: {source}")]
    DecodeFailure {
        #[source]
        source: lz4_flex::block::DecompressError,
    },
    #[error("Decoded size mismatch. Expect ({expect}). Have ({have})")]
    DecodedSizeMismatch { expect: usize, have: usize },
    #[error("Sprite {sprite} references sheet {sheet_index} which has no pixel data ({sheet_count} sheets)")]
    DanglingReference {
        sprite: usize,
        sheet_index: u32,
        sheet_count: usize,
    },
    #[error("Sprite {sprite} reads past its sheet ({needed} bytes needed, {available} available)")]
    ExtractionOverrun {
        sprite: usize,
        needed: usize,
        available: usize,
    },
    #[error("Unexpected {field} tag. Expect ({expect:?}). Have ({have:?})")]
    UnexpectedTag {
        field: &'static str,
        expect: String,
        have: String,
    },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MklkError>;
