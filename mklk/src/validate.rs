//! Checks on the file header tags, run before the block stream is parsed.
use crate::{
    error::{MklkError, Result},
    FileHeader, Tag,
};

pub const RIFF_TAG: [u8; 4] = *b"RIFF";
pub const LIST_TAG: [u8; 4] = *b"LIST";

pub trait HeaderCheck {
    fn check(&self, header: &FileHeader) -> Result<()>;
}

/// Accepts any header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lenient;

impl HeaderCheck for Lenient {
    fn check(&self, _header: &FileHeader) -> Result<()> {
        Ok(())
    }
}

/// Rejects files whose RIFF framing tags are wrong.
///
/// The sprite section tags and the list type are not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

fn expect_tag(field: &'static str, have: &Tag<4>, expect: &[u8; 4]) -> Result<()> {
    if have == expect {
        return Ok(());
    }

    Err(MklkError::UnexpectedTag {
        field,
        expect: Tag(*expect).get_string(),
        have: have.get_string(),
    })
}

impl HeaderCheck for Strict {
    fn check(&self, header: &FileHeader) -> Result<()> {
        expect_tag("container", &header.riff, &RIFF_TAG)?;
        expect_tag("list", &header.list_tag, &LIST_TAG)?;

        Ok(())
    }
}
