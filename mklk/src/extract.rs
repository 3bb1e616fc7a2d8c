use std::ops::Range;

use log::warn;

use crate::{
    error::{MklkError, Result},
    ImageBlock, SpriteRecord,
};

/// Copies the sprite rectangle out of its sheet as RGBA8.
///
/// The sheet is read as rows of `sheet.width` pixels starting at
/// `sheet.width * ypos + xpos`. Rows are not clipped at the right edge of the
/// sheet, only at the end of its pixel buffer.
pub fn extract_sprite(sprite: &SpriteRecord, sheets: &[ImageBlock]) -> Result<Vec<u8>> {
    let dangling = || MklkError::DanglingReference {
        sprite: sprite.index,
        sheet_index: sprite.sheet_index,
        sheet_count: sheets.len(),
    };

    let sheet = sheets
        .get(sprite.sheet_index as usize)
        .ok_or_else(dangling)?;
    let pixels = sheet.data.as_deref().ok_or_else(dangling)?;

    let overrun = |needed: usize| MklkError::ExtractionOverrun {
        sprite: sprite.index,
        needed,
        available: pixels.len(),
    };

    let sheet_width = sheet.width as usize;
    let height = sprite.height as usize;

    let row_len = (sprite.width as usize)
        .checked_mul(4)
        .ok_or_else(|| overrun(usize::MAX))?;

    if row_len == 0 || height == 0 {
        return Ok(vec![]);
    }

    let start_pixel = sheet_width
        .checked_mul(sprite.ypos as usize)
        .and_then(|offset| offset.checked_add(sprite.xpos as usize))
        .ok_or_else(|| overrun(usize::MAX))?;

    // in bytes
    let row_range = |row: usize| -> Option<Range<usize>> {
        let start = row
            .checked_mul(sheet_width)?
            .checked_add(start_pixel)?
            .checked_mul(4)?;

        Some(start..start.checked_add(row_len)?)
    };

    // rows only move forward, the last one is the furthest read
    if let Some(last_row) = height.checked_sub(1) {
        match row_range(last_row) {
            Some(range) if range.end <= pixels.len() => (),
            Some(range) => return Err(overrun(range.end)),
            None => return Err(overrun(usize::MAX)),
        }
    }

    let mut res = Vec::with_capacity(row_len * height);

    for row in 0..height {
        let line = row_range(row)
            .and_then(|range| pixels.get(range))
            .ok_or_else(|| overrun(usize::MAX))?;

        res.extend_from_slice(line);
    }

    Ok(res)
}

/// Extracts every sprite. Sprites that fail keep their fields but get no pixels.
///
/// Returns how many sprites got pixels.
pub fn extract_sprites(sprites: &mut [SpriteRecord], sheets: &[ImageBlock]) -> usize {
    sprites
        .iter_mut()
        .map(|sprite| {
            sprite.data = match extract_sprite(sprite, sheets) {
                Ok(data) => Some(data),
                Err(err) => {
                    warn!("Exception while extracting sprite {}: {err}", sprite.index);
                    None
                }
            };

            sprite.data.is_some()
        })
        .filter(|extracted| *extracted)
        .count()
}
