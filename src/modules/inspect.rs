use std::{fmt::Write, fs, path::Path};

use mklk::{MklkDecoder, MklkFile};

use crate::{err, utils::misc::display_name};

/// Human readable summary of a decoded file.
pub fn inspect(file: &MklkFile, name: &str) -> String {
    let mut s = String::new();
    let header = &file.header;

    // writing into a String does not fail
    let _ = writeln!(s, "{name}");
    let _ = writeln!(
        s,
        "header: {} size {} | sprite tags {} {} size {} | {} size {} type {}",
        header.riff,
        header.total_size,
        header.sprite_tag,
        header.sprite_tag2,
        header.sprite_size,
        header.list_tag,
        header.list_size,
        header.list_type_tag,
    );

    let _ = writeln!(s, "sheets: {}", file.sheets.len());

    for (index, sheet) in file.sheets.iter().enumerate() {
        let status = if sheet.is_decoded() {
            "decoded"
        } else {
            "not decoded"
        };

        let _ = writeln!(
            s,
            "  {index:03} `{}` {}x{} {} {} bytes, {status}",
            sheet.name, sheet.width, sheet.height, sheet.data_type, sheet.data_size,
        );
    }

    match &file.sprite_section {
        Some(section) => {
            let extracted = section
                .sprites
                .iter()
                .filter(|sprite| sprite.data.is_some())
                .count();

            let _ = writeln!(
                s,
                "sprites: {} of {} declared, {extracted} extracted",
                section.sprites.len(),
                section.header.sprite_count,
            );

            for sprite in &section.sprites {
                let _ = writeln!(
                    s,
                    "  {:03} sheet {} at ({}, {}) {}x{}{}",
                    sprite.index,
                    sprite.sheet_index,
                    sprite.xpos,
                    sprite.ypos,
                    sprite.width,
                    sprite.height,
                    if sprite.data.is_some() {
                        ""
                    } else {
                        ", not extracted"
                    },
                );
            }
        }
        None => {
            let _ = writeln!(s, "sprites: no sprite section");
        }
    }

    s
}

pub fn inspect_file(path: &Path, strict: bool) -> eyre::Result<String> {
    let bytes = fs::read(path)?;

    let mut decoder = MklkDecoder::new();
    decoder.strict(strict);

    match decoder.decode(&bytes) {
        Ok(file) => Ok(inspect(&file, &display_name(path))),
        Err(err) => err!("cannot decode `{}`: {}", path.display(), err),
    }
}
