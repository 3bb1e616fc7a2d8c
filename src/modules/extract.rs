use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use mklk::{ImageBlock, MklkDecoder, MklkFile, SpriteRecord};
use rayon::prelude::*;

use crate::{
    config::Config,
    err,
    utils::{
        img_stuffs::save_png,
        metadata::Metadata,
        misc::{display_name, sheet_file_name, sprite_file_name},
    },
};

pub static METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub export_sheets: bool,
    pub export_sprites: bool,
    pub write_metadata: bool,
    pub opaque: bool,
    pub strict_header: bool,
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExtractOptions {
    fn from(config: &Config) -> Self {
        Self {
            export_sheets: config.export_sheets,
            export_sprites: config.export_sprites,
            write_metadata: config.write_metadata,
            opaque: config.opaque,
            strict_header: config.strict_header,
            parallel: config.parallel,
        }
    }
}

#[derive(Debug)]
pub struct ExtractReport {
    pub output_folder: PathBuf,
    pub sheets_written: usize,
    pub sprites_written: usize,
    pub metadata: Option<PathBuf>,
}

#[derive(Default)]
pub struct Extract {
    file: Option<PathBuf>,
    /// Parent of the per-file output folder. Defaults to the folder of the input file.
    output_dir: Option<PathBuf>,
    options: ExtractOptions,
}

impl Extract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&mut self, path: impl AsRef<Path> + Into<PathBuf>) -> &mut Self {
        self.file = Some(path.into());

        self
    }

    pub fn output_dir(&mut self, path: impl AsRef<Path> + Into<PathBuf>) -> &mut Self {
        self.output_dir = Some(path.into());

        self
    }

    pub fn options(&mut self, options: ExtractOptions) -> &mut Self {
        self.options = options;

        self
    }

    pub fn export_sprites(&mut self, v: bool) -> &mut Self {
        self.options.export_sprites = v;

        self
    }

    pub fn write_metadata(&mut self, v: bool) -> &mut Self {
        self.options.write_metadata = v;

        self
    }

    pub fn opaque(&mut self, v: bool) -> &mut Self {
        self.options.opaque = v;

        self
    }

    pub fn parallel(&mut self, v: bool) -> &mut Self {
        self.options.parallel = v;

        self
    }

    fn check_file(&self) -> eyre::Result<&Path> {
        let Some(path) = self.file.as_ref() else {
            return err!("input file is not set");
        };

        if !path.exists() {
            return err!("input file `{}` does not exist", path.display());
        }

        if !path.is_file() {
            return err!("input file `{}` is not a file", path.display());
        }

        Ok(path.as_path())
    }

    fn output_folder(&self, path: &Path) -> PathBuf {
        let parent = match &self.output_dir {
            Some(dir) => dir.to_path_buf(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        parent.join(display_name(path))
    }

    /// Reads and decodes the input file without writing anything.
    pub fn decode(&self) -> eyre::Result<MklkFile> {
        let path = self.check_file()?;
        let bytes = fs::read(path)?;

        let mut decoder = MklkDecoder::new();
        decoder
            .strict(self.options.strict_header)
            .parallel(self.options.parallel)
            .opaque(self.options.opaque);

        match decoder.decode(&bytes) {
            Ok(file) => Ok(file),
            Err(err) => err!("cannot decode `{}`: {}", path.display(), err),
        }
    }

    pub fn run(&self) -> eyre::Result<ExtractReport> {
        let path = self.check_file()?;
        let file = self.decode()?;
        let output_folder = self.output_folder(path);

        info!("Exporting `{}` to `{}`", path.display(), output_folder.display());

        fs::create_dir_all(output_folder.as_path())?;

        let report = export_file(&file, &display_name(path), &output_folder, &self.options)?;

        info!(
            "Wrote {} sheets and {} sprites to `{}`",
            report.sheets_written,
            report.sprites_written,
            report.output_folder.display()
        );

        Ok(report)
    }
}

fn write_sheet(output_folder: &Path, index: usize, sheet: &ImageBlock) -> eyre::Result<()> {
    // filtered before getting here
    let Some(img) = sheet.to_rgba8() else {
        return err!("sheet {index} is not decoded");
    };

    let path = output_folder.join(sheet_file_name(index, &sheet.name.get_string()));
    debug!("Writing sheet {index} to `{}`", path.display());

    save_png(&path, &img)
}

fn write_sprite(output_folder: &Path, sprite: &SpriteRecord) -> eyre::Result<()> {
    let Some(img) = sprite.to_rgba8() else {
        return err!("sprite {} is not extracted", sprite.index);
    };

    let path = output_folder.join(sprite_file_name(sprite.index));
    debug!("Writing sprite {} to `{}`", sprite.index, path.display());

    save_png(&path, &img)
}

fn run_all<T: Sync>(
    items: &[T],
    parallel: bool,
    f: impl Fn(&T) -> eyre::Result<()> + Sync + Send,
) -> eyre::Result<usize> {
    let res: eyre::Result<Vec<()>> = if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    };

    Ok(res?.len())
}

/// Writes the decoded content of `file` into `output_folder`.
///
/// Sheets that did not decode and sprites that were not extracted are skipped.
/// Zero area images are skipped as well since they cannot be encoded.
pub fn export_file(
    file: &MklkFile,
    name: &str,
    output_folder: &Path,
    options: &ExtractOptions,
) -> eyre::Result<ExtractReport> {
    let sheets_written = if options.export_sheets {
        let sheets: Vec<(usize, &ImageBlock)> = file
            .sheets
            .iter()
            .enumerate()
            .filter(|(_, sheet)| sheet.is_decoded() && sheet.width > 0 && sheet.height > 0)
            .collect();

        run_all(&sheets, options.parallel, |(index, sheet)| {
            write_sheet(output_folder, *index, sheet)
        })?
    } else {
        0
    };

    let sprites_written = if options.export_sprites {
        let sprites: Vec<&SpriteRecord> = file
            .sprites()
            .iter()
            .filter(|sprite| sprite.data.is_some() && sprite.width > 0 && sprite.height > 0)
            .collect();

        run_all(&sprites, options.parallel, |sprite| {
            write_sprite(output_folder, sprite)
        })?
    } else {
        0
    };

    let metadata = if options.write_metadata {
        fs::create_dir_all(output_folder)?;

        let path = output_folder.join(METADATA_FILE_NAME);

        Metadata::new(name, file, options.export_sheets, options.export_sprites)
            .write_to_file(&path)?;

        Some(path)
    } else {
        None
    };

    Ok(ExtractReport {
        output_folder: output_folder.to_path_buf(),
        sheets_written,
        sprites_written,
        metadata,
    })
}
