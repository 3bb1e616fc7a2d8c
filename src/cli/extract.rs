use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::modules::extract::{Extract as ExtractModule, ExtractOptions};

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct ExtractCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decodes a file and writes its sheets, sprites and metadata as files
    Extract {
        /// Path to the file
        path: PathBuf,
        /// Folder to put the output folder in. Defaults to the folder of the file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Config file to use instead of the one next to the binary
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Skips writing sheets
        #[arg(long)]
        no_sheets: bool,
        /// Skips writing sprites
        #[arg(long)]
        no_sprites: bool,
        /// Skips writing metadata.json
        #[arg(long)]
        no_metadata: bool,
        /// Forces full alpha on every sheet
        #[arg(long)]
        opaque: bool,
        /// Rejects files without RIFF and LIST tags
        #[arg(long)]
        strict: bool,
        /// Does everything on one thread
        #[arg(long)]
        sequential: bool,
        #[arg(short, long)]
        verbose: bool,
    },
}

pub struct Extract;

impl Cli for Extract {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn cli(&self) -> CliRes {
        let cli = ExtractCli::parse();

        let Commands::Extract {
            path,
            output,
            config,
            no_sheets,
            no_sprites,
            no_metadata,
            opaque,
            strict,
            sequential,
            verbose,
        } = cli.command;

        init_logger(verbose);

        let config = match load_config(config.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                println!("Error parsing config: {}", err);
                return CliRes::Err;
            }
        };

        let mut options = ExtractOptions::from(&config);

        // flags only ever turn things off or on against the config
        options.export_sheets &= !no_sheets;
        options.export_sprites &= !no_sprites;
        options.write_metadata &= !no_metadata;
        options.opaque |= opaque;
        options.strict_header |= strict;
        options.parallel &= !sequential;

        let mut extract = ExtractModule::new();

        extract.file(path).options(options);

        if let Some(output) = output.or(config.output_dir.map(PathBuf::from)) {
            extract.output_dir(output);
        }

        match extract.run() {
            Ok(report) => {
                info!("Done: `{}`", report.output_folder.display());
                CliRes::Ok
            }
            Err(err) => {
                println!("{}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        println!("extract <PATH> [-o <OUTPUT>] [-c <CONFIG>] [--no-sheets] [--no-sprites] [--no-metadata] [--opaque] [--strict] [--sequential] [-v]");
    }
}
