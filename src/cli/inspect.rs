use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::modules::inspect::inspect_file;

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct InspectCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints what is inside a file
    Inspect {
        /// Path to the file
        path: PathBuf,
        /// Config file to use instead of the one next to the binary
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Rejects files without RIFF and LIST tags
        #[arg(long)]
        strict: bool,
        #[arg(short, long)]
        verbose: bool,
    },
}

/// `strict` turns strict header checks on even when the config leaves them off.
fn inspect_with_config(path: &Path, config: Option<&Path>, strict: bool) -> eyre::Result<String> {
    let config = load_config(config)?;

    inspect_file(path, config.strict_header || strict)
}

pub struct Inspect;

impl Cli for Inspect {
    fn name(&self) -> &'static str {
        "inspect"
    }

    fn cli(&self) -> CliRes {
        let cli = InspectCli::parse();

        let Commands::Inspect {
            path,
            config,
            strict,
            verbose,
        } = cli.command;

        init_logger(verbose);

        match inspect_with_config(&path, config.as_deref(), strict) {
            Ok(summary) => {
                print!("{summary}");
                CliRes::Ok
            }
            Err(err) => {
                println!("{}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        println!("inspect <PATH> [-c <CONFIG>] [--strict] [-v]");
    }
}
