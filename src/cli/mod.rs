use std::path::Path;

use env_logger::Env;
use log::LevelFilter;

use crate::config::{parse_config, parse_config_from_file, Config};

use self::{extract::Extract, inspect::Inspect};

mod extract;
mod inspect;

pub enum CliRes {
    NoCli,
    Ok,
    Err,
}

pub trait Cli {
    fn name(&self) -> &'static str;
    /// `args[1]` is the name of the module.
    ///
    /// Each module has to handle the arguments by itself.
    fn cli(&self) -> CliRes;
    fn cli_help(&self);
}

// Add new modules here.
const MODULES: &[&dyn Cli] = &[&Inspect, &Extract];

pub fn help() {
    println!(
        "\
mklk-rip

Available modules:"
    );

    for module in MODULES {
        print!("  ");
        module.cli_help();
    }
}

/// Runs command-line options
pub fn cli() -> CliRes {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return CliRes::NoCli;
    }

    for module in MODULES {
        if args[1] == module.name() {
            return module.cli();
        }
    }

    // In case nothing fits then prints this again.
    help();

    CliRes::Err
}

/// `RUST_LOG` still wins over `verbose`.
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // only fails when a logger is already set
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .try_init();
}

fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    match path {
        Some(path) => parse_config_from_file(path),
        None => parse_config(),
    }
}
