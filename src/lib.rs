pub mod cli;
pub mod error;
pub mod file_collect;
pub mod fs_atomic;
pub mod model;
pub mod path_norm;
pub mod rename;
pub mod settings;
pub mod timestamp;

use crate::cli::Cli;
use crate::error::AppError;
use crate::file_collect::collect_candidates;
use crate::model::{AppSettings, RunSummary};
use crate::timestamp::ExifReader;
use anyhow::Context;
use clap::Parser;
use log::{error, info, LevelFilter};
use std::process::ExitCode;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(summary) if summary.failed > 0 => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{:#}", error);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn execute(cli: Cli) -> anyhow::Result<RunSummary> {
    let settings = match cli.settings.as_deref() {
        Some(path) => settings::load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::default(),
    };
    let invocation = cli.into_invocation(settings);

    let collected = collect_candidates(&invocation.inputs, &invocation.extensions)
        .map_err(AppError::InvalidRequest)?;
    if collected.files.is_empty() {
        return Err(AppError::InvalidRequest("no files to rename".to_string()).into());
    }
    if collected.skipped_by_extension > 0 {
        info!(
            "{} files skipped because of their extension",
            collected.skipped_by_extension
        );
    }

    let summary = rename::process_all(
        &collected.files,
        &invocation.options,
        &ExifReader,
        |line| println!("{}", line),
    );
    Ok(summary)
}
