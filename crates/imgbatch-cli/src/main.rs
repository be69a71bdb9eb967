mod commands;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, CropArgs, RenameArgs, ToPngArgs};
use dotenv::dotenv;
use imgbatch_core::{convert, crop, rename};
use imgbatch_core::{AppConfig, Codecs, ConvertOptions, CropOptions, RenameOptions};
use progress::{CliReporter, ReportStyle};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match imgbatch_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::ToPng(args)) => run_to_png(&config, args),
        Some(Commands::Crop(args)) => run_crop(&config, args),
        Some(Commands::Rename(args)) => run_rename(&config, args),
        Some(Commands::PrintConfig) => print_config(&config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_to_png(config: &AppConfig, args: ToPngArgs) -> anyhow::Result<()> {
    let codecs = Codecs::detect();
    convert::warn_missing_codecs(codecs);

    let options = ConvertOptions {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        output_dir_name: config.convert.output_dir_name.clone(),
        recursive: args.recursive,
        overwrite: args.overwrite,
        include_png: args.include_png,
    };

    let reporter = CliReporter::new(ReportStyle::Convert);
    let summary = convert::run(&options, codecs, &reporter)?;

    println!();
    info!(
        "Done. Scanned {} files, converted {} PNG(s) in {}",
        format!("{}", summary.scanned).cyan(),
        format!("{}", summary.converted).green(),
        format!("{:.2}s", summary.duration.as_secs_f64()).green(),
    );
    if !summary.failures.is_empty() {
        info!("{} file(s) failed", format!("{}", summary.failures.len()).red());
    }
    info!("Output dir: {}", summary.output_dir.display());

    Ok(())
}

fn run_crop(config: &AppConfig, args: CropArgs) -> anyhow::Result<()> {
    let mut options = CropOptions::from_settings(&config.crop);
    if let Some(target_dir) = args.target_dir {
        options.target_dir = target_dir;
    }
    if let Some(size) = args.size {
        options.size = size;
    }
    if let Some(quality) = args.quality {
        options.quality = quality;
    }

    let reporter = CliReporter::new(ReportStyle::Crop);
    let summary = crop::run(&options, &reporter)?;

    info!(
        "Finished processing {} images ({} failed).",
        format!("{}", summary.processed).green(),
        format!("{}", summary.failures.len()).red(),
    );

    Ok(())
}

fn run_rename(config: &AppConfig, args: RenameArgs) -> anyhow::Result<()> {
    let options = RenameOptions {
        dir: args.dir,
        recursive: args.recursive,
        start: args.start.unwrap_or(config.rename.start),
        sort_by: args.by.into(),
    };

    let reporter = CliReporter::new(ReportStyle::Rename);
    let summary = rename::run(&options, &reporter)?;

    if summary.renamed.is_empty() {
        println!("No files found.");
    } else {
        println!();
        info!(
            "Done. Renamed {} files.",
            format!("{}", summary.renamed.len()).green()
        );
    }

    Ok(())
}

fn print_config(config: &AppConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("rendering configuration")?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    println!("# effective configuration (working directory: {})", cwd.display());
    println!("{}", rendered);
    Ok(())
}
