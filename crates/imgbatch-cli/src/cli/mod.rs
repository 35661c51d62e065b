//! CLI for imgbatch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgbatch_core::config;
use imgbatch_core::report::ReportFormat;
use imgbatch_core::{Job, Quality};
use std::path::PathBuf;

use commands::{
    run_batch_file, run_completions, run_generate, run_man, run_presets, run_size,
};

/// Top-level CLI for imgbatch.
#[derive(Debug, Parser)]
#[command(name = "imgbatch")]
#[command(about = "imgbatch: batch image generation with the Z.AI glm-image model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run every job in a JSON batch file and print a report.
    Run {
        /// Path to the batch file ({"jobs": [...], "output_directory"?, "concurrency"?}).
        config: PathBuf,
        /// Report format: text or json.
        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: ReportFormat,
        /// Write images here instead of the batch file's or configured directory.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Jobs per window (overrides the batch file).
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        concurrency: Option<i64>,
    },

    /// Generate a single image.
    Generate {
        /// Text prompt describing the image.
        prompt: String,
        /// hd (default) or standard.
        #[arg(long)]
        quality: Option<Quality>,
        /// Aspect-ratio preset, e.g. 16:9.
        #[arg(long, value_name = "PRESET")]
        size_preset: Option<String>,
        /// Custom WIDTHxHEIGHT; wins over --size-preset.
        #[arg(long, value_name = "WxH")]
        custom_size: Option<String>,
        /// Output filename (sanitized; .png appended if missing).
        #[arg(long, value_name = "NAME")]
        output_filename: Option<String>,
        /// Output directory.
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Resolve and validate a size without calling the service.
    Size {
        /// Aspect-ratio preset, e.g. 3:2.
        #[arg(long)]
        preset: Option<String>,
        /// Custom WIDTHxHEIGHT.
        #[arg(long, value_name = "WxH")]
        custom: Option<String>,
    },

    /// List size presets.
    Presets,

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print a man page.
    Man,
}

impl Cli {
    /// Parses arguments, runs the command and returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                config: path,
                format,
                output_dir,
                concurrency,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_batch_file(&cfg, &path, format, output_dir.as_deref(), concurrency).await
            }
            CliCommand::Generate {
                prompt,
                quality,
                size_preset,
                custom_size,
                output_filename,
                output_dir,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let job = Job {
                    prompt,
                    quality,
                    size_preset,
                    custom_size,
                    output_filename,
                };
                run_generate(&cfg, job, output_dir.as_deref()).await
            }
            CliCommand::Size { preset, custom } => run_size(preset.as_deref(), custom.as_deref()),
            CliCommand::Presets => run_presets(),
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}

#[cfg(test)]
mod tests;
