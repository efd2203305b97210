//! CLI for the cause list fetcher.

mod commands;

use anyhow::Result;
use causelist_core::config;
use causelist_core::selection::CaseType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_fetch, run_merge, run_show};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "causelist")]
#[command(about = "Fetch court cause list PDFs and keep a per-date manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Inputs of the portal form plus the PDF link it produced.
#[derive(Debug, Args)]
pub struct FetchArgs {
    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub district: String,

    #[arg(long)]
    pub court_complex: String,

    /// Date as entered on the portal (e.g. 16-10-2025); names the manifest.
    #[arg(long)]
    pub date: String,

    /// civil or criminal.
    #[arg(long, default_value = "civil")]
    pub case_type: CaseType,

    /// Link behind "View PDF" on the portal.
    #[arg(long)]
    pub url: String,

    /// Court name as shown in the court selector.
    #[arg(long)]
    pub court: String,

    /// Presiding judge; recorded as "Unknown" when omitted.
    #[arg(long)]
    pub judge: Option<String>,

    /// Overrides `output_root` from the config file.
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a located cause list PDF and record it in the manifest.
    Fetch(FetchArgs),

    /// Print the manifest for a date and the PDFs it lists.
    Show {
        /// Manifest date, as given to `fetch`.
        date: String,

        /// Overrides `output_root` from the config file.
        #[arg(long, value_name = "DIR")]
        output_root: Option<PathBuf>,
    },

    /// Merge every PDF recorded for a date into `<date>_merged.pdf`.
    Merge {
        /// Manifest date, as given to `fetch`.
        date: String,

        /// Overrides `output_root` from the config file.
        #[arg(long, value_name = "DIR")]
        output_root: Option<PathBuf>,
    },

    /// Compute SHA-256 of a stored PDF.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(&cfg, &args)?,
            CliCommand::Show { date, output_root } => {
                let root = output_root.unwrap_or_else(|| cfg.output_root.clone());
                run_show(&root, &date)?;
            }
            CliCommand::Merge { date, output_root } => {
                let root = output_root.unwrap_or_else(|| cfg.output_root.clone());
                run_merge(&root, &date)?;
            }
            CliCommand::Checksum { path } => run_checksum(std::path::Path::new(&path))?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
