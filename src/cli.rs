use std::path::PathBuf;

use clap::Parser;

use crate::{graph::style::RankDir, output::OutputFormat};

pub const ABOUT: &str = "Render Snakemake's detailed summary as a DAG with files as nodes.";

pub const AFTER_HELP: &str = "\
Examples:
  snakemake --detailed-summary -c1 | filedag > dag.html
  snakemake --detailed-summary -c1 | filedag --format svg --rankdir tb > dag.svg";

#[derive(Parser, Debug)]
#[command(author, version, about = ABOUT, long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// Configuration file [default: filedag.toml if present]
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// What to write to standard output
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Direction of the layout
    #[arg(long = "rankdir", value_enum, ignore_case = true)]
    pub rankdir: Option<RankDir>,

    /// Page title of the HTML output
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Graphviz program used for layout
    #[arg(long = "dot-binary")]
    pub dot_binary: Option<PathBuf>,

    /// Give up on the renderer after this long (e.g., "30s", "2m"; "0" disables)
    #[arg(short = 't', long = "timeout")]
    pub timeout: Option<String>,

    /// Enable verbose logging on standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
