use clap::{CommandFactory, Parser};
use std::io::{self, IsTerminal};
use std::process;

use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod graph;
mod output;
mod render;
mod summary;
mod util;

use cli::Cli;
use config::load_settings;
use error::Result;
use graph::FileGraph;
use render::{Graphviz, render_document};
use summary::parse_detailed_summary;
use util::{read_stdin, write_stdout};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    if let Err(e) = run_filedag(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

async fn run_filedag(args: Cli) -> Result<()> {
    if io::stdin().is_terminal() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let settings = load_settings(&args)?;

    let text = read_stdin()?;
    let records = parse_detailed_summary(&text)?;
    debug!(records = records.len(), "parsed detailed summary");

    let graph = FileGraph::from_records(&records);

    let backend = Graphviz::new(settings.dot_program, settings.timeout);
    let document = render_document(&backend, &graph, &settings.render).await?;

    write_stdout(&document)
}
