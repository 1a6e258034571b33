//! Turning a [`FileGraph`] into the emitted document.
//!
//! Layout is delegated to a [`RenderBackend`]; the backend is created by the
//! caller and passed in, so nothing here holds on to it between runs.

pub mod html;
pub mod svg;

use std::{
    fmt,
    path::PathBuf,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    graph::{FileGraph, GraphStyle, to_dot},
    output::OutputFormat,
    util::run_command_with_input,
};

pub const DEFAULT_DOT_PROGRAM: &str = "dot";

#[derive(Debug)]
pub enum RenderError {
    Spawn {
        program: String,
        source: std::io::Error,
    },
    Io(std::io::Error),
    Timeout,
    Failed {
        status: String,
        stderr: String,
    },
    InvalidOutput(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Spawn { program, source } => {
                write!(f, "could not run '{}': {} (is Graphviz installed?)", program, source)
            }
            RenderError::Io(e) => write!(f, "renderer IO error: {}", e),
            RenderError::Timeout => write!(f, "renderer timed out"),
            RenderError::Failed { status, stderr } => {
                write!(f, "renderer exited with {}", status)?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            RenderError::InvalidOutput(msg) => write!(f, "renderer produced invalid output: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Spawn { source, .. } => Some(source),
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Something that lays out a DOT graph and draws it as SVG.
pub trait RenderBackend {
    async fn render_svg(&self, dot: &str) -> Result<String, RenderError>;
}

/// The Graphviz `dot` program, run once per render.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Graphviz {
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl RenderBackend for Graphviz {
    async fn render_svg(&self, dot: &str) -> Result<String, RenderError> {
        debug!(program = %self.program.display(), timeout = ?self.timeout, "running renderer");

        let output = run_command_with_input(
            &self.program,
            ["-Tsvg"],
            dot.as_bytes().to_vec(),
            self.timeout,
        )
        .await?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let svg = String::from_utf8(output.stdout)
            .map_err(|e| RenderError::InvalidOutput(format!("not UTF-8: {}", e)))?;

        if !svg.contains("<svg") {
            return Err(RenderError::InvalidOutput("no <svg> element".to_string()));
        }

        Ok(svg)
    }
}

/// What the document should look like.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub style: GraphStyle,
    pub title: String,
}

/// Builds the complete document in memory; nothing is returned on failure.
pub async fn render_document<B: RenderBackend>(
    backend: &B,
    graph: &FileGraph,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    if graph.is_empty() {
        info!("summary has no data rows, rendering an empty graph");
    }

    let dot = to_dot(graph, &options.style);
    if options.format == OutputFormat::Dot {
        return Ok(dot);
    }

    let started = Instant::now();
    let raw_svg = backend.render_svg(&dot).await?;
    debug!(elapsed = ?started.elapsed(), bytes = raw_svg.len(), "renderer finished");

    let hover = svg::add_hover_classes(&raw_svg);
    let stylesheet = svg::hover_stylesheet(&hover.sources);

    Ok(match options.format {
        OutputFormat::Svg => svg::embed_stylesheet(&hover.svg, &stylesheet),
        _ => html::page(&options.title, &stylesheet, svg::strip_prolog(&hover.svg)),
    })
}
