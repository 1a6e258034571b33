use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    cli::Cli,
    error::{FileDagError, Result},
    graph::{GraphStyle, dot::GRAPH_NAME, style::RankDir},
    output::OutputFormat,
    render::{DEFAULT_DOT_PROGRAM, RenderOptions},
    util::parse_timeout,
};

pub const DEFAULT_CONFIG_FILE: &str = "filedag.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Config {
    #[serde(default)]
    style: StyleSection,
    #[serde(default)]
    render: RenderSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleSection {
    rankdir: Option<RankDir>,
    ranksep: Option<f64>,
    nodesep: Option<f64>,
    font: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    dot: Option<PathBuf>,
    timeout: Option<String>,
    format: Option<OutputFormat>,
}

/// Everything a run needs, after command line flags override the file.
#[derive(Debug)]
pub struct Settings {
    pub render: RenderOptions,
    pub dot_program: PathBuf,
    pub timeout: Option<Duration>,
}

pub fn load_settings(args: &Cli) -> Result<Settings> {
    let config = match &args.config {
        Some(path) => load_and_parse_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            load_and_parse_config(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };
    resolve(args, config)
}

fn load_and_parse_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path).map_err(|e| {
        FileDagError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

fn resolve(args: &Cli, config: Config) -> Result<Settings> {
    let defaults = GraphStyle::default();
    let style = GraphStyle {
        rankdir: args.rankdir.or(config.style.rankdir).unwrap_or(defaults.rankdir),
        ranksep: non_negative("ranksep", config.style.ranksep)?.unwrap_or(defaults.ranksep),
        nodesep: non_negative("nodesep", config.style.nodesep)?.unwrap_or(defaults.nodesep),
        font: config.style.font.unwrap_or(defaults.font),
    };

    let title = args
        .title
        .clone()
        .or(config.style.title)
        .unwrap_or_else(|| GRAPH_NAME.to_string());

    let format = args.format.or(config.render.format).unwrap_or_default();

    let dot_program = args
        .dot_binary
        .clone()
        .or(config.render.dot)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOT_PROGRAM));

    let timeout = parse_timeout(args.timeout.as_deref().or(config.render.timeout.as_deref()))?;

    Ok(Settings {
        render: RenderOptions {
            format,
            style,
            title,
        },
        dot_program,
        timeout,
    })
}

fn non_negative(name: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => Err(FileDagError::Config(format!(
            "{} must be a non-negative number, got {}",
            name, v
        ))),
        _ => Ok(value),
    }
}
