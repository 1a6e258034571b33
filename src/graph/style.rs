use std::collections::{BTreeSet, HashMap};

use clap::ValueEnum;
use serde::Deserialize;

use super::FileGraph;

pub const DEFAULT_FONT: &str = "mono";
pub const UNCONSUMED_COLOR: &str = "grey";

const SATURATION: &str = "1.000";
const VALUE: &str = "0.900";

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDir {
    /// Top to bottom.
    #[serde(alias = "tb")]
    Tb,
    /// Left to right.
    #[default]
    #[serde(alias = "lr")]
    Lr,
    /// Bottom to top.
    #[serde(alias = "bt")]
    Bt,
    /// Right to left.
    #[serde(alias = "rl")]
    Rl,
}

impl RankDir {
    pub fn as_dot(self) -> &'static str {
        match self {
            RankDir::Tb => "TB",
            RankDir::Lr => "LR",
            RankDir::Bt => "BT",
            RankDir::Rl => "RL",
        }
    }
}

/// Graph-wide layout attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub rankdir: RankDir,
    pub ranksep: f64,
    pub nodesep: f64,
    pub font: String,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            rankdir: RankDir::default(),
            ranksep: 2.0,
            nodesep: 0.5,
            font: DEFAULT_FONT.to_string(),
        }
    }
}

/// Per-file colors and border styles.
#[derive(Debug, Default)]
pub struct Palette {
    source_colors: HashMap<String, String>,
    dir_styles: HashMap<String, String>,
}

impl Palette {
    /// One rainbow color per consumed file, one border style per top-level
    /// directory.
    pub fn for_graph(graph: &FileGraph) -> Self {
        let sources = graph.source_paths();
        let colors = rainbow(sources.len());
        let source_colors = sources
            .iter()
            .zip(colors.into_iter().rev())
            .map(|(path, color)| (path.to_string(), color))
            .collect();

        let dirs: BTreeSet<&str> = graph.nodes().iter().map(|n| n.top_level_dir()).collect();
        let styles = border_styles(dirs.len());
        let dir_styles = dirs
            .into_iter()
            .zip(styles)
            .map(|(dir, style)| (dir.to_string(), style))
            .collect();

        Self {
            source_colors,
            dir_styles,
        }
    }

    pub fn color(&self, path: &str) -> &str {
        self.source_colors
            .get(path)
            .map(String::as_str)
            .unwrap_or(UNCONSUMED_COLOR)
    }

    pub fn border_style(&self, dir: &str) -> &str {
        self.dir_styles
            .get(dir)
            .map(String::as_str)
            .unwrap_or(BORDER_STYLES[0])
    }
}

/// Every combination of an optional `bold`, a line style and a corner style.
const BORDER_STYLES: [&str; 8] = [
    "solid,rounded",
    "solid,diagonals",
    "dashed,rounded",
    "dashed,diagonals",
    "bold,solid,rounded",
    "bold,solid,diagonals",
    "bold,dashed,rounded",
    "bold,dashed,diagonals",
];

/// `n` border styles, recycled once the combinations run out.
pub fn border_styles(n: usize) -> Vec<String> {
    BORDER_STYLES
        .iter()
        .cycle()
        .take(n)
        .map(|style| style.to_string())
        .collect()
}

/// `n` evenly spaced HSV hues at fixed saturation and value.
pub fn rainbow(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }

    let step = 1.0 / n as f64;
    (0..n)
        .map(|i| format!("{:.3} {} {}", i as f64 * step, SATURATION, VALUE))
        .collect()
}
