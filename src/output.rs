use clap::ValueEnum;
use serde::Deserialize;

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML page with the SVG inlined and hover highlighting.
    #[default]
    Html,
    /// Standalone SVG with the hover style sheet embedded.
    Svg,
    /// The DOT source handed to Graphviz; Graphviz is not run.
    Dot,
}
