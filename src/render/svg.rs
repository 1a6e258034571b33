//! Post-processing of Graphviz SVG for hover highlighting.
//!
//! Graphviz writes a comment naming each node (`<!-- path -->`) and edge
//! (`<!-- src&#45;&gt;dst -->`) right before its `<g>` element. Each group is
//! tagged with a class derived from its source file so a style sheet can
//! widen a file's outgoing edges while the file is hovered.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

const EDGE_ARROW: &str = "&#45;&gt;";
const CLASS_PREFIX: &str = "src-";
const HOVER_STROKE_WIDTH: u32 = 5;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<!-- (.+) -->$").unwrap());
static GROUP_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="(edge|node)">"#).unwrap());

#[derive(Debug)]
pub struct HoverSvg {
    pub svg: String,
    /// Classes added to the document, one per source file.
    pub sources: BTreeSet<String>,
}

pub fn add_hover_classes(svg: &str) -> HoverSvg {
    let mut lines: Vec<String> = svg.lines().map(str::to_string).collect();
    let mut sources = BTreeSet::new();

    for i in 1..lines.len() {
        let Some(name) = COMMENT.captures(&lines[i - 1]).map(|caps| caps[1].to_string()) else {
            continue;
        };
        if !GROUP_CLASS.is_match(&lines[i]) {
            continue;
        }

        let source = name.split(EDGE_ARROW).next().unwrap_or(&name);
        let class = source_class(source);
        let replacement = format!(r#"class="$1 {}">"#, class);
        lines[i] = GROUP_CLASS
            .replace(&lines[i], replacement.as_str())
            .into_owned();
        sources.insert(class);
    }

    let mut svg_out = lines.join("\n");
    if svg.ends_with('\n') {
        svg_out.push('\n');
    }

    HoverSvg {
        svg: svg_out,
        sources,
    }
}

/// CSS class for a file name as it appears in an SVG comment.
fn source_class(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}{}", CLASS_PREFIX, sanitized)
}

pub fn hover_stylesheet(sources: &BTreeSet<String>) -> String {
    let mut css = format!("g.edge:hover * {{stroke-width: {};}}\n", HOVER_STROKE_WIDTH);
    for class in sources {
        css.push_str(&format!(
            ".node.{class}:hover ~ .{class} {{stroke-width: {width};}}\n",
            class = class,
            width = HOVER_STROKE_WIDTH
        ));
    }
    css
}

/// Appends the style sheet as the last child of the `<svg>` element.
pub fn embed_stylesheet(svg: &str, css: &str) -> String {
    let style = format!("<style>\n{}</style>\n", css);
    match svg.rfind("</svg>") {
        Some(end) => format!("{}{}{}", &svg[..end], style, &svg[end..]),
        None => format!("{}{}", svg, style),
    }
}

/// Drops the XML declaration, DOCTYPE and generator comments so the SVG can
/// be inlined in HTML.
pub fn strip_prolog(svg: &str) -> &str {
    svg.find("<svg").map_or(svg, |start| &svg[start..])
}
