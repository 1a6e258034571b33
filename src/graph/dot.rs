use std::fmt::Write;

use super::{FileGraph, FileNode, GraphStyle, style::Palette};

pub const GRAPH_NAME: &str = "fileDAG";

/// Writes the graph in the DOT language. Node IDs are the file paths.
pub fn to_dot(graph: &FileGraph, style: &GraphStyle) -> String {
    let palette = Palette::for_graph(graph);
    let mut dot = String::new();

    let _ = writeln!(dot, "digraph {} {{", GRAPH_NAME);
    let _ = writeln!(
        dot,
        "  graph [start=3, rankdir={}, ranksep={}, nodesep={}];",
        style.rankdir.as_dot(),
        style.ranksep,
        style.nodesep
    );
    let _ = writeln!(
        dot,
        "  node [shape=box, fontname={}, fontsize=10, penwidth=2, fillcolor=white, fontcolor=black];",
        quote(&style.font)
    );
    let _ = writeln!(dot, "  edge [arrowhead=normal, penwidth=1];");

    for node in graph.nodes() {
        let dir = node.top_level_dir();
        let _ = writeln!(
            dot,
            "  {} [label={}, group={}, style={}, color={}, tooltip={}];",
            quote(&node.path),
            quote(&node.path),
            quote(dir),
            quote(palette.border_style(dir)),
            quote(palette.color(&node.path)),
            quote(&tooltip(node)),
        );
    }

    for (input, output, rule) in graph.edges() {
        let _ = writeln!(
            dot,
            "  {} -> {} [color={}, tooltip={}];",
            quote(input),
            quote(output),
            quote(palette.color(input)),
            quote(&format!("{} -> {} ({})", input, output, rule)),
        );
    }

    dot.push_str("}\n");
    dot
}

/// Hover text: the path followed by whatever the summary said about it.
fn tooltip(node: &FileNode) -> String {
    let mut lines = vec![node.path.clone()];
    let fields = [
        ("rule", &node.rule),
        ("modified", &node.date),
        ("status", &node.status),
        ("plan", &node.plan),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{}: {}", name, value));
        }
    }
    if node.rule.is_none() {
        lines.push("source file".to_string());
    }
    lines.join("\n")
}

/// Quotes a DOT ID. Newlines become the `\n` escape Graphviz centers on.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::style::RankDir, summary::Record};

    fn two_hop() -> FileGraph {
        let mut produced = Record::new("results/a.txt", "ruleA", &["data/raw.csv"]);
        produced.status = Some("ok".to_string());
        FileGraph::from_records(&[
            produced,
            Record::new("results/b.txt", "ruleB", &["results/a.txt"]),
        ])
    }

    #[test]
    fn emits_one_statement_per_node_and_edge() {
        let dot = to_dot(&two_hop(), &GraphStyle::default());

        assert!(dot.starts_with("digraph fileDAG {"));
        assert!(dot.trim_end().ends_with('}'));
        assert_eq!(dot.matches(" -> \"").count(), 2);
        assert!(dot.contains("\"data/raw.csv\" -> \"results/a.txt\""));
        assert!(dot.contains("\"results/a.txt\" -> \"results/b.txt\""));
        assert!(dot.contains("  \"results/b.txt\" [label=\"results/b.txt\""));
    }

    #[test]
    fn applies_graph_style() {
        let style = GraphStyle {
            rankdir: RankDir::Tb,
            ranksep: 1.5,
            nodesep: 0.25,
            font: "Fira Code".to_string(),
        };

        let dot = to_dot(&two_hop(), &style);

        assert!(dot.contains("rankdir=TB, ranksep=1.5, nodesep=0.25"));
        assert!(dot.contains("fontname=\"Fira Code\""));
    }

    #[test]
    fn tooltip_lists_rule_and_status() {
        let dot = to_dot(&two_hop(), &GraphStyle::default());

        assert!(dot.contains("tooltip=\"results/a.txt\\nrule: ruleA\\nstatus: ok\""));
        assert!(dot.contains("tooltip=\"data/raw.csv\\nsource file\""));
    }

    #[test]
    fn tooltip_shows_modification_date_and_plan() {
        let mut produced = Record::new("results/a.txt", "ruleA", &["data/raw.csv"]);
        produced.date = Some("Thu Jan  1 00:00:00 2025".to_string());
        produced.status = Some("ok".to_string());
        produced.plan = Some("no update".to_string());

        let dot = to_dot(&FileGraph::from_records(&[produced]), &GraphStyle::default());

        assert!(dot.contains(
            "tooltip=\"results/a.txt\\nrule: ruleA\\nmodified: Thu Jan  1 00:00:00 2025\\nstatus: ok\\nplan: no update\""
        ));
    }

    #[test]
    fn edges_take_the_color_of_their_input() {
        let dot = to_dot(&two_hop(), &GraphStyle::default());

        assert!(dot.contains(
            "\"data/raw.csv\" -> \"results/a.txt\" [color=\"0.500 1.000 0.900\""
        ));
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(quote(r#"a "b"\c"#), r#""a \"b\"\\c""#);
    }

    #[test]
    fn output_is_stable_across_runs() {
        let style = GraphStyle::default();

        assert_eq!(to_dot(&two_hop(), &style), to_dot(&two_hop(), &style));
    }

    #[test]
    fn empty_graph_is_a_valid_digraph() {
        let dot = to_dot(&FileGraph::default(), &GraphStyle::default());

        assert!(dot.starts_with("digraph fileDAG {"));
        assert!(!dot.contains("->"));
    }
}
