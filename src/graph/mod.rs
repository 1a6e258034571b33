pub mod dot;
pub mod style;

pub use dot::to_dot;
pub use style::GraphStyle;

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::{debug, warn};

use crate::summary::Record;

/// A file in the workflow and what is known about how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub path: String,
    pub rule: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub plan: Option<String>,
}

impl FileNode {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            rule: None,
            date: None,
            status: None,
            plan: None,
        }
    }

    /// First path segment, used to group files that live side by side.
    pub fn top_level_dir(&self) -> &str {
        self.path.split('/').next().unwrap_or(&self.path)
    }
}

/// Files as nodes, one edge per (input -> output) pair weighted by the rule.
#[derive(Debug, Default)]
pub struct FileGraph {
    graph: DiGraph<FileNode, String>,
    index: HashMap<String, NodeIndex>,
}

impl FileGraph {
    pub fn from_records(records: &[Record]) -> Self {
        let mut file_graph = Self::default();

        for record in records {
            file_graph.add_record(record);
        }

        debug!(
            records = records.len(),
            nodes = file_graph.node_count(),
            edges = file_graph.edge_count(),
            "built file graph"
        );

        file_graph
    }

    fn add_record(&mut self, record: &Record) {
        let output = self.ensure_node(&record.output);

        let node = &mut self.graph[output];
        match &node.rule {
            Some(existing) if existing != &record.rule => {
                warn!(
                    file = %record.output,
                    first = %existing,
                    second = %record.rule,
                    line = record.line,
                    "file is produced by more than one rule, keeping the first"
                );
            }
            Some(_) => {}
            None => {
                node.rule = Some(record.rule.clone());
                node.date = record.date.clone();
                node.status = record.status.clone();
                node.plan = record.plan.clone();
            }
        }

        for input in &record.inputs {
            let input = self.ensure_node(input);
            self.graph.add_edge(input, output, record.rule.clone());
        }
    }

    fn ensure_node(&mut self, path: &str) -> NodeIndex {
        if let Some(&index) = self.index.get(path) {
            return index;
        }

        let index = self.graph.add_node(FileNode::new(path));
        self.index.insert(path.to_string(), index);
        index
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[cfg(test)]
    pub fn node(&self, path: &str) -> Option<&FileNode> {
        self.index.get(path).map(|&index| &self.graph[index])
    }

    /// Nodes ordered by path.
    pub fn nodes(&self) -> Vec<&FileNode> {
        let mut nodes: Vec<&FileNode> = self.graph.node_weights().collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        nodes
    }

    /// Edges as `(input, output, rule)` in the order the records listed them.
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].path.as_str(),
                    self.graph[edge.target()].path.as_str(),
                    edge.weight().as_str(),
                )
            })
            .collect()
    }

    /// Paths of files consumed by at least one rule, ordered by path.
    pub fn source_paths(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .next()
                    .is_some()
            })
            .map(|index| self.graph[index].path.as_str())
            .collect();
        sources.sort_unstable();
        sources
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn two_hop() -> Vec<Record> {
        vec![
            Record::new("results/a.txt", "ruleA", &["data/raw.csv"]),
            Record::new("results/b.txt", "ruleB", &["results/a.txt"]),
        ]
    }

    #[test]
    fn two_hop_records_form_a_linear_dag() {
        let graph = FileGraph::from_records(&two_hop());

        let paths: Vec<&str> = graph.nodes().iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["data/raw.csv", "results/a.txt", "results/b.txt"]);
        assert_eq!(
            graph.edges(),
            vec![
                ("data/raw.csv", "results/a.txt", "ruleA"),
                ("results/a.txt", "results/b.txt", "ruleB"),
            ]
        );
    }

    #[test]
    fn counts_match_distinct_paths_and_listed_inputs() {
        let records = vec![
            Record::new("out/merged.txt", "merge", &["a.txt", "b.txt", "c.txt"]),
            Record::new("out/report.html", "report", &["out/merged.txt", "a.txt"]),
            Record::new("a.txt", "fetch", &[]),
        ];

        let graph = FileGraph::from_records(&records);

        let distinct: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| {
                std::iter::once(r.output.as_str()).chain(r.inputs.iter().map(String::as_str))
            })
            .collect();
        let listed: usize = records.iter().map(|r| r.inputs.len()).sum();

        assert_eq!(graph.node_count(), distinct.len());
        assert_eq!(graph.edge_count(), listed);
    }

    #[test]
    fn metadata_comes_from_the_producing_record() {
        let mut produce = Record::new("results/a.txt", "ruleA", &["data/raw.csv"]);
        produce.status = Some("missing".to_string());

        let graph = FileGraph::from_records(&[produce]);

        let produced = graph.node("results/a.txt").unwrap();
        assert_eq!(produced.rule.as_deref(), Some("ruleA"));
        assert_eq!(produced.status.as_deref(), Some("missing"));

        let raw = graph.node("data/raw.csv").unwrap();
        assert_eq!(raw.rule, None);
    }

    #[test]
    fn input_seen_before_its_producer_gets_metadata_later() {
        let records = vec![
            Record::new("results/b.txt", "ruleB", &["results/a.txt"]),
            Record::new("results/a.txt", "ruleA", &["data/raw.csv"]),
        ];

        let graph = FileGraph::from_records(&records);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            graph.node("results/a.txt").unwrap().rule.as_deref(),
            Some("ruleA")
        );
    }

    #[test]
    fn sources_are_files_with_outgoing_edges() {
        let graph = FileGraph::from_records(&two_hop());

        assert_eq!(graph.source_paths(), vec!["data/raw.csv", "results/a.txt"]);
    }

    #[test]
    fn same_records_build_the_same_graph() {
        let first = FileGraph::from_records(&two_hop());
        let second = FileGraph::from_records(&two_hop());

        assert_eq!(first.nodes(), second.nodes());
        assert_eq!(first.edges(), second.edges());
    }

    #[test]
    fn placeholder_inputs_add_no_nodes_or_edges() {
        let text = "output_file\trule\tinput-file(s)\tstatus\n\
                    results/a.txt\truleA\t-\tmissing\n\
                    results/b.txt\truleB\t-\tmissing\n";
        let records = crate::summary::parse_detailed_summary(text).unwrap();

        let graph = FileGraph::from_records(&records);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node("-").is_none());
    }

    #[test]
    fn no_records_is_an_empty_graph() {
        let graph = FileGraph::from_records(&[]);

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn top_level_dir_is_the_first_segment() {
        assert_eq!(FileNode::new("results/x/a.txt").top_level_dir(), "results");
        assert_eq!(FileNode::new("a.txt").top_level_dir(), "a.txt");
    }
}
