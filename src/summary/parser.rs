use tracing::debug;

use super::Record;
use crate::error::{FileDagError, Result};

const FIELD_DELIMITER: char = '\t';
const INPUT_DELIMITER: char = ',';

const OUTPUT_COLUMN: &str = "output_file";
const RULE_COLUMN: &str = "rule";
const INPUTS_COLUMN: &str = "input-file(s)";
const DATE_COLUMN: &str = "date";
const STATUS_COLUMN: &str = "status";
const PLAN_COLUMN: &str = "plan";
const SHELLCMD_COLUMN: &str = "shellcmd";

/// Column positions taken from the header line.
#[derive(Debug)]
struct Schema {
    width: usize,
    output: usize,
    rule: usize,
    inputs: usize,
    date: Option<usize>,
    status: Option<usize>,
    plan: Option<usize>,
    /// The only free-text column; a tab inside it splits it into several
    /// fields.
    shellcmd: Option<usize>,
}

impl Schema {
    fn from_header(line_no: usize, header: &str) -> Result<Self> {
        let columns: Vec<&str> = header.split(FIELD_DELIMITER).map(str::trim).collect();
        let position = |name: &str| columns.iter().position(|c| *c == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| {
                FileDagError::parse(
                    line_no,
                    header,
                    format!("header is missing the '{}' column", name),
                )
            })
        };

        Ok(Self {
            width: columns.len(),
            output: required(OUTPUT_COLUMN)?,
            rule: required(RULE_COLUMN)?,
            inputs: required(INPUTS_COLUMN)?,
            date: position(DATE_COLUMN),
            status: position(STATUS_COLUMN),
            plan: position(PLAN_COLUMN),
            shellcmd: position(SHELLCMD_COLUMN),
        })
    }

    fn record(&self, line_no: usize, line: &str) -> Result<Record> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

        // Only a shell command may carry extra fields, from tabs inside it.
        let too_many = fields.len() > self.width && self.shellcmd.is_none();
        if fields.len() < self.width || too_many {
            return Err(FileDagError::parse(
                line_no,
                line,
                format!(
                    "expected {} tab-separated fields, found {}",
                    self.width,
                    fields.len()
                ),
            ));
        }

        let extra = fields.len() - self.width;
        // Columns after the shell command are counted from the end of the line.
        let field = |column: usize| match self.shellcmd {
            Some(shellcmd) if column > shellcmd => fields[column + extra],
            _ => fields[column],
        };

        let output = field(self.output).trim();
        if output.is_empty() {
            return Err(FileDagError::parse(line_no, line, "empty output file"));
        }

        let inputs = split_inputs(field(self.inputs));
        if inputs.iter().any(|input| input == output) {
            return Err(FileDagError::parse(
                line_no,
                line,
                format!("'{}' lists itself as an input", output),
            ));
        }

        let optional = |column: Option<usize>| column.and_then(|i| non_placeholder(field(i)));

        Ok(Record {
            output: output.to_string(),
            rule: field(self.rule).trim().to_string(),
            inputs,
            date: optional(self.date),
            status: optional(self.status),
            plan: optional(self.plan),
            line: line_no,
        })
    }
}

/// Parses the text of `snakemake --detailed-summary`.
///
/// The first non-blank line is the header. Blank lines are skipped, and text
/// without any data rows yields no records.
pub fn parse_detailed_summary(text: &str) -> Result<Vec<Record>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_no, header)) = lines.next() else {
        debug!("summary is empty");
        return Ok(Vec::new());
    };

    let schema = Schema::from_header(header_no, header)?;
    debug!(?schema, "parsed summary header");

    lines
        .map(|(line_no, line)| schema.record(line_no, line))
        .collect()
}

/// Snakemake writes `-` when it has no recorded inputs for a file.
fn split_inputs(field: &str) -> Vec<String> {
    if field.trim() == "-" {
        return Vec::new();
    }

    field
        .split(INPUT_DELIMITER)
        .map(str::trim)
        .filter(|input| !input.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_placeholder(field: &str) -> Option<String> {
    match field.trim() {
        "" | "-" => None,
        value => Some(value.to_string()),
    }
}
