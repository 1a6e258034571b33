/// One data row of the detailed summary: an output file and how it is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub output: String,
    pub rule: String,
    pub inputs: Vec<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub plan: Option<String>,
    /// 1-based line number in the summary text.
    pub line: usize,
}

#[cfg(test)]
impl Record {
    pub fn new(output: impl Into<String>, rule: impl Into<String>, inputs: &[&str]) -> Self {
        Self {
            output: output.into(),
            rule: rule.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            date: None,
            status: None,
            plan: None,
            line: 0,
        }
    }
}
