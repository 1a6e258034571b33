//! Snakemake `--detailed-summary` input.
//!
//! The summary is a tab-separated table. Its header line names the columns,
//! so the parser locates fields by name instead of by position and treats a
//! header without the required columns as an incompatible producer.

pub mod parser;
pub mod record;

pub use parser::parse_detailed_summary;
pub use record::Record;
