/// Local filesystem input/output for JSONL profiles and tabular datasets.
pub mod fs;
