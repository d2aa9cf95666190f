/// One undecoded input line without its line ending, expected to hold a
/// UTF-8 JSON object.
/// Example: `{"personal_info": {"name": "Ada"}, "experience": []}`
pub type RawLine = Vec<u8>;
/// Rendered text cell of a flat record.
/// Examples: `Python (Expert), Rust`, `2020-01 - Present`
pub type CellText = String;
/// Lowercased level label read from the primary experience entry.
/// Examples: `mid-senior`, `entry-level`
pub type LevelLabel = String;
/// Value matched against the validity ignore set.
/// Examples: `N/A`, `Not Provided`
pub type IgnoreValue = String;
/// Column header of the produced table.
/// Examples: `job_title`, `Seniority`
pub type ColumnName = &'static str;
/// One-based input line number used in log fields.
pub type LineNumber = usize;
