/// Constants used by the validity oracle.
pub mod validity {
    /// Trimmed string values treated as "not really present".
    ///
    /// Membership is exact: `Unknown` and `unknown` are listed separately and
    /// no other case variants are folded in.
    pub const IGNORE_VALUES: [&str; 7] = [
        "",
        "Unknown",
        "unknown",
        "Not Provided",
        "not provided",
        "N/A",
        "n/a",
    ];
}

/// Constants used by the seniority classifier.
pub mod seniority {
    use crate::seniority::SeniorityLabel;

    /// Lowercased level labels and the seniority class each one maps to.
    pub const LEVEL_MAPPING: [(&str, SeniorityLabel); 10] = [
        ("junior", SeniorityLabel::Junior),
        ("intern", SeniorityLabel::Junior),
        ("entry", SeniorityLabel::Junior),
        ("entry-level", SeniorityLabel::Junior),
        ("mid", SeniorityLabel::Mid),
        ("mid-level", SeniorityLabel::Mid),
        ("senior", SeniorityLabel::Senior),
        ("mid-senior", SeniorityLabel::Senior),
        ("manager", SeniorityLabel::Senior),
        ("professional", SeniorityLabel::Senior),
    ];
    /// Canonical class order used for grouping, sampling and reports.
    pub const ALL_SENIORITIES: [SeniorityLabel; 3] = [
        SeniorityLabel::Junior,
        SeniorityLabel::Mid,
        SeniorityLabel::Senior,
    ];
}

/// Constants used by the stratified sampler.
pub mod sampling {
    /// Maximum number of rows kept per seniority class.
    pub const SAMPLE_SIZE: usize = 700;
    /// Seed for the per-class sampling generator.
    pub const DEFAULT_SEED: u64 = 42;
    /// Seed for the final whole-dataset shuffle.
    pub const DEFAULT_SHUFFLE_SEED: u64 = 42;
}

/// Constants used when rendering flat text fields.
pub mod text {
    /// Default separator for multi-valued list fields.
    pub const LIST_SEPARATOR: &str = ", ";
    /// Separator for narrative fields (responsibilities, descriptions, impacts).
    pub const NARRATIVE_SEPARATOR: &str = " | ";
    /// Summaries with fewer words than this are `short`.
    pub const SUMMARY_SHORT_BELOW: usize = 20;
    /// Summaries with fewer words than this (and not short) are `medium`.
    pub const SUMMARY_MEDIUM_BELOW: usize = 25;
    /// Job period used when no usable start date exists.
    pub const PERIOD_UNKNOWN: &str = "Unknown";
    /// End marker for open-ended job periods.
    pub const PERIOD_PRESENT: &str = "Present";
}

/// Column layout of the produced table.
pub mod columns {
    /// Flat record columns, in output order.
    pub const FLAT_RECORD_COLUMNS: [&str; 37] = [
        "name",
        "email",
        "remote_preference",
        "summary",
        "linkedin",
        "github",
        "summary_word_count",
        "summary_length_category",
        "job_title",
        "company",
        "employment_type",
        "company_industry",
        "company_size",
        "job_duration",
        "job_period",
        "responsibilities",
        "technologies",
        "methodologies",
        "tools",
        "all_job_titles",
        "all_companies",
        "num_experiences",
        "degrees",
        "fields_of_study",
        "institutions",
        "honors",
        "num_education",
        "programming_languages",
        "frameworks",
        "databases",
        "cloud_skills",
        "spoken_languages",
        "project_names",
        "project_descriptions",
        "project_roles",
        "project_impacts",
        "num_projects",
    ];
    /// Trailing column carrying the seniority class.
    pub const SENIORITY_COLUMN: &str = "Seniority";
}

/// Constants used by the ingestion loop and its log lines.
pub mod ingest {
    /// Log message used when a line cannot be parsed as a JSON object.
    pub const SKIP_MALFORMED_MSG: &str = "skipping malformed profile line";
}
