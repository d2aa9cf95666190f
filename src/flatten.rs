use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PrepareConfig;
use crate::constants::columns::FLAT_RECORD_COLUMNS;
use crate::constants::text::PERIOD_UNKNOWN;
use crate::record::RecordView;
use crate::types::{CellText, ColumnName};
use crate::utils::{
    calculate_job_period, extract_skills_with_levels, join_list, join_valid, summary_word_count,
};

/// Category used when a profile has no usable summary.
pub const SUMMARY_CATEGORY_NONE: &str = "none";

/// One fixed-schema row derived from a nested profile.
///
/// Field order is the output column order. Every field has a default, so
/// rows built from sparse profiles have the same shape as rows built from
/// complete ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    /// `personal_info.name`.
    pub name: CellText,
    /// `personal_info.email`.
    pub email: CellText,
    /// `personal_info.location.remote_preference`.
    pub remote_preference: CellText,
    /// `personal_info.summary`, untrimmed.
    pub summary: CellText,
    /// `personal_info.linkedin`.
    pub linkedin: CellText,
    /// `personal_info.github`.
    pub github: CellText,
    /// Whitespace-separated words in a usable summary, else 0.
    pub summary_word_count: usize,
    /// `short`, `medium`, `large`, or `none` without a usable summary.
    pub summary_length_category: CellText,
    /// Title of the first experience entry.
    pub job_title: CellText,
    /// Company of the first experience entry.
    pub company: CellText,
    /// Employment type of the first experience entry.
    pub employment_type: CellText,
    /// `company_info.industry` of the first experience entry.
    pub company_industry: CellText,
    /// `company_info.size` of the first experience entry.
    pub company_size: CellText,
    /// `dates.duration` of the first experience entry.
    pub job_duration: CellText,
    /// `start - end`, `start - Present` or `Unknown`.
    pub job_period: CellText,
    /// First entry's responsibilities, joined with ` | `.
    pub responsibilities: CellText,
    /// First entry's `technical_environment.technologies`.
    pub technologies: CellText,
    /// First entry's `technical_environment.methodologies`.
    pub methodologies: CellText,
    /// First entry's `technical_environment.tools`.
    pub tools: CellText,
    /// Usable titles across every experience entry.
    pub all_job_titles: CellText,
    /// Usable companies across every experience entry.
    pub all_companies: CellText,
    /// Experience entries, usable or not.
    pub num_experiences: usize,
    /// `degree.level` of each education entry.
    pub degrees: CellText,
    /// Distinct `degree.field` and `degree.major` values, first seen first.
    pub fields_of_study: CellText,
    /// `institution.name` of each education entry.
    pub institutions: CellText,
    /// `achievements.honors` where achievements is an object.
    pub honors: CellText,
    /// Education entries, usable or not.
    pub num_education: usize,
    /// `skills.technical.programming_languages` as `name (level)`.
    pub programming_languages: CellText,
    /// `skills.technical.frameworks` as `name (level)`.
    pub frameworks: CellText,
    /// `skills.technical.databases` as `name (level)`.
    pub databases: CellText,
    /// `skills.technical.cloud` as `name (level)`.
    pub cloud_skills: CellText,
    /// `skills.languages` as `name (level)`.
    pub spoken_languages: CellText,
    /// Project names.
    pub project_names: CellText,
    /// Project descriptions, joined with ` | `.
    pub project_descriptions: CellText,
    /// Project roles.
    pub project_roles: CellText,
    /// Project impacts, joined with ` | `.
    pub project_impacts: CellText,
    /// Project entries, usable or not.
    pub num_projects: usize,
}

impl Default for FlatRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            remote_preference: String::new(),
            summary: String::new(),
            linkedin: String::new(),
            github: String::new(),
            summary_word_count: 0,
            summary_length_category: SUMMARY_CATEGORY_NONE.to_string(),
            job_title: String::new(),
            company: String::new(),
            employment_type: String::new(),
            company_industry: String::new(),
            company_size: String::new(),
            job_duration: String::new(),
            job_period: PERIOD_UNKNOWN.to_string(),
            responsibilities: String::new(),
            technologies: String::new(),
            methodologies: String::new(),
            tools: String::new(),
            all_job_titles: String::new(),
            all_companies: String::new(),
            num_experiences: 0,
            degrees: String::new(),
            fields_of_study: String::new(),
            institutions: String::new(),
            honors: String::new(),
            num_education: 0,
            programming_languages: String::new(),
            frameworks: String::new(),
            databases: String::new(),
            cloud_skills: String::new(),
            spoken_languages: String::new(),
            project_names: String::new(),
            project_descriptions: String::new(),
            project_roles: String::new(),
            project_impacts: String::new(),
            num_projects: 0,
        }
    }
}

impl FlatRecord {
    /// Column headers, in the same order as [`FlatRecord::to_row`].
    pub const fn columns() -> &'static [ColumnName] {
        &FLAT_RECORD_COLUMNS
    }

    /// Cell values in column order; counts are rendered in decimal.
    pub fn to_row(&self) -> Vec<CellText> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.remote_preference.clone(),
            self.summary.clone(),
            self.linkedin.clone(),
            self.github.clone(),
            self.summary_word_count.to_string(),
            self.summary_length_category.clone(),
            self.job_title.clone(),
            self.company.clone(),
            self.employment_type.clone(),
            self.company_industry.clone(),
            self.company_size.clone(),
            self.job_duration.clone(),
            self.job_period.clone(),
            self.responsibilities.clone(),
            self.technologies.clone(),
            self.methodologies.clone(),
            self.tools.clone(),
            self.all_job_titles.clone(),
            self.all_companies.clone(),
            self.num_experiences.to_string(),
            self.degrees.clone(),
            self.fields_of_study.clone(),
            self.institutions.clone(),
            self.honors.clone(),
            self.num_education.to_string(),
            self.programming_languages.clone(),
            self.frameworks.clone(),
            self.databases.clone(),
            self.cloud_skills.clone(),
            self.spoken_languages.clone(),
            self.project_names.clone(),
            self.project_descriptions.clone(),
            self.project_roles.clone(),
            self.project_impacts.clone(),
            self.num_projects.to_string(),
        ]
    }
}

/// Turns nested profiles into [`FlatRecord`]s under one configuration.
///
/// Pure: the same record always produces the same row, and no lookup on a
/// sparse or oddly shaped record can fail.
#[derive(Clone, Copy, Debug)]
pub struct Flattener<'c> {
    config: &'c PrepareConfig,
}

impl<'c> Flattener<'c> {
    /// Create a flattener bound to `config`.
    pub fn new(config: &'c PrepareConfig) -> Self {
        Self { config }
    }

    /// Flatten one profile.
    pub fn flatten(&self, record: RecordView<'_>) -> FlatRecord {
        let mut flat = FlatRecord::default();
        self.fill_personal_info(&mut flat, record.field("personal_info"));
        self.fill_primary_experience(&mut flat, record.field("experience").first());
        self.fill_experience_aggregates(&mut flat, record.field("experience"));
        self.fill_education(&mut flat, record.field("education"));
        self.fill_skills(&mut flat, record.field("skills"));
        self.fill_projects(&mut flat, record.field("projects"));
        flat
    }

    fn fill_personal_info(&self, flat: &mut FlatRecord, personal: RecordView<'_>) {
        let rules = &self.config.validity;
        flat.name = rules.safe_get(personal.field("name"));
        flat.email = rules.safe_get(personal.field("email"));
        flat.remote_preference =
            rules.safe_get(personal.path(&["location", "remote_preference"]));
        flat.summary = rules.safe_get(personal.field("summary"));
        flat.linkedin = rules.safe_get(personal.field("linkedin"));
        flat.github = rules.safe_get(personal.field("github"));

        if rules.is_valid(personal.field("summary")) {
            flat.summary_word_count = summary_word_count(&flat.summary);
            flat.summary_length_category = self
                .config
                .summary
                .categorize(flat.summary_word_count)
                .to_string();
        }
    }

    /// Fields taken from `experience[0]`; a missing entry leaves the defaults.
    fn fill_primary_experience(&self, flat: &mut FlatRecord, job: RecordView<'_>) {
        if job.is_null() {
            return;
        }
        let rules = &self.config.validity;
        let separators = &self.config.separators;

        flat.job_title = rules.safe_get(job.field("title"));
        flat.company = rules.safe_get(job.field("company"));
        flat.employment_type = rules.safe_get(job.field("employment_type"));
        flat.company_industry = rules.safe_get(job.path(&["company_info", "industry"]));
        flat.company_size = rules.safe_get(job.path(&["company_info", "size"]));

        let dates = job.field("dates");
        let start = rules.safe_get(dates.field("start"));
        let end = rules.safe_get(dates.field("end"));
        flat.job_duration = rules.safe_get(dates.field("duration"));
        flat.job_period = calculate_job_period(rules, &start, &end);

        flat.responsibilities =
            join_list(rules, job.field("responsibilities"), &separators.narrative);
        let environment = job.field("technical_environment");
        flat.technologies = join_list(rules, environment.field("technologies"), &separators.list);
        flat.methodologies =
            join_list(rules, environment.field("methodologies"), &separators.list);
        flat.tools = join_list(rules, environment.field("tools"), &separators.list);
    }

    fn fill_experience_aggregates(&self, flat: &mut FlatRecord, experience: RecordView<'_>) {
        let rules = &self.config.validity;
        let separator: &str = &self.config.separators.list;
        flat.all_job_titles = join_valid(
            rules,
            experience.items().map(|job| job.field("title")),
            separator,
        );
        flat.all_companies = join_valid(
            rules,
            experience.items().map(|job| job.field("company")),
            separator,
        );
        flat.num_experiences = experience.len();
    }

    fn fill_education(&self, flat: &mut FlatRecord, education: RecordView<'_>) {
        let rules = &self.config.validity;
        let separator: &str = &self.config.separators.list;

        let mut degrees = Vec::new();
        let mut fields_of_study = IndexSet::new();
        let mut institutions = Vec::new();
        let mut honors = Vec::new();

        for entry in education.items() {
            let degree = entry.field("degree");
            let level = degree.field("level");
            let field = degree.field("field");
            let major = degree.field("major");

            if rules.is_valid(level) {
                degrees.push(level);
            }
            if rules.is_valid(field) {
                fields_of_study.insert(field.render());
            }
            if rules.is_valid(major) && !same_value(major, field) {
                fields_of_study.insert(major.render());
            }

            let institution = entry.path(&["institution", "name"]);
            if rules.is_valid(institution) {
                institutions.push(institution);
            }

            let achievements = entry.field("achievements");
            if achievements.is_object() {
                let honor = achievements.field("honors");
                if rules.is_valid(honor) {
                    honors.push(honor);
                }
            }
        }

        flat.degrees = join_valid(rules, degrees, separator);
        flat.fields_of_study = fields_of_study
            .into_iter()
            .collect::<Vec<_>>()
            .join(separator);
        flat.institutions = join_valid(rules, institutions, separator);
        flat.honors = join_valid(rules, honors, separator);
        flat.num_education = education.len();
    }

    fn fill_skills(&self, flat: &mut FlatRecord, skills: RecordView<'_>) {
        let rules = &self.config.validity;
        let technical = skills.field("technical");
        flat.programming_languages =
            extract_skills_with_levels(rules, technical.field("programming_languages"));
        flat.frameworks = extract_skills_with_levels(rules, technical.field("frameworks"));
        flat.databases = extract_skills_with_levels(rules, technical.field("databases"));
        flat.cloud_skills = extract_skills_with_levels(rules, technical.field("cloud"));
        flat.spoken_languages = extract_skills_with_levels(rules, skills.field("languages"));
    }

    fn fill_projects(&self, flat: &mut FlatRecord, projects: RecordView<'_>) {
        let rules = &self.config.validity;
        let separators = &self.config.separators;
        let column = |key: &'static str| projects.items().map(move |project| project.field(key));

        flat.project_names = join_valid(rules, column("name"), &separators.list);
        flat.project_descriptions =
            join_valid(rules, column("description"), &separators.narrative);
        flat.project_roles = join_valid(rules, column("role"), &separators.list);
        flat.project_impacts = join_valid(rules, column("impact"), &separators.narrative);
        flat.num_projects = projects.len();
    }
}

/// Flatten a parsed profile with the default configuration.
pub fn flatten_record(record: &Value) -> FlatRecord {
    let config = PrepareConfig::default();
    Flattener::new(&config).flatten(RecordView::new(record))
}

fn same_value(left: RecordView<'_>, right: RecordView<'_>) -> bool {
    left.value() == right.value()
}
