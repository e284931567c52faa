use crate::error::AnalysisError;
use crate::insights;
use crate::models::{Insights, StudentRecord, SubjectStats};
use crate::stats;
use crate::table::{self, CleanTable, RawTable};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub clean: CleanTable,
    pub subject_stats: Vec<SubjectStats>,
    pub students: Vec<StudentRecord>,
    pub top: Vec<StudentRecord>,
    pub bottom: Vec<StudentRecord>,
    pub insights: Insights,
}

impl Analysis {
    pub fn subjects(&self) -> &[String] {
        &self.clean.subjects
    }
}

pub fn run(raw: &RawTable, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    raw.identifier_indexes()?;

    let subjects = raw.subject_columns();
    if subjects.is_empty() {
        log::warn!("no subject columns detected; student metrics fall back to zero");
    }

    let clean = table::clean(raw, &subjects)?;
    let subject_stats = stats::subject_stats(&clean);
    let students = stats::student_metrics(&clean);
    let (top, bottom) = stats::top_bottom(&students, config.top_n);
    let insights = insights::generate_insights(&subject_stats, &students);

    Ok(Analysis {
        clean,
        subject_stats,
        students,
        top,
        bottom,
        insights,
    })
}
