use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::insights::AT_RISK_THRESHOLD;
use crate::models::{Insights, StudentRecord, SubjectStats};
use crate::pipeline::Analysis;

#[derive(Serialize)]
pub struct SummaryDoc<'a> {
    pub subjects: &'a [String],
    pub subject_stats: &'a [SubjectStats],
    pub students: &'a [StudentRecord],
    pub top_students: &'a [StudentRecord],
    pub bottom_students: &'a [StudentRecord],
    pub insights: &'a Insights,
}

impl<'a> SummaryDoc<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            subjects: analysis.subjects(),
            subject_stats: &analysis.subject_stats,
            students: &analysis.students,
            top_students: &analysis.top,
            bottom_students: &analysis.bottom,
            insights: &analysis.insights,
        }
    }
}

pub fn build_summary(analysis: &Analysis, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Student Marks & Performance Report");
    let _ = writeln!(
        output,
        "Generated on {} ({} students, {} subjects)",
        generated_on,
        analysis.students.len(),
        analysis.subjects().len()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Detected Subjects");
    if analysis.subjects().is_empty() {
        let _ = writeln!(output, "No subject columns detected.");
    } else {
        let _ = writeln!(output, "{}", analysis.subjects().join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Subject Statistics");
    if analysis.subject_stats.is_empty() {
        let _ = writeln!(output, "No subject columns detected.");
    } else {
        for stats in analysis.subject_stats.iter() {
            let _ = writeln!(
                output,
                "- {}: mean {:.2}, std {:.2}, min {:.2}, max {:.2}, skew {:.2}",
                stats.subject, stats.mean, stats.std, stats.min, stats.max, stats.skew
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students by Average");
    if analysis.top.is_empty() {
        let _ = writeln!(output, "No students in the table.");
    } else {
        for student in analysis.top.iter() {
            let _ = writeln!(
                output,
                "- {} ({}, class {} {}) average {:.2}, grade {}, rank {}",
                student.name,
                student.student_id,
                student.class,
                student.section,
                student.average,
                student.grade,
                student.rank
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Automatic Insights");
    for line in insight_lines(&analysis.insights) {
        let _ = writeln!(output, "- {line}");
    }

    output
}

pub fn insight_lines(insights: &Insights) -> [String; 4] {
    [
        format!(
            "Hardest subject: {}",
            name_or_na(insights.hardest_subject.as_deref())
        ),
        format!(
            "Easiest subject: {}",
            name_or_na(insights.easiest_subject.as_deref())
        ),
        format!(
            "Most consistent subject: {}",
            name_or_na(insights.most_consistent_subject.as_deref())
        ),
        format!(
            "Students at risk (average < {AT_RISK_THRESHOLD}): {}",
            insights.at_risk_count
        ),
    ]
}

fn name_or_na(value: Option<&str>) -> &str {
    value.unwrap_or("n/a")
}
