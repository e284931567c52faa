use std::path::Path;

use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::models::{StudentRecord, SubjectStats};
use crate::pipeline::Analysis;

pub const WORKBOOK_NAME: &str = "summary.xlsx";

const IDENTIFIER_HEADERS: [&str; 4] = ["StudentID", "Name", "Class", "Section"];
const METRIC_HEADERS: [&str; 7] = [
    "Total",
    "Average",
    "Rank",
    "Grade",
    "Consistency",
    "Strongest_Subject",
    "Weakest_Subject",
];

pub fn write_workbook(analysis: &Analysis, path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("All_Students")?;
    write_students(sheet, &header, analysis.subjects(), &analysis.students)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Subject_Stats")?;
    write_subject_stats(sheet, &header, &analysis.subject_stats)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Top_Students")?;
    write_students(sheet, &header, analysis.subjects(), &analysis.top)?;

    // The bottom selection ships under the at-risk sheet name.
    let sheet = workbook.add_worksheet();
    sheet.set_name("At_Risk_Students")?;
    write_students(sheet, &header, analysis.subjects(), &analysis.bottom)?;

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn write_students(
    sheet: &mut Worksheet,
    header: &Format,
    subjects: &[String],
    records: &[StudentRecord],
) -> Result<(), XlsxError> {
    let mut col: u16 = 0;
    for name in IDENTIFIER_HEADERS {
        sheet.write_string_with_format(0, col, name, header)?;
        col += 1;
    }
    for subject in subjects {
        sheet.write_string_with_format(0, col, subject, header)?;
        col += 1;
    }
    for name in METRIC_HEADERS {
        sheet.write_string_with_format(0, col, name, header)?;
        col += 1;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &record.student_id)?;
        sheet.write_string(row, 1, &record.name)?;
        sheet.write_string(row, 2, &record.class)?;
        sheet.write_string(row, 3, &record.section)?;

        let mut col: u16 = 4;
        for &mark in &record.marks {
            sheet.write_number(row, col, mark)?;
            col += 1;
        }
        sheet.write_number(row, col, record.total)?;
        sheet.write_number(row, col + 1, record.average)?;
        sheet.write_number(row, col + 2, record.rank as f64)?;
        sheet.write_string(row, col + 3, record.grade.as_str())?;
        sheet.write_number(row, col + 4, record.consistency)?;
        sheet.write_string(
            row,
            col + 5,
            record.strongest_subject.as_deref().unwrap_or(""),
        )?;
        sheet.write_string(
            row,
            col + 6,
            record.weakest_subject.as_deref().unwrap_or(""),
        )?;
    }

    Ok(())
}

fn write_subject_stats(
    sheet: &mut Worksheet,
    header: &Format,
    stats: &[SubjectStats],
) -> Result<(), XlsxError> {
    for (col, name) in ["Subject", "Mean", "Std", "Min", "Max", "Skew"]
        .into_iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, name, header)?;
    }

    for (idx, stat) in stats.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &stat.subject)?;
        sheet.write_number(row, 1, stat.mean)?;
        sheet.write_number(row, 2, stat.std)?;
        sheet.write_number(row, 3, stat.min)?;
        sheet.write_number(row, 4, stat.max)?;
        sheet.write_number(row, 5, stat.skew)?;
    }

    Ok(())
}
