use std::path::Path;

use anyhow::Context;

use crate::error::AnalysisError;

/// Columns that identify a student; everything else is a subject.
pub const IDENTIFIER_COLUMNS: [&str; 4] = ["StudentID", "Name", "Class", "Section"];

#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn subject_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| !IDENTIFIER_COLUMNS.contains(&h.as_str()))
            .cloned()
            .collect()
    }

    /// Positions of the identifier columns, in `IDENTIFIER_COLUMNS` order.
    pub fn identifier_indexes(&self) -> Result<[usize; 4], AnalysisError> {
        let mut indexes = [0usize; 4];
        let mut missing = Vec::new();
        for (slot, name) in IDENTIFIER_COLUMNS.into_iter().enumerate() {
            match self.headers.iter().position(|h| h.as_str() == name) {
                Some(idx) => indexes[slot] = idx,
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(indexes)
        } else {
            Err(AnalysisError::MissingIdentifiers { columns: missing })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentIdentity {
    pub student_id: String,
    pub name: String,
    pub class: String,
    pub section: String,
}

/// Cleaned table: every subject cell is finite and `marks` is row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTable {
    pub subjects: Vec<String>,
    pub students: Vec<StudentIdentity>,
    pub marks: Vec<Vec<f64>>,
}

impl CleanTable {
    pub fn column(&self, subject_idx: usize) -> Vec<f64> {
        self.marks.iter().map(|row| row[subject_idx]).collect()
    }
}

/// Short records are padded with empty cells so every row has one cell per
/// header.
pub fn load_table(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("failed to parse {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

/// Clean the raw table: trim every cell, coerce subject cells to numbers,
/// and impute missing cells with the mean of their column's originally-valid
/// cells. Fill values are computed for all columns before any write-back, so
/// no imputed value ever feeds another column's mean.
pub fn clean(table: &RawTable, subjects: &[String]) -> Result<CleanTable, AnalysisError> {
    let id_idx = table.identifier_indexes()?;

    let (subject_idx, kept): (Vec<usize>, Vec<String>) = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| subjects.contains(*h))
        .map(|(idx, h)| (idx, h.clone()))
        .unzip();

    let coerced: Vec<Vec<Option<f64>>> = table
        .rows
        .iter()
        .map(|row| {
            subject_idx
                .iter()
                .map(|&idx| row.get(idx).and_then(|cell| coerce(cell)))
                .collect()
        })
        .collect();

    let mut fills = Vec::with_capacity(kept.len());
    for (col, subject) in kept.iter().enumerate() {
        let valid: Vec<f64> = coerced.iter().filter_map(|row| row[col]).collect();
        if valid.is_empty() {
            return Err(AnalysisError::EmptySubject {
                subject: subject.clone(),
            });
        }
        let missing = coerced.len() - valid.len();
        if missing > 0 {
            log::debug!("imputing {missing} missing cell(s) in subject '{subject}'");
        }
        fills.push(valid.iter().sum::<f64>() / valid.len() as f64);
    }

    let marks = coerced
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(col, cell)| cell.unwrap_or(fills[col]))
                .collect()
        })
        .collect();

    let students = table
        .rows
        .iter()
        .map(|row| StudentIdentity {
            student_id: trimmed(row, id_idx[0]),
            name: trimmed(row, id_idx[1]),
            class: trimmed(row, id_idx[2]),
            section: trimmed(row, id_idx[3]),
        })
        .collect();

    Ok(CleanTable {
        subjects: kept,
        students,
        marks,
    })
}

/// A cell that does not parse as a finite number counts as missing.
fn coerce(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn trimmed(row: &[String], idx: usize) -> String {
    row.get(idx).map(|cell| cell.trim().to_string()).unwrap_or_default()
}
