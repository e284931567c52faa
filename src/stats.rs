use crate::models::{Grade, StudentRecord, SubjectStats};
use crate::table::CleanTable;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation: divide by N, not N - 1. Empty input is 0.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Population third standardized moment; zero-variance input falls back to 0.
pub fn skewness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let m = mean(values);
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / n;
    m3 / m2.powf(1.5)
}

pub fn subject_stats(table: &CleanTable) -> Vec<SubjectStats> {
    table
        .subjects
        .iter()
        .enumerate()
        .map(|(idx, subject)| {
            let values = table.column(idx);
            let std = population_std(&values);
            if std == 0.0 {
                log::warn!("subject '{subject}' has zero variance; skew falls back to 0");
            }
            SubjectStats {
                subject: subject.clone(),
                mean: mean(&values),
                std,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                skew: skewness(&values),
            }
        })
        .collect()
}

/// Rank is competition style over Total descending: tied students share the
/// best position and later ranks skip.
pub fn student_metrics(table: &CleanTable) -> Vec<StudentRecord> {
    let totals: Vec<f64> = table.marks.iter().map(|row| row.iter().sum()).collect();
    let ranks = competition_ranks(&totals);

    table
        .students
        .iter()
        .zip(&table.marks)
        .zip(ranks)
        .map(|((identity, row), rank)| {
            let total: f64 = row.iter().sum();
            let average = if row.is_empty() {
                0.0
            } else {
                total / row.len() as f64
            };
            StudentRecord {
                student_id: identity.student_id.clone(),
                name: identity.name.clone(),
                class: identity.class.clone(),
                section: identity.section.clone(),
                marks: row.clone(),
                total,
                average,
                rank,
                grade: Grade::from_average(average),
                consistency: population_std(row),
                strongest_subject: strongest_subject(&table.subjects, row),
                weakest_subject: weakest_subject(&table.subjects, row),
            }
        })
        .collect()
}

/// Both sorts are stable, so tied students keep their input order.
pub fn top_bottom(
    records: &[StudentRecord],
    top_n: usize,
) -> (Vec<StudentRecord>, Vec<StudentRecord>) {
    let mut top = records.to_vec();
    top.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top.truncate(top_n);

    let mut bottom = records.to_vec();
    bottom.sort_by(|a, b| {
        a.average
            .partial_cmp(&b.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    bottom.truncate(top_n);

    (top, bottom)
}

fn competition_ranks(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| {
        totals[b]
            .partial_cmp(&totals[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0usize; totals.len()];
    let mut rank = 0usize;
    for (pos, &idx) in order.iter().enumerate() {
        if pos == 0 || totals[idx] != totals[order[pos - 1]] {
            rank = pos + 1;
        }
        ranks[idx] = rank;
    }
    ranks
}

/// Subject holding this row's maximum mark; the earliest column wins ties.
fn strongest_subject(subjects: &[String], row: &[f64]) -> Option<String> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &mark) in row.iter().enumerate() {
        match best {
            Some((_, top)) if mark <= top => {}
            _ => best = Some((idx, mark)),
        }
    }
    best.map(|(idx, _)| subjects[idx].clone())
}

fn weakest_subject(subjects: &[String], row: &[f64]) -> Option<String> {
    let mut worst: Option<(usize, f64)> = None;
    for (idx, &mark) in row.iter().enumerate() {
        match worst {
            Some((_, bottom)) if mark >= bottom => {}
            _ => worst = Some((idx, mark)),
        }
    }
    worst.map(|(idx, _)| subjects[idx].clone())
}
