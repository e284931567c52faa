use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use plotters::prelude::*;

use crate::models::SubjectStats;
use crate::table::CleanTable;

const CHART_SIZE: (u32, u32) = (800, 600);
const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartSelection {
    /// Per-subject mark distribution histograms
    Histograms,
    /// Bar chart of the average mark per subject
    Averages,
    /// Box plot of every subject's spread
    Boxplot,
    /// All chart kinds
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histograms,
    AverageBar,
    BoxPlot,
}

impl ChartSelection {
    pub fn charts(self) -> Vec<ChartKind> {
        match self {
            ChartSelection::Histograms => vec![ChartKind::Histograms],
            ChartSelection::Averages => vec![ChartKind::AverageBar],
            ChartSelection::Boxplot => vec![ChartKind::BoxPlot],
            ChartSelection::All => vec![
                ChartKind::Histograms,
                ChartKind::AverageBar,
                ChartKind::BoxPlot,
            ],
        }
    }
}

/// Render the selected charts into `out_dir`; a table without subjects
/// renders nothing.
pub fn render_charts(
    selection: ChartSelection,
    table: &CleanTable,
    stats: &[SubjectStats],
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    if table.subjects.is_empty() {
        log::warn!("no subject columns; skipping chart rendering");
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for kind in selection.charts() {
        match kind {
            ChartKind::Histograms => {
                for (idx, subject) in table.subjects.iter().enumerate() {
                    let path = out_dir.join(format!("hist_{subject}.svg"));
                    draw_histogram(subject, &table.column(idx), &path)
                        .with_context(|| format!("failed to render {}", path.display()))?;
                    written.push(path);
                }
            }
            ChartKind::AverageBar => {
                let path = out_dir.join("avg_by_subject.svg");
                draw_average_bar(stats, &path)
                    .with_context(|| format!("failed to render {}", path.display()))?;
                written.push(path);
            }
            ChartKind::BoxPlot => {
                let path = out_dir.join("boxplot.svg");
                draw_boxplot(table, &path)
                    .with_context(|| format!("failed to render {}", path.display()))?;
                written.push(path);
            }
        }
    }
    Ok(written)
}

/// Ten equal-width bins over [min, max]; a flat column collapses to a single
/// bin around the one observed value.
fn draw_histogram(subject: &str, values: &[f64], path: &Path) -> anyhow::Result<()> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi, bins) = if max > min {
        (min, max, HISTOGRAM_BINS)
    } else {
        (min - 0.5, max + 0.5, 1)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0u32; bins];
    for &value in values {
        let bin = (((value - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0) + 1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Marks Distribution - {subject}"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(lo..hi, 0u32..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Marks")
        .y_desc("Students")
        .draw()?;
    chart.draw_series(counts.iter().enumerate().map(|(bin, &count)| {
        let x0 = lo + width * bin as f64;
        let x1 = lo + width * (bin + 1) as f64;
        Rectangle::new([(x0, 0), (x1, count)], BLUE.mix(0.5).filled())
    }))?;
    root.present()?;
    Ok(())
}

fn draw_average_bar(stats: &[SubjectStats], path: &Path) -> anyhow::Result<()> {
    let labels: Vec<&str> = stats.iter().map(|s| s.subject.as_str()).collect();
    let y_max = stats.iter().map(|s| s.mean).fold(0.0_f64, f64::max).max(1.0) * 1.1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Average Marks by Subject", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d((0..stats.len() as i32).into_segmented(), 0.0..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(stats.len())
        .x_label_formatter(&|segment| segment_label(&labels, segment))
        .y_desc("Average Marks")
        .draw()?;
    chart.draw_series(stats.iter().enumerate().map(|(idx, stat)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(idx as i32), 0.0),
                (SegmentValue::Exact(idx as i32 + 1), stat.mean),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}

fn draw_boxplot(table: &CleanTable, path: &Path) -> anyhow::Result<()> {
    let labels: Vec<&str> = table.subjects.iter().map(String::as_str).collect();
    let (lo, hi) = table.marks.iter().flatten().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &value| (lo.min(value), hi.max(value)),
    );
    let pad = ((hi - lo) * 0.05).max(1.0);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Marks Distribution (Box Plot)", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(
            (0..table.subjects.len() as i32).into_segmented(),
            // Boxplot elements carry f32 values, so the Y range must too.
            ((lo - pad) as f32)..((hi + pad) as f32),
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(table.subjects.len())
        .x_label_formatter(&|segment| segment_label(&labels, segment))
        .y_desc("Marks")
        .draw()?;
    chart.draw_series(table.subjects.iter().enumerate().map(|(idx, _)| {
        let quartiles = Quartiles::new(&table.column(idx));
        Boxplot::new_vertical(SegmentValue::CenterOf(idx as i32), &quartiles)
    }))?;
    root.present()?;
    Ok(())
}

fn segment_label(labels: &[&str], segment: &SegmentValue<i32>) -> String {
    match segment {
        SegmentValue::CenterOf(idx) if *idx >= 0 => labels
            .get(*idx as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::subject_stats;
    use crate::table::StudentIdentity;

    fn sample_table() -> CleanTable {
        let marks = vec![
            vec![90.0, 80.0],
            vec![60.0, 40.0],
            vec![75.0, 100.0],
        ];
        let students = (0..marks.len())
            .map(|i| StudentIdentity {
                student_id: format!("S{i}"),
                name: format!("Student {i}"),
                class: "10".to_string(),
                section: "A".to_string(),
            })
            .collect();
        CleanTable {
            subjects: vec!["Math".to_string(), "Science".to_string()],
            students,
            marks,
        }
    }

    #[test]
    fn selection_expands_to_the_expected_chart_kinds() {
        assert_eq!(
            ChartSelection::Histograms.charts(),
            vec![ChartKind::Histograms]
        );
        assert_eq!(ChartSelection::Averages.charts(), vec![ChartKind::AverageBar]);
        assert_eq!(ChartSelection::Boxplot.charts(), vec![ChartKind::BoxPlot]);
        assert_eq!(ChartSelection::All.charts().len(), 3);
    }

    #[test]
    fn all_renders_one_histogram_per_subject_plus_bar_and_box() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        let stats = subject_stats(&table);

        let written = render_charts(ChartSelection::All, &table, &stats, dir.path()).unwrap();
        assert_eq!(written.len(), 4);

        for path in &written {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
        assert!(dir.path().join("hist_Math.svg").exists());
        assert!(dir.path().join("hist_Science.svg").exists());
        assert!(dir.path().join("avg_by_subject.svg").exists());
        assert!(dir.path().join("boxplot.svg").exists());
    }

    #[test]
    fn single_selection_renders_only_that_chart() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        let stats = subject_stats(&table);

        let written = render_charts(ChartSelection::Averages, &table, &stats, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(dir.path().join("avg_by_subject.svg").exists());
        assert!(!dir.path().join("boxplot.svg").exists());
    }

    #[test]
    fn table_without_subjects_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let table = CleanTable {
            subjects: Vec::new(),
            students: Vec::new(),
            marks: Vec::new(),
        };

        let written = render_charts(ChartSelection::All, &table, &[], dir.path()).unwrap();
        assert!(written.is_empty());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn flat_column_still_renders_a_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = sample_table();
        for row in &mut table.marks {
            row[0] = 50.0;
        }
        let stats = subject_stats(&table);

        render_charts(ChartSelection::Histograms, &table, &stats, dir.path()).unwrap();
        assert!(dir.path().join("hist_Math.svg").exists());
    }

    #[test]
    fn single_student_table_still_renders_a_boxplot() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = sample_table();
        table.students.truncate(1);
        table.marks.truncate(1);
        let stats = subject_stats(&table);

        let written = render_charts(ChartSelection::Boxplot, &table, &stats, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        let svg = std::fs::read_to_string(dir.path().join("boxplot.svg")).unwrap();
        assert!(svg.contains("<svg"));
    }
}
