use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

mod charts;
mod error;
mod insights;
mod models;
mod pipeline;
mod report;
mod stats;
mod summary;
mod table;

use charts::ChartSelection;

#[derive(Parser)]
#[command(name = "student-marks-analysis")]
#[command(about = "Student marks and performance analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print subject statistics, top students, and automatic insights
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = pipeline::DEFAULT_TOP_N)]
        top_n: usize,
        /// Emit the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the spreadsheet report and chart images to a directory
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = pipeline::DEFAULT_TOP_N)]
        top_n: usize,
        #[arg(long, default_value = "analysis_output")]
        out_dir: PathBuf,
        /// Which charts to draw
        #[arg(long, value_enum, default_value_t = ChartSelection::All)]
        charts: ChartSelection,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { csv, top_n, json } => {
            let analysis = analyze(&csv, top_n)?;
            if json {
                let doc = summary::SummaryDoc::new(&analysis);
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!(
                    "{}",
                    summary::build_summary(&analysis, Utc::now().date_naive())
                );
            }
        }
        Commands::Report {
            csv,
            top_n,
            out_dir,
            charts: selection,
        } => {
            let analysis = analyze(&csv, top_n)?;
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;

            report::write_workbook(&analysis, &out_dir.join(report::WORKBOOK_NAME))?;
            let rendered = charts::render_charts(
                selection,
                &analysis.clean,
                &analysis.subject_stats,
                &out_dir,
            )?;

            for line in summary::insight_lines(&analysis.insights) {
                println!("- {line}");
            }
            println!(
                "Wrote {} and {} chart file(s) to {}.",
                report::WORKBOOK_NAME,
                rendered.len(),
                out_dir.display()
            );
        }
    }

    Ok(())
}

fn analyze(csv: &Path, top_n: usize) -> anyhow::Result<pipeline::Analysis> {
    let raw = table::load_table(csv)?;
    let analysis = pipeline::run(&raw, &pipeline::AnalysisConfig { top_n })?;
    Ok(analysis)
}
