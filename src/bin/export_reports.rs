//! One-shot report export: load the documents, render both report views
//! and write the Markdown files, then exit. Useful from cron or CI where
//! the long-running hub is overkill.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use strategyhub::charts::ChartRegistry;
use strategyhub::config::Config;
use strategyhub::insight::InsightGenerator;
use strategyhub::pages::{executive, strategy};
use strategyhub::report;
use strategyhub::repository::{load_snapshot, FsRepository};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let repo = FsRepository::new(cfg.data_base.clone());
    let snapshot = load_snapshot(&repo).await?;
    let insights = InsightGenerator::offline();
    let today = Utc::now().date_naive();
    let export_dir = Path::new(&cfg.export_dir);

    let mut charts = ChartRegistry::new();
    let exec_view = executive::render(&snapshot, &insights, &mut charts, today).await;
    let path = report::write_export(
        export_dir,
        "executive_report",
        &report::executive_report_filename(today),
        &report::executive_report(&exec_view, today),
    )?;
    println!("wrote {}", path.display());

    let strat_view = strategy::render(&snapshot, &insights, &mut charts).await;
    let path = report::write_export(
        export_dir,
        "strategic_report",
        &report::strategic_report_filename(today),
        &report::strategic_report(&strat_view, today),
    )?;
    println!("wrote {}", path.display());

    Ok(())
}
