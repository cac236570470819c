use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::time::{sleep, Duration};

use strategyhub::config::Config;
use strategyhub::discovery::ToolDiscoveryPipeline;
use strategyhub::insight::{CompletionClient, InsightGenerator};
use strategyhub::logging::{log, obj, v_num, v_str, Domain, Level};
use strategyhub::notify::LogNotifier;
use strategyhub::pages::{developer, executive, strategy, PageController};
use strategyhub::profile::DeveloperProfile;
use strategyhub::report;
use strategyhub::repository::{DataRepository, FsRepository, HttpRepository};
use strategyhub::store::{LocalStore, KEY_AI_API_KEY};
use strategyhub::charts::ChartRegistry;

fn build_repository(cfg: &Config) -> Result<Arc<dyn DataRepository>> {
    if cfg.data_base.starts_with("http://") || cfg.data_base.starts_with("https://") {
        // Url::join drops the last path segment unless the base ends in '/'.
        let base = if cfg.data_base.ends_with('/') {
            cfg.data_base.clone()
        } else {
            format!("{}/", cfg.data_base)
        };
        Ok(Arc::new(HttpRepository::new(&base, cfg.http_timeout_secs)?))
    } else {
        Ok(Arc::new(FsRepository::new(cfg.data_base.clone())))
    }
}

fn build_insights(cfg: &Config, store: &LocalStore) -> Result<InsightGenerator> {
    match store.get(KEY_AI_API_KEY)? {
        Some(key) if !key.is_empty() => {
            log(Level::Info, Domain::Insight, "ai_enabled", obj(&[]));
            Ok(InsightGenerator::new(Some(Box::new(CompletionClient::new(
                &cfg.ai_endpoint,
                &key,
                cfg.http_timeout_secs,
            )))))
        }
        _ => {
            log(Level::Info, Domain::Insight, "ai_offline_fallback", obj(&[]));
            Ok(InsightGenerator::offline())
        }
    }
}

async fn export_cycle(
    cfg: &Config,
    exec_page: &PageController,
    strat_page: &PageController,
    insights: &InsightGenerator,
    profile: &DeveloperProfile,
) -> Result<()> {
    let today = Utc::now().date_naive();
    let export_dir = std::path::Path::new(&cfg.export_dir);

    if let Some(snapshot) = exec_page.snapshot() {
        let mut charts = ChartRegistry::new();
        let view = executive::render(&snapshot, insights, &mut charts, today).await;
        report::write_export(
            export_dir,
            "executive_report",
            &report::executive_report_filename(today),
            &report::executive_report(&view, today),
        )?;
        let dev_view = developer::render(&snapshot, profile);
        log(
            Level::Info,
            Domain::Page,
            "developer_view",
            obj(&[
                ("page", v_str("developer-hub")),
                ("overall_progress", v_num(dev_view.overall_progress)),
                (
                    "tool_recommendations",
                    v_num(dev_view.recommended_tools.len() as f64),
                ),
            ]),
        );
    }

    if let Some(snapshot) = strat_page.snapshot() {
        let mut charts = ChartRegistry::new();
        let view = strategy::render(&snapshot, insights, &mut charts).await;
        report::write_export(
            export_dir,
            "strategic_report",
            &report::strategic_report_filename(today),
            &report::strategic_report(&view, today),
        )?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("data_base", v_str(&cfg.data_base)),
            ("api_base", v_str(&cfg.api_base)),
            ("exec_refresh_secs", v_num(cfg.executive_refresh_secs as f64)),
            (
                "strategy_refresh_secs",
                v_num(cfg.strategy_refresh_secs as f64),
            ),
        ]),
    );

    let store = LocalStore::open(&cfg.store_path)?;
    let profile = DeveloperProfile::load_or_default(&store)?;
    let insights = build_insights(&cfg, &store)?;
    let repo = build_repository(&cfg)?;
    let notifier = Arc::new(LogNotifier);

    let exec_page = Arc::new(PageController::new(
        "executive",
        repo.clone(),
        notifier.clone(),
    ));
    let strat_page = Arc::new(PageController::new(
        "strategy-center",
        repo.clone(),
        notifier.clone(),
    ));

    // Initial loads are fatal: a hub with no data has nothing to serve.
    exec_page.initialize().await?;
    strat_page.initialize().await?;

    let discoveries = ToolDiscoveryPipeline::default().run().await;
    log(
        Level::Info,
        Domain::Discovery,
        "pipeline_complete",
        obj(&[("count", v_num(discoveries.len() as f64))]),
    );

    tokio::spawn(
        exec_page
            .clone()
            .run(Duration::from_secs(cfg.executive_refresh_secs)),
    );
    tokio::spawn(
        strat_page
            .clone()
            .run(Duration::from_secs(cfg.strategy_refresh_secs)),
    );

    loop {
        export_cycle(&cfg, &exec_page, &strat_page, &insights, &profile).await?;
        sleep(Duration::from_secs(cfg.strategy_refresh_secs)).await;
    }
}
