//! Strategy center: intelligence counters, the evaluation queue, recent
//! discoveries, market/competitive charts and the strategic insight triple.

use crate::charts::{self, AxisFormat, ChartConfig, ChartRegistry};
use crate::format;
use crate::insight::{InsightGenerator, StrategicInsights};
use crate::model::{StrategicAlert, ToolStatus};
use crate::repository::Snapshot;
use crate::view::{
    discovery_priority, evaluation_phase, evaluation_progress, filter_by_status,
};

pub const TRENDS_CHART: &str = "trendsChart";
pub const COMPETITIVE_CHART: &str = "competitiveChart";
pub const ROI_PROJECTION_CHART: &str = "roiProjectionChart";

/// Competitive-intelligence coverage is a program-level figure maintained
/// by the strategy team, not derived from the documents.
pub const COMPETITIVE_INTEL_COVERAGE: &str = "97%";

#[derive(Debug, Clone)]
pub struct IntelligenceCounters {
    pub tools_discovered: String,
    pub evaluations_active: String,
    pub strategic_alerts: String,
    pub intel_coverage: String,
}

/// One card in the evaluation queue.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationCard {
    pub name: String,
    pub phase: &'static str,
    pub progress: u8,
}

/// One recently-discovered tool card.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryCard {
    pub name: String,
    pub description: String,
    pub priority: &'static str,
}

#[derive(Debug, Clone)]
pub struct StrategyView {
    pub counters: IntelligenceCounters,
    pub evaluation_queue: Vec<EvaluationCard>,
    pub recent_discoveries: Vec<DiscoveryCard>,
    pub insights: StrategicInsights,
    /// Decision-support items are the strategic alerts, verbatim.
    pub decisions: Vec<StrategicAlert>,
}

pub fn intelligence_counters(snapshot: &Snapshot) -> IntelligenceCounters {
    let d = &snapshot.metrics.discovery_pipeline;
    IntelligenceCounters {
        tools_discovered: format::number(d.tools_discovered_this_week),
        evaluations_active: format::number(d.tools_in_evaluation),
        strategic_alerts: format::number(snapshot.metrics.strategic_alerts.len() as u64),
        intel_coverage: COMPETITIVE_INTEL_COVERAGE.to_string(),
    }
}

/// Tools still in the funnel, carded with their phase label and progress.
pub fn evaluation_queue(snapshot: &Snapshot) -> Vec<EvaluationCard> {
    filter_by_status(
        &snapshot.tools.tools,
        &[
            ToolStatus::Discovery,
            ToolStatus::Evaluation,
            ToolStatus::PilotActive,
        ],
    )
    .into_iter()
    .map(|t| EvaluationCard {
        name: t.name.clone(),
        phase: evaluation_phase(t.status),
        progress: evaluation_progress(t.status),
    })
    .collect()
}

/// First three DISCOVERY tools, described by their leading strength.
pub fn recent_discoveries(snapshot: &Snapshot) -> Vec<DiscoveryCard> {
    filter_by_status(&snapshot.tools.tools, &[ToolStatus::Discovery])
        .into_iter()
        .take(3)
        .map(|t| DiscoveryCard {
            name: t.name.clone(),
            description: t
                .strengths
                .first()
                .cloned()
                .unwrap_or_else(|| "Under initial review".to_string()),
            priority: discovery_priority(t).as_str(),
        })
        .collect()
}

/// Adoption rate over the monthly trend series.
pub fn market_trends_chart(snapshot: &Snapshot) -> ChartConfig {
    let labels: Vec<String> = snapshot
        .metrics
        .monthly_trends
        .keys()
        .map(|k| format::month_label(k))
        .collect();
    let data: Vec<f64> = snapshot
        .metrics
        .monthly_trends
        .values()
        .map(|t| t.adoption_rate)
        .collect();
    charts::line_chart(labels, "AI Tool Adoption (%)", data, AxisFormat::Percent)
}

const COMPETITIVE_AXES: [&str; 5] = [
    "AI Adoption",
    "Tool Maturity",
    "Team Readiness",
    "Innovation Rate",
    "Cost Efficiency",
];

/// Benchmark radar. The industry series is the strategy team's published
/// benchmark; our adoption axis tracks the live overview figure.
pub fn competitive_chart(snapshot: &Snapshot) -> ChartConfig {
    let ours = vec![
        snapshot.metrics.overview.adoption_rate,
        75.0,
        82.0,
        78.0,
        85.0,
    ];
    let industry = vec![62.0, 58.0, 65.0, 55.0, 60.0];
    charts::radar_chart(
        COMPETITIVE_AXES.iter().map(|s| s.to_string()).collect(),
        vec![
            ("Our Company".to_string(), ours),
            ("Industry Average".to_string(), industry),
        ],
    )
}

const PROJECTION_GROWTH: f64 = 1.15;
const PROJECTION_MONTHS: usize = 3;

/// Actual monthly ROI plus a three-month projection compounding 15% per
/// month off the last actual value. Projection points align after the
/// actual series; the actual dataset pads with the last value so both
/// series share one label axis.
pub fn roi_projection_chart(snapshot: &Snapshot) -> ChartConfig {
    let trends = &snapshot.metrics.monthly_trends;
    let mut labels: Vec<String> = trends.keys().map(|k| format::month_label(k)).collect();
    let actual: Vec<f64> = trends.values().map(|t| t.roi / 1_000_000.0).collect();

    let mut projected = vec![f64::NAN; actual.len().saturating_sub(1)];
    let mut last = actual.last().copied().unwrap_or(0.0);
    projected.push(last);
    for i in 1..=PROJECTION_MONTHS {
        labels.push(format!("+{}mo", i));
        last *= PROJECTION_GROWTH;
        projected.push((last * 10.0).round() / 10.0);
    }

    let mut cfg = charts::line_chart(labels, "Actual ROI ($M)", actual, AxisFormat::Millions);
    cfg.datasets.push(charts::Dataset {
        label: "Projected ROI ($M)".to_string(),
        data: projected,
        colors: vec![charts::PALETTE[1]],
        fill: Some(false),
    });
    cfg
}

pub async fn render(
    snapshot: &Snapshot,
    insights: &InsightGenerator,
    charts_reg: &mut ChartRegistry,
) -> StrategyView {
    charts_reg.render(TRENDS_CHART, market_trends_chart(snapshot));
    charts_reg.render(COMPETITIVE_CHART, competitive_chart(snapshot));
    charts_reg.render(ROI_PROJECTION_CHART, roi_projection_chart(snapshot));

    StrategyView {
        counters: intelligence_counters(snapshot),
        evaluation_queue: evaluation_queue(snapshot),
        recent_discoveries: recent_discoveries(snapshot),
        insights: insights.strategic_insights(snapshot).await,
        decisions: snapshot.metrics.strategic_alerts.clone(),
    }
}
