//! Executive dashboard: KPI row, the four overview charts and the
//! AI-written (or templated) summary.

use chrono::NaiveDate;

use crate::charts::ChartRegistry;
use crate::insight::{ExecutiveSummary, InsightGenerator};
use crate::model::StrategicAlert;
use crate::repository::Snapshot;
use crate::view::{
    adoption_chart, cost_benefit_chart, kpi_row, productivity_chart, roi_trend_chart, KpiRow,
};

pub const ROI_CHART: &str = "roiChart";
pub const ADOPTION_CHART: &str = "adoptionChart";
pub const PRODUCTIVITY_CHART: &str = "productivityChart";
pub const COST_BENEFIT_CHART: &str = "costBenefitChart";

#[derive(Debug, Clone)]
pub struct ExecutiveView {
    pub report_month: String,
    pub kpis: KpiRow,
    pub summary: ExecutiveSummary,
    /// Strategic alerts pass through verbatim from the metrics document.
    pub alerts: Vec<StrategicAlert>,
}

/// Month heading for the report banner, e.g. "August 2025".
pub fn report_month(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Build the page view and (re)render its charts. Chart rebuild disposes
/// the previous config per widget, so repeated refreshes never leak
/// stale series.
pub async fn render(
    snapshot: &Snapshot,
    insights: &InsightGenerator,
    charts: &mut ChartRegistry,
    today: NaiveDate,
) -> ExecutiveView {
    charts.render(ROI_CHART, roi_trend_chart(&snapshot.metrics));
    charts.render(ADOPTION_CHART, adoption_chart(&snapshot.metrics));
    charts.render(PRODUCTIVITY_CHART, productivity_chart(&snapshot.tools.tools));
    charts.render(COST_BENEFIT_CHART, cost_benefit_chart(&snapshot.tools.tools));

    ExecutiveView {
        report_month: report_month(today),
        kpis: kpi_row(&snapshot.metrics),
        summary: insights.executive_summary(snapshot).await,
        alerts: snapshot.metrics.strategic_alerts.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use crate::model::ToolsDocument;

    fn snapshot_fixture() -> Snapshot {
        Snapshot {
            metrics: serde_json::from_value(serde_json::json!({
                "overview": {
                    "monthly_roi": 2_400_000.0,
                    "adoption_rate": 87.3,
                    "total_developers": 1250
                },
                "monthly_trends": {
                    "2025_06": {"roi": 1_800_000.0},
                    "2025_07": {"roi": 2_100_000.0},
                    "2025_08": {"roi": 2_400_000.0}
                },
                "productivity_metrics": {
                    "development_velocity": {
                        "stories_per_sprint_increase": 40.0,
                        "bug_fix_time_reduction": 30.0,
                        "code_review_time_reduction": 20.0
                    }
                },
                "satisfaction_survey": {"overall_satisfaction": 4.2}
            }))
            .unwrap(),
            tools: ToolsDocument { tools: vec![] },
            training: serde_json::from_value(serde_json::json!({})).unwrap(),
        }
    }

    #[tokio::test]
    async fn render_fills_kpis_and_charts() {
        let snapshot = snapshot_fixture();
        let mut charts = ChartRegistry::new();
        let today = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        let view = render(&snapshot, &InsightGenerator::offline(), &mut charts, today).await;

        assert_eq!(view.report_month, "August 2025");
        assert_eq!(view.kpis.monthly_roi, "$2.4M");
        assert_eq!(view.kpis.productivity_gain, "+30%");
        assert_eq!(charts.len(), 4);
        let roi = charts.get(ROI_CHART).unwrap();
        assert_eq!(roi.kind, ChartKind::Line);
        assert_eq!(roi.labels, vec!["Jun", "Jul", "Aug"]);
        assert_eq!(roi.datasets[0].data, vec![1.8, 2.1, 2.4]);
    }

    #[tokio::test]
    async fn rerender_disposes_previous_charts() {
        let snapshot = snapshot_fixture();
        let mut charts = ChartRegistry::new();
        let today = NaiveDate::from_ymd_opt(2025, 8, 25).unwrap();
        render(&snapshot, &InsightGenerator::offline(), &mut charts, today).await;
        render(&snapshot, &InsightGenerator::offline(), &mut charts, today).await;
        assert_eq!(charts.len(), 4);
    }
}
