//! Report generation and exports: executive and strategic Markdown
//! reports, the jobs CSV and the settings JSON dump. Files land in the
//! configured export directory with date-stamped names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::json;

use crate::api::Job;
use crate::insight::{ExecutiveSummary, StrategicInsights};
use crate::logging::log_export;
use crate::model::Severity;
use crate::pages::executive::ExecutiveView;
use crate::pages::strategy::StrategyView;
use crate::profile::DeveloperProfile;
use crate::store::{LocalStore, KEY_THEME, KEY_USER_ROLE};

/// One hardcoded strategic recommendation; the recommendation list is
/// maintained by the strategy team, not derived from documents.
pub struct Recommendation {
    pub priority: &'static str,
    pub action: &'static str,
    pub rationale: &'static str,
    pub timeline: &'static str,
    pub investment: &'static str,
}

pub const RECOMMENDATIONS: [Recommendation; 3] = [
    Recommendation {
        priority: "High",
        action: "Expand Cursor deployment to remaining development teams",
        rationale: "Pilot teams show 40% faster story completion with high satisfaction",
        timeline: "Q4 2025",
        investment: "$150K",
    },
    Recommendation {
        priority: "High",
        action: "Launch context engineering certification program",
        rationale: "Skill gap analysis shows context engineering as the limiting factor",
        timeline: "Q4 2025",
        investment: "$75K",
    },
    Recommendation {
        priority: "Medium",
        action: "Evaluate AWS Strands Agents for workflow automation",
        rationale: "Agent-based tooling shows 340% market growth and vendor alignment",
        timeline: "Q1 2026",
        investment: "$40K pilot budget",
    },
];

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "HIGH",
        Severity::Medium => "MEDIUM",
        Severity::Low => "LOW",
    }
}

fn summary_section(summary: &ExecutiveSummary) -> String {
    format!(
        "**Key Win:** {}\n\n**New Opportunity:** {}\n\n**Resource Need:** {}\n",
        summary.key_win, summary.new_opportunity, summary.resource_need
    )
}

/// Executive report body, pure over the rendered view.
pub fn executive_report(view: &ExecutiveView, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# AI Strategy Executive Report\n\n");
    out.push_str(&format!("## {}\n\n", view.report_month));
    out.push_str("### Key Performance Indicators\n\n");
    out.push_str(&format!("- Monthly ROI: {}\n", view.kpis.monthly_roi));
    out.push_str(&format!("- Tool Adoption Rate: {}\n", view.kpis.adoption_rate));
    out.push_str(&format!(
        "- Productivity Gain: {}\n",
        view.kpis.productivity_gain
    ));
    out.push_str(&format!(
        "- Developer Satisfaction: {}\n\n",
        view.kpis.satisfaction
    ));
    out.push_str("### Executive Summary\n\n");
    out.push_str(&summary_section(&view.summary));
    if !view.alerts.is_empty() {
        out.push_str("\n### Strategic Alerts\n\n");
        for alert in &view.alerts {
            out.push_str(&format!(
                "- [{}] {}: {}",
                severity_tag(alert.severity),
                alert.title,
                alert.description
            ));
            if !alert.deadline.is_empty() {
                out.push_str(&format!(" (due {})", alert.deadline));
            }
            out.push('\n');
        }
    }
    out.push_str(&format!("\n---\nGenerated {}\n", date.format("%Y-%m-%d")));
    out
}

fn insights_section(insights: &StrategicInsights) -> String {
    format!(
        "### Opportunity\n\n{}\n\n### Risk\n\n{}\n\n### Trend\n\n{}\n",
        insights.opportunity, insights.risk, insights.trend
    )
}

/// Strategy-center report body.
pub fn strategic_report(view: &StrategyView, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Strategic AI Intelligence Report\n\n");
    out.push_str(&format!("Date: {}\n\n", date.format("%Y-%m-%d")));
    out.push_str("## Intelligence Summary\n\n");
    out.push_str(&format!(
        "- Tools discovered this week: {}\n",
        view.counters.tools_discovered
    ));
    out.push_str(&format!(
        "- Active evaluations: {}\n",
        view.counters.evaluations_active
    ));
    out.push_str(&format!(
        "- Strategic alerts: {}\n",
        view.counters.strategic_alerts
    ));
    out.push_str(&format!(
        "- Competitive intel coverage: {}\n\n",
        view.counters.intel_coverage
    ));

    if !view.evaluation_queue.is_empty() {
        out.push_str("## Evaluation Queue\n\n");
        for card in &view.evaluation_queue {
            out.push_str(&format!(
                "- {} — {} ({}%)\n",
                card.name, card.phase, card.progress
            ));
        }
        out.push('\n');
    }

    out.push_str("## Strategic Insights\n\n");
    out.push_str(&insights_section(&view.insights));

    out.push_str("\n## Recommendations\n\n");
    for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
        out.push_str(&format!("{}. **{}** ({} priority)\n", i + 1, rec.action, rec.priority));
        out.push_str(&format!("   - Rationale: {}\n", rec.rationale));
        out.push_str(&format!("   - Timeline: {}\n", rec.timeline));
        out.push_str(&format!("   - Investment: {}\n", rec.investment));
    }

    if !view.decisions.is_empty() {
        out.push_str("\n## Pending Decisions\n\n");
        for alert in &view.decisions {
            out.push_str(&format!(
                "- [{}] {}: {}\n",
                severity_tag(alert.severity),
                alert.title,
                alert.description
            ));
        }
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Jobs table as CSV, one row per job, fields quoted as needed.
pub fn jobs_csv(jobs: &[Job]) -> String {
    let mut out = String::from("ID,Agent,Status,Created,Completed,Error\n");
    for job in jobs {
        let row = [
            job.id.to_string(),
            job.agent_name.clone(),
            job.status.clone(),
            job.created_at.clone(),
            job.completed_at.clone().unwrap_or_default(),
            job.error.clone().unwrap_or_default(),
        ];
        let encoded: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&encoded.join(","));
        out.push('\n');
    }
    out
}

/// Local settings as a JSON document. The AI API key is deliberately not
/// exported.
pub fn settings_json(store: &LocalStore, profile: &DeveloperProfile) -> Result<String> {
    let doc = json!({
        "theme": store.get(KEY_THEME)?.unwrap_or_else(|| "light".to_string()),
        "user_role": store.get(KEY_USER_ROLE)?,
        "profile": profile,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn executive_report_filename(date: NaiveDate) -> String {
    format!("ai-strategy-executive-report-{}.md", date.format("%Y-%m-%d"))
}

pub fn strategic_report_filename(date: NaiveDate) -> String {
    format!("strategic-ai-report-{}.md", date.format("%Y-%m-%d"))
}

pub fn jobs_export_filename(date: NaiveDate) -> String {
    format!("jobs_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write an export file under the export directory, creating it as
/// needed, and log the export.
pub fn write_export(dir: &Path, kind: &str, filename: &str, body: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join(filename);
    fs::write(&path, body).with_context(|| format!("cannot write {}", path.display()))?;
    log_export(kind, filename, body.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::fallback_strategic;
    use crate::pages::strategy::{EvaluationCard, IntelligenceCounters};
    use crate::view::KpiRow;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    fn executive_view() -> ExecutiveView {
        ExecutiveView {
            report_month: "August 2025".to_string(),
            kpis: KpiRow {
                monthly_roi: "$2.4M".to_string(),
                adoption_rate: "87%".to_string(),
                productivity_gain: "+30%".to_string(),
                satisfaction: "4.2/5".to_string(),
            },
            summary: ExecutiveSummary {
                key_win: "87% adoption".to_string(),
                new_opportunity: "Context engineering".to_string(),
                resource_need: "$150K for Cursor".to_string(),
            },
            alerts: vec![],
        }
    }

    #[test]
    fn executive_report_contains_kpis() {
        let body = executive_report(&executive_view(), date());
        assert!(body.contains("# AI Strategy Executive Report"));
        assert!(body.contains("## August 2025"));
        assert!(body.contains("- Monthly ROI: $2.4M"));
        assert!(body.contains("**Key Win:** 87% adoption"));
        assert!(body.contains("Generated 2025-08-25"));
    }

    #[test]
    fn strategic_report_lists_recommendations() {
        let view = StrategyView {
            counters: IntelligenceCounters {
                tools_discovered: "4".to_string(),
                evaluations_active: "3".to_string(),
                strategic_alerts: "0".to_string(),
                intel_coverage: "97%".to_string(),
            },
            evaluation_queue: vec![EvaluationCard {
                name: "Windsurf".to_string(),
                phase: "Initial screening",
                progress: 30,
            }],
            recent_discoveries: vec![],
            insights: fallback_strategic(),
            decisions: vec![],
        };
        let body = strategic_report(&view, date());
        assert!(body.contains("## Recommendations"));
        assert!(body.contains("Expand Cursor deployment"));
        assert!(body.contains("- Windsurf — Initial screening (30%)"));
    }

    #[test]
    fn filenames_are_date_stamped() {
        assert_eq!(
            executive_report_filename(date()),
            "ai-strategy-executive-report-2025-08-25.md"
        );
        assert_eq!(
            strategic_report_filename(date()),
            "strategic-ai-report-2025-08-25.md"
        );
        assert_eq!(jobs_export_filename(date()), "jobs_export_2025-08-25.csv");
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let jobs = vec![Job {
            id: 1,
            agent_name: "writer, senior".to_string(),
            status: "failed".to_string(),
            created_at: "2025-08-25T10:00:00Z".to_string(),
            completed_at: None,
            parameters: None,
            result: None,
            error: Some("quote \" in error".to_string()),
        }];
        let csv = jobs_csv(&jobs);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Agent,Status,Created,Completed,Error");
        assert!(lines[1].contains("\"writer, senior\""));
        assert!(lines[1].contains("\"quote \"\" in error\""));
    }

    #[test]
    fn settings_export_omits_api_key() {
        let mut store = LocalStore::open_in_memory().unwrap();
        store.set(crate::store::KEY_AI_API_KEY, "secret").unwrap();
        store.set(KEY_THEME, "dark").unwrap();
        let body = settings_json(&store, &DeveloperProfile::default()).unwrap();
        assert!(body.contains("\"theme\": \"dark\""));
        assert!(!body.contains("secret"));
    }

    #[test]
    fn write_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_export(&target, "jobs_csv", "jobs.csv", "ID\n").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "ID\n");
    }
}
