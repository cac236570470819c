//! Externally-sourced document schemas.
//!
//! These documents are produced by the publishing pipeline and consumed
//! read-only here: every derived value is a pure function of the last
//! fetched snapshot, and nothing in this crate mutates fetched data
//! beyond formatting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsDocument {
    pub overview: Overview,
    #[serde(default)]
    pub monthly_trends: BTreeMap<String, MonthlyTrend>,
    #[serde(default)]
    pub productivity_metrics: ProductivityMetrics,
    #[serde(default)]
    pub adoption_metrics: AdoptionMetrics,
    #[serde(default)]
    pub satisfaction_survey: SatisfactionSurvey,
    #[serde(default)]
    pub strategic_alerts: Vec<StrategicAlert>,
    #[serde(default)]
    pub discovery_pipeline: DiscoveryCounters,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Overview {
    pub monthly_roi: f64,
    pub adoption_rate: f64,
    pub total_developers: u64,
    #[serde(default)]
    pub tools_tracked: u64,
}

/// One entry in the monthly trend series, keyed by `"<year>_<month>"`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonthlyTrend {
    pub roi: f64,
    #[serde(default)]
    pub adoption_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductivityMetrics {
    #[serde(default)]
    pub development_velocity: DevelopmentVelocity,
}

/// The three named percentages that feed the average-productivity-gain KPI.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DevelopmentVelocity {
    pub stories_per_sprint_increase: f64,
    pub bug_fix_time_reduction: f64,
    pub code_review_time_reduction: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdoptionMetrics {
    #[serde(default)]
    pub by_tool: Vec<ToolAdoption>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolAdoption {
    pub tool_name: String,
    pub adoption_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SatisfactionSurvey {
    /// Overall satisfaction on a 0-5 scale.
    pub overall_satisfaction: f64,
}

/// Severity-tagged reminder record rendered verbatim from metrics data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategicAlert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiscoveryCounters {
    #[serde(default)]
    pub tools_discovered_this_week: u64,
    #[serde(default)]
    pub tools_in_evaluation: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsDocument {
    #[serde(default)]
    pub tools: Vec<ToolRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    pub status: ToolStatus,
    /// Externally supplied quality rating, 0-10 scale, opaque to this layer.
    #[serde(default)]
    pub evaluation_score: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub cost_per_user_monthly: Option<f64>,
    #[serde(default)]
    pub roi_calculation: Option<RoiCalculation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    Discovery,
    Evaluation,
    PilotActive,
    PilotComplete,
    Deployed,
    Retired,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Discovery => "DISCOVERY",
            ToolStatus::Evaluation => "EVALUATION",
            ToolStatus::PilotActive => "PILOT_ACTIVE",
            ToolStatus::PilotComplete => "PILOT_COMPLETE",
            ToolStatus::Deployed => "DEPLOYED",
            ToolStatus::Retired => "RETIRED",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoiCalculation {
    pub monthly_cost: f64,
    pub monthly_savings: f64,
    #[serde(default)]
    pub productivity_gain_percent: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingDocument {
    #[serde(default)]
    pub curricula: Vec<Curriculum>,
    #[serde(default)]
    pub community_contributions: Vec<CommunityContribution>,
    #[serde(default)]
    pub skill_assessments: Vec<SkillAssessmentSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Curriculum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub level: SkillLevel,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub satisfaction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommunityContribution {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub top_patterns: Vec<PatternEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternEntry {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub downloads: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkillAssessmentSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub questions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_status_roundtrips_wire_names() {
        let s: ToolStatus = serde_json::from_str("\"PILOT_ACTIVE\"").unwrap();
        assert_eq!(s, ToolStatus::PilotActive);
        assert_eq!(s.as_str(), "PILOT_ACTIVE");
    }

    #[test]
    fn metrics_document_tolerates_missing_sections() {
        let doc: MetricsDocument = serde_json::from_str(
            r#"{"overview":{"monthly_roi":2400000,"adoption_rate":87.3,"total_developers":1250}}"#,
        )
        .unwrap();
        assert!(doc.monthly_trends.is_empty());
        assert!(doc.strategic_alerts.is_empty());
        assert_eq!(doc.overview.tools_tracked, 0);
    }

    #[test]
    fn severity_parses_uppercase() {
        let s: Severity = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(s, Severity::High);
    }
}
