//! View-model derivation: pure functions from a document snapshot to the
//! values the dashboards display. Nothing here performs IO or mutates the
//! snapshot.

use anyhow::{bail, Result};

use crate::charts::{self, AxisFormat, BubblePoint, ChartConfig};
use crate::format;
use crate::model::{
    Curriculum, MetricsDocument, SkillLevel, ToolRecord, ToolStatus,
};
use crate::profile::DeveloperProfile;

/// Rounded arithmetic mean of the three development-velocity percentages.
pub fn average_productivity_gain(metrics: &MetricsDocument) -> i64 {
    let v = &metrics.productivity_metrics.development_velocity;
    let gains = [
        v.stories_per_sprint_increase,
        v.bug_fix_time_reduction,
        v.code_review_time_reduction,
    ];
    (gains.iter().sum::<f64>() / gains.len() as f64).round() as i64
}

/// Group items by a category key. The result is an exact partition: every
/// item lands in exactly one group, groups keep first-seen order, and empty
/// categories never appear.
pub fn group_by_category<'a, T, F>(items: &'a [T], key: F) -> Vec<(String, Vec<&'a T>)>
where
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<(String, Vec<&T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(name, _)| name == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k.to_string(), vec![item])),
        }
    }
    groups
}

pub fn filter_by_status<'a>(tools: &'a [ToolRecord], statuses: &[ToolStatus]) -> Vec<&'a ToolRecord> {
    tools
        .iter()
        .filter(|t| statuses.contains(&t.status))
        .collect()
}

/// A named criterion with its weight in a linear score.
#[derive(Debug, Clone)]
pub struct Criterion {
    pub name: &'static str,
    pub weight: f64,
}

const WEIGHT_EPSILON: f64 = 1e-9;

/// Linear weighted score: sum of weight_i * score_i. Weights must sum to
/// 1.0 within floating-point epsilon and every criterion must be scored.
pub fn weighted_score(criteria: &[Criterion], scores: &[(&str, f64)]) -> Result<f64> {
    let total: f64 = criteria.iter().map(|c| c.weight).sum();
    if (total - 1.0).abs() > WEIGHT_EPSILON {
        bail!("criterion weights sum to {}, expected 1.0", total);
    }
    let mut out = 0.0;
    for c in criteria {
        match scores.iter().find(|(name, _)| *name == c.name) {
            Some((_, s)) => out += c.weight * s,
            None => bail!("missing score for criterion {}", c.name),
        }
    }
    Ok(out)
}

/// Rank-and-slice: sort descending by score and keep the top `k`. The sort
/// is stable, so ties keep their original array order.
pub fn rank_top_k<T, F>(items: &[T], k: usize, score: F) -> Vec<(usize, f64)>
where
    F: Fn(&T) -> f64,
{
    let mut scored: Vec<(usize, f64)> = items.iter().map(|i| score(i)).enumerate().collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Tool recommendation score for a given profile. The evaluation score is
/// the base; interest and skill-level boosts mirror the published hub.
pub fn tool_recommendation_score(tool: &ToolRecord, profile: &DeveloperProfile) -> f64 {
    let mut score = tool.evaluation_score;
    if profile.preferences.tool_interests.iter().any(|i| i == &tool.id) {
        score += 2.0;
    }
    if profile.level == SkillLevel::Advanced && tool.category == "AI_FIRST_IDE" {
        score += 1.0;
    }
    score
}

/// Top-3 tool recommendations: tools the user does not already run, in
/// PILOT_COMPLETE or EVALUATION, ranked by recommendation score.
pub fn recommend_tools<'a>(
    tools: &'a [ToolRecord],
    profile: &DeveloperProfile,
    user_tools: &[String],
) -> Vec<&'a ToolRecord> {
    let candidates: Vec<&ToolRecord> = tools
        .iter()
        .filter(|t| !user_tools.contains(&t.id))
        .filter(|t| matches!(t.status, ToolStatus::PilotComplete | ToolStatus::Evaluation))
        .collect();
    rank_top_k(&candidates, 3, |t| tool_recommendation_score(t, profile))
        .into_iter()
        .map(|(i, _)| candidates[i])
        .collect()
}

/// Course recommendation score: focus-area match is worth a flat 50, then
/// completion rate and satisfaction contribute with fixed factors.
pub fn course_recommendation_score(course: &Curriculum, profile: &DeveloperProfile) -> f64 {
    let mut score = 0.0;
    let name = course.name.to_lowercase();
    if profile
        .preferences
        .focus_areas
        .iter()
        .any(|area| name.contains(&area.replace('-', " ")))
    {
        score += 50.0;
    }
    score += course.completion_rate * 0.3;
    score += course.satisfaction * 10.0;
    score
}

/// Curricula visible to a skill level: beginners see beginner courses,
/// intermediates see beginner and intermediate, advanced users see all.
pub fn curricula_for_level(curricula: &[Curriculum], level: SkillLevel) -> Vec<&Curriculum> {
    curricula.iter().filter(|c| c.level <= level).collect()
}

/// The course in progress: first with completion strictly between 0 and
/// 100, else the first course.
pub fn current_course<'a>(curricula: &[&'a Curriculum]) -> Option<&'a Curriculum> {
    curricula
        .iter()
        .find(|c| c.completion_rate > 0.0 && c.completion_rate < 100.0)
        .or_else(|| curricula.first())
        .copied()
}

pub fn recommend_courses<'a>(
    curricula: &'a [Curriculum],
    profile: &DeveloperProfile,
) -> Vec<&'a Curriculum> {
    let visible = curricula_for_level(curricula, profile.level);
    let candidates: Vec<&Curriculum> = visible
        .into_iter()
        .filter(|c| !profile.completed_course_ids.contains(&c.id))
        .collect();
    rank_top_k(&candidates, 3, |c| course_recommendation_score(c, profile))
        .into_iter()
        .map(|(i, _)| candidates[i])
        .collect()
}

/// Human label for where a tool sits in the evaluation funnel.
pub fn evaluation_phase(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Discovery => "Initial screening",
        ToolStatus::Evaluation => "Technical deep dive",
        ToolStatus::PilotActive => "Pilot testing",
        _ => "Unknown phase",
    }
}

/// Funnel progress percentage for the evaluation widget.
pub fn evaluation_progress(status: ToolStatus) -> u8 {
    match status {
        ToolStatus::Discovery => 30,
        ToolStatus::Evaluation => 70,
        ToolStatus::PilotActive => 90,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPriority {
    High,
    Medium,
}

impl DiscoveryPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryPriority::High => "High Priority",
            DiscoveryPriority::Medium => "Medium Priority",
        }
    }
}

/// AI-first IDEs and Amazon-vendored tools jump the queue.
pub fn discovery_priority(tool: &ToolRecord) -> DiscoveryPriority {
    if tool.category == "AI_FIRST_IDE" || tool.vendor == "Amazon" {
        DiscoveryPriority::High
    } else {
        DiscoveryPriority::Medium
    }
}

/// The executive KPI row, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiRow {
    pub monthly_roi: String,
    pub adoption_rate: String,
    pub productivity_gain: String,
    pub satisfaction: String,
}

pub fn kpi_row(metrics: &MetricsDocument) -> KpiRow {
    KpiRow {
        monthly_roi: format::compact_millions(metrics.overview.monthly_roi),
        adoption_rate: format::percent_whole(metrics.overview.adoption_rate),
        productivity_gain: format::percent_delta(average_productivity_gain(metrics) as f64),
        satisfaction: format::satisfaction(metrics.satisfaction_survey.overall_satisfaction),
    }
}

/// Monthly ROI trend scaled to millions; BTreeMap keys give chronological
/// order for `"<year>_<month>"` labels.
pub fn roi_trend_chart(metrics: &MetricsDocument) -> ChartConfig {
    let labels: Vec<String> = metrics
        .monthly_trends
        .keys()
        .map(|k| format::month_label(k))
        .collect();
    let data: Vec<f64> = metrics
        .monthly_trends
        .values()
        .map(|t| t.roi / 1_000_000.0)
        .collect();
    charts::line_chart(labels, "Monthly ROI ($M)", data, AxisFormat::Millions)
}

pub fn adoption_chart(metrics: &MetricsDocument) -> ChartConfig {
    let labels: Vec<String> = metrics
        .adoption_metrics
        .by_tool
        .iter()
        .map(|t| t.tool_name.clone())
        .collect();
    let data: Vec<f64> = metrics
        .adoption_metrics
        .by_tool
        .iter()
        .map(|t| t.adoption_rate)
        .collect();
    charts::doughnut_chart(labels, data)
}

/// Productivity gains for tools that made it through a pilot.
pub fn productivity_chart(tools: &[ToolRecord]) -> ChartConfig {
    let shipped = filter_by_status(tools, &[ToolStatus::Deployed, ToolStatus::PilotComplete]);
    let labels: Vec<String> = shipped.iter().map(|t| t.name.clone()).collect();
    let data: Vec<f64> = shipped
        .iter()
        .map(|t| {
            t.roi_calculation
                .as_ref()
                .map(|r| r.productivity_gain_percent)
                .unwrap_or(0.0)
        })
        .collect();
    charts::bar_chart(labels, "Productivity Gain (%)", data, AxisFormat::Percent)
}

/// Cost vs savings bubble chart; bubble radius scales with the square root
/// of seat count so large deployments stay on screen.
pub fn cost_benefit_chart(tools: &[ToolRecord]) -> ChartConfig {
    let bubbles: Vec<BubblePoint> = tools
        .iter()
        .filter(|t| matches!(t.status, ToolStatus::Deployed | ToolStatus::PilotComplete))
        .filter_map(|t| {
            t.roi_calculation.as_ref().map(|r| BubblePoint {
                x: r.monthly_cost,
                y: r.monthly_savings,
                r: (t.users_count as f64).sqrt() * 2.0,
                label: t.name.clone(),
            })
        })
        .collect();
    charts::bubble_chart("Cost vs Benefit", bubbles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::profile::DeveloperProfile;

    fn metrics_fixture() -> MetricsDocument {
        serde_json::from_value(serde_json::json!({
            "overview": {
                "monthly_roi": 2_400_000.0,
                "adoption_rate": 87.3,
                "total_developers": 1250,
                "tools_tracked": 12
            },
            "productivity_metrics": {
                "development_velocity": {
                    "stories_per_sprint_increase": 40.0,
                    "bug_fix_time_reduction": 30.0,
                    "code_review_time_reduction": 20.0
                }
            },
            "satisfaction_survey": { "overall_satisfaction": 4.2 }
        }))
        .unwrap()
    }

    fn tool(id: &str, status: ToolStatus, score: f64) -> ToolRecord {
        ToolRecord {
            id: id.to_string(),
            name: id.to_string(),
            status,
            evaluation_score: score,
            category: String::new(),
            vendor: String::new(),
            users_count: 0,
            use_cases: vec![],
            strengths: vec![],
            cost_per_user_monthly: None,
            roi_calculation: None,
        }
    }

    #[test]
    fn average_gain_is_rounded_mean() {
        let m = metrics_fixture();
        assert_eq!(average_productivity_gain(&m), 30);
    }

    #[test]
    fn kpi_row_formats_reference_scenario() {
        let row = kpi_row(&metrics_fixture());
        assert_eq!(row.monthly_roi, "$2.4M");
        assert_eq!(row.adoption_rate, "87%");
        assert_eq!(row.productivity_gain, "+30%");
        assert_eq!(row.satisfaction, "4.2/5");
    }

    #[test]
    fn grouping_partitions_exactly() {
        let tools = vec![
            ToolRecord { category: "IDE".into(), ..tool("a", ToolStatus::Deployed, 1.0) },
            ToolRecord { category: "AGENT".into(), ..tool("b", ToolStatus::Deployed, 1.0) },
            ToolRecord { category: "IDE".into(), ..tool("c", ToolStatus::Deployed, 1.0) },
        ];
        let groups = group_by_category(&tools, |t| t.category.as_str());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "IDE");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 1);
        let total: usize = groups.iter().map(|(_, m)| m.len()).sum();
        assert_eq!(total, tools.len());
    }

    #[test]
    fn weighted_score_rejects_bad_weights() {
        let criteria = vec![
            Criterion { name: "a", weight: 0.5 },
            Criterion { name: "b", weight: 0.4 },
        ];
        assert!(weighted_score(&criteria, &[("a", 1.0), ("b", 1.0)]).is_err());
    }

    #[test]
    fn weighted_score_is_linear_sum() {
        let criteria = vec![
            Criterion { name: "a", weight: 0.7 },
            Criterion { name: "b", weight: 0.3 },
        ];
        let s = weighted_score(&criteria, &[("a", 10.0), ("b", 0.0)]).unwrap();
        assert!((s - 7.0).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let items = vec![("x", 5.0), ("y", 5.0), ("z", 9.0)];
        let ranked = rank_top_k(&items, 3, |i| i.1);
        assert_eq!(ranked[0].0, 2); // z first
        assert_eq!(ranked[1].0, 0); // x before y on equal score
        assert_eq!(ranked[2].0, 1);
    }

    #[test]
    fn tool_recommendations_exclude_owned_and_unready() {
        let mut profile = DeveloperProfile::default();
        profile.preferences.tool_interests = vec!["cursor".into()];
        let tools = vec![
            tool("github-copilot", ToolStatus::Deployed, 9.0),
            tool("cursor", ToolStatus::PilotComplete, 8.5),
            tool("windsurf", ToolStatus::Evaluation, 7.0),
            tool("old-tool", ToolStatus::Retired, 9.9),
        ];
        let recs = recommend_tools(&tools, &profile, &["github-copilot".to_string()]);
        let ids: Vec<&str> = recs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["cursor", "windsurf"]);
    }

    #[test]
    fn course_filtering_respects_level() {
        let curricula = vec![
            Curriculum {
                id: "c1".into(),
                name: "Prompt Basics".into(),
                description: String::new(),
                level: SkillLevel::Beginner,
                completion_rate: 100.0,
                satisfaction: 4.0,
            },
            Curriculum {
                id: "c2".into(),
                name: "Context Engineering".into(),
                description: String::new(),
                level: SkillLevel::Advanced,
                completion_rate: 20.0,
                satisfaction: 4.5,
            },
        ];
        assert_eq!(curricula_for_level(&curricula, SkillLevel::Beginner).len(), 1);
        assert_eq!(curricula_for_level(&curricula, SkillLevel::Advanced).len(), 2);
        let visible = curricula_for_level(&curricula, SkillLevel::Advanced);
        assert_eq!(current_course(&visible).unwrap().id, "c2");
    }

    #[test]
    fn course_score_boosts_focus_areas() {
        let mut profile = DeveloperProfile::default();
        profile.preferences.focus_areas = vec!["context-engineering".into()];
        let course = Curriculum {
            id: "c2".into(),
            name: "Advanced Context Engineering".into(),
            description: String::new(),
            level: SkillLevel::Advanced,
            completion_rate: 60.0,
            satisfaction: 4.5,
        };
        let score = course_recommendation_score(&course, &profile);
        assert!((score - (50.0 + 18.0 + 45.0)).abs() < 1e-9);
    }

    #[test]
    fn evaluation_funnel_mapping() {
        assert_eq!(evaluation_phase(ToolStatus::Discovery), "Initial screening");
        assert_eq!(evaluation_progress(ToolStatus::Evaluation), 70);
        assert_eq!(evaluation_progress(ToolStatus::Deployed), 0);
    }

    #[test]
    fn discovery_priority_rules() {
        let mut t = tool("q", ToolStatus::Discovery, 5.0);
        assert_eq!(discovery_priority(&t), DiscoveryPriority::Medium);
        t.vendor = "Amazon".into();
        assert_eq!(discovery_priority(&t), DiscoveryPriority::High);
    }

    #[test]
    fn cost_benefit_bubble_radius() {
        let mut t = tool("d", ToolStatus::Deployed, 8.0);
        t.users_count = 400;
        t.roi_calculation = Some(RoiCalculation {
            monthly_cost: 10_000.0,
            monthly_savings: 35_000.0,
            productivity_gain_percent: 30.0,
        });
        let cfg = cost_benefit_chart(&[t]);
        assert_eq!(cfg.bubbles.len(), 1);
        assert!((cfg.bubbles[0].r - 40.0).abs() < 1e-9);
    }
}
