//! Developer hub: personal stats, skill progress, the learning path and
//! tool recommendations. The page is personalized from the locally stored
//! profile and refreshes on demand only.

use crate::format;
use crate::model::PatternEntry;
use crate::profile::DeveloperProfile;
use crate::repository::Snapshot;
use crate::view::{
    current_course, curricula_for_level, recommend_courses, recommend_tools,
    tool_recommendation_score,
};

#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub level: String,
    pub courses_completed: String,
    pub skill_points: String,
    pub community_rank: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseCard {
    pub name: String,
    pub level: &'static str,
    pub completion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolRecommendation {
    pub name: String,
    /// Recommendation score projected onto a 0-100 "match" scale.
    pub match_percent: String,
    pub cost: String,
}

#[derive(Debug, Clone)]
pub struct DeveloperView {
    pub stats: UserStats,
    /// Per-skill completion plus the overall mean, both 0-100.
    pub skills: Vec<(String, f64)>,
    pub overall_progress: f64,
    pub current_course: Option<CourseCard>,
    pub recommended_courses: Vec<CourseCard>,
    pub recommended_tools: Vec<ToolRecommendation>,
    pub community_patterns: Vec<PatternEntry>,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub fn user_stats(profile: &DeveloperProfile) -> UserStats {
    UserStats {
        level: capitalize(profile.level.as_str()),
        courses_completed: format!("{}/{}", profile.completed_courses, profile.total_courses),
        skill_points: format::number(profile.skill_points),
        community_rank: format!("#{}", profile.community_rank),
    }
}

fn course_card(course: &crate::model::Curriculum) -> CourseCard {
    CourseCard {
        name: course.name.clone(),
        level: match course.level {
            crate::model::SkillLevel::Beginner => "Beginner",
            crate::model::SkillLevel::Intermediate => "Intermediate",
            crate::model::SkillLevel::Advanced => "Advanced",
        },
        completion: format::percent_whole(course.completion_rate),
    }
}

/// Match percentage for a tool card: the 0-10 recommendation score scaled
/// to 0-100 and capped.
pub fn match_percent(score: f64) -> String {
    format!("{:.0}%", (score * 10.0).round().min(100.0))
}

fn cost_label(cost: Option<f64>) -> String {
    match cost {
        Some(c) if c > 0.0 => format!("${:.0}/month", c),
        _ => "Free".to_string(),
    }
}

/// Tools the developer already runs. Until per-user inventory exists the
/// org-wide default applies: everyone has Copilot.
pub fn user_tools(_profile: &DeveloperProfile) -> Vec<String> {
    vec!["github-copilot".to_string()]
}

/// Pure derivation of the whole page; no IO, no chart widgets.
pub fn render(snapshot: &Snapshot, profile: &DeveloperProfile) -> DeveloperView {
    let visible = curricula_for_level(&snapshot.training.curricula, profile.level);
    let current = current_course(&visible).map(course_card);

    let user_tools = user_tools(profile);
    let tools = recommend_tools(&snapshot.tools.tools, profile, &user_tools)
        .into_iter()
        .map(|t| ToolRecommendation {
            name: t.name.clone(),
            match_percent: match_percent(tool_recommendation_score(t, profile)),
            cost: cost_label(t.cost_per_user_monthly),
        })
        .collect();

    let patterns = snapshot
        .training
        .community_contributions
        .iter()
        .flat_map(|c| c.top_patterns.iter())
        .take(3)
        .cloned()
        .collect();

    DeveloperView {
        stats: user_stats(profile),
        skills: profile
            .skills
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect(),
        overall_progress: profile.overall_progress(),
        current_course: current,
        recommended_courses: recommend_courses(&snapshot.training.curricula, profile)
            .into_iter()
            .map(course_card)
            .collect(),
        recommended_tools: tools,
        community_patterns: patterns,
    }
}
