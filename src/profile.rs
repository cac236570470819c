//! Client-local developer profile. Lives only in the local store, never
//! synced to a server.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::SkillLevel;
use crate::store::{LocalStore, KEY_PROFILE};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeveloperProfile {
    pub name: String,
    pub level: SkillLevel,
    pub skill_points: u64,
    pub completed_courses: u32,
    pub total_courses: u32,
    pub community_rank: u32,
    /// Completion percentage per skill category, 0-100.
    pub skills: BTreeMap<String, f64>,
    #[serde(default)]
    pub completed_course_ids: Vec<String>,
    pub achievements: Vec<Achievement>,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub earned: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Preferences {
    #[serde(default)]
    pub learning_style: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub tool_interests: Vec<String>,
}

impl Default for DeveloperProfile {
    fn default() -> Self {
        let mut skills = BTreeMap::new();
        skills.insert("promptEngineering".to_string(), 85.0);
        skills.insert("contextEngineering".to_string(), 60.0);
        skills.insert("toolMastery".to_string(), 75.0);
        skills.insert("aiSecurity".to_string(), 45.0);
        Self {
            name: "Developer".to_string(),
            level: SkillLevel::Intermediate,
            skill_points: 850,
            completed_courses: 7,
            total_courses: 12,
            community_rank: 23,
            skills,
            completed_course_ids: Vec::new(),
            achievements: vec![
                Achievement {
                    id: "prompt-master".to_string(),
                    name: "Prompt Master".to_string(),
                    description: "Completed advanced prompt engineering".to_string(),
                    earned: true,
                },
                Achievement {
                    id: "tool-explorer".to_string(),
                    name: "Tool Explorer".to_string(),
                    description: "Tested 5 different AI coding tools".to_string(),
                    earned: true,
                },
                Achievement {
                    id: "community-contributor".to_string(),
                    name: "Community Contributor".to_string(),
                    description: "Shared 3 prompt patterns".to_string(),
                    earned: true,
                },
            ],
            preferences: Preferences {
                learning_style: "hands-on".to_string(),
                focus_areas: vec![
                    "context-engineering".to_string(),
                    "advanced-prompting".to_string(),
                ],
                tool_interests: vec!["cursor".to_string(), "claude-code".to_string()],
            },
        }
    }
}

impl DeveloperProfile {
    /// Load from the local store, materializing the default profile when
    /// absent or unreadable.
    pub fn load_or_default(store: &LocalStore) -> Result<Self> {
        Ok(store.get_json(KEY_PROFILE)?.unwrap_or_default())
    }

    pub fn save(&self, store: &mut LocalStore) -> Result<()> {
        store.set_json(KEY_PROFILE, self)
    }

    /// Mean of all skill percentages, the hub's "overall progress" bar.
    pub fn overall_progress(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        self.skills.values().sum::<f64>() / self.skills.len() as f64
    }

    /// Apply assessment results: bounded per-skill increments, clamped to
    /// 100. Unknown skills are ignored rather than created.
    pub fn apply_assessment(&mut self, improvements: &[(&str, f64)]) {
        for (skill, delta) in improvements {
            if let Some(current) = self.skills.get_mut(*skill) {
                *current = (*current + delta).min(100.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_shape() {
        let p = DeveloperProfile::default();
        assert_eq!(p.level, SkillLevel::Intermediate);
        assert_eq!(p.skills.len(), 4);
        assert_eq!(p.achievements.len(), 3);
        assert!((p.overall_progress() - 66.25).abs() < 1e-9);
    }

    #[test]
    fn assessment_clamps_at_100() {
        let mut p = DeveloperProfile::default();
        p.apply_assessment(&[("promptEngineering", 50.0), ("unknownSkill", 10.0)]);
        assert_eq!(p.skills["promptEngineering"], 100.0);
        assert!(!p.skills.contains_key("unknownSkill"));
    }

    #[test]
    fn roundtrips_through_store() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let mut p = DeveloperProfile::load_or_default(&store).unwrap();
        p.skill_points = 900;
        p.save(&mut store).unwrap();
        let loaded = DeveloperProfile::load_or_default(&store).unwrap();
        assert_eq!(loaded.skill_points, 900);
    }
}
