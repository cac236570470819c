//! Tool discovery pipeline and evaluation scoring.
//!
//! Discovery sources are mocked rankings of known entries, not a real
//! ingestion system; the pipeline's job is deduplication and ranking. The
//! evaluation engine carries the weighted scoring model used whenever a
//! candidate gets a formal look.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

use crate::logging::{log, obj, v_str, Domain, Level};
use crate::view::{weighted_score, Criterion};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredTool {
    pub name: String,
    pub score: f64,
    pub source: String,
}

#[async_trait]
pub trait DiscoverySource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn discover(&self) -> Result<Vec<DiscoveredTool>>;
}

pub struct GitHubTrendingSource;

#[async_trait]
impl DiscoverySource for GitHubTrendingSource {
    fn name(&self) -> &'static str {
        "github_trending"
    }

    async fn discover(&self) -> Result<Vec<DiscoveredTool>> {
        Ok(vec![
            DiscoveredTool {
                name: "Windsurf IDE".to_string(),
                score: 85.0,
                source: "GitHub".to_string(),
            },
            DiscoveredTool {
                name: "Continue.dev".to_string(),
                score: 78.0,
                source: "GitHub".to_string(),
            },
        ])
    }
}

pub struct ProductHuntSource;

#[async_trait]
impl DiscoverySource for ProductHuntSource {
    fn name(&self) -> &'static str {
        "product_hunt"
    }

    async fn discover(&self) -> Result<Vec<DiscoveredTool>> {
        Ok(vec![DiscoveredTool {
            name: "Replit Agent".to_string(),
            score: 82.0,
            source: "Product Hunt".to_string(),
        }])
    }
}

pub struct TechNewsSource;

#[async_trait]
impl DiscoverySource for TechNewsSource {
    fn name(&self) -> &'static str {
        "tech_news"
    }

    async fn discover(&self) -> Result<Vec<DiscoveredTool>> {
        Ok(vec![DiscoveredTool {
            name: "Claude Desktop".to_string(),
            score: 80.0,
            source: "Tech News".to_string(),
        }])
    }
}

pub struct ToolDiscoveryPipeline {
    sources: Vec<Box<dyn DiscoverySource>>,
}

impl Default for ToolDiscoveryPipeline {
    fn default() -> Self {
        Self {
            sources: vec![
                Box::new(GitHubTrendingSource),
                Box::new(ProductHuntSource),
                Box::new(TechNewsSource),
            ],
        }
    }
}

impl ToolDiscoveryPipeline {
    pub fn new(sources: Vec<Box<dyn DiscoverySource>>) -> Self {
        Self { sources }
    }

    /// Run every source, skipping (and logging) the ones that fail, then
    /// deduplicate by name (first occurrence wins), rank by score
    /// descending with stable ties, and keep the top 10.
    pub async fn run(&self) -> Vec<DiscoveredTool> {
        let mut discoveries = Vec::new();
        for source in &self.sources {
            match source.discover().await {
                Ok(results) => discoveries.extend(results),
                Err(err) => log(
                    Level::Warn,
                    Domain::Discovery,
                    "source_failed",
                    obj(&[
                        ("source", v_str(source.name())),
                        ("msg", v_str(&err.to_string())),
                    ]),
                ),
            }
        }
        dedupe_and_rank(discoveries)
    }
}

fn dedupe_and_rank(discoveries: Vec<DiscoveredTool>) -> Vec<DiscoveredTool> {
    let mut unique: Vec<DiscoveredTool> = Vec::new();
    for d in discoveries {
        if !unique.iter().any(|u| u.name == d.name) {
            unique.push(d);
        }
    }
    unique.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    unique.truncate(10);
    unique
}

/// The five evaluation criteria and their fixed weights (sum 1.0).
pub fn evaluation_criteria() -> Vec<Criterion> {
    vec![
        Criterion { name: "technical_capabilities", weight: 0.30 },
        Criterion { name: "enterprise_readiness", weight: 0.25 },
        Criterion { name: "cost_effectiveness", weight: 0.20 },
        Criterion { name: "integration_ease", weight: 0.15 },
        Criterion { name: "security_compliance", weight: 0.10 },
    ]
}

pub struct ToolEvaluationEngine {
    criteria: Vec<Criterion>,
}

impl Default for ToolEvaluationEngine {
    fn default() -> Self {
        Self {
            criteria: evaluation_criteria(),
        }
    }
}

impl ToolEvaluationEngine {
    /// Weighted overall score from per-criterion scores on the 0-10 scale.
    pub fn overall_score(&self, scores: &[(&str, f64)]) -> Result<f64> {
        weighted_score(&self.criteria, scores)
    }

    /// Placeholder scoring until a real evaluation lands: uniform 0-10 per
    /// criterion.
    pub fn simulate_scores(&self) -> Vec<(&'static str, f64)> {
        let mut rng = rand::thread_rng();
        self.criteria
            .iter()
            .map(|c| (c.name, rng.gen_range(0.0..10.0)))
            .collect()
    }
}
