//! Document access behind a trait, so pages can run against live HTTP, a
//! local site checkout, or an in-memory double in tests.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::logging::log_fetch;
use crate::model::{MetricsDocument, ToolsDocument, TrainingDocument};

/// One coherent view of the three published documents. Pages derive every
/// widget from a snapshot; snapshots are immutable once loaded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub metrics: MetricsDocument,
    pub tools: ToolsDocument,
    pub training: TrainingDocument,
}

#[async_trait]
pub trait DataRepository: Send + Sync {
    async fn metrics(&self) -> Result<MetricsDocument>;
    async fn tools(&self) -> Result<ToolsDocument>;
    async fn training(&self) -> Result<TrainingDocument>;
}

/// Fan-out the three fetches and join all-or-nothing: any single failure
/// fails the load and commits no partial state.
pub async fn load_snapshot(repo: &dyn DataRepository) -> Result<Snapshot> {
    let (metrics, tools, training) =
        tokio::try_join!(repo.metrics(), repo.tools(), repo.training())?;
    Ok(Snapshot {
        metrics,
        tools,
        training,
    })
}

/// Live repository over the published site. The base URL is
/// path-context-sensitive: the homepage uses `data/`, nested pages
/// `../data/`, so callers pass the base that matches their location.
pub struct HttpRepository {
    client: Client,
    base: Url,
}

impl HttpRepository {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid data base url: {}", base))?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base,
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let url = self
            .base
            .join(resource)
            .with_context(|| format!("cannot resolve {}", resource))?;
        let started = Instant::now();
        let result: Result<T> = async {
            let resp = self.client.get(url.clone()).send().await?;
            if !resp.status().is_success() {
                return Err(anyhow!("failed to load {}: {}", resource, resp.status()));
            }
            Ok(resp.json::<T>().await?)
        }
        .await;
        log_fetch(
            resource,
            started.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );
        result
    }
}

#[async_trait]
impl DataRepository for HttpRepository {
    async fn metrics(&self) -> Result<MetricsDocument> {
        self.fetch_json("metrics.json").await
    }

    async fn tools(&self) -> Result<ToolsDocument> {
        self.fetch_json("tools.json").await
    }

    async fn training(&self) -> Result<TrainingDocument> {
        self.fetch_json("training.json").await
    }
}

/// Repository over a local checkout of the static site data directory.
pub struct FsRepository {
    dir: PathBuf,
}

impl FsRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let path = self.dir.join(resource);
        let started = Instant::now();
        let result: Result<T> = (|| {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))
        })();
        log_fetch(
            resource,
            started.elapsed().as_secs_f64() * 1000.0,
            result.is_ok(),
        );
        result
    }
}

#[async_trait]
impl DataRepository for FsRepository {
    async fn metrics(&self) -> Result<MetricsDocument> {
        self.read_json("metrics.json")
    }

    async fn tools(&self) -> Result<ToolsDocument> {
        self.read_json("tools.json")
    }

    async fn training(&self) -> Result<TrainingDocument> {
        self.read_json("training.json")
    }
}

/// In-memory test double. `fail` poisons every fetch, for exercising the
/// all-or-nothing join and the page error paths.
pub struct InMemoryRepository {
    pub snapshot: Snapshot,
    pub fail: bool,
}

impl InMemoryRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            fail: false,
        }
    }

    pub fn failing(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            fail: true,
        }
    }
}

#[async_trait]
impl DataRepository for InMemoryRepository {
    async fn metrics(&self) -> Result<MetricsDocument> {
        if self.fail {
            return Err(anyhow!("metrics fetch failed"));
        }
        Ok(self.snapshot.metrics.clone())
    }

    async fn tools(&self) -> Result<ToolsDocument> {
        if self.fail {
            return Err(anyhow!("tools fetch failed"));
        }
        Ok(self.snapshot.tools.clone())
    }

    async fn training(&self) -> Result<TrainingDocument> {
        if self.fail {
            return Err(anyhow!("training fetch failed"));
        }
        Ok(self.snapshot.training.clone())
    }
}
