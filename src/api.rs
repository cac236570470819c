//! Typed client for the admin REST API. Every call logs method, path,
//! status and latency; a 401 surfaces as `Unauthorized` so the shell can
//! force a logout. No retries, no backoff: a failed call is the caller's
//! problem to surface.

use std::fmt;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::auth::User;
use crate::logging::log_api;

/// Marker error for a 401 response. Callers downcast to trigger the
/// forced-logout path.
#[derive(Debug)]
pub struct Unauthorized;

impl fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authentication required")
    }
}

impl std::error::Error for Unauthorized {}

pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Unauthorized>().is_some()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Job {
    pub id: i64,
    pub agent_name: String,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentApproval {
    pub id: i64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub review_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub completed_jobs: u64,
    #[serde(default)]
    pub failed_jobs: u64,
    #[serde(default)]
    pub running_jobs: u64,
    #[serde(default)]
    pub pending_approvals: u64,
    #[serde(default)]
    pub active_agents: u64,
}

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid api base url: {}", base))?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base
            .join(path)
            .with_context(|| format!("cannot resolve {}", path))?;
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T> {
        let started = Instant::now();
        let resp = req.send().await;
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        match resp {
            Ok(resp) => {
                let status = resp.status();
                log_api(method.as_str(), path, status.as_u16(), elapsed);
                if status == StatusCode::UNAUTHORIZED {
                    return Err(anyhow::Error::new(Unauthorized));
                }
                if !status.is_success() {
                    return Err(anyhow!("{} {} failed: {}", method, path, status));
                }
                Ok(resp.json().await?)
            }
            Err(err) => {
                log_api(method.as_str(), path, 0, elapsed);
                Err(err.into())
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path)?;
        self.send(Method::GET, path, req).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get_json("health").await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("stats/dashboard").await
    }

    pub async fn agents(&self) -> Result<Vec<Agent>> {
        self.get_json("agents").await
    }

    pub async fn execute_agent(&self, name: &str, parameters: Value) -> Result<Job> {
        let path = format!("agents/{}/execute", name);
        let req = self
            .request(Method::POST, &path)?
            .json(&json!({ "parameters": parameters }));
        self.send(Method::POST, &path, req).await
    }

    /// Paged job listing with an optional status filter.
    pub async fn jobs(&self, skip: u32, limit: u32, status: Option<&str>) -> Result<Vec<Job>> {
        let mut path = format!("jobs?skip={}&limit={}", skip, limit);
        if let Some(status) = status {
            path.push_str(&format!("&status={}", status));
        }
        self.get_json(&path).await
    }

    pub async fn job(&self, id: i64) -> Result<Job> {
        self.get_json(&format!("jobs/{}", id)).await
    }

    pub async fn cancel_job(&self, id: i64) -> Result<Job> {
        let path = format!("jobs/{}/cancel", id);
        let req = self.request(Method::POST, &path)?;
        self.send(Method::POST, &path, req).await
    }

    pub async fn approvals(&self, status: Option<&str>) -> Result<Vec<ContentApproval>> {
        let path = match status {
            Some(status) => format!("approvals?status={}", status),
            None => "approvals".to_string(),
        };
        self.get_json(&path).await
    }

    pub async fn approval(&self, id: i64) -> Result<ContentApproval> {
        self.get_json(&format!("approvals/{}", id)).await
    }

    pub async fn review_approval(
        &self,
        id: i64,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<ContentApproval> {
        let path = format!("approvals/{}/review", id);
        let req = self.request(Method::POST, &path)?.json(&json!({
            "approved": approve,
            "reason": reason,
        }));
        self.send(Method::POST, &path, req).await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.get_json("users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let req = self.request(Method::POST, "users")?.json(user);
        self.send(Method::POST, "users", req).await
    }

    pub async fn update_user(&self, id: i64, changes: &Value) -> Result<User> {
        let path = format!("users/{}", id);
        let req = self.request(Method::PUT, &path)?.json(changes);
        self.send(Method::PUT, &path, req).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let path = format!("users/{}", id);
        let req = self.request(Method::DELETE, &path)?;
        let _: Value = self.send(Method::DELETE, &path, req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_downcasts() {
        let err = anyhow::Error::new(Unauthorized);
        assert!(is_unauthorized(&err));
        let other = anyhow!("timeout");
        assert!(!is_unauthorized(&other));
    }

    #[test]
    fn job_parses_partial_payload() {
        let job: Job = serde_json::from_value(json!({
            "id": 7,
            "agent_name": "content_writer",
            "status": "running"
        }))
        .unwrap();
        assert_eq!(job.id, 7);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn dashboard_stats_defaults_missing_counters() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "total_jobs": 42
        }))
        .unwrap();
        assert_eq!(stats.total_jobs, 42);
        assert_eq!(stats.pending_approvals, 0);
    }

    #[test]
    fn api_base_joins_paths() {
        let client = ApiClient::new("http://localhost:8000/api/v1/", 5).unwrap();
        let req = client.request(Method::GET, "stats/dashboard");
        assert!(req.is_ok());
    }
}
