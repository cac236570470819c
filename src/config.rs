//! Runtime configuration, sourced from the environment with defaults that
//! match the published site layout.

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL or directory for the static JSON documents. Pages resolve
    /// `metrics.json` etc. relative to this, so the value is
    /// path-context-sensitive (`data/` at the site root, `../data/` one
    /// level down).
    pub data_base: String,
    /// Operations REST API base URL.
    pub api_base: String,
    /// Text-completion endpoint for AI insight generation.
    pub ai_endpoint: String,
    pub executive_refresh_secs: u64,
    pub strategy_refresh_secs: u64,
    pub http_timeout_secs: u64,
    /// SQLite path for the local key-value store.
    pub store_path: String,
    pub export_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_base: std::env::var("DATA_BASE").unwrap_or_else(|_| "data".to_string()),
            api_base: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ai_endpoint: std::env::var("AI_ENDPOINT").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
                    .to_string()
            }),
            executive_refresh_secs: std::env::var("EXEC_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            strategy_refresh_secs: std::env::var("STRATEGY_REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            store_path: std::env::var("STORE_PATH").unwrap_or_else(|_| "hub.db".to_string()),
            export_dir: std::env::var("EXPORT_DIR").unwrap_or_else(|_| "out/exports".to_string()),
        }
    }
}
