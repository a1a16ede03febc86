//! Gateway configuration read from the environment

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

pub const API_BASE_ENV: &str = "TASKMAN_API_BASE";
pub const NO_PROXY_ENV: &str = "TASKMAN_NO_PROXY";

/// Where and how the gateway reaches the task API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL the `/tasks` paths are appended to
    pub base_url: String,
    /// Bypass any system proxy
    pub no_proxy: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            no_proxy: false,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            no_proxy: false,
        }
    }

    /// Build from `TASKMAN_API_BASE` and `TASKMAN_NO_PROXY`
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            base_url: normalize_base_url(&base_url),
            no_proxy: env_flag(NO_PROXY_ENV, false),
        }
    }

    pub fn with_no_proxy(mut self, no_proxy: bool) -> Self {
        self.no_proxy = no_proxy;
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => parse_flag(&raw).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
