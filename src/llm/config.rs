//! Gateway configuration parsed from environment variables.

pub const SECRET_KEY_VAR: &str = "THIRDWEB_SECRET_KEY";
pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.thirdweb.com/ai";
pub const DEFAULT_GATEWAY_MODEL: &str = "t0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// `None` when the credential is absent; the proxy reports that per request.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeouts: GatewayTimeouts,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl GatewayConfig {
    /// Build typed gateway config from environment variables.
    ///
    /// Credential:
    /// - `THIRDWEB_SECRET_KEY` (blank counts as absent)
    ///
    /// Optional:
    /// - `AI_GATEWAY_BASE_URL`: default `https://api.thirdweb.com/ai`
    /// - `AI_GATEWAY_MODEL`: default `t0`
    /// - `AI_GATEWAY_REQUEST_TIMEOUT_SECS`: default 120
    /// - `AI_GATEWAY_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(SECRET_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url = std::env::var("AI_GATEWAY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = std::env::var("AI_GATEWAY_MODEL").unwrap_or_else(|_| DEFAULT_GATEWAY_MODEL.to_string());
        let timeouts = GatewayTimeouts {
            request_secs: env_parse_u64("AI_GATEWAY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AI_GATEWAY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_key, base_url, model, timeouts }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
