use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Shared key every API request must present in `x-api-key`.
    /// When unset, every authenticated request is rejected.
    pub api_key: Option<String>,

    pub openai_api_key: Option<String>,
    pub openai_model: String,

    pub heygen_api_key: Option<String>,
    pub heygen_avatar_id: String,
    pub heygen_voice_id: String,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 10MB (10 * 1024 * 1024)
    pub max_payload_size: usize,

    /// Timeout applied to every provider request
    pub upstream_timeout: Duration,

    pub log_dir: String,
    pub host: String,
    pub port: u16,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match optional(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// All variables are optional:
    /// - VORTIA_API_KEY: key required in the x-api-key header
    /// - OPENAI_API_KEY, OPENAI_MODEL (default: gpt-4o)
    /// - HEYGEN_API_KEY, HEYGEN_AVATAR_ID, HEYGEN_VOICE_ID
    /// - MAX_PAYLOAD_SIZE: Maximum request payload size in bytes (default: 10485760 = 10MB)
    /// - UPSTREAM_TIMEOUT_SECS (default: 30)
    /// - LOG_DIR (default: logs), HOST (default: 127.0.0.1), PORT (default: 8080)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let upstream_timeout_secs: u64 = parsed("UPSTREAM_TIMEOUT_SECS", 30)?;
        if upstream_timeout_secs == 0 {
            return Err("UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(Config {
            api_key: optional("VORTIA_API_KEY"),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: optional("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            heygen_api_key: optional("HEYGEN_API_KEY"),
            heygen_avatar_id: optional("HEYGEN_AVATAR_ID")
                .unwrap_or_else(|| "Kristin_public_2_20240108".to_string()),
            heygen_voice_id: optional("HEYGEN_VOICE_ID")
                .unwrap_or_else(|| "es-ES-AlvaroNeural".to_string()),
            max_payload_size: parsed("MAX_PAYLOAD_SIZE", 10 * 1024 * 1024)?,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            log_dir: optional("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            host: optional("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            openai_api_key: None,
            openai_model: "gpt-4o".to_string(),
            heygen_api_key: None,
            heygen_avatar_id: "Kristin_public_2_20240108".to_string(),
            heygen_voice_id: "es-ES-AlvaroNeural".to_string(),
            max_payload_size: 10 * 1024 * 1024,
            upstream_timeout: Duration::from_secs(30),
            log_dir: "logs".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
