use serde::Deserialize;
use std::time::Duration;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
    pub insights_cache_ttl_secs: u64,
    pub insights_failure_threshold: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let llm_base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !llm_base_url.starts_with("http://") && !llm_base_url.starts_with("https://") {
            anyhow::bail!("LLM_BASE_URL must start with http:// or https://");
        }

        let llm_model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        if llm_model.trim().is_empty() {
            anyhow::bail!("LLM_MODEL cannot be empty");
        }

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .map_err(|_| {
                    anyhow::anyhow!("LLM_API_KEY or OPENAI_API_KEY environment variable required")
                })
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("LLM_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            llm_base_url,
            llm_model,
            llm_temperature: std::env::var("LLM_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse::<f32>()
                .map_err(|_| anyhow::anyhow!("LLM_TEMPERATURE must be a number"))
                .and_then(|t| {
                    if !(0.0..=2.0).contains(&t) {
                        anyhow::bail!("LLM_TEMPERATURE must be between 0 and 2");
                    }
                    Ok(t)
                })?,
            llm_max_tokens: parse_positive("LLM_MAX_TOKENS", 200)?,
            llm_timeout_secs: parse_positive("LLM_TIMEOUT_SECS", 10)?,
            insights_cache_ttl_secs: std::env::var("INSIGHTS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("INSIGHTS_CACHE_TTL_SECS must be an integer"))?,
            insights_failure_threshold: parse_positive("INSIGHTS_FAILURE_THRESHOLD", 5)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("LLM Base URL: {}", config.llm_base_url);
        tracing::debug!("LLM Model: {}", config.llm_model);
        tracing::debug!("LLM Timeout: {}s", config.llm_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

/// Reads a strictly positive integer, falling back to `default` when unset.
fn parse_positive<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + Default + Copy,
{
    let Ok(raw) = std::env::var(name) else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a positive integer", name))?;
    if value <= T::default() {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(value)
}
