/// AI insight generation with a static fallback
///
/// 1. Build a prompt from the current score, health score and key issues
/// 2. Serve from cache when the same prompt was answered recently
/// 3. Call the completion provider once, bounded by a timeout and a circuit breaker
/// 4. Accept only a JSON array of exactly three strings
/// 5. On any failure, log and return the fixed fallback list
use crate::circuit_breaker::{create_insights_circuit_breaker, InsightsCircuitBreaker};
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{ChatCompletionRequest, ChatMessage, CompletionClient};
use failsafe::futures::CircuitBreaker;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Number of insights the provider must return.
pub const INSIGHT_COUNT: usize = 3;

pub const FALLBACK_INSIGHTS: [&str; INSIGHT_COUNT] = [
    "Focus on high-impact items first",
    "Consistent payment history is crucial",
    "Monitor progress monthly",
];

const SYSTEM_PROMPT: &str =
    "You are a credit repair expert. Provide concise, actionable insights.";

pub fn fallback_insights() -> Vec<String> {
    FALLBACK_INSIGHTS.iter().map(|s| s.to_string()).collect()
}

/// Tunables for the insights call.
#[derive(Debug, Clone)]
pub struct InsightsSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound for one provider round trip.
    pub timeout: Duration,
    /// Zero disables caching.
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub failure_threshold: u32,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 200,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 10_000,
            failure_threshold: 5,
        }
    }
}

impl InsightsSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            timeout: config.llm_timeout(),
            cache_ttl: Duration::from_secs(config.insights_cache_ttl_secs),
            failure_threshold: config.insights_failure_threshold,
            ..Self::default()
        }
    }
}

pub fn build_prompt(current_score: i32, health_score: u8, key_issues: &[String]) -> String {
    let issues = if key_issues.is_empty() {
        "none".to_string()
    } else {
        key_issues.join(", ")
    };

    format!(
        "Credit score: {}. Health score: {}/100. Key issues: {}. \
         Provide exactly 3 short, actionable insights as a JSON array of strings.",
        current_score, health_score, issues
    )
}

/// Validates provider output: a JSON array of exactly three strings.
pub fn parse_insights(content: &str) -> Result<Vec<String>, AppError> {
    let parsed: serde_json::Value = serde_json::from_str(content.trim()).map_err(|e| {
        AppError::ExternalApiError(format!("Insights response is not valid JSON: {}", e))
    })?;

    let items = parsed.as_array().ok_or_else(|| {
        AppError::ExternalApiError("Insights response is not a JSON array".to_string())
    })?;

    if items.len() != INSIGHT_COUNT {
        return Err(AppError::ExternalApiError(format!(
            "Expected {} insights, got {}",
            INSIGHT_COUNT,
            items.len()
        )));
    }

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                AppError::ExternalApiError("Insight entries must be strings".to_string())
            })
        })
        .collect()
}

fn prompt_cache_key(model: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(b"\n");
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Produces the three free-text insights attached to every analysis.
pub struct InsightsService {
    client: Arc<dyn CompletionClient>,
    settings: InsightsSettings,
    cache: Option<Cache<String, Vec<String>>>,
    breaker: InsightsCircuitBreaker,
}

impl InsightsService {
    pub fn new(client: Arc<dyn CompletionClient>, settings: InsightsSettings) -> Self {
        let cache = (!settings.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .time_to_live(settings.cache_ttl)
                .max_capacity(settings.cache_capacity)
                .build()
        });
        let breaker = create_insights_circuit_breaker(settings.failure_threshold);

        Self {
            client,
            settings,
            cache,
            breaker,
        }
    }

    /// Returns exactly three insights. Never fails: provider problems yield
    /// the fallback list.
    pub async fn insights_for(
        &self,
        current_score: i32,
        health_score: u8,
        key_issues: &[String],
    ) -> Vec<String> {
        let prompt = build_prompt(current_score, health_score, key_issues);
        let cache_key = prompt_cache_key(&self.settings.model, &prompt);

        if let Some(ref cache) = self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!("Insights cache hit");
                return cached;
            }
        }

        match self.request_insights(prompt).await {
            Ok(insights) => {
                if let Some(ref cache) = self.cache {
                    cache.insert(cache_key, insights.clone()).await;
                }
                insights
            }
            Err(e) => {
                tracing::warn!("AI insights unavailable, using fallback: {}", e);
                fallback_insights()
            }
        }
    }

    async fn request_insights(&self, prompt: String) -> Result<Vec<String>, AppError> {
        let request = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        let timeout = self.settings.timeout;

        let attempt = async {
            let response = tokio::time::timeout(timeout, self.client.chat_completion(&request))
                .await
                .map_err(|_| {
                    AppError::ExternalApiError(format!(
                        "Completion request timed out after {:?}",
                        timeout
                    ))
                })??;

            let content = response.first_content().ok_or_else(|| {
                AppError::ExternalApiError("Completion response has no choices".to_string())
            })?;

            parse_insights(content)
        };

        match self.breaker.call(attempt).await {
            Ok(insights) => Ok(insights),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => Err(AppError::ExternalApiError(
                "Insights circuit is open".to_string(),
            )),
        }
    }
}
