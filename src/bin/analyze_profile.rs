//! Runs analysis, timeline and action plan for a profile stored as JSON.
//!
//! Usage: `analyze-profile <profile.json> [goal_score] [timeframe_months]`

use anyhow::Context;
use credit_insights_api::action_plan::generate_action_plan;
use credit_insights_api::analyzer::CreditAnalyzer;
use credit_insights_api::config::Config;
use credit_insights_api::insights::InsightsSettings;
use credit_insights_api::llm_client::OpenAiClient;
use credit_insights_api::models::CreditProfile;
use credit_insights_api::timeline::predict_score_timeline;
use serde_json::json;
use std::sync::Arc;

const DEFAULT_GOAL_SCORE: i32 = 750;
const DEFAULT_TIMEFRAME_MONTHS: u32 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_insights_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("Usage: analyze-profile <profile.json> [goal_score] [timeframe_months]")?;
    let goal_score = match args.next() {
        Some(raw) => raw.parse().context("goal_score must be an integer")?,
        None => DEFAULT_GOAL_SCORE,
    };
    let timeframe_months = match args.next() {
        Some(raw) => raw
            .parse()
            .context("timeframe_months must be a positive integer")?,
        None => DEFAULT_TIMEFRAME_MONTHS,
    };

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let profile: CreditProfile =
        serde_json::from_str(&raw).with_context(|| format!("Invalid profile JSON in {}", path))?;

    let config = Config::from_env()?;
    let client = OpenAiClient::from_config(&config)?;
    let analyzer = CreditAnalyzer::new(Arc::new(client), InsightsSettings::from_config(&config));

    let analysis = analyzer.analyze_credit_profile(&profile).await;
    let timeline = predict_score_timeline(profile.current_score, goal_score, &profile)?;
    let plan = generate_action_plan(&profile, &analysis, goal_score, timeframe_months)?;

    let report = json!({
        "analysis": analysis,
        "timeline": timeline,
        "plan": plan,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
