use crate::action_plan::generate_action_plan;
use crate::analyzer::CreditAnalyzer;
use crate::config::Config;
use crate::dispute::calculate_dispute_success;
use crate::errors::{AppError, ResultExt};
use crate::models::*;
use crate::timeline::predict_score_timeline;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Analyzer with its insights client, cache and circuit breaker.
    pub analyzer: Arc<CreditAnalyzer>,
}

/// Analysis and planning endpoints, without rate limiting or docs.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/analysis", post(analyze_profile))
        .route("/api/v1/disputes/success", post(dispute_success))
        .route("/api/v1/timeline", post(score_timeline))
        .route("/api/v1/action-plan", post(action_plan))
}

/// Health check endpoint.
///
/// Returns the service status, version and the configured completion model.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "credit-insights-api",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.config.llm_model,
        })),
    )
}

/// POST /api/v1/analysis
///
/// Full profile analysis. Always succeeds for a well-formed profile; the
/// insights section falls back to fixed text when the provider is down.
pub async fn analyze_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<CreditProfile>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        "[{}] POST /analysis - score {}, {} negative items",
        request_id,
        profile.current_score,
        profile.negative_items.len()
    );

    let analysis = state.analyzer.analyze_credit_profile(&profile).await;

    tracing::info!(
        "[{}] Analysis returned health {} ({:?})",
        request_id,
        analysis.health_score,
        analysis.overall_health
    );

    Ok(Json(AnalysisResponse {
        request_id,
        analyzed_at: chrono::Utc::now(),
        analysis,
    }))
}

/// POST /api/v1/disputes/success
pub async fn dispute_success(
    Json(item): Json<NegativeItem>,
) -> Result<Json<DisputeSuccessResponse>, AppError> {
    let success_probability = calculate_dispute_success(&item);
    tracing::info!(
        "POST /disputes/success - {} aged {} years: {}%",
        item.kind.label(),
        item.age,
        success_probability
    );

    Ok(Json(DisputeSuccessResponse {
        success_probability,
    }))
}

/// POST /api/v1/timeline
pub async fn score_timeline(
    Json(request): Json<TimelineRequest>,
) -> Result<Json<ScoreTimeline>, AppError> {
    tracing::info!(
        "POST /timeline - {} -> {}",
        request.current_score,
        request.goal_score
    );

    let timeline =
        predict_score_timeline(request.current_score, request.goal_score, &request.profile)?;
    Ok(Json(timeline))
}

/// POST /api/v1/action-plan
///
/// Analyzes the profile first, then builds the plan from that analysis.
pub async fn action_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionPlanRequest>,
) -> Result<Json<ActionPlanResponse>, AppError> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        "[{}] POST /action-plan - goal {} in {} months",
        request_id,
        request.goal_score,
        request.timeframe
    );

    let analysis = state.analyzer.analyze_credit_profile(&request.profile).await;
    let plan = generate_action_plan(
        &request.profile,
        &analysis,
        request.goal_score,
        request.timeframe,
    )
    .with_context(|| format!("Action plan request {}", request_id))?;

    tracing::info!(
        "[{}] Plan ready: {} phases, {} milestones",
        request_id,
        plan.phases.len(),
        plan.milestones.len()
    );

    Ok(Json(ActionPlanResponse {
        request_id,
        analysis,
        plan,
    }))
}
