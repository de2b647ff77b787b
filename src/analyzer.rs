use crate::insights::{InsightsService, InsightsSettings};
use crate::llm_client::CompletionClient;
use crate::models::{AnalysisResult, CreditProfile};
use crate::scoring;
use std::sync::Arc;
use std::time::Instant;

/// Runs the full profile analysis.
///
/// Every section except `ai_insights` is a pure function of the profile.
/// Insight generation is the only I/O and degrades to a fixed list, so
/// analysis itself never fails.
pub struct CreditAnalyzer {
    insights: InsightsService,
}

impl CreditAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>, settings: InsightsSettings) -> Self {
        Self {
            insights: InsightsService::new(client, settings),
        }
    }

    pub async fn analyze_credit_profile(&self, profile: &CreditProfile) -> AnalysisResult {
        let started = Instant::now();
        tracing::info!(
            "Analyzing credit profile: score {}, {} negative items",
            profile.current_score,
            profile.negative_items.len()
        );

        let health_score = scoring::calculate_health_score(profile);
        let key_issues = scoring::identify_key_issues(profile);
        let estimated_impact = scoring::calculate_potential_impact(profile);
        let recommendations = scoring::generate_recommendations(profile, &estimated_impact);
        let compliance_issues = scoring::check_compliance(profile);

        tracing::debug!(
            "Health {} with {} key issues, {} compliance flags",
            health_score,
            key_issues.len(),
            compliance_issues.len()
        );

        let ai_insights = self
            .insights
            .insights_for(profile.current_score, health_score, &key_issues)
            .await;

        let result = AnalysisResult {
            health_score,
            overall_health: scoring::overall_health(health_score),
            strengths: scoring::identify_strengths(profile),
            risk_factors: scoring::identify_risk_factors(profile),
            opportunities: scoring::identify_opportunities(profile),
            fico_factors: scoring::analyze_fico_factors(profile),
            data_completeness: scoring::calculate_data_completeness(profile),
            key_issues,
            estimated_impact,
            compliance_issues,
            recommendations,
            ai_insights,
        };

        tracing::info!(
            "Analysis complete in {:?}: health {} ({:?}), {} recommendations, {}% data completeness",
            started.elapsed(),
            result.health_score,
            result.overall_health,
            result.recommendations.len(),
            result.data_completeness
        );

        result
    }
}
