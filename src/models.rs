use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_CURRENT_SCORE: i32 = 650;

// ============ Input Models ============

/// Normalized credit profile supplied by the caller.
///
/// Every sequence defaults to empty and every count to zero, so a payload
/// such as `{"currentScore": 650}` is a valid profile. `age_of_credit` stays
/// optional: an unknown age triggers none of the age rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCreditProfile")]
pub struct CreditProfile {
    /// FICO-range score. Not validated, passed through the arithmetic as-is.
    pub current_score: i32,
    pub negative_items: Vec<NegativeItem>,
    /// Opaque accounts in good standing; only the count matters.
    pub positive_items: Vec<serde_json::Value>,
    /// Revolving utilization percentage. May exceed 100.
    pub utilization: f64,
    /// Age of credit in years, `None` when unknown.
    pub age_of_credit: Option<f64>,
    pub hard_inquiries: u32,
    pub public_records: u32,
    pub collections: Vec<CollectionAccount>,
    pub late_payments: Vec<LatePayment>,
    pub tradelines: Vec<Tradeline>,
    /// Which defaulted scalars the caller actually sent.
    #[serde(skip)]
    pub supplied: SuppliedFields,
}

/// Presence of scalar inputs that would otherwise be indistinguishable
/// from their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuppliedFields {
    pub current_score: bool,
    pub utilization: bool,
    pub hard_inquiries: bool,
}

/// Wire shape of [`CreditProfile`]. Absent and `null` scalars stay `None`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCreditProfile {
    current_score: Option<i32>,
    #[serde(default)]
    negative_items: Vec<NegativeItem>,
    #[serde(default)]
    positive_items: Vec<serde_json::Value>,
    utilization: Option<f64>,
    age_of_credit: Option<f64>,
    hard_inquiries: Option<u32>,
    public_records: Option<u32>,
    #[serde(default)]
    collections: Vec<CollectionAccount>,
    #[serde(default)]
    late_payments: Vec<LatePayment>,
    #[serde(default)]
    tradelines: Vec<Tradeline>,
}

impl From<RawCreditProfile> for CreditProfile {
    fn from(raw: RawCreditProfile) -> Self {
        Self {
            supplied: SuppliedFields {
                current_score: raw.current_score.is_some(),
                utilization: raw.utilization.is_some(),
                hard_inquiries: raw.hard_inquiries.is_some(),
            },
            current_score: raw.current_score.unwrap_or(DEFAULT_CURRENT_SCORE),
            negative_items: raw.negative_items,
            positive_items: raw.positive_items,
            utilization: raw.utilization.unwrap_or_default(),
            age_of_credit: raw.age_of_credit,
            hard_inquiries: raw.hard_inquiries.unwrap_or_default(),
            public_records: raw.public_records.unwrap_or_default(),
            collections: raw.collections,
            late_payments: raw.late_payments,
            tradelines: raw.tradelines,
        }
    }
}

impl Default for CreditProfile {
    fn default() -> Self {
        Self {
            current_score: DEFAULT_CURRENT_SCORE,
            negative_items: Vec::new(),
            positive_items: Vec::new(),
            utilization: 0.0,
            age_of_credit: None,
            hard_inquiries: 0,
            public_records: 0,
            collections: Vec::new(),
            late_payments: Vec::new(),
            tradelines: Vec::new(),
            supplied: SuppliedFields::default(),
        }
    }
}

impl CreditProfile {
    /// True when the age is known and strictly below `years`.
    pub fn credit_age_below(&self, years: f64) -> bool {
        self.age_of_credit.is_some_and(|age| age < years)
    }

    /// True when the age is known and strictly above `years`.
    pub fn credit_age_above(&self, years: f64) -> bool {
        self.age_of_credit.is_some_and(|age| age > years)
    }

    pub fn count_negative(&self, kind: NegativeItemType) -> usize {
        self.negative_items.iter().filter(|i| i.kind == kind).count()
    }

    /// Late payments dated less than 12 months before `now`. Undated or
    /// unparseable entries never count.
    pub fn recent_late_payments(&self, now: DateTime<Utc>) -> usize {
        self.late_payments
            .iter()
            .filter_map(|lp| lp.months_before(now))
            .filter(|months| *months < 12.0)
            .count()
    }

    /// Number of distinct tradeline account types, ignoring untyped entries.
    pub fn distinct_account_types(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for t in &self.tradelines {
            if let Some(ref account_type) = t.account_type {
                if !seen.contains(&account_type.as_str()) {
                    seen.push(account_type);
                }
            }
        }
        seen.len()
    }
}

/// Category of a derogatory entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NegativeItemType {
    Inquiry,
    Collection,
    LatePayment,
    #[serde(alias = "chargeOff", alias = "charge_off")]
    Chargeoff,
    Bankruptcy,
    Judgment,
    #[default]
    #[serde(other)]
    Other,
}

impl NegativeItemType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inquiry => "inquiry",
            Self::Collection => "collection",
            Self::LatePayment => "late payment",
            Self::Chargeoff => "charge-off",
            Self::Bankruptcy => "bankruptcy",
            Self::Judgment => "judgment",
            Self::Other => "negative item",
        }
    }
}

/// A derogatory credit-report entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NegativeItem {
    #[serde(rename = "type")]
    pub kind: NegativeItemType,
    /// Age in years, may be fractional.
    pub age: f64,
    pub amount: Option<f64>,
    pub verified: bool,
    pub bureau: Option<String>,
    pub creditor_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionAccount {
    pub amount: f64,
    pub validation_received: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatePayment {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub date: Option<String>,
}

impl LatePayment {
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
        }
    }

    /// Age in 30-day months relative to `now`. Negative for future dates.
    pub fn months_before(&self, now: DateTime<Utc>) -> Option<f64> {
        let raw = self.date.as_deref()?.trim();
        let reported = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })?;
        let days = (now - reported).num_seconds() as f64 / 86_400.0;
        Some(days / 30.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tradeline {
    pub account_type: Option<String>,
}

// ============ Analysis Output ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// Point estimates of how much each kind of improvement could add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedImpact {
    pub removing_negatives: u64,
    /// Grows with utilization, which is never clamped.
    pub improving_utilization: u64,
    pub adding_positives: u64,
    pub aging_accounts: u64,
    /// Always the sum of the four fields above.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub impact: String,
    pub timeframe: String,
    /// Estimated score gain in points.
    pub expected_gain: u64,
}

/// One weighted FICO category with its sub-score (0-100) and findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FicoFactor {
    pub weight: f64,
    pub score: u32,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FicoFactors {
    pub payment_history: FicoFactor,
    pub amounts_owed: FicoFactor,
    pub length_of_history: FicoFactor,
    pub credit_mix: FicoFactor,
    pub new_credit: FicoFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Composite 0-100 health score, not a FICO score.
    pub health_score: u8,
    pub overall_health: OverallHealth,
    pub key_issues: Vec<String>,
    pub strengths: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub estimated_impact: EstimatedImpact,
    pub compliance_issues: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub fico_factors: FicoFactors,
    /// Percentage (0-100) of the seven core inputs that were supplied.
    pub data_completeness: u8,
    /// Exactly three entries.
    pub ai_insights: Vec<String>,
}

// ============ Timeline ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreProjection {
    pub month: u32,
    pub score: i32,
    pub confidence: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTimeline {
    pub estimated_months: u32,
    pub projections: Vec<ScoreProjection>,
    pub achievable: bool,
    pub monthly_rate: i32,
}

// ============ Action Plan ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAction {
    pub action: String,
    pub priority: Priority,
    /// Points this action contributes to its phase.
    pub impact: i32,
    pub effort: Effort,
    pub timeline: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPhase {
    /// 1-based position.
    pub phase: u32,
    pub name: String,
    pub duration: String,
    pub goals: Vec<String>,
    pub actions: Vec<PlanAction>,
    pub expected_score_change: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub week: u32,
    pub milestone: String,
    pub expected_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    pub goal_score: i32,
    pub timeframe_months: u32,
    pub phases: Vec<PlanPhase>,
    pub quick_wins: Vec<String>,
    pub long_term_strategies: Vec<String>,
    pub avoid_actions: Vec<String>,
    pub milestones: Vec<Milestone>,
}

// ============ API Request/Response Models ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub request_id: uuid::Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSuccessResponse {
    pub success_probability: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRequest {
    pub current_score: i32,
    pub goal_score: i32,
    #[serde(default)]
    pub profile: CreditProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlanRequest {
    pub profile: CreditProfile,
    pub goal_score: i32,
    /// Target timeframe in months.
    pub timeframe: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlanResponse {
    pub request_id: uuid::Uuid,
    pub analysis: AnalysisResult,
    pub plan: ActionPlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_profile_defaults() {
        let profile: CreditProfile = serde_json::from_value(json!({"currentScore": 650})).unwrap();

        assert_eq!(profile.current_score, 650);
        assert!(profile.negative_items.is_empty());
        assert!(profile.collections.is_empty());
        assert_eq!(profile.utilization, 0.0);
        assert_eq!(profile.age_of_credit, None);
        assert_eq!(profile.hard_inquiries, 0);
    }

    #[test]
    fn test_missing_current_score_defaults_to_650() {
        let profile: CreditProfile = serde_json::from_value(json!({})).unwrap();
        assert_eq!(profile.current_score, 650);
    }

    #[test]
    fn test_supplied_fields_track_presence() {
        let empty: CreditProfile = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.supplied, SuppliedFields::default());

        let zeroed: CreditProfile =
            serde_json::from_value(json!({"utilization": 0, "hardInquiries": null})).unwrap();
        assert!(zeroed.supplied.utilization);
        assert!(!zeroed.supplied.hard_inquiries);
        assert!(!zeroed.supplied.current_score);
        assert_eq!(zeroed.hard_inquiries, 0);
    }

    #[test]
    fn test_late_payment_age_in_months() {
        let now = DateTime::parse_from_rfc3339("2024-07-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let months = LatePayment::on("2024-01-03").months_before(now).unwrap();
        // 180 days at 30 days a month
        assert!((months - 6.0).abs() < 1e-9);
        assert!(LatePayment::on("2023-06-01T12:00:00+00:00")
            .months_before(now)
            .is_some());
        assert_eq!(LatePayment::on("yesterday").months_before(now), None);
        assert_eq!(LatePayment::default().months_before(now), None);
    }

    #[test]
    fn test_negative_item_type_parsing() {
        let items: Vec<NegativeItem> = serde_json::from_value(json!([
            {"type": "latePayment", "age": 1.5},
            {"type": "chargeoff", "age": 2},
            {"type": "chargeOff", "age": 2},
            {"type": "medicalDebt", "age": 4},
            {"age": 1}
        ]))
        .unwrap();

        assert_eq!(items[0].kind, NegativeItemType::LatePayment);
        assert_eq!(items[1].kind, NegativeItemType::Chargeoff);
        assert_eq!(items[2].kind, NegativeItemType::Chargeoff);
        assert_eq!(items[3].kind, NegativeItemType::Other);
        assert_eq!(items[4].kind, NegativeItemType::Other);
        assert!(!items[4].verified);
    }

    #[test]
    fn test_distinct_account_types_ignores_untyped() {
        let profile: CreditProfile = serde_json::from_value(json!({
            "tradelines": [
                {"accountType": "revolving"},
                {"accountType": "revolving"},
                {"accountType": "installment"},
                {}
            ]
        }))
        .unwrap();

        assert_eq!(profile.distinct_account_types(), 2);
    }

    #[test]
    fn test_overall_health_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(OverallHealth::Excellent).unwrap(),
            json!("excellent")
        );
        assert_eq!(serde_json::to_value(Priority::Medium).unwrap(), json!("medium"));
    }
}
