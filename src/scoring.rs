/// Deterministic credit-profile scoring
///
/// Everything in here is a function of a `CreditProfile`:
/// 1. Health score (weighted deductions, clamped to 0-100)
/// 2. Ordered rule tables for issues, strengths, risks and opportunities
/// 3. Potential-impact estimate
/// 4. FCRA/FDCPA compliance flags
/// 5. Recommendations
/// 6. FICO factor breakdown
/// 7. Data completeness
///
/// The recent-late-payment risk is the only rule that reads the clock.
use chrono::Utc;
use crate::models::{
    CreditProfile, EstimatedImpact, FicoFactor, FicoFactors, NegativeItemType, OverallHealth,
    Priority, Recommendation,
};

/// Utilization target used by the paydown advice.
pub const TARGET_UTILIZATION: f64 = 30.0;

/// Reporting limit for most derogatory items, in years.
const FCRA_REPORTING_LIMIT_YEARS: f64 = 7.0;

// ============ Health Score ============

/// Computes the 0-100 health score.
///
/// All terms are additive so the order of deductions does not matter. Only
/// the final value is clamped; the inputs themselves are used as given.
pub fn calculate_health_score(profile: &CreditProfile) -> u8 {
    let mut score: i64 = 100;

    score -= 5 * profile.negative_items.len() as i64;
    score -= utilization_penalty(profile.utilization);
    score -= credit_age_penalty(profile);
    score -= (3 * profile.hard_inquiries as i64).min(15);
    score -= 10 * profile.public_records as i64;
    score -= 8 * profile.collections.len() as i64;
    score -= 6 * profile.late_payments.len() as i64;
    score += (3 * profile.positive_items.len() as i64).min(15);

    score.clamp(0, 100) as u8
}

/// Single-bucket utilization penalty.
fn utilization_penalty(utilization: f64) -> i64 {
    if utilization > 70.0 {
        20
    } else if utilization > 50.0 {
        10
    } else if utilization > 30.0 {
        5
    } else {
        0
    }
}

fn credit_age_penalty(profile: &CreditProfile) -> i64 {
    if profile.credit_age_below(2.0) {
        15
    } else if profile.credit_age_below(5.0) {
        8
    } else {
        0
    }
}

pub fn overall_health(health_score: u8) -> OverallHealth {
    match health_score {
        80..=u8::MAX => OverallHealth::Excellent,
        60..=79 => OverallHealth::Good,
        40..=59 => OverallHealth::Fair,
        _ => OverallHealth::Poor,
    }
}

// ============ Rule Tables ============

/// A predicate and the message it contributes when it holds.
struct Rule {
    applies: fn(&CreditProfile) -> bool,
    message: fn(&CreditProfile) -> String,
}

/// Evaluates every rule in order. No rule short-circuits another.
fn evaluate(rules: &[Rule], profile: &CreditProfile) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| (rule.message)(profile))
        .collect()
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn age_years(profile: &CreditProfile) -> f64 {
    profile.age_of_credit.unwrap_or_default()
}

const KEY_ISSUE_RULES: &[Rule] = &[
    Rule {
        applies: |p| p.utilization > 70.0,
        message: |p| {
            format!(
                "Very high credit utilization at {}%, well above the recommended 30%",
                p.utilization
            )
        },
    },
    Rule {
        applies: |p| p.utilization > 50.0 && p.utilization <= 70.0,
        message: |p| {
            format!(
                "High credit utilization at {}%, above the recommended 30%",
                p.utilization
            )
        },
    },
    Rule {
        applies: |p| !p.collections.is_empty(),
        message: |p| {
            let n = p.collections.len();
            format!("{} collection account{} reporting", n, plural(n))
        },
    },
    Rule {
        applies: |p| p.count_negative(NegativeItemType::Chargeoff) > 0,
        message: |p| {
            let n = p.count_negative(NegativeItemType::Chargeoff);
            format!("{} charge-off{} severely damaging payment history", n, plural(n))
        },
    },
    Rule {
        applies: |p| !p.late_payments.is_empty(),
        message: |p| {
            let n = p.late_payments.len();
            format!("{} late payment{} on record", n, plural(n))
        },
    },
    Rule {
        applies: |p| !p.negative_items.is_empty(),
        message: |p| {
            let n = p.negative_items.len();
            format!("{} negative item{} on the credit report", n, plural(n))
        },
    },
    Rule {
        applies: |p| p.credit_age_below(2.0),
        message: |p| format!("Short credit history of {:.1} years", age_years(p)),
    },
    Rule {
        applies: |p| p.hard_inquiries > 6,
        message: |p| {
            format!(
                "{} hard inquiries signal credit-seeking behavior",
                p.hard_inquiries
            )
        },
    },
    Rule {
        applies: |p| p.public_records > 0,
        message: |p| {
            let n = p.public_records as usize;
            format!(
                "{} public record{} (bankruptcy, judgment or tax lien)",
                n,
                plural(n)
            )
        },
    },
];

const STRENGTH_RULES: &[Rule] = &[
    Rule {
        applies: |p| p.utilization <= 30.0,
        message: |p| format!("Low credit utilization at {}%", p.utilization),
    },
    Rule {
        applies: |p| p.credit_age_above(10.0),
        message: |p| format!("Long credit history of {:.1} years", age_years(p)),
    },
    Rule {
        applies: |p| p.positive_items.len() >= 5,
        message: |p| format!("{} accounts in good standing", p.positive_items.len()),
    },
    Rule {
        applies: |p| p.hard_inquiries <= 2,
        message: |_| "Few recent hard inquiries".to_string(),
    },
    Rule {
        applies: |p| p.public_records == 0,
        message: |_| "Clean public record".to_string(),
    },
    Rule {
        applies: |p| p.late_payments.is_empty(),
        message: |_| "No late payments on record".to_string(),
    },
];

const RISK_RULES: &[Rule] = &[
    Rule {
        applies: |p| p.utilization > 90.0,
        message: |_| "Critical: utilization above 90% signals maxed-out credit lines".to_string(),
    },
    Rule {
        applies: |p| p.utilization > 70.0,
        message: |_| "High utilization signals financial distress to lenders".to_string(),
    },
    Rule {
        applies: |p| p.recent_late_payments(Utc::now()) > 0,
        message: |_| "Recent late payments indicate current financial problems".to_string(),
    },
    Rule {
        applies: |p| p.late_payments.len() >= 3,
        message: |_| "Repeated late payments indicate ongoing payment problems".to_string(),
    },
    Rule {
        applies: |p| !p.collections.is_empty(),
        message: |_| "Unresolved collections can escalate to judgments".to_string(),
    },
    Rule {
        applies: |p| p.public_records > 0,
        message: |_| "Public records can block new credit approvals".to_string(),
    },
    Rule {
        applies: |p| p.hard_inquiries > 6,
        message: |_| "Frequent credit applications lower approval odds".to_string(),
    },
    Rule {
        applies: |p| !p.tradelines.is_empty() && p.distinct_account_types() < 2,
        message: |_| "Limited credit mix may cap score growth".to_string(),
    },
];

const OPPORTUNITY_RULES: &[Rule] = &[
    Rule {
        applies: |p| !p.negative_items.is_empty(),
        message: |p| {
            let n = p.negative_items.len();
            format!(
                "Dispute {} negative item{} for inaccuracies (+{} to +{} points)",
                n,
                plural(n),
                n * 20,
                n * 40
            )
        },
    },
    Rule {
        applies: |p| p.utilization > 50.0,
        message: |p| {
            let reduction = p.utilization - TARGET_UTILIZATION;
            format!(
                "Reduce utilization from {}% to 30% (about +{} points)",
                p.utilization,
                (reduction * 1.5).round()
            )
        },
    },
    Rule {
        applies: |p| p.credit_age_below(5.0),
        message: |_| {
            "Become an authorized user on an established account (+10 to +30 points)".to_string()
        },
    },
    Rule {
        applies: |p| p.hard_inquiries > 3,
        message: |_| "Dispute unauthorized or duplicate inquiries (+5 to +15 points)".to_string(),
    },
    Rule {
        applies: |p| p.positive_items.len() < 5,
        message: |p| {
            let missing = 5 - p.positive_items.len();
            format!(
                "Add {} positive tradeline{} such as a secured card or credit-builder loan",
                missing,
                plural(missing)
            )
        },
    },
];

pub fn identify_key_issues(profile: &CreditProfile) -> Vec<String> {
    evaluate(KEY_ISSUE_RULES, profile)
}

pub fn identify_strengths(profile: &CreditProfile) -> Vec<String> {
    evaluate(STRENGTH_RULES, profile)
}

pub fn identify_risk_factors(profile: &CreditProfile) -> Vec<String> {
    evaluate(RISK_RULES, profile)
}

pub fn identify_opportunities(profile: &CreditProfile) -> Vec<String> {
    evaluate(OPPORTUNITY_RULES, profile)
}

// ============ Potential Impact ============

/// Improvement projections. These are not the health-score penalties.
pub fn calculate_potential_impact(profile: &CreditProfile) -> EstimatedImpact {
    let removing_negatives = (15 * profile.negative_items.len()).min(120) as u64;

    // Float-to-int casts saturate, so only utilization beyond u64 range is bounded
    let improving_utilization = if profile.utilization > 30.0 {
        (0.8 * (profile.utilization - 10.0)).round() as u64
    } else {
        0
    };

    let adding_positives = 8 * 5usize.saturating_sub(profile.positive_items.len()) as u64;

    let aging_accounts = if profile.credit_age_below(5.0) { 20 } else { 0 };

    // The other terms are at most 180 in total
    let total = improving_utilization
        .saturating_add(removing_negatives + adding_positives + aging_accounts);

    EstimatedImpact {
        removing_negatives,
        improving_utilization,
        adding_positives,
        aging_accounts,
        total,
    }
}

// ============ Data Completeness ============

/// Number of core inputs considered by [`calculate_data_completeness`].
const COMPLETENESS_FIELDS: u32 = 7;

/// Rounded percentage of the core inputs the caller supplied. Sequences
/// count only when non-empty.
pub fn calculate_data_completeness(profile: &CreditProfile) -> u8 {
    let supplied = [
        profile.supplied.current_score,
        !profile.negative_items.is_empty(),
        !profile.positive_items.is_empty(),
        profile.supplied.utilization,
        profile.age_of_credit.is_some(),
        profile.supplied.hard_inquiries,
        !profile.tradelines.is_empty(),
    ];
    let complete = supplied.iter().filter(|present| **present).count() as u32;

    (f64::from(complete) / f64::from(COMPLETENESS_FIELDS) * 100.0).round() as u8
}

// ============ Compliance ============

/// Heuristic FCRA/FDCPA flags, one message per offending entry.
pub fn check_compliance(profile: &CreditProfile) -> Vec<String> {
    let mut issues = Vec::new();

    for (idx, item) in profile.negative_items.iter().enumerate() {
        if item.age > FCRA_REPORTING_LIMIT_YEARS {
            let label = match item.creditor_name {
                Some(ref creditor) => format!("{} {}", creditor, item.kind.label()),
                None => format!("{} #{}", item.kind.label(), idx + 1),
            };
            issues.push(format!(
                "FCRA § 605: {} is {:.1} years old and exceeds the 7-year reporting limit",
                label, item.age
            ));
        }
    }

    for (idx, collection) in profile.collections.iter().enumerate() {
        if !collection.validation_received {
            issues.push(format!(
                "FDCPA § 809: collection #{} (${:.2}) has no debt validation on file",
                idx + 1,
                collection.amount
            ));
        }
    }

    // Creditors in first-seen order
    let mut creditor_counts: Vec<(&str, usize)> = Vec::new();
    for item in &profile.negative_items {
        if let Some(ref creditor) = item.creditor_name {
            match creditor_counts
                .iter_mut()
                .find(|(name, _)| *name == creditor.as_str())
            {
                Some((_, count)) => *count += 1,
                None => creditor_counts.push((creditor.as_str(), 1)),
            }
        }
    }
    for (creditor, count) in creditor_counts {
        if count > 2 {
            issues.push(format!(
                "FCRA § 623: {} entries from {} may indicate duplicate reporting",
                count, creditor
            ));
        }
    }

    issues
}

// ============ Recommendations ============

struct RecommendationRule {
    applies: fn(&CreditProfile) -> bool,
    build: fn(&CreditProfile, &EstimatedImpact) -> Recommendation,
}

const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        applies: |p| p.utilization > 50.0,
        build: |p, impact| Recommendation {
            priority: Priority::High,
            action: format!(
                "Pay down revolving balances to bring utilization from {}% below 30%",
                p.utilization
            ),
            impact: "Amounts owed drive 30% of the FICO model".to_string(),
            timeframe: "30-60 days".to_string(),
            expected_gain: impact.improving_utilization,
        },
    },
    RecommendationRule {
        applies: |p| !p.collections.is_empty(),
        build: |p, _| {
            let n = p.collections.len();
            Recommendation {
                priority: Priority::High,
                action: format!(
                    "Negotiate pay-for-delete agreements on {} collection account{}",
                    n,
                    plural(n)
                ),
                impact: "Removes derogatory collection tradelines".to_string(),
                timeframe: "60-90 days".to_string(),
                expected_gain: 20 * n as u64,
            }
        },
    },
    RecommendationRule {
        applies: |p| p.negative_items.len() > 3,
        build: |_, impact| Recommendation {
            priority: Priority::Medium,
            action: "Dispute inaccurate negative items with all three bureaus".to_string(),
            impact: "Unverifiable items must be removed".to_string(),
            timeframe: "30-90 days".to_string(),
            expected_gain: impact.removing_negatives,
        },
    },
    RecommendationRule {
        applies: |p| p.credit_age_below(5.0),
        build: |_, impact| Recommendation {
            priority: Priority::Medium,
            action: "Become an authorized user on a seasoned account in good standing"
                .to_string(),
            impact: "Raises average age of accounts".to_string(),
            timeframe: "30-60 days".to_string(),
            expected_gain: impact.aging_accounts,
        },
    },
    RecommendationRule {
        applies: |_| true,
        build: |_, _| Recommendation {
            priority: Priority::Low,
            action: "Set up autopay on every account to protect payment history".to_string(),
            impact: "Payment history drives 35% of the FICO model".to_string(),
            timeframe: "Ongoing".to_string(),
            expected_gain: 0,
        },
    },
];

/// Ordered recommendations. The autopay entry is always last.
pub fn generate_recommendations(
    profile: &CreditProfile,
    impact: &EstimatedImpact,
) -> Vec<Recommendation> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| (rule.build)(profile, impact))
        .collect()
}

// ============ FICO Factors ============

/// Running sub-score for one FICO category.
struct FactorTally {
    weight: f64,
    score: i64,
    issues: Vec<String>,
}

impl FactorTally {
    fn new(weight: f64) -> Self {
        Self {
            weight,
            score: 100,
            issues: Vec::new(),
        }
    }

    fn deduct(&mut self, points: i64, issue: String) {
        self.score -= points;
        self.issues.push(issue);
    }

    fn finish(self) -> FicoFactor {
        FicoFactor {
            weight: self.weight,
            score: self.score.max(0) as u32,
            issues: self.issues,
        }
    }
}

/// Breakdown over the five official FICO categories.
pub fn analyze_fico_factors(profile: &CreditProfile) -> FicoFactors {
    let mut payment_history = FactorTally::new(0.35);
    let mut amounts_owed = FactorTally::new(0.30);
    let mut length_of_history = FactorTally::new(0.15);
    let mut credit_mix = FactorTally::new(0.10);
    let mut new_credit = FactorTally::new(0.10);

    let charge_offs = profile.count_negative(NegativeItemType::Chargeoff);
    if charge_offs > 0 {
        payment_history.deduct(50, format!("{} charge-off(s)", charge_offs));
    }
    let collections = profile.collections.len();
    if collections > 0 {
        payment_history.deduct(40, format!("{} collection(s)", collections));
    }
    let late = profile.late_payments.len();
    if late > 0 {
        payment_history.deduct(
            (late as i64 * 10).min(30),
            format!("{} late payment(s)", late),
        );
    }

    let util = profile.utilization;
    if util > 70.0 {
        amounts_owed.deduct(60, format!("Very high utilization ({}%)", util));
    } else if util > 50.0 {
        amounts_owed.deduct(40, format!("High utilization ({}%)", util));
    } else if util > 30.0 {
        amounts_owed.deduct(20, format!("Above ideal utilization ({}%)", util));
    }

    if let Some(age) = profile.age_of_credit {
        if age < 2.0 {
            length_of_history.deduct(50, format!("Very short history ({:.1} years)", age));
        } else if age < 5.0 {
            length_of_history.deduct(30, format!("Short history ({:.1} years)", age));
        }
    }

    // Mix is only assessed when tradelines were supplied
    if !profile.tradelines.is_empty() {
        match profile.distinct_account_types() {
            0 | 1 => credit_mix.deduct(40, "Limited credit mix".to_string()),
            2 => credit_mix.deduct(20, "Could diversify more".to_string()),
            _ => {}
        }
    }

    let inquiries = profile.hard_inquiries;
    if inquiries > 6 {
        new_credit.deduct(50, format!("Too many inquiries ({})", inquiries));
    } else if inquiries > 3 {
        new_credit.deduct(30, format!("Multiple inquiries ({})", inquiries));
    }

    FicoFactors {
        payment_history: payment_history.finish(),
        amounts_owed: amounts_owed.finish(),
        length_of_history: length_of_history.finish(),
        credit_mix: credit_mix.finish(),
        new_credit: new_credit.finish(),
    }
}
