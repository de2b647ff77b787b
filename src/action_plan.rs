/// Multi-phase credit improvement plan
///
/// Builds the three fixed phases from the profile and its analysis, then
/// walks them in order to derive cumulative weekly milestones.
use crate::dispute::calculate_dispute_success;
use crate::errors::AppError;
use crate::models::{
    ActionPlan, AnalysisResult, CreditProfile, Effort, Milestone, NegativeItem, PlanAction,
    PlanPhase, Priority,
};

const QUICK_WINS: &[&str] = &[
    "Pay every bill on time, starting today",
    "Ask card issuers for credit limit increases without a hard pull",
    "Pay balances before the statement closing date",
    "Pull all three bureau reports and mark every error",
];

const LONG_TERM_STRATEGIES: &[&str] = &[
    "Keep utilization below 10% on every card",
    "Keep your oldest accounts open and active",
    "Maintain a mix of revolving and installment credit",
    "Review your reports every quarter for new errors",
];

const AVOID_ACTIONS: &[&str] = &[
    "Do not close old credit card accounts",
    "Do not apply for several new accounts at once",
    "Do not miss payments while disputes are open",
    "Do not pay a collection before getting a deletion agreement in writing",
];

/// Upper bound of a duration label such as `"30-90 days"` (its last number), or 0.
pub fn duration_upper_bound_days(duration: &str) -> u32 {
    duration
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<u32>().ok())
        .last()
        .unwrap_or(0)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn phase(
    number: u32,
    name: &str,
    duration: &str,
    goals: &[&str],
    actions: Vec<PlanAction>,
) -> PlanPhase {
    let expected_score_change = actions.iter().map(|a| a.impact).sum();
    PlanPhase {
        phase: number,
        name: name.to_string(),
        duration: duration.to_string(),
        goals: to_strings(goals),
        actions,
        expected_score_change,
    }
}

fn quick_wins_phase(profile: &CreditProfile, analysis: &AnalysisResult) -> PlanPhase {
    let mut actions = Vec::new();

    if profile.utilization > 50.0 {
        actions.push(PlanAction {
            action: "Pay down credit card balances below 30% utilization".to_string(),
            priority: Priority::High,
            impact: 40,
            effort: Effort::Medium,
            timeline: "0-30 days".to_string(),
            steps: vec![
                format!("Current utilization is {}%", profile.utilization),
                "List cards by utilization, highest first".to_string(),
                "Direct extra payments to the highest-utilization card".to_string(),
                "Pay before the statement date so lower balances are reported".to_string(),
            ],
        });
    }

    let unvalidated = analysis
        .compliance_issues
        .iter()
        .filter(|issue| issue.starts_with("FDCPA"))
        .count();
    if unvalidated > 0 {
        actions.push(PlanAction {
            action: format!(
                "Send debt validation letters for {} collection account{}",
                unvalidated,
                if unvalidated == 1 { "" } else { "s" }
            ),
            priority: Priority::High,
            impact: 10,
            effort: Effort::Low,
            timeline: "0-30 days".to_string(),
            steps: vec![
                "Send validation requests by certified mail".to_string(),
                "Keep copies and delivery receipts".to_string(),
                "Dispute any debt not validated within 30 days".to_string(),
            ],
        });
    }

    actions.push(PlanAction {
        action: "Enroll every account in autopay".to_string(),
        priority: Priority::Low,
        impact: 0,
        effort: Effort::Low,
        timeline: "0-7 days".to_string(),
        steps: vec![
            "Set autopay to at least the minimum payment".to_string(),
            "Add payment reminders for accounts without autopay".to_string(),
        ],
    });

    phase(
        1,
        "Quick Wins & Foundation",
        "0-30 days",
        &[
            "Stop new damage to payment history",
            "Lower reported utilization",
            "Collect all three bureau reports",
        ],
        actions,
    )
}

fn dispute_steps(profile: &CreditProfile, analysis: &AnalysisResult) -> Vec<String> {
    let mut ranked: Vec<(&NegativeItem, u8)> = profile
        .negative_items
        .iter()
        .map(|item| (item, calculate_dispute_success(item)))
        .collect();
    // Stable sort keeps report order among equal estimates
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut steps = vec!["Request all three bureau reports".to_string()];
    for (item, success) in ranked.iter().take(3) {
        let creditor = item.creditor_name.as_deref().unwrap_or("unnamed creditor");
        steps.push(format!(
            "Dispute {} from {} ({}% estimated success)",
            item.kind.label(),
            creditor,
            success
        ));
    }
    for issue in analysis
        .compliance_issues
        .iter()
        .filter(|issue| issue.starts_with("FCRA"))
    {
        steps.push(format!("Cite reporting violation: {}", issue));
    }
    steps.push("Follow up on bureau responses within 30 days".to_string());
    steps
}

fn dispute_phase(profile: &CreditProfile, analysis: &AnalysisResult) -> PlanPhase {
    let mut actions = vec![PlanAction {
        action: "Dispute inaccurate negative items with all three bureaus".to_string(),
        priority: Priority::High,
        impact: 60,
        effort: Effort::High,
        timeline: "30-90 days".to_string(),
        steps: dispute_steps(profile, analysis),
    }];

    if !profile.collections.is_empty() {
        actions.push(PlanAction {
            action: "Negotiate pay-for-delete on remaining collections".to_string(),
            priority: Priority::Medium,
            impact: 20,
            effort: Effort::Medium,
            timeline: "45-90 days".to_string(),
            steps: vec![
                "Offer a settlement in exchange for deletion".to_string(),
                "Get the agreement in writing before paying".to_string(),
                "Confirm deletion on the next report".to_string(),
            ],
        });
    }

    phase(
        2,
        "Dispute & Verification Phase",
        "30-90 days",
        &[
            "Remove inaccurate or unverifiable items",
            "Force verification of every derogatory entry",
        ],
        actions,
    )
}

fn optimization_phase(profile: &CreditProfile) -> PlanPhase {
    let mut actions = vec![PlanAction {
        action: "Build positive tradelines".to_string(),
        priority: Priority::Medium,
        impact: 30,
        effort: Effort::Medium,
        timeline: "90-180 days".to_string(),
        steps: vec![
            "Open a secured card or credit-builder loan".to_string(),
            "Use it lightly and pay in full every month".to_string(),
        ],
    }];

    if profile.credit_age_below(5.0) {
        actions.push(PlanAction {
            action: "Become an authorized user on a seasoned account".to_string(),
            priority: Priority::Low,
            impact: 20,
            effort: Effort::Low,
            timeline: "90-120 days".to_string(),
            steps: vec![
                "Ask a family member with a long, clean history".to_string(),
                "Confirm the issuer reports authorized users".to_string(),
            ],
        });
    }

    phase(
        3,
        "Credit Optimization",
        "90-180 days",
        &[
            "Raise the count of accounts in good standing",
            "Improve credit mix and average age",
        ],
        actions,
    )
}

/// Walks the phases in order, accumulating weeks and expected score.
fn build_milestones(phases: &[PlanPhase], start_score: i32, goal_score: i32) -> Vec<Milestone> {
    let mut week = 0;
    let mut score = start_score;

    phases
        .iter()
        .map(|p| {
            week += duration_upper_bound_days(&p.duration).div_ceil(7);
            score = score.saturating_add(p.expected_score_change);
            Milestone {
                week,
                milestone: format!("Complete {}", p.name),
                expected_score: score.min(goal_score),
            }
        })
        .collect()
}

/// Composes the three-phase plan toward `goal_score` over `timeframe_months`.
///
/// `timeframe_months` is validated and echoed back; the phases and
/// milestones do not depend on it.
pub fn generate_action_plan(
    profile: &CreditProfile,
    analysis: &AnalysisResult,
    goal_score: i32,
    timeframe_months: u32,
) -> Result<ActionPlan, AppError> {
    if goal_score < 0 {
        return Err(AppError::InvalidInput(format!(
            "goalScore must be non-negative, got {}",
            goal_score
        )));
    }
    if timeframe_months == 0 {
        return Err(AppError::InvalidInput(
            "timeframe must be at least one month".to_string(),
        ));
    }

    let phases = vec![
        quick_wins_phase(profile, analysis),
        dispute_phase(profile, analysis),
        optimization_phase(profile),
    ];
    let milestones = build_milestones(&phases, profile.current_score, goal_score);

    tracing::info!(
        "Action plan generated: {} phases, goal {} in {} months",
        phases.len(),
        goal_score,
        timeframe_months
    );

    Ok(ActionPlan {
        goal_score,
        timeframe_months,
        phases,
        quick_wins: to_strings(QUICK_WINS),
        long_term_strategies: to_strings(LONG_TERM_STRATEGIES),
        avoid_actions: to_strings(AVOID_ACTIONS),
        milestones,
    })
}
