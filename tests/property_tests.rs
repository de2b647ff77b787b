/// Property-based tests using proptest
/// Tests invariants that should hold for all profiles and items
use credit_insights_api::action_plan::generate_action_plan;
use credit_insights_api::dispute::calculate_dispute_success;
use credit_insights_api::insights::fallback_insights;
use credit_insights_api::models::*;
use credit_insights_api::scoring::{
    analyze_fico_factors, calculate_data_completeness, calculate_health_score,
    calculate_potential_impact, check_compliance, generate_recommendations, identify_key_issues,
    identify_opportunities, identify_risk_factors, identify_strengths, overall_health,
};
use credit_insights_api::timeline::{predict_score_timeline, MAX_PROJECTION_MONTHS};
use proptest::prelude::*;

fn item_kind() -> impl Strategy<Value = NegativeItemType> {
    prop_oneof![
        Just(NegativeItemType::Inquiry),
        Just(NegativeItemType::Collection),
        Just(NegativeItemType::LatePayment),
        Just(NegativeItemType::Chargeoff),
        Just(NegativeItemType::Bankruptcy),
        Just(NegativeItemType::Judgment),
        Just(NegativeItemType::Other),
    ]
}

fn negative_item() -> impl Strategy<Value = NegativeItem> {
    (
        item_kind(),
        0.0f64..15.0,
        proptest::option::of(0.0f64..20_000.0),
        any::<bool>(),
        proptest::option::of(prop_oneof![
            Just("equifax".to_string()),
            Just("Equifax".to_string()),
            Just("experian".to_string()),
            Just("transunion".to_string()),
        ]),
        proptest::option::of(prop_oneof![
            Just("Acme Recovery".to_string()),
            Just("Big Bank".to_string()),
        ]),
    )
        .prop_map(|(kind, age, amount, verified, bureau, creditor_name)| NegativeItem {
            kind,
            age,
            amount,
            verified,
            bureau,
            creditor_name,
        })
}

fn credit_profile() -> impl Strategy<Value = CreditProfile> {
    (
        300i32..=850,
        proptest::collection::vec(negative_item(), 0..15),
        0usize..10,
        0.0f64..150.0,
        proptest::option::of(0.0f64..30.0),
        0u32..20,
        0u32..4,
        proptest::collection::vec((0.0f64..5000.0, any::<bool>()), 0..5),
        0usize..8,
    )
        .prop_map(
            |(
                current_score,
                negative_items,
                positives,
                utilization,
                age_of_credit,
                hard_inquiries,
                public_records,
                collections,
                lates,
            )| CreditProfile {
                current_score,
                negative_items,
                positive_items: vec![serde_json::json!({}); positives],
                utilization,
                age_of_credit,
                hard_inquiries,
                public_records,
                collections: collections
                    .into_iter()
                    .map(|(amount, validation_received)| CollectionAccount {
                        amount,
                        validation_received,
                    })
                    .collect(),
                late_payments: vec![LatePayment::default(); lates],
                tradelines: Vec::new(),
                supplied: SuppliedFields {
                    current_score: true,
                    utilization: true,
                    hard_inquiries: true,
                },
            },
        )
}

fn analysis_for(profile: &CreditProfile) -> AnalysisResult {
    let health_score = calculate_health_score(profile);
    let estimated_impact = calculate_potential_impact(profile);
    AnalysisResult {
        health_score,
        overall_health: overall_health(health_score),
        key_issues: identify_key_issues(profile),
        strengths: identify_strengths(profile),
        risk_factors: identify_risk_factors(profile),
        opportunities: identify_opportunities(profile),
        recommendations: generate_recommendations(profile, &estimated_impact),
        estimated_impact,
        compliance_issues: check_compliance(profile),
        fico_factors: analyze_fico_factors(profile),
        data_completeness: calculate_data_completeness(profile),
        ai_insights: fallback_insights(),
    }
}

// Property: analysis sections stay within their declared ranges
proptest! {
    #[test]
    fn health_score_is_bounded(profile in credit_profile()) {
        let score = calculate_health_score(&profile);
        prop_assert!(score <= 100);
    }

    #[test]
    fn impact_total_is_sum_of_parts(profile in credit_profile()) {
        let impact = calculate_potential_impact(&profile);
        prop_assert_eq!(
            impact.total,
            impact.removing_negatives
                + impact.improving_utilization
                + impact.adding_positives
                + impact.aging_accounts
        );
        prop_assert!(impact.removing_negatives <= 120);
    }

    #[test]
    fn impact_total_is_exact_for_any_utilization(utilization in 0.0f64..1e15) {
        let profile = CreditProfile { utilization, ..Default::default() };
        let impact = calculate_potential_impact(&profile);
        prop_assert_eq!(
            impact.total,
            impact.removing_negatives
                + impact.improving_utilization
                + impact.adding_positives
                + impact.aging_accounts
        );
    }

    #[test]
    fn data_completeness_is_a_percentage(profile in credit_profile()) {
        let completeness = calculate_data_completeness(&profile);
        prop_assert!(completeness <= 100);
        // Three scalars are always marked supplied by the generator
        prop_assert!(completeness >= 43);
    }

    #[test]
    fn recommendations_end_with_low_priority(profile in credit_profile()) {
        let impact = calculate_potential_impact(&profile);
        let recommendations = generate_recommendations(&profile, &impact);
        prop_assert!(!recommendations.is_empty());
        prop_assert_eq!(recommendations.last().map(|r| r.priority), Some(Priority::Low));
    }

    #[test]
    fn fico_weights_sum_to_one(profile in credit_profile()) {
        let factors = analyze_fico_factors(&profile);
        let total = factors.payment_history.weight
            + factors.amounts_owed.weight
            + factors.length_of_history.weight
            + factors.credit_mix.weight
            + factors.new_credit.weight;
        prop_assert!((total - 1.0).abs() < 1e-9);
    }
}

// Property: dispute estimates are always clamped
proptest! {
    #[test]
    fn dispute_success_is_clamped(item in negative_item()) {
        let probability = calculate_dispute_success(&item);
        prop_assert!((20..=95).contains(&probability));
    }

    #[test]
    fn item_age_never_changes_estimate(item in negative_item(), other_age in 0.0f64..15.0) {
        let aged = NegativeItem { age: other_age, ..item.clone() };
        prop_assert_eq!(calculate_dispute_success(&item), calculate_dispute_success(&aged));
    }
}

// Property: timelines respect horizon and goal
proptest! {
    #[test]
    fn timeline_projections_are_capped(
        current in 300i32..=850,
        goal in 300i32..=850,
        profile in credit_profile()
    ) {
        let timeline = predict_score_timeline(current, goal, &profile).unwrap();
        prop_assert!(timeline.projections.len() <= MAX_PROJECTION_MONTHS as usize);
        prop_assert!(timeline.monthly_rate >= 3);
        prop_assert_eq!(timeline.achievable, timeline.estimated_months <= MAX_PROJECTION_MONTHS);
        for projection in &timeline.projections {
            prop_assert!(projection.score <= goal);
            prop_assert!((40..=85).contains(&projection.confidence));
        }
        if goal <= current {
            prop_assert_eq!(timeline.estimated_months, 0);
        }
    }

    #[test]
    fn timeline_handles_any_score_gap(
        current in 0i32..=i32::MAX,
        goal in 0i32..=i32::MAX,
        late in 0usize..2
    ) {
        let profile = CreditProfile {
            late_payments: vec![LatePayment::default(); late],
            ..Default::default()
        };
        let timeline = predict_score_timeline(current, goal, &profile).unwrap();
        if goal > current {
            let gap = (i64::from(goal) - i64::from(current)) as u64;
            let rate = timeline.monthly_rate as u64;
            prop_assert_eq!(u64::from(timeline.estimated_months), gap.div_ceil(rate));
        }
        for projection in &timeline.projections {
            prop_assert!(projection.score <= goal.max(current));
            prop_assert!(projection.score >= current);
        }
    }

    #[test]
    fn action_plan_shape_is_fixed(
        profile in credit_profile(),
        goal in 300i32..=850,
        timeframe in 1u32..=36
    ) {
        let analysis = analysis_for(&profile);
        let plan = generate_action_plan(&profile, &analysis, goal, timeframe).unwrap();
        prop_assert_eq!(plan.phases.len(), 3);
        prop_assert_eq!(plan.milestones.len(), 3);
        for (idx, phase) in plan.phases.iter().enumerate() {
            prop_assert_eq!(phase.phase as usize, idx + 1);
            let sum: i32 = phase.actions.iter().map(|a| a.impact).sum();
            prop_assert_eq!(phase.expected_score_change, sum);
        }
        for milestone in &plan.milestones {
            prop_assert!(milestone.expected_score <= goal);
        }
    }
}
