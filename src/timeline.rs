use crate::errors::AppError;
use crate::models::{CreditProfile, ScoreProjection, ScoreTimeline};

/// Projections never extend past this horizon.
pub const MAX_PROJECTION_MONTHS: u32 = 24;

const BASE_CONFIDENCE: i32 = 85;
const MIN_CONFIDENCE: i32 = 40;
const MIN_MONTHLY_RATE: i32 = 3;

/// Expected points gained per month for this profile.
pub fn monthly_improvement_rate(profile: &CreditProfile) -> i32 {
    let mut rate = 5;

    if profile.utilization > 70.0 {
        rate += 10;
    } else if profile.utilization > 50.0 {
        rate += 5;
    }

    if profile.negative_items.len() > 10 {
        rate -= 2;
    }

    if profile.late_payments.is_empty() {
        rate += 3;
    }

    rate.max(MIN_MONTHLY_RATE)
}

fn projection_confidence(month: u32, profile: &CreditProfile) -> i32 {
    let mut confidence = BASE_CONFIDENCE - 2 * month as i32;

    if profile.negative_items.len() > 10 {
        confidence -= 10;
    }
    if profile.public_records > 0 {
        confidence -= 15;
    }

    confidence.max(MIN_CONFIDENCE)
}

/// Projects the month-by-month path from `current_score` to `goal_score`.
///
/// A goal at or below the current score needs no months and yields no
/// projections. Negative scores are rejected.
pub fn predict_score_timeline(
    current_score: i32,
    goal_score: i32,
    profile: &CreditProfile,
) -> Result<ScoreTimeline, AppError> {
    if current_score < 0 {
        return Err(AppError::InvalidInput(format!(
            "currentScore must be non-negative, got {}",
            current_score
        )));
    }
    if goal_score < 0 {
        return Err(AppError::InvalidInput(format!(
            "goalScore must be non-negative, got {}",
            goal_score
        )));
    }

    let monthly_rate = monthly_improvement_rate(profile);

    if goal_score <= current_score {
        return Ok(ScoreTimeline {
            estimated_months: 0,
            projections: Vec::new(),
            achievable: true,
            monthly_rate,
        });
    }

    // Widened so an arbitrarily large gap cannot overflow
    let gap = (i64::from(goal_score) - i64::from(current_score)).unsigned_abs();
    let months = gap.div_ceil(u64::from(monthly_rate.unsigned_abs()));
    let estimated_months = u32::try_from(months).unwrap_or(u32::MAX);

    let projections = (1..=estimated_months.min(MAX_PROJECTION_MONTHS))
        .map(|month| {
            let projected =
                i64::from(current_score) + i64::from(monthly_rate) * i64::from(month);
            ScoreProjection {
                month,
                // Bounded by goal_score, so it fits back into i32
                score: projected.min(i64::from(goal_score)) as i32,
                confidence: projection_confidence(month, profile),
            }
        })
        .collect();

    tracing::debug!(
        "Timeline {} -> {}: {} months at {} pts/month",
        current_score,
        goal_score,
        estimated_months,
        monthly_rate
    );

    Ok(ScoreTimeline {
        estimated_months,
        projections,
        achievable: estimated_months <= MAX_PROJECTION_MONTHS,
        monthly_rate,
    })
}
