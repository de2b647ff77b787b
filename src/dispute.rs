use crate::models::{NegativeItem, NegativeItemType};

const MIN_PROBABILITY: i32 = 20;
const MAX_PROBABILITY: i32 = 95;

/// Historical dispute success rate per item type, in percent.
pub fn base_success_rate(kind: NegativeItemType) -> i32 {
    match kind {
        NegativeItemType::Inquiry => 70,
        NegativeItemType::Collection => 60,
        NegativeItemType::LatePayment => 50,
        NegativeItemType::Chargeoff => 45,
        NegativeItemType::Bankruptcy => 30,
        NegativeItemType::Judgment => 35,
        NegativeItemType::Other => 50,
    }
}

/// Estimates the probability (percent) that disputing `item` succeeds.
///
/// The result is clamped to 20..=95.
///
/// Known quirk: the age adjustment below is computed and then overwritten by
/// the type base rate, so an item's age never affects the estimate. Kept
/// as-is until product confirms whether age should count.
#[allow(unused_assignments)]
pub fn calculate_dispute_success(item: &NegativeItem) -> u8 {
    let mut probability: i32 = 50;

    if item.age > 5.0 {
        probability += 15;
    } else if item.age > 2.0 {
        probability += 5;
    }

    probability = base_success_rate(item.kind);

    if !item.verified {
        probability += 15;
    }

    if let Some(amount) = item.amount {
        if amount < 500.0 {
            probability += 10;
        } else if amount > 5000.0 {
            probability -= 5;
        }
    }

    // Case-sensitive match
    if item.bureau.as_deref() == Some("equifax") {
        probability += 5;
    }

    probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY) as u8
}
