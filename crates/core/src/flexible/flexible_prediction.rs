//! Savings projection for flexible goals.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::flexible_model::{
    CapacityStatus, FlexibleGoal, PredictionStatus, SavingsCapacity, SavingsPrediction,
};
use crate::constants::SECONDS_PER_WEEK;

/// Average weeks per month.
const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// Projections further out than this are capped.
const MAX_PROJECTION_SECONDS: i64 = 100 * 366 * 24 * 60 * 60;

/// Whole weeks until `deadline`, rounded up, never below 1.
pub fn weeks_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (deadline - now).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    ((seconds + SECONDS_PER_WEEK - 1) / SECONDS_PER_WEEK).max(1)
}

pub fn predict(goal: &FlexibleGoal, now: DateTime<Utc>) -> SavingsPrediction {
    let balance = goal.current_balance();
    let remaining = goal.target_amount - balance;
    let weeks_left = weeks_left(goal.deadline, now);

    let required_per_week = if remaining > Decimal::ZERO {
        (remaining / Decimal::from(weeks_left)).ceil()
    } else {
        Decimal::ZERO
    };
    let required_per_month = required_per_week * WEEKS_PER_MONTH;

    let weeks_since_creation = (Decimal::from((now - goal.created_at).num_seconds())
        / Decimal::from(SECONDS_PER_WEEK))
    .max(Decimal::ONE);
    let saving_rate = goal.total_deposited() / weeks_since_creation;

    let (predicted_completion, on_track, status) = if goal.goal_completed() {
        (Some(now), true, PredictionStatus::Completed)
    } else if saving_rate <= Decimal::ZERO {
        (None, false, PredictionStatus::NotStarted)
    } else {
        let seconds = (remaining / saving_rate * Decimal::from(SECONDS_PER_WEEK))
            .ceil()
            .to_i64()
            .unwrap_or(MAX_PROJECTION_SECONDS)
            .min(MAX_PROJECTION_SECONDS);
        let predicted = now + Duration::seconds(seconds);
        let on_track = predicted <= goal.deadline;
        let status = if on_track {
            PredictionStatus::OnTrack
        } else {
            PredictionStatus::Behind
        };
        (Some(predicted), on_track, status)
    };

    SavingsPrediction {
        weeks_left,
        required_per_week,
        required_per_month,
        saving_rate,
        predicted_completion,
        on_track,
        status,
        capacity: capacity(goal, required_per_month),
    }
}

fn capacity(goal: &FlexibleGoal, required_per_month: Decimal) -> Option<SavingsCapacity> {
    let income = goal.monthly_income.filter(|v| *v > Decimal::ZERO)?;
    let spending = goal.monthly_spending.filter(|v| *v > Decimal::ZERO)?;
    let monthly_capacity = income - spending;

    let status = if monthly_capacity >= required_per_month {
        CapacityStatus::WithinCapacity
    } else if monthly_capacity > Decimal::ZERO {
        CapacityStatus::BelowRequired
    } else {
        CapacityStatus::SpendingExceedsIncome
    };

    Some(SavingsCapacity {
        savings_percent: (monthly_capacity / income * Decimal::ONE_HUNDRED).round(),
        monthly_capacity,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flexible::flexible_model::{FlexibleTransaction, FlexibleTransactionType};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn goal(target: Decimal, deposits: &[Decimal], weeks_old: i64, weeks_to_go: i64) -> FlexibleGoal {
        FlexibleGoal {
            id: "f1".to_string(),
            name: "Trip".to_string(),
            target_amount: target,
            deadline: now() + Duration::weeks(weeks_to_go),
            created_at: now() - Duration::weeks(weeks_old),
            monthly_income: None,
            monthly_spending: None,
            transactions: deposits
                .iter()
                .enumerate()
                .map(|(i, amount)| FlexibleTransaction {
                    id: format!("t{}", i),
                    goal_id: "f1".to_string(),
                    transaction_type: FlexibleTransactionType::Deposit,
                    amount: *amount,
                    note: None,
                    timestamp: now() - Duration::days(i as i64),
                })
                .collect(),
        }
    }

    #[test]
    fn test_weeks_left_rounds_up_and_floors_at_one() {
        assert_eq!(weeks_left(now() + Duration::days(8), now()), 2);
        assert_eq!(weeks_left(now() + Duration::weeks(3), now()), 3);
        assert_eq!(weeks_left(now() - Duration::days(30), now()), 1);
    }

    #[test]
    fn test_required_amounts() {
        let g = goal(dec!(1000), &[dec!(100)], 1, 3);
        let p = predict(&g, now());
        assert_eq!(p.weeks_left, 3);
        // ceil(900 / 3)
        assert_eq!(p.required_per_week, dec!(300));
        assert_eq!(p.required_per_month, dec!(1299.00));
    }

    #[test]
    fn test_not_started_has_no_projection() {
        let p = predict(&goal(dec!(1000), &[], 2, 10), now());
        assert_eq!(p.status, PredictionStatus::NotStarted);
        assert_eq!(p.predicted_completion, None);
        assert!(!p.on_track);
    }

    #[test]
    fn test_on_track_and_behind() {
        // 400 over 2 weeks = 200/week; 600 left needs 3 weeks.
        let fast = predict(&goal(dec!(1000), &[dec!(400)], 2, 4), now());
        assert_eq!(fast.saving_rate, dec!(200));
        assert_eq!(fast.status, PredictionStatus::OnTrack);
        assert_eq!(fast.predicted_completion, Some(now() + Duration::weeks(3)));

        let slow = predict(&goal(dec!(1000), &[dec!(400)], 2, 2), now());
        assert_eq!(slow.status, PredictionStatus::Behind);
        assert!(!slow.on_track);
    }

    #[test]
    fn test_completed_goal_is_on_track_now() {
        let p = predict(&goal(dec!(500), &[dec!(500)], 1, 1), now());
        assert_eq!(p.status, PredictionStatus::Completed);
        assert_eq!(p.predicted_completion, Some(now()));
        assert_eq!(p.required_per_week, Decimal::ZERO);
    }

    #[test]
    fn test_capacity_requires_income_and_spending() {
        let mut g = goal(dec!(10000), &[], 1, 10);
        assert!(predict(&g, now()).capacity.is_none());

        g.monthly_income = Some(dec!(50000));
        g.monthly_spending = Some(dec!(40000));
        let capacity = predict(&g, now()).capacity.unwrap();
        assert_eq!(capacity.monthly_capacity, dec!(10000));
        assert_eq!(capacity.savings_percent, dec!(20));
        assert_eq!(capacity.status, CapacityStatus::WithinCapacity);

        g.monthly_spending = Some(dec!(60000));
        let capacity = predict(&g, now()).capacity.unwrap();
        assert_eq!(capacity.status, CapacityStatus::SpendingExceedsIncome);
    }
}
