use lockstake_core::constants::{INITIAL_SHARE_PRICE, LATE_DEADLINE_DAYS, MAX_LOCK_DAYS};
use lockstake_core::{Lock, LockId};
use lockstake_economics::*;

fn lock_for(principal: u64, duration_days: u64, share_count: u64) -> Lock {
    Lock {
        id: LockId(1),
        owner: "alice".to_string(),
        principal,
        share_count,
        day_created: 1,
        duration_days,
    }
}

#[test]
fn test_reference_lock_scenario() {
    // 1,000,000 tokens for 100 days at launch price
    // multiplier = 1 + (100/365)^2 ≈ 1.075 -> 107 shares
    let calc = ShareCalculator::new(MAX_LOCK_DAYS);
    let shares = calc.shares_for(1_000_000, 100, INITIAL_SHARE_PRICE).unwrap();
    assert_eq!(shares, 107);

    let lock = lock_for(1_000_000, 100, shares);

    // On schedule: nothing forfeited
    let on_time = compute_penalty(101, lock.end_day(), &lock, 2_000, LATE_DEADLINE_DAYS);
    assert_eq!(on_time.total(), 0);

    // Half the term elapsed: all interest plus a quarter of principal
    let early = compute_penalty(51, lock.end_day(), &lock, 2_000, LATE_DEADLINE_DAYS);
    assert_eq!(early.principal_forfeit, 250_000);
    assert_eq!(early.interest_forfeit, 2_000);

    // A day earlier only 49 days have elapsed
    let day_before = compute_penalty(50, lock.end_day(), &lock, 2_000, LATE_DEADLINE_DAYS);
    assert_eq!(day_before.principal_forfeit, 260_100);
}

#[test]
fn test_penalty_boundaries() {
    let lock = lock_for(1_000_000, 30, 32);
    let end = lock.end_day();

    assert_eq!(closure_timing(end - 1, end, LATE_DEADLINE_DAYS), ClosureTiming::Early);
    assert_eq!(closure_timing(end, end, LATE_DEADLINE_DAYS), ClosureTiming::OnTime);
    assert_eq!(
        closure_timing(end + LATE_DEADLINE_DAYS - 1, end, LATE_DEADLINE_DAYS),
        ClosureTiming::OnTime
    );
    assert_eq!(
        closure_timing(end + LATE_DEADLINE_DAYS, end, LATE_DEADLINE_DAYS),
        ClosureTiming::Late
    );

    let late = compute_penalty(end + LATE_DEADLINE_DAYS, end, &lock, 777, LATE_DEADLINE_DAYS);
    assert_eq!(late.total(), 777);
}

#[test]
fn test_rebase_never_over_issues() {
    let calc = ShareCalculator::new(MAX_LOCK_DAYS);
    for (principal, days) in [(1_000_000u64, 100u64), (5_000_000, 3_650), (123_456_789, 7)] {
        let shares = calc.shares_for(principal, days, INITIAL_SHARE_PRICE).unwrap();
        let payout = principal + principal / 10;

        let new_price = calc
            .rebase(payout, days, shares, INITIAL_SHARE_PRICE)
            .unwrap()
            .expect("10% growth should rebase");
        assert!(new_price > INITIAL_SHARE_PRICE);
        assert!(calc.shares_for(payout, days, new_price).unwrap() <= shares);
    }
}

#[test]
fn test_schedule_from_json() {
    let schedule: RateSchedule =
        serde_json::from_str(r#"{"window_start_day": 10, "sub_period_days": 2}"#).unwrap();
    assert_eq!(schedule.base_divisor, RateSchedule::default().base_divisor);

    let divisors: Vec<u64> = (9..=20).map(|day| schedule.divisor(day)).collect();
    assert_eq!(
        divisors,
        vec![10_000, 8_000, 8_000, 4_000, 4_000, 2_000, 2_000, 1_000, 1_000, 500, 500, 10_000]
    );
}
