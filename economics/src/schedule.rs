//! Daily interest rate schedule
//!
//! Each day mints `floor(token_supply / divisor(day))` tokens of interest for
//! all staked shares. The divisor sits at a flat baseline except inside the
//! high-inflation window, which spans five equal sub-periods whose divisors
//! halve one after another before falling back to the baseline.

use serde::{Deserialize, Serialize};

/// Number of sub-periods in the high-inflation window
pub const WINDOW_SUB_PERIODS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSchedule {
    /// Divisor outside the window (10_000 ≈ 3.65% a year)
    pub base_divisor: u64,
    /// First day of the high-inflation window
    pub window_start_day: u64,
    /// Length of each window sub-period in days
    pub sub_period_days: u64,
    /// Divisor of the first sub-period; halves in each later one
    pub window_divisor: u64,
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule {
            base_divisor: 10_000,
            window_start_day: 366,
            sub_period_days: 73,
            window_divisor: 8_000,
        }
    }
}

/// One schedule row, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub first_day: u64,
    pub last_day: u64,
    pub divisor: u64,
}

impl RateSchedule {
    pub fn divisor(&self, day: u64) -> u64 {
        match self.sub_period(day) {
            Some(k) => self.window_divisor >> k,
            None => self.base_divisor,
        }
    }

    /// Index of the window sub-period containing `day`, if any.
    pub fn sub_period(&self, day: u64) -> Option<u64> {
        if day < self.window_start_day {
            return None;
        }
        let k = (day - self.window_start_day) / self.sub_period_days;
        (k < WINDOW_SUB_PERIODS).then_some(k)
    }

    /// First day after the window.
    pub fn window_end_day(&self) -> u64 {
        self.window_start_day + WINDOW_SUB_PERIODS * self.sub_period_days
    }

    /// Interest minted for all shares on `day`.
    pub fn daily_pool(&self, day: u64, token_supply: u64) -> u64 {
        token_supply / self.divisor(day)
    }

    /// Contiguous runs of equal divisor covering `first_day..=last_day`.
    pub fn periods(&self, first_day: u64, last_day: u64) -> Vec<SchedulePeriod> {
        let mut periods: Vec<SchedulePeriod> = Vec::new();
        let mut day = first_day;
        while day <= last_day {
            let divisor = self.divisor(day);
            let run_end = match self.sub_period(day) {
                Some(k) => self.window_start_day + (k + 1) * self.sub_period_days - 1,
                None if day < self.window_start_day => self.window_start_day - 1,
                None => u64::MAX,
            }
            .min(last_day);

            match periods.last_mut() {
                Some(prev) if prev.divisor == divisor => prev.last_day = run_end,
                _ => periods.push(SchedulePeriod {
                    first_day: day,
                    last_day: run_end,
                    divisor,
                }),
            }
            if run_end == u64::MAX {
                break;
            }
            day = run_end + 1;
        }
        periods
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_divisor == 0 {
            return Err("base_divisor must be greater than zero".to_string());
        }
        if self.window_start_day == 0 {
            return Err("window_start_day is 1-indexed".to_string());
        }
        if self.sub_period_days == 0 {
            return Err("sub_period_days must be greater than zero".to_string());
        }
        if self.window_divisor >> (WINDOW_SUB_PERIODS - 1) == 0 {
            return Err(format!(
                "window_divisor {} must stay above zero after {} halvings",
                self.window_divisor,
                WINDOW_SUB_PERIODS - 1
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_outside_window() {
        let schedule = RateSchedule::default();
        assert_eq!(schedule.divisor(1), 10_000);
        assert_eq!(schedule.divisor(365), 10_000);
        assert_eq!(schedule.divisor(schedule.window_end_day()), 10_000);
        assert_eq!(schedule.divisor(5_000), 10_000);
    }

    #[test]
    fn test_window_halves_each_sub_period() {
        let schedule = RateSchedule::default();
        let expected = [8_000, 4_000, 2_000, 1_000, 500];
        for (k, divisor) in expected.iter().enumerate() {
            let first = schedule.window_start_day + k as u64 * schedule.sub_period_days;
            let last = first + schedule.sub_period_days - 1;
            assert_eq!(schedule.divisor(first), *divisor);
            assert_eq!(schedule.divisor(last), *divisor);
        }
        assert_eq!(schedule.window_end_day(), 366 + 365);
    }

    #[test]
    fn test_daily_pool_floors() {
        let schedule = RateSchedule::default();
        assert_eq!(schedule.daily_pool(1, 1_000_000), 100);
        assert_eq!(schedule.daily_pool(1, 19_999), 1);
        assert_eq!(schedule.daily_pool(366, 1_000_000), 125);
    }

    #[test]
    fn test_periods() {
        let schedule = RateSchedule::default();
        let periods = schedule.periods(1, 800);
        assert_eq!(periods.len(), 7);
        assert_eq!(
            periods[0],
            SchedulePeriod {
                first_day: 1,
                last_day: 365,
                divisor: 10_000
            }
        );
        assert_eq!(periods[1].first_day, 366);
        assert_eq!(periods[1].last_day, 438);
        assert_eq!(periods[5].divisor, 500);
        assert_eq!(periods[6].first_day, 731);
        assert_eq!(periods[6].last_day, 800);
    }

    #[test]
    fn test_validate() {
        assert!(RateSchedule::default().validate().is_ok());
        let bad = RateSchedule {
            window_divisor: 15,
            ..RateSchedule::default()
        };
        assert!(bad.validate().is_err());
        let bad = RateSchedule {
            sub_period_days: 0,
            ..RateSchedule::default()
        };
        assert!(bad.validate().is_err());
    }
}
