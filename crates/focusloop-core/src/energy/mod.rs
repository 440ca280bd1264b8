//! Energy level estimation.
//!
//! `calculate_energy_level` is a pull-model estimate from the current time
//! and the scheduler-owned counters; it never reads session history. The
//! historical per-hour mining lives in [`patterns`].

pub mod patterns;

pub use patterns::{analyze_energy_patterns, HourlyEnergyPattern};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Coarse energy level used by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Classify a [0, 1] score. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            EnergyLevel::High
        } else if score >= 0.4 {
            EnergyLevel::Medium
        } else {
            EnergyLevel::Low
        }
    }
}

/// The contributing factor scores behind an energy sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyFactors {
    pub time_of_day: f64,
    pub recent_activity: f64,
    pub break_quality: f64,
}

/// One computed energy estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySample {
    pub level: EnergyLevel,
    pub timestamp: DateTime<Utc>,
    pub factors: EnergyFactors,
}

/// Pull-model energy estimator. Holds only the latest cached sample;
/// the counters it reads are owned by the scheduler and passed in.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EnergyModel {
    cached: Option<EnergySample>,
}

impl EnergyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently computed sample, if any.
    pub fn cached(&self) -> Option<&EnergySample> {
        self.cached.as_ref()
    }

    pub fn restore(&mut self, sample: Option<EnergySample>) {
        self.cached = sample;
    }

    /// Compute the current energy level and replace the cached sample.
    ///
    /// Callers that need the previous sample must read it before calling.
    pub fn calculate_energy_level(
        &mut self,
        now: DateTime<Utc>,
        consecutive_pomodoros: u32,
        last_break_time: Option<DateTime<Utc>>,
    ) -> EnergySample {
        let factors = EnergyFactors {
            time_of_day: time_of_day_score(now.hour()),
            recent_activity: (1.0 - consecutive_pomodoros as f64 * 0.2).max(0.0),
            break_quality: break_quality_score(now, last_break_time),
        };
        let overall =
            (factors.time_of_day + factors.recent_activity + factors.break_quality) / 3.0;

        let sample = EnergySample {
            level: EnergyLevel::from_score(overall),
            timestamp: now,
            factors,
        };
        self.cached = Some(sample.clone());
        sample
    }
}

/// Piecewise-constant hour-of-day score. Bands are inclusive on both ends
/// and do not overlap at integer hours.
fn time_of_day_score(hour: u32) -> f64 {
    match hour {
        6..=10 => 0.9,
        11..=14 => 0.7,
        15..=18 => 0.4,
        19..=22 => 0.6,
        _ => 0.3,
    }
}

/// Break recency score. Stays at the 0.5 default until a first break is
/// recorded.
fn break_quality_score(now: DateTime<Utc>, last_break_time: Option<DateTime<Utc>>) -> f64 {
    let Some(last_break) = last_break_time else {
        return 0.5;
    };
    let minutes = (now - last_break).num_minutes();
    if minutes >= 15 {
        0.9
    } else if minutes >= 5 {
        0.7
    } else {
        0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_morning_fresh_start_is_high() {
        let mut model = EnergyModel::new();
        let sample = model.calculate_energy_level(at_hour(8), 0, None);
        assert!((sample.factors.time_of_day - 0.9).abs() < 1e-9);
        assert!((sample.factors.recent_activity - 1.0).abs() < 1e-9);
        assert!((sample.factors.break_quality - 0.5).abs() < 1e-9);
        assert_eq!(sample.level, EnergyLevel::High); // mean = 0.8
    }

    #[test]
    fn test_time_of_day_bands() {
        assert_eq!(time_of_day_score(6), 0.9);
        assert_eq!(time_of_day_score(10), 0.9);
        assert_eq!(time_of_day_score(11), 0.7);
        assert_eq!(time_of_day_score(14), 0.7);
        assert_eq!(time_of_day_score(15), 0.4);
        assert_eq!(time_of_day_score(18), 0.4);
        assert_eq!(time_of_day_score(19), 0.6);
        assert_eq!(time_of_day_score(22), 0.6);
        assert_eq!(time_of_day_score(23), 0.3);
        assert_eq!(time_of_day_score(3), 0.3);
    }

    #[test]
    fn test_recent_activity_floor_at_zero() {
        let mut model = EnergyModel::new();
        let sample = model.calculate_energy_level(at_hour(8), 7, None);
        assert_eq!(sample.factors.recent_activity, 0.0);
    }

    #[test]
    fn test_break_quality_thresholds() {
        let now = at_hour(9);
        assert_eq!(break_quality_score(now, None), 0.5);
        assert_eq!(
            break_quality_score(now, Some(now - Duration::minutes(20))),
            0.9
        );
        assert_eq!(
            break_quality_score(now, Some(now - Duration::minutes(5))),
            0.7
        );
        assert_eq!(
            break_quality_score(now, Some(now - Duration::minutes(2))),
            0.3
        );
    }

    #[test]
    fn test_level_thresholds_are_lower_inclusive() {
        assert_eq!(EnergyLevel::from_score(0.7), EnergyLevel::High);
        assert_eq!(EnergyLevel::from_score(0.69), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_score(0.4), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_score(0.39), EnergyLevel::Low);
    }

    #[test]
    fn test_calculation_replaces_cached_sample() {
        let mut model = EnergyModel::new();
        assert!(model.cached().is_none());
        model.calculate_energy_level(at_hour(8), 0, None);
        let first = model.cached().unwrap().clone();
        model.calculate_energy_level(at_hour(16), 4, None);
        let second = model.cached().unwrap();
        assert_ne!(first.level, second.level);
        assert_eq!(second.timestamp, at_hour(16));
    }
}
