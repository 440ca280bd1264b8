//! Historical per-hour energy mining.
//!
//! Groups focus sessions by start hour and derives a descriptive
//! productivity profile. The profile is independent of the live
//! [`super::EnergyModel`] estimate and is not fed back into it.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use super::EnergyLevel;
use crate::session::PomodoroSession;

/// Productivity profile of a single hour of the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEnergyPattern {
    /// Hour of day (0-23)
    pub hour: u32,
    /// min(1, total focus minutes / (sessions x 25))
    pub productivity: f64,
    /// max(0, 1 - average interruptions / 3)
    pub focus: f64,
    /// Completed sessions over all sessions in the bucket.
    pub motivation: f64,
    pub energy_level: EnergyLevel,
    /// Number of sessions behind this bucket.
    pub sample_count: usize,
}

/// Mine per-hour patterns from session history.
///
/// Break sessions are excluded; a bucket contains every focus session that
/// started in that hour, completed or not. Hours without sessions produce
/// no entry. Results are ordered by hour.
pub fn analyze_energy_patterns(sessions: &[PomodoroSession]) -> Vec<HourlyEnergyPattern> {
    let mut patterns = Vec::new();

    for hour in 0..24u32 {
        let bucket: Vec<&PomodoroSession> = sessions
            .iter()
            .filter(|s| !s.is_break && s.start_time.hour() == hour)
            .collect();
        if bucket.is_empty() {
            continue;
        }

        let count = bucket.len();
        let total_duration: u64 = bucket.iter().map(|s| s.duration_min as u64).sum();
        let completed = bucket.iter().filter(|s| s.completed).count();
        let avg_interruptions =
            bucket.iter().map(|s| s.interruptions as f64).sum::<f64>() / count as f64;

        let productivity = (total_duration as f64 / (count as f64 * 25.0)).min(1.0);
        let focus = (1.0 - avg_interruptions / 3.0).max(0.0);
        let motivation = completed as f64 / count as f64;
        let mean = (productivity + focus + motivation) / 3.0;

        patterns.push(HourlyEnergyPattern {
            hour,
            productivity,
            focus,
            motivation,
            energy_level: EnergyLevel::from_score(mean),
            sample_count: count,
        });
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(hour: u32, duration_min: u32, completed: bool, interruptions: u32) -> PomodoroSession {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, hour, 10, 0).unwrap();
        let mut s = PomodoroSession::new(None, duration_min, false);
        s.start_time = start;
        s.completed = completed;
        s.interruptions = interruptions;
        s
    }

    #[test]
    fn test_empty_history_yields_no_patterns() {
        assert!(analyze_energy_patterns(&[]).is_empty());
    }

    #[test]
    fn test_productive_morning_bucket() {
        let sessions = vec![
            session(9, 25, true, 0),
            session(9, 25, true, 0),
        ];
        let patterns = analyze_energy_patterns(&sessions);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.hour, 9);
        assert_eq!(p.sample_count, 2);
        assert!((p.productivity - 1.0).abs() < 1e-9);
        assert!((p.focus - 1.0).abs() < 1e-9);
        assert!((p.motivation - 1.0).abs() < 1e-9);
        assert_eq!(p.energy_level, EnergyLevel::High);
    }

    #[test]
    fn test_interruptions_drag_focus_down() {
        let sessions = vec![session(14, 25, true, 3)];
        let patterns = analyze_energy_patterns(&sessions);
        assert!((patterns[0].focus - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_motivation_counts_incomplete_sessions() {
        let sessions = vec![
            session(10, 25, true, 0),
            session(10, 5, false, 0),
        ];
        let patterns = analyze_energy_patterns(&sessions);
        assert!((patterns[0].motivation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_breaks_are_excluded() {
        let mut brk = session(11, 5, true, 0);
        brk.is_break = true;
        let patterns = analyze_energy_patterns(&[brk]);
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_productivity_saturates_at_one() {
        let sessions = vec![session(8, 50, true, 0)];
        let patterns = analyze_energy_patterns(&sessions);
        assert!((patterns[0].productivity - 1.0).abs() < 1e-9);
    }
}
