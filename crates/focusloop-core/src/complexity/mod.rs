//! Deterministic task-complexity scoring.
//!
//! A weighted eight-factor score over a single task, plus aggregate
//! statistics over a task set. Scoring is a pure function of the task;
//! scores are recomputed on every query and never stored.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority};

/// Fixed factor weights. Sum to 1.0.
const W_DURATION: f64 = 0.20;
const W_PRIORITY: f64 = 0.15;
const W_TAGS: f64 = 0.10;
const W_DEPENDENCIES: f64 = 0.10;
const W_CONTEXT: f64 = 0.15;
const W_COGNITIVE: f64 = 0.15;
const W_PHYSICAL: f64 = 0.10;
const W_EMOTIONAL: f64 = 0.05;

const CONTEXT_KEYWORDS: [&str; 4] = ["analysis", "research", "planning", "coordination"];
const COGNITIVE_KEYWORDS: [&str; 6] = [
    "analysis", "research", "planning", "design", "writing", "learning",
];
const PHYSICAL_KEYWORDS: [&str; 5] = ["cleaning", "moving", "setup", "assembly", "exercise"];
const EMOTIONAL_KEYWORDS: [&str; 5] = [
    "communication",
    "presentation",
    "meeting",
    "evaluation",
    "feedback",
];

/// Complexity bucket. Bucket boundaries are half-open: an overall score of
/// exactly 30 is already `Moderate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityLevel {
    fn from_overall(overall: f64) -> Self {
        if overall < 30.0 {
            ComplexityLevel::Simple
        } else if overall < 50.0 {
            ComplexityLevel::Moderate
        } else if overall < 70.0 {
            ComplexityLevel::Complex
        } else {
            ComplexityLevel::VeryComplex
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplexityLevel::Simple => "simple",
            ComplexityLevel::Moderate => "moderate",
            ComplexityLevel::Complex => "complex",
            ComplexityLevel::VeryComplex => "very-complex",
        }
    }
}

/// Individual factor scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityFactors {
    pub duration: f64,
    pub priority: f64,
    pub tags: f64,
    pub dependencies: f64,
    pub context: f64,
    pub cognitive: f64,
    pub physical: f64,
    pub emotional: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityScore {
    /// Weighted total in [0, 100].
    pub overall: f64,
    pub factors: ComplexityFactors,
    pub level: ComplexityLevel,
    /// One entry per triggered factor, in factor declaration order.
    pub recommendations: Vec<String>,
    /// 1-10 difficulty estimate.
    pub estimated_difficulty: u8,
    /// Multiplier for time estimates, in [1.0, 1.5].
    pub time_multiplier: f64,
}

/// Pure scoring engine over single tasks.
pub struct ComplexityScorer;

impl ComplexityScorer {
    pub fn score(task: &Task) -> ComplexityScore {
        let factors = Self::factors(task);
        let overall = (factors.duration * W_DURATION
            + factors.priority * W_PRIORITY
            + factors.tags * W_TAGS
            + factors.dependencies * W_DEPENDENCIES
            + factors.context * W_CONTEXT
            + factors.cognitive * W_COGNITIVE
            + factors.physical * W_PHYSICAL
            + factors.emotional * W_EMOTIONAL)
            * 100.0;

        ComplexityScore {
            overall,
            factors,
            level: ComplexityLevel::from_overall(overall),
            recommendations: Self::recommendations(&factors),
            estimated_difficulty: (overall / 100.0 * 10.0).round() as u8,
            time_multiplier: 1.0 + overall / 100.0 * 0.5,
        }
    }

    fn factors(task: &Task) -> ComplexityFactors {
        ComplexityFactors {
            duration: (task.estimated_pomodoros as f64 / 10.0).min(1.0),
            priority: match task.priority {
                TaskPriority::High => 0.8,
                TaskPriority::Medium => 0.5,
                TaskPriority::Low => 0.2,
            },
            tags: (task.tags.len() as f64 / 5.0).min(1.0),
            // Dependency tracking is not modeled yet; fixed placeholder.
            dependencies: 0.3,
            context: Self::tag_factor(task, &CONTEXT_KEYWORDS, 0.8, 0.3),
            cognitive: Self::tag_factor(task, &COGNITIVE_KEYWORDS, 0.8, 0.3),
            physical: Self::tag_factor(task, &PHYSICAL_KEYWORDS, 0.7, 0.2),
            emotional: Self::tag_factor(task, &EMOTIONAL_KEYWORDS, 0.6, 0.2),
        }
    }

    /// Case-insensitive substring containment of any keyword in any tag.
    fn tag_factor(task: &Task, keywords: &[&str], hit: f64, miss: f64) -> f64 {
        let matched = task.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            keywords.iter().any(|kw| tag.contains(kw))
        });
        if matched {
            hit
        } else {
            miss
        }
    }

    /// One recommendation per factor that exceeds its trigger threshold,
    /// in factor declaration order.
    fn recommendations(factors: &ComplexityFactors) -> Vec<String> {
        let rules: [(f64, f64, &str); 8] = [
            (
                factors.duration,
                0.7,
                "Long estimate: consider splitting into smaller tasks",
            ),
            (
                factors.priority,
                0.7,
                "High priority: schedule during peak energy hours",
            ),
            (
                factors.tags,
                0.7,
                "Many contexts involved: clarify scope before starting",
            ),
            (
                factors.dependencies,
                0.7,
                "Resolve blocking dependencies first",
            ),
            (
                factors.context,
                0.6,
                "Context-heavy work: reserve an uninterrupted block",
            ),
            (
                factors.cognitive,
                0.6,
                "Cognitively demanding: avoid low-energy hours",
            ),
            (
                factors.physical,
                0.6,
                "Physically demanding: plan recovery breaks",
            ),
            (
                factors.emotional,
                0.6,
                "Emotionally demanding: schedule downtime after",
            ),
        ];

        rules
            .iter()
            .filter(|(value, threshold, _)| value > threshold)
            .map(|(_, _, text)| (*text).to_string())
            .collect()
    }
}

/// A task's place in the aggregate ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskScore {
    pub task_id: String,
    pub title: String,
    pub overall: f64,
}

/// Level histogram over a task set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelCounts {
    pub simple: usize,
    pub moderate: usize,
    pub complex: usize,
    pub very_complex: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityStats {
    pub average_overall: f64,
    pub levels: LevelCounts,
    /// Top five by score, descending. Ties keep input order.
    pub most_complex: Vec<TaskScore>,
    /// Bottom five by score, ascending. Ties keep input order.
    pub least_complex: Vec<TaskScore>,
}

/// Aggregate complexity statistics across a task set.
pub fn complexity_stats(tasks: &[Task]) -> ComplexityStats {
    let scored: Vec<TaskScore> = tasks
        .iter()
        .map(|t| TaskScore {
            task_id: t.id.clone(),
            title: t.title.clone(),
            overall: ComplexityScorer::score(t).overall,
        })
        .collect();

    let mut levels = LevelCounts::default();
    for s in &scored {
        match ComplexityLevel::from_overall(s.overall) {
            ComplexityLevel::Simple => levels.simple += 1,
            ComplexityLevel::Moderate => levels.moderate += 1,
            ComplexityLevel::Complex => levels.complex += 1,
            ComplexityLevel::VeryComplex => levels.very_complex += 1,
        }
    }

    let average_overall = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|s| s.overall).sum::<f64>() / scored.len() as f64
    };

    // sort_by is stable, so equal scores keep the input order.
    let mut descending = scored.clone();
    descending.sort_by(|a, b| b.overall.partial_cmp(&a.overall).expect("finite scores"));
    let mut ascending = scored;
    ascending.sort_by(|a, b| a.overall.partial_cmp(&b.overall).expect("finite scores"));

    ComplexityStats {
        average_overall,
        levels,
        most_complex: descending.into_iter().take(5).collect(),
        least_complex: ascending.into_iter().take(5).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(tags: &[&str], priority: TaskPriority, estimate: u32) -> Task {
        Task::new("t")
            .with_tags(tags.iter().map(|s| s.to_string()).collect())
            .with_priority(priority)
            .with_estimate(estimate)
    }

    #[test]
    fn test_worked_example_scores_62() {
        let t = task(
            &["research", "planning", "meeting"],
            TaskPriority::High,
            6,
        );
        let score = ComplexityScorer::score(&t);

        assert!((score.factors.duration - 0.6).abs() < 1e-9);
        assert!((score.factors.priority - 0.8).abs() < 1e-9);
        assert!((score.factors.tags - 0.6).abs() < 1e-9);
        assert!((score.factors.context - 0.8).abs() < 1e-9);
        assert!((score.factors.cognitive - 0.8).abs() < 1e-9);
        assert!((score.factors.physical - 0.2).abs() < 1e-9);
        assert!((score.factors.emotional - 0.6).abs() < 1e-9);
        assert!((score.overall - 62.0).abs() < 1e-6);
        assert_eq!(score.level, ComplexityLevel::Complex);
        assert_eq!(score.estimated_difficulty, 6);
        assert!((score.time_multiplier - 1.31).abs() < 1e-6);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(ComplexityLevel::from_overall(29.999), ComplexityLevel::Simple);
        assert_eq!(ComplexityLevel::from_overall(30.0), ComplexityLevel::Moderate);
        assert_eq!(ComplexityLevel::from_overall(49.999), ComplexityLevel::Moderate);
        assert_eq!(ComplexityLevel::from_overall(50.0), ComplexityLevel::Complex);
        assert_eq!(ComplexityLevel::from_overall(70.0), ComplexityLevel::VeryComplex);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let t = task(&["Deep-Research-Phase"], TaskPriority::Low, 1);
        let score = ComplexityScorer::score(&t);
        assert!((score.factors.context - 0.8).abs() < 1e-9);
        assert!((score.factors.cognitive - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_duration_factor_saturates() {
        let t = task(&[], TaskPriority::Low, 25);
        assert!((ComplexityScorer::score(&t).factors.duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_follow_declaration_order() {
        let t = task(
            &["research", "planning", "meeting"],
            TaskPriority::High,
            6,
        );
        let recs = ComplexityScorer::score(&t).recommendations;
        // priority (0.8 > 0.7), context (0.8 > 0.6), cognitive (0.8 > 0.6).
        // emotional sits exactly at its 0.6 threshold and must not trigger.
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("High priority"));
        assert!(recs[1].contains("Context-heavy"));
        assert!(recs[2].contains("Cognitively demanding"));
    }

    #[test]
    fn test_stats_histogram_and_ranking() {
        let tasks = vec![
            task(&[], TaskPriority::Low, 1),                           // simple
            task(&["research", "design"], TaskPriority::High, 8),      // complex
            task(&[], TaskPriority::Medium, 3),                        // moderate-ish
        ];
        let stats = complexity_stats(&tasks);
        assert_eq!(
            stats.levels.simple + stats.levels.moderate + stats.levels.complex
                + stats.levels.very_complex,
            3
        );
        assert_eq!(stats.most_complex.len(), 3);
        assert!(stats.most_complex[0].overall >= stats.most_complex[1].overall);
        assert!(stats.least_complex[0].overall <= stats.least_complex[1].overall);
        assert!(stats.average_overall > 0.0);
    }

    #[test]
    fn test_stats_ties_keep_input_order() {
        let mut a = task(&[], TaskPriority::Low, 1);
        a.title = "first".into();
        let mut b = task(&[], TaskPriority::Low, 1);
        b.title = "second".into();
        let stats = complexity_stats(&[a, b]);
        assert_eq!(stats.most_complex[0].title, "first");
        assert_eq!(stats.most_complex[1].title, "second");
        assert_eq!(stats.least_complex[0].title, "first");
    }

    #[test]
    fn test_empty_task_set() {
        let stats = complexity_stats(&[]);
        assert_eq!(stats.average_overall, 0.0);
        assert!(stats.most_complex.is_empty());
    }
}
