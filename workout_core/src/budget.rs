//! Session time estimation and time-boxing.
//!
//! Working-set time is modelled at a fixed number of seconds per repetition.
//! The constant is a simplification, not a physiological model, and is kept
//! configurable so existing plans stay numerically reproducible.

use crate::{PlannedExercise, PlannerConfig, Prescription};

/// Exercises always kept when time-boxing would otherwise empty a day
pub const MIN_KEPT_WHEN_OVER_BUDGET: usize = 3;

/// Time estimator parameterised by the planner constants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetEstimator {
    pub seconds_per_rep: u32,
    pub transition_seconds: u32,
}

impl Default for BudgetEstimator {
    fn default() -> Self {
        Self::from(&PlannerConfig::default())
    }
}

impl From<&PlannerConfig> for BudgetEstimator {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            seconds_per_rep: config.seconds_per_rep,
            transition_seconds: config.transition_seconds,
        }
    }
}

impl BudgetEstimator {
    /// `sets * (avg_reps * seconds_per_rep + rest)` with `avg_reps` floored
    ///
    /// A warm-up counts as one set with its duration range in place of reps.
    pub fn estimate_seconds(&self, exercise: &PlannedExercise) -> u32 {
        match exercise.prescription {
            Prescription::WorkSet {
                sets,
                rep_min,
                rep_max,
                rest_seconds,
            } => {
                let avg_reps = (rep_min + rep_max) / 2;
                sets * (avg_reps * self.seconds_per_rep + rest_seconds)
            }
            Prescription::Warmup {
                duration_sec_min,
                duration_sec_max,
                rest_seconds,
            } => {
                let avg = (duration_sec_min + duration_sec_max) / 2;
                avg * self.seconds_per_rep + rest_seconds
            }
        }
    }

    /// Sum of estimates plus one transition before every exercise but the first
    pub fn total_seconds(&self, exercises: &[PlannedExercise]) -> u32 {
        exercises
            .iter()
            .enumerate()
            .map(|(i, ex)| self.cost_at(i, ex))
            .sum()
    }

    fn cost_at(&self, index: usize, exercise: &PlannedExercise) -> u32 {
        let transition = if index == 0 { 0 } else { self.transition_seconds };
        self.estimate_seconds(exercise) + transition
    }

    /// Keep the longest prefix of `exercises` that fits in `budget_seconds`
    ///
    /// A non-empty input never produces an empty day: if not even the first
    /// exercise fits, the first few are kept regardless of budget.
    pub fn time_box(
        &self,
        exercises: Vec<PlannedExercise>,
        budget_seconds: u32,
    ) -> Vec<PlannedExercise> {
        let mut elapsed = 0;
        let mut fits = 0;

        for (i, exercise) in exercises.iter().enumerate() {
            let next = elapsed + self.cost_at(i, exercise);
            if next > budget_seconds {
                break;
            }
            elapsed = next;
            fits += 1;
        }

        let keep = if fits == 0 && !exercises.is_empty() {
            tracing::debug!(
                "No exercise fits {}s budget, keeping first {}",
                budget_seconds,
                MIN_KEPT_WHEN_OVER_BUDGET.min(exercises.len())
            );
            MIN_KEPT_WHEN_OVER_BUDGET
        } else {
            fits
        };

        if keep < exercises.len() {
            tracing::debug!(
                "Time-boxed day from {} to {} exercises",
                exercises.len(),
                keep.min(exercises.len())
            );
        }

        exercises.into_iter().take(keep).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetaTag;

    fn work(id: &str, sets: u32, rep_min: u32, rep_max: u32, rest: u32) -> PlannedExercise {
        PlannedExercise {
            catalog_id: id.into(),
            name: id.into(),
            prescription: Prescription::WorkSet {
                sets,
                rep_min,
                rep_max,
                rest_seconds: rest,
            },
            meta_tag: MetaTag::Untagged,
        }
    }

    #[test]
    fn test_estimate_seconds() {
        let budget = BudgetEstimator::default();
        // 3 * (10 * 6 + 60)
        assert_eq!(budget.estimate_seconds(&work("a", 3, 8, 12, 60)), 360);
        // avg reps floors: (12 + 15) / 2 = 13 -> 3 * (78 + 45)
        assert_eq!(budget.estimate_seconds(&work("b", 3, 12, 15, 45)), 369);
    }

    #[test]
    fn test_warmup_uses_work_set_formula() {
        let budget = BudgetEstimator::default();
        let warmup = PlannedExercise {
            catalog_id: "jj".into(),
            name: "Warm-up: Jumping Jacks".into(),
            prescription: Prescription::Warmup {
                duration_sec_min: 30,
                duration_sec_max: 60,
                rest_seconds: 30,
            },
            meta_tag: MetaTag::Warmup,
        };
        // 1 * (45 * 6 + 30)
        assert_eq!(budget.estimate_seconds(&warmup), 300);
    }

    #[test]
    fn test_total_adds_transitions() {
        let budget = BudgetEstimator::default();
        let day = vec![work("a", 3, 8, 12, 60), work("b", 3, 8, 12, 60), work("c", 3, 8, 12, 60)];
        assert_eq!(budget.total_seconds(&day), 360 * 3 + 40);
        assert_eq!(budget.total_seconds(&[]), 0);
    }

    #[test]
    fn test_time_box_trims_to_budget() {
        let budget = BudgetEstimator::default();
        let day: Vec<_> = (0..5).map(|i| work(&i.to_string(), 3, 8, 12, 60)).collect();

        // 360 + 380 = 740 fits, a third would need 1120
        let boxed = budget.time_box(day, 1000);
        assert_eq!(boxed.len(), 2);
        assert!(budget.total_seconds(&boxed) <= 1000);
    }

    #[test]
    fn test_time_box_exact_fit_is_kept() {
        let budget = BudgetEstimator::default();
        let day = vec![work("a", 3, 8, 12, 60), work("b", 3, 8, 12, 60)];
        assert_eq!(budget.time_box(day, 740).len(), 2);
    }

    #[test]
    fn test_time_box_never_empties_a_day() {
        let budget = BudgetEstimator::default();
        let day: Vec<_> = (0..5).map(|i| work(&i.to_string(), 10, 20, 20, 300)).collect();
        let boxed = budget.time_box(day, 600);
        assert_eq!(boxed.len(), 3);
        assert_eq!(boxed[0].catalog_id, "0");

        let short = vec![work("only", 10, 20, 20, 300)];
        assert_eq!(budget.time_box(short, 600).len(), 1);

        assert!(budget.time_box(Vec::new(), 600).is_empty());
    }
}
