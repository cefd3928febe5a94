//! Top-up of days that come out well under their time budget.
//!
//! Extra exercises are drawn round-robin from the day's slot pools with a
//! conservative accessory prescription. [`RoundRobin`] bounds the number of
//! draws; the caller stops earlier on additions, day size, or budget.

use crate::budget::BudgetEstimator;
use crate::safety::{is_safe, BannedMuscleSet};
use crate::scheme::FALLBACK_PRESCRIPTION;
use crate::slots::{plan_exercise, DayLedger, SlotPools};
use crate::{ExerciseCandidate, MetaTag, PlannedExercise, PlannerConfig, SlotTag};
use std::collections::HashMap;

/// Cyclic draw over per-tag pools, one candidate per tag per round
///
/// Each tag keeps its own cursor that wraps around its pool. Yields at most
/// `max_iterations` items, and nothing when every pool is empty.
pub struct RoundRobin<'p> {
    pools: Vec<(SlotTag, &'p [ExerciseCandidate])>,
    cursors: Vec<usize>,
    next_pool: usize,
    iterations: usize,
    max_iterations: usize,
}

impl<'p> RoundRobin<'p> {
    pub fn new(pools: &'p SlotPools, max_iterations: usize) -> Self {
        let pools: Vec<_> = pools.iter().filter(|(_, pool)| !pool.is_empty()).collect();
        Self {
            cursors: vec![0; pools.len()],
            pools,
            next_pool: 0,
            iterations: 0,
            max_iterations,
        }
    }
}

impl<'p> Iterator for RoundRobin<'p> {
    type Item = (SlotTag, &'p ExerciseCandidate);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pools.is_empty() || self.iterations >= self.max_iterations {
            return None;
        }
        self.iterations += 1;

        let index = self.next_pool;
        self.next_pool = (index + 1) % self.pools.len();

        let (tag, pool) = self.pools[index];
        let candidate = &pool[self.cursors[index] % pool.len()];
        self.cursors[index] += 1;

        Some((tag, candidate))
    }
}

/// Stopping limits for top-up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopUpLimits {
    pub threshold: f64,
    pub max_additions: usize,
    pub max_exercises: usize,
    pub max_iterations: usize,
    pub core_anti_extension_cap: usize,
}

impl From<&PlannerConfig> for TopUpLimits {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            threshold: config.top_up_threshold,
            max_additions: config.top_up_max_additions,
            max_exercises: config.max_exercises_per_day,
            max_iterations: config.top_up_max_iterations,
            core_anti_extension_cap: config.core_anti_extension_cap,
        }
    }
}

impl TopUpLimits {
    fn cap_for(&self, tag: SlotTag) -> Option<usize> {
        match tag {
            SlotTag::CoreAntiExtension => Some(self.core_anti_extension_cap),
            _ => None,
        }
    }
}

/// Top-up pass for one day
pub struct TopUp<'a> {
    pub estimator: BudgetEstimator,
    pub limits: TopUpLimits,
    pub banned: &'a BannedMuscleSet,
    pub budget_seconds: u32,
}

impl<'a> TopUp<'a> {
    /// Whether a day is far enough under budget to be topped up
    pub fn is_needed(&self, day: &[PlannedExercise], pools: &SlotPools) -> bool {
        let total = self.estimator.total_seconds(day) as f64;
        pools.has_candidates() && total < self.limits.threshold * self.budget_seconds as f64
    }

    /// Append extra exercises to `day`; returns how many were added
    pub fn apply(
        &self,
        day: &mut Vec<PlannedExercise>,
        ledger: &mut DayLedger,
        pools: &SlotPools,
    ) -> usize {
        if !self.is_needed(day, pools) {
            return 0;
        }

        let mut added = 0;
        let mut added_per_tag: HashMap<SlotTag, usize> = HashMap::new();

        for (tag, candidate) in RoundRobin::new(pools, self.limits.max_iterations) {
            if added >= self.limits.max_additions
                || day.len() >= self.limits.max_exercises
                || self.estimator.total_seconds(day) >= self.budget_seconds
            {
                break;
            }

            let tag_count = added_per_tag.entry(tag).or_default();
            if self.limits.cap_for(tag).is_some_and(|cap| *tag_count >= cap) {
                continue;
            }
            if !is_safe(candidate, self.banned) || !ledger.record(candidate) {
                continue;
            }

            day.push(plan_exercise(candidate, FALLBACK_PRESCRIPTION, MetaTag::Slot(tag)));
            *tag_count += 1;
            added += 1;
        }

        if added > 0 {
            tracing::debug!(
                "Topped up {} exercises ({}s of {}s)",
                added,
                self.estimator.total_seconds(day),
                self.budget_seconds
            );
        }
        added
    }
}
