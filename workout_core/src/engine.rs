//! Plan assembly.
//!
//! For each day of the matching split template:
//! - pick a warm-up
//! - fill the split slots with the goal's work-set prescription
//! - top up when the day is well under its time budget
//! - time-box to the budget
//! - order as warm-up, main work, one core exercise last
//!
//! Days are independent; an exercise may appear on several days.

use crate::budget::BudgetEstimator;
use crate::catalog::CatalogGateway;
use crate::order::core_last;
use crate::safety::banned_muscles;
use crate::scheme::{scheme_for, GoalScheme};
use crate::slots::{DayLedger, SlotFiller};
use crate::splits::SplitStore;
use crate::topup::{TopUp, TopUpLimits};
use crate::warmup::pick_warmup;
use crate::{Plan, PlanRequest, PlannedDay, PlannerConfig, Result, SplitDay};
use rand::Rng;

/// Plan generator over a catalog and a split store
pub struct Planner<'a, C: CatalogGateway + ?Sized, S: SplitStore + ?Sized> {
    catalog: &'a C,
    splits: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, C, S> Planner<'a, C, S>
where
    C: CatalogGateway + ?Sized,
    S: SplitStore + ?Sized,
{
    pub fn new(catalog: &'a C, splits: &'a S, config: &'a PlannerConfig) -> Self {
        Self {
            catalog,
            splits,
            config,
        }
    }

    /// Generate a plan, or `Ok(None)` when no split matches the request
    ///
    /// Catalog failures are returned as errors; empty candidate pools are not.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &PlanRequest,
        rng: &mut R,
    ) -> Result<Option<Plan>> {
        let Some(split) = self
            .splits
            .split_for(&request.goal, request.sessions_per_week)?
        else {
            tracing::info!(
                "No split found for '{}' at {} sessions/week",
                request.goal,
                request.sessions_per_week
            );
            return Ok(None);
        };

        let scheme = scheme_for(&request.goal);
        let banned = banned_muscles(&request.injuries);
        let budget_seconds = self.config.budget_seconds(request.session_minutes);

        tracing::info!(
            "Generating '{}' ({} days, {}s per session, {} injuries)",
            split.name,
            split.days.len(),
            budget_seconds,
            request.injuries.len()
        );

        let filler = SlotFiller::new(
            self.catalog,
            &banned,
            request.equipment.as_deref(),
            self.config.candidate_pool_size,
        );
        let top_up = TopUp {
            estimator: BudgetEstimator::from(self.config),
            limits: TopUpLimits::from(self.config),
            banned: &banned,
            budget_seconds,
        };

        let mut days = Vec::with_capacity(split.days.len());
        for day in &split.days {
            days.push(self.build_day(day, &scheme, &filler, &top_up, rng)?);
        }

        Ok(Some(Plan { days }))
    }

    fn build_day<R: Rng + ?Sized>(
        &self,
        day: &SplitDay,
        scheme: &GoalScheme,
        filler: &SlotFiller<'_, C>,
        top_up: &TopUp<'_>,
        rng: &mut R,
    ) -> Result<PlannedDay> {
        let mut ledger = DayLedger::new();
        let mut exercises = Vec::new();

        if let Some(warmup) = pick_warmup(filler, scheme, &day.name, &mut ledger, rng)? {
            exercises.push(warmup);
        }

        let fill = filler.fill(&day.slots, scheme.work_set(), &mut ledger, rng)?;
        exercises.extend(fill.exercises);

        top_up.apply(&mut exercises, &mut ledger, &fill.pools);
        let exercises = core_last(top_up.estimator.time_box(exercises, top_up.budget_seconds));

        let total = top_up.estimator.total_seconds(&exercises);
        tracing::info!(
            "Day '{}': {} exercises, ~{} min",
            day.name,
            exercises.len(),
            total.div_ceil(60)
        );

        Ok(PlannedDay {
            name: day.name.clone(),
            notes: format!(
                "~{} of {} min",
                total.div_ceil(60),
                top_up.budget_seconds / 60
            ),
            exercises,
        })
    }
}
