//! Warm-up selection for a training day.

use crate::catalog::CatalogGateway;
use crate::scheme::{GoalScheme, WARMUP_REST_SECONDS};
use crate::slots::{plan_exercise, DayLedger, SlotFiller};
use crate::{MetaTag, PlannedExercise, Prescription, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Day name that may opt out of a warm-up
const CARDIO_DAY: &str = "cardio";

/// Prefix marking a warm-up in a day's exercise list
pub const WARMUP_NAME_PREFIX: &str = "Warm-up: ";

/// Pick a warm-up for a day, or `None` when the day gets none
///
/// Tags are tried in the scheme's priority order; the first tag with any
/// safe candidate wins and one of its candidates is chosen at random.
pub fn pick_warmup<C, R>(
    filler: &SlotFiller<'_, C>,
    scheme: &GoalScheme,
    day_name: &str,
    ledger: &mut DayLedger,
    rng: &mut R,
) -> Result<Option<PlannedExercise>>
where
    C: CatalogGateway + ?Sized,
    R: Rng + ?Sized,
{
    if day_name.trim().eq_ignore_ascii_case(CARDIO_DAY) && !scheme.warmup.on_cardio_day {
        tracing::debug!("No warm-up on cardio day '{}'", day_name);
        return Ok(None);
    }

    for tag in &scheme.warmup.tags {
        let pool = filler.candidates(tag.as_str(), rng)?;
        let available: Vec<_> = pool.iter().filter(|c| !ledger.contains(c)).collect();
        let Some(candidate) = available.choose(rng).copied() else {
            continue;
        };

        ledger.record(candidate);
        let mut warmup = plan_exercise(
            candidate,
            Prescription::Warmup {
                duration_sec_min: scheme.warmup.duration_sec_min,
                duration_sec_max: scheme.warmup.duration_sec_max,
                rest_seconds: WARMUP_REST_SECONDS,
            },
            MetaTag::Warmup,
        );
        warmup.name = format!("{}{}", WARMUP_NAME_PREFIX, candidate.name);
        return Ok(Some(warmup));
    }

    tracing::debug!("No warm-up candidates for '{}'", day_name);
    Ok(None)
}
