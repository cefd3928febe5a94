//! Slot filling for a single training day.
//!
//! Each slot pulls candidates for its tag from the catalog, drops unsafe
//! ones, shuffles, and takes exercises until its count is met. Duplicates are
//! tracked per day across all slots, by catalog id and by normalized name.

use crate::catalog::{equipment_filter, CatalogGateway, ExerciseFilter};
use crate::safety::{is_safe, BannedMuscleSet};
use crate::{ExerciseCandidate, MetaTag, PlannedExercise, Prescription, Result, SlotTag, SplitSlot};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Exercises already used in the day being built
#[derive(Clone, Debug, Default)]
pub struct DayLedger {
    ids: HashSet<String>,
    names: HashSet<String>,
}

impl DayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate: &ExerciseCandidate) -> bool {
        self.ids.contains(&candidate.id) || self.names.contains(&candidate.normalized_name())
    }

    /// Record a candidate; returns false if it was already used
    pub fn record(&mut self, candidate: &ExerciseCandidate) -> bool {
        if self.contains(candidate) {
            return false;
        }
        self.ids.insert(candidate.id.clone());
        self.names.insert(candidate.normalized_name());
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Shuffled safe candidates per slot tag, in first-seen slot order
#[derive(Clone, Debug, Default)]
pub struct SlotPools {
    pools: Vec<(SlotTag, Vec<ExerciseCandidate>)>,
}

impl SlotPools {
    fn insert(&mut self, tag: SlotTag, pool: Vec<ExerciseCandidate>) {
        if !self.pools.iter().any(|(t, _)| *t == tag) {
            self.pools.push((tag, pool));
        }
    }

    pub fn get(&self, tag: SlotTag) -> Option<&[ExerciseCandidate]> {
        self.pools
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, pool)| pool.as_slice())
    }

    pub fn tags(&self) -> impl Iterator<Item = SlotTag> + '_ {
        self.pools.iter().map(|(tag, _)| *tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotTag, &[ExerciseCandidate])> {
        self.pools.iter().map(|(tag, pool)| (*tag, pool.as_slice()))
    }

    /// True when at least one tag has a candidate
    pub fn has_candidates(&self) -> bool {
        self.pools.iter().any(|(_, pool)| !pool.is_empty())
    }
}

/// Result of filling a day's slots
#[derive(Clone, Debug, Default)]
pub struct SlotFill {
    pub exercises: Vec<PlannedExercise>,
    pub pools: SlotPools,
}

/// Build a planned exercise from a catalog candidate
pub fn plan_exercise(
    candidate: &ExerciseCandidate,
    prescription: Prescription,
    meta_tag: MetaTag,
) -> PlannedExercise {
    PlannedExercise {
        catalog_id: candidate.id.clone(),
        name: candidate.name.clone(),
        prescription,
        meta_tag,
    }
}

/// Fetches safe, shuffled candidate pools and fills slots from them
pub struct SlotFiller<'a, C: CatalogGateway + ?Sized> {
    catalog: &'a C,
    banned: &'a BannedMuscleSet,
    equipment: Option<String>,
    pool_size: usize,
}

impl<'a, C: CatalogGateway + ?Sized> SlotFiller<'a, C> {
    pub fn new(
        catalog: &'a C,
        banned: &'a BannedMuscleSet,
        equipment: Option<&str>,
        pool_size: usize,
    ) -> Self {
        Self {
            catalog,
            banned,
            equipment: equipment_filter(equipment),
            pool_size,
        }
    }

    /// Safe candidates for a catalog tag, in random order
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        tag: &str,
        rng: &mut R,
    ) -> Result<Vec<ExerciseCandidate>> {
        let filter = ExerciseFilter::new()
            .tag(tag)
            .equipment(self.equipment.clone())
            .page(1, self.pool_size);

        let fetched = self.catalog.exercises_by_filter(&filter)?;
        let fetched_count = fetched.len();
        let mut safe: Vec<_> = fetched
            .into_iter()
            .filter(|c| is_safe(c, self.banned))
            .collect();
        safe.shuffle(rng);

        tracing::debug!(
            "Tag '{}': {} fetched, {} safe",
            tag,
            fetched_count,
            safe.len()
        );
        Ok(safe)
    }

    /// Fill `slots` in order, recording every accepted exercise in `ledger`
    ///
    /// Slots with no usable candidates are skipped, so a day may come out
    /// shorter than its nominal slot count.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        slots: &[SplitSlot],
        prescription: Prescription,
        ledger: &mut DayLedger,
        rng: &mut R,
    ) -> Result<SlotFill> {
        let mut fill = SlotFill::default();

        for slot in slots {
            let pool = self.candidates(slot.tag.as_str(), rng)?;
            if pool.is_empty() {
                tracing::debug!("Skipping slot '{}': no safe candidates", slot.tag);
            }

            let mut taken = 0;
            for candidate in &pool {
                if taken >= slot.count {
                    break;
                }
                if ledger.record(candidate) {
                    fill.exercises.push(plan_exercise(
                        candidate,
                        prescription,
                        MetaTag::Slot(slot.tag),
                    ));
                    taken += 1;
                }
            }

            if taken < slot.count {
                tracing::debug!(
                    "Slot '{}' filled {}/{}",
                    slot.tag,
                    taken,
                    slot.count
                );
            }

            fill.pools.insert(slot.tag, pool);
        }

        Ok(fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::safety::banned_muscles;
    use crate::{Error, ExerciseCandidate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(id: &str, name: &str, tags: &[&str], equipment: &str) -> ExerciseCandidate {
        ExerciseCandidate {
            id: id.into(),
            name: name.into(),
            equipment: equipment.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn prescription() -> Prescription {
        Prescription::WorkSet {
            sets: 3,
            rep_min: 8,
            rep_max: 12,
            rest_seconds: 60,
        }
    }

    struct FailingCatalog;

    impl CatalogGateway for FailingCatalog {
        fn exercises_by_filter(&self, _: &ExerciseFilter) -> Result<Vec<ExerciseCandidate>> {
            Err(Error::Catalog("connection refused".into()))
        }

        fn exercise_by_id(&self, _: &str) -> Result<Option<ExerciseCandidate>> {
            Err(Error::Catalog("connection refused".into()))
        }
    }

    #[test]
    fn test_fills_requested_counts() {
        let catalog = InMemoryCatalog::new(
            (0..5)
                .map(|i| candidate(&format!("c{}", i), &format!("Chest {}", i), &["chest"], "dumbbell"))
                .collect(),
        );
        let banned = BannedMuscleSet::default();
        let filler = SlotFiller::new(&catalog, &banned, Some("gym"), 100);
        let mut rng = StdRng::seed_from_u64(7);
        let mut ledger = DayLedger::new();

        let fill = filler
            .fill(
                &[SplitSlot { tag: SlotTag::Chest, count: 3 }],
                prescription(),
                &mut ledger,
                &mut rng,
            )
            .unwrap();

        assert_eq!(fill.exercises.len(), 3);
        assert!(fill
            .exercises
            .iter()
            .all(|e| e.meta_tag == MetaTag::Slot(SlotTag::Chest)));
        assert_eq!(fill.pools.get(SlotTag::Chest).map(|p| p.len()), Some(5));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_dedups_across_slots() {
        // Every candidate carries both tags, so the second slot must avoid the first's picks
        let catalog = InMemoryCatalog::new(
            (0..4)
                .map(|i| candidate(&format!("c{}", i), &format!("Move {}", i), &["chest", "compound"], ""))
                .collect(),
        );
        let banned = BannedMuscleSet::default();
        let filler = SlotFiller::new(&catalog, &banned, None, 100);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ledger = DayLedger::new();
            let fill = filler
                .fill(
                    &[
                        SplitSlot { tag: SlotTag::Chest, count: 2 },
                        SplitSlot { tag: SlotTag::Compound, count: 3 },
                    ],
                    prescription(),
                    &mut ledger,
                    &mut rng,
                )
                .unwrap();

            assert_eq!(fill.exercises.len(), 4);
            let ids: HashSet<_> = fill.exercises.iter().map(|e| e.catalog_id.clone()).collect();
            assert_eq!(ids.len(), 4);
        }
    }

    #[test]
    fn test_dedups_by_normalized_name() {
        let catalog = InMemoryCatalog::new(vec![
            candidate("a", "Push-Up", &["chest"], ""),
            candidate("b", " push-up ", &["chest"], ""),
        ]);
        let banned = BannedMuscleSet::default();
        let filler = SlotFiller::new(&catalog, &banned, None, 100);
        let mut ledger = DayLedger::new();

        let fill = filler
            .fill(
                &[SplitSlot { tag: SlotTag::Chest, count: 2 }],
                prescription(),
                &mut ledger,
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();
        assert_eq!(fill.exercises.len(), 1);
    }

    #[test]
    fn test_equipment_filter_applies() {
        let catalog = InMemoryCatalog::new(vec![
            candidate("a", "DB Press", &["chest"], "dumbbell"),
            candidate("b", "BB Press", &["chest"], "barbell"),
        ]);
        let banned = BannedMuscleSet::default();
        let filler = SlotFiller::new(&catalog, &banned, Some("Dumbbell"), 100);

        let pool = filler
            .candidates("chest", &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, "a");
    }

    #[test]
    fn test_empty_slot_is_skipped() {
        let catalog = InMemoryCatalog::new(vec![candidate("a", "Goblet Squat", &["quads"], "")]);
        let banned = banned_muscles(&["knees"]);
        let filler = SlotFiller::new(&catalog, &banned, None, 100);
        let mut ledger = DayLedger::new();

        let fill = filler
            .fill(
                &[SplitSlot { tag: SlotTag::Quads, count: 2 }],
                prescription(),
                &mut ledger,
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();
        assert!(fill.exercises.is_empty());
        assert!(!fill.pools.has_candidates());
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let banned = BannedMuscleSet::default();
        let filler = SlotFiller::new(&FailingCatalog, &banned, None, 100);
        let result = filler.fill(
            &[SplitSlot { tag: SlotTag::Chest, count: 1 }],
            prescription(),
            &mut DayLedger::new(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(Error::Catalog(_))));
    }
}
