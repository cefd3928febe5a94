//! Saved plans with file locking, plus the swap operations on saved days.
//!
//! Plans are kept in a single JSON document. Reads take a shared lock;
//! writes go to a locked temp file that is synced and renamed over the
//! original.

use crate::catalog::{equipment_filter, CatalogGateway, ExerciseFilter};
use crate::substitute::{self, RankedAlternative, SwapQuery};
use crate::warmup::WARMUP_NAME_PREFIX;
use crate::{Error, Plan, PlanRequest, PlannedExercise, Prescription, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Catalog page size used when gathering swap candidates
const ALTERNATIVE_POOL_SIZE: usize = 500;

/// A saved training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutDay {
    pub id: Uuid,
    pub name: String,
    pub notes: String,
    pub exercises: Vec<PlannedExercise>,
}

impl WorkoutDay {
    fn slot(&self, slot_order: usize) -> Result<&PlannedExercise> {
        self.exercises.get(slot_order).ok_or(Error::SlotNotFound {
            day: self.id,
            slot: slot_order,
        })
    }

    /// Catalog ids of every slot except `slot_order`
    fn other_ids(&self, slot_order: usize) -> HashSet<String> {
        self.exercises
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot_order)
            .map(|(_, e)| e.catalog_id.clone())
            .collect()
    }
}

/// A generated plan as saved
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedPlan {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub goal: String,
    pub sessions_per_week: u8,
    pub days: Vec<WorkoutDay>,
}

/// All saved plans
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PlanBook {
    #[serde(default)]
    pub plans: Vec<SavedPlan>,
}

impl PlanBook {
    /// Load the book from a file with shared locking
    ///
    /// A missing file is an empty book. Unlike transient state, a corrupt
    /// book is an error: it holds the user's plans.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No plan book at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let book: PlanBook = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded {} saved plans from {:?}", book.plans.len(), path);
        Ok(book)
    }

    /// Save the book atomically with exclusive locking
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("Plan path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} plans to {:?}", self.plans.len(), path);
        Ok(())
    }

    /// Load, modify and save back
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut PlanBook) -> Result<T>,
    {
        let mut book = Self::load(path)?;
        let value = f(&mut book)?;
        book.save(path)?;
        Ok(value)
    }

    /// Add a generated plan, assigning ids to the plan and its days
    pub fn save_plan(&mut self, plan: &Plan, request: &PlanRequest) -> SavedPlan {
        let saved = SavedPlan {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            goal: request.goal.clone(),
            sessions_per_week: request.sessions_per_week,
            days: plan
                .days
                .iter()
                .map(|day| WorkoutDay {
                    id: Uuid::new_v4(),
                    name: day.name.clone(),
                    notes: day.notes.clone(),
                    exercises: day.exercises.clone(),
                })
                .collect(),
        };
        tracing::info!("Saved plan {} with {} days", saved.id, saved.days.len());
        self.plans.push(saved.clone());
        saved
    }

    pub fn day(&self, day_id: Uuid) -> Result<&WorkoutDay> {
        self.plans
            .iter()
            .flat_map(|p| &p.days)
            .find(|d| d.id == day_id)
            .ok_or(Error::DayNotFound(day_id))
    }

    fn day_mut(&mut self, day_id: Uuid) -> Result<&mut WorkoutDay> {
        self.plans
            .iter_mut()
            .flat_map(|p| &mut p.days)
            .find(|d| d.id == day_id)
            .ok_or(Error::DayNotFound(day_id))
    }
}

/// Rank replacement exercises for one slot of a saved day
///
/// The candidate pool is every catalog exercise working the current
/// exercise's primary muscle under any of its spellings, narrowed to the requested equipment when one
/// is given.
pub fn rank_alternatives<C: CatalogGateway + ?Sized>(
    book: &PlanBook,
    catalog: &C,
    day_id: Uuid,
    slot_order: usize,
    equipment: Option<&str>,
    limit: usize,
) -> Result<Vec<RankedAlternative>> {
    let day = book.day(day_id)?;
    let slot = day.slot(slot_order)?;
    let current = catalog
        .exercise_by_id(&slot.catalog_id)?
        .ok_or_else(|| Error::ExerciseNotFound(slot.catalog_id.clone()))?;

    let mut filter = ExerciseFilter::new()
        .equipment(equipment_filter(equipment))
        .page(1, ALTERNATIVE_POOL_SIZE);
    if !current.primary_muscle.trim().is_empty() {
        for muscle in substitute::muscle_spellings(&current.primary_muscle) {
            filter = filter.muscle(muscle);
        }
    }
    let pool = catalog.exercises_by_filter(&filter)?;

    let query = SwapQuery {
        used_ids: day.other_ids(slot_order),
        equipment,
        limit,
    };
    Ok(substitute::alternatives(&current, &pool, &query))
}

/// Replace the exercise in one slot of a saved day
///
/// The slot keeps its prescription, and a warm-up slot keeps its warm-up
/// name prefix. Fails with `DuplicateExercise` when the
/// new exercise already fills another slot of the same day.
pub fn swap_exercise<C: CatalogGateway + ?Sized>(
    book: &mut PlanBook,
    catalog: &C,
    day_id: Uuid,
    slot_order: usize,
    new_exercise_id: &str,
) -> Result<PlannedExercise> {
    let day = book.day_mut(day_id)?;
    day.slot(slot_order)?;

    if day.other_ids(slot_order).contains(new_exercise_id) {
        return Err(Error::DuplicateExercise(new_exercise_id.to_string()));
    }

    let replacement = catalog
        .exercise_by_id(new_exercise_id)?
        .ok_or_else(|| Error::ExerciseNotFound(new_exercise_id.to_string()))?;

    let slot = &mut day.exercises[slot_order];
    tracing::info!(
        "Swapping '{}' for '{}' in day {}",
        slot.name,
        replacement.name,
        day_id
    );
    slot.catalog_id = replacement.id;
    slot.name = match slot.prescription {
        Prescription::Warmup { .. } => format!("{}{}", WARMUP_NAME_PREFIX, replacement.name),
        Prescription::WorkSet { .. } => replacement.name,
    };

    Ok(slot.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::{MetaTag, PlannedDay};

    fn planned(id: &str, name: &str) -> PlannedExercise {
        PlannedExercise {
            catalog_id: id.into(),
            name: name.into(),
            prescription: Prescription::WorkSet {
                sets: 3,
                rep_min: 8,
                rep_max: 12,
                rest_seconds: 60,
            },
            meta_tag: MetaTag::Untagged,
        }
    }

    fn request() -> PlanRequest {
        PlanRequest {
            goal: "general_fitness".into(),
            sessions_per_week: 2,
            equipment: None,
            session_minutes: 45,
            injuries: vec![],
        }
    }

    fn book_with_day() -> (PlanBook, Uuid) {
        let plan = Plan {
            days: vec![PlannedDay {
                name: "Push".into(),
                notes: String::new(),
                exercises: vec![
                    planned("bench_press", "Barbell Bench Press"),
                    planned("cable_fly", "Cable Fly"),
                    planned("triceps_pushdown", "Cable Triceps Pushdown"),
                ],
            }],
        };
        let mut book = PlanBook::default();
        let saved = book.save_plan(&plan, &request());
        (book, saved.days[0].id)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plans.json");
        let (book, day_id) = book_with_day();

        book.save(&path).unwrap();
        let loaded = PlanBook::load(&path).unwrap();

        assert_eq!(loaded.plans, book.plans);
        assert_eq!(loaded.day(day_id).unwrap().exercises.len(), 3);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let book = PlanBook::load(&temp_dir.path().join("none.json")).unwrap();
        assert!(book.plans.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plans.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PlanBook::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plans.json");
        book_with_day().0.save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "plans.json")
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plans.json");
        let (book, day_id) = book_with_day();
        book.save(&path).unwrap();

        PlanBook::update(&path, |book| {
            swap_exercise(book, default_catalog(), day_id, 1, "db_bench_press")
        })
        .unwrap();

        let loaded = PlanBook::load(&path).unwrap();
        assert_eq!(
            loaded.day(day_id).unwrap().exercises[1].catalog_id,
            "db_bench_press"
        );
    }

    #[test]
    fn test_rank_alternatives_excludes_day_exercises() {
        let (book, day_id) = book_with_day();
        let ranked = rank_alternatives(&book, default_catalog(), day_id, 0, None, 20).unwrap();

        let ids: Vec<_> = ranked.iter().map(|r| r.exercise.id.as_str()).collect();
        assert!(!ids.is_empty());
        assert!(!ids.contains(&"bench_press"));
        assert!(!ids.contains(&"cable_fly"));
        // primary + target match on chest, no other barbell option
        assert_eq!(ranked[0].score, 5 + 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_alternatives_folds_muscle_aliases() {
        let plan = Plan {
            days: vec![PlannedDay {
                name: "Legs".into(),
                notes: String::new(),
                exercises: vec![planned("seated_calf_raise", "Seated Calf Raise")],
            }],
        };
        let mut book = PlanBook::default();
        let day_id = book.save_plan(&plan, &request()).days[0].id;

        let ranked = rank_alternatives(&book, default_catalog(), day_id, 0, None, 20).unwrap();

        // "soleus" folds into "calves": primary, target and machine all match
        assert_eq!(ranked[0].exercise.id, "standing_calf_raise");
        assert_eq!(ranked[0].score, 5 + 3 + 2);
    }

    #[test]
    fn test_rank_alternatives_with_equipment_filter() {
        let (book, day_id) = book_with_day();
        let ranked =
            rank_alternatives(&book, default_catalog(), day_id, 0, Some("dumbbell"), 20).unwrap();
        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|r| r.exercise.equipment == "dumbbell"));
    }

    #[test]
    fn test_rank_alternatives_unknown_day_or_slot() {
        let (book, day_id) = book_with_day();
        let missing = Uuid::new_v4();
        assert!(matches!(
            rank_alternatives(&book, default_catalog(), missing, 0, None, 20),
            Err(Error::DayNotFound(id)) if id == missing
        ));
        assert!(matches!(
            rank_alternatives(&book, default_catalog(), day_id, 9, None, 20),
            Err(Error::SlotNotFound { slot: 9, .. })
        ));
    }

    #[test]
    fn test_swap_replaces_and_keeps_prescription() {
        let (mut book, day_id) = book_with_day();
        let updated = swap_exercise(&mut book, default_catalog(), day_id, 0, "push_up").unwrap();

        assert_eq!(updated.catalog_id, "push_up");
        assert_eq!(updated.name, "Push-Up");
        assert_eq!(updated.sets(), 3);
        assert_eq!(book.day(day_id).unwrap().exercises[0], updated);
    }

    #[test]
    fn test_swap_warmup_keeps_prefix() {
        let warmup = PlannedExercise {
            catalog_id: "jumping_jacks".into(),
            name: "Warm-up: Jumping Jacks".into(),
            prescription: Prescription::Warmup {
                duration_sec_min: 30,
                duration_sec_max: 60,
                rest_seconds: 30,
            },
            meta_tag: MetaTag::Warmup,
        };
        let plan = Plan {
            days: vec![PlannedDay {
                name: "Full Body A".into(),
                notes: String::new(),
                exercises: vec![warmup, planned("back_squat", "Barbell Back Squat")],
            }],
        };
        let mut book = PlanBook::default();
        let day_id = book.save_plan(&plan, &request()).days[0].id;

        let updated = swap_exercise(&mut book, default_catalog(), day_id, 0, "dead_bug").unwrap();
        assert_eq!(updated.name, "Warm-up: Dead Bug");
        assert!(matches!(updated.prescription, Prescription::Warmup { .. }));

        let updated = swap_exercise(&mut book, default_catalog(), day_id, 1, "goblet_squat").unwrap();
        assert_eq!(updated.name, "Goblet Squat");
    }

    #[test]
    fn test_swap_rejects_duplicate_in_day() {
        let (mut book, day_id) = book_with_day();
        let result = swap_exercise(&mut book, default_catalog(), day_id, 0, "cable_fly");

        match result {
            Err(err @ Error::DuplicateExercise(_)) => {
                assert!(err.to_string().contains("already in this workout"));
            }
            other => panic!("expected duplicate rejection, got {:?}", other),
        }
        assert_eq!(book.day(day_id).unwrap().exercises[0].catalog_id, "bench_press");
    }

    #[test]
    fn test_swap_same_slot_is_allowed() {
        let (mut book, day_id) = book_with_day();
        assert!(swap_exercise(&mut book, default_catalog(), day_id, 0, "bench_press").is_ok());
    }

    #[test]
    fn test_swap_unknown_exercise() {
        let (mut book, day_id) = book_with_day();
        assert!(matches!(
            swap_exercise(&mut book, default_catalog(), day_id, 0, "nope"),
            Err(Error::ExerciseNotFound(_))
        ));
    }
}
