//! Exercise catalog access.
//!
//! The planner only talks to the catalog through [`CatalogGateway`]. An
//! in-memory gateway backed by the built-in exercise list (or a CSV/JSON
//! file) is provided for the CLI and tests.

use crate::tokens::{self, normalize};
use crate::{Error, ExerciseCandidate, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Query parameters for a catalog lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub tag: Option<String>,
    pub muscles: Vec<String>,
    pub equipment: Option<String>,
    pub query: Option<String>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
}

impl Default for ExerciseFilter {
    fn default() -> Self {
        Self {
            tag: None,
            muscles: Vec::new(),
            equipment: None,
            query: None,
            page: 1,
            per_page: 50,
        }
    }
}

impl ExerciseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn muscle(mut self, muscle: impl Into<String>) -> Self {
        self.muscles.push(muscle.into());
        self
    }

    pub fn equipment(mut self, equipment: Option<String>) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page;
        self
    }

    /// Whether a single candidate satisfies every set criterion
    pub fn matches(&self, candidate: &ExerciseCandidate) -> bool {
        if let Some(tag) = &self.tag {
            let tag = normalize(tag);
            let mut fields = std::iter::once(&candidate.primary_muscle)
                .chain(&candidate.target_muscles)
                .chain(&candidate.secondary_muscles)
                .chain(&candidate.body_parts)
                .chain(&candidate.tags);
            if !fields.any(|f| normalize(f) == tag) {
                return false;
            }
        }

        if !self.muscles.is_empty() {
            let wanted: HashSet<String> = self.muscles.iter().map(|m| normalize(m)).collect();
            let mut muscles = std::iter::once(&candidate.primary_muscle)
                .chain(&candidate.target_muscles)
                .chain(&candidate.secondary_muscles);
            if !muscles.any(|m| wanted.contains(&normalize(m))) {
                return false;
            }
        }

        if let Some(equipment) = &self.equipment {
            if normalize(equipment) != normalize(&candidate.equipment) {
                return false;
            }
        }

        if let Some(query) = &self.query {
            if !normalize(&candidate.name).contains(&normalize(query)) {
                return false;
            }
        }

        true
    }
}

/// Translate a requested equipment value into a catalog filter
///
/// `"gym"` means any equipment is available, so it applies no filter.
pub fn equipment_filter(equipment: Option<&str>) -> Option<String> {
    let equipment = normalize(equipment?);
    if equipment.is_empty() || equipment == "gym" {
        None
    } else {
        Some(equipment)
    }
}

/// Read access to an exercise catalog
///
/// Errors are upstream failures and are propagated to the caller untouched.
pub trait CatalogGateway {
    fn exercises_by_filter(&self, filter: &ExerciseFilter) -> Result<Vec<ExerciseCandidate>>;
    fn exercise_by_id(&self, id: &str) -> Result<Option<ExerciseCandidate>>;
}

impl<T: CatalogGateway + ?Sized> CatalogGateway for &T {
    fn exercises_by_filter(&self, filter: &ExerciseFilter) -> Result<Vec<ExerciseCandidate>> {
        (**self).exercises_by_filter(filter)
    }

    fn exercise_by_id(&self, id: &str) -> Result<Option<ExerciseCandidate>> {
        (**self).exercise_by_id(id)
    }
}

/// Catalog held in memory, in source order
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    pub exercises: Vec<ExerciseCandidate>,
}

impl CatalogGateway for InMemoryCatalog {
    fn exercises_by_filter(&self, filter: &ExerciseFilter) -> Result<Vec<ExerciseCandidate>> {
        let skip = (filter.page.max(1) - 1) * filter.per_page;
        Ok(self
            .exercises
            .iter()
            .filter(|e| filter.matches(e))
            .skip(skip)
            .take(filter.per_page)
            .cloned()
            .collect())
    }

    fn exercise_by_id(&self, id: &str) -> Result<Option<ExerciseCandidate>> {
        Ok(self.exercises.iter().find(|e| e.id == id).cloned())
    }
}

/// CSV row shape; list columns are JSON or comma-separated strings
#[derive(Debug, Deserialize)]
struct CsvExercise {
    id: String,
    name: String,
    #[serde(default)]
    primary_muscle: String,
    #[serde(default)]
    target_muscles: String,
    #[serde(default)]
    secondary_muscles: String,
    #[serde(default)]
    equipment: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    body_parts: String,
}

impl From<CsvExercise> for ExerciseCandidate {
    fn from(row: CsvExercise) -> Self {
        ExerciseCandidate {
            id: row.id.trim().to_string(),
            name: row.name.trim().to_string(),
            primary_muscle: row.primary_muscle.trim().to_string(),
            target_muscles: tokens::parse_tokens(&row.target_muscles),
            secondary_muscles: tokens::parse_tokens(&row.secondary_muscles),
            equipment: row.equipment.trim().to_string(),
            tags: tokens::parse_tokens(&row.tags),
            body_parts: tokens::parse_tokens(&row.body_parts),
        }
    }
}

impl InMemoryCatalog {
    pub fn new(exercises: Vec<ExerciseCandidate>) -> Self {
        Self { exercises }
    }

    /// Load a catalog from a `.csv` file or a JSON array of exercises
    pub fn load_from(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        let exercises: Vec<ExerciseCandidate> = if is_csv {
            let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_path(path)?;
            reader
                .deserialize::<CsvExercise>()
                .map(|row| row.map(ExerciseCandidate::from))
                .collect::<std::result::Result<_, _>>()?
        } else {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        };

        let catalog = Self::new(exercises);
        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }

        tracing::info!(
            "Loaded {} exercises from {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if !ids.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if !names.insert(exercise.normalized_name()) {
                errors.push(format!("Duplicate exercise name '{}'", exercise.name));
            }
        }

        errors
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<InMemoryCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached built-in catalog
pub fn default_catalog() -> &'static InMemoryCatalog {
    &DEFAULT_CATALOG
}

fn entry(
    id: &str,
    name: &str,
    primary: &str,
    secondary: &[&str],
    equipment: &str,
    tags: &[&str],
    body_parts: &[&str],
) -> ExerciseCandidate {
    let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    ExerciseCandidate {
        id: id.into(),
        name: name.into(),
        primary_muscle: primary.into(),
        target_muscles: vec![primary.to_string()],
        secondary_muscles: owned(secondary),
        equipment: equipment.into(),
        tags: owned(tags),
        body_parts: owned(body_parts),
    }
}

/// Builds the built-in catalog
///
/// **Note**: prefer `default_catalog()`, which returns a cached reference.
pub fn build_default_catalog() -> InMemoryCatalog {
    let exercises = vec![
        // ====================================================================
        // Chest
        // ====================================================================
        entry("bench_press", "Barbell Bench Press", "chest", &["triceps", "shoulders"], "barbell", &["compound", "push"], &["chest"]),
        entry("db_bench_press", "Dumbbell Bench Press", "chest", &["triceps", "shoulders"], "dumbbell", &["compound", "push"], &["chest"]),
        entry("incline_db_press", "Incline Dumbbell Press", "chest", &["shoulders", "triceps"], "dumbbell", &["push"], &["chest"]),
        entry("push_up", "Push-Up", "chest", &["triceps"], "body weight", &["compound", "push"], &["chest"]),
        entry("cable_fly", "Cable Fly", "chest", &[], "cable", &["isolation"], &["chest"]),
        // ====================================================================
        // Back
        // ====================================================================
        entry("barbell_row", "Barbell Bent-Over Row", "back", &["lats", "biceps"], "barbell", &["compound", "pull"], &["back"]),
        entry("lat_pulldown", "Lat Pulldown", "lats", &["biceps"], "cable", &["pull"], &["back"]),
        entry("pull_up", "Pull-Up", "lats", &["biceps", "back"], "body weight", &["compound", "pull"], &["back"]),
        entry("seated_cable_row", "Seated Cable Row", "back", &["lats", "biceps"], "cable", &["pull"], &["back"]),
        entry("chest_supported_db_row", "Chest-Supported Dumbbell Row", "back", &["lats"], "dumbbell", &["pull"], &["back"]),
        entry("deadlift", "Conventional Deadlift", "hamstrings", &["glutes", "lower back"], "barbell", &["compound", "hinge"], &["upper legs", "back"]),
        // ====================================================================
        // Shoulders
        // ====================================================================
        entry("overhead_press", "Standing Overhead Press", "shoulders", &["triceps"], "barbell", &["compound", "push"], &["shoulders"]),
        entry("db_shoulder_press", "Seated Dumbbell Shoulder Press", "shoulders", &["triceps"], "dumbbell", &["push"], &["shoulders"]),
        entry("lateral_raise", "Dumbbell Lateral Raise", "delts", &[], "dumbbell", &["isolation"], &["shoulders"]),
        entry("face_pull", "Cable Face Pull", "delts", &["traps"], "cable", &["pull"], &["shoulders"]),
        // ====================================================================
        // Arms
        // ====================================================================
        entry("barbell_curl", "Barbell Curl", "biceps", &["forearms"], "barbell", &["isolation"], &["upper arms"]),
        entry("hammer_curl", "Dumbbell Hammer Curl", "biceps", &["forearms"], "dumbbell", &["isolation"], &["upper arms"]),
        entry("band_curl", "Band Curl", "biceps", &[], "band", &["isolation"], &["upper arms"]),
        entry("triceps_pushdown", "Cable Triceps Pushdown", "triceps", &[], "cable", &["isolation"], &["upper arms"]),
        entry("skull_crusher", "EZ-Bar Skull Crusher", "triceps", &[], "barbell", &["isolation"], &["upper arms"]),
        entry("bench_dip", "Bench Dip", "triceps", &["chest"], "body weight", &["push"], &["upper arms"]),
        entry("wrist_curl", "Dumbbell Wrist Curl", "forearms", &[], "dumbbell", &["isolation"], &["lower arms"]),
        // ====================================================================
        // Legs
        // ====================================================================
        entry("back_squat", "Barbell Back Squat", "quads", &["glutes", "hamstrings"], "barbell", &["compound", "squat"], &["upper legs"]),
        entry("goblet_squat", "Goblet Squat", "quads", &["glutes"], "dumbbell", &["compound", "squat"], &["upper legs"]),
        entry("leg_press", "Leg Press", "quads", &["glutes"], "machine", &["compound"], &["upper legs"]),
        entry("walking_lunge", "Dumbbell Walking Lunge", "quads", &["glutes", "hamstrings"], "dumbbell", &["compound"], &["upper legs"]),
        entry("leg_extension", "Leg Extension", "quads", &[], "machine", &["isolation"], &["upper legs"]),
        entry("romanian_deadlift", "Romanian Deadlift", "hamstrings", &["glutes", "lower back"], "barbell", &["hinge"], &["upper legs"]),
        entry("leg_curl", "Lying Leg Curl", "hamstrings", &[], "machine", &["isolation"], &["upper legs"]),
        entry("hip_thrust", "Barbell Hip Thrust", "glutes", &["hamstrings"], "barbell", &["hinge"], &["upper legs"]),
        entry("glute_bridge", "Glute Bridge", "glutes", &["hamstrings"], "body weight", &[], &["upper legs"]),
        entry("standing_calf_raise", "Standing Calf Raise", "calves", &[], "machine", &["isolation"], &["lower legs"]),
        entry("seated_calf_raise", "Seated Calf Raise", "soleus", &["calves"], "machine", &["isolation"], &["lower legs"]),
        // ====================================================================
        // Core
        // ====================================================================
        entry("plank", "Front Plank", "abdominals", &[], "body weight", &["core_anti_extension", "abs"], &["waist"]),
        entry("dead_bug", "Dead Bug", "abdominals", &[], "body weight", &["core_anti_extension", "abs"], &["waist"]),
        entry("ab_wheel", "Ab Wheel Rollout", "abdominals", &["lats"], "ab wheel", &["core_anti_extension", "abs"], &["waist"]),
        entry("hanging_leg_raise", "Hanging Leg Raise", "abdominals", &["hip flexors"], "body weight", &["abs"], &["waist"]),
        entry("cable_crunch", "Cable Crunch", "abdominals", &[], "cable", &["abs"], &["waist"]),
        // ====================================================================
        // Full body and conditioning
        // ====================================================================
        entry("kb_swing", "Kettlebell Swing", "glutes", &["hamstrings"], "kettlebell", &["compound", "full_body", "cardio"], &["upper legs"]),
        entry("thruster", "Dumbbell Thruster", "quads", &["shoulders"], "dumbbell", &["compound", "full_body"], &["upper legs"]),
        entry("burpee", "Burpee", "cardiovascular system", &[], "body weight", &["full_body", "cardio"], &["cardio"]),
        entry("jumping_jacks", "Jumping Jacks", "cardiovascular system", &[], "body weight", &["cardio"], &["cardio"]),
        entry("rowing_machine", "Rowing Machine", "cardiovascular system", &["back"], "machine", &["cardio"], &["cardio"]),
        entry("stationary_bike", "Stationary Bike", "cardiovascular system", &["quads"], "machine", &["cardio"], &["cardio"]),
        entry("world_greatest_stretch", "World's Greatest Stretch", "hip flexors", &[], "body weight", &["mobility"], &["upper legs"]),
        entry("cat_cow", "Cat-Cow", "spine", &[], "body weight", &["mobility"], &["back"]),
    ];

    InMemoryCatalog::new(exercises)
}
