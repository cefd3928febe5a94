//! Split template library.
//!
//! Templates map a (goal, sessions-per-week) pair to ordered training days.
//! The built-in library covers the common combinations; a TOML file can
//! replace it.

use crate::tokens::normalize;
use crate::{Error, Result, SlotTag, SplitDay, SplitSlot, SplitTemplate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Read access to split templates
pub trait SplitStore {
    /// `Ok(None)` means no template exists for the pair
    fn split_for(&self, goal: &str, sessions_per_week: u8) -> Result<Option<SplitTemplate>>;
}

/// A set of split templates
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SplitLibrary {
    #[serde(default)]
    pub templates: Vec<SplitTemplate>,
}

impl SplitStore for SplitLibrary {
    fn split_for(&self, goal: &str, sessions_per_week: u8) -> Result<Option<SplitTemplate>> {
        let goal = normalize(goal);
        Ok(self
            .templates
            .iter()
            .find(|t| normalize(&t.goal) == goal && t.sessions_per_week == sessions_per_week)
            .cloned())
    }
}

impl SplitLibrary {
    /// Load a library from a TOML file
    ///
    /// ```toml
    /// [[templates]]
    /// goal = "general_fitness"
    /// sessions_per_week = 2
    ///
    /// [[templates.days]]
    /// name = "Full Body A"
    /// ordinal = 1
    /// slots = [{ tag = "compound", count = 2 }, { tag = "abs", count = 1 }]
    /// ```
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let library: SplitLibrary = toml::from_str(&contents)?;

        let errors = library.validate();
        if !errors.is_empty() {
            return Err(Error::SplitValidation(errors.join("; ")));
        }

        tracing::info!(
            "Loaded {} split templates from {:?}",
            library.templates.len(),
            path
        );
        Ok(library)
    }

    /// Validate the library for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut keys = HashSet::new();

        for template in &self.templates {
            let key = (normalize(&template.goal), template.sessions_per_week);
            if key.0.is_empty() {
                errors.push("Split template has empty goal".to_string());
            }
            if !keys.insert(key) {
                errors.push(format!(
                    "Duplicate split template for '{}' at {} sessions",
                    template.goal, template.sessions_per_week
                ));
            }
            if template.days.is_empty() {
                errors.push(format!(
                    "Split '{}' ({} sessions) has no days",
                    template.goal, template.sessions_per_week
                ));
            }

            for day in &template.days {
                if day.slots.is_empty() {
                    errors.push(format!(
                        "Split '{}' day '{}' has no slots",
                        template.goal, day.name
                    ));
                }
                for slot in day.slots.iter().filter(|s| s.count == 0) {
                    errors.push(format!(
                        "Split '{}' day '{}' slot '{}' has zero count",
                        template.goal, day.name, slot.tag
                    ));
                }
            }
        }

        errors
    }
}

/// Cached built-in library
static DEFAULT_LIBRARY: Lazy<SplitLibrary> = Lazy::new(build_default_library);

/// Get a reference to the cached built-in split library
pub fn default_library() -> &'static SplitLibrary {
    &DEFAULT_LIBRARY
}

fn day(name: &str, ordinal: u32, slots: &[(SlotTag, u32)]) -> SplitDay {
    SplitDay {
        name: name.into(),
        ordinal,
        slots: slots
            .iter()
            .map(|&(tag, count)| SplitSlot { tag, count })
            .collect(),
    }
}

fn template(goal: &str, sessions: u8, name: &str, days: Vec<SplitDay>) -> SplitTemplate {
    SplitTemplate {
        goal: goal.into(),
        sessions_per_week: sessions,
        name: name.into(),
        days,
    }
}

/// Builds the built-in split library
pub fn build_default_library() -> SplitLibrary {
    use SlotTag::*;

    let full_body_a = |ordinal| {
        day("Full Body A", ordinal, &[(Compound, 2), (Back, 1), (Chest, 1), (Abs, 1)])
    };
    let full_body_b = |ordinal| {
        day("Full Body B", ordinal, &[(Compound, 2), (Shoulders, 1), (Hamstrings, 1), (CoreAntiExtension, 1)])
    };
    let upper = |name: &str, ordinal| {
        day(name, ordinal, &[(Chest, 2), (Back, 2), (Shoulders, 1), (Biceps, 1), (Triceps, 1)])
    };
    let lower = |name: &str, ordinal| {
        day(name, ordinal, &[(Quads, 2), (Hamstrings, 1), (Glutes, 1), (Calves, 1), (Abs, 1)])
    };
    let push = |ordinal| day("Push", ordinal, &[(Chest, 2), (Shoulders, 2), (Triceps, 2)]);
    let pull = |ordinal| day("Pull", ordinal, &[(Back, 2), (Lats, 1), (Biceps, 2), (Abs, 1)]);
    let legs = |ordinal| {
        day("Legs", ordinal, &[(Quads, 2), (Hamstrings, 2), (Glutes, 1), (Calves, 1)])
    };
    let cardio = |ordinal| day("Cardio", ordinal, &[(Cardio, 3), (CoreAntiExtension, 1)]);
    let circuit = |name: &str, ordinal| {
        day(name, ordinal, &[(FullBody, 2), (Compound, 2), (Cardio, 1), (Abs, 1)])
    };

    let templates = vec![
        // ====================================================================
        // General fitness
        // ====================================================================
        template("general_fitness", 2, "Full Body x2", vec![full_body_a(1), full_body_b(2)]),
        template("general_fitness", 3, "Full Body x3", vec![full_body_a(1), full_body_b(2), full_body_a(3)]),
        template("general_fitness", 4, "Upper/Lower", vec![upper("Upper A", 1), lower("Lower A", 2), upper("Upper B", 3), lower("Lower B", 4)]),
        // ====================================================================
        // Muscle gain
        // ====================================================================
        template("muscle_gain", 3, "Push/Pull/Legs", vec![push(1), pull(2), legs(3)]),
        template("muscle_gain", 4, "Upper/Lower", vec![upper("Upper A", 1), lower("Lower A", 2), upper("Upper B", 3), lower("Lower B", 4)]),
        template("muscle_gain", 5, "PPL + Upper/Lower", vec![push(1), pull(2), legs(3), upper("Upper", 4), lower("Lower", 5)]),
        // ====================================================================
        // Fat loss
        // ====================================================================
        template("fat_loss", 3, "Circuit x3", vec![circuit("Circuit A", 1), cardio(2), circuit("Circuit B", 3)]),
        template("fat_loss", 4, "Circuit + Cardio", vec![circuit("Circuit A", 1), cardio(2), circuit("Circuit B", 3), cardio(4)]),
        // ====================================================================
        // Performance
        // ====================================================================
        template("performance", 3, "Strength x3", vec![
            day("Squat Day", 1, &[(Quads, 1), (Compound, 2), (Hamstrings, 1), (CoreAntiExtension, 1)]),
            day("Press Day", 2, &[(Chest, 1), (Shoulders, 1), (Back, 2), (Triceps, 1)]),
            day("Pull Day", 3, &[(Hamstrings, 1), (Compound, 1), (Lats, 2), (Abs, 1)]),
        ]),
        template("performance", 4, "Strength + Conditioning", vec![
            day("Lower Strength", 1, &[(Quads, 2), (Hamstrings, 1), (Glutes, 1), (Abs, 1)]),
            day("Upper Strength", 2, &[(Chest, 2), (Back, 2), (Shoulders, 1)]),
            cardio(3),
            day("Power", 4, &[(FullBody, 2), (Compound, 2), (CoreAntiExtension, 1)]),
        ]),
    ];

    SplitLibrary { templates }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_library_validates() {
        let errors = build_default_library().validate();
        assert!(errors.is_empty(), "Default library errors: {:?}", errors);
    }

    #[test]
    fn test_days_match_sessions() {
        for template in &default_library().templates {
            assert_eq!(
                template.days.len(),
                template.sessions_per_week as usize,
                "{} x{}",
                template.goal,
                template.sessions_per_week
            );
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let split = default_library().split_for(" Muscle_Gain", 3).unwrap();
        assert_eq!(split.map(|s| s.name), Some("Push/Pull/Legs".to_string()));
    }

    #[test]
    fn test_missing_split_is_none() {
        let library = default_library();
        assert!(library.split_for("muscle_gain", 7).unwrap().is_none());
        assert!(library.split_for("unknown_goal", 3).unwrap().is_none());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("splits.toml");
        std::fs::write(
            &path,
            r#"
[[templates]]
goal = "fat_loss"
sessions_per_week = 1

[[templates.days]]
name = "Only Day"
ordinal = 1
slots = [{ tag = "compound", count = 2 }, { tag = "core_anti_extension", count = 1 }]
"#,
        )
        .unwrap();

        let library = SplitLibrary::load_from(&path).unwrap();
        let split = library.split_for("fat_loss", 1).unwrap().unwrap();
        assert_eq!(split.days[0].slots[1].tag, SlotTag::CoreAntiExtension);
    }

    #[test]
    fn test_unknown_slot_tag_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("splits.toml");
        std::fs::write(
            &path,
            r#"
[[templates]]
goal = "fat_loss"
sessions_per_week = 1

[[templates.days]]
name = "Typo Day"
ordinal = 1
slots = [{ tag = "compund", count = 2 }]
"#,
        )
        .unwrap();

        assert!(matches!(SplitLibrary::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_zero_count_slot_is_rejected() {
        let library = SplitLibrary {
            templates: vec![template("x", 1, "", vec![day("D", 1, &[(SlotTag::Abs, 0)])])],
        };
        assert_eq!(library.validate().len(), 1);
    }
}
