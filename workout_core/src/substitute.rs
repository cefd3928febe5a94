//! Ranking of replacement exercises for a one-exercise swap.
//!
//! Candidates must work the same muscle as the current exercise and must not
//! be cardio, stretching or locomotion drills. Survivors are scored on how
//! closely their muscles and equipment line up and sorted best first.

use crate::tokens::normalize;
use crate::ExerciseCandidate;
use std::collections::HashSet;

/// Smallest and largest number of alternatives returned
pub const LIMIT_RANGE: (usize, usize) = (5, 60);

const PRIMARY_MATCH: u32 = 5;
const TARGET_MATCH: u32 = 3;
const SECONDARY_MATCH: u32 = 2;
const EQUIPMENT_MATCH: u32 = 2;

const DENIED_PRIMARY: &[&str] = &["cardiovascular system"];

const DENIED_NAME_PARTS: &[&str] = &[
    "stretch", "mobility", "pose", "yoga", "pilates", "crawl", "walk", "run", "jump", "skip",
];

/// Alias spellings and the muscle name they fold into
const MUSCLE_ALIASES: &[(&str, &str)] = &[
    ("core", "abdominals"),
    ("abs", "abdominals"),
    ("pecs", "pectorals"),
    ("calf", "calves"),
    ("soleus", "calves"),
    ("gastrocnemius", "calves"),
];

/// Normalize a muscle name and fold common aliases
pub fn canonical_muscle(muscle: &str) -> String {
    let muscle = normalize(muscle);
    MUSCLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == muscle)
        .map_or(muscle, |(_, canonical)| canonical.to_string())
}

/// Every spelling that folds into the same muscle, canonical name first
pub fn muscle_spellings(muscle: &str) -> Vec<String> {
    let canonical = canonical_muscle(muscle);
    let aliases = MUSCLE_ALIASES
        .iter()
        .filter(|(_, folded)| *folded == canonical)
        .map(|(alias, _)| alias.to_string());
    std::iter::once(canonical.clone()).chain(aliases).collect()
}

/// An alternative with its score
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedAlternative {
    pub exercise: ExerciseCandidate,
    pub score: u32,
}

/// Parameters of a ranking request
#[derive(Clone, Debug, Default)]
pub struct SwapQuery<'a> {
    /// Ids used by the other slots of the day
    pub used_ids: HashSet<String>,
    /// Explicit equipment preference; falls back to the current exercise's
    pub equipment: Option<&'a str>,
    pub limit: usize,
}

/// Clamp a requested limit to the supported range
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(LIMIT_RANGE.0, LIMIT_RANGE.1)
}

fn is_denied(candidate: &ExerciseCandidate) -> bool {
    let primary = normalize(&candidate.primary_muscle);
    if DENIED_PRIMARY.contains(&primary.as_str()) {
        return true;
    }
    let name = candidate.normalized_name();
    DENIED_NAME_PARTS.iter().any(|part| name.contains(part))
}

fn score(candidate: &ExerciseCandidate, wanted_muscle: Option<&str>, wanted_equipment: &str) -> u32 {
    let mut score = 0;

    if let Some(wanted) = wanted_muscle {
        if canonical_muscle(&candidate.primary_muscle) == wanted {
            score += PRIMARY_MATCH;
        }
        if candidate.target_muscles.iter().any(|m| canonical_muscle(m) == wanted) {
            score += TARGET_MATCH;
        }
        if candidate.secondary_muscles.iter().any(|m| canonical_muscle(m) == wanted) {
            score += SECONDARY_MATCH;
        }
    }

    if !wanted_equipment.is_empty() && normalize(&candidate.equipment) == wanted_equipment {
        score += EQUIPMENT_MATCH;
    }

    score
}

fn works_muscle(candidate: &ExerciseCandidate, wanted: &str) -> bool {
    std::iter::once(&candidate.primary_muscle)
        .chain(&candidate.target_muscles)
        .chain(&candidate.secondary_muscles)
        .any(|m| canonical_muscle(m) == wanted)
}

/// Rank replacements for `current` from `pool`, best first
///
/// Ties keep pool order. The result is truncated to the clamped limit.
pub fn alternatives(
    current: &ExerciseCandidate,
    pool: &[ExerciseCandidate],
    query: &SwapQuery<'_>,
) -> Vec<RankedAlternative> {
    let wanted_muscle = Some(canonical_muscle(&current.primary_muscle)).filter(|m| !m.is_empty());
    let wanted_equipment = normalize(query.equipment.unwrap_or(&current.equipment));

    let mut ranked: Vec<_> = pool
        .iter()
        .filter(|c| c.id != current.id)
        .filter(|c| !query.used_ids.contains(&c.id))
        .filter(|c| !is_denied(c))
        .filter(|c| {
            wanted_muscle
                .as_deref()
                .map_or(true, |wanted| works_muscle(c, wanted))
        })
        .map(|c| RankedAlternative {
            score: score(c, wanted_muscle.as_deref(), &wanted_equipment),
            exercise: c.clone(),
        })
        .collect();

    // sort_by is stable, so equal scores keep pool order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(clamp_limit(query.limit));

    tracing::debug!(
        "Ranked {} alternatives for '{}' from {} candidates",
        ranked.len(),
        current.name,
        pool.len()
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(id: &str, primary: &str, target: &[&str], secondary: &[&str], equipment: &str) -> ExerciseCandidate {
        ExerciseCandidate {
            id: id.into(),
            name: id.replace('_', " "),
            primary_muscle: primary.into(),
            target_muscles: target.iter().map(|s| s.to_string()).collect(),
            secondary_muscles: secondary.iter().map(|s| s.to_string()).collect(),
            equipment: equipment.into(),
            ..Default::default()
        }
    }

    fn query(limit: usize) -> SwapQuery<'static> {
        SwapQuery {
            limit,
            ..Default::default()
        }
    }

    fn ids(ranked: &[RankedAlternative]) -> Vec<&str> {
        ranked.iter().map(|r| r.exercise.id.as_str()).collect()
    }

    #[test]
    fn test_primary_match_beats_secondary_match() {
        let current = ex("bench_press", "chest", &[], &[], "barbell");
        let pool = vec![
            ex("bench_dip", "triceps", &[], &["chest"], "body weight"),
            ex("cable_fly", "chest", &[], &[], "cable"),
        ];

        let ranked = alternatives(&current, &pool, &query(10));
        assert_eq!(ids(&ranked), vec!["cable_fly", "bench_dip"]);
        assert_eq!(ranked[0].score, 5);
        assert_eq!(ranked[1].score, 2);
    }

    #[test]
    fn test_scores_accumulate() {
        let current = ex("bench_press", "chest", &[], &[], "barbell");
        let pool = vec![ex("floor_press", "chest", &["chest"], &["chest"], "Barbell")];
        let ranked = alternatives(&current, &pool, &query(10));
        assert_eq!(ranked[0].score, 5 + 3 + 2 + 2);
    }

    #[test]
    fn test_explicit_equipment_overrides_current() {
        let current = ex("bench_press", "chest", &[], &[], "barbell");
        let pool = vec![
            ex("bb_floor_press", "chest", &[], &[], "barbell"),
            ex("db_floor_press", "chest", &[], &[], "dumbbell"),
        ];

        let ranked = alternatives(&current, &pool, &query(10));
        assert_eq!(ids(&ranked), vec!["bb_floor_press", "db_floor_press"]);

        let q = SwapQuery {
            equipment: Some("Dumbbell"),
            ..query(10)
        };
        let ranked = alternatives(&current, &pool, &q);
        assert_eq!(ids(&ranked), vec!["db_floor_press", "bb_floor_press"]);
    }

    #[test]
    fn test_filters_current_used_and_denied() {
        let current = ex("bench_press", "chest", &[], &[], "barbell");
        let pool = vec![
            ex("bench_press", "chest", &[], &[], "barbell"),
            ex("cable_fly", "chest", &[], &[], "cable"),
            ex("chest_stretch", "chest", &[], &[], ""),
            ex("bear_crawl", "chest", &[], &[], ""),
            ex("burpee", "cardiovascular system", &[], &["chest"], ""),
            ex("push_up", "chest", &[], &[], ""),
            ex("squat", "quads", &[], &[], "barbell"),
        ];
        let q = SwapQuery {
            used_ids: ["push_up".to_string()].into_iter().collect(),
            ..query(10)
        };

        assert_eq!(ids(&alternatives(&current, &pool, &q)), vec!["cable_fly"]);
    }

    #[test]
    fn test_muscle_aliases() {
        let current = ex("crunch", "core", &[], &[], "");
        let pool = vec![ex("plank", "abdominals", &[], &[], "")];
        assert_eq!(alternatives(&current, &pool, &query(10)).len(), 1);

        let current = ex("calf_raise", "Gastrocnemius", &[], &[], "");
        let pool = vec![ex("seated_calf_raise", "soleus", &[], &[], "")];
        assert_eq!(alternatives(&current, &pool, &query(10))[0].score, 5);
    }

    #[test]
    fn test_muscle_spellings() {
        assert_eq!(muscle_spellings(" Soleus "), vec!["calves", "calf", "soleus", "gastrocnemius"]);
        assert_eq!(muscle_spellings("abs"), vec!["abdominals", "core", "abs"]);
        assert_eq!(muscle_spellings("chest"), vec!["chest"]);
    }

    #[test]
    fn test_ties_keep_pool_order_and_limit_is_clamped() {
        let current = ex("bench_press", "chest", &[], &[], "barbell");
        let pool: Vec<_> = (0..70)
            .map(|i| ex(&format!("press_{:02}", i), "chest", &[], &[], "cable"))
            .collect();

        let ranked = alternatives(&current, &pool, &query(1));
        assert_eq!(ranked.len(), 5);
        assert_eq!(ids(&ranked), vec!["press_00", "press_01", "press_02", "press_03", "press_04"]);

        assert_eq!(alternatives(&current, &pool, &query(500)).len(), 60);
    }

    #[test]
    fn test_no_primary_muscle_skips_muscle_filter() {
        let current = ex("mystery", "", &[], &[], "band");
        let pool = vec![
            ex("band_row", "back", &[], &[], "band"),
            ex("db_row", "back", &[], &[], "dumbbell"),
        ];
        let ranked = alternatives(&current, &pool, &query(10));
        assert_eq!(ids(&ranked), vec!["band_row", "db_row"]);
    }
}
