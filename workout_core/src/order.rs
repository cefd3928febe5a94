//! Day ordering: warm-up first, main work next, one core exercise last.

use crate::{MetaTag, PlannedExercise};

/// Reorder a day as warm-up ++ main ++ last core exercise
///
/// Only the last core-tagged exercise survives; earlier ones are dropped.
/// Relative order within the warm-up and main groups is preserved.
pub fn core_last(exercises: Vec<PlannedExercise>) -> Vec<PlannedExercise> {
    let mut warmup = Vec::new();
    let mut main = Vec::new();
    let mut core = None;
    let mut dropped = 0;

    for exercise in exercises {
        match exercise.meta_tag {
            MetaTag::Warmup => warmup.push(exercise),
            tag if tag.is_core() => {
                if core.replace(exercise).is_some() {
                    dropped += 1;
                }
            }
            _ => main.push(exercise),
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} extra core exercises", dropped);
    }

    warmup.into_iter().chain(main).chain(core).collect()
}
