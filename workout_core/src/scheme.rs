//! Goal scheme table.
//!
//! Maps a training goal to its default work-set prescription and warm-up
//! preferences. Unknown goals fall back to general fitness.

use crate::tokens;
use crate::{Prescription, WarmupTag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Training goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    MuscleGain,
    FatLoss,
    Performance,
    #[default]
    GeneralFitness,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::MuscleGain,
        Goal::FatLoss,
        Goal::Performance,
        Goal::GeneralFitness,
    ];

    /// Parse a goal label, falling back to general fitness
    pub fn from_label(label: &str) -> Self {
        match tokens::normalize(label).as_str() {
            "muscle_gain" => Goal::MuscleGain,
            "fat_loss" => Goal::FatLoss,
            "performance" => Goal::Performance,
            "general_fitness" => Goal::GeneralFitness,
            other => {
                tracing::debug!("Unknown goal '{}', using general_fitness scheme", other);
                Goal::GeneralFitness
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::MuscleGain => "muscle_gain",
            Goal::FatLoss => "fat_loss",
            Goal::Performance => "performance",
            Goal::GeneralFitness => "general_fitness",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warm-up preferences of a goal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarmupScheme {
    /// Candidate tags in priority order
    pub tags: Vec<WarmupTag>,
    pub duration_sec_min: u32,
    pub duration_sec_max: u32,
    /// Whether a day named "cardio" still gets a warm-up
    pub on_cardio_day: bool,
}

/// Default prescription for a goal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalScheme {
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest_seconds: u32,
    pub warmup: WarmupScheme,
}

impl GoalScheme {
    /// Work-set prescription for exercises filled from split slots
    pub fn work_set(&self) -> Prescription {
        Prescription::WorkSet {
            sets: self.sets,
            rep_min: self.rep_min,
            rep_max: self.rep_max,
            rest_seconds: self.rest_seconds,
        }
    }
}

/// Conservative accessory prescription used for top-up additions
pub const FALLBACK_PRESCRIPTION: Prescription = Prescription::WorkSet {
    sets: 3,
    rep_min: 8,
    rep_max: 12,
    rest_seconds: 60,
};

/// Rest after a warm-up, in seconds
pub const WARMUP_REST_SECONDS: u32 = 30;

/// Scheme for a goal label; unknown labels get the general fitness scheme
pub fn scheme_for(goal: &str) -> GoalScheme {
    scheme_for_goal(Goal::from_label(goal))
}

/// Scheme for a parsed goal
pub fn scheme_for_goal(goal: Goal) -> GoalScheme {
    match goal {
        Goal::MuscleGain => GoalScheme {
            sets: 4,
            rep_min: 6,
            rep_max: 10,
            rest_seconds: 90,
            warmup: WarmupScheme {
                tags: vec![WarmupTag::Cardio, WarmupTag::Mobility],
                duration_sec_min: 60,
                duration_sec_max: 120,
                on_cardio_day: false,
            },
        },
        Goal::FatLoss => GoalScheme {
            sets: 3,
            rep_min: 12,
            rep_max: 15,
            rest_seconds: 45,
            warmup: WarmupScheme {
                tags: vec![WarmupTag::Cardio],
                duration_sec_min: 60,
                duration_sec_max: 90,
                on_cardio_day: false,
            },
        },
        Goal::Performance => GoalScheme {
            sets: 5,
            rep_min: 3,
            rep_max: 5,
            rest_seconds: 120,
            warmup: WarmupScheme {
                tags: vec![
                    WarmupTag::Mobility,
                    WarmupTag::Cardio,
                    WarmupTag::CoreAntiExtension,
                ],
                duration_sec_min: 90,
                duration_sec_max: 180,
                on_cardio_day: true,
            },
        },
        Goal::GeneralFitness => GoalScheme {
            sets: 3,
            rep_min: 8,
            rep_max: 12,
            rest_seconds: 60,
            warmup: WarmupScheme {
                tags: vec![WarmupTag::Cardio, WarmupTag::CoreAntiExtension],
                duration_sec_min: 30,
                duration_sec_max: 60,
                on_cardio_day: false,
            },
        },
    }
}
