//! Core domain types for the workout planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Catalog exercise records
//! - Split templates (days and slots)
//! - Closed tag vocabularies for slots and warm-ups
//! - Planned exercises, days and plans

use crate::tokens;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Catalog Types
// ============================================================================

/// An exercise record as served by the catalog
///
/// Muscle, tag and body-part fields accept either arrays or strings holding a
/// JSON array or a comma-separated list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExerciseCandidate {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "tokens::deserialize_text")]
    pub primary_muscle: String,
    #[serde(default, deserialize_with = "tokens::deserialize_list")]
    pub target_muscles: Vec<String>,
    #[serde(default, deserialize_with = "tokens::deserialize_list")]
    pub secondary_muscles: Vec<String>,
    #[serde(default, deserialize_with = "tokens::deserialize_text")]
    pub equipment: String,
    #[serde(default, deserialize_with = "tokens::deserialize_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "tokens::deserialize_list")]
    pub body_parts: Vec<String>,
}

impl ExerciseCandidate {
    /// Lower-cased, trimmed name used for duplicate detection
    pub fn normalized_name(&self) -> String {
        tokens::normalize(&self.name)
    }
}

// ============================================================================
// Tag Vocabularies
// ============================================================================

/// Tag of a split slot; doubles as the catalog tag used to fetch candidates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SlotTag {
    Chest,
    Back,
    Lats,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
    Abdominals,
    Compound,
    Cardio,
    CoreAntiExtension,
    FullBody,
}

impl SlotTag {
    pub const ALL: [SlotTag; 17] = [
        SlotTag::Chest,
        SlotTag::Back,
        SlotTag::Lats,
        SlotTag::Shoulders,
        SlotTag::Biceps,
        SlotTag::Triceps,
        SlotTag::Forearms,
        SlotTag::Quads,
        SlotTag::Hamstrings,
        SlotTag::Glutes,
        SlotTag::Calves,
        SlotTag::Abs,
        SlotTag::Abdominals,
        SlotTag::Compound,
        SlotTag::Cardio,
        SlotTag::CoreAntiExtension,
        SlotTag::FullBody,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotTag::Chest => "chest",
            SlotTag::Back => "back",
            SlotTag::Lats => "lats",
            SlotTag::Shoulders => "shoulders",
            SlotTag::Biceps => "biceps",
            SlotTag::Triceps => "triceps",
            SlotTag::Forearms => "forearms",
            SlotTag::Quads => "quads",
            SlotTag::Hamstrings => "hamstrings",
            SlotTag::Glutes => "glutes",
            SlotTag::Calves => "calves",
            SlotTag::Abs => "abs",
            SlotTag::Abdominals => "abdominals",
            SlotTag::Compound => "compound",
            SlotTag::Cardio => "cardio",
            SlotTag::CoreAntiExtension => "core_anti_extension",
            SlotTag::FullBody => "full_body",
        }
    }

    /// Core tags are collapsed to a single exercise placed last in a day
    pub fn is_core(&self) -> bool {
        matches!(self, SlotTag::Abs | SlotTag::Abdominals)
    }
}

impl fmt::Display for SlotTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotTag {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = tokens::normalize(s);
        SlotTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| crate::Error::Other(format!("Unknown slot tag: {}", s)))
    }
}

/// Catalog tags a warm-up may be drawn from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WarmupTag {
    Cardio,
    CoreAntiExtension,
    Mobility,
}

impl WarmupTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarmupTag::Cardio => "cardio",
            WarmupTag::CoreAntiExtension => "core_anti_extension",
            WarmupTag::Mobility => "mobility",
        }
    }
}

/// Internal label recording which step produced a planned exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MetaTag {
    Warmup,
    Slot(SlotTag),
    /// Exercises loaded from storage or swapped in by hand
    #[default]
    Untagged,
}

impl MetaTag {
    pub fn is_core(&self) -> bool {
        matches!(self, MetaTag::Slot(tag) if tag.is_core())
    }
}

// ============================================================================
// Split Templates
// ============================================================================

/// A placeholder requiring `count` exercises carrying `tag`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitSlot {
    pub tag: SlotTag,
    pub count: u32,
}

/// One training day of a split
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitDay {
    pub name: String,
    pub ordinal: u32,
    pub slots: Vec<SplitSlot>,
}

/// Training template for a (goal, sessions-per-week) pair
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitTemplate {
    pub goal: String,
    pub sessions_per_week: u8,
    #[serde(default)]
    pub name: String,
    pub days: Vec<SplitDay>,
}

// ============================================================================
// Planned Output
// ============================================================================

/// Prescription attached to a planned exercise
///
/// Warm-ups are prescribed by duration rather than repetitions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prescription {
    WorkSet {
        sets: u32,
        rep_min: u32,
        rep_max: u32,
        rest_seconds: u32,
    },
    Warmup {
        duration_sec_min: u32,
        duration_sec_max: u32,
        rest_seconds: u32,
    },
}

impl Prescription {
    pub fn sets(&self) -> u32 {
        match self {
            Prescription::WorkSet { sets, .. } => *sets,
            Prescription::Warmup { .. } => 1,
        }
    }

    /// Lower bound: repetitions for work sets, seconds for warm-ups
    pub fn rep_min(&self) -> u32 {
        match self {
            Prescription::WorkSet { rep_min, .. } => *rep_min,
            Prescription::Warmup {
                duration_sec_min, ..
            } => *duration_sec_min,
        }
    }

    /// Upper bound: repetitions for work sets, seconds for warm-ups
    pub fn rep_max(&self) -> u32 {
        match self {
            Prescription::WorkSet { rep_max, .. } => *rep_max,
            Prescription::Warmup {
                duration_sec_max, ..
            } => *duration_sec_max,
        }
    }

    pub fn rest_seconds(&self) -> u32 {
        match self {
            Prescription::WorkSet { rest_seconds, .. }
            | Prescription::Warmup { rest_seconds, .. } => *rest_seconds,
        }
    }
}

/// An exercise placed in a generated day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedExercise {
    pub catalog_id: String,
    pub name: String,
    #[serde(flatten)]
    pub prescription: Prescription,
    #[serde(skip)]
    pub meta_tag: MetaTag,
}

impl PlannedExercise {
    pub fn sets(&self) -> u32 {
        self.prescription.sets()
    }

    pub fn rep_min(&self) -> u32 {
        self.prescription.rep_min()
    }

    pub fn rep_max(&self) -> u32 {
        self.prescription.rep_max()
    }

    pub fn rest_seconds(&self) -> u32 {
        self.prescription.rest_seconds()
    }
}

/// One generated training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedDay {
    pub name: String,
    pub notes: String,
    pub exercises: Vec<PlannedExercise>,
}

/// A generated plan: one entry per split day, in split order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Plan {
    pub days: Vec<PlannedDay>,
}

/// Inputs of a single plan generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
    pub sessions_per_week: u8,
    pub equipment: Option<String>,
    pub session_minutes: u32,
    #[serde(default)]
    pub injuries: Vec<String>,
}
