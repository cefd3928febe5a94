//! Injury mapping and exercise safety filtering.
//!
//! Injuries translate into a set of banned muscle/equipment tokens plus
//! name guards. A candidate is unsafe when any of its structured tokens is
//! banned, or when its name matches an active guard even though its fields
//! say nothing (catalog data is often mistagged).

use crate::tokens::{self, normalize};
use crate::ExerciseCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SHOULDER_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile_guard(
        r"(?i)\b(shoulder|overhead|military|arnold|push)[\s-]*press|\b(lateral|side|front)[\s-]*raises?\b|\bupright[\s-]*rows?\b",
    )
});

static BACK_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile_guard(r"(?i)\b(deadlifts?|rows?|pull[\s-]*downs?|good[\s-]*mornings?)\b")
});

static LEGS_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile_guard(r"(?i)\b(squats?|lunges?|leg[\s-]*press|step[\s-]*ups?|split[\s-]*squats?)\b")
});

/// Compile a guard pattern; `None` disables the guard
fn compile_guard(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::warn!("Invalid name guard pattern; guard disabled: {}", e))
        .ok()
}

/// Name-based guard for a body region
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameGuard {
    Shoulder,
    Back,
    Legs,
}

impl NameGuard {
    fn pattern(&self) -> Option<&'static Regex> {
        match self {
            NameGuard::Shoulder => SHOULDER_PATTERN.as_ref(),
            NameGuard::Back => BACK_PATTERN.as_ref(),
            NameGuard::Legs => LEGS_PATTERN.as_ref(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern().is_some_and(|re| re.is_match(name))
    }
}

struct InjuryRule {
    labels: &'static [&'static str],
    tokens: &'static [&'static str],
    guard: Option<NameGuard>,
}

const INJURY_TABLE: &[InjuryRule] = &[
    InjuryRule {
        labels: &["shoulders", "shoulder"],
        tokens: &["shoulders", "delts", "deltoids", "rotator cuff"],
        guard: Some(NameGuard::Shoulder),
    },
    InjuryRule {
        labels: &["back", "lower back", "lower_back", "upper back"],
        tokens: &["lower back", "lats", "traps", "spine", "erector spinae"],
        guard: Some(NameGuard::Back),
    },
    InjuryRule {
        labels: &["knees", "knee"],
        tokens: &["quads", "hamstrings", "glutes", "calves"],
        guard: Some(NameGuard::Legs),
    },
    InjuryRule {
        labels: &["hips", "hip"],
        tokens: &["glutes", "hip flexors", "adductors", "abductors"],
        guard: Some(NameGuard::Legs),
    },
    InjuryRule {
        labels: &["ankles", "ankle"],
        tokens: &["calves", "ankles"],
        guard: Some(NameGuard::Legs),
    },
    InjuryRule {
        labels: &["elbows", "elbow"],
        tokens: &["biceps", "triceps", "forearms", "elbows"],
        guard: None,
    },
    InjuryRule {
        labels: &["wrists", "wrist"],
        tokens: &["forearms", "wrists", "barbell"],
        guard: None,
    },
    InjuryRule {
        labels: &["neck"],
        tokens: &["neck", "traps"],
        guard: None,
    },
];

/// Tokens and name guards to avoid for one generation request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BannedMuscleSet {
    pub tokens: BTreeSet<String>,
    pub guards: BTreeSet<NameGuard>,
}

impl BannedMuscleSet {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.guards.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(&normalize(token))
    }
}

/// Build the banned set for a list of injury labels
///
/// Labels are matched case-insensitively; unknown labels contribute nothing.
pub fn banned_muscles<S: AsRef<str>>(injuries: &[S]) -> BannedMuscleSet {
    let mut banned = BannedMuscleSet::default();

    for injury in injuries {
        let label = normalize(injury.as_ref());
        match INJURY_TABLE.iter().find(|rule| rule.labels.contains(&label.as_str())) {
            Some(rule) => {
                banned.tokens.extend(rule.tokens.iter().map(|t| t.to_string()));
                banned.guards.extend(rule.guard);
            }
            None if !label.is_empty() => {
                tracing::debug!("Ignoring unknown injury label '{}'", label);
            }
            None => {}
        }
    }

    banned
}

/// All normalized tokens describing what a candidate loads
fn candidate_tokens(candidate: &ExerciseCandidate) -> impl Iterator<Item = String> + '_ {
    std::iter::once(&candidate.primary_muscle)
        .chain(std::iter::once(&candidate.equipment))
        .chain(&candidate.target_muscles)
        .chain(&candidate.secondary_muscles)
        .chain(&candidate.body_parts)
        .chain(&candidate.tags)
        // list fields normally arrive pre-split, but a stray "a, b" entry still counts twice
        .flat_map(|field| tokens::parse_tokens(field))
        .map(|token| normalize(&token))
}

/// Decide whether a candidate is safe for the banned set
pub fn is_safe(candidate: &ExerciseCandidate, banned: &BannedMuscleSet) -> bool {
    if banned.is_empty() {
        return true;
    }

    if let Some(token) = candidate_tokens(candidate).find(|t| banned.tokens.contains(t)) {
        tracing::trace!("Rejecting '{}': banned token '{}'", candidate.name, token);
        return false;
    }

    if let Some(guard) = banned.guards.iter().find(|g| g.matches(&candidate.name)) {
        tracing::trace!("Rejecting '{}': {:?} name guard", candidate.name, guard);
        return false;
    }

    true
}
