#![forbid(unsafe_code)]

//! Core domain model and business logic for workout plan generation.
//!
//! This crate provides:
//! - Domain types (exercises, split templates, prescriptions, plans)
//! - Catalog and split-template access
//! - Plan generation engine
//! - Exercise substitution ranking
//! - Persistence of saved plans

pub mod types;
pub mod tokens;
pub mod error;
pub mod catalog;
pub mod splits;
pub mod config;
pub mod logging;
pub mod scheme;
pub mod safety;
pub mod budget;
pub mod slots;
pub mod topup;
pub mod order;
pub mod warmup;
pub mod engine;
pub mod substitute;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_catalog, CatalogGateway, ExerciseFilter, InMemoryCatalog};
pub use splits::{default_library, SplitLibrary, SplitStore};
pub use config::{Config, PlannerConfig};
pub use scheme::{scheme_for, Goal, GoalScheme};
pub use engine::Planner;
pub use substitute::{alternatives, RankedAlternative, SwapQuery};
pub use store::{rank_alternatives, swap_exercise, PlanBook, SavedPlan, WorkoutDay};
