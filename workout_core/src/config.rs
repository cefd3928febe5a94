//! Configuration file support for wplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wplan/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub alternatives: AlternativesConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Exercise catalog file (`.csv` or JSON); built-in catalog when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Split template library (TOML); built-in library when unset
    #[serde(default)]
    pub splits_path: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
            splits_path: None,
        }
    }
}

/// Request defaults used when the caller omits a value
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_equipment")]
    pub equipment: String,

    #[serde(default = "default_session_minutes")]
    pub session_minutes: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            equipment: default_equipment(),
            session_minutes: default_session_minutes(),
        }
    }
}

/// Tuning constants of the plan generator
///
/// The defaults reproduce the reference numbers exactly; changing them is a
/// product decision.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_seconds_per_rep")]
    pub seconds_per_rep: u32,

    #[serde(default = "default_transition_seconds")]
    pub transition_seconds: u32,

    #[serde(default = "default_min_session_minutes")]
    pub min_session_minutes: u32,

    /// Top-up only runs while a day is below this fraction of its budget
    #[serde(default = "default_top_up_threshold")]
    pub top_up_threshold: f64,

    #[serde(default = "default_top_up_max_additions")]
    pub top_up_max_additions: usize,

    #[serde(default = "default_max_exercises_per_day")]
    pub max_exercises_per_day: usize,

    #[serde(default = "default_top_up_max_iterations")]
    pub top_up_max_iterations: usize,

    #[serde(default = "default_core_anti_extension_cap")]
    pub core_anti_extension_cap: usize,

    /// Page size requested from the catalog per slot
    #[serde(default = "default_candidate_pool_size")]
    pub candidate_pool_size: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            seconds_per_rep: default_seconds_per_rep(),
            transition_seconds: default_transition_seconds(),
            min_session_minutes: default_min_session_minutes(),
            top_up_threshold: default_top_up_threshold(),
            top_up_max_additions: default_top_up_max_additions(),
            max_exercises_per_day: default_max_exercises_per_day(),
            top_up_max_iterations: default_top_up_max_iterations(),
            core_anti_extension_cap: default_core_anti_extension_cap(),
            candidate_pool_size: default_candidate_pool_size(),
        }
    }
}

impl PlannerConfig {
    /// Reject values that would make generation meaningless
    pub fn validate(&self) -> Result<()> {
        if self.seconds_per_rep == 0 {
            return Err(Error::Config("seconds_per_rep must be positive".into()));
        }
        if self.min_session_minutes == 0 {
            return Err(Error::Config("min_session_minutes must be positive".into()));
        }
        if !(self.top_up_threshold > 0.0 && self.top_up_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "top_up_threshold must be in (0, 1], got {}",
                self.top_up_threshold
            )));
        }
        if self.max_exercises_per_day == 0 {
            return Err(Error::Config(
                "max_exercises_per_day must be positive".into(),
            ));
        }
        if self.candidate_pool_size == 0 {
            return Err(Error::Config("candidate_pool_size must be positive".into()));
        }
        Ok(())
    }

    /// Session budget in seconds for the requested minutes
    pub fn budget_seconds(&self, session_minutes: u32) -> u32 {
        session_minutes
            .max(self.min_session_minutes)
            .saturating_mul(60)
    }
}

/// Swap alternatives configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlternativesConfig {
    #[serde(default = "default_alternatives_limit")]
    pub default_limit: usize,
}

impl Default for AlternativesConfig {
    fn default() -> Self {
        Self {
            default_limit: default_alternatives_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("wplan")
}

fn default_equipment() -> String {
    "gym".into()
}

fn default_session_minutes() -> u32 {
    45
}

fn default_seconds_per_rep() -> u32 {
    6
}

fn default_transition_seconds() -> u32 {
    20
}

fn default_min_session_minutes() -> u32 {
    10
}

fn default_top_up_threshold() -> f64 {
    0.85
}

fn default_top_up_max_additions() -> usize {
    8
}

fn default_max_exercises_per_day() -> usize {
    24
}

fn default_top_up_max_iterations() -> usize {
    100
}

fn default_core_anti_extension_cap() -> usize {
    1
}

fn default_candidate_pool_size() -> usize {
    100
}

fn default_alternatives_limit() -> usize {
    20
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.planner.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("wplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Path of the saved-plan book inside the data directory
    pub fn plans_path(&self) -> PathBuf {
        self.data.data_dir.join("plans.json")
    }
}
