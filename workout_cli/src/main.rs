use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use workout_core::catalog::build_default_catalog;
use workout_core::splits::build_default_library;
use workout_core::*;

#[derive(Parser)]
#[command(name = "wplan")]
#[command(about = "Workout plan generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Exercise catalog file (.csv or JSON) instead of the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Split template library (TOML) instead of the built-in library
    #[arg(long, global = true)]
    splits: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a training plan
    Generate {
        /// Training goal (muscle_gain, fat_loss, performance, general_fitness)
        #[arg(long)]
        goal: String,

        /// Sessions per week
        #[arg(long)]
        sessions: u8,

        /// Available equipment ("gym" means everything)
        #[arg(long)]
        equipment: Option<String>,

        /// Session length in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Injured area to avoid (repeatable)
        #[arg(long = "injury")]
        injuries: Vec<String>,

        /// Seed for reproducible plans
        #[arg(long)]
        seed: Option<u64>,

        /// Save the plan so its exercises can be swapped later
        #[arg(long)]
        save: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank replacements for one exercise of a saved day
    Alternatives {
        /// Saved day id
        #[arg(long)]
        day: Uuid,

        /// Position of the exercise in the day (0-based)
        #[arg(long)]
        slot: usize,

        /// Preferred equipment for the replacement
        #[arg(long)]
        equipment: Option<String>,

        /// Maximum number of results (clamped to 5..=60)
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace one exercise of a saved day
    Swap {
        /// Saved day id
        #[arg(long)]
        day: Uuid,

        /// Position of the exercise in the day (0-based)
        #[arg(long)]
        slot: usize,

        /// Catalog id of the replacement
        #[arg(long)]
        exercise: String,
    },

    /// List available split templates
    Splits,
}

fn main() {
    workout_core::logging::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let catalog_path = cli.catalog.or_else(|| config.data.catalog_path.clone());
    let splits_path = cli.splits.or_else(|| config.data.splits_path.clone());
    tracing::debug!("Using data dir {:?}", config.data.data_dir);

    match cli.command {
        Commands::Generate {
            goal,
            sessions,
            equipment,
            minutes,
            injuries,
            seed,
            save,
            json,
        } => {
            let request = PlanRequest {
                goal,
                sessions_per_week: sessions,
                equipment: Some(equipment.unwrap_or_else(|| config.defaults.equipment.clone())),
                session_minutes: minutes.unwrap_or(config.defaults.session_minutes),
                injuries,
            };
            let catalog = load_catalog(catalog_path.as_deref())?;
            let splits = load_splits(splits_path.as_deref())?;
            cmd_generate(&config, &catalog, &splits, request, seed, save, json)
        }
        Commands::Alternatives {
            day,
            slot,
            equipment,
            limit,
            json,
        } => {
            let catalog = load_catalog(catalog_path.as_deref())?;
            let limit = limit.unwrap_or(config.alternatives.default_limit);
            cmd_alternatives(&config, &catalog, day, slot, equipment.as_deref(), limit, json)
        }
        Commands::Swap { day, slot, exercise } => {
            let catalog = load_catalog(catalog_path.as_deref())?;
            cmd_swap(&config, &catalog, day, slot, &exercise)
        }
        Commands::Splits => {
            let splits = load_splits(splits_path.as_deref())?;
            cmd_splits(&splits);
            Ok(())
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
    let catalog = match path {
        Some(path) => InMemoryCatalog::load_from(path)?,
        None => {
            tracing::debug!("Using built-in exercise catalog");
            build_default_catalog()
        }
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn load_splits(path: Option<&Path>) -> Result<SplitLibrary> {
    match path {
        Some(path) => SplitLibrary::load_from(path),
        None => Ok(build_default_library()),
    }
}

fn cmd_generate(
    config: &Config,
    catalog: &InMemoryCatalog,
    splits: &SplitLibrary,
    request: PlanRequest,
    seed: Option<u64>,
    save: bool,
    json: bool,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => {
            tracing::debug!("Seeding planner with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let planner = Planner::new(catalog, splits, &config.planner);
    let Some(plan) = planner.generate(&request, &mut rng)? else {
        return Err(Error::Other(format!(
            "No split found for {} at {} sessions/week",
            request.goal, request.sessions_per_week
        )));
    };

    if !save {
        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for day in &plan.days {
                display_day(None, &day.name, &day.notes, &day.exercises);
            }
        }
        return Ok(());
    }

    let plans_path = config.plans_path();
    let saved = PlanBook::update(&plans_path, |book| Ok(book.save_plan(&plan, &request)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        for day in &saved.days {
            display_day(Some(day.id), &day.name, &day.notes, &day.exercises);
        }
        println!("✓ Plan saved: {}", saved.id);
        println!("  File: {}", plans_path.display());
    }
    Ok(())
}

fn cmd_alternatives(
    config: &Config,
    catalog: &InMemoryCatalog,
    day: Uuid,
    slot: usize,
    equipment: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let book = PlanBook::load(&config.plans_path())?;
    let ranked = rank_alternatives(&book, catalog, day, slot, equipment, limit)?;

    if json {
        let rows: Vec<_> = ranked
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.exercise.id,
                    "name": r.exercise.name,
                    "equipment": r.exercise.equipment,
                    "score": r.score,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No alternatives found.");
        return Ok(());
    }

    for alternative in &ranked {
        println!(
            "  {:>3}  {:<24} {} ({})",
            alternative.score,
            alternative.exercise.id,
            alternative.exercise.name,
            alternative.exercise.equipment
        );
    }
    Ok(())
}

fn cmd_swap(
    config: &Config,
    catalog: &InMemoryCatalog,
    day: Uuid,
    slot: usize,
    exercise: &str,
) -> Result<()> {
    let updated = PlanBook::update(&config.plans_path(), |book| {
        swap_exercise(book, catalog, day, slot, exercise)
    })?;

    println!("✓ Slot {} is now {}", slot, updated.name);
    println!("  {}", describe(&updated));
    Ok(())
}

fn cmd_splits(splits: &SplitLibrary) {
    for template in &splits.templates {
        let days: Vec<_> = template.days.iter().map(|d| d.name.as_str()).collect();
        println!(
            "  {:<16} {}/week  {}",
            template.goal,
            template.sessions_per_week,
            days.join(", ")
        );
    }
}

fn describe(exercise: &PlannedExercise) -> String {
    match exercise.prescription {
        Prescription::WorkSet {
            sets,
            rep_min,
            rep_max,
            rest_seconds,
        } => format!("{} x {}-{}, rest {}s", sets, rep_min, rep_max, rest_seconds),
        Prescription::Warmup {
            duration_sec_min,
            duration_sec_max,
            rest_seconds,
        } => format!(
            "{}-{}s, rest {}s",
            duration_sec_min, duration_sec_max, rest_seconds
        ),
    }
}

fn display_day(id: Option<Uuid>, name: &str, notes: &str, exercises: &[PlannedExercise]) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}  {}", name, notes);
    println!("╰─────────────────────────────────────────╯");
    if let Some(id) = id {
        println!("  Day: {}", id);
    }
    println!();

    for (i, exercise) in exercises.iter().enumerate() {
        println!("  {:>2}. {:<36} {}", i, exercise.name, describe(exercise));
    }
    println!();
}
