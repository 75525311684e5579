//! Armor set search from the command line
//!
//! Loads a catalog, resolves the requested activations by name and prints
//! the generated sets as JSON or text.

use std::path::PathBuf;

use armor_set_search::core::error::{Result, SearchError};
use armor_set_search::core::types::{ClassType, Gender};
use armor_set_search::data::load_catalog;
use armor_set_search::filter::{ExcludedPiecesFilter, FilterSet, MinDefenseFilter, RarityFilter};
use armor_set_search::search::{
    GeneratedArmorSet, SearchControl, SearchOutcome, SearchRequest, SetSearcher,
};
use armor_set_search::skills::SkillActivationChart;
use armor_set_search::SearchConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Armor set search - find armor, decorations and a charm for a skill list
#[derive(Parser, Debug)]
#[command(name = "set_search")]
#[command(about = "Search armor sets that activate the requested skills")]
struct Args {
    /// Catalog of armor, decorations, charms and activations
    #[arg(long, default_value = "data/catalog.toml")]
    catalog: PathBuf,

    /// Search configuration (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Activation to search for, by name (repeatable)
    #[arg(long = "skill")]
    skills: Vec<String>,

    /// Hunter class: blademaster or gunner
    #[arg(long, default_value = "blademaster")]
    class: ClassType,

    /// Hunter gender: male or female
    #[arg(long, default_value = "male")]
    gender: Gender,

    /// Decoration slots on the weapon (0-3)
    #[arg(long, default_value_t = 0)]
    weapon_slots: u8,

    /// Override the configured result limit
    #[arg(long)]
    limit: Option<usize>,

    /// Highest armor rarity to consider
    #[arg(long)]
    max_rarity: Option<u8>,

    /// Lowest base defense a piece may have
    #[arg(long)]
    min_defense: Option<u32>,

    /// Armor piece to leave out, by name (repeatable)
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the activations available to the class and exit
    #[arg(long)]
    list_skills: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("armor_set_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalog = load_catalog(&args.catalog)?;
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.unique_set_limit = limit;
    }
    config.validate()?;

    let searcher = SetSearcher::new(&catalog);

    if args.list_skills {
        for skill in searcher.positive_skills(args.class)? {
            println!("{:<28} {:<14} {:>3}", skill.name, skill.skill_tree, skill.points_needed);
        }
        return Ok(());
    }

    let chart = searcher.chart(args.class)?;
    let mut request = SearchRequest::new(args.class, args.gender)
        .with_limits(config.limits())
        .with_weapon_slots(args.weapon_slots);
    for name in &args.skills {
        match chart.requirement(name) {
            Some(skill) => request = request.with_skill(skill.clone()),
            None => tracing::warn!(skill = %name, "Unknown skill, ignoring"),
        }
    }
    if request.desired_skills.is_empty() {
        return Err(SearchError::Configuration(
            "no known skills requested (see --list-skills)".into(),
        ));
    }

    let mut filters = FilterSet::new();
    if let Some(max) = args.max_rarity {
        filters.push(RarityFilter { min: 1, max });
    }
    if let Some(min) = args.min_defense {
        filters.push(MinDefenseFilter { min });
    }
    if !args.excluded.is_empty() {
        filters.push(ExcludedPiecesFilter::new(args.excluded.iter().cloned()));
    }
    request = request.with_filters(filters);

    let control = SearchControl::new();
    let progress = |percent: u8| tracing::debug!(percent, "Search progress");
    let outcome = searcher.search(&request, &control, &progress)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_text(&outcome, &chart),
    }
    Ok(())
}

fn print_text(outcome: &SearchOutcome<'_>, chart: &SkillActivationChart) {
    println!("Armor Sets");
    println!("==========");
    println!(
        "Requested: {}",
        outcome
            .requirements
            .iter()
            .map(|r| format!("{} ({})", r.name, r.points_needed))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Found: {} ({} complete)",
        outcome.sets.len(),
        outcome.complete_sets().count()
    );
    if outcome.stopped {
        println!("Search was stopped early");
    }

    for (i, set) in outcome.sets.iter().enumerate() {
        println!();
        print_set(i + 1, set, chart);
    }
}

fn print_set(number: usize, set: &GeneratedArmorSet<'_>, chart: &SkillActivationChart) {
    let status = if set.is_partial() { "partial" } else { "complete" };
    println!("#{} [{}] defense {}", number, status, set.total_defense());
    for piece in set.pieces() {
        println!("  {:<6} {}", format!("{:?}", piece.slot), piece.name);
    }
    for placed in &set.decorations {
        println!("  + {} ({:?})", placed.decoration.name, placed.host);
    }
    if let Some(charm) = set.charm {
        println!("  Charm: {}", charm.name);
    }
    let points: Vec<String> = set
        .skill_points
        .iter()
        .map(|(tree, points)| format!("{} {:+}", tree, points))
        .collect();
    println!("  Points: {}", points.join(", "));
    let active: Vec<&str> = set
        .skill_points
        .iter()
        .filter_map(|(tree, &points)| chart.activated_name(tree, points))
        .collect();
    if !active.is_empty() {
        println!("  Active: {}", active.join(", "));
    }
    for shortfall in &set.shortfalls {
        println!("  Missing {} {}", shortfall.missing, shortfall.skill_tree);
    }
}
