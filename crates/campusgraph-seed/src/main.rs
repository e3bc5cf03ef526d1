//! CLI entry point for the campusgraph seeder.
//!
//! Logs go to stderr; each command writes a JSON report to stdout.

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, EnvFilter};

use campusgraph_core::{MemoryStore, SeedStore};
use campusgraph_graph::GraphClient;

use campusgraph_seed::config::{load_graph_config, load_seed_config, SeedConfig};
use campusgraph_seed::{generate_dataset, purge_dataset, register_schema, DatasetCounts};

#[derive(Parser)]
#[command(name = "campusgraph-seed")]
#[command(about = "Seed and purge the campus relationship dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: campusgraph).
    #[arg(short, long, default_value = "campusgraph", global = true)]
    config: String,

    /// Run against an empty in-memory store instead of Neo4j.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create entities and connect them.
    Generate {
        #[arg(long)]
        universities: Option<usize>,
        #[arg(long)]
        cities: Option<usize>,
        #[arg(long)]
        people: Option<usize>,
        #[arg(long)]
        courses: Option<usize>,
        #[arg(long)]
        campuses: Option<usize>,
        /// RNG seed for a reproducible dataset.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Delete every entity, relationship edge and person role term.
    Purge {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Declare the relationship types and the person role vocabulary.
    Register,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let seed_config = load_seed_config(&cli.config)?;

    if let Command::Purge { yes: false } = cli.command {
        if !confirm("This will delete ALL generated entities, relationships and person roles.")? {
            tracing::info!("Purge cancelled");
            return Ok(());
        }
    }

    if cli.dry_run {
        tracing::info!("Dry run against an in-memory store");
        let store = MemoryStore::with_schema();
        return execute(&store, &cli.command, &seed_config).await;
    }

    let graph_config = load_graph_config(&cli.config);
    let graph = GraphClient::connect(&graph_config).await?;
    tracing::info!(uri = %graph_config.uri, dataset = %graph.dataset(), "Connected to Neo4j");

    execute(&graph, &cli.command, &seed_config).await
}

async fn execute<S: SeedStore + ?Sized>(
    store: &S,
    command: &Command,
    seed_config: &SeedConfig,
) -> anyhow::Result<()> {
    match *command {
        Command::Generate {
            universities,
            cities,
            people,
            courses,
            campuses,
            seed,
        } => {
            let defaults = seed_config.counts;
            let counts = DatasetCounts {
                universities: universities.unwrap_or(defaults.universities),
                cities: cities.unwrap_or(defaults.cities),
                people: people.unwrap_or(defaults.people),
                courses: courses.unwrap_or(defaults.courses),
                campuses: campuses.unwrap_or(defaults.campuses),
            };
            let mut rng = match seed.or(seed_config.rng_seed) {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            let report = generate_dataset(store, &counts, &mut rng).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Purge { .. } => {
            let report = purge_dataset(store).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Register => {
            register_schema(store).await?;
            println!("{}", serde_json::json!({ "registered": true }));
        }
    }
    Ok(())
}

fn confirm(warning: &str) -> std::io::Result<bool> {
    let mut stderr = std::io::stderr();
    writeln!(stderr, "{warning}")?;
    write!(stderr, "Type 'yes' to continue: ")?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
