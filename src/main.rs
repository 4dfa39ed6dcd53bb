use std::collections::HashMap;

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error};

use netprofile::generator::{self, Employee};
use netprofile::models::{group_by_user, AccessEvent, TimeRange};
use netprofile::profile::ProfileEngine;
use netprofile::report;
use netprofile::stats::StatsEngine;

/// Network access analytics and user behavior profiling
#[derive(Parser)]
#[command(name = "netprofile")]
#[command(about = "Compute traffic statistics and user profiles from access logs", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Synthetic dataset parameters shared by all subcommands.
#[derive(Args)]
struct GenerateArgs {
    /// Number of access events to generate
    #[arg(long, default_value = "10000")]
    events: usize,

    /// Number of days the events span, ending now
    #[arg(long, default_value = "7")]
    days: i64,

    /// Number of employees in the directory
    #[arg(long, default_value = "100")]
    users: usize,

    /// Seed for reproducible generation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full console report: overview, rankings, trends, and profiles (default)
    Report {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Number of entries in the top-user and top-domain rankings
        #[arg(long, default_value = "10")]
        top: usize,

        /// Number of sample profiles to print
        #[arg(long, default_value = "5")]
        sample: usize,
    },
    /// Aggregate statistics only
    Stats {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Restrict to events at or after this RFC 3339 timestamp
        #[arg(long, requires = "until")]
        since: Option<String>,

        /// Restrict to events at or before this RFC 3339 timestamp
        #[arg(long, requires = "since")]
        until: Option<String>,

        /// Emit JSON instead of a console summary
        #[arg(long)]
        json: bool,
    },
    /// User profiles only
    Profiles {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Number of sample profiles to print (console mode)
        #[arg(long, default_value = "5")]
        sample: usize,

        /// Emit JSON instead of a console summary
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("netprofile started with verbosity level: {}", cli.verbose);

    let result = match cli.command {
        Some(Commands::Report {
            generate,
            top,
            sample,
        }) => run_report(&generate, top, sample),
        Some(Commands::Stats {
            generate,
            since,
            until,
            json,
        }) => run_stats(&generate, since.as_deref(), until.as_deref(), json),
        Some(Commands::Profiles {
            generate,
            sample,
            json,
        }) => run_profiles(&generate, sample, json),
        None => run_report(&GenerateArgs::default_values(), 10, 5),
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

impl GenerateArgs {
    fn default_values() -> Self {
        Self {
            events: 10000,
            days: 7,
            users: 100,
            seed: None,
        }
    }
}

/// Generate the synthetic dataset every subcommand operates on.
fn generate_dataset(args: &GenerateArgs) -> anyhow::Result<(Vec<Employee>, Vec<AccessEvent>)> {
    if args.users == 0 {
        anyhow::bail!("--users must be at least 1");
    }
    let end = Utc::now();
    let range = TimeRange::new(end - Duration::days(args.days.max(1)), end)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let employees = generator::generate_employees(args.users, &mut rng);
    let events = generator::generate_events(&employees, &range, args.events, &mut rng);

    debug!(
        events = events.len(),
        users = employees.len(),
        "generated dataset"
    );
    Ok((employees, events))
}

fn directory(employees: &[Employee]) -> HashMap<String, String> {
    employees
        .iter()
        .map(|e| (e.user_id.clone(), e.name.clone()))
        .collect()
}

fn run_report(generate: &GenerateArgs, top: usize, sample: usize) -> anyhow::Result<()> {
    let (employees, events) = generate_dataset(generate)?;
    let names = directory(&employees);
    let stats_engine = StatsEngine::new();
    let profile_engine = ProfileEngine::new();

    println!("=== Access overview ===");
    println!("{}", report::render_overview(&stats_engine.compute(&events)));

    println!(
        "{}",
        report::render_ranking(
            &format!("Top {top} users"),
            &stats_engine.top_users(&events, top),
            &names,
        )
    );
    println!(
        "{}",
        report::render_ranking(
            &format!("Top {top} domains"),
            &stats_engine.top_domains(&events, top),
            &HashMap::new(),
        )
    );

    println!("{}", report::render_hourly(&stats_engine.hourly_trend(&events)));
    println!(
        "{}",
        report::render_departments(&stats_engine.by_department(&events))
    );

    let profiles = profile_engine.compute_batch_profiles(&group_by_user(&events), &names);
    println!("{}", report::render_profiles(&profiles, sample));
    Ok(())
}

fn run_stats(
    generate: &GenerateArgs,
    since: Option<&str>,
    until: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (_, events) = generate_dataset(generate)?;
    let engine = StatsEngine::new();

    let stats = match (since, until) {
        (Some(since), Some(until)) => {
            let range = TimeRange::parse(since, until)?;
            engine.compute_in_range(&events, &range)
        }
        _ => engine.compute(&events),
    };

    if json {
        println!("{}", report::to_json(&stats)?);
    } else {
        println!("{}", report::render_overview(&stats));
    }
    Ok(())
}

fn run_profiles(generate: &GenerateArgs, sample: usize, json: bool) -> anyhow::Result<()> {
    let (employees, events) = generate_dataset(generate)?;
    let profiles =
        ProfileEngine::new().compute_batch_profiles(&group_by_user(&events), &directory(&employees));

    if json {
        println!("{}", report::to_json(&profiles)?);
    } else {
        println!("{}", report::render_profiles(&profiles, sample));
    }
    Ok(())
}
