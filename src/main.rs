//! `u-groups` command-line front end.
//!
//! Loads a CSV roster, builds and validates the quota plan, assigns the
//! groups, prints the recap and writes the next period's files.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use u_groups::allocation::{AllocationRequest, AllocationSummary};
use u_groups::config::AllocationConfig;
use u_groups::history::extract_history;
use u_groups::io;
use u_groups::models::{Allocation, QuotaPlan, Roster};

#[derive(Parser, Debug)]
#[command(name = "u-groups", version, about = "Assign students to balanced, history-aware groups")]
struct Cli {
    /// Roster file (.csv) with Nom, Prenom, Classe, Niveau columns
    roster: PathBuf,

    /// Number of groups (default: number of classes + 1)
    #[arg(short, long)]
    groups: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for a reproducible allocation
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory (default: the roster's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the recap without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .with_writer(std::io::stderr)
        .init();
}

fn print_recap(
    roster: &Roster,
    plan: &QuotaPlan,
    allocation: &Allocation,
    summary: &AllocationSummary,
) {
    let levels: Vec<_> = plan.levels().collect();
    let classes: Vec<&str> = roster.class_labels().into_iter().collect();

    let mut header = vec!["Groupe".to_string(), "Effectif".to_string()];
    header.extend(levels.iter().map(|l| format!("Niveau {l}")));
    header.extend(classes.iter().map(|c| format!("Classe {c}")));
    println!("{}", header.join("\t"));

    for (index, group) in allocation.groups.iter().enumerate() {
        let mut row = vec![format!("Groupe {}", group.number), group.len().to_string()];
        row.extend(
            levels
                .iter()
                .map(|l| summary.by_level[index].get(*l).copied().unwrap_or(0).to_string()),
        );
        row.extend(
            classes
                .iter()
                .map(|c| summary.by_class[index].get(*c).copied().unwrap_or(0).to_string()),
        );
        println!("{}", row.join("\t"));
    }

    println!(
        "repeat placements: {}, unplaced: {}",
        summary.repeat_placements, summary.gap_count
    );
    for warning in &summary.warnings {
        println!("warning: {warning:?}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "arguments");

    let config = match &cli.config {
        Some(path) => AllocationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AllocationConfig::default(),
    };

    let mut roster = io::load_roster(&cli.roster)
        .with_context(|| format!("loading roster {}", cli.roster.display()))?;
    if roster.is_empty() {
        bail!("roster {} has no students", cli.roster.display());
    }

    let group_count = cli.groups.unwrap_or_else(|| config.group_count_for(&roster));
    let mut request = AllocationRequest::new(roster.clone())
        .with_group_count(group_count)
        .with_quotas(config.manual_quotas()?);
    if let Some(seed) = cli.seed.or(config.seed) {
        request = request.with_seed(seed);
    }

    let outcome = request.run().context("quota plan rejected")?;
    let history = extract_history(&roster);
    let summary = AllocationSummary::calculate(&outcome.allocation, &history);
    print_recap(&roster, &outcome.plan, &outcome.allocation, &summary);

    if !outcome.allocation.is_complete() {
        warn!(gaps = outcome.allocation.gaps.len(), "some students could not be placed");
    }

    if cli.dry_run {
        info!("dry run, nothing written");
        return Ok(());
    }

    let period = roster.record_allocation(&outcome.allocation);
    let output = cli.output.clone().unwrap_or_else(|| {
        cli.roster
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let folder = io::export_allocation(&output, &roster, &outcome.allocation, period)
        .with_context(|| format!("writing groups to {}", output.display()))?;
    println!("period {period} written to {}", folder.display());
    Ok(())
}
