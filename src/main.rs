//! LinkAmp main entry point
//!
//! This is the command-line interface for the LinkAmp backlink amplification
//! toolkit.

use anyhow::{bail, Context};
use clap::Parser;
use linkamp::config::{load_config_with_hash, OperationMode};
use linkamp::output::{export_campaign_csv, print_summary};
use linkamp::pipeline::{run_batch, run_monitor, AmplifyContext, EventSink};
use linkamp::storage::{open_storage, CampaignRecord, CampaignStore, Settings, SqliteCampaignStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// LinkAmp: backlink amplification toolkit
///
/// Validates that candidate backlink URLs actually link to your target
/// domain, fans out best-effort amplification signals, and records the
/// per-link results into named campaigns.
#[derive(Parser, Debug)]
#[command(name = "linkamp")]
#[command(version)]
#[command(about = "Backlink amplification toolkit", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Campaign to operate on
    #[arg(short, long)]
    campaign: Option<String>,

    /// Target domain for a newly created campaign
    #[arg(long)]
    target_domain: Option<String>,

    /// File with candidate backlink URLs, one per line (stdin when omitted)
    #[arg(long, value_name = "FILE")]
    urls: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Re-check every stored link of the campaign instead of amplifying
    #[arg(long, conflicts_with_all = ["export_csv", "list_campaigns", "set_mode"])]
    monitor: bool,

    /// Export the campaign's results to a CSV file and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["monitor", "list_campaigns", "set_mode"])]
    export_csv: Option<PathBuf>,

    /// List stored campaigns and exit
    #[arg(long, conflicts_with_all = ["monitor", "export_csv", "set_mode"])]
    list_campaigns: bool,

    /// Persist the operation mode ("standard" or "privacy") and exit
    #[arg(long, value_name = "MODE", conflicts_with_all = ["monitor", "export_csv", "list_campaigns"])]
    set_mode: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded (hash: {})", config_hash);

    let mut store = open_storage(Path::new(&config.storage.database_path))
        .context("Failed to open campaign database")?;

    if let Some(mode) = &cli.set_mode {
        return handle_set_mode(&mut store, mode);
    }

    if cli.list_campaigns {
        return handle_list_campaigns(&store);
    }

    let campaign_name = cli
        .campaign
        .as_deref()
        .context("--campaign is required for this operation")?;

    if let Some(csv_path) = &cli.export_csv {
        return handle_export_csv(&store, campaign_name, csv_path);
    }

    // The persisted settings can only tighten the configured mode: privacy
    // from either source wins.
    let settings = store.load_settings()?;
    let mode = if settings.operation_mode == OperationMode::Privacy {
        OperationMode::Privacy
    } else {
        config.mode.operation_mode
    };

    let ctx = AmplifyContext::from_config(&config)?.with_operation_mode(mode);

    if cli.monitor {
        handle_monitor(&ctx, &mut store, campaign_name).await
    } else {
        let campaign =
            resolve_campaign(&mut store, campaign_name, cli.target_domain.as_deref())?;
        let urls = read_candidate_urls(cli.urls.as_deref())?;
        handle_amplify(&ctx, &config, &mut store, &campaign, urls).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkamp=info,warn"),
            1 => EnvFilter::new("linkamp=debug,info"),
            2 => EnvFilter::new("linkamp=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Fetches the campaign by name, creating it when a target domain was given
fn resolve_campaign(
    store: &mut SqliteCampaignStore,
    name: &str,
    target_domain: Option<&str>,
) -> anyhow::Result<CampaignRecord> {
    if let Some(campaign) = store.get_campaign_by_name(name)? {
        if let Some(domain) = target_domain {
            if domain != campaign.target_domain {
                tracing::warn!(
                    "Campaign '{}' already targets {}; ignoring --target-domain {}",
                    name,
                    campaign.target_domain,
                    domain
                );
            }
        }
        return Ok(campaign);
    }

    let domain = target_domain
        .context("New campaign: --target-domain is required on first use")?;
    let id = store.create_campaign(name, domain)?;
    tracing::info!("Created campaign '{}' targeting {}", name, domain);
    Ok(store.get_campaign(id)?)
}

/// Reads candidate URLs from a file or stdin
///
/// Lines are trimmed and pre-filtered to non-empty strings beginning with
/// `http`, per the input contract.
fn read_candidate_urls(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let content = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read URL list from {}", p.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read URL list from stdin")?;
            buffer
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.starts_with("http"))
        .map(String::from)
        .collect())
}

/// Handles the default amplification run
async fn handle_amplify(
    ctx: &AmplifyContext,
    config: &linkamp::Config,
    store: &mut SqliteCampaignStore,
    campaign: &CampaignRecord,
    urls: Vec<String>,
) -> anyhow::Result<()> {
    if urls.is_empty() {
        bail!("No valid backlink URLs supplied (lines must start with http)");
    }

    let existing = store.link_urls(campaign.id)?;
    let stages = config.stages.to_stage_config();

    let (events, log_rx, progress_rx) = EventSink::channel();
    let renderer = spawn_event_renderer(log_rx, progress_rx);

    let outcome = run_batch(
        ctx,
        &urls,
        &campaign.target_domain,
        stages,
        &existing,
        &events,
    )
    .await;

    drop(events);
    let _ = renderer.await;

    let results = outcome?;
    store.append_links(campaign.id, &results)?;

    println!();
    print_summary(&results);
    Ok(())
}

/// Handles the --monitor mode: re-checks every stored link
async fn handle_monitor(
    ctx: &AmplifyContext,
    store: &mut SqliteCampaignStore,
    campaign_name: &str,
) -> anyhow::Result<()> {
    let campaign = store
        .get_campaign_by_name(campaign_name)?
        .with_context(|| format!("Unknown campaign '{}'", campaign_name))?;

    let links = store.load_links(campaign.id)?;
    if links.is_empty() {
        bail!("Campaign '{}' has no stored links to check", campaign_name);
    }

    let (events, log_rx, progress_rx) = EventSink::channel();
    let renderer = spawn_event_renderer(log_rx, progress_rx);

    let outcome = run_monitor(ctx, links, &campaign.target_domain, &events).await;

    drop(events);
    let _ = renderer.await;

    let checked = outcome?;
    store.update_link_checks(campaign.id, &checked)?;

    let live = checked.iter().filter(|l| l.live == Some(true)).count();
    println!("\n{} of {} links are live.", live, checked.len());
    Ok(())
}

/// Handles the --export-csv mode
fn handle_export_csv(
    store: &SqliteCampaignStore,
    campaign_name: &str,
    csv_path: &Path,
) -> anyhow::Result<()> {
    let campaign = store
        .get_campaign_by_name(campaign_name)?
        .with_context(|| format!("Unknown campaign '{}'", campaign_name))?;

    let links = store.load_links(campaign.id)?;
    export_campaign_csv(csv_path, &links)?;

    println!(
        "Exported {} link(s) from '{}' to {}",
        links.len(),
        campaign.name,
        csv_path.display()
    );
    Ok(())
}

/// Handles the --list-campaigns mode
fn handle_list_campaigns(store: &SqliteCampaignStore) -> anyhow::Result<()> {
    let campaigns = store.list_campaigns()?;

    if campaigns.is_empty() {
        println!("No campaigns yet.");
        return Ok(());
    }

    println!("{:<24} {:<30} {:>6}  {}", "Name", "Target Domain", "Links", "Created");
    for campaign in campaigns {
        let count = store.count_links(campaign.id)?;
        println!(
            "{:<24} {:<30} {:>6}  {}",
            campaign.name, campaign.target_domain, count, campaign.created_at
        );
    }
    Ok(())
}

/// Handles the --set-mode flag
fn handle_set_mode(store: &mut SqliteCampaignStore, mode: &str) -> anyhow::Result<()> {
    let operation_mode = OperationMode::from_db_string(mode)
        .with_context(|| format!("Unknown mode '{}', expected standard or privacy", mode))?;

    store.save_settings(&Settings { operation_mode })?;
    println!("Operation mode set to {}.", operation_mode.to_db_string());
    Ok(())
}

/// Renders log and progress events to stdout until both streams close
fn spawn_event_renderer(
    mut log_rx: tokio::sync::mpsc::UnboundedReceiver<linkamp::pipeline::LogEvent>,
    mut progress_rx: tokio::sync::mpsc::UnboundedReceiver<linkamp::pipeline::ProgressEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                log = log_rx.recv() => match log {
                    Some(event) => println!("[{}] {}", event.severity.as_str(), event.message),
                    None => break,
                },
                Some(p) = progress_rx.recv() => {
                    println!("[progress] {}/{}", p.completed, p.total);
                }
            }
        }

        // Drain any progress events that arrived after the log stream closed
        while let Ok(p) = progress_rx.try_recv() {
            println!("[progress] {}/{}", p.completed, p.total);
        }
    })
}
