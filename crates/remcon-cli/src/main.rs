//! `remcon` operator CLI.
//!
//! Thin wrapper over `remcon-client`: list the systems of a remediation
//! plan (one page or all of them), trigger a playbook run, or download the
//! generated playbook. Service endpoints and the bearer token come from
//! flags or the `REMCON_*` environment variables.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use remcon_client::{
    InventoryHttpClient, Notification, NotificationVariant, Notifier, RemediationsHttpClient,
    download_playbook, execute_playbook, fetch_all_systems, fetch_system_page,
};
use remcon_core::{
    ConnectionPayload, ExecuteSummary, FilterConfig, MergedSystem, PageWindow, RemediationId,
    connection_label,
};

#[derive(Parser, Debug)]
#[command(name = "remcon", version, about = "Remediation plan console")]
struct Cli {
    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Command,
}

/// Where the remediations and inventory services live.
#[derive(Args, Debug)]
struct EndpointArgs {
    /// Base URL of the remediations service.
    #[arg(long, env = "REMCON_API_URL", global = true, default_value = "")]
    api_url: String,

    /// Base URL of the inventory service. Defaults to the remediations URL.
    #[arg(long, env = "REMCON_INVENTORY_URL", global = true)]
    inventory_url: Option<String>,

    /// Bearer token sent with every request.
    #[arg(long, env = "REMCON_API_TOKEN", global = true)]
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of a plan's systems, merged with inventory detail.
    Systems(SystemsArgs),
    /// List every system of a plan.
    AllSystems(AllSystemsArgs),
    /// Execute the plan's playbook on its reachable executors.
    Execute(ExecuteArgs),
    /// Download the plan's generated playbook.
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
struct SystemsArgs {
    /// Plan id.
    #[arg(long)]
    remediation: RemediationId,

    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Systems per page.
    #[arg(long, default_value_t = 50)]
    per_page: u32,

    /// Filter rows by hostname or id.
    #[arg(long)]
    filter: Option<String>,

    /// Emit JSON instead of the table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct AllSystemsArgs {
    /// Plan id.
    #[arg(long)]
    remediation: RemediationId,

    /// Emit JSON instead of the table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExecuteArgs {
    /// Plan id.
    #[arg(long)]
    remediation: RemediationId,

    /// Plan etag; a stale value aborts the run with 412.
    #[arg(long)]
    etag: String,

    /// Plan name, used in notifications.
    #[arg(long, default_value = "remediation plan")]
    name: String,
}

#[derive(Args, Debug)]
struct DownloadArgs {
    /// Plan id.
    #[arg(long)]
    remediation: RemediationId,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Prints notifications to stderr so stdout stays machine-readable.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn dispatch(&self, notification: Notification) {
        let tag = match notification.variant {
            NotificationVariant::Success => "ok",
            NotificationVariant::Danger => "error",
            NotificationVariant::Info => "info",
        };
        eprintln!("[{tag}] {}: {}", notification.title, notification.description);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let remediations = remediations_client(&cli.endpoints)?;

    match cli.command {
        Command::Systems(args) => {
            let inventory = inventory_client(&cli.endpoints)?;
            let connections = remediations.connection_status(args.remediation).await?;
            let window = PageWindow {
                page: args.page,
                per_page: args.per_page,
            };
            let filter = FilterConfig {
                hostname_or_id: args.filter,
            };
            let page = fetch_system_page(
                window,
                Some(&filter),
                &remediations,
                args.remediation,
                &inventory,
                &connections,
            )
            .await?;
            tracing::debug!(count = page.count, total = page.total, "page fetched");

            if args.json {
                println!("{}", serde_json::to_string_pretty(&page.results)?);
            } else {
                print_table(&page.results, &connections);
                eprintln!(
                    "page {} of {} systems total",
                    page.page, page.total
                );
            }
        }
        Command::AllSystems(args) => {
            let systems = fetch_all_systems(&remediations, args.remediation, None).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&systems)?);
            } else {
                println!("{:<38} NAME", "ID");
                for system in &systems {
                    let name = system
                        .display_name
                        .as_deref()
                        .or(system.hostname.as_deref())
                        .unwrap_or("-");
                    println!("{:<38} {name}", system.id.as_str());
                }
                eprintln!("{} systems", systems.len());
            }
        }
        Command::Execute(args) => {
            let payload = remediations.connection_status(args.remediation).await?;
            let summary = ExecuteSummary::new(payload.records().to_vec());
            if !summary.can_execute() {
                anyhow::bail!("no connected systems; nothing to execute");
            }
            execute_playbook(
                &remediations,
                &TerminalNotifier,
                args.remediation,
                args.etag,
                &args.name,
                &summary,
                || {},
            )
            .await?;
        }
        Command::Download(args) => {
            let bytes =
                download_playbook(&remediations, &TerminalNotifier, args.remediation).await?;
            match args.out {
                Some(path) => std::fs::write(&path, &bytes)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
    }

    Ok(())
}

fn remediations_client(endpoints: &EndpointArgs) -> Result<RemediationsHttpClient> {
    let mut client = RemediationsHttpClient::new(&endpoints.api_url)
        .context("invalid remediations base URL")?;
    if let Some(token) = &endpoints.token {
        client = client.with_token(token);
    }
    Ok(client)
}

fn inventory_client(endpoints: &EndpointArgs) -> Result<InventoryHttpClient> {
    let base = endpoints
        .inventory_url
        .as_deref()
        .unwrap_or(&endpoints.api_url);
    let mut client = InventoryHttpClient::new(base).context("invalid inventory base URL")?;
    if let Some(token) = &endpoints.token {
        client = client.with_token(token);
    }
    Ok(client)
}

fn print_table(systems: &[MergedSystem], connections: &ConnectionPayload) {
    println!("{:<38} {:<30} {:<8} CONNECTION", "ID", "NAME", "ISSUES");
    for system in systems {
        let name = system
            .display_name
            .as_deref()
            .or(system.hostname.as_deref())
            .unwrap_or("-");
        let issues = system
            .issue_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let connection = connections
            .records()
            .iter()
            .find(|record| record.system_ids.contains(&system.id))
            .map_or_else(|| "Not available".to_string(), connection_label);
        println!("{:<38} {name:<30} {issues:<8} {connection}", system.id.as_str());
    }
}
