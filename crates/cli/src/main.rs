//! Lightspeed CLI
//!
//! Command-line entry point for the Lightspeed alert responder and the usage
//! patterns built around it: one-shot queries, automated alert response,
//! continuous health monitoring, pod fleet analysis, capacity reports, and an
//! Alertmanager webhook receiver.

mod output;
mod server;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lightspeed::config::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
use lightspeed::fleet::demo_fleet;
use lightspeed::{
    Alert, AlertResponder, AlertmanagerAlert, AlertmanagerPayload, Assistant, AssistantClient,
    AssistantConfig, CapacityPlanner, FleetAnalyzer, HealthMonitor, PodSummary, QueryContext,
    ResponderConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use output::OutputFormat;

/// Lightspeed alert responder and cluster assistant tooling
#[derive(Parser)]
#[command(name = "lightspeed")]
#[command(about = "Query OpenShift Lightspeed and route alerts by answer confidence")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Lightspeed server URL
    #[arg(long, env = "OLS_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    server: String,

    /// Namespace for queries
    #[arg(long, env = "NAMESPACE", default_value = "self-healing-platform", global = true)]
    namespace: String,

    /// Request timeout in seconds
    #[arg(long, env = "OLS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Output format (json or text)
    #[arg(long, value_enum, default_value = "json", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant a question
    Query {
        /// Natural language question
        question: String,
    },
    /// Get recommendations for a kind of issue
    Recommend {
        /// Issue type (e.g. high_resource_usage, pod_crash)
        issue_type: String,

        /// Pod the issue concerns
        #[arg(long)]
        pod: Option<String>,

        /// CPU usage in percent
        #[arg(long)]
        cpu: Option<f64>,

        /// Memory usage in percent
        #[arg(long)]
        memory: Option<f64>,

        /// Container restart count
        #[arg(long)]
        restarts: Option<u32>,
    },
    /// Decide between auto-remediation and escalation for an alert
    Alert {
        /// Alertmanager alert or webhook payload (JSON); a sample alert is used if omitted
        #[arg(long)]
        file: Option<PathBuf>,

        /// Confidence an answer must exceed to auto-remediate
        #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.8)]
        threshold: f64,
    },
    /// Continuously check namespace health
    Monitor {
        /// Check interval in seconds
        #[arg(
            long,
            env = "CHECK_INTERVAL",
            default_value_t = 60,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval: u64,
    },
    /// Analyze every pod in the namespace
    Fleet {
        /// JSON file with `[{"name", "status"}]`; a demo fleet is used if omitted
        #[arg(long)]
        pods: Option<PathBuf>,
    },
    /// Generate a capacity planning report
    Capacity {
        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Receive Alertmanager webhooks and answer with decisions
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Confidence an answer must exceed to auto-remediate
        #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.8)]
        threshold: f64,
    },
}

/// A single alert or a whole webhook payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum AlertInput {
    Payload(AlertmanagerPayload),
    Single(AlertmanagerAlert),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = AssistantConfig::new(cli.server.clone()).with_timeout(cli.timeout);
    let client =
        Arc::new(AssistantClient::new(config).context("Failed to create Lightspeed client")?);

    match cli.command {
        Commands::Query { ref question } => {
            let response = client
                .query(question, &QueryContext::for_namespace(cli.namespace.clone()))
                .await;
            output::print_response(cli.format, &response);
        }
        Commands::Recommend {
            ref issue_type,
            ref pod,
            cpu,
            memory,
            restarts,
        } => {
            let mut context = QueryContext::for_namespace(cli.namespace.clone());
            context.pod.clone_from(pod);
            context.cpu_usage = cpu;
            context.memory_usage = memory;
            context.restart_count = restarts;

            let response = client.get_recommendations(issue_type, &context).await;
            output::print_response(cli.format, &response);
        }
        Commands::Alert {
            ref file,
            threshold,
        } => {
            run_alert(&cli, client, file.as_deref(), threshold).await?;
        }
        Commands::Monitor { interval } => {
            run_monitor(&cli, client, interval).await?;
        }
        Commands::Fleet { ref pods } => {
            let pods = match pods {
                Some(path) => read_json::<Vec<PodSummary>>(path)?,
                None => demo_fleet(),
            };
            let report = FleetAnalyzer::new(client)
                .analyze(&cli.namespace, &pods)
                .await
                .context("Fleet analysis failed")?;
            output::print_fleet(cli.format, &report);
        }
        Commands::Capacity {
            output: ref report_path,
        } => {
            let report = CapacityPlanner::new(client, cli.server.clone())
                .generate(&cli.namespace)
                .await;
            let json = output::to_json(&report);

            if let Some(path) = report_path {
                std::fs::write(path, &json)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("{} {}", "✅ Report saved to:".green(), path.display());
                output::print_capacity_summary(&report);
            } else {
                println!("{json}");
            }
        }
        Commands::Serve {
            ref host,
            port,
            threshold,
        } => {
            let responder = build_responder(client, threshold)?;
            run_server(host, port, responder).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lightspeed=debug,tower_http=debug"
    } else {
        "lightspeed=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_responder(client: Arc<AssistantClient>, threshold: f64) -> Result<AlertResponder> {
    let config = ResponderConfig::default().with_threshold(threshold);
    config.validate()?;
    Ok(AlertResponder::new(client, &config))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn sample_alert() -> Alert {
    Alert::new("HighPodCPU")
        .with_namespace("self-healing-platform")
        .with_severity("warning")
        .with_description(
            "Pod coordination-engine-0 in namespace self-healing-platform is using 85% CPU",
        )
}

async fn run_alert(
    cli: &Cli,
    client: Arc<AssistantClient>,
    file: Option<&Path>,
    threshold: f64,
) -> Result<()> {
    let responder = build_responder(client, threshold)?;

    let alerts: Vec<Alert> = match file {
        Some(path) => match read_json::<AlertInput>(path)? {
            AlertInput::Payload(payload) => payload
                .alerts
                .iter()
                .filter(|a| a.is_firing())
                .map(Alert::from)
                .collect(),
            AlertInput::Single(alert) => vec![Alert::from(&alert)],
        },
        None => vec![sample_alert()],
    };

    if alerts.is_empty() {
        bail!("No firing alerts to process");
    }

    if cli.format == OutputFormat::Text {
        output::banner("Automated Alert Response Pattern");
        println!("\nLightspeed Server: {}", cli.server);
        println!("Threshold: {threshold}");
        println!("\nProcessing {} alert(s) with Lightspeed...", alerts.len());
    }

    for decision in responder.respond_all(&alerts).await {
        output::print_decision(cli.format, &decision);
    }

    Ok(())
}

async fn run_monitor(cli: &Cli, client: Arc<AssistantClient>, interval: u64) -> Result<()> {
    let period = Duration::from_secs(interval);
    let monitor = HealthMonitor::new(client, cli.namespace.clone(), period)?;

    output::banner("OpenShift Lightspeed Cluster Health Monitor");
    println!("Server URL: {}", cli.server);
    println!("Namespace: {}", cli.namespace);
    println!("Check interval: {interval} seconds");
    println!("{}", output::rule());
    println!("\nPress Ctrl+C to stop monitoring\n");

    println!("Testing connection to Lightspeed...");
    if let Err(e) = monitor.probe().await {
        println!("{} {e}", "❌ Failed to connect:".red());
        println!("\nTroubleshooting:");
        println!("  1. Verify Lightspeed server is running:");
        println!("     oc get pods -n openshift-lightspeed");
        println!("  2. Check service endpoint:");
        println!("     oc get svc -n openshift-lightspeed");
        println!("  3. If running outside cluster, use port-forward:");
        println!("     oc port-forward -n openshift-lightspeed svc/ols-server 8000:8000");
        bail!("Lightspeed is not reachable at {}", cli.server);
    }
    println!("{}\n", "✅ Connected successfully".green());

    let stats = monitor
        .run(shutdown_signal(), output::print_health_check)
        .await;

    println!("\n\n{}", output::rule());
    println!("Monitoring stopped by user");
    println!("{}", output::rule());
    println!("Total checks: {}", stats.checks);
    output::print_stats(&stats);
    println!("{}", output::rule());

    Ok(())
}

async fn run_server(host: &str, port: u16, responder: AlertResponder) -> Result<()> {
    let state = Arc::new(server::ServerState { responder });
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!("Listening for Alertmanager webhooks on {host}:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
