//! Console rendering for command results.

use colored::Colorize;
use lightspeed::fleet::FleetSummary;
use lightspeed::{
    AssistantResponse, CapacityReport, FleetReport, HealthCheck, HealthStats,
    RemediationDecision,
};
use serde::Serialize;

const RULE_WIDTH: usize = 60;

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner(title: &str) {
    println!("{}", rule());
    println!("{}", title.bold());
    println!("{}", rule());
}

/// Pretty JSON, falling back to an `{"error": ..}` object if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}

pub fn print_response(format: OutputFormat, response: &AssistantResponse) {
    if format == OutputFormat::Json {
        println!("{}", to_json(response));
        return;
    }

    match response {
        AssistantResponse::Failure { error_message } => {
            println!("{} {error_message}", "Error:".red().bold());
        }
        AssistantResponse::Success(payload) => {
            println!(
                "{} {}",
                "Answer:".bold(),
                payload.answer.as_deref().unwrap_or("No answer provided")
            );
            if let Some(confidence) = payload.confidence {
                println!("{} {}", "Confidence:".bold(), percent(confidence));
            }
            print_list("Recommendations", payload.recommendations.as_deref());
            print_list("Sources", payload.sources.as_deref());
        }
    }
}

fn print_list(title: &str, items: Option<&[String]>) {
    let Some(items) = items.filter(|i| !i.is_empty()) else {
        return;
    };
    println!("{}", format!("{title}:").bold());
    for item in items {
        println!("  - {item}");
    }
}

pub fn print_decision(format: OutputFormat, decision: &RemediationDecision) {
    if format == OutputFormat::Json {
        println!("{}", to_json(decision));
        return;
    }

    println!("{}", rule());
    println!("{} {}", "Alert:".bold(), decision.alert_name());
    match decision {
        RemediationDecision::AutoRemediate {
            confidence,
            analysis,
            recommendations,
            ..
        } => {
            println!("{}", "✅ Action: AUTO-REMEDIATE (High confidence)".green().bold());
            println!("   Confidence: {}", percent(*confidence));
            println!("   Analysis: {analysis}");
            for rec in recommendations {
                println!("   - {rec}");
            }
        }
        RemediationDecision::Escalate {
            confidence, reason, ..
        } => {
            println!(
                "{}",
                "⚠️  Action: ESCALATE TO HUMAN (Low confidence)".yellow().bold()
            );
            println!("   Confidence: {}", percent(*confidence));
            println!("   Reason: {reason}");
        }
        RemediationDecision::Error { message, .. } => {
            println!("{}", "❌ Action: ERROR".red().bold());
            println!("   {message}");
        }
    }
}

pub fn print_health_check(check: &HealthCheck, stats: &HealthStats) {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("\n[{now}] Checking cluster health...");

    match check {
        HealthCheck::Healthy { summary } => {
            println!("  {}", "✅ All systems healthy".green());
            println!("     {summary}");
        }
        HealthCheck::Issues { summary } => {
            println!("  {}", "⚠️  Potential issues detected:".yellow());
            println!("     {summary}");
        }
        HealthCheck::Error { message } => {
            println!("  {} {message}", "⚠️  Error:".red());
        }
    }

    if stats.should_report() {
        println!("\n--- Statistics after {} checks ---", stats.checks);
        print_stats(stats);
        println!("{}\n", "-".repeat(40));
    }
}

pub fn print_stats(stats: &HealthStats) {
    println!("Healthy checks: {}", stats.healthy());
    println!("Issues detected: {}", stats.issues);
    println!("Success rate: {:.1}%", stats.success_rate());
}

pub fn print_fleet(format: OutputFormat, report: &FleetReport) {
    let summary = report.summary();

    if format == OutputFormat::Json {
        #[derive(Serialize)]
        struct FleetOutput<'a> {
            #[serde(flatten)]
            report: &'a FleetReport,
            summary: FleetSummary,
        }
        println!("{}", to_json(&FleetOutput { report, summary }));
        return;
    }

    banner("Analysis Results:");
    println!(
        "{:<40} {:<18} {:>10}  {}",
        "POD".bold(),
        "STATUS".bold(),
        "CONFIDENCE".bold(),
        "ANALYSIS".bold()
    );
    for row in &report.pods {
        let status = if row.status == "Running" {
            row.status.green()
        } else {
            row.status.red()
        };
        println!(
            "{:<40} {:<18} {:>10}  {}",
            row.pod,
            status,
            percent(row.confidence),
            row.analysis
        );
    }

    banner("Summary:");
    println!("Total pods analyzed: {}", summary.total);
    println!("Healthy pods: {}", summary.healthy);
    println!("Problematic pods: {}", summary.problematic);
    println!("Average confidence: {}", percent(summary.average_confidence));
    println!("{}", rule());
}

pub fn print_capacity_summary(report: &CapacityReport) {
    banner("Report Summary:");
    println!("Generated: {}", report.generated_at.to_rfc3339());
    println!("Namespace: {}", report.namespace);
    println!(
        "\nCurrent Usage Confidence: {}",
        percent(report.current_usage.confidence)
    );
    println!("Predictions Generated: {}", report.predictions.len());
    println!("{}", rule());
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
