//! pulseboard-report - period-over-period channel insights CLI
//!
//! Reads metric snapshots exported as JSON and prints the weekly or monthly
//! insight report, or correlates two metric columns of a row-level export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use pulseboard_core::analytics::correlation::{correlate_rows, CorrelationResult, CorrelationRow};
use pulseboard_core::analytics::{metrics_registry, ChannelAggregate, InsightEngine, InsightReport};
use pulseboard_core::format::{format_change, format_metric};
use pulseboard_core::{Config, MetricMap, MetricSnapshot, PeriodType, PostRecord};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "pulseboard-report")]
#[command(about = "Pulseboard - channel insight reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the insight report for one period
    Insights(InsightsArgs),
    /// Correlate two metric columns of a row-level export
    Correlate(CorrelateArgs),
    /// List registered metrics
    Metrics {
        /// Only metrics that can appear as highlights
        #[arg(long)]
        highlightable: bool,

        /// Export format (json = JSON)
        #[arg(long)]
        export: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct InsightsArgs {
    /// JSON file containing an array of metric snapshots
    #[arg(long)]
    snapshots: PathBuf,

    /// JSON file containing an array of posts (for top posts)
    #[arg(long)]
    posts: Option<PathBuf>,

    /// Anchor date inside the period (format: YYYY-MM-DD, default: today)
    #[arg(long)]
    anchor: Option<NaiveDate>,

    /// Period type: weekly or monthly
    #[arg(long, default_value = "weekly", value_parser = parse_period)]
    period: PeriodType,

    /// IANA timezone for period boundaries (overrides config)
    #[arg(long)]
    timezone: Option<String>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

#[derive(clap::Args, Debug)]
struct CorrelateArgs {
    /// JSON file containing an array of metric rows
    #[arg(long)]
    rows: PathBuf,

    /// Metric key for the x axis
    #[arg(long)]
    x: String,

    /// Metric key for the y axis
    #[arg(long)]
    y: String,

    /// Export format (json = JSON)
    #[arg(long)]
    export: Option<String>,
}

fn parse_period(value: &str) -> std::result::Result<PeriodType, String> {
    value.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _log_guard = pulseboard_core::logging::init(&config.logging).ok();

    match cli.command {
        Command::Insights(args) => {
            if let Some(timezone) = &args.timezone {
                config.insights.timezone = Some(timezone.clone());
            }
            run_insights(&config, &args)
        }
        Command::Correlate(args) => run_correlate(&args),
        Command::Metrics {
            highlightable,
            export,
        } => run_metrics(highlightable, export.as_deref()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

// ============================================
// insights
// ============================================

fn run_insights(config: &Config, args: &InsightsArgs) -> Result<()> {
    let engine = InsightEngine::new(&config.insights).context("invalid insights configuration")?;

    let snapshots: Vec<MetricSnapshot> = read_json(&args.snapshots)?;
    let posts: Vec<PostRecord> = match &args.posts {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let anchor = args
        .anchor
        .unwrap_or_else(|| Utc::now().with_timezone(&engine.timezone()).date_naive());

    tracing::info!(
        snapshots = snapshots.len(),
        posts = posts.len(),
        anchor = %anchor,
        period = %args.period,
        "Building insight report"
    );

    let report = engine
        .generate_for(anchor, args.period, &snapshots, &posts)
        .context("failed to generate insight report")?;

    match args.export.as_deref() {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        Some("md") => print_markdown(&report),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&report),
    }

    Ok(())
}

/// Registered metrics in registry order, then unregistered keys.
fn ordered_keys(map: &MetricMap) -> Vec<&str> {
    let mut keys: Vec<&str> = metrics_registry::descriptors()
        .map(|m| m.key)
        .filter(|key| map.contains_key(*key))
        .collect();
    keys.extend(
        map.keys()
            .map(String::as_str)
            .filter(|key| metrics_registry::descriptor(key).is_none()),
    );
    keys
}

fn metric_label(key: &str) -> &str {
    metrics_registry::label(key).unwrap_or(key)
}

fn value_of(map: &MetricMap, key: &str) -> Option<f64> {
    map.get(key).copied().flatten()
}

fn print_terminal(report: &InsightReport) {
    let title = format!("{} REPORT: {}", report.period.period_type, report.period.display_name());

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if report.overview.is_empty() && report.previous.is_empty() {
        println!("  No snapshots found for this period.");
        println!();
        return;
    }

    println!("OVERVIEW");
    for key in ordered_keys(&report.overview) {
        let current = value_of(&report.overview, key);
        let previous = value_of(&report.previous, key);
        println!(
            "   {:<16} {:>10}  (prev {:>10}, {})",
            metric_label(key),
            format_metric(current),
            format_metric(previous),
            format_change(pulseboard_core::analytics::percent_change(current, previous))
        );
    }
    println!();

    if !report.highlights.is_empty() {
        println!("HIGHLIGHTS");
        for (i, highlight) in report.highlights.iter().enumerate() {
            println!(
                "   {}. {:<12} {:<16} {:>8}  [{}]",
                i + 1,
                highlight.channel.label(),
                highlight.metric,
                format_change(Some(highlight.change)),
                highlight.severity.as_str()
            );
        }
        println!();
    }

    print_terminal_channels("SNS CHANNELS", &report.sns.channels);
    print_terminal_channels("STORE CHANNELS", &report.store.channels);

    let traffic = &report.store.traffic;
    if !traffic.current.is_empty() {
        println!("SITE TRAFFIC");
        for key in ordered_keys(&traffic.current) {
            println!(
                "   {:<16} {:>10}  {}",
                metric_label(key),
                format_metric(value_of(&traffic.current, key)),
                format_change(value_of(&traffic.change, key))
            );
        }
        println!();
    }

    if !report.sns.top_posts.is_empty() {
        println!("TOP POSTS");
        for (i, post) in report.sns.top_posts.iter().enumerate() {
            println!(
                "   {}. [{}] {} ({} engagements)",
                i + 1,
                post.channel.label(),
                post.title,
                format_metric(Some(post.engagement))
            );
        }
        println!();
    }
}

fn print_terminal_channels(heading: &str, channels: &[ChannelAggregate]) {
    if channels.is_empty() {
        return;
    }
    println!("{}", heading);
    for channel in channels {
        println!("   {} ({})", channel.channel_name, channel.channel.label());
        for key in ordered_keys(&channel.current) {
            println!(
                "      {:<16} {:>10}  {}",
                metric_label(key),
                format_metric(value_of(&channel.current, key)),
                format_change(value_of(&channel.change, key))
            );
        }
    }
    println!();
}

fn print_markdown(report: &InsightReport) {
    println!(
        "# {} Report: {}",
        report.period.period_type,
        report.period.display_name()
    );
    println!();

    println!("## Overview");
    println!();
    println!("| Metric | Current | Previous | Change |");
    println!("|--------|---------|----------|--------|");
    for key in ordered_keys(&report.overview) {
        let current = value_of(&report.overview, key);
        let previous = value_of(&report.previous, key);
        println!(
            "| {} | {} | {} | {} |",
            metric_label(key),
            format_metric(current),
            format_metric(previous),
            format_change(pulseboard_core::analytics::percent_change(current, previous))
        );
    }
    println!();

    if !report.highlights.is_empty() {
        println!("## Highlights");
        println!();
        for highlight in &report.highlights {
            println!(
                "- **{}** {}: {} ({})",
                highlight.channel.label(),
                highlight.metric,
                format_change(Some(highlight.change)),
                highlight.severity.as_str()
            );
        }
        println!();
    }

    for (heading, channels) in [
        ("SNS Channels", &report.sns.channels),
        ("Store Channels", &report.store.channels),
    ] {
        if channels.is_empty() {
            continue;
        }
        println!("## {}", heading);
        println!();
        println!("| Channel | Metric | Current | Previous | Change |");
        println!("|---------|--------|---------|----------|--------|");
        for channel in channels {
            for key in ordered_keys(&channel.current) {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    channel.channel_name,
                    metric_label(key),
                    format_metric(value_of(&channel.current, key)),
                    format_metric(value_of(&channel.previous, key)),
                    format_change(value_of(&channel.change, key))
                );
            }
        }
        println!();
    }

    if !report.sns.top_posts.is_empty() {
        println!("## Top Posts");
        println!();
        for (i, post) in report.sns.top_posts.iter().enumerate() {
            match &post.url {
                Some(url) => println!(
                    "{}. [{}]({}) - {} - {} engagements",
                    i + 1,
                    post.title,
                    url,
                    post.channel.label(),
                    format_metric(Some(post.engagement))
                ),
                None => println!(
                    "{}. {} - {} - {} engagements",
                    i + 1,
                    post.title,
                    post.channel.label(),
                    format_metric(Some(post.engagement))
                ),
            }
        }
        println!();
    }

    println!("---");
    println!("*Generated by pulseboard-report*");
}

// ============================================
// correlate
// ============================================

fn run_correlate(args: &CorrelateArgs) -> Result<()> {
    let rows: Vec<CorrelationRow> = read_json(&args.rows)?;
    let result = correlate_rows(&rows, &args.x, &args.y);

    match args.export.as_deref() {
        Some("json") => println!("{}", serde_json::to_string_pretty(&result)?),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
        None => print_correlation(args, &result),
    }
    Ok(())
}

fn print_correlation(args: &CorrelateArgs, result: &CorrelationResult) {
    println!("{} vs {}", metric_label(&args.x), metric_label(&args.y));
    println!("   Points:      {}", result.n);
    println!("   r:           {:.4}", result.r);
    println!("   r²:          {:.4}", result.r_squared);
    println!(
        "   Regression:  y = {:.4}x {} {:.4}",
        result.slope,
        if result.intercept < 0.0 { "-" } else { "+" },
        result.intercept.abs()
    );
    println!("   Reading:     {}", result.interpretation);
}

// ============================================
// metrics
// ============================================

fn run_metrics(highlightable: bool, export: Option<&str>) -> Result<()> {
    let rows = if highlightable {
        metrics_registry::highlightable_metrics()
    } else {
        metrics_registry::list_metrics()
    };

    match export {
        Some("json") => println!("{}", serde_json::to_string_pretty(&rows)?),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
        None => {
            println!(
                "{:<18} {:<16} {:<8} {:<10} SYNONYMS",
                "KEY", "LABEL", "REDUCER", "POLARITY"
            );
            for row in &rows {
                println!(
                    "{:<18} {:<16} {:<8} {:<10} {}",
                    row.key,
                    row.label.unwrap_or("-"),
                    row.reducer.as_str(),
                    row.polarity.as_str(),
                    row.synonyms.join(", ")
                );
            }
        }
    }
    Ok(())
}
