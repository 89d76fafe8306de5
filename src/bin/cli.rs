// Summary Dedup CLI - Command-line interface for summary cleanup
//
// Usage: summary-dedup <command> [options]

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use summary_dedup::config::{get_preferences_path, read_settings_or_default};
use summary_dedup::{
    dedupe_summary_with_stats, format_time_window, map_variant_to_severity, parse_clock,
    write_settings, CleanupSettings, DedupeMode, SimilarityMetric, TimeFormat, TimeWindow,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to safely serialize JSON for output. Returns error JSON if serialization fails.
fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"JSON serialization failed: {}\"}}", e))
}

#[derive(Parser)]
#[command(
    name = "summary-dedup",
    version = VERSION,
    about = "Remove repeated sentences and bullets from AI-generated summaries",
    long_about = None
)]
struct Cli {
    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate a summary read from a file or stdin
    Clean {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
        /// Dedup mode: safe (consecutive only) or global
        #[arg(short, long)]
        mode: Option<String>,
        /// Similarity threshold in (0, 1]
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Similarity metric: levenshtein, jaro_winkler or sorensen_dice
        #[arg(long)]
        metric: Option<String>,
        /// Print removal counts to stderr
        #[arg(short, long)]
        stats: bool,
    },

    /// Resolve the display severity of a summary item
    Severity {
        /// Explicit severity from the API
        #[arg(short, long)]
        explicit: Option<String>,
        /// Category variant
        #[arg(short, long)]
        variant: Option<String>,
    },

    /// Format a time window
    Window {
        /// Window start (HH:MM, h:MM AM/PM or RFC 3339)
        #[arg(short, long)]
        start: Option<String>,
        /// Window end
        #[arg(short, long)]
        end: Option<String>,
        /// Render with a 12-hour clock
        #[arg(long)]
        twelve_hour: bool,
        /// Check whether this time falls inside the window
        #[arg(long)]
        at: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (mode, threshold, metric, time_format)
        key: String,
        /// Value to set
        value: String,
    },
    /// Restore default settings
    Reset,
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so cleaned text on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let result = match cli.command {
        Commands::Clean {
            file,
            mode,
            threshold,
            metric,
            stats,
        } => handle_clean(file, mode, threshold, metric, stats, cli.json),
        Commands::Severity { explicit, variant } => handle_severity(explicit, variant, cli.json),
        Commands::Window {
            start,
            end,
            twelve_hour,
            at,
        } => handle_window(start, end, twelve_hour, at, cli.json),
        Commands::Config { action } => handle_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

// ============================================================================
// Clean Handler
// ============================================================================

fn read_input(file: Option<PathBuf>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn handle_clean(
    file: Option<PathBuf>,
    mode: Option<String>,
    threshold: Option<f64>,
    metric: Option<String>,
    show_stats: bool,
    json: bool,
) -> Result<(), String> {
    let text = read_input(file)?;

    // Flags override saved settings; unknown mode/metric names fall back to defaults
    let mut options = read_settings_or_default().dedupe_options();
    if let Some(mode) = mode {
        options.mode = DedupeMode::from(mode);
    }
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }
    if let Some(metric) = metric {
        options.metric = SimilarityMetric::from(metric);
    }

    let (cleaned, stats) = dedupe_summary_with_stats(&text, &options);

    if json {
        println!(
            "{}",
            to_json(&serde_json::json!({
                "text": cleaned,
                "stats": stats,
                "options": {
                    "mode": options.mode,
                    "threshold": options.effective_threshold(),
                    "metric": options.metric,
                },
            }))
        );
    } else {
        print!("{}", cleaned);
        if !cleaned.is_empty() && !cleaned.ends_with('\n') {
            println!();
        }
    }

    if show_stats && !json {
        eprintln!(
            "{}",
            format!(
                "Removed {} of {} units across {} paragraph(s) ({} mode)",
                stats.units_removed, stats.units_in, stats.paragraphs, options.mode
            )
            .dimmed()
        );
    }

    Ok(())
}

// ============================================================================
// Severity / Window Handlers
// ============================================================================

fn handle_severity(
    explicit: Option<String>,
    variant: Option<String>,
    json: bool,
) -> Result<(), String> {
    let severity = map_variant_to_severity(explicit.as_deref(), variant.as_deref());

    if json {
        println!("{}", serde_json::json!({ "severity": severity }));
    } else {
        let label = match severity {
            summary_dedup::Severity::Auspicious => severity.as_str().green(),
            summary_dedup::Severity::Inauspicious => severity.as_str().red(),
            summary_dedup::Severity::Neutral => severity.as_str().normal(),
        };
        println!("{}", label);
    }

    Ok(())
}

fn handle_window(
    start: Option<String>,
    end: Option<String>,
    twelve_hour: bool,
    at: Option<String>,
    json: bool,
) -> Result<(), String> {
    let format = if twelve_hour {
        TimeFormat::TwelveHour
    } else {
        read_settings_or_default().time_format
    };

    let display = format_time_window(start.as_deref(), end.as_deref(), format)
        .ok_or("No usable start or end time")?;

    let contains = match at {
        Some(at) => {
            let t = parse_clock(&at).ok_or_else(|| format!("Invalid time: {}", at))?;
            let window = match (start.as_deref(), end.as_deref()) {
                (Some(s), Some(e)) => TimeWindow::parse(s, e),
                _ => None,
            }
            .ok_or("Both --start and --end are needed with --at")?;
            Some(window.contains(t))
        }
        None => None,
    };

    if json {
        println!(
            "{}",
            to_json(&serde_json::json!({
                "window": display,
                "contains": contains,
            }))
        );
    } else {
        println!("{}", display);
        match contains {
            Some(true) => println!("{} inside window", "✓".green()),
            Some(false) => println!("{} outside window", "✗".red()),
            None => {}
        }
    }

    Ok(())
}

// ============================================================================
// Config Handlers
// ============================================================================

fn handle_config(action: ConfigAction, json: bool) -> Result<(), String> {
    match action {
        ConfigAction::Show => {
            let settings = read_settings_or_default();
            let path = get_preferences_path().map_err(|e| e.to_string())?;

            if json {
                println!(
                    "{}",
                    to_json(&serde_json::json!({
                        "path": path.display().to_string(),
                        "settings": settings,
                    }))
                );
            } else {
                println!("{}", "Configuration".bold());
                println!();
                println!("  Settings file: {}", path.display().to_string().dimmed());
                println!();

                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["Key", "Value"]);
                table.add_row(vec!["mode".to_string(), settings.mode.to_string()]);
                table.add_row(vec!["threshold".to_string(), format!("{:.2}", settings.threshold)]);
                table.add_row(vec!["metric".to_string(), settings.metric.to_string()]);
                table.add_row(vec![
                    "time_format".to_string(),
                    match settings.time_format {
                        TimeFormat::TwentyFourHour => "24h".to_string(),
                        TimeFormat::TwelveHour => "12h".to_string(),
                    },
                ]);
                println!("{table}");
            }
        }

        ConfigAction::Set { key, value } => {
            let mut settings = read_settings_or_default();
            settings.set(&key, &value).map_err(|e| e.to_string())?;
            write_settings(&settings).map_err(|e| e.to_string())?;

            if json {
                println!("{}", serde_json::json!({ "updated": key, "value": value }));
            } else {
                println!("{} Set {} = {}", "✓".green(), key, value);
            }
        }

        ConfigAction::Reset => {
            write_settings(&CleanupSettings::default()).map_err(|e| e.to_string())?;

            if json {
                println!("{}", serde_json::json!({ "status": "reset" }));
            } else {
                println!("{} Settings restored to defaults", "✓".green());
            }
        }
    }

    Ok(())
}
