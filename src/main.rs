use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use phishguard::analyzer::{HeuristicAnalyzer, ScanReport};
use phishguard::classifier::{self, Comparison, ContentClassifier};
use phishguard::config::PhishGuardConfig;
use phishguard::detection::CATALOGUE;
use phishguard::history::{JsonFileStore, ScanHistory};
use phishguard::input::ScanInput;
use phishguard::remote::{self, RemoteClassifier};
use phishguard::statistics::DashboardStats;
use phishguard::verdict::AnalysisOutput;
use std::io::Read;
use std::path::Path;
use std::process;

/// Flags that select something to scan.
const SCAN_INPUTS: [&str; 3] = ["text", "file", "image"];

fn build_cli() -> Command {
    Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based phishing risk scoring for text messages")
        .long_about(
            "PhishGuard scores a piece of text for phishing risk:\n\
             • Eight weighted detectors (urgency, credentials, links, spoofing, ...)\n\
             • SAFE / SUSPICIOUS / PHISHING verdict with human-readable reasons\n\
             • Optional remote model classification for text and screenshots\n\
             • Local scan history with dashboard statistics",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("phishguard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and print the effective settings")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging, including per-detector results")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to analyze")
                .conflicts_with_all(["file", "image"])
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Read the text to analyze from a file ('-' for stdin)")
                .conflicts_with("image")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("FILE")
                .help("Analyze a screenshot with the remote vision model")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("remote")
                .long("remote")
                .help("Use the remote model instead of the built-in heuristics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("compare")
                .long("compare")
                .help("Run the heuristics and the remote model side by side")
                .conflicts_with("remote")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-history")
                .long("no-history")
                .help("Do not record this scan in the history")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .help("Show the most recent scans")
                .conflicts_with_all(SCAN_INPUTS)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Show dashboard statistics for the scan history")
                .conflicts_with_all(SCAN_INPUTS)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats-reset")
                .long("stats-reset")
                .help("Clear the scan history and exit")
                .conflicts_with_all(SCAN_INPUTS)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-detectors")
                .long("list-detectors")
                .help("List the detectors with their weights")
                .action(ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("phishguard.yaml");

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&matches, &config).await {
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches, config: &PhishGuardConfig) -> anyhow::Result<()> {
    if matches.get_flag("test-config") {
        print_config(config)?;
        return Ok(());
    }

    if matches.get_flag("list-detectors") {
        list_detectors();
        return Ok(());
    }

    if matches.get_flag("stats-reset") {
        let mut history = open_history(config)?;
        history.clear()?;
        println!("✅ Scan history cleared");
        return Ok(());
    }

    if matches.get_flag("stats") || matches.get_flag("history") {
        let history = open_history(config)?;
        if matches.get_flag("stats") {
            print_stats(&DashboardStats::from_records(history.iter()));
        }
        if matches.get_flag("history") {
            print_history(&history, config.history.recent_limit);
        }
        return Ok(());
    }

    let json = matches.get_flag("json");
    let record_scan = config.history.enabled && !matches.get_flag("no-history");

    if let Some(image_path) = matches.get_one::<String>("image") {
        let classifier = RemoteClassifier::from_config(&config.remote)?;
        let output = match classifier.classify_image(Path::new(image_path)).await {
            Ok(output) => output,
            Err(e) => {
                log::error!("Image classification failed: {:#}", e);
                remote::degraded(e)
            }
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("🖼️  Image: {}", image_path);
            print_output("remote", &output);
        }
        if record_scan {
            save_scan(config, &format!("[image] {}", image_path), &output);
        }
        return Ok(());
    }

    let raw = match read_text(matches)? {
        Some(raw) => raw,
        None => anyhow::bail!("Nothing to analyze: use --text, --file or --image (see --help)"),
    };
    let input = ScanInput::parse(&raw, &config.input)?;
    let heuristic = HeuristicAnalyzer::new();

    let output = if matches.get_flag("compare") {
        let remote = RemoteClassifier::from_config(&config.remote)?;
        let comparison = classifier::compare(&heuristic, &remote, input.text()).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        } else {
            print_comparison(&comparison);
        }
        comparison.primary
    } else if matches.get_flag("remote") || config.remote.enabled {
        let remote = RemoteClassifier::from_config(&config.remote)?;
        let output = remote.classify(input.text()).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_output(remote.name(), &output);
        }
        output
    } else {
        let report = heuristic.explain(input.text());
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        report.output
    };

    log::info!(
        "Scan complete: {} (risk score {})",
        output.status,
        output.risk_score
    );

    if record_scan {
        save_scan(config, input.text(), &output);
    }

    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<PhishGuardConfig> {
    if Path::new(path).exists() {
        PhishGuardConfig::from_file(path)
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(PhishGuardConfig::default())
    }
}

fn generate_default_config(path: &str) {
    let config = PhishGuardConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Set the variable named in remote.api_key_env to enable remote analysis.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}

fn read_text(matches: &ArgMatches) -> anyhow::Result<Option<String>> {
    if let Some(text) = matches.get_one::<String>("text") {
        return Ok(Some(text.clone()));
    }

    match matches.get_one::<String>("file").map(String::as_str) {
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(Some(buffer))
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path))
            .map(Some),
        None => Ok(None),
    }
}

fn open_history(config: &PhishGuardConfig) -> anyhow::Result<ScanHistory<JsonFileStore>> {
    ScanHistory::open(
        JsonFileStore::new(&config.history.path),
        config.history.capacity,
    )
}

/// History is best effort: a failed save never fails the scan.
fn save_scan(config: &PhishGuardConfig, text: &str, output: &AnalysisOutput) {
    let saved = open_history(config).and_then(|mut history| {
        history.record(text, output, config.history.preview_chars)
    });
    match saved {
        Ok(record) => log::debug!("Saved scan {} to {}", record.id, config.history.path),
        Err(e) => log::warn!("Failed to save scan history: {:#}", e),
    }
}

fn print_config(config: &PhishGuardConfig) -> anyhow::Result<()> {
    println!("🔍 Testing configuration...");
    println!();
    config.validate()?;

    println!("Input: {} to {} characters", config.input.min_chars, config.input.max_chars);
    if config.history.enabled {
        println!(
            "History: {} (keeps {} scans)",
            config.history.path, config.history.capacity
        );
    } else {
        println!("History: disabled");
    }

    let key_present = std::env::var(&config.remote.api_key_env)
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false);
    println!(
        "Remote: {} via {} (model {}, key {} {})",
        if config.remote.enabled { "enabled" } else { "on demand" },
        config.remote.endpoint,
        config.remote.text_model,
        config.remote.api_key_env,
        if key_present { "set" } else { "missing" }
    );
    println!();
    println!("✅ Configuration is valid");
    Ok(())
}

fn list_detectors() {
    println!("🧩 Detectors (evaluated in this order):");
    println!("═══════════════════════════════════════");
    let mut total = 0;
    for (i, rule) in CATALOGUE.iter().enumerate() {
        let weight = rule.category.weight();
        total += weight;
        println!("  {}. {:<24} +{}", i + 1, rule.category.label(), weight);
    }
    println!();
    println!("Scores are capped at 100; SUSPICIOUS from 30, PHISHING from 60.");
    println!("Maximum raw score: {}", total);
}

fn print_output(classifier: &str, output: &AnalysisOutput) {
    println!("{} Status: {} ({})", output.status.icon(), output.status, classifier);
    println!("📊 Risk score: {}/100", output.risk_score);
    println!("📝 Reasons:");
    for reason in &output.reasons {
        println!("  • {}", reason);
    }
}

fn print_report(report: &ScanReport) {
    print_output("heuristic", &report.output);

    if !report.links.is_empty() {
        println!("🔗 Links:");
        for link in &report.links {
            let host = link.host.as_deref().unwrap_or("unparsed");
            let marker = if link.is_suspicious { " ⚠️ suspicious" } else { "" };
            println!("  • {} [{}]{}", truncate_string(&link.url, 60), host, marker);
        }
    }

    log::debug!("Detector breakdown:");
    for signal in &report.signals {
        log::debug!(
            "  {:<24} {}",
            signal.category.label(),
            if signal.triggered { "triggered" } else { "-" }
        );
    }
}

fn print_comparison(comparison: &Comparison) {
    println!("⚖️  Comparison");
    println!("═══════════════════════════════════════");
    print_output(&comparison.primary_name, &comparison.primary);
    println!();
    print_output(&comparison.secondary_name, &comparison.secondary);
    println!();
    if comparison.agree {
        println!("✅ Both classifiers agree");
    } else {
        println!("⚠️  Classifiers disagree");
    }
    println!("Score difference: {:+}", comparison.score_delta);
}

fn print_stats(stats: &DashboardStats) {
    println!("📊 PhishGuard Dashboard");
    println!("═══════════════════════════════════════");
    println!("  Total scans:     {}", stats.total_scans);
    println!("  ✅ Safe:          {} ({}%)", stats.safe, stats.safe_percent);
    println!(
        "  ⚠️  Suspicious:    {} ({}%)",
        stats.suspicious, stats.suspicious_percent
    );
    println!("  🚨 Phishing:      {} ({}%)", stats.phishing, stats.phishing_percent);
    println!("  Safety score:    {}%", stats.safety_score);
    println!("  Average risk:    {:.1}", stats.average_risk_score);
    if let Some(latest) = stats.latest_scan {
        println!("  Latest scan:     {}", latest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn print_history(history: &ScanHistory<JsonFileStore>, limit: usize) {
    if history.is_empty() {
        println!("No scans recorded yet");
        return;
    }

    println!(
        "🕘 Recent scans ({} of {})",
        limit.min(history.len()),
        history.len()
    );
    println!("═══════════════════════════════════════");
    for record in history.recent(limit) {
        println!(
            "  {} {} {:<10} {:>3}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.status.icon(),
            record.status,
            record.risk_score,
            truncate_string(&record.text, 50)
        );
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_views_reject_scan_inputs() {
        let inputs = [
            ["--text", "verify your password now"],
            ["--file", "-"],
            ["--image", "shot.png"],
        ];
        for view in ["--stats", "--history", "--stats-reset"] {
            for [flag, value] in inputs {
                let result = build_cli().try_get_matches_from(["phishguard", flag, value, view]);
                assert!(result.is_err(), "{} with {} should be rejected", view, flag);
            }
        }
    }

    #[test]
    fn test_scan_and_views_parse_alone() {
        let matches = build_cli()
            .try_get_matches_from(["phishguard", "--text", "hello there friend", "--json"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("text").map(String::as_str),
            Some("hello there friend")
        );

        let matches = build_cli()
            .try_get_matches_from(["phishguard", "--stats", "--history"])
            .unwrap();
        assert!(matches.get_flag("stats"));
        assert!(matches.get_flag("history"));
    }

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("ääääääääää", 6), "äää...");
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
