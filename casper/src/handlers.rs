use crate::config::{CasperConfig, DB_ENV_VAR, load_config, resolve_db_path};
use anyhow::{Context, Result, bail};
use casper_core::crawl::{ScanOptions, execute_scan, generate_scan_report};
use casper_core::{Learner, MemoryRecord, StoreError, open_store};
use casper_scanner::{EnablementStatus, ScanSwitch, Scanner};
use clap::ArgMatches;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use url::Url;

// Helper functions for scan handler

/// Load seed URLs from a hosts file or the `--url` arguments. An empty
/// result means "use the configured seeds".
pub fn load_urls_from_source(
    urls: &[Url],
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else {
        Ok(urls.iter().map(|u| u.as_str().to_string()).collect())
    }
}

/// Load and parse URLs from a file. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add https:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    let with_scheme = format!("https://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Loads the config file and applies `--db` / `$CASPER_DB`.
pub fn build_config(args: &ArgMatches) -> Result<CasperConfig> {
    let config_path = args.get_one::<PathBuf>("config");
    let mut config = load_config(config_path.map(|p| p.as_path()))?;
    let cli_db = args.get_one::<String>("db").map(|s| s.as_str());
    resolve_db_path(&mut config, cli_db, std::env::var(DB_ENV_VAR).ok());
    Ok(config)
}

pub async fn handle_scan(args: &ArgMatches, config: &CasperConfig, quiet: bool) -> Result<()> {
    let urls: Vec<Url> = args
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hosts_file = args.get_one::<PathBuf>("hosts-file");
    let seeds = load_urls_from_source(&urls, hosts_file).map_err(anyhow::Error::msg)?;
    let max_depth = args.get_one::<usize>("depth").copied();
    let format = args
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("text");

    let switch = ScanSwitch::with_state(config.autonomous);
    if args.get_flag("disabled") {
        switch.disable();
    }

    let learner = Arc::new(Learner::new(open_store(&config.store)));
    let backend = learner.store().backend();
    let scanner = Scanner::new(config.scanner.clone(), Arc::new(switch.clone()))
        .context("Failed to build scanner")?;

    if !quiet {
        let seed_count = if seeds.is_empty() {
            config.scanner.seeds.len()
        } else {
            seeds.len()
        };
        println!("\n👻 Scanning {} seed(s)", seed_count);
        println!("Max depth: {}", max_depth.unwrap_or(config.scanner.max_depth));
        println!("Links per page: {}", config.scanner.max_links_per_page);
        println!("Autonomous mode: {}", switch.status().status);
        println!("Store: {}\n", backend);
    }

    let summary = execute_scan(
        scanner,
        learner,
        ScanOptions {
            seeds,
            max_depth,
            show_progress_bars: !quiet,
        },
        None,
    )
    .await;

    let report = match format {
        "json" => serde_json::to_string_pretty(&summary).context("Failed to serialize report")?,
        _ => generate_scan_report(&summary),
    };

    if let Some(output) = args.get_one::<PathBuf>("output") {
        fs::write(output, &report)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        println!(
            "{} Report saved to {}",
            "✓".green().bold(),
            output.display().to_string().bright_white()
        );
    } else {
        print!("{}", report);
    }

    Ok(())
}

pub fn handle_learn(args: &ArgMatches, config: &CasperConfig) -> Result<()> {
    let user = args
        .get_one::<String>("user")
        .context("--user is required")?;
    let text = args.get_one::<String>("TEXT").context("TEXT is required")?;

    let learner = Learner::new(open_store(&config.store));
    match learner.learn(user, text) {
        Ok(record) => {
            println!(
                "{} Knowledge stored for {} (category: {})",
                "✓".green().bold(),
                user.bright_white(),
                record.category.cyan()
            );
            Ok(())
        }
        Err(StoreError::InvalidInput(reason)) => bail!("Invalid input: {}", reason),
        Err(e) => Err(e).context("Storage error"),
    }
}

pub fn handle_memories(args: &ArgMatches, config: &CasperConfig) -> Result<()> {
    let user = args
        .get_one::<String>("user")
        .context("--user is required")?;
    let limit = *args.get_one::<usize>("limit").unwrap_or(&10);

    let learner = Learner::new(open_store(&config.store));
    let records = learner.recall(user, limit);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", format_memories(user, &records));
    }
    Ok(())
}

pub fn format_memories(user: &str, records: &[MemoryRecord]) -> String {
    if records.is_empty() {
        return format!("No memories for {}\n", user);
    }

    let mut out = format!("{} memories for {}\n", records.len(), user);
    for record in records {
        out.push_str(&format!(
            "  [{}] ({}) {}\n",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.category,
            record.content
        ));
    }
    out
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub autonomous: EnablementStatus,
    pub backend: &'static str,
    pub users: usize,
    pub memories: usize,
}

pub fn status_report(config: &CasperConfig) -> StatusReport {
    let store = open_store(&config.store);
    let (users, memories) = store.counts().unwrap_or_else(|e| {
        warn!("Could not count memories: {}", e);
        (0, 0)
    });

    StatusReport {
        status: "online",
        autonomous: ScanSwitch::with_state(config.autonomous).status(),
        backend: store.backend(),
        users,
        memories,
    }
}

pub fn handle_status(args: &ArgMatches, config: &CasperConfig) -> Result<()> {
    let report = status_report(config);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mode = if report.autonomous.active {
        report.autonomous.status.green().bold()
    } else {
        report.autonomous.status.yellow().bold()
    };
    println!("Status: {}", report.status.green());
    println!("Autonomous mode: {}", mode);
    println!("Store: {}", report.backend.bright_white());
    println!("Users: {}", report.users.to_string().cyan());
    println!("Memories: {}", report.memories.to_string().cyan());
    Ok(())
}
