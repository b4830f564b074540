use casper::handlers::{build_config, handle_learn, handle_memories, handle_scan, handle_status};
use casper_core::print_banner;
use colored::Colorize;
use commands::command_argument_builder;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(quiet);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let Some((_, primary_command)) = chosen_command.subcommand() else {
        // No subcommand provided, just show the banner
        return;
    };

    let config = match build_config(primary_command) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match chosen_command.subcommand() {
        Some(("scan", primary_command)) => handle_scan(primary_command, &config, quiet).await,
        Some(("learn", primary_command)) => handle_learn(primary_command, &config),
        Some(("memories", primary_command)) => handle_memories(primary_command, &config),
        Some(("status", primary_command)) => handle_status(primary_command, &config),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
