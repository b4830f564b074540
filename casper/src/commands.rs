use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("casper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("casper")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .global(true)
                .help("Path to a JSON configuration file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .global(true)
                .help("SQLite database for learned memories (default: $CASPER_DB, else memory only)"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Autonomously scan the web from a set of seeds, skipping blocked domains, \
                and learn a summary of every page fetched.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A seed URL to scan (repeatable; default: configured seeds)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("How many levels to scan, counting the seeds (default: 2)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"disabled")
                        .required(false)
                        .help("Start with autonomous scanning switched off (nothing is fetched)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("learn")
                .about("Teach Casper something about a user")
                .arg(
                    arg!(-u --"user" <USER>)
                        .required(true)
                        .help("The user the memory belongs to"),
                )
                .arg(arg!(<TEXT>).required(true).help("What to remember (max 500 characters)")),
        )
        .subcommand(
            command!("memories")
                .about("List the most recent memories for a user")
                .arg(
                    arg!(-u --"user" <USER>)
                        .required(true)
                        .help("The user (or web:<host> for scanned pages)"),
                )
                .arg(
                    arg!(-n --"limit" <LIMIT>)
                        .required(false)
                        .help("Maximum number of memories to show")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print memories as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("status")
                .about("Show scanner enablement and storage status")
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print status as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
