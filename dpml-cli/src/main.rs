//! Command-line interface for DPML
//!
//! Parses a DPML prompt file and prints it in one of the output formats.
//!
//! Usage:
//!   dpml `<path>` [--format `<format>`] [--config `<file>`] [--whitespace `<policy>`] [--verbose]
//!   dpml --list-formats
//!
//! Configuration is layered: built-in defaults, then `--config`, then command line flags.
//! Logging goes to stderr and follows `RUST_LOG`; `--verbose` turns on debug output.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command};
use dpml_config::{DpmlConfig, Loader};
use dpml_parser::parsing::format_source_context;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("dpml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting DPML prompt files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the DPML file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: treeviz)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("whitespace")
                .long("whitespace")
                .help("Whitespace policy for text runs")
                .value_parser(["preserve", "drop-blank"]),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&config);
        return;
    }

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("A path is required unless listing formats");
        process::exit(2);
    };
    let format = matches
        .get_one::<String>("format")
        .cloned()
        .unwrap_or_else(|| config.output.format.clone());
    handle_execute_command(path, &format, &config);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<DpmlConfig, dpml_config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(whitespace) = matches.get_one::<String>("whitespace") {
        loader = loader.set_override("tokenizer.whitespace", whitespace.as_str())?;
    }
    loader.build()
}

/// Handle the execute command
fn handle_execute_command(path: &str, format: &str, config: &DpmlConfig) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        process::exit(1);
    });
    tracing::debug!(path, format, bytes = source.len(), "processing file");

    match transforms::execute_transform(&source, format, config) {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(span) = err.span() {
                eprintln!();
                eprint!("{}", format_source_context(&source, &span));
            }
            if let transforms::TransformError::Format(_) = err {
                eprintln!("\nAvailable formats:");
                for (name, _) in transforms::available_formats(config) {
                    eprintln!("  {}", name);
                }
            }
            process::exit(1);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(config: &DpmlConfig) {
    println!("Available output formats:\n");
    for (name, description) in transforms::available_formats(config) {
        println!("  {}", name);
        println!("    {}", description);
        println!();
    }
}
