//! flowlint CLI - Integration-flow XML linter

use clap::{Parser, ValueEnum};
use colored::Colorize;
use flowlint::config::Config;
use flowlint::engine::LintEngine;
use flowlint::output;
use flowlint::quality_gate;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flowlint",
    version,
    about = "Integration-flow XML linter",
    long_about = "A static analyzer for integration-flow XML configuration: \
                  structural lint rules, technical metrics with A-E ratings, \
                  and quality gates for CI enforcement."
)]
struct Cli {
    /// Project directory or single XML file to scan
    path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Quality gate to evaluate after scanning
    #[arg(short = 'g', long)]
    quality_gate: Option<String>,

    /// Treat a quality-gate warning verdict as failure
    #[arg(long)]
    fail_on_warning: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// List available quality gates and exit
    #[arg(long)]
    list_gates: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Sarif,
    Csv,
    Html,
}

impl Format {
    fn as_str(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Json => "json",
            Format::Sarif => "sarif",
            Format::Csv => "csv",
            Format::Html => "html",
        }
    }
}

fn list_rules(engine: &LintEngine) {
    println!("{}", "Available rules:".bold());
    println!();
    for rule in engine.rules() {
        let severity = match rule.default_severity() {
            flowlint::Severity::Error => "error".red().to_string(),
            flowlint::Severity::Warning => "warning".yellow().to_string(),
            flowlint::Severity::Info => "info".blue().to_string(),
        };
        println!(
            "  {} [{}] ({})",
            rule.id().cyan(),
            severity,
            rule.category()
        );
        println!("      {}", rule.description());
    }
}

fn list_gates(config: &Config) {
    println!("{}", "Available quality gates:".bold());
    println!();
    let builtins = [
        flowlint::QualityGate::default_gate(),
        flowlint::QualityGate::strict(),
    ];
    for gate in builtins.iter().chain(config.quality_gates.iter()) {
        println!("  {}", gate.name.cyan());
        for condition in &gate.conditions {
            println!(
                "      {} when {} {} {}",
                match condition.status {
                    flowlint::quality_gate::ConditionStatus::Fail => "fail".red().to_string(),
                    flowlint::quality_gate::ConditionStatus::Warn => "warn".yellow().to_string(),
                },
                condition.metric,
                condition.operator,
                condition.threshold
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path).unwrap_or_else(|e| {
            eprintln!("{}: Failed to load config: {}", "error".red().bold(), e);
            std::process::exit(2);
        })
    } else {
        Config::load_default().unwrap_or_else(|e| {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        })
    };

    config.merge_cli(
        cli.disable.clone(),
        cli.select.clone(),
        cli.jobs,
        cli.quality_gate.clone(),
    );

    if cli.list_gates {
        list_gates(&config);
        return;
    }

    let engine = LintEngine::new(config.clone());

    if cli.list_rules {
        list_rules(&engine);
        return;
    }

    let Some(path) = &cli.path else {
        eprintln!("{}: No path specified", "error".red().bold());
        eprintln!();
        eprintln!("Usage: flowlint [OPTIONS] <PATH>");
        eprintln!();
        eprintln!("For more information, try '--help'");
        std::process::exit(2);
    };

    // Resolve the gate up front: an unknown gate name must fail before any
    // scanning happens
    let gate = match &config.gate {
        Some(name) => match config.resolve_gate(name) {
            Ok(gate) => Some(gate),
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                std::process::exit(2);
            }
        },
        None => None,
    };

    if let Some(jobs) = cli.jobs {
        if jobs > 0 {
            // Best effort; rayon refuses reconfiguration after first use
            let _ = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global();
        }
    }

    if cli.verbose {
        eprintln!("Scanning {}...", path.display());
    }

    let report = match engine.scan(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        }
    };

    let formatter = output::create(cli.format.as_str(), !cli.no_color)
        .expect("all CLI format variants have formatters");
    print!("{}", formatter.format(&report));

    let exit_code = match gate {
        Some(gate) => {
            let result = quality_gate::evaluate(&report, &gate);
            let styled = match result.status {
                flowlint::GateStatus::Passed => result.message.green().to_string(),
                flowlint::GateStatus::Warning => result.message.yellow().to_string(),
                flowlint::GateStatus::Failed => result.message.red().to_string(),
            };
            eprintln!("{}", styled);
            result.exit_code(cli.fail_on_warning)
        }
        // Without a gate the scan itself decides: errors fail the run
        None => {
            if report.error_count() > 0 {
                1
            } else {
                0
            }
        }
    };
    std::process::exit(exit_code);
}
