//! Breaking-change and downstream impact CLI
//!
//! Usage:
//!   impact-cli diff --before old.ts --after new.ts
//!   impact-cli impact --root . --file src/api.ts --names greet,User
//!   impact-cli check --root . --file src/api.ts --before old.ts [--fail-on-breaking]
//!
//! Logs go to stderr and are controlled by `RUST_LOG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use codegraph_impact::{
    CanonicalPath, ChangeAnalyzer, ChangeReport, CodegraphError, ImpactConfig, ImpactResolution,
    Preset, ResolutionStatus, SnapshotDiff,
};

#[derive(Parser)]
#[command(name = "impact-cli")]
#[command(about = "Classify TypeScript export changes and find affected downstream files", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset used when no configuration file is given
    /// (defaults to `CODEGRAPH_IMPACT_PRESET`, then balanced)
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff two versions of one module
    Diff {
        #[arg(long)]
        before: PathBuf,

        #[arg(long)]
        after: PathBuf,

        /// Path reported in the output (defaults to --after)
        #[arg(long)]
        path: Option<String>,

        /// Exit with status 2 when a breaking change is found
        #[arg(long)]
        fail_on_breaking: bool,
    },

    /// List files affected by a change to one module
    Impact {
        #[arg(long, default_value = ".")]
        root: PathBuf,

        #[arg(long)]
        file: PathBuf,

        /// Comma-separated export names to follow
        #[arg(long, value_delimiter = ',')]
        names: Option<Vec<String>>,
    },

    /// Diff a module against an earlier version, then resolve impact
    Check {
        #[arg(long, default_value = ".")]
        root: PathBuf,

        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        before: PathBuf,

        /// New contents (defaults to the file on disk)
        #[arg(long)]
        after: Option<PathBuf>,

        #[arg(long)]
        fail_on_breaking: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CodegraphError> {
    let config = load_config(cli.config.as_deref(), cli.preset.as_deref())?;
    let analyzer = ChangeAnalyzer::new(config);

    match cli.command {
        Commands::Diff {
            before,
            after,
            path,
            fail_on_breaking,
        } => {
            let before_src = fs::read_to_string(&before)?;
            let after_src = fs::read_to_string(&after)?;
            let display = path.unwrap_or_else(|| after.display().to_string());
            let diff = analyzer.diff(&display, &before_src, &after_src);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
                OutputFormat::Text => print_diff(&diff),
            }
            Ok(exit_for(fail_on_breaking && diff.has_breaking_changes()))
        }

        Commands::Impact { root, file, names } => {
            let graph = analyzer.scanner().scan(&root)?;
            let changed = CanonicalPath::new(root.join(&file));
            let resolution = analyzer.impact(&graph, &changed, names.as_deref());
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolution)?),
                OutputFormat::Text => print_impact(&resolution, &graph.root),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check {
            root,
            file,
            before,
            after,
            fail_on_breaking,
        } => {
            let changed = CanonicalPath::new(root.join(&file));
            let before_src = fs::read_to_string(&before)?;
            let after_src = fs::read_to_string(after.unwrap_or_else(|| changed.to_path_buf()))?;
            let graph = analyzer.scanner().scan(&root)?;
            let report = analyzer.analyze(&graph, &changed, &before_src, &after_src);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_report(&report, &graph.root),
            }
            Ok(exit_for(fail_on_breaking && report.is_breaking()))
        }
    }
}

/// `--config` file, else `--preset`, else the environment; env overrides apply to all
fn load_config(path: Option<&Path>, preset: Option<&str>) -> Result<ImpactConfig, CodegraphError> {
    let mut config = match (path, preset) {
        (Some(path), _) => ImpactConfig::from_yaml(path)?,
        (None, Some(preset)) => ImpactConfig::preset(preset.parse::<Preset>()?),
        (None, None) => return Ok(ImpactConfig::from_env()?),
    };
    config.apply_env_overrides(|key: &str| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn exit_for(breaking: bool) -> ExitCode {
    if breaking {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_diff(diff: &SnapshotDiff) {
    println!("{}", diff.file_path);
    if diff.is_empty() {
        println!("  no structural change");
        return;
    }
    for change in diff.consolidated_changes() {
        let marker = if change.is_breaking { "!" } else { " " };
        println!(
            "  {} [{}] {} {} ({}): {}",
            marker,
            change.severity.as_str(),
            change.change_type.as_str(),
            change.symbol,
            change.rule_id.as_str(),
            change.message
        );
    }
    for export in &diff.export_changes.removed {
        println!("  ! export removed: {}", export.name);
    }
    for export in &diff.export_changes.added {
        println!("    export added: {}", export.name);
    }
    for m in &diff.export_changes.modified {
        println!("  ! export modified: {}", m.before.name);
    }
    for hint in &diff.rename_hints {
        println!(
            "    possible rename: {} -> {} ({:.2})",
            hint.from, hint.to, hint.similarity
        );
    }
    if !diff.impacted_names.is_empty() {
        println!("  impacted: {}", diff.impacted_names.join(", "));
    }
}

/// `path` relative to the project root when inside it
fn display_path<'a>(path: &'a CanonicalPath, root: &CanonicalPath) -> &'a str {
    path.relative_to(root).unwrap_or_else(|| path.as_str())
}

fn print_impact(resolution: &ImpactResolution, root: &CanonicalPath) {
    let changed = display_path(&resolution.changed_file, root);
    let mut notes = Vec::new();
    if resolution.partial_graph {
        notes.push("partial graph");
    }
    if resolution.truncated {
        notes.push("truncated at depth cap");
    }
    let notes = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };

    match &resolution.status {
        ResolutionStatus::NotAttempted { reason } => {
            println!("{}: impact not attempted ({}){}", changed, reason, notes);
        }
        ResolutionStatus::Resolved => {
            println!(
                "{}: {} affected file(s){}",
                changed,
                resolution.results.len(),
                notes
            );
            for result in &resolution.results {
                println!(
                    "  {}:{}  {} depth={} evidence={}",
                    display_path(&result.file_path, root),
                    result.evidence.line,
                    result.relation.as_str(),
                    result.depth,
                    result.evidence.tier.as_str()
                );
            }
        }
    }
}

fn print_report(report: &ChangeReport, root: &CanonicalPath) {
    print_diff(&report.diff);
    println!();
    print_impact(&report.impact, root);
    println!();
    println!("{}", report.summary());
}
