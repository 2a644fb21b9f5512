//! Career Dashboard - Entry Point
//!
//! `browse` (the default) runs the interactive terminal page. The other
//! subcommands are non-interactive: a meter/timeline summary for a filter,
//! the dataset integrity pass, and an SVG export of the ambient background.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use career_dashboard::core::calendar::{format_duration, YearMonth};
use career_dashboard::core::config::AppConfig;
use career_dashboard::core::error::Result;
use career_dashboard::core::types::{BranchId, GroupId, SkillId};
use career_dashboard::data::loader::Dataset;
use career_dashboard::data::validation::validate;
use career_dashboard::skills::aggregate::{AggregationView, Aggregator, LevelMeters};
use career_dashboard::skills::display::{meter_percent, result_summary, MeterLabel};
use career_dashboard::skills::selection::FilterSelection;
use career_dashboard::ui::{terminal, timeline_entries, BlobFrame, Fragment, Session, TimelineEntry};

#[derive(Parser, Debug)]
#[command(
    name = "career-dashboard",
    about = "Career portfolio in the terminal: skill taxonomy meters, filtered timeline, project drawer"
)]
struct Args {
    /// Config file (TOML); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with experiences.toml, taxonomy.toml and profile.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Render the background once and disable auto-advance
    #[arg(long, global = true)]
    reduced_motion: bool,

    /// Open a project drawer at start, e.g. `--open '#boring-business'`
    #[arg(long)]
    open: Option<String>,

    /// Tracing filter directive (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Interactive terminal page (default)
    Browse,
    /// Print meters and the filtered timeline for a selection
    Summary {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, requires = "branch")]
        group: Option<String>,
        #[arg(long, requires = "group")]
        skill: Option<String>,
        #[arg(long, requires = "skill")]
        tool: Option<String>,
    },
    /// Run the dataset integrity pass
    Validate {
        /// Exit non-zero when any finding is reported
        #[arg(long)]
        strict: bool,
    },
    /// Write one background frame as SVG to stdout
    Background {
        #[arg(long, default_value_t = 0)]
        at_ms: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

// === LOGGING ===

/// In-memory log sink while the terminal page owns the screen
#[derive(Clone, Default)]
struct DeferredLogs(Arc<Mutex<Vec<u8>>>);

impl Write for DeferredLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut logs = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?;
        logs.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl DeferredLogs {
    fn drain_to_stderr(&self) {
        if let Ok(mut logs) = self.0.lock() {
            if !logs.is_empty() {
                let _ = io::stderr().write_all(&logs);
                logs.clear();
            }
        }
    }
}

/// Install the subscriber; returns the deferred sink when one is used
fn init_tracing(config: &AppConfig, interactive: bool) -> Result<Option<DeferredLogs>> {
    let directive = if interactive && config.log_file.is_none() {
        "warn"
    } else {
        config.log_filter.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if let Some(path) = &config.log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
        return Ok(None);
    }

    if interactive {
        let logs = DeferredLogs::default();
        let sink = logs.clone();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .init();
        return Ok(Some(logs));
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(None)
}

// === CONFIG ===

fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if args.reduced_motion {
        config.reduced_motion = true;
    }
    if let Some(filter) = &args.log_filter {
        config.log_filter = filter.clone();
    }
    if let Some(path) = &args.log_file {
        config.log_file = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    match &config.data_dir {
        Some(dir) => Dataset::load_dir(dir),
        None => Dataset::bundled(),
    }
}

// === COMMANDS ===

fn browse(dataset: &Dataset, config: &AppConfig, open: Option<&str>) -> Result<()> {
    let report = validate(dataset, YearMonth::today());
    report.log();

    let mut session = Session::new(dataset, config);
    if let Some(open) = open {
        let fragment = Fragment::parse(open);
        if let Some(Err(err)) = fragment.id().map(|id| dataset.require(id)) {
            tracing::warn!(error = %err, "--open does not name an experience record");
        }
        session.set_fragment(fragment);
    }
    terminal::run(&mut session, config)
}

#[derive(Serialize)]
struct Summary<'a> {
    as_of: String,
    view: &'a AggregationView,
    timeline: Vec<TimelineEntry>,
}

fn print_level(out: &mut impl Write, title: &str, level: &LevelMeters) -> io::Result<()> {
    writeln!(out, "{title}")?;
    for meter in &level.meters {
        let marker = if meter.selected { "●" } else { " " };
        let row = MeterLabel::new(meter.label.as_str(), meter.total_months, meter.fill());
        writeln!(
            out,
            "{marker} {:<32} {} {:>3}% {:>7}  ({} records)",
            row.label,
            row.bar(20),
            meter_percent(meter.total_months, meter.max_months_among_siblings),
            row.duration,
            meter.matches.len()
        )?;
    }
    writeln!(out)
}

fn summary(
    dataset: &Dataset,
    format: Format,
    branch: Option<String>,
    group: Option<String>,
    skill: Option<String>,
    tool: Option<String>,
) -> Result<()> {
    let mut selection = FilterSelection::new();
    if let Some(branch) = branch {
        selection.set_branch(BranchId::new(branch));
    }
    if let Some(group) = group {
        selection.set_group(GroupId::new(group));
    }
    if let Some(skill) = skill {
        selection.set_skill(SkillId::new(skill));
    }
    if let Some(tool) = tool {
        selection.set_tool(tool);
    }

    let today = YearMonth::today();
    let view = Aggregator::new(dataset, today).view(&selection)?;
    let timeline = timeline_entries(dataset, view.filter_set(), today);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Json => {
            let summary = Summary {
                as_of: today.to_string(),
                view: &view,
                timeline,
            };
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
        Format::Text => {
            print_level(&mut out, "Branches", &view.branches)?;
            if let Some(groups) = &view.groups {
                print_level(&mut out, "Skill groups", groups)?;
            }
            if let Some(skills) = &view.skills {
                print_level(&mut out, "Skills", skills)?;
            }
            if let Some(tools) = &view.tools {
                print_level(&mut out, "Tools", tools)?;
            }
            if let Some(filtered) = &view.filtered {
                if selection.skill().is_some() {
                    writeln!(out, "{}", result_summary(filtered.matches.len(), selection.tool()))?;
                }
                writeln!(out, "Combined: {}\n", format_duration(filtered.total_months))?;
            }
            for entry in &timeline {
                writeln!(
                    out,
                    "{:<36} {:<28} {:<22} {:>7}  [{}]",
                    entry.title, entry.org, entry.period, entry.duration, entry.badge
                )?;
            }
        }
    }
    Ok(())
}

fn validate_command(dataset: &Dataset, strict: bool) -> Result<ExitCode> {
    let report = validate(dataset, YearMonth::today());
    report.log();
    for finding in &report.findings {
        println!("{finding}");
    }
    println!(
        "{} records checked, {} finding(s)",
        report.experiences_checked,
        report.findings.len()
    );
    if strict && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn background(config: &AppConfig, at_ms: u64) {
    let frame = if config.reduced_motion {
        BlobFrame::initial()
    } else {
        BlobFrame::at(at_ms)
    };
    print!("{}", frame.to_svg());
}

fn run(args: Args) -> Result<ExitCode> {
    let config = resolve_config(&args)?;
    let command = args.command.clone().unwrap_or(Command::Browse);
    let interactive = matches!(command, Command::Browse);
    let deferred = init_tracing(&config, interactive)?;

    tracing::info!(data_dir = ?config.data_dir, "Career Dashboard starting...");
    let dataset = load_dataset(&config)?;
    tracing::info!(
        experiences = dataset.len(),
        branches = dataset.taxonomy().branches().len(),
        "dataset loaded"
    );

    let outcome = match command {
        Command::Browse => browse(&dataset, &config, args.open.as_deref()).map(|()| ExitCode::SUCCESS),
        Command::Summary {
            format,
            branch,
            group,
            skill,
            tool,
        } => summary(&dataset, format, branch, group, skill, tool).map(|()| ExitCode::SUCCESS),
        Command::Validate { strict } => validate_command(&dataset, strict),
        Command::Background { at_ms } => {
            background(&config, at_ms);
            Ok(ExitCode::SUCCESS)
        }
    };

    if let Some(logs) = deferred {
        logs.drain_to_stderr();
    }
    outcome
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
