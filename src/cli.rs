use crate::config::{Config, FailurePolicy, load_config};
use crate::ir::StoryMap;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::Dispatcher;
use crate::sink::MiroSink;
use crate::source::{load_story_map, sample_story_map};
use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "storymap",
    version,
    about = "Publish a theme/activity/story map to a Miro board"
)]
pub struct Args {
    /// Target board id
    #[arg(long = "board", env = "MIRO_BOARD_ID")]
    pub board_id: Option<String>,

    /// Miro access token (Bearer)
    #[arg(long = "token", env = "MIRO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Story map input (.csv, or .json for a serialized map). Uses the built-in R4 map if omitted.
    #[arg(long = "csv", env = "STORYMAP_CSV")]
    pub input: Option<PathBuf>,

    /// Prefix added to every frame title [default: R4]
    #[arg(long = "prefix", env = "STORYMAP_PREFIX")]
    pub prefix: Option<String>,

    /// Print what would be created without calling the board
    #[arg(
        long = "dry-run",
        env = "STORYMAP_DRY_RUN",
        value_parser = BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Keep creating elements after a failed call instead of stopping
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Config JSON file (layout and dispatch overrides)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Board coordinates that must be present before anything else runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub board_id: String,
    pub token: String,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let stdout = io::stdout();
    execute(&args, &mut stdout.lock())
}

pub fn execute<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let target = resolve_target(args)?;
    let config = build_config(args)?;
    let map = load_input(args.input.as_deref())?;
    info!(
        release = %map.release,
        themes = map.themes.len(),
        stories = map.story_count(),
        "story map loaded"
    );

    let elements = compute_layout(&map, &config.layout);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &map, &elements)
            .with_context(|| format!("failed to write layout dump to {}", path.display()))?;
    }

    let dispatcher = Dispatcher::new(config.dispatch.clone());
    if args.dry_run {
        for line in dispatcher.preview(&elements) {
            writeln!(out, "{line}")?;
        }
        return Ok(());
    }

    let mut sink = MiroSink::new(
        &config.dispatch.api_base,
        &target.board_id,
        &target.token,
        config.dispatch.request_timeout_secs.map(Duration::from_secs),
    )?;
    let report = dispatcher
        .apply(&elements, &mut sink)
        .context("board left partially populated")?;
    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} element(s) failed; created {}",
            report.failures.len(),
            elements.len(),
            report.created.len()
        );
    }
    info!(created = report.created.len(), "done");
    Ok(())
}

pub fn resolve_target(args: &Args) -> Result<Target> {
    let board_id = non_empty(args.board_id.as_deref())
        .ok_or_else(|| anyhow::anyhow!("provide --board or set MIRO_BOARD_ID"))?;
    let token = non_empty(args.token.as_deref())
        .ok_or_else(|| anyhow::anyhow!("provide --token or set MIRO_TOKEN"))?;
    Ok(Target {
        board_id: board_id.to_string(),
        token: token.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(prefix) = args.prefix.as_ref() {
        config.layout.title_prefix = prefix.clone();
    }
    if args.keep_going {
        config.dispatch.failure_policy = FailurePolicy::Continue;
    }
    Ok(config)
}

fn load_input(path: Option<&Path>) -> Result<StoryMap> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading story map");
            load_story_map(path)
                .with_context(|| format!("failed to load story map from {}", path.display()))
        }
        None => {
            info!("using built-in R4 story map");
            Ok(sample_story_map()?)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
