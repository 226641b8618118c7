#![forbid(unsafe_code)]

//! `designable-demo` command line: argument parsing, dispatch and report
//! output.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use designable::{
    Animation, AppearanceType, DesignManipulator, Designer, DesignerConfig, FileStorage,
    MAX_ANIMATION_MS,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::appearance::{AppAppearanceType, provide_appearance};
use crate::error::{DemoError, Result};
use crate::transition::LoggingTransition;
use crate::views::{AppDesigner, SystemStyle, ViewController};

#[derive(Debug, Parser)]
#[command(
    name = "designable-demo",
    about = "Reference application for designable: switch and inspect appearances",
    version
)]
pub struct Cli {
    /// Persist the appearance type in this JSON file. In-memory when omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Designer config (`.toml` or `.json`).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the current appearance of both views.
    Show,

    /// Switch to an appearance type.
    Set(SetArgs),

    /// Tap the custom view (switches to graphite).
    Tap,

    /// Simulate a change of the platform light/dark setting.
    System(SystemArgs),

    /// List the available appearance types.
    List,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(value_enum)]
    pub appearance: AppAppearanceType,

    /// Apply without animation.
    #[arg(long, conflicts_with = "duration_ms")]
    pub instant: bool,

    /// Animation duration, overriding the configured default.
    #[arg(
        long,
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(..=MAX_ANIMATION_MS)
    )]
    pub duration_ms: Option<u64>,
}

impl SetArgs {
    fn animation(&self, default: Animation) -> Animation {
        if self.instant {
            return Animation::Immediate;
        }
        match self.duration_ms {
            Some(ms) => Animation::Animated(Duration::from_millis(ms)),
            None => default,
        }
    }
}

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[arg(value_enum)]
    pub style: SystemStyle,
}

/// State of both views after a command ran.
#[derive(Debug, Serialize)]
pub struct Report {
    pub appearance: AppAppearanceType,
    pub name: Option<String>,
    pub view_controller_background: Option<String>,
    pub custom_view_background: Option<String>,
    pub system_appearance_enabled: bool,
}

impl Report {
    fn capture(designer: &AppDesigner, controller: &ViewController) -> Self {
        let appearance = designer.appearance_type();
        Self {
            appearance,
            name: appearance.name().map(str::to_string),
            view_controller_background: controller.background_color().map(|c| c.to_string()),
            custom_view_background: controller
                .custom_view()
                .background_color()
                .map(|c| c.to_string()),
            system_appearance_enabled: designer.is_system_appearance_enabled(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListEntry {
    appearance: AppAppearanceType,
    name: Option<String>,
    image: Option<String>,
    current: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Execute `cli`, writing the report to `out`.
pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let designer = build_designer(cli.store.as_deref(), config);

    if let Commands::List = cli.command {
        return print_list(&designer, cli.json, out);
    }

    let controller = ViewController::new(designer.clone());
    controller.view_will_appear();

    match &cli.command {
        Commands::Show | Commands::List => {}
        Commands::Set(args) => {
            let animation = args.animation(designer.default_animation());
            designer.set_with(args.appearance, animation);
        }
        Commands::Tap => controller.custom_view_tapped(),
        Commands::System(args) => controller.system_style_changed(args.style),
    }

    let report = Report::capture(&designer, &controller);
    info!(appearance = %report.appearance, "appearance report ready");
    print_report(&report, cli.json, out)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<DesignerConfig> {
    let Some(path) = path else {
        return Ok(DesignerConfig::default());
    };
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => DesignerConfig::from_toml_file(path)?,
        _ => DesignerConfig::from_json_file(path)?,
    };
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(DemoError::InvalidConfig {
            path: path.to_path_buf(),
            problems: problems.join("; "),
        });
    }
    Ok(config)
}

fn build_designer(store: Option<&Path>, config: DesignerConfig) -> AppDesigner {
    let builder = Designer::builder(provide_appearance, AppAppearanceType::Light)
        .transition(LoggingTransition)
        .config(config);
    let builder = match store {
        Some(path) => builder.storage(FileStorage::new(path)),
        None => builder,
    };
    builder.build()
}

fn print_report(report: &Report, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }
    let unset = || "-".to_string();
    writeln!(
        out,
        "appearance: {} ({})",
        report.appearance,
        report.name.as_deref().unwrap_or("unnamed")
    )?;
    writeln!(
        out,
        "view controller: {}",
        report.view_controller_background.clone().unwrap_or_else(unset)
    )?;
    writeln!(
        out,
        "custom view: {}",
        report.custom_view_background.clone().unwrap_or_else(unset)
    )?;
    Ok(())
}

fn print_list(designer: &AppDesigner, json: bool, out: &mut dyn Write) -> Result<()> {
    let current = designer.appearance_type();
    let entries: Vec<ListEntry> = AppAppearanceType::ALL
        .into_iter()
        .map(|kind| ListEntry {
            appearance: kind,
            name: kind.name().map(str::to_string),
            image: kind.image().map(|image| image.to_string()),
            current: kind == current,
        })
        .collect();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }
    for entry in &entries {
        let marker = if entry.current { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {:<9} {:<9} {}",
            entry.appearance.as_str(),
            entry.name.as_deref().unwrap_or(""),
            entry.image.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}
