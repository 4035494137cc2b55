//! `frametag` CLI - validate configs and replay labeling sessions headlessly

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

use frametag::config::LogLevel;
use frametag::format::{FormatError, WarningSeverity};
use frametag::script::{ScriptCommand, ScriptError, parse_script};
use frametag::{AppConfig, Config, ConfigError, FrameNavigator, Notice, Session, VirtualNavigator};

#[derive(Parser)]
#[command(name = "frametag")]
#[command(about = "Keyboard-driven frame labeling for video")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the label schema
    CheckConfig,

    /// Replay an input script against a video's record and save the result
    Replay {
        /// Video whose record is edited
        video: PathBuf,

        /// Frame count reported for the video
        #[arg(short, long)]
        frames: usize,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Script file (reads stdin when omitted)
        #[arg(short, long)]
        script: Option<PathBuf>,
    },

    /// Print per-label frame counts for a video's record
    Stats {
        /// Video whose record is read
        video: PathBuf,

        /// Frame count reported for the video
        #[arg(short, long)]
        frames: usize,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: f64,
    },

    /// Print the default configuration as JSON
    PrintDefaultConfig,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Record error: {0}")]
    Format(#[from] FormatError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::PrintDefaultConfig = cli.command {
        println!("{}", AppConfig::default().to_json()?);
        return Ok(());
    }

    let app_config = load_app_config(cli.config.as_deref())?;
    init_logging(app_config.preferences.log_level);
    let config = app_config.build()?;
    log::info!("Loaded {} labels", config.schema.len());

    match cli.command {
        Commands::CheckConfig => cmd_check_config(&config),
        Commands::Replay {
            video,
            frames,
            fps,
            script,
        } => cmd_replay(&config, &video, frames, fps, script.as_deref())?,
        Commands::Stats { video, frames, fps } => cmd_stats(&config, &video, frames, fps),
        Commands::PrintDefaultConfig => {}
    }
    Ok(())
}

fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}

fn load_app_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_from_path(path),
        None => Ok(AppConfig::load_from_default_path()?.unwrap_or_default()),
    }
}

fn cmd_check_config(config: &Config) {
    println!("Labels:");
    for def in config.schema.labels() {
        println!(
            "  {:<10} {:<12} group={:<8} color={}",
            def.key.to_string(),
            def.token,
            def.group,
            frametag::color_utils::to_hex_color(def.color)
        );
    }

    let mut actions: Vec<_> = config.bindings.iter().collect();
    actions.sort_by_key(|(_, action)| action.name());
    println!("Actions:");
    for (key, action) in actions {
        println!("  {:<10} {}", key.to_string(), action.name());
    }

    let t = &config.timings;
    println!(
        "Timings: label_delay={:?} hold_threshold={:?} auto_advance={:?} playback={:?}",
        t.label_delay, t.hold_threshold, t.auto_advance_interval, t.playback_interval
    );
    println!(
        "Mouse: step={} fast_multiplier={}",
        config.mouse.step, config.mouse.fast_multiplier
    );
}

fn print_warnings(warnings: &[frametag::format::FormatWarning]) {
    for warning in warnings {
        let tag = match warning.severity {
            WarningSeverity::Info => "info",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Error => "error",
        };
        match warning.line {
            Some(line) => eprintln!("{tag}: line {line}: {}", warning.message),
            None => eprintln!("{tag}: {}", warning.message),
        }
    }
}

fn cmd_replay(
    config: &Config,
    video: &Path,
    frames: usize,
    fps: f64,
    script: Option<&Path>,
) -> Result<(), CliError> {
    let text = match script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let commands = parse_script(&text)?;

    let navigator = VirtualNavigator::new(frames).with_fps(fps);
    let (mut session, warnings) = Session::open(config, video, navigator);
    print_warnings(&warnings);

    for command in commands {
        match command {
            ScriptCommand::Seek(frame) => {
                session.navigator_mut().seek(frame);
            }
            ScriptCommand::Event(event) => {
                for notice in session.handle(event) {
                    report(&notice);
                }
            }
        }
    }

    for line in session.stats().lines(fps) {
        println!("{line}");
    }
    let path = session.close()?;
    println!("Saved {}", path.display());
    Ok(())
}

fn report(notice: &Notice) {
    match notice {
        Notice::GapFilled { start, end, token } => {
            println!("filled {start}-{end} with '{token}'");
        }
        Notice::GapFillFailed(e) => println!("fill-in: {e}"),
        Notice::EndOfVideo => println!("end of video"),
        Notice::ModeChanged(mode) => println!("mode: {}", mode.name()),
        Notice::Undone(what) => println!("undo: {what}"),
        Notice::Redone(what) => println!("redo: {what}"),
        Notice::Saved { path } => println!("saved {}", path.display()),
        Notice::SaveFailed { message } => eprintln!("save failed: {message}"),
        other => log::debug!("{:?}", other),
    }
}

fn cmd_stats(config: &Config, video: &Path, frames: usize, fps: f64) {
    let navigator = VirtualNavigator::new(frames).with_fps(fps);
    let (session, warnings) = Session::open(config, video, navigator);
    print_warnings(&warnings);

    println!("{}", session.record_path().display());
    for line in session.stats().lines(fps) {
        println!("{line}");
    }
}
