use clap::{Parser, Subcommand};
use splittrack_cli::commands;
use splittrack_cli::readline;
use splittrack_core::config::TrackerConfigExt;
use splittrack_core::{Tracker, TrackerConfig};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = TrackerConfig::load();
    let mut tracker = Tracker::new(config).map_err(|e| e.to_string())?;

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut tracker) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "attempt tracker cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter a chapter, opening its stats and path
    Enter {
        chapter: String,
        room: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        campaign: Option<String>,
    },
    /// Move into a room
    Room {
        name: String,
        #[arg(long)]
        respawn: bool,
        #[arg(long)]
        golden: bool,
    },
    /// Mark the current room as completed
    Done {
        #[arg(long)]
        reset_on_death: bool,
    },
    /// Record a death in the current room
    Die {
        #[arg(long)]
        golden: bool,
    },
    /// Complete the chapter
    Complete,
    /// Register a checkpoint while recording
    Checkpoint {
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        x: Option<i32>,
        #[arg(short, long)]
        y: Option<i32>,
    },
    /// Leave the chapter without completing it
    ExitRun {
        #[arg(long)]
        restart: bool,
        #[arg(long)]
        golden_restart: bool,
    },
    /// Start recording a path
    Record,
    /// Stop recording and save the path
    StopRecord,
    /// Render a placeholder template against the open chapter
    Render { template: String },
    /// Write the summary report
    Summary,
    /// Show the current path
    Path,
    /// Show per-room attempt stats
    Stats,
    /// Show the configuration
    Config,
    /// Toggle death tracking
    Pause,
    /// Wipe all stats for the chapter
    WipeChapter,
    /// Wipe the current room's attempts
    WipeRoom,
    /// Remove the most recent attempt in the current room
    RemoveLastAttempt,
    /// Remove the trailing death streak in the current room
    RemoveDeathStreak,
    /// Remove the current room's golden deaths
    RemoveRoomGoldens,
    /// Wipe golden deaths across the chapter
    WipeGoldens,
    Exit,
}

fn respond(line: &str, tracker: &mut Tracker) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "splittrack".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Enter {
            chapter,
            room,
            name,
            campaign,
        }) => commands::enter_chapter(tracker, chapter, room, name.as_deref(), campaign.as_deref()),
        Some(Commands::Room {
            name,
            respawn,
            golden,
        }) => commands::enter_room(tracker, name, *respawn, *golden),
        Some(Commands::Done { reset_on_death }) => commands::room_done(tracker, *reset_on_death),
        Some(Commands::Die { golden }) => commands::die(tracker, *golden),
        Some(Commands::Complete) => commands::complete(tracker),
        Some(Commands::Checkpoint { name, x, y }) => {
            let marker = (*x).zip(*y);
            commands::checkpoint(tracker, name.as_deref(), marker);
        }
        Some(Commands::ExitRun {
            restart,
            golden_restart,
        }) => commands::exit_run(tracker, *restart, *golden_restart),
        Some(Commands::Record) => commands::record(tracker),
        Some(Commands::StopRecord) => commands::stop_record(tracker),
        Some(Commands::Render { template }) => commands::render(tracker, template),
        Some(Commands::Summary) => commands::summary(tracker),
        Some(Commands::Path) => commands::show_path(tracker),
        Some(Commands::Stats) => commands::show_stats(tracker),
        Some(Commands::Config) => commands::show_config(tracker),
        Some(Commands::Pause) => commands::toggle_pause(tracker),
        Some(Commands::WipeChapter) => tracker.wipe_chapter(),
        Some(Commands::WipeRoom) => tracker.wipe_room_attempts(),
        Some(Commands::RemoveLastAttempt) => tracker.remove_last_attempt(),
        Some(Commands::RemoveDeathStreak) => tracker.remove_last_death_streak(),
        Some(Commands::RemoveRoomGoldens) => tracker.remove_room_golden_deaths(),
        Some(Commands::WipeGoldens) => tracker.wipe_chapter_golden_deaths(),
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
