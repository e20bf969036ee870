use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use pausely_core::storage::counters;
use pausely_core::timer::format_hms;
use pausely_core::{
    Config, CuePlayer, Database, NullCuePlayer, Phase, SessionController, TimerMode, TimerSnapshot,
};
use tokio::sync::mpsc;

use crate::cue::BeepCuePlayer;

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Manual,
    Auto,
}

impl From<ModeArg> for TimerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Manual => TimerMode::Manual,
            ModeArg::Auto => TimerMode::Auto,
        }
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interactive timer session
    Run {
        /// Timing mode
        #[arg(long, value_enum)]
        mode: ModeArg,
        /// Override the work duration in seconds
        #[arg(long)]
        work: Option<u64>,
        /// Override the break duration in seconds
        #[arg(long = "break")]
        break_secs: Option<u64>,
        /// Disable audio cues
        #[arg(long)]
        no_sound: bool,
    },
    /// Show the persisted in-progress counters
    Status,
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            mode,
            work,
            break_secs,
            no_sound,
        } => run_session(mode, work, break_secs, no_sound).await,
        TimerAction::Status => status(),
    }
}

fn status() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let c = counters::load_all(&db)?;
    println!("work:   {}", format_hms(c.manual_work_secs));
    println!("pause:  {}", format_hms(c.manual_pause_secs));
    println!("cycles: {}", c.auto_work_cycles);
    Ok(())
}

async fn run_session(
    mode: ModeArg,
    work: Option<u64>,
    break_secs: Option<u64>,
    no_sound: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(w) = work {
        config.timer.work_duration_secs = w;
    }
    if let Some(b) = break_secs {
        config.timer.break_duration_secs = b;
    }

    let db = Arc::new(Database::open()?);
    let cues: Arc<dyn CuePlayer> = if no_sound {
        Arc::new(NullCuePlayer)
    } else {
        Arc::new(BeepCuePlayer)
    };
    let controller = SessionController::new(Arc::clone(&db), &config, cues);

    controller.start().await;
    let mode: TimerMode = mode.into();
    controller.select_mode(mode).await;
    println!(
        "Session started ({} mode). p = pause/resume, s = stop.",
        mode.as_str()
    );

    let mut lines = stdin_lines();
    let mut render = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = render.tick() => {
                render_line(&controller.snapshot().await);
            }
            line = lines.recv() => match line.as_deref().map(str::trim) {
                Some("p") => controller.toggle_running().await,
                Some("s") | None => break,
                _ => {}
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let Some(record) = controller.stop().await? else {
        return Ok(());
    };

    println!();
    println!(
        "Session finished: work {}, pause {}, cycles {}",
        format_hms(record.work_seconds),
        format_hms(record.pause_seconds),
        record.work_cycles
    );
    print!("Add a note about this session (empty line to skip): ");
    std::io::stdout().flush()?;
    match lines.recv().await {
        Some(note) if !note.trim().is_empty() => {
            match controller.attach_note(note.trim()).await {
                Ok(()) => println!("Note saved."),
                Err(e) => eprintln!("The note could not be saved: {e}"),
            }
        }
        _ => controller.cancel_note().await,
    }
    Ok(())
}

/// Stdin as a line channel, read from a blocking thread.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(line.trim_end().to_string()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

fn render_line(snap: &TimerSnapshot) {
    match snap.mode {
        Some(TimerMode::Manual) => {
            let state = if snap.is_running { "running" } else { "paused" };
            println!(
                "{}  [{state}]  work {}  pause {}",
                snap.remaining_display, snap.work_display, snap.pause_display
            );
        }
        Some(TimerMode::Auto) => {
            let phase = match snap.phase {
                Phase::Work => "work",
                Phase::Break => "break",
            };
            println!(
                "{}  [{phase}]  cycles {}",
                snap.remaining_display, snap.work_cycles
            );
        }
        None => {}
    }
}
