use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use questkeep_core::{ApiClient, Config, Database, Event, TimerCycle, TimerDriver, TimerMode};

use super::{optional_client, print_json, runtime, CliResult};

/// How often `run` reports remaining time on stderr.
const PROGRESS_EVERY: Duration = Duration::from_secs(60);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Switch to work, shortBreak or longBreak
    Mode {
        mode: TimerMode,
    },
    /// Change a mode's duration in minutes
    Duration {
        mode: TimerMode,
        minutes: u32,
    },
    /// Rewind the current interval
    Reset,
    /// Run the current interval in the foreground (Ctrl-C pauses)
    Run {
        /// Do not report sessions to the backend
        #[arg(long)]
        offline: bool,
    },
}

/// Restore the saved cycle and bring its durations in line with the config
/// file, which owns them.
fn load_cycle(db: &Database, config: &Config) -> Result<TimerCycle, Box<dyn std::error::Error>> {
    let durations = config.timer.durations();
    let mut cycle = db
        .load_timer()?
        .unwrap_or_else(|| TimerCycle::new(durations));
    // Nothing ticks between invocations, so a saved "running" flag is stale.
    cycle.pause();
    for event in cycle.apply_durations(durations) {
        tracing::debug!(?event, "picked up configured duration");
    }
    Ok(cycle)
}

pub fn run(action: TimerAction) -> CliResult {
    let db = Database::open()?;
    let mut config = Config::load()?;
    let mut cycle = load_cycle(&db, &config)?;

    match action {
        TimerAction::Status => print_json(&cycle.snapshot())?,
        TimerAction::Mode { mode } => {
            let event = cycle
                .select_mode(mode)
                .ok_or("mode cannot change while the timer is running")?;
            print_json(&event)?;
        }
        TimerAction::Duration { mode, minutes } => {
            config.timer.set_minutes(mode, minutes)?;
            config.save()?;
            let event = cycle
                .set_duration(mode, minutes)
                .ok_or("duration cannot change while the timer is running")?;
            print_json(&event)?;
        }
        TimerAction::Reset => {
            if let Some(event) = cycle.reset() {
                print_json(&event)?;
            }
        }
        TimerAction::Run { offline } => {
            let api = if offline {
                None
            } else {
                optional_client(&config)
            };
            cycle = runtime()?.block_on(run_foreground(&db, cycle, api.as_ref()))?;
        }
    }

    db.save_timer(&cycle)?;
    Ok(())
}

async fn run_foreground(
    db: &Database,
    cycle: TimerCycle,
    api: Option<&ApiClient>,
) -> Result<TimerCycle, Box<dyn std::error::Error>> {
    let mode = cycle.mode();
    let minutes = cycle.durations().minutes(mode);

    let remote = match api {
        Some(api) => Some(api.start_session(mode, minutes).await?),
        None => None,
    };

    let (mut driver, mut events) = TimerDriver::new(cycle);
    let started_at = Utc::now();
    if let Some(event) = driver.start() {
        print_json(&event)?;
    }

    let mut progress = tokio::time::interval(PROGRESS_EVERY);
    progress.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let completed = loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break None };
                print_json(&event)?;
                if let Event::IntervalCompleted { completed, duration_min, .. } = event {
                    db.record_session(completed, u64::from(duration_min), started_at, Utc::now())?;
                    break Some(completed);
                }
            }
            _ = &mut ctrl_c => {
                if let Some(event) = driver.pause() {
                    print_json(&event)?;
                }
                break None;
            }
            _ = progress.tick() => {
                let c = driver.cycle();
                let left = c.remaining_secs();
                eprintln!("{} {:02}:{:02} remaining", c.mode(), left / 60, left % 60);
            }
        }
    };

    let cycle = driver.cycle();
    db.save_timer(&cycle)?;

    if let (Some(api), Some(session)) = (api, remote) {
        if completed.is_some() {
            api.complete_session(&session.id).await?;
        } else {
            api.pause_session(&session.id).await?;
        }
        tracing::info!(session = %session.id, "session synced");
    }

    Ok(cycle)
}
