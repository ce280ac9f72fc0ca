use anyhow::Result;
use colored::Colorize;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};

use dayloop_game::{GameState, Intent, SessionConfig, SessionController, SessionEvent, Speed};

use crate::logic::GameplayStrategy;

const MAX_POLL: Duration = Duration::from_millis(250);

/// Drive a live session against the wall clock until `run_for` elapses or ctrl-c.
///
/// The player policy gets one intent per poll; the scheduler is pumped with
/// the real time that passed since the previous poll.
///
/// # Errors
///
/// Returns an error if the ctrl-c handler cannot be installed.
pub async fn run_realtime(
    config: SessionConfig,
    speed: Speed,
    strategy: GameplayStrategy,
    seed: u64,
    run_for: Duration,
) -> Result<GameState> {
    let mut session = SessionController::new(config);
    session.set_speed(speed);
    session.subscribe(print_event);
    session.toggle_play();

    let poll_every = session.clock().tick_interval().min(MAX_POLL);
    println!(
        "⏱️  Real-time session at {} ({:?} per phase, polling every {:?})",
        speed.to_string().bright_white(),
        session.clock().tick_interval(),
        poll_every
    );

    let mut policy = strategy.create_policy(seed);
    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let started = Instant::now();
    let mut last_poll = started;
    while started.elapsed() < run_for {
        tokio::select! {
            _ = ticker.tick() => {}
            signal = &mut ctrl_c => {
                signal?;
                println!("{}", "interrupted".yellow());
                break;
            }
        }

        let now = Instant::now();
        let ticks = session.pump(now.duration_since(last_poll));
        last_poll = now;
        if ticks > 0 {
            print_state(session.state());
        }

        // The clock owns time in a live session.
        let intent = policy
            .next_intent(session.state())
            .filter(|intent| *intent != Intent::AdvanceTime);
        if let Some(intent) = intent {
            if let Err(err) = session.dispatch(intent) {
                log::warn!("{} rejected: {err}", policy.name());
            }
        }
    }

    Ok(session.into_state())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::ObjectActivated(activation) => println!(
            "  ✨ {} in the {} ({})",
            activation.object_id.green(),
            activation.room,
            activation.action
        ),
        SessionEvent::DayStarted { day } => {
            println!("{}", format!("🌅 Day {day} begins").bright_yellow());
        }
        _ => log::debug!("event: {event:?}"),
    }
}

fn print_state(state: &GameState) {
    let vitals = state.character();
    println!(
        "  day {} {:<9} room {:<8} score {:>3} | energy {:>3} hygiene {:>3} hunger {:>3} | {}",
        state.day(),
        state.time_of_day().to_string(),
        state.current_room().to_string(),
        state.score(),
        vitals.energy(),
        vitals.hygiene(),
        vitals.hunger(),
        state.mood()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn realtime_loop_advances_phases_with_paused_clock() {
        let config = SessionConfig::from_json(r#"{"clock":{"base_tick_ms":1000}}"#).unwrap();
        let state = run_realtime(
            config,
            Speed::X4,
            GameplayStrategy::Idle,
            1,
            Duration::from_millis(2_100),
        )
        .await
        .unwrap();
        assert!(state.day() >= 2, "expected a rollover, got day {}", state.day());
    }
}
