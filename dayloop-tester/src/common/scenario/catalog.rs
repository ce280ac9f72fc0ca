use anyhow::{Context, Result, ensure};
use std::time::Duration;

use dayloop_game::{
    GameEngine, GameState, Intent, Room, SessionConfig, SessionController, SessionEvent, Speed,
    TimeOfDay,
};

use crate::common::JsonDirStorage;
use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary};

const ONE_MINUTE: Duration = Duration::from_secs(60);

pub fn smoke() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Diligent)
        .with_max_steps(5)
        .with_expectation(smoke_expectation)
}

pub fn full_day() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Diligent)
        .with_max_steps(23)
        .with_expectation(full_day_expectation)
}

pub fn repeat_taps() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Repeater)
        .with_max_steps(50)
        .with_expectation(repeat_taps_expectation)
}

pub fn room_guard() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Idle)
        .with_script(vec![
            Intent::EnterRoom(Room::Gym),
            Intent::activate("bed"),
            Intent::activate("ghost"),
            Intent::activate("stove"),
            Intent::EnterRoom(Room::Kitchen),
            Intent::activate("stove"),
        ])
        .with_expectation(room_guard_expectation)
}

pub fn day_rollover() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Idle)
        .with_script(vec![
            Intent::TogglePlay,
            Intent::EnterRoom(Room::Living),
            Intent::activate("sofa"),
        ])
        .with_max_steps(4)
        .with_tick_every(ONE_MINUTE)
        .with_expectation(day_rollover_expectation)
}

pub fn random_walk() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Wanderer)
        .with_max_steps(500)
        .with_tick_every(Duration::from_secs(20))
        .with_expectation(random_walk_expectation)
}

pub fn clock_speeds() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Idle)
        .with_script(vec![Intent::TogglePlay])
        .with_max_steps(15)
        .with_speed(Speed::X4)
        .with_tick_every(ONE_MINUTE)
        .with_expectation(clock_speeds_expectation)
}

pub fn save_roundtrip() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Diligent)
        .with_max_steps(10)
        .with_expectation(save_roundtrip_expectation)
}

pub fn undo_replay() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Diligent)
        .with_max_steps(12)
        .with_expectation(undo_replay_expectation)
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.rejected() == 0, "smoke run rejected an intent");
    ensure!(
        summary.final_state.score() == 40,
        "expected 40 points after four activations, got {}",
        summary.final_state.score()
    );
    ensure!(summary.replay_matches(), "replay diverged from live session");
    Ok(())
}

fn full_day_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(
        summary.best_score == 150,
        "every object should have been completed, best score {}",
        summary.best_score
    );
    ensure!(summary.activation_count() == 15, "expected 15 activations");
    ensure!(
        state.day() == 2 && state.time_of_day() == TimeOfDay::Morning,
        "expected morning of day 2, got day {} {}",
        state.day(),
        state.time_of_day()
    );
    ensure!(state.score() == 0, "rollover should clear completions");
    Ok(())
}

fn repeat_taps_expectation(summary: &SimulationSummary) -> Result<()> {
    let vitals = summary.final_state.character();
    ensure!(
        summary.activation_count() == 1,
        "repeat taps produced {} activations",
        summary.activation_count()
    );
    ensure!(summary.final_state.score() == 10, "repeat taps changed the score");
    ensure!(
        vitals.energy() == 90 && vitals.hunger() == 55,
        "repeat taps applied the delta more than once"
    );
    Ok(())
}

fn room_guard_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.rejected() == 3,
        "expected 3 rejections, got {}",
        summary.rejected()
    );
    let first = summary
        .steps
        .iter()
        .find_map(|step| step.error.as_deref())
        .context("no rejection recorded")?;
    ensure!(
        first.contains("bedroom"),
        "rejection should name the object's room: {first}"
    );
    ensure!(summary.final_state.current_room() == Room::Kitchen);
    ensure!(summary.final_state.is_completed("stove"));
    ensure!(summary.final_state.score() == 10);
    Ok(())
}

fn day_rollover_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(
        summary.ticks_applied == 7,
        "expected 7 scheduled ticks, got {}",
        summary.ticks_applied
    );
    ensure!(
        state.day() == 2 && state.time_of_day() == TimeOfDay::Night,
        "expected night of day 2, got day {} {}",
        state.day(),
        state.time_of_day()
    );
    ensure!(state.score() == 0, "completions survived the rollover");
    ensure!(
        summary
            .events
            .contains(&SessionEvent::DayStarted { day: 2 }),
        "no day-start notification"
    );
    ensure!(summary.replay_matches(), "replay diverged from live session");
    Ok(())
}

fn random_walk_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.steps.len() == 500, "wanderer skipped steps");
    ensure!(
        summary.replay_matches(),
        "replaying {} intents diverged from the live session",
        summary.steps.len()
    );
    Ok(())
}

fn clock_speeds_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.ticks_applied == 64,
        "4x speed should yield 4 ticks per minute, got {} ticks",
        summary.ticks_applied
    );
    ensure!(
        summary.final_state.day() == 17,
        "expected day 17, got {}",
        summary.final_state.day()
    );
    ensure!(summary.final_state.time_of_day() == TimeOfDay::Morning);
    Ok(())
}

fn save_roundtrip_expectation(summary: &SimulationSummary) -> Result<()> {
    let root = std::env::temp_dir().join(format!(
        "dayloop-tester-saves-{}-{}",
        std::process::id(),
        summary.seed
    ));
    let engine = GameEngine::new(SessionConfig::default(), JsonDirStorage::new(&root));
    let session = SessionController::from_state(summary.final_state.clone(), *engine.config());

    engine
        .save_session("roundtrip", &session)
        .context("saving session")?;
    let restored = engine
        .load_session("roundtrip")?
        .context("saved slot disappeared")?;
    ensure!(
        restored.state() == session.state(),
        "restored state differs from the saved one"
    );
    ensure!(restored.state().fingerprint() == summary.final_state.fingerprint());

    engine.delete_save("roundtrip").context("deleting save")?;
    ensure!(
        engine.load_session("roundtrip")?.is_none(),
        "deleted slot still loads"
    );
    let _ = std::fs::remove_dir_all(&root);
    Ok(())
}

fn undo_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.replay_matches(), "replay diverged from live session");

    let mut session = SessionController::new(SessionConfig::default());
    for step in summary.steps.iter().filter(|step| step.error.is_none()) {
        session.dispatch(step.intent.clone())?;
    }
    ensure!(
        session.state() == &summary.final_state,
        "re-dispatching the recorded intents gave a different state"
    );

    let mut undone = 0;
    while session.undo() {
        undone += 1;
    }
    ensure!(
        undone == summary.steps.len(),
        "expected {} undo steps, got {undone}",
        summary.steps.len()
    );
    ensure!(
        session.state() == &GameState::initial(),
        "undo did not rewind to the initial state"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::run_plan;

    fn assert_passes(plan: &SimulationPlan, seed: u64) {
        let summary = run_plan(plan, seed);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        for expectation in &plan.expectations {
            expectation.evaluate(&summary).unwrap();
        }
    }

    #[test]
    fn deterministic_scenarios_pass() {
        for plan in [
            smoke(),
            full_day(),
            repeat_taps(),
            room_guard(),
            day_rollover(),
            clock_speeds(),
            undo_replay(),
        ] {
            assert_passes(&plan, 1337);
        }
    }

    #[test]
    fn random_walk_passes_for_several_seeds() {
        let plan = random_walk();
        for seed in [1, 42, 1337, 0xDEAD] {
            assert_passes(&plan, seed);
        }
    }

    #[test]
    fn save_roundtrip_passes() {
        assert_passes(&save_roundtrip(), 5);
    }
}
