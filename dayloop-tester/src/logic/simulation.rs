use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use dayloop_game::{
    EventLog, GameState, Intent, SessionConfig, SessionController, SessionEvent, Speed, replay,
};

use crate::logic::policy::GameplayStrategy;

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Everything needed to drive one headless session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub max_steps: usize,
    pub speed: Speed,
    pub config: SessionConfig,
    /// Intents applied before the strategy takes over.
    pub script: Vec<Intent>,
    /// Simulated wall time fed to the scheduler after every step.
    pub tick_every: Option<Duration>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            max_steps: 0,
            speed: Speed::X1,
            config: SessionConfig::default(),
            script: Vec::new(),
            tick_every: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub const fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: Vec<Intent>) -> Self {
        self.script = script;
        self
    }

    #[must_use]
    pub const fn with_tick_every(mut self, elapsed: Duration) -> Self {
        self.tick_every = Some(elapsed);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Snapshot of one applied (or rejected) intent.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub index: usize,
    pub intent: Intent,
    pub error: Option<String>,
    pub day: u32,
    pub score: u32,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub steps: Vec<StepRecord>,
    pub events: Vec<SessionEvent>,
    pub final_state: GameState,
    pub ticks_applied: u32,
    pub best_score: u32,
    /// Invariant breaches observed while stepping.
    pub violations: Vec<String>,
    /// Fingerprint of replaying every issued intent through the pure reducer.
    pub replay_fingerprint: u64,
}

impl SimulationSummary {
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|step| step.error.is_some()).count()
    }

    #[must_use]
    pub fn activation_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.as_activation().is_some())
            .count()
    }

    #[must_use]
    pub fn replay_matches(&self) -> bool {
        self.replay_fingerprint == self.final_state.fingerprint()
    }
}

/// Drive `plan` to completion with `seed`.
#[must_use]
pub fn run_plan(plan: &SimulationPlan, seed: u64) -> SimulationSummary {
    let mut session = SessionController::new(plan.config);
    session.set_speed(plan.speed);
    let log = EventLog::new();
    session.subscribe(log.clone());

    let mut policy = plan.strategy.create_policy(seed);
    let mut issued: Vec<Intent> = Vec::new();
    let mut steps = Vec::new();
    let mut violations = Vec::new();
    let mut ticks_applied = 0;
    let mut best_score = 0;

    let scripted = plan.script.iter().cloned().map(Some);
    let strategic = (0..plan.max_steps).map(|_| None);
    for (index, scripted_intent) in scripted.chain(strategic).enumerate() {
        let intent = scripted_intent.or_else(|| policy.next_intent(session.state()));
        if let Some(intent) = intent {
            let before = session.state().clone();
            let repeat = matches!(&intent, Intent::Activate(id) if before.is_completed(id));
            let error = session
                .dispatch(intent.clone())
                .err()
                .map(|err| err.to_string());
            if repeat && session.state() != &before {
                violations.push(format!("step {index}: repeat {intent:?} changed state"));
            }
            if error.is_some() && session.state() != &before {
                violations.push(format!("step {index}: rejected {intent:?} changed state"));
            }
            issued.push(intent.clone());
            steps.push(StepRecord {
                index,
                intent,
                error,
                day: session.state().day(),
                score: session.state().score(),
            });
        }

        if let Some(elapsed) = plan.tick_every {
            let ticks = session.pump(elapsed);
            ticks_applied += ticks;
            issued.extend((0..ticks).map(|_| Intent::AdvanceTime));
        }

        check_invariants(index, session.state(), &mut violations);
        best_score = best_score.max(session.state().score());
    }

    let replay_fingerprint = replay(GameState::initial(), &issued).state.fingerprint();
    log::debug!(
        "{} run seed {seed}: {} steps, {} ticks, {} violations",
        policy.name(),
        steps.len(),
        ticks_applied,
        violations.len()
    );

    SimulationSummary {
        seed,
        strategy: plan.strategy,
        steps,
        events: log.snapshot(),
        final_state: session.into_state(),
        ticks_applied,
        best_score,
        violations,
        replay_fingerprint,
    }
}

fn check_invariants(index: usize, state: &GameState, violations: &mut Vec<String>) {
    for value in state.character().values() {
        if !(0..=100).contains(&value) {
            violations.push(format!("step {index}: vital {value} out of range"));
        }
    }
    let card = state.score_card();
    if card.points != card.completed * 10 {
        violations.push(format!(
            "step {index}: score {} does not match {} completions",
            card.points, card.completed
        ));
    }
    if state.day() == 0 {
        violations.push(format!("step {index}: day counter reached zero"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayloop_game::Room;

    #[test]
    fn scripted_steps_run_before_strategy() {
        let plan = SimulationPlan::new(GameplayStrategy::Idle)
            .with_script(vec![Intent::EnterRoom(Room::Gym), Intent::activate("bed")])
            .with_max_steps(3);
        let summary = run_plan(&plan, 1);
        assert_eq!(summary.steps.len(), 2);
        assert_eq!(summary.rejected(), 1);
        assert_eq!(summary.final_state.current_room(), Room::Gym);
        assert!(summary.violations.is_empty());
        assert!(summary.replay_matches());
    }

    #[test]
    fn paused_sessions_ignore_ticks() {
        let plan = SimulationPlan::new(GameplayStrategy::Idle)
            .with_max_steps(5)
            .with_tick_every(Duration::from_secs(600));
        let summary = run_plan(&plan, 1);
        assert_eq!(summary.ticks_applied, 0);
        assert_eq!(summary.final_state, GameState::initial());
    }

    #[test]
    fn wanderer_runs_clean() {
        let plan = SimulationPlan::new(GameplayStrategy::Wanderer)
            .with_max_steps(400)
            .with_tick_every(Duration::from_secs(20));
        let summary = run_plan(&plan, 77);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert!(summary.replay_matches());
    }
}
