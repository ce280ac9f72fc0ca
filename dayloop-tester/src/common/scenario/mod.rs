pub mod catalog;

use crate::logic::SimulationPlan;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Look up a scenario by key or alias.
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::simulation("Smoke Test", catalog::smoke()),
        "full-day" | "diligent" => {
            TestScenario::simulation("Full Day Routine", catalog::full_day())
        }
        "repeat-taps" | "repeat" => {
            TestScenario::simulation("Repeated Taps Are Idempotent", catalog::repeat_taps())
        }
        "room-guard" | "rooms" => {
            TestScenario::simulation("Room Guard Rejections", catalog::room_guard())
        }
        "day-rollover" | "rollover" => {
            TestScenario::simulation("Scheduled Day Rollover", catalog::day_rollover())
        }
        "random-walk" | "random" => {
            TestScenario::simulation("Seeded Random Walk", catalog::random_walk())
        }
        "clock-speeds" | "speeds" => {
            TestScenario::simulation("Clock Speed Scaling", catalog::clock_speeds())
        }
        "save-roundtrip" | "save" => {
            TestScenario::simulation("Save and Restore Round Trip", catalog::save_roundtrip())
        }
        "undo-replay" | "undo" => {
            TestScenario::simulation("Undo and Replay Consistency", catalog::undo_replay())
        }
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("full-day", "Full Day Routine"),
        ("repeat-taps", "Repeated Taps Are Idempotent"),
        ("room-guard", "Room Guard Rejections"),
        ("day-rollover", "Scheduled Day Rollover"),
        ("random-walk", "Seeded Random Walk"),
        ("clock-speeds", "Clock Speed Scaling"),
        ("save-roundtrip", "Save and Restore Round Trip"),
        ("undo-replay", "Undo and Replay Consistency"),
    ]
}

/// Split a comma-separated list, replacing `all` with every known key.
pub fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = crate::common::split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}
