//! Day/time progression.

use log::info;

use crate::session::{SessionEvent, Transition};
use crate::state::{GameState, TimeOfDay};

/// Move to the next time-of-day phase.
///
/// Wrapping from night to morning starts a new day: the day counter
/// increments and the completion set is cleared.
#[must_use]
pub fn advance_time(state: &GameState) -> Transition {
    let mut next = state.clone();
    next.time_of_day = state.time_of_day.next();
    let mut transition = Transition::unchanged(next);

    if transition.state.time_of_day == TimeOfDay::Morning {
        let state = &mut transition.state;
        state.day = state.day.saturating_add(1);
        state.completed_actions.clear();
        info!("day {} begins", state.day);
        transition
            .events
            .push(SessionEvent::DayStarted { day: state.day });
    }

    transition.events.push(SessionEvent::TimeAdvanced {
        day: transition.state.day,
        time_of_day: transition.state.time_of_day,
    });
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Room;
    use crate::interaction::activate;
    use crate::session::enter_room;

    #[test]
    fn single_step_keeps_day_and_completions() {
        let state = activate(&GameState::initial(), "bed").unwrap().state;
        let transition = advance_time(&state);
        assert_eq!(transition.state.time_of_day(), TimeOfDay::Afternoon);
        assert_eq!(transition.state.day(), 1);
        assert!(transition.state.is_completed("bed"));
        assert_eq!(
            transition.events.as_slice(),
            &[SessionEvent::TimeAdvanced {
                day: 1,
                time_of_day: TimeOfDay::Afternoon
            }]
        );
    }

    #[test]
    fn full_cycle_starts_new_day() {
        let mut state = enter_room(&GameState::initial(), Room::Bathroom).state;
        state = activate(&state, "shower").unwrap().state;
        let vitals = state.character().clone();

        for _ in 0..3 {
            state = advance_time(&state).state;
        }
        assert_eq!(state.time_of_day(), TimeOfDay::Night);
        assert_eq!(state.day(), 1);

        let rollover = advance_time(&state);
        assert_eq!(rollover.state.time_of_day(), TimeOfDay::Morning);
        assert_eq!(rollover.state.day(), 2);
        assert!(rollover.state.completed_actions().is_empty());
        assert_eq!(rollover.state.character(), &vitals);
        assert_eq!(rollover.state.current_room(), Room::Bathroom);
        assert!(
            rollover
                .events
                .contains(&SessionEvent::DayStarted { day: 2 })
        );
    }

    #[test]
    fn day_counter_saturates() {
        let mut state = GameState::initial();
        state.day = u32::MAX;
        state.time_of_day = TimeOfDay::Night;
        assert_eq!(advance_time(&state).state.day(), u32::MAX);
    }
}
