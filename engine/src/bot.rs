//! Greedy bot. Stateless: every call looks at the table afresh and picks one
//! action, which then goes through [`crate::apply`] like any human move.

use tracing::{debug, warn};

use crate::model::{Event, State};
use crate::rules::BuildKind;
use crate::{apply, can_build_now, end_turn, Action, Result};

/// Order in which the bot tries builds.
pub const BUILD_PRIORITY: [BuildKind; 4] =
    [BuildKind::Settlement, BuildKind::Road, BuildKind::City, BuildKind::Knight];

/// Upper bound on actions in one bot turn before it is forced to end.
const MAX_STEPS: usize = 32;

/// Next action for `player_id`, or `None` if it is not their turn or the
/// game is over.
pub fn decide(state: &State, player_id: &str) -> Option<Action> {
    if state.is_finished() || state.active_player_id() != player_id {
        return None;
    }
    let turn = &state.turn;
    if turn.roll_count == 0 && !turn.has_built {
        return Some(Action::Roll);
    }
    if !turn.has_built {
        if let Some(kind) = BUILD_PRIORITY.into_iter().find(|&k| can_build_now(state, k)) {
            return Some(Action::Build(kind));
        }
        if turn.roll_count < state.rules.max_rolls_per_turn {
            let to_lock: Vec<usize> = modal_group(state)
                .into_iter()
                .filter(|&i| state.dice.get(i).is_ok_and(|d| !d.locked))
                .collect();
            return Some(if to_lock.is_empty() { Action::Roll } else { Action::Lock(to_lock) });
        }
    }
    Some(Action::EndTurn)
}

/// Indices of the unconsumed dice showing the most common face. Ties go to
/// the lower face.
pub fn modal_group(state: &State) -> Vec<usize> {
    let mut counts = [0usize; 7];
    for die in state.dice.iter().filter(|d| !d.consumed) {
        counts[usize::from(die.face.value())] += 1;
    }
    let mut best = 0usize;
    for face in 1..counts.len() {
        if counts[face] > counts[best] {
            best = face;
        }
    }
    if best == 0 {
        return Vec::new();
    }
    state
        .dice
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.consumed && usize::from(d.face.value()) == best)
        .map(|(i, _)| i)
        .collect()
}

/// Drive the active player's whole turn with the bot policy.
pub fn play_bot_turn(state: &mut State) -> Result<Vec<Event>> {
    let player = state.active_player_id().to_string();
    let mut events = Vec::new();
    for _ in 0..MAX_STEPS {
        let Some(action) = decide(state, &player) else { break };
        debug!(player = %player, ?action, "bot action");
        let produced = apply(state, &action)?;
        let refused = produced.is_empty();
        events.extend(produced);
        if action == Action::EndTurn || state.is_finished() {
            return Ok(events);
        }
        if refused {
            warn!(player = %player, ?action, "bot action refused, ending turn");
            break;
        }
    }
    if !state.is_finished() && state.active_player_id() == player {
        events.extend(end_turn(state));
    }
    Ok(events)
}
