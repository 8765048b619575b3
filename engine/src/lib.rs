//! Rules engine for a turn-based dice-and-build game.
//!
//! Every command takes the game [`State`] explicitly and returns the event it
//! produced. A command the rules refuse (rolling after building, building
//! something unaffordable, acting after the game ended) returns `None` and
//! leaves the state untouched. Errors are reserved for caller bugs such as an
//! out-of-range die index.

pub mod bot;
pub mod consume;
pub mod error;
pub mod hashing;
pub mod ledger;
pub mod model;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;

use std::collections::HashSet;
use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

pub use error::{EngineError, Result};
use hashing::FnvHasher;
use ledger::ResourceCounts;
use model::*;
use rules::{BuildKind, Material, Rules};

/// One move a player (or the bot) can make.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Roll,
    /// Lock every listed die that is not already locked.
    Lock(Vec<usize>),
    Build(BuildKind),
    EndTurn,
}

fn hash_state(s: &State) -> String {
    let mut h = FnvHasher::new();
    let t = &s.turn;
    for n in [t.turn_idx as u64, u64::from(t.roll_count), u64::from(t.has_built), u64::from(t.turn_number)] {
        h.write_le_u64(n);
    }
    for die in &s.dice {
        h.write(&[die.face.value(), u8::from(die.locked), u8::from(die.consumed)]);
    }
    for p in &s.players {
        h.write_str(&p.id);
        for kind in BuildKind::ALL {
            h.write_le_u64(u64::from(p.builds.get(kind)));
        }
    }
    for holder in [&s.bonus.longest_road, &s.bonus.largest_army] {
        h.write_str(holder.as_deref().unwrap_or(""));
    }
    h.write(&[u8::from(s.status == GameStatus::Finished)]);
    format!("h:{:016x}", h.finish())
}

fn emit(state: &mut State, ty: EventType, payload: serde_json::Value) -> Event {
    state.events_seq += 1;
    Event { seq: state.events_seq, ty, payload, state_hash: hash_state(state) }
}

/// Build players `p1..pN` from seat requests.
pub fn seat_players(specs: &[PlayerSpec]) -> Vec<Player> {
    specs
        .iter()
        .enumerate()
        .map(|(i, s)| Player::new(format!("p{}", i + 1), s.name.clone(), s.is_bot))
        .collect()
}

pub fn init_game(seed: u64, rules: Rules, players: Vec<Player>) -> Result<State> {
    rules.validate()?;
    if players.is_empty() {
        return Err(EngineError::NotEnoughPlayers { required: 1, have: 0 });
    }
    let mut ids = HashSet::new();
    for p in &players {
        if !ids.insert(p.id.as_str()) {
            return Err(EngineError::DuplicatePlayer(p.id.clone()));
        }
    }
    let dice = DiceSet::new(rules.dice_count);
    Ok(State {
        seed,
        rules,
        players,
        dice,
        turn: TurnState::default(),
        bonus: BonusState::default(),
        status: GameStatus::InProgress,
        winner: None,
        events_seq: 0,
    })
}

pub fn new_game(seed: u64, rules: Rules, specs: &[PlayerSpec]) -> Result<State> {
    init_game(seed, rules, seat_players(specs))
}

/// Start over with a new table, keeping seed, rules and the event counter.
pub fn reset_game(state: &mut State, specs: &[PlayerSpec]) -> Result<Event> {
    let fresh = init_game(state.seed, state.rules.clone(), seat_players(specs))?;
    let events_seq = state.events_seq;
    *state = State { events_seq, ..fresh };
    debug!(players = state.players.len(), "game reset");
    let ids: Vec<&PlayerId> = state.players.iter().map(|p| &p.id).collect();
    let payload = json!({ "players": ids });
    Ok(emit(state, EventType::Reset, payload))
}

pub fn roll(state: &mut State) -> Option<Event> {
    if state.is_finished() {
        debug!("roll refused: game finished");
        return None;
    }
    if state.turn.has_built {
        debug!(player = state.active_player_id(), "roll refused: already built this turn");
        return None;
    }
    if state.turn.roll_count >= state.rules.max_rolls_per_turn {
        debug!(player = state.active_player_id(), rolls = state.turn.roll_count, "roll refused: out of rolls");
        return None;
    }
    let mut dice_rng = rng::event_rng(state.seed, state.events_seq);
    for die in state.dice.iter_mut().filter(|d| !d.locked) {
        die.face = rng::roll_face(&mut dice_rng);
        die.consumed = false;
    }
    state.turn.roll_count += 1;
    debug!(player = state.active_player_id(), roll = state.turn.roll_count, faces = ?state.dice.faces(), "rolled");
    let payload = json!({ "faces": state.dice.faces(), "rollCount": state.turn.roll_count });
    Some(emit(state, EventType::Roll, payload))
}

/// Flip the lock on one die. Allowed at any point of a live turn, including
/// before the first roll.
pub fn toggle_lock(state: &mut State, index: usize) -> Result<Option<Event>> {
    let die = state.dice.get_mut(index)?;
    if state.status == GameStatus::Finished {
        return Ok(None);
    }
    die.locked = !die.locked;
    let locked = die.locked;
    debug!(index, locked, "toggled lock");
    Ok(Some(emit(state, EventType::ToggleLock, json!({ "index": index, "locked": locked }))))
}

pub fn build(state: &mut State, kind: BuildKind) -> Option<Event> {
    if state.is_finished() {
        debug!(%kind, "build refused: game finished");
        return None;
    }
    let idx = state.turn.turn_idx;
    let spec = state.rules.build(kind).clone();
    let count = state.players[idx].builds.get(kind);
    if count >= spec.max_count {
        debug!(player = state.active_player_id(), %kind, count, max = spec.max_count, "build refused: at maximum");
        return None;
    }
    if !ledger::can_build(&spec.requirement, &available_resources(state)) {
        debug!(player = state.active_player_id(), %kind, "build refused: cannot afford");
        return None;
    }

    let consumed = consume::consume(&mut state.dice, &spec.requirement);
    state.players[idx].builds.increment(kind);
    let acting = state.players[idx].clone();
    let transfers = scoring::evaluate_bonuses(&acting, &state.players, &mut state.bonus, &state.rules);
    for t in &transfers {
        info!(track = ?t.track, from = ?t.from, to = %t.to, "bonus changed hands");
    }
    scoring::recompute(&mut state.players, &state.bonus, &state.rules);
    state.turn.has_built = true;
    let finished = check_goal(state);

    let player = &state.players[idx];
    debug!(player = %player.id, %kind, vp = player.victory_points, "built");
    let payload = json!({
        "player": player.id,
        "kind": kind,
        "consumed": consumed,
        "count": player.builds.get(kind),
        "victoryPoints": player.victory_points,
        "bonusTransfers": transfers,
        "finished": finished,
        "winner": state.winner,
    });
    Some(emit(state, EventType::Build, payload))
}

pub fn end_turn(state: &mut State) -> Option<Event> {
    if state.is_finished() {
        debug!("end turn refused: game finished");
        return None;
    }
    let idx = state.turn.turn_idx;
    state.players[idx].turns_completed += 1;
    let next_idx = (idx + 1) % state.players.len();
    if next_idx == 0 {
        state.turn.turn_number += 1;
    }
    state.turn.turn_idx = next_idx;
    state.turn.roll_count = 0;
    state.turn.has_built = false;
    state.dice.reset_flags();

    let finished = check_goal(state) || check_turn_limit(state);
    let payload = json!({
        "player": state.players[idx].id,
        "next": state.players[next_idx].id,
        "turnNumber": state.turn.turn_number,
        "finished": finished,
        "winner": state.winner,
    });
    Some(emit(state, EventType::EndTurn, payload))
}

/// Finish the game if anyone has reached the goal. The first seat at or
/// above the goal is recorded as winner.
fn check_goal(state: &mut State) -> bool {
    let goal = state.rules.victory_point_goal;
    let Some(winner) = state.players.iter().find(|p| p.victory_points >= goal) else {
        return false;
    };
    let winner = winner.id.clone();
    finish(state, winner);
    true
}

fn check_turn_limit(state: &mut State) -> bool {
    let Some(limit) = state.rules.max_turns else { return false };
    if state.turn.turn_number <= limit {
        return false;
    }
    // max_by_key keeps the last maximum; scan in reverse so the earliest seat wins ties.
    let Some(leader) = state.players.iter().rev().max_by_key(|p| p.victory_points) else {
        return false;
    };
    let winner = leader.id.clone();
    finish(state, winner);
    true
}

fn finish(state: &mut State, winner: PlayerId) {
    info!(winner = %winner, turn = state.turn.turn_number, "game finished");
    state.status = GameStatus::Finished;
    state.winner = Some(winner);
}

/// Run one action through the same transitions a human uses.
pub fn apply(state: &mut State, action: &Action) -> Result<Vec<Event>> {
    let events = match action {
        Action::Roll => roll(state).into_iter().collect(),
        Action::Lock(indices) => {
            // Validate every index up front so a bad one leaves the dice untouched.
            for &i in indices {
                state.dice.get(i)?;
            }
            let mut events = Vec::with_capacity(indices.len());
            for &i in indices {
                if !state.dice.get(i)?.locked {
                    events.extend(toggle_lock(state, i)?);
                }
            }
            events
        }
        Action::Build(kind) => build(state, *kind).into_iter().collect(),
        Action::EndTurn => end_turn(state).into_iter().collect(),
    };
    Ok(events)
}

pub fn available_resources(state: &State) -> ResourceCounts {
    ledger::available_resources(&state.dice)
}

fn requirement(state: &State, kind: BuildKind) -> &[Material] {
    &state.rules.build(kind).requirement
}

/// Whether the dice on the table pay for `kind`, ignoring caps and phase.
pub fn can_afford(state: &State, kind: BuildKind) -> bool {
    ledger::can_build(requirement(state, kind), &available_resources(state))
}

pub fn missing_resources(state: &State, kind: BuildKind) -> Vec<Material> {
    ledger::missing_resources(requirement(state, kind), &available_resources(state))
}

/// Whether [`build`] would accept `kind` right now.
pub fn can_build_now(state: &State, kind: BuildKind) -> bool {
    !state.is_finished()
        && state.active_player().builds.get(kind) < state.rules.build(kind).max_count
        && can_afford(state, kind)
}
