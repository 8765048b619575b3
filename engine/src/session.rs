//! Lobby and per-game session handle.
//!
//! A host opens a lobby, others join or bots are added, and starting the
//! lobby closes it and yields a [`GameSession`]. Each session owns exactly
//! one [`State`]; hosts serialize commands per session.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::model::{Event, Player, PlayerId, State};
use crate::rules::Rules;
use crate::{apply, init_game, rng, Action};

pub const LOBBY_CAPACITY: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LobbySeat {
    pub id: PlayerId,
    pub name: String,
    pub is_bot: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lobby {
    pub game_id: String,
    pub host: PlayerId,
    pub seats: Vec<LobbySeat>,
    pub closed: bool,
    seed: u64,
    bots_added: u64,
}

impl Lobby {
    pub fn open(seed: u64, host: impl Into<PlayerId>, host_name: impl Into<String>) -> Self {
        let host = host.into();
        let game_id = rng::game_code(&mut rng::event_rng(seed, 0));
        info!(game_id = %game_id, host = %host, "lobby opened");
        Self {
            game_id,
            seats: vec![LobbySeat { id: host.clone(), name: host_name.into(), is_bot: false }],
            host,
            closed: false,
            seed,
            bots_added: 0,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(EngineError::LobbyClosed);
        }
        if self.seats.len() >= LOBBY_CAPACITY {
            return Err(EngineError::LobbyFull { capacity: LOBBY_CAPACITY });
        }
        Ok(())
    }

    /// Take a seat. Joining twice with the same id is a no-op.
    pub fn join(&mut self, id: impl Into<PlayerId>, name: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.seats.iter().any(|s| s.id == id) {
            return Ok(());
        }
        self.ensure_open()?;
        debug!(game_id = %self.game_id, player = %id, "player joined");
        self.seats.push(LobbySeat { id, name: name.into(), is_bot: false });
        Ok(())
    }

    /// Seat a bot named `Bot N`, numbered among bots already seated.
    pub fn add_bot(&mut self) -> Result<PlayerId> {
        self.ensure_open()?;
        let number = self.seats.iter().filter(|s| s.is_bot).count() + 1;
        self.bots_added += 1;
        let code = rng::game_code(&mut rng::event_rng(self.seed, self.bots_added));
        let id = format!("BOT_{code}");
        debug!(game_id = %self.game_id, bot = %id, "bot added");
        self.seats.push(LobbySeat { id: id.clone(), name: format!("Bot {number}"), is_bot: true });
        Ok(id)
    }

    /// Close the lobby and deal the first game.
    pub fn start(&mut self, rules: Rules) -> Result<GameSession> {
        if self.closed {
            return Err(EngineError::LobbyClosed);
        }
        let players = self
            .seats
            .iter()
            .map(|s| Player::new(s.id.clone(), s.name.clone(), s.is_bot))
            .collect();
        let state = init_game(self.seed, rules, players)?;
        self.closed = true;
        info!(game_id = %self.game_id, players = self.seats.len(), "game started");
        Ok(GameSession { id: self.game_id.clone(), state })
    }
}

/// One running game, addressed by its id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    pub id: String,
    pub state: State,
}

impl GameSession {
    /// Apply `action` on behalf of `player`. Moves from anyone but the active
    /// player are refused like any other illegal move.
    pub fn submit(&mut self, player: &str, action: &Action) -> Result<Vec<Event>> {
        if self.state.active_player_id() != player {
            debug!(game_id = %self.id, player, active = self.state.active_player_id(), "out-of-turn action refused");
            return Ok(Vec::new());
        }
        apply(&mut self.state, action)
    }

    /// Play bot seats until a human is up, the game ends, or one full round
    /// has passed (an all-bot table would otherwise never return).
    pub fn advance_bots(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut turns = 0;
        while turns < self.state.players.len()
            && !self.state.is_finished()
            && self.state.active_player().is_bot
        {
            events.extend(crate::bot::play_bot_turn(&mut self.state)?);
            turns += 1;
        }
        Ok(events)
    }

    pub fn snapshot(&self) -> &State {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameStatus;

    #[test]
    fn lobby_holds_four_seats() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.join("a", "A").unwrap();
        lobby.add_bot().unwrap();
        lobby.add_bot().unwrap();
        assert!(matches!(lobby.join("b", "B"), Err(EngineError::LobbyFull { capacity: 4 })));
        assert!(matches!(lobby.add_bot(), Err(EngineError::LobbyFull { .. })));
    }

    #[test]
    fn rejoining_is_idempotent() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.join("a", "A").unwrap();
        lobby.join("a", "A").unwrap();
        assert_eq!(lobby.seats.len(), 2);
    }

    #[test]
    fn bots_are_numbered() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.add_bot().unwrap();
        lobby.add_bot().unwrap();
        let names: Vec<_> = lobby.seats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Host", "Bot 1", "Bot 2"]);
        assert_ne!(lobby.seats[1].id, lobby.seats[2].id);
    }

    #[test]
    fn starting_closes_the_lobby() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.join("a", "A").unwrap();
        let session = lobby.start(Rules::default()).unwrap();
        assert_eq!(session.id, lobby.game_id);
        assert_eq!(session.state.players.len(), 2);
        assert_eq!(session.state.status, GameStatus::InProgress);
        assert!(matches!(lobby.join("b", "B"), Err(EngineError::LobbyClosed)));
        assert!(matches!(lobby.start(Rules::default()), Err(EngineError::LobbyClosed)));
    }

    #[test]
    fn out_of_turn_actions_are_refused() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.join("a", "A").unwrap();
        let mut session = lobby.start(Rules::default()).unwrap();
        assert!(session.submit("a", &Action::Roll).unwrap().is_empty());
        assert_eq!(session.state.turn.roll_count, 0);
        assert_eq!(session.submit("host", &Action::Roll).unwrap().len(), 1);
        assert_eq!(session.state.turn.roll_count, 1);
    }

    #[test]
    fn bad_lock_index_leaves_the_table_alone() {
        let mut lobby = Lobby::open(5, "host", "Host");
        lobby.join("a", "A").unwrap();
        let mut session = lobby.start(Rules::default()).unwrap();
        let before = serde_json::to_value(session.snapshot()).unwrap();
        let err = session.submit("host", &Action::Lock(vec![0, 1, 99])).unwrap_err();
        assert!(matches!(err, EngineError::DieIndexOutOfRange { index: 99, .. }));
        assert_eq!(serde_json::to_value(session.snapshot()).unwrap(), before);
    }

    #[test]
    fn bots_play_until_a_human_is_up() {
        let mut lobby = Lobby::open(9, "host", "Host");
        lobby.add_bot().unwrap();
        lobby.add_bot().unwrap();
        let mut session = lobby.start(Rules::default()).unwrap();
        session.submit("host", &Action::EndTurn).unwrap();
        session.advance_bots().unwrap();
        assert_eq!(session.snapshot().active_player_id(), "host");
        assert_eq!(session.snapshot().turn.turn_number, 2);
    }
}
