use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::rules::{BuildKind, ResourceKind, Rules};

pub type PlayerId = String;

/// A die face, always in 1..=6.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub fn new(value: u8) -> Result<Self> {
        ResourceKind::from_face(value).map(|_| Face(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn resource(self) -> ResourceKind {
        ResourceKind::ALL[usize::from(self.0) - 1]
    }
}

impl From<ResourceKind> for Face {
    fn from(kind: ResourceKind) -> Self {
        Face(kind.face())
    }
}

impl TryFrom<u8> for Face {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self> {
        Face::new(value)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.0
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Die {
    pub face: Face,
    pub locked: bool,
    pub consumed: bool,
}

impl Die {
    pub fn new(face: Face) -> Self {
        Self { face, locked: false, consumed: false }
    }

    pub fn resource(&self) -> ResourceKind {
        self.face.resource()
    }
}

/// Fixed-length, ordered dice of one table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiceSet(Vec<Die>);

impl DiceSet {
    /// Fresh dice showing 1, 2, .., 6, 1, .. in order.
    pub fn new(count: usize) -> Self {
        DiceSet((0..count).map(|i| Die::new(Face((i % 6) as u8 + 1))).collect())
    }

    pub fn from_faces(faces: &[u8]) -> Result<Self> {
        faces.iter().map(|&f| Face::new(f).map(Die::new)).collect::<Result<Vec<_>>>().map(DiceSet)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Die> {
        let len = self.0.len();
        self.0.get(index).ok_or(EngineError::DieIndexOutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Die> {
        let len = self.0.len();
        self.0.get_mut(index).ok_or(EngineError::DieIndexOutOfRange { index, len })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Die> {
        self.0.iter_mut()
    }

    pub fn faces(&self) -> Vec<u8> {
        self.0.iter().map(|d| d.face.value()).collect()
    }

    /// Clear every lock and consumption flag, keeping faces.
    pub fn reset_flags(&mut self) {
        for die in &mut self.0 {
            die.locked = false;
            die.consumed = false;
        }
    }
}

impl<'a> IntoIterator for &'a DiceSet {
    type Item = &'a Die;
    type IntoIter = std::slice::Iter<'a, Die>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Cumulative builds of one player.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildCounts {
    pub roads: u32,
    pub settlements: u32,
    pub cities: u32,
    pub knights: u32,
}

impl BuildCounts {
    pub fn get(&self, kind: BuildKind) -> u32 {
        match kind {
            BuildKind::Road => self.roads,
            BuildKind::Settlement => self.settlements,
            BuildKind::City => self.cities,
            BuildKind::Knight => self.knights,
        }
    }

    pub(crate) fn increment(&mut self, kind: BuildKind) {
        let slot = match kind {
            BuildKind::Road => &mut self.roads,
            BuildKind::Settlement => &mut self.settlements,
            BuildKind::City => &mut self.cities,
            BuildKind::Knight => &mut self.knights,
        };
        *slot += 1;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display: String,
    pub is_bot: bool,
    pub builds: BuildCounts,
    pub victory_points: u32,
    pub turns_completed: u32,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, display: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            is_bot,
            builds: BuildCounts::default(),
            victory_points: 0,
            turns_completed: 0,
        }
    }
}

/// Seat request used to start or reset a game.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSpec {
    pub name: String,
    pub is_bot: bool,
}

impl PlayerSpec {
    pub fn human(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_bot: false }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_bot: true }
    }
}

/// Sub-state of a turn, derived from the roll counter and build flag.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    /// Nothing rolled or built yet.
    NotRolled,
    /// Rolled at least once; may roll again or build.
    CanRollOrBuild,
    /// Built, or out of rolls. Only building more or ending the turn remain.
    MustEndTurn,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnState {
    pub turn_idx: usize,
    pub roll_count: u32,
    pub has_built: bool,
    pub turn_number: u32,
}

impl TurnState {
    pub fn phase(&self, max_rolls: u32) -> TurnPhase {
        if self.has_built || self.roll_count >= max_rolls {
            TurnPhase::MustEndTurn
        } else if self.roll_count == 0 {
            TurnPhase::NotRolled
        } else {
            TurnPhase::CanRollOrBuild
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self { turn_idx: 0, roll_count: 0, has_built: false, turn_number: 1 }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusState {
    pub longest_road: Option<PlayerId>,
    pub largest_army: Option<PlayerId>,
}

impl BonusState {
    pub fn holds(&self, track: BonusTrack, player: &str) -> bool {
        self.holder(track).is_some_and(|h| h == player)
    }

    pub fn holder(&self, track: BonusTrack) -> Option<&PlayerId> {
        match track {
            BonusTrack::LongestRoad => self.longest_road.as_ref(),
            BonusTrack::LargestArmy => self.largest_army.as_ref(),
        }
    }

    pub(crate) fn holder_mut(&mut self, track: BonusTrack) -> &mut Option<PlayerId> {
        match track {
            BonusTrack::LongestRoad => &mut self.longest_road,
            BonusTrack::LargestArmy => &mut self.largest_army,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BonusTrack {
    LongestRoad,
    LargestArmy,
}

impl BonusTrack {
    pub const ALL: [BonusTrack; 2] = [BonusTrack::LongestRoad, BonusTrack::LargestArmy];

    /// Build kind whose count is contested on this track.
    pub fn counted(self) -> BuildKind {
        match self {
            BonusTrack::LongestRoad => BuildKind::Road,
            BonusTrack::LargestArmy => BuildKind::Knight,
        }
    }

    pub fn threshold(self, rules: &Rules) -> u32 {
        match self {
            BonusTrack::LongestRoad => rules.longest_road_threshold,
            BonusTrack::LargestArmy => rules.largest_army_threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Finished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Roll,
    ToggleLock,
    Build,
    EndTurn,
    Reset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub ty: EventType,
    pub payload: serde_json::Value,
    pub state_hash: String,
}

/// Full game snapshot. This is the session handle every command takes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct State {
    pub seed: u64,
    pub rules: Rules,
    pub players: Vec<Player>,
    pub dice: DiceSet,
    pub turn: TurnState,
    pub bonus: BonusState,
    pub status: GameStatus,
    pub winner: Option<PlayerId>,
    pub events_seq: u64,
}

impl State {
    pub fn active_player(&self) -> &Player {
        &self.players[self.turn.turn_idx]
    }

    pub fn active_player_id(&self) -> &str {
        &self.active_player().id
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase(self.rules.max_rolls_per_turn)
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }
}
