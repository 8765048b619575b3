//! Static rules: the face-to-resource map, build kinds and the tunable
//! rule table a game is created with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Gold dice spent per substituted resource unit.
pub const GOLD_EXCHANGE_RATE: u32 = 2;

/// Every resource a die face can produce. `Gold` is the wildcard.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Lumber,
    Brick,
    Wool,
    Wheat,
    Ore,
    Gold,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Lumber,
        ResourceKind::Brick,
        ResourceKind::Wool,
        ResourceKind::Wheat,
        ResourceKind::Ore,
        ResourceKind::Gold,
    ];

    /// Resource shown by a die face. Faces outside 1..=6 are a caller bug.
    pub fn from_face(face: u8) -> Result<Self> {
        match face {
            1 => Ok(ResourceKind::Lumber),
            2 => Ok(ResourceKind::Brick),
            3 => Ok(ResourceKind::Wool),
            4 => Ok(ResourceKind::Wheat),
            5 => Ok(ResourceKind::Ore),
            6 => Ok(ResourceKind::Gold),
            other => Err(EngineError::InvalidFace(other)),
        }
    }

    /// Face that produces this resource; inverse of [`ResourceKind::from_face`].
    pub fn face(self) -> u8 {
        self.index() as u8 + 1
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Lumber => "lumber",
            ResourceKind::Brick => "brick",
            ResourceKind::Wool => "wool",
            ResourceKind::Wheat => "wheat",
            ResourceKind::Ore => "ore",
            ResourceKind::Gold => "gold",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownResource(s.to_string()))
    }
}

/// Shorthand for [`ResourceKind::from_face`].
pub fn resource_of(face: u8) -> Result<ResourceKind> {
    ResourceKind::from_face(face)
}

/// A resource a build recipe may name. Gold is only ever spent as a
/// substitute, so it has no variant here.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Lumber,
    Brick,
    Wool,
    Wheat,
    Ore,
}

impl Material {
    pub fn kind(self) -> ResourceKind {
        match self {
            Material::Lumber => ResourceKind::Lumber,
            Material::Brick => ResourceKind::Brick,
            Material::Wool => ResourceKind::Wool,
            Material::Wheat => ResourceKind::Wheat,
            Material::Ore => ResourceKind::Ore,
        }
    }
}

impl From<Material> for ResourceKind {
    fn from(m: Material) -> Self {
        m.kind()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().name())
    }
}

impl FromStr for Material {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match ResourceKind::from_str(s)? {
            ResourceKind::Lumber => Ok(Material::Lumber),
            ResourceKind::Brick => Ok(Material::Brick),
            ResourceKind::Wool => Ok(Material::Wool),
            ResourceKind::Wheat => Ok(Material::Wheat),
            ResourceKind::Ore => Ok(Material::Ore),
            ResourceKind::Gold => Err(EngineError::UnknownResource(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildKind {
    Road,
    Settlement,
    City,
    Knight,
}

impl BuildKind {
    pub const ALL: [BuildKind; 4] = [
        BuildKind::Road,
        BuildKind::Settlement,
        BuildKind::City,
        BuildKind::Knight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildKind::Road => "road",
            BuildKind::Settlement => "settlement",
            BuildKind::City => "city",
            BuildKind::Knight => "knight",
        }
    }
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        // The lobby API and older clients use plural names ("roads", "cities").
        let singular = match s.to_ascii_lowercase().as_str() {
            "cities" => "city".to_string(),
            other => other.strip_suffix('s').unwrap_or(other).to_string(),
        };
        BuildKind::ALL
            .into_iter()
            .find(|k| k.name() == singular)
            .ok_or_else(|| EngineError::UnknownBuildKind(s.to_string()))
    }
}

/// Recipe, per-player cap and victory-point value of one build kind.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildSpec {
    pub requirement: Vec<Material>,
    pub max_count: u32,
    pub points: u32,
}

impl BuildSpec {
    fn new(requirement: &[Material], max_count: u32, points: u32) -> Self {
        Self { requirement: requirement.to_vec(), max_count, points }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildCatalog {
    pub road: BuildSpec,
    pub settlement: BuildSpec,
    pub city: BuildSpec,
    pub knight: BuildSpec,
}

impl BuildCatalog {
    pub fn get(&self, kind: BuildKind) -> &BuildSpec {
        match kind {
            BuildKind::Road => &self.road,
            BuildKind::Settlement => &self.settlement,
            BuildKind::City => &self.city,
            BuildKind::Knight => &self.knight,
        }
    }
}

impl Default for BuildCatalog {
    fn default() -> Self {
        use Material::*;
        Self {
            road: BuildSpec::new(&[Lumber, Brick], 15, 0),
            settlement: BuildSpec::new(&[Lumber, Brick, Wool, Wheat], 5, 1),
            city: BuildSpec::new(&[Wheat, Wheat, Ore, Ore, Ore], 4, 2),
            knight: BuildSpec::new(&[Wool, Ore], 14, 0),
        }
    }
}

/// Tunable rule table. Every field has a default, so a JSON document only
/// needs to name what it overrides.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub max_rolls_per_turn: u32,
    pub victory_point_goal: u32,
    pub dice_count: usize,
    /// Optional round limit; the game ends once `turn_number` passes it.
    pub max_turns: Option<u32>,
    pub longest_road_threshold: u32,
    pub largest_army_threshold: u32,
    pub bonus_points: u32,
    pub builds: BuildCatalog,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            max_rolls_per_turn: 3,
            victory_point_goal: 10,
            dice_count: 6,
            max_turns: None,
            longest_road_threshold: 5,
            largest_army_threshold: 3,
            bonus_points: 2,
            builds: BuildCatalog::default(),
        }
    }
}

impl Rules {
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dice_count == 0 {
            return Err(EngineError::InvalidRules("dice_count must be at least 1".into()));
        }
        if self.max_rolls_per_turn == 0 {
            return Err(EngineError::InvalidRules("max_rolls_per_turn must be at least 1".into()));
        }
        if self.victory_point_goal == 0 {
            return Err(EngineError::InvalidRules("victory_point_goal must be at least 1".into()));
        }
        if self.max_turns == Some(0) {
            return Err(EngineError::InvalidRules("max_turns must be at least 1 when set".into()));
        }
        Ok(())
    }

    pub fn build(&self, kind: BuildKind) -> &BuildSpec {
        self.builds.get(kind)
    }
}
