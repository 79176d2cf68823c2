use crate::utils::error::MamError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Isometric grid coordinate of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
}

impl TileCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Chunk covering tiles `[x*S, x*S+S) x [y*S, y*S+S)` for chunk size `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the metric of the square streaming window.
    pub fn distance(&self, other: &ChunkCoord) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// World pixel coordinates. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainElement {
    TreeBlocksFall,
    TreeDefaultFall,
    TreeFatFall,
    TreeThinFall,
    TreeOakFall,
    StoneTall,
    StoneLarge,
    BushSmall,
    Log,
    LogLarge,
}

impl TerrainElement {
    pub const ALL: [TerrainElement; 10] = [
        TerrainElement::TreeBlocksFall,
        TerrainElement::TreeDefaultFall,
        TerrainElement::TreeFatFall,
        TerrainElement::TreeThinFall,
        TerrainElement::TreeOakFall,
        TerrainElement::StoneTall,
        TerrainElement::StoneLarge,
        TerrainElement::BushSmall,
        TerrainElement::Log,
        TerrainElement::LogLarge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TerrainElement::TreeBlocksFall => "tree_blocks_fall",
            TerrainElement::TreeDefaultFall => "tree_default_fall",
            TerrainElement::TreeFatFall => "tree_fat_fall",
            TerrainElement::TreeThinFall => "tree_thin_fall",
            TerrainElement::TreeOakFall => "tree_oak_fall",
            TerrainElement::StoneTall => "stone_tall",
            TerrainElement::StoneLarge => "stone_large",
            TerrainElement::BushSmall => "bush_small",
            TerrainElement::Log => "log",
            TerrainElement::LogLarge => "log_large",
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(
            self,
            TerrainElement::TreeBlocksFall
                | TerrainElement::TreeDefaultFall
                | TerrainElement::TreeFatFall
                | TerrainElement::TreeThinFall
                | TerrainElement::TreeOakFall
        )
    }

    /// Everything except bushes blocks the runner.
    pub fn collides(&self) -> bool {
        !matches!(self, TerrainElement::BushSmall)
    }

    pub fn layer(&self) -> Layer {
        if self.collides() {
            Layer::Walls
        } else {
            Layer::Objects
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            TerrainElement::TreeThinFall => 'T',
            TerrainElement::TreeDefaultFall => 't',
            TerrainElement::TreeOakFall => 'O',
            TerrainElement::TreeFatFall => 'F',
            TerrainElement::TreeBlocksFall => 'B',
            TerrainElement::StoneTall => 'S',
            TerrainElement::StoneLarge => 'R',
            TerrainElement::Log => 'L',
            TerrainElement::LogLarge => 'l',
            TerrainElement::BushSmall => 'b',
        }
    }
}

impl fmt::Display for TerrainElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainElement {
    type Err = MamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainElement::ALL
            .iter()
            .copied()
            .find(|element| element.name() == s)
            .ok_or_else(|| MamError::UnknownNameError {
                kind: "terrain element",
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainMode {
    #[default]
    Quantum,
    Random,
}

impl TerrainMode {
    pub fn toggled(self) -> Self {
        match self {
            TerrainMode::Quantum => TerrainMode::Random,
            TerrainMode::Random => TerrainMode::Quantum,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainMode::Quantum => "quantum",
            TerrainMode::Random => "random",
        }
    }
}

impl fmt::Display for TerrainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainMode {
    type Err = MamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantum" => Ok(TerrainMode::Quantum),
            "random" => Ok(TerrainMode::Random),
            _ => Err(MamError::UnknownNameError {
                kind: "terrain mode",
                name: s.to_string(),
            }),
        }
    }
}

/// Scene layers, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Ground,
    Objects,
    Walls,
    Characters,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Ground => "Ground",
            Layer::Objects => "Objects",
            Layer::Walls => "Walls",
            Layer::Characters => "Characters",
        }
    }
}

/// One tile of a chunk: the ground plus an optional detail element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub tile: TileCoord,
    pub position: ScreenPoint,
    pub element: Option<TerrainElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub seed: u64,
    pub mode: TerrainMode,
    pub placements: Vec<Placement>,
}

impl Chunk {
    pub fn elements(&self) -> impl Iterator<Item = (&Placement, TerrainElement)> {
        self.placements
            .iter()
            .filter_map(|placement| placement.element.map(|element| (placement, element)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Q,
    R,
}

impl FromStr for Key {
    type Err = MamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "a" => Ok(Key::A),
            "d" => Ok(Key::D),
            "q" => Ok(Key::Q),
            "r" => Ok(Key::R),
            _ => Err(MamError::UnknownNameError {
                kind: "key",
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

impl FromStr for KeyAction {
    type Err = MamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "press" => Ok(KeyAction::Press),
            "release" => Ok(KeyAction::Release),
            _ => Err(MamError::UnknownNameError {
                kind: "key action",
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
}

/// An input fired before the update of a given loop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub tick: u64,
    pub key: Key,
    pub action: KeyAction,
}

impl ScriptedInput {
    pub fn event(&self) -> InputEvent {
        match self.action {
            KeyAction::Press => InputEvent::Press(self.key),
            KeyAction::Release => InputEvent::Release(self.key),
        }
    }
}

/// Parses `tick:action:key`, e.g. `30:press:left`.
impl FromStr for ScriptedInput {
    type Err = MamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| MamError::InvalidConfigValueError {
            field: "input".to_string(),
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid("Expected the form tick:action:key"));
        }

        let tick = parts[0]
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("Tick must be a non-negative integer"))?;

        Ok(Self {
            tick,
            action: parts[1].parse()?,
            key: parts[2].parse()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub session: String,
    pub player: String,
    pub master_seed: i64,
    pub mode: TerrainMode,
    pub ticks: u64,
    pub distance: f64,
    pub score: u64,
    pub game_over: bool,
    pub restarts: u32,
    pub final_position: ScreenPoint,
    pub final_direction: f64,
    pub chunks_generated: u64,
    pub chunks_evicted: u64,
    pub active_chunks: usize,
    pub census: BTreeMap<String, u64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub master_seed: i64,
    pub mode: TerrainMode,
    pub score: u64,
    pub ticks: u64,
    pub recorded_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            player: report.player.clone(),
            master_seed: report.master_seed,
            mode: report.mode,
            score: report.score,
            ticks: report.ticks,
            recorded_at: report.finished_at,
        }
    }
}

/// Notable things that happen while a session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ChunksStreamed { loaded: usize, evicted: usize },
    ModeToggled { mode: TerrainMode },
    GameOver { tick: u64, distance: f64 },
    Restarted { restarts: u32 },
}
