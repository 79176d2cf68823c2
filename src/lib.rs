pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::app::export::TerrainRegion;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::{EngineOutcome, MamEngine},
    generator::TerrainGenerator,
    iso::IsoGrid,
    leaderboard::Leaderboard,
    session::{GameSession, TracingObserver},
};
pub use crate::utils::error::{MamError, Result};
