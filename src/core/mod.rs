pub mod chunks;
pub mod engine;
pub mod generator;
pub mod iso;
pub mod leaderboard;
pub mod physics;
pub mod quantum;
pub mod runner;
pub mod scene;
pub mod session;

pub use crate::domain::model::{Chunk, ChunkCoord, RunReport, TerrainElement, TerrainMode, TileCoord};
pub use crate::domain::ports::{ConfigProvider, SessionObserver, Storage, TerrainSource};
pub use crate::utils::error::Result;
