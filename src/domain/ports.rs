use crate::config::settings::{LeaderboardSettings, RunnerConfig, SessionSettings, WorldConfig};
use crate::domain::model::{ChunkCoord, ScriptedInput, SessionEvent, TerrainElement, TerrainMode, TileCoord};
use crate::utils::error::Result;
use async_trait::async_trait;
use rand::RngCore;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn world(&self) -> WorldConfig;
    fn runner(&self) -> RunnerConfig;
    fn session(&self) -> SessionSettings;
    fn leaderboard(&self) -> LeaderboardSettings;
    fn output_path(&self) -> &str;
    fn report_file(&self) -> Option<&str>;
    fn inputs(&self) -> Vec<ScriptedInput>;
}

/// Decides what grows on each tile.
///
/// `element_at` is called once per tile, in chunk order, with an RNG seeded
/// from `chunk_seed`. Sources that ignore the RNG must still be deterministic.
pub trait TerrainSource: Send + Sync {
    fn chunk_seed(&self, chunk: ChunkCoord, chunk_size: i64) -> u64;

    fn element_at(
        &self,
        tile: TileCoord,
        mode: TerrainMode,
        rng: &mut dyn RngCore,
    ) -> Option<TerrainElement>;
}

#[async_trait]
pub trait SessionObserver: Send + Sync {
    async fn on_event(&self, event: &SessionEvent) -> Result<()>;
}
