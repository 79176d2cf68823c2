use crate::core::generator::TerrainGenerator;
use crate::core::leaderboard::Leaderboard;
use crate::core::session::GameSession;
use crate::domain::model::{LeaderboardEntry, RunReport};
use crate::domain::ports::{ConfigProvider, SessionObserver, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::{ResourceMonitor, ResourceSample};
use chrono::Utc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub report: RunReport,
    /// Where the JSON report was written, relative to the storage root.
    pub report_path: Option<String>,
    /// Leaderboard rank, when the run was recorded and made the board.
    pub rank: Option<usize>,
    /// Per-phase resource usage; empty unless monitoring was on.
    pub resources: Vec<ResourceSample>,
}

/// Runs one configured session end to end: build the world, simulate, record.
pub struct MamEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    monitoring: bool,
}

impl<S: Storage, C: ConfigProvider> MamEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::new_with_monitoring(storage, config, false)
    }

    pub fn new_with_monitoring(storage: S, config: C, monitor_enabled: bool) -> Self {
        Self {
            storage,
            config,
            monitoring: monitor_enabled,
        }
    }

    pub async fn run<O: SessionObserver + ?Sized>(&self, observer: &O) -> Result<EngineOutcome> {
        let world = self.config.world();
        let settings = self.config.session();
        let started_at = Utc::now();
        let mut monitor = ResourceMonitor::new(self.monitoring);

        tracing::info!(
            "🚀 Starting session '{}' for {} (seed {}, {} mode)",
            settings.name,
            settings.player,
            world.master_seed,
            world.terrain_mode
        );

        let generator = TerrainGenerator::from_world(&world);
        let mut session = GameSession::new(generator, world, self.config.runner());
        tracing::info!("🌲 Streamed {} chunks", session.chunks().active_count());
        monitor.sample("World setup");

        let pacing = settings
            .paced
            .then(|| Duration::from_secs_f64(1.0 / settings.ticks_per_second as f64));
        session
            .run(&self.config.inputs(), settings.max_ticks, pacing, observer)
            .await?;
        monitor.sample("Simulation");

        let report = session.report(&settings.name, &settings.player, started_at);
        tracing::info!(
            "🏁 Run finished: distance {}, {} ticks, {}",
            report.score,
            report.ticks,
            if report.game_over { "crashed" } else { "still running" }
        );

        let report_path = match self.config.report_file() {
            Some(file) => {
                let data = serde_json::to_vec_pretty(&report)?;
                self.storage.write_file(file, &data).await?;
                tracing::info!("📁 Report saved to: {}", file);
                Some(file.to_string())
            }
            None => None,
        };

        let rank = self.record(&report).await?;
        monitor.sample("Record");

        Ok(EngineOutcome {
            report,
            report_path,
            rank,
            resources: monitor.finish(),
        })
    }

    async fn record(&self, report: &RunReport) -> Result<Option<usize>> {
        let settings = self.config.leaderboard();
        if !settings.enabled {
            return Ok(None);
        }

        let mut board = Leaderboard::load(&self.storage, &settings.file, settings.capacity).await?;
        let rank = board.submit(LeaderboardEntry::from_report(report));
        board.save(&self.storage, &settings.file).await?;

        match rank {
            Some(rank) => tracing::info!("🏆 {} placed #{} on the leaderboard", report.player, rank),
            None => tracing::info!("Score {} did not make the leaderboard", report.score),
        }
        Ok(rank)
    }
}
