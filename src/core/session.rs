use crate::config::settings::{RunnerConfig, WorldConfig};
use crate::core::chunks::{ChunkDelta, ChunkManager};
use crate::core::iso::IsoGrid;
use crate::core::physics::PhysicsEngine;
use crate::core::runner::{Runner, Turn};
use crate::core::scene::{hud_lines, Scene};
use crate::domain::model::{
    InputEvent, Key, RunReport, ScreenPoint, ScriptedInput, SessionEvent, TerrainMode,
};
use crate::domain::ports::{SessionObserver, TerrainSource};
use crate::utils::error::{MamError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The run is over; nothing moved.
    Idle,
    Moved { dx: f64, dy: f64, chunks: ChunkDelta },
    GameOver { distance: f64 },
}

/// One endless run: a runner, the forest streamed around it, and the score.
pub struct GameSession<T: TerrainSource> {
    world: WorldConfig,
    runner_config: RunnerConfig,
    chunks: ChunkManager<T>,
    physics: PhysicsEngine,
    runner: Runner,
    camera: ScreenPoint,
    state: SessionState,
    distance: f64,
    ticks: u64,
    restarts: u32,
    wall_radius: f64,
}

impl<T: TerrainSource> GameSession<T> {
    pub fn new(source: T, world: WorldConfig, runner_config: RunnerConfig) -> Self {
        let grid = IsoGrid::from_world(&world);
        let half_extent = runner_config.half_extent * runner_config.scale;
        // farthest a wall center can be while its hitbox still touches the body after one step
        let wall_radius = world.tile_width.max(world.tile_height) * 1.5
            + half_extent * 2.0
            + runner_config.speed;

        let spawn = world.spawn_point();
        let mut session = Self {
            chunks: ChunkManager::new(source, grid, world.render_distance, world.terrain_mode),
            physics: PhysicsEngine::new(half_extent),
            runner: Runner::new(&runner_config, spawn),
            camera: spawn,
            state: SessionState::Running,
            distance: 0.0,
            ticks: 0,
            restarts: 0,
            wall_radius,
            world,
            runner_config,
        };
        session.setup();
        session
    }

    /// Resets the runner, camera and score and streams a fresh world. The terrain mode is kept.
    fn setup(&mut self) {
        let spawn = self.world.spawn_point();
        self.chunks.clear();
        self.runner = Runner::new(&self.runner_config, spawn);
        self.camera = spawn;
        self.state = SessionState::Running;
        self.distance = 0.0;
        self.chunks.update(self.camera);

        tracing::debug!(
            "World ready: {} chunks around {:?}, mode {}",
            self.chunks.active_count(),
            self.camera,
            self.chunks.mode()
        );
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Option<SessionEvent> {
        if self.state == SessionState::GameOver {
            if let InputEvent::Press(key) = event {
                if key == Key::R {
                    self.restarts += 1;
                    self.setup();
                    tracing::info!("Restarted run #{}", self.restarts);
                    return Some(SessionEvent::Restarted {
                        restarts: self.restarts,
                    });
                }
                return None;
            }
        }

        match event {
            InputEvent::Press(Key::Left | Key::A) => self.runner.turn = Turn::Left,
            InputEvent::Press(Key::Right | Key::D) => self.runner.turn = Turn::Right,
            InputEvent::Press(Key::Q) => {
                let mode = self.chunks.mode().toggled();
                self.chunks.set_mode(mode);
                tracing::info!("Switched to {} terrain generation", mode);
                return Some(SessionEvent::ModeToggled { mode });
            }
            InputEvent::Release(Key::Left | Key::A) if self.runner.turn == Turn::Left => {
                self.runner.turn = Turn::Straight
            }
            InputEvent::Release(Key::Right | Key::D) if self.runner.turn == Turn::Right => {
                self.runner.turn = Turn::Straight
            }
            _ => {}
        }
        None
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state == SessionState::GameOver {
            return TickOutcome::Idle;
        }
        self.ticks += 1;

        self.runner.apply_turn();
        let (vx, vy) = self.runner.velocity();
        let from = self.runner.position;

        let to = {
            let walls = self.chunks.walls_near(from, self.wall_radius);
            self.physics.step(from, vx, vy, &walls)
        };
        self.runner.position = to;

        let (dx, dy) = (to.x - from.x, to.y - from.y);
        if dx.abs() < vx.abs() * 0.5 || dy.abs() < vy.abs() * 0.5 {
            self.state = SessionState::GameOver;
            tracing::info!("Game Over! Distance traveled: {}", self.score());
            return TickOutcome::GameOver {
                distance: self.distance,
            };
        }

        self.distance += dx.hypot(dy);
        self.camera = self.camera.offset(dx, dy);
        let chunks = self.chunks.update(self.camera);
        self.runner.animation.advance();

        TickOutcome::Moved { dx, dy, chunks }
    }

    /// Drives the session for up to `max_ticks` loop steps.
    ///
    /// Scripted inputs fire at the start of their step. The loop ends early
    /// once the run is over and no later `R` press can restart it.
    pub async fn run<O: SessionObserver + ?Sized>(
        &mut self,
        script: &[ScriptedInput],
        max_ticks: u64,
        pacing: Option<Duration>,
        observer: &O,
    ) -> Result<()> {
        if max_ticks == 0 {
            return Err(MamError::SimulationError {
                message: "max_ticks must be at least 1".to_string(),
            });
        }

        let mut script: Vec<ScriptedInput> = script.to_vec();
        script.sort_by_key(|input| input.tick);
        let mut next_input = 0;

        let mut interval = pacing.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval
        });

        for step in 0..max_ticks {
            if let Some(interval) = interval.as_mut() {
                interval.tick().await;
            }

            while next_input < script.len() && script[next_input].tick <= step {
                let input = script[next_input];
                next_input += 1;
                if let Some(event) = self.handle_input(input.event()) {
                    observer.on_event(&event).await?;
                }
            }

            if self.state == SessionState::GameOver {
                let restart_pending = script[next_input..]
                    .iter()
                    .any(|input| input.event() == InputEvent::Press(Key::R));
                if restart_pending {
                    continue;
                }
                break;
            }

            match self.tick() {
                TickOutcome::Moved { chunks, .. } if !chunks.is_empty() => {
                    observer
                        .on_event(&SessionEvent::ChunksStreamed {
                            loaded: chunks.loaded.len(),
                            evicted: chunks.evicted.len(),
                        })
                        .await?;
                }
                TickOutcome::GameOver { distance } => {
                    observer
                        .on_event(&SessionEvent::GameOver {
                            tick: step,
                            distance,
                        })
                        .await?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn report(
        &self,
        session: &str,
        player: &str,
        started_at: DateTime<Utc>,
    ) -> RunReport {
        RunReport {
            session: session.to_string(),
            player: player.to_string(),
            master_seed: self.world.master_seed,
            mode: self.chunks.mode(),
            ticks: self.ticks,
            distance: self.distance,
            score: self.score(),
            game_over: self.is_game_over(),
            restarts: self.restarts,
            final_position: self.runner.position,
            final_direction: self.runner.direction,
            chunks_generated: self.chunks.generated_count(),
            chunks_evicted: self.chunks.evicted_count(),
            active_chunks: self.chunks.active_count(),
            census: self.chunks.census(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn scene(&self) -> Scene {
        Scene::snapshot(&self.chunks, &self.runner)
    }

    pub fn hud(&self) -> Vec<String> {
        hud_lines(self.distance, self.is_game_over())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn score(&self) -> u64 {
        self.distance as u64
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn camera(&self) -> ScreenPoint {
        self.camera
    }

    pub fn mode(&self) -> TerrainMode {
        self.chunks.mode()
    }

    pub fn chunks(&self) -> &ChunkManager<T> {
        &self.chunks
    }
}

/// Logs session events; the observer used by the binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

#[async_trait]
impl SessionObserver for TracingObserver {
    async fn on_event(&self, event: &SessionEvent) -> Result<()> {
        match event {
            SessionEvent::ChunksStreamed { loaded, evicted } => {
                tracing::debug!("Chunks streamed: +{} -{}", loaded, evicted)
            }
            SessionEvent::ModeToggled { mode } => tracing::info!("🌲 Terrain mode: {}", mode),
            SessionEvent::GameOver { tick, distance } => {
                tracing::info!("💥 Crashed at tick {} after {:.1}px", tick, distance)
            }
            SessionEvent::Restarted { restarts } => tracing::info!("🔁 Restart #{}", restarts),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{KeyAction, TerrainElement, TileCoord};
    use rand::RngCore;
    use std::sync::Mutex;

    /// Empty meadow with an optional wall of stones along one tile column.
    struct Meadow {
        stone_column: Option<i64>,
    }

    impl TerrainSource for Meadow {
        fn chunk_seed(&self, _chunk: crate::domain::model::ChunkCoord, _chunk_size: i64) -> u64 {
            0
        }

        fn element_at(
            &self,
            tile: TileCoord,
            _mode: TerrainMode,
            _rng: &mut dyn RngCore,
        ) -> Option<TerrainElement> {
            match self.stone_column {
                Some(column) if tile.x == column => Some(TerrainElement::StoneLarge),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SessionEvent>>,
    }

    #[async_trait]
    impl SessionObserver for Recorder {
        async fn on_event(&self, event: &SessionEvent) -> Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn small_world() -> WorldConfig {
        WorldConfig {
            chunk_size: 8,
            render_distance: 1,
            ..WorldConfig::default()
        }
    }

    fn meadow(stone_column: Option<i64>) -> GameSession<Meadow> {
        GameSession::new(Meadow { stone_column }, small_world(), RunnerConfig::default())
    }

    fn input(tick: u64, action: KeyAction, key: Key) -> ScriptedInput {
        ScriptedInput { tick, key, action }
    }

    #[test]
    fn test_open_meadow_accumulates_distance() {
        let mut session = meadow(None);
        for _ in 0..10 {
            assert!(matches!(session.tick(), TickOutcome::Moved { .. }));
        }
        assert!((session.distance() - 80.0).abs() < 1e-9);
        assert_eq!(session.ticks(), 10);
        assert_eq!(session.runner().animation.frame(), 1);
        assert!(session.camera().distance_to(&session.runner().position) < 1e-9);
    }

    #[test]
    fn test_hitting_stones_ends_the_run() {
        let world = small_world();
        let grid = IsoGrid::from_world(&world);
        let spawn_tile = grid.screen_to_tile(world.spawn_point());
        let mut session = meadow(Some(spawn_tile.x + 3));

        let mut crashed = false;
        for _ in 0..200 {
            if let TickOutcome::GameOver { .. } = session.tick() {
                crashed = true;
                break;
            }
        }
        assert!(crashed);
        assert!(session.is_game_over());
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.hud()[1], "GAME OVER!");
    }

    #[test]
    fn test_turn_keys_and_release() {
        let mut session = meadow(None);
        session.handle_input(InputEvent::Press(Key::A));
        assert_eq!(session.runner().turn, Turn::Left);
        // releasing the other side does nothing
        session.handle_input(InputEvent::Release(Key::Right));
        assert_eq!(session.runner().turn, Turn::Left);
        session.handle_input(InputEvent::Release(Key::Left));
        assert_eq!(session.runner().turn, Turn::Straight);

        session.handle_input(InputEvent::Press(Key::D));
        session.tick();
        assert!((session.runner().direction - (std::f64::consts::FRAC_PI_4 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_q_toggles_mode() {
        let mut session = meadow(None);
        assert_eq!(
            session.handle_input(InputEvent::Press(Key::Q)),
            Some(SessionEvent::ModeToggled {
                mode: TerrainMode::Random
            })
        );
        assert_eq!(session.mode(), TerrainMode::Random);
    }

    #[test]
    fn test_only_r_works_after_game_over() {
        let mut session = meadow(None);
        session.state = SessionState::GameOver;

        assert_eq!(session.handle_input(InputEvent::Press(Key::Q)), None);
        assert_eq!(session.mode(), TerrainMode::Quantum);
        assert_eq!(session.handle_input(InputEvent::Press(Key::Left)), None);
        assert_eq!(session.runner().turn, Turn::Straight);

        assert_eq!(
            session.handle_input(InputEvent::Press(Key::R)),
            Some(SessionEvent::Restarted { restarts: 1 })
        );
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.distance(), 0.0);
        assert_eq!(session.runner().position, small_world().spawn_point());
    }

    #[test]
    fn test_mode_survives_restart() {
        let mut session = meadow(None);
        session.handle_input(InputEvent::Press(Key::Q));
        session.state = SessionState::GameOver;

        session.handle_input(InputEvent::Press(Key::R));
        assert_eq!(session.mode(), TerrainMode::Random);
        assert!(session.chunks().active_count() > 0);
        assert!(session
            .chunks()
            .active_chunks()
            .iter()
            .all(|state| state.chunk.mode == TerrainMode::Random));
    }

    #[test]
    fn test_release_is_handled_after_game_over() {
        let mut session = meadow(None);
        session.handle_input(InputEvent::Press(Key::Right));
        session.state = SessionState::GameOver;

        assert_eq!(session.handle_input(InputEvent::Release(Key::Left)), None);
        assert_eq!(session.runner().turn, Turn::Right);
        assert_eq!(session.handle_input(InputEvent::Release(Key::D)), None);
        assert_eq!(session.runner().turn, Turn::Straight);
        assert!(session.is_game_over());
    }

    #[test]
    fn test_r_while_running_is_ignored() {
        let mut session = meadow(None);
        session.tick();
        assert_eq!(session.handle_input(InputEvent::Press(Key::R)), None);
        assert!(session.distance() > 0.0);
    }

    #[tokio::test]
    async fn test_run_stops_at_max_ticks() {
        let mut session = meadow(None);
        let recorder = Recorder::default();
        session.run(&[], 25, None, &recorder).await.unwrap();
        assert_eq!(session.ticks(), 25);
        assert!(!session.is_game_over());
    }

    #[tokio::test]
    async fn test_run_fires_script_and_reports_events() {
        let mut session = meadow(None);
        let recorder = Recorder::default();
        let script = [
            input(3, KeyAction::Press, Key::Q),
            input(1, KeyAction::Press, Key::Left),
            input(4, KeyAction::Release, Key::Left),
        ];
        session.run(&script, 10, None, &recorder).await.unwrap();

        let events = recorder.events.lock().unwrap();
        assert!(events.contains(&SessionEvent::ModeToggled {
            mode: TerrainMode::Random
        }));
        // turning for ticks 1..=3
        let expected = std::f64::consts::FRAC_PI_4 - 0.3;
        assert!((session.runner().direction - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_run_ends_early_on_crash_unless_restart_pending() {
        let world = small_world();
        let grid = IsoGrid::from_world(&world);
        let column = grid.screen_to_tile(world.spawn_point()).x + 3;

        let mut session = meadow(Some(column));
        let recorder = Recorder::default();
        session.run(&[], 1000, None, &recorder).await.unwrap();
        assert!(session.is_game_over());
        let crash_ticks = session.ticks();
        assert!(crash_ticks < 1000);

        let mut session = meadow(Some(column));
        let recorder = Recorder::default();
        let script = [input(crash_ticks + 5, KeyAction::Press, Key::R)];
        session.run(&script, crash_ticks + 10, None, &recorder).await.unwrap();
        let events = recorder.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::GameOver { .. })));
        assert!(events.contains(&SessionEvent::Restarted { restarts: 1 }));
    }

    #[tokio::test]
    async fn test_run_rejects_zero_ticks() {
        let mut session = meadow(None);
        let result = session.run(&[], 0, None, &TracingObserver).await;
        assert!(matches!(result, Err(MamError::SimulationError { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_run_uses_interval() {
        let mut session = meadow(None);
        session
            .run(&[], 5, Some(Duration::from_millis(16)), &TracingObserver)
            .await
            .unwrap();
        assert_eq!(session.ticks(), 5);
    }

    #[test]
    fn test_report_reflects_session() {
        let mut session = meadow(None);
        for _ in 0..3 {
            session.tick();
        }
        let started = Utc::now();
        let report = session.report("unit", "tester", started);
        assert_eq!(report.ticks, 3);
        assert!((report.distance - 24.0).abs() < 1e-9);
        assert_eq!(report.score, session.score());
        assert_eq!(report.master_seed, 12345);
        assert!(!report.game_over);
        assert_eq!(report.active_chunks, 9);
        assert!(report.finished_at >= started);
    }
}
