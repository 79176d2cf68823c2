pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::config::settings::{
        LeaderboardSettings, RunnerConfig, SessionSettings, WorldConfig,
    };
    use crate::domain::model::{ScriptedInput, TerrainMode};
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_path, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "mam")]
    #[command(about = "Run a headless session of the infinite isometric forest runner")]
    pub struct CliConfig {
        #[arg(long, default_value = "12345", allow_hyphen_values = true)]
        pub seed: i64,

        #[arg(long, default_value = "quantum", help = "Terrain mode: quantum or random")]
        pub mode: TerrainMode,

        #[arg(long, default_value = "4")]
        pub render_distance: i64,

        #[arg(long, default_value = "16")]
        pub chunk_size: i64,

        #[arg(long, default_value = "3600")]
        pub max_ticks: u64,

        #[arg(long, default_value = "player")]
        pub player: String,

        #[arg(
            long = "input",
            help = "Scripted input as tick:action:key, e.g. 30:press:left (repeatable)"
        )]
        pub inputs: Vec<ScriptedInput>,

        #[arg(long, help = "Run at real-time speed instead of as fast as possible")]
        pub paced: bool,

        #[arg(long, default_value = "60")]
        pub ticks_per_second: u32,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, help = "Write the run report as JSON to this file under the output path")]
        pub report_file: Option<String>,

        #[arg(long, help = "Record the result on the local leaderboard")]
        pub record: bool,

        #[arg(long, default_value = "leaderboard.json")]
        pub leaderboard_file: String,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn world(&self) -> WorldConfig {
            WorldConfig {
                chunk_size: self.chunk_size,
                render_distance: self.render_distance,
                master_seed: self.seed,
                terrain_mode: self.mode,
                ..WorldConfig::default()
            }
        }

        fn runner(&self) -> RunnerConfig {
            RunnerConfig::default()
        }

        fn session(&self) -> SessionSettings {
            SessionSettings {
                player: self.player.clone(),
                max_ticks: self.max_ticks,
                ticks_per_second: self.ticks_per_second,
                paced: self.paced,
                ..SessionSettings::default()
            }
        }

        fn leaderboard(&self) -> LeaderboardSettings {
            LeaderboardSettings {
                enabled: self.record,
                file: self.leaderboard_file.clone(),
                ..LeaderboardSettings::default()
            }
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn report_file(&self) -> Option<&str> {
            self.report_file.as_deref()
        }

        fn inputs(&self) -> Vec<ScriptedInput> {
            self.inputs.clone()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            self.world().validate()?;
            self.session().validate()?;
            self.leaderboard().validate()?;
            validate_path("output_path", &self.output_path)?;
            if let Some(file) = &self.report_file {
                validate_path("report_file", file)?;
            }
            Ok(())
        }
    }

}
