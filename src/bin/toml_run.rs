use clap::Parser;
use mam::config::toml_config::TomlConfig;
use mam::domain::model::TerrainMode;
use mam::domain::ports::ConfigProvider;
use mam::utils::logger::{self, LogFormat};
use mam::utils::validation::Validate;
use mam::{LocalStorage, MamEngine, TracingObserver};

#[derive(Parser)]
#[command(name = "toml-run")]
#[command(about = "Run a forest session described by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "mam.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the terrain mode from config
    #[arg(long)]
    mode: Option<TerrainMode>,

    /// Show what would run without simulating
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(LogFormat::from_json_flag(config.json_logs()), args.verbose);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(mode) = args.mode {
        config.world.terrain_mode = mode;
        tracing::info!("🔧 Terrain mode overridden to: {}", mode);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No simulation will run");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = MamEngine::new_with_monitoring(storage.clone(), config, monitor_enabled);

    match engine.run(&TracingObserver).await {
        Ok(outcome) => {
            println!("✅ Session completed");
            println!("🏁 Distance: {} in {} ticks", outcome.report.score, outcome.report.ticks);
            if let Some(path) = outcome.report_path {
                println!("📁 Report saved to: {}", storage.resolve(&path).display());
            }
            if let Some(rank) = outcome.rank {
                println!("🏆 Leaderboard rank: #{}", rank);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Session: {} ({})", config.session.name, config.session.player);
    println!(
        "  World: seed {}, {} mode, chunk {} tiles, render distance {}",
        config.world.master_seed,
        config.world.terrain_mode,
        config.world.chunk_size,
        config.world.render_distance
    );
    println!(
        "  Runner: speed {}, turn {} rad/tick",
        config.runner.speed, config.runner.turn_speed
    );
    println!("  Max ticks: {}", config.session.max_ticks);
    println!("  Output: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🌲 World:");
    println!(
        "  Initial window: {} chunks ({} tiles)",
        config.world.window_chunks(),
        config.world.window_chunks() as i64 * config.world.chunk_size * config.world.chunk_size
    );
    println!("  Spawn: {:?}", config.world.spawn_point());

    println!();
    println!("⏱️ Timing:");
    if config.session.paced {
        println!(
            "  Paced at {} ticks/s, up to {:.1}s",
            config.session.ticks_per_second,
            config.session.max_ticks as f64 / config.session.ticks_per_second as f64
        );
    } else {
        println!("  Unpaced, up to {} ticks", config.session.max_ticks);
    }

    if !config.inputs.is_empty() {
        println!();
        println!("🎮 Scripted Inputs:");
        for input in &config.inputs {
            println!("  tick {:>6}: {:?} {:?}", input.tick, input.action, input.key);
        }
    }

    println!();
    println!("💾 Output:");
    match config.report_file() {
        Some(file) => println!("  Report: {}/{}", config.output_path(), file),
        None => println!("  Report: not written"),
    }
    if config.leaderboard.enabled {
        println!(
            "  Leaderboard: {} (top {})",
            config.leaderboard.file, config.leaderboard.capacity
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
