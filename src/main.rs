use clap::Parser;
use mam::app::export::{write_bundle, TerrainRegion};
use mam::domain::ports::ConfigProvider;
use mam::utils::logger::{self, LogFormat};
use mam::utils::validation::Validate;
use mam::{CliConfig, IsoGrid, LocalStorage, MamEngine, TerrainGenerator, TracingObserver};

#[derive(Parser)]
#[command(name = "mam")]
#[command(about = "Run a headless session of the infinite isometric forest runner")]
struct Args {
    #[command(flatten)]
    config: CliConfig,

    #[arg(long, help = "Also export a ZIP of the terrain around the final position")]
    bundle: Option<String>,

    #[arg(long, default_value = "24", help = "Tiles around the runner included in the bundle")]
    bundle_radius: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config;

    logger::init_logger(LogFormat::from_json_flag(config.json_logs), config.verbose);

    tracing::info!("Starting mam");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let world = config.world();
    let storage = LocalStorage::new(config.output_path.clone());
    let engine = MamEngine::new_with_monitoring(storage.clone(), config.clone(), config.monitor);

    let outcome = match engine.run(&TracingObserver).await {
        Ok(outcome) => outcome,
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
    };

    let report = &outcome.report;
    println!("🏁 Distance: {}", report.score);
    println!("   Ticks: {}", report.ticks);
    println!("   Mode: {}", report.mode);
    println!(
        "   Chunks generated/evicted: {}/{}",
        report.chunks_generated, report.chunks_evicted
    );
    if report.game_over {
        println!("   💥 Crashed into the forest");
    }
    if let Some(path) = &outcome.report_path {
        println!("📁 Report saved to: {}", storage.resolve(path).display());
    }
    if let Some(rank) = outcome.rank {
        println!("🏆 Leaderboard rank: #{}", rank);
    }
    for sample in &outcome.resources {
        println!("📊 {}: {}MB, {:.1}% CPU", sample.phase, sample.memory_mb, sample.cpu_usage);
    }

    if let Some(file) = &args.bundle {
        let grid = IsoGrid::from_world(&world);
        let position = grid.screen_to_tile(report.final_position);
        let region = TerrainRegion::around(
            &TerrainGenerator::from_world(&world),
            &grid,
            report.mode,
            position,
            args.bundle_radius,
        )?;
        let report_json = serde_json::to_vec_pretty(report)?;
        write_bundle(&storage, file, &region, Some(position), &report_json).await?;
        println!("📦 Bundle saved to: {}", storage.resolve(file).display());
    }

    Ok(())
}
