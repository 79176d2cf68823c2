use clap::{Parser, ValueEnum};
use mam::app::export::{write_bundle, TerrainRegion};
use mam::config::settings::WorldConfig;
use mam::domain::model::{TerrainMode, TileCoord};
use mam::utils::logger::{self, LogFormat};
use mam::utils::validation::Validate;
use mam::{IsoGrid, LocalStorage, TerrainGenerator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Ascii,
    Csv,
    Census,
    Bundle,
}

#[derive(Parser)]
#[command(name = "terrain-map")]
#[command(about = "Inspect or export the generated forest for a rectangle of tiles")]
struct Args {
    #[arg(long, default_value = "12345", allow_hyphen_values = true)]
    seed: i64,

    #[arg(long, default_value = "quantum")]
    mode: TerrainMode,

    #[arg(long, default_value = "16")]
    chunk_size: i64,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    min_x: i64,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    min_y: i64,

    #[arg(long, default_value = "64")]
    width: i64,

    #[arg(long, default_value = "32")]
    height: i64,

    #[arg(long, value_enum, default_value = "ascii")]
    format: Format,

    /// Directory for bundle output
    #[arg(long, default_value = "./output")]
    output_path: String,

    /// Bundle file name
    #[arg(long, default_value = "terrain.zip")]
    bundle_file: String,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(LogFormat::Compact, args.verbose);

    let world = WorldConfig {
        master_seed: args.seed,
        terrain_mode: args.mode,
        chunk_size: args.chunk_size,
        ..WorldConfig::default()
    };
    if let Err(e) = world.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let grid = IsoGrid::from_world(&world);
    let region = match TerrainRegion::collect(
        &TerrainGenerator::from_world(&world),
        &grid,
        args.mode,
        TileCoord::new(args.min_x, args.min_y),
        args.width,
        args.height,
    ) {
        Ok(region) => region,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match args.format {
        Format::Ascii => print!("{}", region.ascii_map(None)),
        Format::Csv => print!("{}", region.tiles_csv()?),
        Format::Census => {
            for (element, count) in region.census() {
                println!("{:<18} {}", element, count);
            }
        }
        Format::Bundle => {
            let storage = LocalStorage::new(args.output_path.clone());
            let summary = serde_json::to_vec_pretty(&region.summary())?;
            write_bundle(&storage, &args.bundle_file, &region, None, &summary).await?;
            println!(
                "📦 Bundle saved to: {}",
                storage.resolve(&args.bundle_file).display()
            );
        }
    }

    Ok(())
}
