use crate::config::settings::WorldConfig;
use crate::core::iso::IsoGrid;
use crate::core::quantum::quantum_terrain;
use crate::domain::model::{Chunk, ChunkCoord, Placement, TerrainElement, TerrainMode, TileCoord};
use crate::domain::ports::TerrainSource;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const SEED_MODULUS: f64 = 2_147_483_647.0;

/// Per-chunk seed derived from the chunk's center tile.
///
/// Mixes a smooth trigonometric term with a spatial hash so neighbouring
/// chunks get unrelated seeds. The XOR runs on 64-bit two's-complement
/// integers, which keeps negative chunk coordinates well defined.
pub fn chunk_seed(master_seed: i64, chunk: ChunkCoord, chunk_size: i64) -> u64 {
    let center_x = chunk.x * chunk_size + chunk_size / 2;
    let center_y = chunk.y * chunk_size + chunk_size / 2;

    let trig = master_seed as f64 * (center_x as f64 * 0.1).sin() * (center_y as f64 * 0.1).cos();
    let hash = center_x.wrapping_mul(73_856_093) ^ center_y.wrapping_mul(19_349_663);
    let combined = trig + hash as f64;

    ((combined * 1000.0).abs() % SEED_MODULUS) as u64
}

/// Classic seeded scatter: about a third trees, then stones, logs and bushes.
pub fn random_terrain<R: Rng + ?Sized>(rng: &mut R) -> Option<TerrainElement> {
    let noise: f64 = rng.gen();

    if noise < 0.35 {
        let tree_type: f64 = rng.gen();
        Some(if tree_type < 0.3 {
            TerrainElement::TreeBlocksFall
        } else if tree_type < 0.5 {
            TerrainElement::TreeOakFall
        } else if tree_type < 0.7 {
            TerrainElement::TreeDefaultFall
        } else if tree_type < 0.85 {
            TerrainElement::TreeFatFall
        } else {
            TerrainElement::TreeThinFall
        })
    } else if noise < 0.40 {
        Some(if rng.gen::<f64>() < 0.7 {
            TerrainElement::StoneTall
        } else {
            TerrainElement::StoneLarge
        })
    } else if noise < 0.43 {
        Some(if rng.gen::<f64>() < 0.6 {
            TerrainElement::Log
        } else {
            TerrainElement::LogLarge
        })
    } else if noise < 0.48 {
        Some(TerrainElement::BushSmall)
    } else {
        None
    }
}

/// The forest generator: quantum phases or seeded scatter, by mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainGenerator {
    master_seed: i64,
}

impl TerrainGenerator {
    pub fn new(master_seed: i64) -> Self {
        Self { master_seed }
    }

    pub fn from_world(world: &WorldConfig) -> Self {
        Self::new(world.master_seed)
    }

    pub fn master_seed(&self) -> i64 {
        self.master_seed
    }
}

impl TerrainSource for TerrainGenerator {
    fn chunk_seed(&self, chunk: ChunkCoord, chunk_size: i64) -> u64 {
        chunk_seed(self.master_seed, chunk, chunk_size)
    }

    fn element_at(
        &self,
        tile: TileCoord,
        mode: TerrainMode,
        rng: &mut dyn RngCore,
    ) -> Option<TerrainElement> {
        match mode {
            TerrainMode::Quantum => quantum_terrain(tile.x, tile.y),
            TerrainMode::Random => random_terrain(rng),
        }
    }
}

/// Builds every placement of a chunk from a terrain source.
pub fn generate_chunk<T: TerrainSource + ?Sized>(
    source: &T,
    grid: &IsoGrid,
    coord: ChunkCoord,
    mode: TerrainMode,
) -> Chunk {
    let seed = source.chunk_seed(coord, grid.chunk_size);
    let mut rng = StdRng::seed_from_u64(seed);

    let placements = grid
        .chunk_tiles(coord)
        .map(|tile| Placement {
            tile,
            position: grid.iso_to_screen(tile),
            element: source.element_at(tile, mode, &mut rng),
        })
        .collect();

    Chunk {
        coord,
        seed,
        mode,
        placements,
    }
}
