use crate::core::generator::generate_chunk;
use crate::core::iso::IsoGrid;
use crate::core::physics::{HitBox, Wall};
use crate::domain::model::{Chunk, ChunkCoord, ScreenPoint, TerrainElement, TerrainMode};
use crate::domain::ports::TerrainSource;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A generated chunk together with its colliding elements.
#[derive(Debug, Clone)]
pub struct ChunkState {
    pub chunk: Chunk,
    pub walls: Vec<Wall>,
}

impl ChunkState {
    fn build(chunk: Chunk, grid: &IsoGrid) -> Self {
        let walls = chunk
            .elements()
            .filter(|(_, element)| element.collides())
            .map(|(placement, element)| {
                Wall::new(
                    placement.tile,
                    placement.position,
                    element,
                    HitBox::for_element(element, grid.tile_width, grid.tile_height),
                )
            })
            .collect();
        Self { chunk, walls }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkDelta {
    pub loaded: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

impl ChunkDelta {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.evicted.is_empty()
    }
}

/// Keeps a square window of chunks alive around a moving focus.
pub struct ChunkManager<T: TerrainSource> {
    source: T,
    grid: IsoGrid,
    render_distance: i64,
    mode: TerrainMode,
    active: HashMap<ChunkCoord, ChunkState>,
    generated: u64,
    evicted: u64,
    census: BTreeMap<TerrainElement, u64>,
}

impl<T: TerrainSource> ChunkManager<T> {
    pub fn new(source: T, grid: IsoGrid, render_distance: i64, mode: TerrainMode) -> Self {
        Self {
            source,
            grid,
            render_distance,
            mode,
            active: HashMap::new(),
            generated: 0,
            evicted: 0,
            census: BTreeMap::new(),
        }
    }

    pub fn grid(&self) -> &IsoGrid {
        &self.grid
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn mode(&self) -> TerrainMode {
        self.mode
    }

    /// Only chunks streamed in after the switch use the new mode.
    pub fn set_mode(&mut self, mode: TerrainMode) {
        self.mode = mode;
    }

    pub fn needed(&self, focus: ScreenPoint) -> HashSet<ChunkCoord> {
        let center = self.grid.screen_to_chunk(focus);
        let r = self.render_distance;
        (-r..=r)
            .flat_map(|dx| (-r..=r).map(move |dy| ChunkCoord::new(center.x + dx, center.y + dy)))
            .collect()
    }

    pub fn update(&mut self, focus: ScreenPoint) -> ChunkDelta {
        let needed = self.needed(focus);

        let mut evicted: Vec<ChunkCoord> = self
            .active
            .keys()
            .filter(|coord| !needed.contains(coord))
            .copied()
            .collect();
        evicted.sort();
        for coord in &evicted {
            self.active.remove(coord);
        }

        let mut loaded: Vec<ChunkCoord> = needed
            .into_iter()
            .filter(|coord| !self.active.contains_key(coord))
            .collect();
        loaded.sort();
        for coord in &loaded {
            let chunk = generate_chunk(&self.source, &self.grid, *coord, self.mode);
            for (_, element) in chunk.elements() {
                *self.census.entry(element).or_insert(0) += 1;
            }
            self.active.insert(*coord, ChunkState::build(chunk, &self.grid));
        }

        self.generated += loaded.len() as u64;
        self.evicted += evicted.len() as u64;

        if !loaded.is_empty() || !evicted.is_empty() {
            tracing::debug!(
                "Streamed chunks around {}: +{} -{} ({} active, mode {})",
                self.grid.screen_to_chunk(focus),
                loaded.len(),
                evicted.len(),
                self.active.len(),
                self.mode
            );
        }

        ChunkDelta { loaded, evicted }
    }

    /// Walls whose center lies within `radius_px` world pixels of `point`.
    pub fn walls_near(&self, point: ScreenPoint, radius_px: f64) -> Vec<&Wall> {
        let center = self.grid.screen_to_chunk(point);
        // one grid step moves at least half the smaller tile side on screen
        let min_step = self.grid.tile_width.min(self.grid.tile_height) / 2.0;
        let reach = (radius_px / min_step / self.grid.chunk_size as f64).ceil() as i64 + 1;
        self.active
            .iter()
            .filter(|(coord, _)| coord.distance(&center) <= reach)
            .flat_map(|(_, state)| state.walls.iter())
            .filter(|wall| wall.position.distance_to(&point) <= radius_px)
            .collect()
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains_key(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkState> {
        self.active.get(&coord)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active chunks ordered by coordinate.
    pub fn active_chunks(&self) -> Vec<&ChunkState> {
        let mut chunks: Vec<&ChunkState> = self.active.values().collect();
        chunks.sort_by_key(|state| state.chunk.coord);
        chunks
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn generated_count(&self) -> u64 {
        self.generated
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted
    }

    /// Elements generated so far, by name.
    pub fn census(&self) -> BTreeMap<String, u64> {
        self.census
            .iter()
            .map(|(element, count)| (element.name().to_string(), *count))
            .collect()
    }
}
