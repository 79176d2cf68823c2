use crate::core::generator::generate_chunk;
use crate::core::iso::IsoGrid;
use crate::domain::model::{ChunkCoord, Layer, Placement, TerrainMode, TileCoord};
use crate::domain::ports::{Storage, TerrainSource};
use crate::utils::error::{MamError, Result};
use crate::utils::validation::validate_range;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const MAX_REGION_SIDE: i64 = 4096;
pub const MAX_REGION_TILES: i64 = 1_000_000;
/// Tile coordinates beyond this no longer map to exact screen positions.
pub const MAX_TILE_COORD: i64 = 1 << 48;

/// A rectangle of generated tiles, independent of any running session.
#[derive(Debug, Clone)]
pub struct TerrainRegion {
    pub min: TileCoord,
    pub width: i64,
    pub height: i64,
    pub mode: TerrainMode,
    placements: BTreeMap<TileCoord, Placement>,
}

#[derive(Debug, Serialize)]
struct TileRecord<'a> {
    tile_x: i64,
    tile_y: i64,
    screen_x: f64,
    screen_y: f64,
    element: &'a str,
    layer: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegionSummary {
    pub min: TileCoord,
    pub width: i64,
    pub height: i64,
    pub mode: TerrainMode,
    pub tiles: usize,
    pub census: BTreeMap<String, u64>,
}

impl TerrainRegion {
    pub fn collect<T: TerrainSource + ?Sized>(
        source: &T,
        grid: &IsoGrid,
        mode: TerrainMode,
        min: TileCoord,
        width: i64,
        height: i64,
    ) -> Result<Self> {
        validate_range("region.width", width, 1, MAX_REGION_SIDE)?;
        validate_range("region.height", height, 1, MAX_REGION_SIDE)?;
        if width * height > MAX_REGION_TILES {
            return Err(MamError::InvalidConfigValueError {
                field: "region".to_string(),
                value: format!("{}x{}", width, height),
                reason: format!("Region may cover at most {} tiles", MAX_REGION_TILES),
            });
        }

        let max = match (min.x.checked_add(width - 1), min.y.checked_add(height - 1)) {
            (Some(x), Some(y)) => TileCoord::new(x, y),
            _ => {
                return Err(MamError::InvalidConfigValueError {
                    field: "region".to_string(),
                    value: format!("{}x{} at ({}, {})", width, height, min.x, min.y),
                    reason: "Region extends past the representable tile range".to_string(),
                })
            }
        };
        for (field, value) in [
            ("region.min_x", min.x),
            ("region.min_y", min.y),
            ("region.max_x", max.x),
            ("region.max_y", max.y),
        ] {
            validate_range(field, value, -MAX_TILE_COORD, MAX_TILE_COORD)?;
        }
        let first = grid.tile_to_chunk(min);
        let last = grid.tile_to_chunk(max);
        let inside = |tile: &TileCoord| {
            (min.x..=max.x).contains(&tile.x) && (min.y..=max.y).contains(&tile.y)
        };

        let mut placements = BTreeMap::new();
        for cx in first.x..=last.x {
            for cy in first.y..=last.y {
                let chunk = generate_chunk(source, grid, ChunkCoord::new(cx, cy), mode);
                placements.extend(
                    chunk
                        .placements
                        .into_iter()
                        .filter(|p| inside(&p.tile))
                        .map(|p| (p.tile, p)),
                );
            }
        }

        tracing::debug!(
            "Collected {} tiles from {} chunks",
            placements.len(),
            (last.x - first.x + 1) * (last.y - first.y + 1)
        );

        Ok(Self {
            min,
            width,
            height,
            mode,
            placements,
        })
    }

    /// A square region of `radius` tiles around `center`.
    pub fn around<T: TerrainSource + ?Sized>(
        source: &T,
        grid: &IsoGrid,
        mode: TerrainMode,
        center: TileCoord,
        radius: i64,
    ) -> Result<Self> {
        validate_range("region.radius", radius, 0, (MAX_REGION_SIDE - 1) / 2)?;
        let min = match (center.x.checked_sub(radius), center.y.checked_sub(radius)) {
            (Some(x), Some(y)) => TileCoord::new(x, y),
            _ => {
                return Err(MamError::InvalidConfigValueError {
                    field: "region.center".to_string(),
                    value: format!("({}, {})", center.x, center.y),
                    reason: "Region extends past the representable tile range".to_string(),
                })
            }
        };
        let side = radius * 2 + 1;
        Self::collect(source, grid, mode, min, side, side)
    }

    pub fn get(&self, tile: TileCoord) -> Option<&Placement> {
        self.placements.get(&tile)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Grid view: one row per tile y, one column per tile x. `@` marks `marker`.
    pub fn ascii_map(&self, marker: Option<TileCoord>) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in self.min.y..self.min.y + self.height {
            for x in self.min.x..self.min.x + self.width {
                let tile = TileCoord::new(x, y);
                let glyph = if marker == Some(tile) {
                    '@'
                } else {
                    self.get(tile)
                        .and_then(|p| p.element)
                        .map(|e| e.glyph())
                        .unwrap_or('.')
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    pub fn tiles_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for placement in self.placements.values() {
            let (element, layer) = match placement.element {
                Some(element) => (element.name(), element.layer()),
                None => ("", Layer::Ground),
            };
            writer.serialize(TileRecord {
                tile_x: placement.tile.x,
                tile_y: placement.tile.y,
                screen_x: placement.position.x,
                screen_y: placement.position.y,
                element,
                layer: layer.name(),
            })?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| MamError::IoError(e.into_error()))?;
        String::from_utf8(data).map_err(|e| MamError::ExportError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }

    pub fn census(&self) -> BTreeMap<String, u64> {
        let mut census = BTreeMap::new();
        for element in self.placements.values().filter_map(|p| p.element) {
            *census.entry(element.name().to_string()).or_insert(0) += 1;
        }
        census
    }

    pub fn summary(&self) -> RegionSummary {
        RegionSummary {
            min: self.min,
            width: self.width,
            height: self.height,
            mode: self.mode,
            tiles: self.len(),
            census: self.census(),
        }
    }
}

/// Packs named files into an in-memory ZIP archive.
pub fn bundle(files: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Writes `map.txt`, `tiles.csv` and `report.json` as one ZIP through `storage`.
pub async fn write_bundle<S: Storage>(
    storage: &S,
    file: &str,
    region: &TerrainRegion,
    marker: Option<TileCoord>,
    report_json: &[u8],
) -> Result<String> {
    let map = region.ascii_map(marker);
    let csv = region.tiles_csv()?;
    let data = bundle(&[
        ("map.txt", map.as_bytes()),
        ("tiles.csv", csv.as_bytes()),
        ("report.json", report_json),
    ])?;

    tracing::debug!("Writing bundle {} ({} bytes)", file, data.len());
    storage.write_file(file, &data).await?;
    Ok(file.to_string())
}
