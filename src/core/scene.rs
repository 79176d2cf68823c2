//! Renderer-facing view of the world: layered sprites and painter's order.

use crate::core::chunks::ChunkManager;
use crate::core::runner::Runner;
use crate::domain::model::{Layer, ScreenPoint, TerrainElement, TileCoord};
use crate::domain::ports::TerrainSource;
use serde::Serialize;

pub const CONTROLS_HINT: &str =
    "LEFT/A: Turn Left  |  RIGHT/D: Turn Right  |  Q: Toggle Terrain Mode";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SpriteKind {
    Grass,
    Element { element: TerrainElement },
    Runner { frame: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub layer: Layer,
    pub position: ScreenPoint,
    pub tile: Option<TileCoord>,
    pub kind: SpriteKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    ground: Vec<Sprite>,
    objects: Vec<Sprite>,
    walls: Vec<Sprite>,
    characters: Vec<Sprite>,
}

impl Scene {
    pub fn snapshot<T: TerrainSource>(chunks: &ChunkManager<T>, runner: &Runner) -> Self {
        let mut scene = Scene::default();

        for state in chunks.active_chunks() {
            for placement in &state.chunk.placements {
                scene.ground.push(Sprite {
                    layer: Layer::Ground,
                    position: placement.position,
                    tile: Some(placement.tile),
                    kind: SpriteKind::Grass,
                });

                if let Some(element) = placement.element {
                    let sprite = Sprite {
                        layer: element.layer(),
                        position: placement.position,
                        tile: Some(placement.tile),
                        kind: SpriteKind::Element { element },
                    };
                    match sprite.layer {
                        Layer::Walls => scene.walls.push(sprite),
                        _ => scene.objects.push(sprite),
                    }
                }
            }
        }

        scene.characters.push(Sprite {
            layer: Layer::Characters,
            position: runner.position,
            tile: None,
            kind: SpriteKind::Runner {
                frame: runner.animation.frame(),
            },
        });

        scene
    }

    pub fn layer(&self, layer: Layer) -> &[Sprite] {
        match layer {
            Layer::Ground => &self.ground,
            Layer::Objects => &self.objects,
            Layer::Walls => &self.walls,
            Layer::Characters => &self.characters,
        }
    }

    /// Ground, then objects, then walls and characters from back (high y) to front.
    pub fn render_order(&self) -> Vec<&Sprite> {
        let mut dynamic: Vec<&Sprite> = self.walls.iter().chain(self.characters.iter()).collect();
        dynamic.sort_by(|a, b| b.position.y.total_cmp(&a.position.y));

        self.ground
            .iter()
            .chain(self.objects.iter())
            .chain(dynamic)
            .collect()
    }
}

pub fn hud_lines(distance: f64, game_over: bool) -> Vec<String> {
    let mut lines = vec![format!("Distance: {}", distance as u64)];
    if game_over {
        lines.push("GAME OVER!".to_string());
        lines.push(format!("Final Distance: {}", distance as u64));
        lines.push("Press R to Restart".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::RunnerConfig;
    use crate::core::generator::TerrainGenerator;
    use crate::core::iso::IsoGrid;
    use crate::domain::model::TerrainMode;

    fn scene() -> Scene {
        let mut chunks = ChunkManager::new(
            TerrainGenerator::new(12345),
            IsoGrid::new(128.0, 64.0, 8),
            1,
            TerrainMode::Random,
        );
        chunks.update(ScreenPoint::default());
        let runner = Runner::new(&RunnerConfig::default(), ScreenPoint::new(0.0, 0.0));
        Scene::snapshot(&chunks, &runner)
    }

    #[test]
    fn test_every_tile_has_ground() {
        let scene = scene();
        assert_eq!(scene.layer(Layer::Ground).len(), 9 * 64);
        assert_eq!(scene.layer(Layer::Characters).len(), 1);
        assert!(scene
            .layer(Layer::Objects)
            .iter()
            .all(|s| matches!(s.kind, SpriteKind::Element { element } if !element.collides())));
        assert!(scene
            .layer(Layer::Walls)
            .iter()
            .all(|s| matches!(s.kind, SpriteKind::Element { element } if element.collides())));
    }

    #[test]
    fn test_render_order_layers_and_depth_sort() {
        let scene = scene();
        let order = scene.render_order();
        let ground = scene.layer(Layer::Ground).len();
        let objects = scene.layer(Layer::Objects).len();

        assert_eq!(order.len(), ground + objects + scene.layer(Layer::Walls).len() + 1);
        assert!(order[..ground].iter().all(|s| s.layer == Layer::Ground));
        assert!(order[ground..ground + objects]
            .iter()
            .all(|s| s.layer == Layer::Objects));

        let dynamic = &order[ground + objects..];
        assert!(dynamic.windows(2).all(|w| w[0].position.y >= w[1].position.y));
        assert!(dynamic.iter().any(|s| s.layer == Layer::Characters));
    }

    #[test]
    fn test_hud_lines() {
        assert_eq!(hud_lines(123.9, false), vec!["Distance: 123".to_string()]);
        let over = hud_lines(50.0, true);
        assert_eq!(over[1], "GAME OVER!");
        assert_eq!(over[2], "Final Distance: 50");
        assert_eq!(over[3], "Press R to Restart");
        assert!(CONTROLS_HINT.contains("Q: Toggle Terrain Mode"));
    }
}
