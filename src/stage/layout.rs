//! Built-in stage maps
//!
//! A layout is the collision map plus where things go on it: fixed start,
//! recovery anchor, optional fixed goal and the rules for random placement.

use glam::Vec2;

use crate::collision::{
    CollisionProvider, GridCollisionProvider, Obstacle, PixelConfig, RasterJob, RasterSource,
    Rgb, VectorCollisionProvider, create_pixel_provider,
};
use crate::consts::ACTOR_RADIUS;
use crate::error::RegionError;
use crate::geom::{Bounds, Polygon, Polyline};
use crate::placement::PlacementRules;
use crate::settings::{Difficulty, MazeSettings};
use crate::{consts, map_center};

/// Collision map of a stage, before it is turned into a provider
#[derive(Debug, Clone)]
pub enum StageMap {
    Vector(VectorCollisionProvider),
    Grid(GridCollisionProvider),
    /// Rasterized asynchronously; the stage waits until it is ready
    Raster {
        source: RasterSource,
        config: PixelConfig,
    },
}

impl StageMap {
    /// Build the provider, applying the tunables from `settings`
    ///
    /// Raster maps also hand back the job that makes the provider ready.
    pub fn into_provider(
        self,
        settings: &MazeSettings,
    ) -> Result<(Box<dyn CollisionProvider>, Option<RasterJob>), RegionError> {
        match self {
            StageMap::Vector(provider) => {
                let provider = provider.with_wall_threshold(settings.wall_threshold)?;
                Ok((Box::new(provider), None))
            }
            StageMap::Grid(provider) => Ok((Box::new(provider), None)),
            StageMap::Raster { source, config } => {
                let config = config.with_tolerance(settings.color_tolerance);
                let (provider, job) = create_pixel_provider(source, config)?;
                Ok((Box::new(provider), Some(job)))
            }
        }
    }
}

/// Where the actor, goal and collectibles go
#[derive(Debug, Clone, PartialEq)]
pub struct StageRules {
    pub name: String,
    /// Preferred actor start; sampled when `None` or unrecoverable
    pub start: Option<Vec2>,
    /// Push-back recovery steps toward this point
    pub anchor: Vec2,
    /// Fixed goal; sampled when `None`
    pub goal: Option<Vec2>,
    pub placement: PlacementRules,
}

#[derive(Debug, Clone)]
pub struct StageLayout {
    pub map: StageMap,
    pub rules: StageRules,
}

/// Bangladesh outline in its 1000x1000 source units
const BANGLADESH_OUTLINE: &[[f32; 2]] = &[
    [240.0, 100.0], [260.0, 95.0], [280.0, 92.0], [300.0, 95.0], [320.0, 100.0],
    [340.0, 105.0], [360.0, 110.0], [380.0, 115.0], [400.0, 125.0], [420.0, 135.0],
    [440.0, 145.0], [460.0, 160.0], [480.0, 175.0], [500.0, 185.0], [520.0, 190.0],
    [540.0, 195.0], [560.0, 200.0], [580.0, 205.0], [600.0, 215.0], [620.0, 230.0],
    [640.0, 245.0], [660.0, 265.0], [680.0, 285.0], [700.0, 305.0], [720.0, 330.0],
    [735.0, 355.0], [745.0, 380.0], [750.0, 405.0], [755.0, 430.0], [760.0, 455.0],
    [765.0, 480.0], [770.0, 505.0], [775.0, 530.0], [780.0, 555.0], [785.0, 580.0],
    [790.0, 605.0], [792.0, 630.0], [790.0, 655.0], [785.0, 680.0], [780.0, 705.0],
    [770.0, 725.0], [755.0, 740.0], [735.0, 750.0], [710.0, 755.0], [685.0, 758.0],
    [660.0, 758.0], [635.0, 755.0], [610.0, 750.0], [585.0, 742.0], [560.0, 733.0],
    [535.0, 724.0], [510.0, 715.0], [485.0, 706.0], [460.0, 698.0], [435.0, 690.0],
    [410.0, 682.0], [385.0, 674.0], [360.0, 666.0], [335.0, 658.0], [310.0, 650.0],
    [285.0, 642.0], [260.0, 634.0], [240.0, 625.0], [220.0, 615.0], [205.0, 600.0],
    [195.0, 580.0], [190.0, 560.0], [188.0, 540.0], [190.0, 520.0], [195.0, 500.0],
    [200.0, 480.0], [205.0, 460.0], [210.0, 440.0], [215.0, 420.0], [218.0, 400.0],
    [220.0, 380.0], [222.0, 360.0], [224.0, 340.0], [225.0, 320.0], [226.0, 300.0],
    [228.0, 280.0], [230.0, 260.0], [232.0, 240.0], [234.0, 220.0], [236.0, 200.0],
    [238.0, 180.0], [240.0, 160.0], [242.0, 140.0], [240.0, 120.0],
];

/// Source units to the 800x800 working space
const BANGLADESH_SCALE: f32 = consts::MAP_WIDTH / 1000.0;

/// Thin walls for Normal, in working-space coordinates
const NORMAL_BARRIERS: &[&[[f32; 2]]] = &[
    &[[280.0, 150.0], [320.0, 180.0], [280.0, 210.0], [320.0, 240.0], [280.0, 270.0], [320.0, 300.0]],
    &[
        [380.0, 220.0], [420.0, 240.0], [460.0, 270.0], [490.0, 310.0],
        [510.0, 350.0], [520.0, 390.0], [515.0, 430.0], [500.0, 460.0],
    ],
    &[[480.0, 190.0], [520.0, 230.0], [560.0, 270.0], [600.0, 310.0], [640.0, 350.0]],
    &[[650.0, 450.0], [680.0, 480.0], [700.0, 520.0], [690.0, 560.0], [660.0, 590.0], [640.0, 620.0]],
    &[[350.0, 620.0], [380.0, 640.0], [350.0, 660.0], [380.0, 680.0], [350.0, 700.0]],
    &[[220.0, 500.0], [240.0, 530.0], [230.0, 560.0], [250.0, 590.0], [240.0, 620.0]],
    &[[300.0, 400.0], [350.0, 410.0], [400.0, 405.0], [450.0, 415.0], [500.0, 410.0]],
    &[[350.0, 280.0], [380.0, 290.0], [390.0, 320.0], [370.0, 340.0], [340.0, 330.0], [335.0, 300.0]],
];

/// Extra thin walls added on Hard
const HARD_BARRIERS: &[&[[f32; 2]]] = &[
    &[[300.0, 120.0], [330.0, 140.0], [360.0, 135.0], [390.0, 150.0], [420.0, 145.0]],
    &[[680.0, 200.0], [700.0, 230.0], [720.0, 260.0], [700.0, 290.0], [680.0, 320.0]],
    &[[280.0, 640.0], [310.0, 650.0], [340.0, 655.0], [370.0, 650.0], [400.0, 645.0]],
    &[[420.0, 280.0], [440.0, 310.0], [460.0, 340.0], [480.0, 370.0], [500.0, 400.0]],
    &[[210.0, 430.0], [230.0, 450.0], [210.0, 470.0], [230.0, 490.0], [210.0, 510.0]],
    &[[550.0, 240.0], [580.0, 260.0], [610.0, 280.0], [640.0, 300.0], [670.0, 320.0]],
    &[[720.0, 550.0], [740.0, 570.0], [760.0, 590.0], [750.0, 610.0], [730.0, 630.0]],
    &[[400.0, 450.0], [430.0, 460.0], [460.0, 450.0], [490.0, 460.0], [520.0, 450.0]],
    &[[260.0, 180.0], [280.0, 200.0], [300.0, 190.0], [320.0, 210.0], [340.0, 200.0]],
    &[[420.0, 680.0], [450.0, 690.0], [480.0, 685.0], [510.0, 695.0], [540.0, 690.0]],
];

/// 30x30 tile maze, 1 = path
pub const GRID_MAZE_PATTERN: [[u8; 30]; 30] = [
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 1, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1],
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 1, 1, 1],
    [1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1],
    [1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1],
    [1, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0],
    [1, 0, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 0, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [1, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 0, 1, 0],
    [1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0, 0, 1, 0],
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
    [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 0, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 0, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1],
];

/// Walkable green square with a black block, for the pixel demo
pub const PIXEL_DEMO_SVG: &str = r##"<svg width="100" height="100" viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg">
  <rect x="10" y="10" width="80" height="80" fill="#00FF00"/>
  <rect x="40" y="40" width="20" height="20" fill="#000000"/>
</svg>"##;

/// Bangladesh outline scaled into the working space
pub fn bangladesh_boundary() -> Result<Polygon, RegionError> {
    Polygon::from_points(BANGLADESH_OUTLINE)?.scaled(BANGLADESH_SCALE)
}

/// Thin walls for a difficulty (none on Easy)
pub fn bangladesh_barriers(difficulty: Difficulty) -> Result<Vec<Polyline>, RegionError> {
    let sets: &[&[&[[f32; 2]]]] = match difficulty {
        Difficulty::Easy => &[],
        Difficulty::Normal => &[NORMAL_BARRIERS],
        Difficulty::Hard => &[NORMAL_BARRIERS, HARD_BARRIERS],
    };
    sets.iter()
        .flat_map(|set| set.iter())
        .map(|points| Polyline::from_points(points))
        .collect()
}

impl StageLayout {
    /// Country-outline maze with thin internal walls
    pub fn bangladesh(difficulty: Difficulty) -> Result<Self, RegionError> {
        let walls = bangladesh_barriers(difficulty)?
            .into_iter()
            .map(Obstacle::Wall)
            .collect();
        let provider = VectorCollisionProvider::new(bangladesh_boundary()?, walls);

        Ok(Self {
            map: StageMap::Vector(provider),
            rules: StageRules {
                name: format!("Bangladesh ({})", difficulty.as_str()),
                start: Some(Vec2::new(300.0, 250.0)),
                anchor: map_center(),
                goal: None,
                placement: PlacementRules {
                    bounds: Bounds::new(Vec2::new(240.0, 100.0), Vec2::new(750.0, 720.0)),
                    radius: ACTOR_RADIUS,
                    max_attempts: consts::SAMPLE_ATTEMPTS,
                    fallbacks: vec![
                        Vec2::new(500.0, 400.0),
                        Vec2::new(485.0, 472.0),
                        Vec2::new(560.0, 520.0),
                    ],
                    default_pos: Vec2::new(500.0, 400.0),
                },
            },
        })
    }

    /// Tile maze spanning the working space
    pub fn grid_maze() -> Result<Self, RegionError> {
        let cell_size = consts::MAP_WIDTH / GRID_MAZE_PATTERN.len() as f32;
        let grid = GridCollisionProvider::from_pattern(&GRID_MAZE_PATTERN, cell_size)?;
        let start = grid.cell_center(0, 0);
        let goal = bottom_right_path(&grid).map(|(row, col)| grid.cell_center(row, col));

        Ok(Self {
            rules: StageRules {
                name: "Grid maze".to_string(),
                start: Some(start),
                anchor: start,
                goal,
                placement: PlacementRules {
                    bounds: Bounds::new(Vec2::ZERO, Vec2::new(consts::MAP_WIDTH, consts::MAP_HEIGHT)),
                    radius: ACTOR_RADIUS,
                    max_attempts: consts::SAMPLE_ATTEMPTS,
                    fallbacks: vec![map_center(), start],
                    default_pos: start,
                },
            },
            map: StageMap::Grid(grid),
        })
    }

    /// 100x100 SVG collision map, green walkable
    pub fn pixel_demo() -> Self {
        let start = Vec2::new(20.0, 20.0);
        Self {
            map: StageMap::Raster {
                source: RasterSource::Svg(PIXEL_DEMO_SVG.to_string()),
                config: PixelConfig::new(100, 100, Rgb::new(0, 255, 0)),
            },
            rules: StageRules {
                name: "Pixel demo".to_string(),
                start: Some(start),
                anchor: start,
                goal: None,
                placement: PlacementRules {
                    bounds: Bounds::new(Vec2::ZERO, Vec2::splat(100.0)),
                    radius: 3.0,
                    max_attempts: consts::SAMPLE_ATTEMPTS,
                    fallbacks: vec![Vec2::new(80.0, 80.0)],
                    default_pos: start,
                },
            },
        }
    }

    /// Settings that suit [`StageLayout::pixel_demo`]'s small canvas
    pub fn pixel_demo_settings() -> MazeSettings {
        MazeSettings {
            actor_radius: 3.0,
            move_step: 5.0,
            collect_radius: 6.0,
            goal_radius: 8.0,
            collectible_count: 3,
            ..MazeSettings::default()
        }
    }
}

/// First path cell scanning up from the bottom rows, right to left
fn bottom_right_path(grid: &GridCollisionProvider) -> Option<(usize, usize)> {
    let (rows, cols) = (grid.rows(), grid.cols());
    (rows.saturating_sub(5)..rows)
        .rev()
        .flat_map(|row| (cols.saturating_sub(10)..cols).rev().map(move |col| (row, col)))
        .find(|&(row, col)| grid.is_path(row, col))
}
