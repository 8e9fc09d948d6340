use color_eyre::eyre::{Result, bail, ensure, eyre};

use crate::config::TILE_SIZE;

/// A static axis-aligned platform in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// AABB overlap test against an arbitrary box.
    pub fn intersects(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        x < self.x + self.width
            && x + width > self.x
            && y < self.y + self.height
            && y + height > self.y
    }
}

/// Pixel-to-tile conversion service. Entities keep advisory tile
/// coordinates for debugging overlays; nothing in collision uses them,
/// so the service is optional everywhere it is consumed.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid {
    tile_size: f32,
}

impl TileGrid {
    pub fn new(tile_size: f32) -> Result<Self> {
        ensure!(
            tile_size.is_finite() && tile_size > 0.0,
            "tile size must be positive, got {tile_size}"
        );
        Ok(Self { tile_size })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn pixel_to_tile(&self, pixel: f32) -> i32 {
        (pixel / self.tile_size).floor() as i32
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
        }
    }
}

/// A loaded level: platform geometry plus spawn points, all in pixel space.
#[derive(Debug, Clone)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub player_spawn: (f32, f32),
    pub chomper_spawns: Vec<(f32, f32)>,
    pub gem_spawns: Vec<(f32, f32)>,
    pub width: f32,
    pub height: f32,
}

impl Level {
    /// Parses an ASCII layout into a level. One character is one tile:
    /// `#` solid ground, `P` player spawn, `C` chomper spawn, `g` gem.
    /// Horizontal runs of `#` collapse into a single platform rectangle.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .collect();
        ensure!(!rows.is_empty(), "level layout is empty");

        let mut platforms = Vec::new();
        let mut player_spawn = None;
        let mut chomper_spawns = Vec::new();
        let mut gem_spawns = Vec::new();
        let mut max_cols = 0;

        for (row, line) in rows.iter().enumerate() {
            max_cols = max_cols.max(line.chars().count());
            let y = row as f32 * TILE_SIZE;
            let mut run_start: Option<usize> = None;

            for (col, ch) in line.chars().enumerate() {
                let x = col as f32 * TILE_SIZE;
                match ch {
                    '#' => {
                        if run_start.is_none() {
                            run_start = Some(col);
                        }
                    }
                    'P' => player_spawn = Some((x, y)),
                    'C' => chomper_spawns.push((x, y)),
                    'g' => gem_spawns.push((x, y)),
                    ' ' | '.' => {}
                    other => {
                        bail!("unknown level character {other:?} at row {row}, column {col}");
                    }
                }
                if ch != '#'
                    && let Some(start) = run_start.take()
                {
                    platforms.push(Platform::new(
                        start as f32 * TILE_SIZE,
                        y,
                        (col - start) as f32 * TILE_SIZE,
                        TILE_SIZE,
                    ));
                }
            }
            if let Some(start) = run_start {
                platforms.push(Platform::new(
                    start as f32 * TILE_SIZE,
                    y,
                    (line.chars().count() - start) as f32 * TILE_SIZE,
                    TILE_SIZE,
                ));
            }
        }

        let player_spawn = player_spawn.ok_or_else(|| eyre!("level has no player spawn"))?;

        Ok(Self {
            platforms,
            player_spawn,
            chomper_spawns,
            gem_spawns,
            width: max_cols as f32 * TILE_SIZE,
            height: rows.len() as f32 * TILE_SIZE,
        })
    }

    /// The built-in cave used by the binary.
    pub fn demo() -> Result<Self> {
        Self::from_ascii(
            "
.................................................
.................................................
.............g...................g...............
...........#####.............#######.............
.................................................
....P....................g.......................
...####.........C......#####..........C..........
..........###########..........###########......
.................................................
#################################################
",
        )
    }
}
