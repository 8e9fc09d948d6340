/// Global tunables shared across the game.
///
/// Creature-specific numbers (attack ranges, windup lengths) live next to
/// the creature that uses them; everything here is world-level.

/// Sleep per frame in the main loop, roughly 60 FPS with render overhead.
pub const TICK_MS: u64 = 8;

/// Downward acceleration applied to every falling body, in pixels/tick².
pub const GRAVITY: f32 = 0.5;

/// World tile size in pixels. Only advisory bookkeeping depends on this.
pub const TILE_SIZE: f32 = 16.0;

/// World pixels to terminal cells, horizontally.
pub const PIXEL_SCALE: f32 = 0.5;

/// Terminal cells are roughly twice as tall as wide; vertical draw
/// coordinates get squashed by this on top of PIXEL_SCALE.
pub const CELL_ASPECT: f32 = 0.55;
