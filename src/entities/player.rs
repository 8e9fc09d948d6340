use crate::config::GRAVITY;
use crate::level::Platform;

const RUN_SPEED: f32 = 2.0;
const JUMP_VELOCITY: f32 = -7.0;
const SLAM_VELOCITY: f32 = 8.0;
const STARTING_HEALTH: i32 = 5;

/// The player character. Movement is deliberately simple; the interesting
/// part of the contract is what the creatures consume: position, size,
/// velocity, `ground_slamming`, and `take_damage`.
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub health: i32,
    pub ground_slamming: bool,
    pub on_ground: bool,
    pub damage_flash: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: 10.0,
            height: 14.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            health: STARTING_HEALTH,
            ground_slamming: false,
            on_ground: false,
            damage_flash: 0,
        }
    }

    /// Sets horizontal run velocity. `direction` is -1.0 or 1.0.
    pub fn run(&mut self, direction: f32) {
        self.velocity_x = RUN_SPEED * direction;
    }

    pub fn stop(&mut self) {
        self.velocity_x = 0.0;
    }

    pub fn jump(&mut self) {
        if self.on_ground {
            self.velocity_y = JUMP_VELOCITY;
            self.on_ground = false;
        }
    }

    /// Starts a downward slam. Only available mid-air; the slam flag is
    /// cleared again on landing.
    pub fn start_ground_slam(&mut self) {
        if !self.on_ground && !self.ground_slamming {
            self.ground_slamming = true;
            self.velocity_y = SLAM_VELOCITY;
        }
    }

    /// Advances the player one tick: gravity, integration, platform
    /// resolution. Same landing rule the creatures use, so both sides of a
    /// slam exchange agree about who is standing where.
    pub fn update(&mut self, platforms: &[Platform]) {
        if self.damage_flash > 0 {
            self.damage_flash -= 1;
        }

        self.velocity_y += GRAVITY;
        self.x += self.velocity_x;
        self.y += self.velocity_y;

        self.on_ground = false;
        for platform in platforms {
            if platform.intersects(self.x, self.y, self.width, self.height) {
                if self.velocity_y > 0.0 && self.y - self.velocity_y < platform.y {
                    self.y = platform.y - self.height;
                    self.velocity_y = 0.0;
                    self.on_ground = true;
                    self.ground_slamming = false;
                } else if self.velocity_x > 0.0 {
                    self.x = platform.x - self.width;
                } else if self.velocity_x < 0.0 {
                    self.x = platform.x + platform.width;
                }
            }
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
        self.damage_flash = 10;
    }

    pub fn is_flashing(&self) -> bool {
        self.damage_flash > 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
