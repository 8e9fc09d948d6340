use ratatui::style::Color;

use super::player::Player;
use crate::audio::AudioManager;
use crate::config::GRAVITY;
use crate::level::{Platform, TileGrid};
use crate::render::{Canvas, Viewport};

const WIDTH: f32 = 30.0;
const HEIGHT: f32 = 24.0;
const PATROL_SPEED: f32 = 1.5;
const PATROL_DISTANCE: f32 = 100.0;
const MAX_HEALTH: i32 = 2;

const ATTACK_RANGE: f32 = 60.0;
const WINDUP_TICKS: u32 = 15;
const BITE_END_TICK: u32 = 25;
const ATTACK_COOLDOWN_TICKS: u32 = 120;
const BITE_REACH: f32 = 25.0;

const DAMAGE_FLASH_TICKS: u32 = 10;
const DEATH_BOUNCE: f32 = -2.0;
const DEATH_SPIN: f32 = 0.1;
const OFFSCREEN_TICKS: u32 = 120;

const SLAM_MIN_FALL_SPEED: f32 = 2.0;
const SLAM_BAND_ABOVE: f32 = 24.0;
const SLAM_BAND_BELOW: f32 = 8.0;

const BODY_COLOR: Color = Color::Red;
const FLASH_COLOR: Color = Color::White;
const EYE_COLOR: Color = Color::White;
const PUPIL_COLOR: Color = Color::Black;
const MOUTH_COLOR: Color = Color::Black;
const TEETH_COLOR: Color = Color::White;

/// Where the chomper is in its attack cycle. The re-entry cooldown is a
/// separate timer, not a phase: a chomper in `Idle` with a hot cooldown
/// patrols normally, it just cannot start a new windup yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Idle,
    Windup,
    Bite,
}

/// A patrolling cave creature with a proximity-triggered bite.
///
/// Everything is advanced by `update`, one fixed tick at a time; all timers
/// are frame counts, so a given sequence of ticks and inputs replays
/// identically.
#[derive(Debug, Clone)]
pub struct Chomper {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub speed: f32,
    pub gravity: f32,
    /// -1.0 facing/patrolling left, 1.0 right.
    pub direction: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub patrol_distance: f32,
    pub on_ground: bool,

    pub phase: AttackPhase,
    pub attack_timer: u32,
    pub attack_cooldown: u32,
    pub mouth_open: f32,
    pub bite_direction: f32,
    pub scale: f32,
    pub scale_y: f32,

    pub health: i32,
    pub max_health: i32,
    pub dead: bool,
    /// Ticks since death; past `OFFSCREEN_TICKS` the body stops drawing and
    /// the owner is expected to drop the entity.
    pub death_animation: u32,
    pub damage_flash: u32,
    pub rotation: f32,

    /// Advisory tile coordinates, refreshed when a `TileGrid` is supplied.
    /// Collision never reads these.
    pub tile_x: i32,
    pub tile_y: i32,
}

impl Chomper {
    /// Spawns a chomper; the spawn position becomes the patrol anchor.
    /// Non-finite coordinates would poison every later integration step, so
    /// they are clamped to zero here.
    pub fn new(x: f32, y: f32) -> Self {
        let x = if x.is_finite() { x } else { 0.0 };
        let y = if y.is_finite() { y } else { 0.0 };

        Self {
            x,
            y,
            width: WIDTH,
            height: HEIGHT,
            velocity_x: 0.0,
            velocity_y: 0.0,
            speed: PATROL_SPEED,
            gravity: GRAVITY,
            direction: -1.0,
            start_x: x,
            start_y: y,
            patrol_distance: PATROL_DISTANCE,
            on_ground: false,
            phase: AttackPhase::Idle,
            attack_timer: 0,
            attack_cooldown: 0,
            mouth_open: 0.0,
            bite_direction: 1.0,
            scale: 1.0,
            scale_y: 1.0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            dead: false,
            death_animation: 0,
            damage_flash: 0,
            rotation: 0.0,
            tile_x: 0,
            tile_y: 0,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.phase != AttackPhase::Idle
    }

    /// True once the death animation has carried the body off screen; the
    /// owner should stop updating and drop the entity.
    pub fn is_gone(&self) -> bool {
        self.dead && self.death_animation > OFFSCREEN_TICKS
    }

    /// Advances the creature one tick.
    ///
    /// Dead creatures only tumble: gravity keeps integrating vertically but
    /// horizontal motion is frozen and no collision or AI runs. Alive ones
    /// run timers, the attack cycle, patrol, integration, and platform
    /// resolution, in that order.
    pub fn update(&mut self, platforms: &[Platform], player: &mut Player, tiles: Option<&TileGrid>) {
        if self.dead {
            self.death_animation += 1;
            self.velocity_y += self.gravity;
            self.y += self.velocity_y;
            self.rotation = self.death_animation as f32 * DEATH_SPIN;
        } else {
            if self.damage_flash > 0 {
                self.damage_flash -= 1;
            }
            if self.attack_cooldown > 0 {
                self.attack_cooldown -= 1;
            }

            // Patrol stays suspended for the rest of the tick even when the
            // bite exits mid-tick
            let attacked = self.run_attack(player);
            if !attacked {
                self.patrol();
            }

            self.velocity_y += self.gravity;
            self.x += self.velocity_x;
            self.y += self.velocity_y;

            self.resolve_collisions(platforms);
        }

        if let Some(tiles) = tiles {
            self.tile_x = tiles.pixel_to_tile(self.x + self.width / 2.0);
            self.tile_y = tiles.pixel_to_tile(self.y + self.height / 2.0);
        }
    }

    /// Idle back-and-forth between the patrol bounds. The reversal and the
    /// move happen in the same tick, so the creature never sticks outside
    /// its range.
    fn patrol(&mut self) {
        if (self.x - self.start_x).abs() > self.patrol_distance {
            self.direction = -self.direction;
        }
        self.velocity_x = self.speed * self.direction;
    }

    /// Runs one tick of the attack cycle. Returns whether the creature was
    /// in (or just entered) an attack this tick; patrol is skipped for the
    /// whole tick in that case.
    fn run_attack(&mut self, player: &mut Player) -> bool {
        if self.phase == AttackPhase::Idle {
            if self.attack_cooldown == 0 && (self.x - player.x).abs() < ATTACK_RANGE {
                self.phase = AttackPhase::Windup;
                self.attack_timer = 0;
                self.mouth_open = 0.0;
                self.scale = 1.0;
                self.scale_y = 1.0;
                self.bite_direction = if player.x < self.x { -1.0 } else { 1.0 };
            } else {
                return false;
            }
        }

        match self.phase {
            AttackPhase::Windup => {
                // The telegraph: the body swells and the mouth opens while
                // movement is suspended. This is the player's dodge window.
                let progress = self.attack_timer as f32 / WINDUP_TICKS as f32;
                self.mouth_open = progress;
                self.scale = 1.0 + 0.4 * progress;
                self.scale_y = 1.0 + 0.5 * progress;
                self.velocity_x = 0.0;

                self.attack_timer += 1;
                if self.attack_timer >= WINDUP_TICKS {
                    self.phase = AttackPhase::Bite;
                }
            }
            AttackPhase::Bite => {
                self.mouth_open = 1.0;
                self.scale = 1.4;
                self.scale_y = 1.5;

                if self.bite_hits(player) {
                    // A landed bite ends the attack on the spot rather than
                    // waiting out the window.
                    player.take_damage(1);
                    self.attack_cooldown = ATTACK_COOLDOWN_TICKS;
                    self.end_attack();
                    return true;
                }

                self.attack_timer += 1;
                if self.attack_timer >= BITE_END_TICK {
                    // A whiffed bite costs the same cooldown as a hit
                    self.attack_cooldown = ATTACK_COOLDOWN_TICKS;
                    self.end_attack();
                }
            }
            AttackPhase::Idle => {}
        }
        true
    }

    /// Bite hit-box: the bounding box, stretched `BITE_REACH * mouth_open`
    /// pixels toward the side being bitten once the mouth is more than half
    /// open.
    fn bite_hits(&self, player: &Player) -> bool {
        let mut left = self.x;
        let mut right = self.x + self.width;
        if self.mouth_open > 0.5 {
            let reach = BITE_REACH * self.mouth_open;
            if self.bite_direction < 0.0 {
                left -= reach;
            } else {
                right += reach;
            }
        }

        left < player.x + player.width
            && right > player.x
            && self.y < player.y + player.height
            && self.y + self.height > player.y
    }

    fn end_attack(&mut self) {
        self.phase = AttackPhase::Idle;
        self.attack_timer = 0;
        self.mouth_open = 0.0;
        self.scale = 1.0;
        self.scale_y = 1.0;
    }

    /// Resolves against platforms in input order; a later platform may
    /// override an earlier one within the same tick.
    fn resolve_collisions(&mut self, platforms: &[Platform]) {
        self.on_ground = false;
        for platform in platforms {
            if platform.intersects(self.x, self.y, self.width, self.height) {
                if self.velocity_y > 0.0 && self.y - self.velocity_y < platform.y {
                    self.y = platform.y - self.height;
                    self.velocity_y = 0.0;
                    self.on_ground = true;
                } else if self.velocity_x > 0.0 {
                    self.x = platform.x - self.width;
                    self.direction = -self.direction;
                } else if self.velocity_x < 0.0 {
                    self.x = platform.x + platform.width;
                    self.direction = -self.direction;
                }
            }
        }
    }

    /// Applies damage and runs the death transition when health hits zero.
    /// Returns whether damage was applied; hitting a corpse is a no-op.
    pub fn take_damage(&mut self, amount: i32, audio: &AudioManager) -> bool {
        if self.dead {
            return false;
        }

        self.health = (self.health - amount).clamp(0, self.max_health);
        self.damage_flash = DAMAGE_FLASH_TICKS;
        audio.play_enemy_damage();

        if self.health == 0 {
            self.dead = true;
            self.death_animation = 0;
            self.velocity_y = DEATH_BOUNCE;
            self.end_attack();
            audio.play_enemy_death();
        }
        true
    }

    /// Is the player about to slam into this creature from above? Pure
    /// predicate; the caller decides whether to follow up with
    /// `take_damage`.
    pub fn check_ground_slam_hit(&self, player: &Player) -> bool {
        if !player.ground_slamming || player.velocity_y <= SLAM_MIN_FALL_SPEED {
            return false;
        }

        let horizontal_overlap =
            player.x < self.x + self.width && player.x + player.width > self.x;
        let player_bottom = player.y + player.height;

        horizontal_overlap
            && player_bottom >= self.y - SLAM_BAND_ABOVE
            && player_bottom <= self.y + SLAM_BAND_BELOW
    }

    /// Draws the creature. Read-only; a body that has tumbled off screen
    /// draws nothing.
    ///
    /// The body is a rectangle under a transform anchored at the feet
    /// (bottom center), so attack growth expands up and outward while the
    /// feet stay planted, and the death spin pivots around the same point.
    /// The mouth overlay is drawn afterwards in unscaled space.
    pub fn draw(&self, canvas: &mut dyn Canvas, view: &Viewport) {
        if self.is_gone() {
            return;
        }

        let s = view.pixel_scale;
        let center_x = (self.x + self.width / 2.0 - view.camera_x) * s;
        let feet_y = (self.y + self.height - view.camera_y) * s;
        let w = self.width * s;
        let h = self.height * s;

        canvas.save();
        canvas.translate(center_x, feet_y);
        if self.dead {
            canvas.rotate(self.rotation);
        }
        canvas.scale(self.scale, self.scale_y);

        let body_color = if self.damage_flash > 0 && (self.damage_flash / 2).is_multiple_of(2) {
            FLASH_COLOR
        } else {
            BODY_COLOR
        };
        canvas.fill_rect(-w / 2.0, -h, w, h, body_color);

        if !self.dead {
            let eye_w = w * 0.14;
            let eye_h = h * 0.2;
            let eye_y = -h * 0.8;
            for side in [-1.0f32, 1.0] {
                let eye_x = side * w * 0.22 - eye_w / 2.0;
                canvas.fill_rect(eye_x, eye_y, eye_w, eye_h, EYE_COLOR);
                // Pupils track the facing direction
                canvas.fill_rect(
                    eye_x + (self.direction * 0.25 + 0.25) * eye_w,
                    eye_y + eye_h * 0.25,
                    eye_w * 0.5,
                    eye_h * 0.5,
                    PUPIL_COLOR,
                );
            }
        }
        canvas.restore();

        if self.is_attacking() && self.mouth_open > 0.0 && !self.dead {
            self.draw_mouth(canvas, center_x, feet_y, s);
        }
    }

    /// Mouth, teeth, and interior at the scaled body's bite-direction edge.
    /// Deliberately outside the body transform: the gape is sized by
    /// `mouth_open` alone and must not inherit the attack scale or any
    /// death rotation.
    fn draw_mouth(&self, canvas: &mut dyn Canvas, center_x: f32, feet_y: f32, s: f32) {
        let reach = BITE_REACH * self.mouth_open * s;
        let gape = self.height * 0.6 * self.mouth_open * s;
        let edge_x = center_x + self.bite_direction * (self.width * self.scale * s) / 2.0;
        let mouth_top = feet_y - (self.height * self.scale_y * s) / 2.0 - gape / 2.0;

        let mouth_left = if self.bite_direction < 0.0 {
            edge_x - reach
        } else {
            edge_x
        };
        canvas.fill_rect(mouth_left, mouth_top, reach, gape, MOUTH_COLOR);

        // Three teeth anchored at the jaw, points toward the target
        let tooth_half = gape / 8.0;
        let apex_x = edge_x + self.bite_direction * reach * 0.8;
        for i in 0..3 {
            let tooth_y = mouth_top + gape * (i as f32 + 0.5) / 3.0;
            canvas.fill_triangle(
                (edge_x, tooth_y - tooth_half),
                (edge_x, tooth_y + tooth_half),
                (apex_x, tooth_y),
                TEETH_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_audio() -> AudioManager {
        AudioManager::disabled()
    }

    /// A player standing far enough away to never trigger an attack.
    fn distant_player() -> Player {
        Player::new(10_000.0, 0.0)
    }

    /// A chomper resting on a wide platform at y = 50, with the platform
    /// top at y = 74.
    fn grounded_setup() -> (Chomper, Vec<Platform>) {
        let chomper = Chomper::new(100.0, 50.0);
        let platforms = vec![Platform::new(-200.0, 74.0, 600.0, 16.0)];
        (chomper, platforms)
    }

    #[test]
    fn test_new_clamps_non_finite_spawn() {
        let chomper = Chomper::new(f32::NAN, f32::INFINITY);
        assert_eq!(chomper.x, 0.0);
        assert_eq!(chomper.y, 0.0);
        assert_eq!(chomper.start_x, 0.0);
    }

    #[test]
    fn test_patrol_reverses_at_bound() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = distant_player();
        assert_eq!(chomper.direction, -1.0);

        // 90 ticks at speed 1.5 carries it past the 100px bound and back
        for _ in 0..90 {
            chomper.update(&platforms, &mut player, None);
        }
        assert_eq!(chomper.direction, 1.0);
        assert!((chomper.x - chomper.start_x).abs() <= chomper.patrol_distance + chomper.speed);
    }

    #[test]
    fn test_landing_snaps_to_platform_top() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut player, None);
        }
        assert!(chomper.on_ground);
        assert_eq!(chomper.y, 74.0 - chomper.height);
        assert_eq!(chomper.velocity_y, 0.0);
    }

    #[test]
    fn test_side_collision_flips_direction() {
        let (mut chomper, mut platforms) = grounded_setup();
        // Wall just to the left of the patrol start
        platforms.push(Platform::new(40.0, 0.0, 16.0, 90.0));
        let mut player = distant_player();

        for _ in 0..60 {
            chomper.update(&platforms, &mut player, None);
        }
        // Flipped at the wall instead of walking through it
        assert_eq!(chomper.direction, 1.0);
        assert!(chomper.x >= 56.0);
    }

    #[test]
    fn test_attack_triggers_toward_player() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = Player::new(140.0, 50.0);

        chomper.update(&platforms, &mut player, None);
        assert!(chomper.is_attacking());
        assert_eq!(chomper.bite_direction, 1.0);

        let (mut chomper, platforms) = grounded_setup();
        let mut player = Player::new(60.0, 50.0);
        chomper.update(&platforms, &mut player, None);
        assert!(chomper.is_attacking());
        assert_eq!(chomper.bite_direction, -1.0);
    }

    #[test]
    fn test_attack_requires_cold_cooldown() {
        let (mut chomper, platforms) = grounded_setup();
        chomper.attack_cooldown = 3;
        let mut player = Player::new(140.0, 50.0);

        chomper.update(&platforms, &mut player, None);
        assert!(!chomper.is_attacking());
        assert_eq!(chomper.attack_cooldown, 2);

        // The windup starts on the tick the cooldown drains to zero
        chomper.update(&platforms, &mut player, None);
        assert!(!chomper.is_attacking());
        chomper.update(&platforms, &mut player, None);
        assert!(chomper.is_attacking());
        assert_eq!(chomper.attack_cooldown, 0);
    }

    #[test]
    fn test_windup_curve() {
        let (mut chomper, platforms) = grounded_setup();
        // Settle onto the platform before pulling the player close
        let mut far = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut far, None);
        }

        let mut player = Player::new(chomper.x + 40.0, 52.0);
        // Trigger tick runs the first windup step (timer 0), then 7 more
        for _ in 0..8 {
            chomper.update(&platforms, &mut player, None);
        }
        let progress = 7.0 / 15.0;
        assert!((chomper.mouth_open - progress).abs() < 1e-6);
        assert!((chomper.scale - (1.0 + 0.4 * progress)).abs() < 1e-6);
        assert!((chomper.scale_y - (1.0 + 0.5 * progress)).abs() < 1e-6);
        // Movement is suspended for the whole telegraph
        assert_eq!(chomper.velocity_x, 0.0);
    }

    #[test]
    fn test_successful_bite_hits_once_and_ends_early() {
        let (mut chomper, platforms) = grounded_setup();
        let mut far = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut far, None);
        }

        // Overlapping the chomper's box: the bite connects on its first tick
        let mut player = Player::new(chomper.x + 20.0, 52.0);
        let starting_health = player.health;
        for _ in 0..16 {
            chomper.update(&platforms, &mut player, None);
        }

        assert_eq!(player.health, starting_health - 1);
        assert!(!chomper.is_attacking());
        assert_eq!(chomper.attack_cooldown, ATTACK_COOLDOWN_TICKS);
        assert_eq!(chomper.scale, 1.0);
        assert_eq!(chomper.scale_y, 1.0);
        assert_eq!(chomper.mouth_open, 0.0);

        // Cooldown gates re-entry: no second hit while it drains
        for _ in 0..60 {
            chomper.update(&platforms, &mut player, None);
        }
        assert_eq!(player.health, starting_health - 1);
        assert!(!chomper.is_attacking());
    }

    #[test]
    fn test_extended_hitbox_reaches_past_body() {
        let (mut chomper, platforms) = grounded_setup();
        let mut far = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut far, None);
        }

        // Close enough to trigger (45 < 60) but outside the plain bounding
        // box (+30); only the 25px mouth extension reaches this far
        let mut player = Player::new(chomper.x + 45.0, 52.0);
        let starting_health = player.health;
        for _ in 0..16 {
            chomper.update(&platforms, &mut player, None);
        }
        assert_eq!(player.health, starting_health - 1);
    }

    #[test]
    fn test_failed_bite_costs_full_cooldown() {
        let (mut chomper, platforms) = grounded_setup();
        let mut far = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut far, None);
        }

        // Triggers (58 < 60) but stays out of even the extended hit-box
        // (+30 body + 25 reach = +55 < +58)
        let mut player = Player::new(chomper.x + 58.0, 52.0);
        let starting_health = player.health;
        for _ in 0..25 {
            chomper.update(&platforms, &mut player, None);
        }

        assert_eq!(player.health, starting_health);
        assert!(!chomper.is_attacking());
        assert_eq!(chomper.attack_cooldown, ATTACK_COOLDOWN_TICKS);
        assert_eq!(chomper.scale, 1.0);
        assert_eq!(chomper.mouth_open, 0.0);
    }

    #[test]
    fn test_cooldown_expiry_allows_reattack() {
        let (mut chomper, platforms) = grounded_setup();
        let mut far = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut far, None);
        }

        let mut player = Player::new(chomper.x + 58.0, 52.0);
        for _ in 0..25 {
            chomper.update(&platforms, &mut player, None);
        }
        assert_eq!(chomper.attack_cooldown, ATTACK_COOLDOWN_TICKS);

        // Drain the cooldown with the player out of range
        let mut far = distant_player();
        for _ in 0..ATTACK_COOLDOWN_TICKS {
            chomper.update(&platforms, &mut far, None);
        }
        assert_eq!(chomper.attack_cooldown, 0);

        let mut player = Player::new(chomper.x + 40.0, 52.0);
        chomper.update(&platforms, &mut player, None);
        assert!(chomper.is_attacking());
    }

    #[test]
    fn test_damage_and_death_round_trip() {
        let audio = silent_audio();
        let mut chomper = Chomper::new(100.0, 50.0);
        assert_eq!(chomper.health, 2);

        assert!(chomper.take_damage(1, &audio));
        assert_eq!(chomper.health, 1);
        assert!(!chomper.dead);
        assert_eq!(chomper.damage_flash, DAMAGE_FLASH_TICKS);

        assert!(chomper.take_damage(1, &audio));
        assert_eq!(chomper.health, 0);
        assert!(chomper.dead);
        assert_eq!(chomper.velocity_y, DEATH_BOUNCE);
        assert!(!chomper.is_attacking());

        // Hitting the corpse is a defined no-op
        assert!(!chomper.take_damage(1, &audio));
        assert_eq!(chomper.health, 0);
    }

    #[test]
    fn test_death_interrupts_attack() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = Player::new(140.0, 50.0);
        for _ in 0..5 {
            chomper.update(&platforms, &mut player, None);
        }
        assert!(chomper.is_attacking());

        let audio = silent_audio();
        chomper.take_damage(chomper.health, &audio);
        assert!(chomper.dead);
        assert!(!chomper.is_attacking());
        assert_eq!(chomper.scale, 1.0);
        assert_eq!(chomper.scale_y, 1.0);
    }

    #[test]
    fn test_death_freezes_horizontal_motion() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = distant_player();
        for _ in 0..30 {
            chomper.update(&platforms, &mut player, None);
        }

        let audio = silent_audio();
        chomper.take_damage(chomper.health, &audio);
        let frozen_x = chomper.x;
        let frozen_vx = chomper.velocity_x;
        let start_y = chomper.y;

        for tick in 1..=10u32 {
            chomper.update(&platforms, &mut player, None);
            assert_eq!(chomper.x, frozen_x);
            assert_eq!(chomper.velocity_x, frozen_vx);
            assert_eq!(chomper.death_animation, tick);
            assert!((chomper.rotation - tick as f32 * DEATH_SPIN).abs() < 1e-6);
        }
        // Falls through platforms: no collision runs after death
        assert!(chomper.y > start_y);
    }

    #[test]
    fn test_is_gone_after_offscreen_threshold() {
        let mut chomper = Chomper::new(0.0, 0.0);
        let audio = silent_audio();
        chomper.take_damage(chomper.health, &audio);
        let mut player = distant_player();

        for _ in 0..OFFSCREEN_TICKS {
            chomper.update(&[], &mut player, None);
        }
        assert!(!chomper.is_gone());
        chomper.update(&[], &mut player, None);
        assert!(chomper.is_gone());
    }

    #[test]
    fn test_ground_slam_predicate() {
        let chomper = Chomper::new(100.0, 50.0);

        let mut player = Player::new(110.0, 50.0 - 30.0);
        player.ground_slamming = true;
        player.velocity_y = 8.0;
        assert!(chomper.check_ground_slam_hit(&player));

        // Not slamming
        player.ground_slamming = false;
        assert!(!chomper.check_ground_slam_hit(&player));

        // Falling too slowly
        player.ground_slamming = true;
        player.velocity_y = 1.0;
        assert!(!chomper.check_ground_slam_hit(&player));

        // No horizontal overlap
        player.velocity_y = 8.0;
        player.x = 200.0;
        assert!(!chomper.check_ground_slam_hit(&player));

        // Too far above the band
        player.x = 110.0;
        player.y = 50.0 - 80.0;
        assert!(!chomper.check_ground_slam_hit(&player));
    }

    #[test]
    fn test_slam_predicate_does_not_mutate() {
        let chomper = Chomper::new(100.0, 50.0);
        let mut player = Player::new(110.0, 20.0);
        player.ground_slamming = true;
        player.velocity_y = 8.0;
        let before = player.clone();
        let _ = chomper.check_ground_slam_hit(&player);
        assert_eq!(player.health, before.health);
        assert_eq!(player.y, before.y);
    }

    #[test]
    fn test_tile_coordinates_follow_position() {
        let (mut chomper, platforms) = grounded_setup();
        let mut player = distant_player();
        let grid = TileGrid::new(16.0).unwrap();

        chomper.update(&platforms, &mut player, Some(&grid));
        assert_eq!(chomper.tile_x, grid.pixel_to_tile(chomper.x + chomper.width / 2.0));
        assert_eq!(chomper.tile_y, grid.pixel_to_tile(chomper.y + chomper.height / 2.0));

        // Missing service: coordinates simply stop updating
        let (tile_x, tile_y) = (chomper.tile_x, chomper.tile_y);
        for _ in 0..20 {
            chomper.update(&platforms, &mut player, None);
        }
        assert_eq!(chomper.tile_x, tile_x);
        assert_eq!(chomper.tile_y, tile_y);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_health_stays_bounded(
                damage_amounts in prop::collection::vec(0i32..4, 0..12)
            ) {
                let audio = silent_audio();
                let mut chomper = Chomper::new(100.0, 50.0);
                for amount in damage_amounts {
                    chomper.take_damage(amount, &audio);
                    prop_assert!(chomper.health >= 0);
                    prop_assert!(chomper.health <= chomper.max_health);
                    prop_assert_eq!(chomper.dead, chomper.health == 0);
                }
            }

            #[test]
            fn test_scales_never_drop_below_one(
                player_x in 0f32..300.0,
                ticks in 1usize..200
            ) {
                let (mut chomper, platforms) = grounded_setup();
                let mut player = Player::new(player_x, 52.0);
                for _ in 0..ticks {
                    chomper.update(&platforms, &mut player, None);
                    prop_assert!(chomper.scale >= 1.0);
                    prop_assert!(chomper.scale_y >= 1.0);
                    prop_assert!((0.0..=1.0).contains(&chomper.mouth_open));
                }
            }

            #[test]
            fn test_attack_exit_restores_rest_shape(
                player_x in 0f32..300.0,
                ticks in 1usize..400
            ) {
                let (mut chomper, platforms) = grounded_setup();
                let mut player = Player::new(player_x, 52.0);
                for _ in 0..ticks {
                    chomper.update(&platforms, &mut player, None);
                    if !chomper.is_attacking() {
                        prop_assert_eq!(chomper.scale, 1.0);
                        prop_assert_eq!(chomper.scale_y, 1.0);
                        prop_assert_eq!(chomper.mouth_open, 0.0);
                    }
                }
            }
        }
    }
}
