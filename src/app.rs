use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::TICK_MS;
use crate::entities::{Chomper, GameState, Inventory, Particle, Player, burst};
use crate::input::{InputAction, InputManager};
use crate::level::{Level, TileGrid};
use crate::render::{GameRenderer, RenderView};

/// The main application which holds the state and logic of the game.
pub struct App {
    running: bool,
    game_state: GameState,
    level: Level,
    tiles: TileGrid,
    player: Player,
    chompers: Vec<Chomper>,
    particles: Vec<Particle>,
    gems: Vec<(f32, f32)>,
    inventory: Inventory,
    /// Frames info
    frame_count: u64,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`] running the built-in level.
    pub fn new() -> Result<Self> {
        Ok(Self::from_level(Level::demo()?))
    }

    fn from_level(level: Level) -> Self {
        let (spawn_x, spawn_y) = level.player_spawn;
        let chompers = level
            .chomper_spawns
            .iter()
            .map(|&(x, y)| Chomper::new(x, y))
            .collect();
        let gems = level.gem_spawns.clone();

        Self {
            running: true,
            game_state: GameState::Playing,
            player: Player::new(spawn_x, spawn_y),
            chompers,
            particles: Vec::new(),
            gems,
            inventory: Inventory::new(),
            tiles: TileGrid::default(),
            level,
            frame_count: 0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager: AudioManager::default(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.game_state,
                    player: &self.player,
                    chompers: &self.chompers,
                    particles: &self.particles,
                    gems: &self.gems,
                    level: &self.level,
                    inventory: &self.inventory,
                    frame_count: self.frame_count,
                    fps: self.fps,
                    area: frame.area(),
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(&self.game_state)?;
            let actions = self.input_manager.get_actions(&self.game_state);
            self.process_actions(&actions);

            if self.game_state == GameState::Playing {
                self.update_game();
            }

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(TICK_MS));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        if self.game_state == GameState::Playing {
            // Held movement keys re-assert velocity every frame
            self.player.stop();
        }

        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause => {
                    self.game_state = GameState::Paused;
                }
                InputAction::Resume => {
                    self.game_state = GameState::Playing;
                }
                InputAction::Restart => {
                    *self = Self::from_level(self.level.clone());
                }
                InputAction::MoveLeft => {
                    self.player.run(-1.0);
                }
                InputAction::MoveRight => {
                    self.player.run(1.0);
                }
                InputAction::Jump => {
                    self.player.jump();
                }
                InputAction::GroundSlam => {
                    self.player.start_ground_slam();
                }
            }
        }
    }

    /// Update game logic
    fn update_game(&mut self) {
        self.frame_count += 1;

        let health_before = self.player.health;
        self.player.update(&self.level.platforms);

        for chomper in &mut self.chompers {
            chomper.update(&self.level.platforms, &mut self.player, Some(&self.tiles));
        }

        // Ground slam adjudication: the creature exposes the predicate, the
        // game decides to apply the damage.
        for i in 0..self.chompers.len() {
            if self.chompers[i].check_ground_slam_hit(&self.player)
                && self.chompers[i].take_damage(1, &self.audio_manager)
            {
                let chomper = &self.chompers[i];
                self.particles.extend(burst(
                    chomper.x + chomper.width / 2.0,
                    chomper.y + chomper.height / 2.0,
                ));
                // Rebound so the slam doesn't carry into the corpse
                self.player.velocity_y = -4.0;
                self.player.ground_slamming = false;
            }
        }

        if self.player.health < health_before {
            self.audio_manager.play_player_hurt();
        }

        // Bodies that have tumbled off screen are done
        self.chompers.retain(|chomper| !chomper.is_gone());

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|particle| !particle.is_dead());

        // Collect gems the player walks through
        let player = &self.player;
        let inventory = &mut self.inventory;
        self.gems.retain(|&(gem_x, gem_y)| {
            let collected = player.x < gem_x + 12.0
                && player.x + player.width > gem_x + 4.0
                && player.y < gem_y + 12.0
                && player.y + player.height > gem_y + 4.0;
            if collected {
                inventory.collect_gem();
            }
            !collected
        });

        // Falling out of the cave is fatal
        if self.player.y > self.level.height + 100.0 {
            self.player.health = 0;
        }

        if !self.player.is_alive() {
            self.game_state = GameState::GameOver;
        }
    }
}
