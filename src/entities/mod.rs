mod chomper;
mod game_state;
mod inventory;
mod particle;
mod player;

// Re-export all public types
pub use chomper::{AttackPhase, Chomper};
pub use game_state::GameState;
pub use inventory::Inventory;
pub use particle::{Particle, burst};
pub use player::Player;
