// Library exports for the binary and integration tests
pub use collision::{Bounded, Rect, collides};
pub use config::Config;
pub use entities::{
    Collectible, CollectibleKind, Enemy, EnemyKind, Player, Projectile, ProjectileOwner,
};
pub use game::{GameEvent, GamePhase, GameState, step};
pub use input::{Action, Controls};

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod entities;
pub mod game;
pub mod highscore;
pub mod input;
pub mod renderer;
pub mod spawner;
