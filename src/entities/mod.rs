mod collectible;
mod enemy;
mod floating_text;
mod particle;
mod player;
mod projectile;
mod starfield;

// Re-export all public types
pub use collectible::{Collectible, CollectibleKind};
pub use enemy::{Enemy, EnemyContext, EnemyKind};
pub use floating_text::FloatingText;
pub use particle::{Particle, create_burst};
pub use player::Player;
pub use projectile::{Projectile, ProjectileOwner};
pub use starfield::{Star, StarLayer, Starfield};

/// Colour tag carried by entities; the renderer maps it to a terminal colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    White,
    Red,
    Cyan,
    Gray,
    Orange,
    Purple,
    Gold,
    Magenta,
    Blue,
    Lime,
    Yellow,
}
