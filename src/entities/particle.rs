use rand::Rng;

use super::Tint;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub size: f32,
    pub life: f32,
    pub tint: Tint,
    pub marked_for_deletion: bool,
}

impl Particle {
    pub const MAX_LIFE: f32 = 100.0;

    pub fn new(x: f32, y: f32, velocity_x: f32, velocity_y: f32, size: f32, tint: Tint) -> Self {
        Self {
            x,
            y,
            velocity_x,
            velocity_y,
            size,
            life: Self::MAX_LIFE,
            tint,
            marked_for_deletion: false,
        }
    }

    pub fn random(x: f32, y: f32, tint: Tint, rng: &mut impl Rng) -> Self {
        Self::new(
            x,
            y,
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
            rng.random_range(1.0..4.0),
            tint,
        )
    }

    pub fn update(&mut self, frames: f32) {
        self.x += self.velocity_x * frames;
        self.y += self.velocity_y * frames;
        self.life -= 2.0 * frames;
        if self.life <= 0.0 {
            self.marked_for_deletion = true;
        }
    }

    /// Remaining life in 0..=1, used for fading
    pub fn alpha(&self) -> f32 {
        (self.life / Self::MAX_LIFE).clamp(0.0, 1.0)
    }
}

/// Scatter `amount` particles from a point
pub fn create_burst(x: f32, y: f32, tint: Tint, amount: usize, rng: &mut impl Rng) -> Vec<Particle> {
    (0..amount).map(|_| Particle::random(x, y, tint, rng)).collect()
}
