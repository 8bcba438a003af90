use super::Tint;

/// Short-lived label that drifts upward, e.g. "+30" over a destroyed enemy
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub tint: Tint,
    pub life_ms: f32,
    pub marked_for_deletion: bool,
}

impl FloatingText {
    pub const LIFETIME_MS: f32 = 1000.0;
    const RISE_SPEED: f32 = 1.0;

    pub fn new(x: f32, y: f32, text: impl Into<String>, tint: Tint) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            tint,
            life_ms: Self::LIFETIME_MS,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, frames: f32, dt: f32) {
        self.y -= Self::RISE_SPEED * frames;
        self.life_ms -= dt;
        if self.life_ms <= 0.0 {
            self.marked_for_deletion = true;
        }
    }

    pub fn alpha(&self) -> f32 {
        (self.life_ms / Self::LIFETIME_MS).clamp(0.0, 1.0)
    }
}
