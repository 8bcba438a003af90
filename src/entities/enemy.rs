use super::Tint;
use super::projectile::{Projectile, ProjectileOwner};
use crate::collision::{Bounded, Rect};

/// Bosses stop descending once they reach this height
const BOSS_HOVER_Y: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Asteroid,
    Chaser,
    Shooter,
    Boss,
}

impl EnemyKind {
    pub fn size(&self) -> (f32, f32) {
        match self {
            EnemyKind::Boss => (150.0, 100.0),
            _ => (50.0, 50.0),
        }
    }

    pub fn base_speed(&self) -> f32 {
        match self {
            EnemyKind::Asteroid => 5.0,
            EnemyKind::Chaser => 3.0,
            EnemyKind::Shooter => 2.0,
            EnemyKind::Boss => 1.0,
        }
    }

    pub fn max_health(&self) -> i32 {
        match self {
            EnemyKind::Asteroid => 1,
            EnemyKind::Chaser => 2,
            EnemyKind::Shooter => 3,
            EnemyKind::Boss => 20,
        }
    }

    /// Milliseconds between shots, for kinds that shoot at all
    pub fn shoot_interval(&self) -> Option<f32> {
        match self {
            EnemyKind::Shooter => Some(2000.0),
            EnemyKind::Boss => Some(1000.0),
            _ => None,
        }
    }

    pub fn tint(&self) -> Tint {
        match self {
            EnemyKind::Asteroid => Tint::Gray,
            EnemyKind::Chaser => Tint::Orange,
            EnemyKind::Shooter => Tint::Purple,
            EnemyKind::Boss => Tint::Red,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Boss)
    }
}

/// What an enemy needs to know about the world while it moves
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub player_x: f32,
    pub game_time_ms: f32,
    pub field_width: f32,
    pub field_height: f32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnemyKind,
    pub health: i32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub shoot_timer: f32,
    pub marked_for_deletion: bool,
}

impl Enemy {
    /// Place a new enemy just above the top edge at `x`.
    pub fn new(kind: EnemyKind, x: f32, difficulty: f32) -> Self {
        let (width, height) = kind.size();
        Self {
            x,
            y: -height,
            width,
            height,
            kind,
            health: kind.max_health(),
            speed_x: 0.0,
            speed_y: kind.base_speed() * difficulty,
            shoot_timer: 0.0,
            marked_for_deletion: false,
        }
    }

    /// Advance one tick. Returns a projectile when the enemy fires.
    pub fn update(&mut self, frames: f32, dt: f32, ctx: &EnemyContext) -> Option<Projectile> {
        self.y += self.speed_y * frames;
        self.x += self.speed_x * frames;

        if self.kind == EnemyKind::Chaser {
            if self.x < ctx.player_x {
                self.speed_x = 1.0;
            } else if self.x > ctx.player_x {
                self.speed_x = -1.0;
            }
        }

        let mut shot = None;
        if let Some(interval) = self.kind.shoot_interval() {
            self.shoot_timer += dt;
            if self.shoot_timer > interval {
                self.shoot_timer = 0.0;
                shot = Some(Projectile::new(
                    self.x + self.width / 2.0 - Projectile::WIDTH / 2.0,
                    self.y + self.height,
                    ProjectileOwner::Enemy,
                ));
            }
        }

        if self.kind.is_boss() {
            if self.y > BOSS_HOVER_Y {
                self.y = BOSS_HOVER_Y;
                self.speed_x = (ctx.game_time_ms / 1000.0).sin() * 2.0;
            }
            self.x = self.x.clamp(0.0, ctx.field_width - self.width);
        }

        if self.y > ctx.field_height + self.height {
            self.marked_for_deletion = true;
        }

        shot
    }

    /// Apply one point of damage. Returns true when this hit destroyed it.
    pub fn take_hit(&mut self) -> bool {
        self.health -= 1;
        self.health <= 0
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32) / (self.kind.max_health() as f32)
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
