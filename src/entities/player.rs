use super::projectile::{Projectile, ProjectileOwner};
use crate::collision::{Bounded, Rect};
use crate::config::Config;
use crate::input::{Action, Controls};

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed applied this tick (negative is left)
    pub speed: f32,
    pub is_dashing: bool,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub fire_cooldown: f32,
    pub has_shield: bool,
    pub has_magnet: bool,
    pub magnet_timer: f32,
    pub projectiles: Vec<Projectile>,
}

impl Player {
    pub const SIZE: f32 = 40.0;
    /// Gap between the ship and the bottom edge
    const BOTTOM_MARGIN: f32 = 20.0;

    pub fn new(field_width: f32, field_height: f32) -> Self {
        Self {
            x: Self::start_x(field_width),
            y: field_height - Self::SIZE - Self::BOTTOM_MARGIN,
            width: Self::SIZE,
            height: Self::SIZE,
            speed: 0.0,
            is_dashing: false,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            fire_cooldown: 0.0,
            has_shield: false,
            has_magnet: false,
            magnet_timer: 0.0,
            projectiles: Vec::new(),
        }
    }

    fn start_x(field_width: f32) -> f32 {
        field_width / 2.0 - Self::SIZE / 2.0
    }

    /// Count down timers, steer from held input and advance owned shots.
    pub fn update(&mut self, controls: &Controls, dt: f32, frames: f32, config: &Config) {
        let mut current_speed = config.player_speed;

        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
        }
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }

        if self.is_dashing {
            current_speed = config.dash_speed;
            self.dash_timer -= dt;
            if self.dash_timer <= 0.0 {
                self.is_dashing = false;
                self.dash_cooldown = config.dash_cooldown_ms;
            }
        }

        if self.has_magnet {
            self.magnet_timer -= dt;
            if self.magnet_timer <= 0.0 {
                self.has_magnet = false;
                self.magnet_timer = 0.0;
            }
        }

        self.speed = if controls.is_held(Action::MoveLeft) {
            -current_speed
        } else if controls.is_held(Action::MoveRight) {
            current_speed
        } else {
            0.0
        };

        self.x = (self.x + self.speed * frames).clamp(0.0, config.width - self.width);

        for projectile in &mut self.projectiles {
            projectile.update(frames, config.height);
        }
    }

    pub fn can_dash(&self) -> bool {
        !self.is_dashing && self.dash_cooldown <= 0.0
    }

    /// Start a dash if one is available. Returns true if it started.
    pub fn try_dash(&mut self, config: &Config) -> bool {
        if !self.can_dash() {
            return false;
        }
        self.is_dashing = true;
        self.dash_timer = config.dash_duration_ms;
        true
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    /// Fire from the nose of the ship if the cooldown allows.
    /// Returns true if a shot was added.
    pub fn try_fire(&mut self, config: &Config) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.fire_cooldown = config.fire_cooldown_ms;
        self.projectiles.push(Projectile::new(
            self.x + self.width / 2.0 - Projectile::WIDTH / 2.0,
            self.y,
            ProjectileOwner::Player,
        ));
        true
    }

    pub fn grant_magnet(&mut self, config: &Config) {
        self.has_magnet = true;
        self.magnet_timer = config.magnet_duration_ms;
    }

    /// Put the ship back at its starting spot with no power-ups or shots
    pub fn reset(&mut self, field_width: f32, field_height: f32) {
        *self = Self::new(field_width, field_height);
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
