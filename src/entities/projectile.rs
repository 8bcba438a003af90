use crate::collision::{Bounded, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub owner: ProjectileOwner,
    pub marked_for_deletion: bool,
}

impl Projectile {
    pub const WIDTH: f32 = 4.0;
    pub const HEIGHT: f32 = 15.0;

    pub fn new(x: f32, y: f32, owner: ProjectileOwner) -> Self {
        // Enemy shots travel at 70% of the player's
        let speed = match owner {
            ProjectileOwner::Player => 10.0,
            ProjectileOwner::Enemy => 7.0,
        };

        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            speed,
            owner,
            marked_for_deletion: false,
        }
    }

    /// Advance by `frames` reference frames and flag the shot once it has
    /// left the playfield vertically.
    pub fn update(&mut self, frames: f32, field_height: f32) {
        match self.owner {
            ProjectileOwner::Player => {
                self.y -= self.speed * frames;
                if self.y + self.height < 0.0 {
                    self.marked_for_deletion = true;
                }
            }
            ProjectileOwner::Enemy => {
                self.y += self.speed * frames;
                if self.y > field_height {
                    self.marked_for_deletion = true;
                }
            }
        }
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new() {
        let projectile = Projectile::new(10.0, 10.0, ProjectileOwner::Player);
        assert_eq!(projectile.x, 10.0);
        assert_eq!(projectile.y, 10.0);
        assert_eq!(projectile.width, 4.0);
        assert_eq!(projectile.height, 15.0);
        assert!(!projectile.marked_for_deletion);
    }

    #[test]
    fn test_player_projectile_moves_up() {
        let mut projectile = Projectile::new(10.0, 100.0, ProjectileOwner::Player);
        projectile.update(1.0, 800.0);
        assert_eq!(projectile.y, 90.0);
    }

    #[test]
    fn test_enemy_projectile_moves_down_slower() {
        let mut projectile = Projectile::new(10.0, 100.0, ProjectileOwner::Enemy);
        projectile.update(1.0, 800.0);
        assert_eq!(projectile.y, 107.0);
    }

    #[test]
    fn test_player_projectile_leaves_top() {
        let mut projectile = Projectile::new(10.0, -10.0, ProjectileOwner::Player);
        projectile.update(1.0, 800.0);
        assert!(projectile.marked_for_deletion);
    }

    #[test]
    fn test_enemy_projectile_leaves_bottom() {
        let mut projectile = Projectile::new(10.0, 798.0, ProjectileOwner::Enemy);
        assert!(!projectile.marked_for_deletion);
        projectile.update(1.0, 800.0);
        assert!(projectile.marked_for_deletion);
    }

    #[test]
    fn test_update_scales_with_frames() {
        let mut projectile = Projectile::new(10.0, 100.0, ProjectileOwner::Player);
        projectile.update(0.5, 800.0);
        assert_eq!(projectile.y, 95.0);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_moves_in_correct_direction(
                initial_x in 0f32..600.0,
                initial_y in 0f32..800.0,
                owner in prop::sample::select(vec![ProjectileOwner::Player, ProjectileOwner::Enemy])
            ) {
                let mut projectile = Projectile::new(initial_x, initial_y, owner);
                projectile.update(1.0, 800.0);

                match owner {
                    ProjectileOwner::Player => prop_assert!(projectile.y < initial_y),
                    ProjectileOwner::Enemy => prop_assert!(projectile.y > initial_y),
                }
                prop_assert_eq!(projectile.x, initial_x);
            }

            #[test]
            fn test_deletion_flag_is_sticky(
                initial_y in -100f32..900.0,
                ticks in 1usize..200
            ) {
                let mut projectile = Projectile::new(0.0, initial_y, ProjectileOwner::Player);
                let mut seen = false;
                for _ in 0..ticks {
                    projectile.update(1.0, 800.0);
                    if seen {
                        prop_assert!(projectile.marked_for_deletion);
                    }
                    seen |= projectile.marked_for_deletion;
                }
            }
        }
    }
}
