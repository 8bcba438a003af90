use super::Tint;
use crate::collision::{Bounded, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Coin,
    Boost,
    Life,
    Shield,
    Magnet,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 5] = [
        CollectibleKind::Coin,
        CollectibleKind::Boost,
        CollectibleKind::Life,
        CollectibleKind::Shield,
        CollectibleKind::Magnet,
    ];

    pub fn tint(&self) -> Tint {
        match self {
            CollectibleKind::Coin => Tint::Gold,
            CollectibleKind::Boost => Tint::Cyan,
            CollectibleKind::Life => Tint::Magenta,
            CollectibleKind::Shield => Tint::Blue,
            CollectibleKind::Magnet => Tint::Lime,
        }
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            CollectibleKind::Coin => "Coin",
            CollectibleKind::Boost => "Boost",
            CollectibleKind::Life => "1UP",
            CollectibleKind::Shield => "Shield",
            CollectibleKind::Magnet => "Magnet",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kind: CollectibleKind,
    pub marked_for_deletion: bool,
}

impl Collectible {
    pub const SIZE: f32 = 30.0;

    pub fn new(kind: CollectibleKind, x: f32, difficulty: f32) -> Self {
        Self {
            x,
            y: -Self::SIZE,
            width: Self::SIZE,
            height: Self::SIZE,
            speed: 3.0 * difficulty,
            kind,
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, frames: f32, field_height: f32) {
        self.y += self.speed * frames;
        if self.y > field_height {
            self.marked_for_deletion = true;
        }
    }

    /// Move a fraction of the way toward `target` when it is within `radius`
    /// of this collectible's centre. Returns true if it moved.
    pub fn pull_toward(&mut self, target: (f32, f32), radius: f32, divisor: f32) -> bool {
        let (cx, cy) = self.center();
        let dx = target.0 - cx;
        let dy = target.1 - cy;
        if (dx * dx + dy * dy).sqrt() >= radius {
            return false;
        }
        self.x += dx / divisor;
        self.y += dy / divisor;
        true
    }
}

impl Bounded for Collectible {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collectible_falls() {
        let mut coin = Collectible::new(CollectibleKind::Coin, 100.0, 1.0);
        assert_eq!(coin.y, -30.0);
        coin.update(1.0, 800.0);
        assert_eq!(coin.y, -27.0);
    }

    #[test]
    fn test_collectible_marked_below_screen() {
        let mut coin = Collectible::new(CollectibleKind::Coin, 100.0, 1.0);
        coin.y = 799.0;
        coin.update(1.0, 800.0);
        assert!(coin.marked_for_deletion);
    }

    #[test]
    fn test_pull_within_radius() {
        let mut coin = Collectible::new(CollectibleKind::Coin, 100.0, 1.0);
        coin.y = 100.0;
        // centre (115, 115), target 100 px to the right
        assert!(coin.pull_toward((215.0, 115.0), 200.0, 20.0));
        assert_eq!(coin.x, 105.0);
        assert_eq!(coin.y, 100.0);
    }

    #[test]
    fn test_no_pull_outside_radius() {
        let mut coin = Collectible::new(CollectibleKind::Coin, 0.0, 1.0);
        coin.y = 0.0;
        assert!(!coin.pull_toward((215.0, 15.0), 200.0, 20.0));
        assert_eq!(coin.x, 0.0);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pull_always_closes_distance(
                x in 0f32..570.0,
                y in 0f32..770.0,
                tx in 0f32..600.0,
                ty in 0f32..800.0
            ) {
                let mut coin = Collectible::new(CollectibleKind::Coin, x, 1.0);
                coin.y = y;
                let (cx, cy) = coin.center();
                let before = ((tx - cx).powi(2) + (ty - cy).powi(2)).sqrt();
                let moved = coin.pull_toward((tx, ty), 200.0, 20.0);
                let (nx, ny) = coin.center();
                let after = ((tx - nx).powi(2) + (ty - ny).powi(2)).sqrt();

                prop_assert_eq!(moved, before < 200.0);
                prop_assert!(after <= before + 1e-3);
            }
        }
    }
}
