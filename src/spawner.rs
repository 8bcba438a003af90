//! Time-accumulator spawning for enemies and collectibles

use rand::Rng;

use crate::config::Config;
use crate::entities::{Collectible, CollectibleKind, Enemy, EnemyKind};

/// Score state the spawner needs to decide on bosses
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub score: u32,
    pub last_boss_score: u32,
    pub boss_active: bool,
    pub difficulty: f32,
}

impl SpawnContext {
    pub fn boss_due(&self, config: &Config) -> bool {
        !self.boss_active
            && self.score.saturating_sub(self.last_boss_score) >= config.boss_score_threshold
    }
}

/// Entities produced by one spawner tick
#[derive(Debug, Default)]
pub struct Spawned {
    pub enemy: Option<Enemy>,
    pub collectible: Option<Collectible>,
}

#[derive(Debug, Clone, Default)]
pub struct Spawner {
    pub enemy_timer: f32,
    pub collectible_timer: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        dt: f32,
        ctx: &SpawnContext,
        config: &Config,
        rng: &mut impl Rng,
    ) -> Spawned {
        let mut spawned = Spawned::default();

        self.enemy_timer += dt;
        if self.enemy_timer > config.enemy_interval_ms {
            self.enemy_timer = 0.0;
            spawned.enemy = spawn_enemy(ctx, config, rng);
        }

        self.collectible_timer += dt;
        if self.collectible_timer > config.collectible_interval_ms {
            self.collectible_timer = 0.0;
            let kind = pick_collectible_kind(rng.random(), &config.collectible_weights);
            let x = rng.random_range(0.0..config.width - Collectible::SIZE);
            spawned.collectible = Some(Collectible::new(kind, x, ctx.difficulty));
        }

        spawned
    }
}

/// Fill one enemy slot: a boss when one is due, nothing while a boss is
/// alive, otherwise a weighted random kind.
fn spawn_enemy(ctx: &SpawnContext, config: &Config, rng: &mut impl Rng) -> Option<Enemy> {
    if ctx.boss_due(config) {
        let (width, _) = EnemyKind::Boss.size();
        return Some(Enemy::new(
            EnemyKind::Boss,
            config.width / 2.0 - width / 2.0,
            ctx.difficulty,
        ));
    }
    if ctx.boss_active {
        return None;
    }

    let kind = pick_enemy_kind(rng.random(), &config.enemy_weights);
    let (width, _) = kind.size();
    let x = rng.random_range(0.0..config.width - width);
    Some(Enemy::new(kind, x, ctx.difficulty))
}

/// Cumulative-probability draw; `roll` is in `[0, 1)`
pub fn pick_enemy_kind(roll: f32, weights: &[f32; 3]) -> EnemyKind {
    if roll < weights[0] {
        EnemyKind::Asteroid
    } else if roll < weights[1] {
        EnemyKind::Chaser
    } else {
        EnemyKind::Shooter
    }
}

pub fn pick_collectible_kind(roll: f32, weights: &[f32; 5]) -> CollectibleKind {
    CollectibleKind::ALL
        .into_iter()
        .zip(weights)
        .find(|(_, threshold)| roll < **threshold)
        .map(|(kind, _)| kind)
        .unwrap_or(CollectibleKind::Magnet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(score: u32, last_boss_score: u32, boss_active: bool) -> SpawnContext {
        SpawnContext {
            score,
            last_boss_score,
            boss_active,
            difficulty: 1.0,
        }
    }

    #[test]
    fn test_enemy_kind_distribution_edges() {
        let weights = Config::default().enemy_weights;
        assert_eq!(pick_enemy_kind(0.0, &weights), EnemyKind::Asteroid);
        assert_eq!(pick_enemy_kind(0.79, &weights), EnemyKind::Asteroid);
        assert_eq!(pick_enemy_kind(0.8, &weights), EnemyKind::Chaser);
        assert_eq!(pick_enemy_kind(0.9, &weights), EnemyKind::Shooter);
        assert_eq!(pick_enemy_kind(0.999, &weights), EnemyKind::Shooter);
    }

    #[test]
    fn test_collectible_kind_distribution_edges() {
        let weights = Config::default().collectible_weights;
        assert_eq!(pick_collectible_kind(0.0, &weights), CollectibleKind::Coin);
        assert_eq!(pick_collectible_kind(0.6, &weights), CollectibleKind::Boost);
        assert_eq!(pick_collectible_kind(0.75, &weights), CollectibleKind::Life);
        assert_eq!(pick_collectible_kind(0.85, &weights), CollectibleKind::Shield);
        assert_eq!(pick_collectible_kind(0.95, &weights), CollectibleKind::Magnet);
    }

    #[test]
    fn test_enemy_spawns_once_interval_exceeded() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();

        let spawned = spawner.update(1000.0, &ctx(0, 0, false), &config, &mut rng);
        assert!(spawned.enemy.is_none());
        assert_eq!(spawner.enemy_timer, 1000.0);

        let spawned = spawner.update(1.0, &ctx(0, 0, false), &config, &mut rng);
        let enemy = spawned.enemy.expect("enemy should spawn");
        assert!(!enemy.kind.is_boss());
        assert!(enemy.x >= 0.0 && enemy.x < 550.0);
        assert_eq!(spawner.enemy_timer, 0.0);
    }

    #[test]
    fn test_collectible_interval() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();
        let mut count = 0;
        for _ in 0..250 {
            if spawner
                .update(16.0, &ctx(0, 0, false), &config, &mut rng)
                .collectible
                .is_some()
            {
                count += 1;
            }
        }
        // 4000ms of ticks with a 2000ms interval, reset to zero on spawn
        assert_eq!(count, 1);
    }

    #[test]
    fn test_boss_replaces_enemy_when_due() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();
        let spawned = spawner.update(1001.0, &ctx(1000, 0, false), &config, &mut rng);
        let boss = spawned.enemy.expect("boss should spawn");
        assert_eq!(boss.kind, EnemyKind::Boss);
        assert_eq!(boss.x, 225.0);
    }

    #[test]
    fn test_no_boss_below_threshold() {
        let config = Config::default();
        assert!(!ctx(999, 0, false).boss_due(&config));
        assert!(!ctx(1500, 600, false).boss_due(&config));
        assert!(ctx(1600, 600, false).boss_due(&config));
    }

    #[test]
    fn test_active_boss_blocks_enemy_slot() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::new();
        let spawned = spawner.update(1001.0, &ctx(5000, 0, true), &config, &mut rng);
        assert!(spawned.enemy.is_none());
        assert_eq!(spawner.enemy_timer, 0.0);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawns_stay_inside_playfield(seed in any::<u64>(), ticks in 1usize..400) {
                let config = Config::default();
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut spawner = Spawner::new();
                for _ in 0..ticks {
                    let spawned = spawner.update(16.0, &ctx(0, 0, false), &config, &mut rng);
                    if let Some(enemy) = spawned.enemy {
                        prop_assert!(enemy.x >= 0.0 && enemy.x + enemy.width <= config.width);
                    }
                    if let Some(item) = spawned.collectible {
                        prop_assert!(item.x >= 0.0 && item.x + item.width <= config.width);
                    }
                }
            }

            #[test]
            fn test_boss_gating(score in 0u32..10_000, last in 0u32..10_000, active in any::<bool>()) {
                let config = Config::default();
                let due = ctx(score, last, active).boss_due(&config);
                prop_assert_eq!(due, !active && score >= last && score - last >= 1000);
            }
        }
    }
}
