//! Game state and the per-frame simulation step
//!
//! `step` is the only way the simulation advances. It never touches the
//! terminal, the clock or the disk: input arrives as a [`Controls`] snapshot,
//! time as a millisecond delta, and everything the outside world should react
//! to is queued as a [`GameEvent`] for the host to drain.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::Cue;
use crate::collision::{Bounded, collides};
use crate::config::{Config, FRAME_MS};
use crate::entities::{
    Collectible, CollectibleKind, Enemy, EnemyContext, EnemyKind, FloatingText, Particle,
    Player, Projectile, Starfield, Tint, create_burst,
};
use crate::input::{Action, Controls};
use crate::spawner::{SpawnContext, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Paused,
    GameOver,
}

/// Side effects requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Cue),
    /// The run ended above the stored record
    NewHighScore(u32),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_projectiles: Vec<Projectile>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    pub floating_texts: Vec<FloatingText>,
    pub starfield: Starfield,
    pub spawner: Spawner,
    pub score: u32,
    pub lives: u32,
    pub combo_count: u32,
    pub combo_timer: f32,
    /// Simulated milliseconds since the run started
    pub game_time: f32,
    pub difficulty: f32,
    pub boss_active: bool,
    pub last_boss_score: u32,
    pub high_score: u32,
    pub shake_intensity: f32,
    pub shake_timer: f32,
    pub seed: u64,
    previous_controls: Controls,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: Config, high_score: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(config.width, config.height, &mut rng);
        Self {
            phase: GamePhase::Running,
            player: Player::new(config.width, config.height),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            floating_texts: Vec::new(),
            starfield,
            spawner: Spawner::new(),
            score: 0,
            lives: config.starting_lives,
            combo_count: 0,
            combo_timer: 0.0,
            game_time: 0.0,
            difficulty: 1.0,
            boss_active: false,
            last_boss_score: 0,
            high_score,
            shake_intensity: 0.0,
            shake_timer: 0.0,
            seed,
            previous_controls: Controls::default(),
            rng,
            events: Vec::new(),
            config,
        }
    }

    /// Start a fresh run. The high score and the random stream carry over.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Running;
        self.player.reset(self.config.width, self.config.height);
        self.enemies.clear();
        self.enemy_projectiles.clear();
        self.collectibles.clear();
        self.particles.clear();
        self.floating_texts.clear();
        self.spawner = Spawner::new();
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.combo_count = 0;
        self.combo_timer = 0.0;
        self.game_time = 0.0;
        self.difficulty = 1.0;
        self.boss_active = false;
        self.last_boss_score = 0;
        self.shake_intensity = 0.0;
        self.shake_timer = 0.0;
        log::info!("Run restarted (high score {})", self.high_score);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.combo_count.min(self.config.combo_cap).max(1)
    }

    fn emit(&mut self, cue: Cue) {
        self.events.push(GameEvent::Sound(cue));
    }

    fn screen_shake(&mut self, intensity: f32, duration: f32) {
        self.shake_intensity = intensity;
        self.shake_timer = duration;
    }

    fn burst(&mut self, at: (f32, f32), tint: Tint, amount: usize) {
        let particles = create_burst(at.0, at.1, tint, amount, &mut self.rng);
        self.particles.extend(particles);
    }

    fn count_down_timers(&mut self, dt: f32) {
        if self.shake_timer > 0.0 {
            self.shake_timer -= dt;
            if self.shake_timer <= 0.0 {
                self.shake_timer = 0.0;
                self.shake_intensity = 0.0;
            }
        }

        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo_timer = 0.0;
                self.combo_count = 0;
            }
        }
    }

    fn update_player(&mut self, controls: &Controls, dt: f32, frames: f32) {
        if controls.pressed_since(&self.previous_controls, Action::Dash)
            && self.player.try_dash(&self.config)
        {
            let (cx, _) = self.player.center();
            let bottom = self.player.y + self.player.height;
            self.burst((cx, bottom), Tint::Cyan, 10);
        }

        self.player.update(controls, dt, frames, &self.config);

        if controls.is_held(Action::Fire) && self.player.try_fire(&self.config) {
            self.emit(Cue::Shoot);
        }
    }

    fn spawn(&mut self, dt: f32) {
        let ctx = SpawnContext {
            score: self.score,
            last_boss_score: self.last_boss_score,
            boss_active: self.boss_active,
            difficulty: self.difficulty,
        };
        let spawned = self.spawner.update(dt, &ctx, &self.config, &mut self.rng);

        if let Some(enemy) = spawned.enemy {
            if enemy.kind.is_boss() {
                self.boss_active = true;
                log::info!("Boss incoming at score {}", self.score);
            } else {
                log::debug!("Spawned {:?} at x={:.0}", enemy.kind, enemy.x);
            }
            self.enemies.push(enemy);
        }
        if let Some(collectible) = spawned.collectible {
            log::debug!("Spawned {:?} at x={:.0}", collectible.kind, collectible.x);
            self.collectibles.push(collectible);
        }
    }

    fn update_entities(&mut self, dt: f32, frames: f32) {
        for particle in &mut self.particles {
            particle.update(frames);
        }
        for text in &mut self.floating_texts {
            text.update(frames, dt);
        }

        let ctx = EnemyContext {
            player_x: self.player.x,
            game_time_ms: self.game_time,
            field_width: self.config.width,
            field_height: self.config.height,
        };
        for enemy in &mut self.enemies {
            if let Some(shot) = enemy.update(frames, dt, &ctx) {
                self.enemy_projectiles.push(shot);
            }
        }

        for projectile in &mut self.enemy_projectiles {
            projectile.update(frames, self.config.height);
        }

        let player_center = self.player.center();
        for collectible in &mut self.collectibles {
            collectible.update(frames, self.config.height);
            if self.player.has_magnet && collectible.kind == CollectibleKind::Coin {
                collectible.pull_toward(
                    player_center,
                    self.config.magnet_radius,
                    self.config.magnet_pull_divisor,
                );
            }
        }
    }

    /// Player shots against enemies. A shot stops at the first enemy it hits.
    fn resolve_player_shots(&mut self) {
        let mut kills = Vec::new();
        let mut hits = Vec::new();

        for projectile in &mut self.player.projectiles {
            if projectile.marked_for_deletion {
                continue;
            }
            for (idx, enemy) in self.enemies.iter_mut().enumerate() {
                if enemy.marked_for_deletion || !collides(projectile, enemy) {
                    continue;
                }
                projectile.marked_for_deletion = true;
                if enemy.take_hit() {
                    enemy.marked_for_deletion = true;
                    kills.push(idx);
                } else {
                    hits.push((projectile.x, projectile.y));
                }
                break;
            }
        }

        for at in hits {
            self.burst(at, Tint::White, 3);
        }
        for idx in kills {
            let enemy = self.enemies[idx].bounds();
            let kind = self.enemies[idx].kind;
            self.register_kill(enemy.center(), kind);
        }
    }

    fn register_kill(&mut self, at: (f32, f32), kind: EnemyKind) {
        self.combo_count += 1;
        self.combo_timer = self.config.combo_window_ms;
        let multiplier = self.combo_count.min(self.config.combo_cap);
        let points = self.config.kill_points * multiplier;
        self.score += points;

        let label = if multiplier > 1 {
            format!("+{points} x{multiplier}")
        } else {
            format!("+{points}")
        };
        self.floating_texts
            .push(FloatingText::new(at.0, at.1, label, Tint::Yellow));

        if kind.is_boss() {
            self.score += self.config.boss_bonus;
            self.boss_active = false;
            self.last_boss_score = self.score;
            self.floating_texts.push(FloatingText::new(
                at.0,
                at.1 + 20.0,
                format!("BOSS +{}", self.config.boss_bonus),
                Tint::Red,
            ));
            self.burst(at, kind.tint(), 40);
            self.screen_shake(15.0, 500.0);
            log::info!("Boss defeated, score {}", self.score);
        } else {
            self.burst(at, kind.tint(), 10);
            self.screen_shake(2.0, 50.0);
        }
        self.emit(Cue::Explosion);
    }

    /// Ship against enemy bodies. Regular enemies are destroyed on contact,
    /// bosses are not.
    fn resolve_body_contact(&mut self) {
        let player = self.player.bounds();
        let mut contacts = 0;
        for enemy in &mut self.enemies {
            if enemy.marked_for_deletion || !player.overlaps(&enemy.bounds()) {
                continue;
            }
            if !enemy.kind.is_boss() {
                enemy.marked_for_deletion = true;
            }
            contacts += 1;
        }

        for _ in 0..contacts {
            self.damage_player();
        }
    }

    fn resolve_enemy_shots(&mut self) {
        let player = self.player.bounds();
        let mut hits = 0;
        for projectile in &mut self.enemy_projectiles {
            if !projectile.marked_for_deletion && player.overlaps(&projectile.bounds()) {
                projectile.marked_for_deletion = true;
                hits += 1;
            }
        }

        for _ in 0..hits {
            self.damage_player();
        }
    }

    /// Shield absorbs the hit, a dash ignores it, otherwise a life is lost.
    fn damage_player(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        let center = self.player.center();

        if self.player.has_shield {
            self.player.has_shield = false;
            self.burst(center, Tint::Cyan, 20);
            self.screen_shake(10.0, 200.0);
            self.emit(Cue::Explosion);
            return;
        }
        if self.player.is_dashing {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.burst(center, Tint::Red, 20);
        self.screen_shake(20.0, 400.0);
        self.emit(Cue::Explosion);

        if self.lives == 0 {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.emit(Cue::GameOver);
        log::info!("Game over with score {}", self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
            log::info!("New high score {}", self.score);
        }
    }

    fn resolve_pickups(&mut self) {
        let player = self.player.bounds();
        let mut collected = Vec::new();
        for collectible in &mut self.collectibles {
            if !collectible.marked_for_deletion && player.overlaps(&collectible.bounds()) {
                collectible.marked_for_deletion = true;
                collected.push((collectible.kind, collectible.center()));
            }
        }

        for (kind, at) in collected {
            self.apply_pickup(kind, at);
        }
    }

    fn apply_pickup(&mut self, kind: CollectibleKind, at: (f32, f32)) {
        self.burst(at, kind.tint(), 10);

        let label = match kind {
            CollectibleKind::Coin => {
                self.score += self.config.coin_points;
                self.emit(Cue::CollectCoin);
                format!("+{}", self.config.coin_points)
            }
            CollectibleKind::Boost => {
                self.score += self.config.boost_points;
                self.emit(Cue::PowerUp);
                format!("+{}", self.config.boost_points)
            }
            CollectibleKind::Life => {
                self.lives += 1;
                self.emit(Cue::PowerUp);
                kind.get_name().to_string()
            }
            CollectibleKind::Shield => {
                self.player.has_shield = true;
                self.emit(Cue::PowerUp);
                kind.get_name().to_string()
            }
            CollectibleKind::Magnet => {
                self.player.grant_magnet(&self.config);
                self.emit(Cue::PowerUp);
                kind.get_name().to_string()
            }
        };
        self.floating_texts
            .push(FloatingText::new(at.0, at.1, label, kind.tint()));
    }

    /// Drop every entity flagged during this tick
    fn prune(&mut self) {
        self.player.projectiles.retain(|p| !p.marked_for_deletion);
        self.enemies.retain(|e| !e.marked_for_deletion);
        self.enemy_projectiles.retain(|p| !p.marked_for_deletion);
        self.collectibles.retain(|c| !c.marked_for_deletion);
        self.particles.retain(|p| !p.marked_for_deletion);
        self.floating_texts.retain(|t| !t.marked_for_deletion);
    }

    fn simulate(&mut self, controls: &Controls, dt: f32) {
        let frames = dt / FRAME_MS;

        self.game_time += dt;
        self.difficulty = self.config.difficulty_at(self.game_time);
        self.count_down_timers(dt);
        self.starfield.update(frames, self.difficulty, &mut self.rng);

        self.update_player(controls, dt, frames);
        self.spawn(dt);
        self.update_entities(dt, frames);

        // Shots resolve before contact, so an enemy destroyed this tick
        // cannot also hurt the player.
        self.resolve_player_shots();
        self.resolve_body_contact();
        self.resolve_enemy_shots();
        // A run that just ended keeps its final score and lives
        if self.phase == GamePhase::Running {
            self.resolve_pickups();
        }

        self.prune();
    }
}

/// Advance the game by `dt` milliseconds of simulated time.
pub fn step(state: &mut GameState, controls: &Controls, dt: f32) {
    let dt = dt.max(0.0);
    let pause_pressed = controls.pressed_since(&state.previous_controls, Action::Pause);

    match state.phase {
        GamePhase::Running if pause_pressed => {
            state.phase = GamePhase::Paused;
            log::debug!("Paused");
        }
        GamePhase::Running => state.simulate(controls, dt),
        GamePhase::Paused => {
            if pause_pressed {
                state.phase = GamePhase::Running;
                log::debug!("Resumed");
            }
        }
        GamePhase::GameOver => {
            if controls.is_held(Action::Confirm) {
                state.reset();
            }
        }
    }

    state.previous_controls = *controls;
}
