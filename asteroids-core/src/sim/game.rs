use super::entities::{Asteroid, Projectile, Saucer, Ship};
use super::*;
use crate::constants::{
    INITIAL_ASTEROIDS, INVULNERABLE_BLINK_PERIOD, INVULNERABLE_BLINK_VISIBLE,
    INVULNERABLE_FRAMES, PLAYER_PROJECTILE_LIMIT, SAUCER_HEIGHT, SAUCER_POINTS,
    SAUCER_SPAWN_CHANCE, SAUCER_WIDTH, SHIP_ENEMY_SHOT_PAD, STARTING_LIVES,
    WAVE_BONUS_MAX, WAVE_BONUS_SCORE_STEP, WAVE_SAFE_DISTANCE, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::geometry::distance;
use crate::rng::SeededRng;

const PRUNE_PROJECTILES: u8 = 1 << 0;
const PRUNE_ASTEROIDS: u8 = 1 << 1;
const PRUNE_SAUCERS: u8 = 1 << 2;

const ASTEROID_VEC_CAPACITY: usize = 64;
const PROJECTILE_VEC_CAPACITY: usize = PLAYER_PROJECTILE_LIMIT + 8;

/// What one tick changed, for the session and for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct TickReport {
    pub(super) points: u32,
    pub(super) asteroids_destroyed: u32,
    pub(super) saucers_destroyed: u32,
    pub(super) ship_hit: bool,
    pub(super) wave_spawned: bool,
}

/// One match: the entity sets plus score, lives and invulnerability.
#[derive(Clone)]
pub(super) struct Game {
    pub(super) ship: Ship,
    pub(super) projectiles: Vec<Projectile>,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) saucers: Vec<Saucer>,
    pub(super) score: u32,
    pub(super) lives: u32,
    pub(super) wave: u32,
    pub(super) invulnerable_timer: i32,
    pub(super) frame_count: u32,
    pub(super) rng: SeededRng,
    prune_mask: u8,
}

impl Game {
    #[cfg(test)]
    pub(super) fn new(seed: u32) -> Self {
        Self::with_rng(SeededRng::new(seed))
    }

    pub(super) fn with_rng(rng: SeededRng) -> Self {
        let mut game = Self {
            ship: Ship::spawn(),
            projectiles: Vec::with_capacity(PROJECTILE_VEC_CAPACITY),
            asteroids: Vec::with_capacity(ASTEROID_VEC_CAPACITY),
            saucers: Vec::with_capacity(1),
            score: 0,
            lives: STARTING_LIVES,
            wave: 1,
            invulnerable_timer: 0,
            frame_count: 0,
            rng,
            prune_mask: 0,
        };
        game.spawn_asteroids(INITIAL_ASTEROIDS);
        game
    }

    /// Fresh match; the generator keeps running from where it was.
    pub(super) fn reset(&mut self) {
        *self = Self::with_rng(self.rng);
    }

    pub(super) fn rotate_left(&mut self) {
        self.ship.rotate_left();
    }

    pub(super) fn rotate_right(&mut self) {
        self.ship.rotate_right();
    }

    pub(super) fn thrust(&mut self) {
        self.ship.thrust();
    }

    /// Launches a player projectile from the ship's nose unless the cap is
    /// already reached.
    pub(super) fn fire(&mut self) -> bool {
        if self.player_projectiles() >= PLAYER_PROJECTILE_LIMIT {
            return false;
        }

        let (x, y) = self.ship.nose();
        self.projectiles
            .push(Projectile::fired(x, y, self.ship.angle, Owner::Player));
        true
    }

    pub(super) fn player_projectiles(&self) -> usize {
        self.projectiles
            .iter()
            .filter(|entry| entry.alive && entry.owner == Owner::Player)
            .count()
    }

    pub(super) fn step(&mut self) -> TickReport {
        let mut report = TickReport::default();
        self.frame_count += 1;

        self.ship.advance();
        self.update_projectiles();
        self.update_asteroids();
        self.update_saucers();
        self.maybe_spawn_saucer();

        if self.invulnerable_timer > 0 {
            self.invulnerable_timer -= 1;
        }

        self.handle_collisions(&mut report);
        self.prune_destroyed_entities();

        if self.asteroids.is_empty() && self.lives > 0 {
            self.spawn_wave();
            report.wave_spawned = true;
        }

        report
    }

    pub(super) fn wave_size(score: u32) -> usize {
        let bonus = (score / WAVE_BONUS_SCORE_STEP) as usize;
        INITIAL_ASTEROIDS + bonus.min(WAVE_BONUS_MAX)
    }

    fn spawn_wave(&mut self) {
        self.wave += 1;
        let count = Self::wave_size(self.score);
        self.spawn_asteroids(count);
        tracing::debug!(wave = self.wave, count, score = self.score, "wave spawned");
    }

    /// Large asteroids at random points farther than the safe distance from
    /// the ship. Rejection-samples until each point qualifies.
    fn spawn_asteroids(&mut self, count: usize) {
        for _ in 0..count {
            let (x, y) = loop {
                let x = self.rng.uniform(0.0, WORLD_WIDTH);
                let y = self.rng.uniform(0.0, WORLD_HEIGHT);
                if distance(x, y, self.ship.x, self.ship.y) > WAVE_SAFE_DISTANCE {
                    break (x, y);
                }
            };
            let asteroid = Asteroid::new(&mut self.rng, AsteroidTier::Large, x, y);
            self.asteroids.push(asteroid);
        }
    }

    fn update_projectiles(&mut self) {
        let mut expired_any = false;
        for projectile in &mut self.projectiles {
            if !projectile.advance() {
                expired_any = true;
            }
        }

        if expired_any {
            self.prune_mask |= PRUNE_PROJECTILES;
        }
    }

    fn update_asteroids(&mut self) {
        for asteroid in &mut self.asteroids {
            asteroid.advance();
        }
    }

    fn update_saucers(&mut self) {
        let target = (self.ship.x, self.ship.y);
        for saucer in &mut self.saucers {
            if let Some(shot) = saucer.advance(&mut self.rng, target) {
                self.projectiles.push(shot);
            }

            if saucer.is_off_field() {
                saucer.alive = false;
                self.prune_mask |= PRUNE_SAUCERS;
            }
        }
    }

    fn maybe_spawn_saucer(&mut self) {
        if self.saucers.iter().any(|entry| entry.alive) {
            return;
        }

        if self.rng.chance(SAUCER_SPAWN_CHANCE) {
            let saucer = Saucer::spawn(&mut self.rng);
            tracing::debug!(x = saucer.x, y = saucer.y, frame = self.frame_count, "saucer spawned");
            self.saucers.push(saucer);
        }
    }

    fn handle_collisions(&mut self, report: &mut TickReport) {
        // Children split off during this pass are not targets until next tick.
        let asteroid_count = self.asteroids.len();

        for projectile_index in 0..self.projectiles.len() {
            let (px, py) = {
                let projectile = &self.projectiles[projectile_index];
                if !projectile.alive || projectile.owner != Owner::Player {
                    continue;
                }
                (projectile.x, projectile.y)
            };

            for asteroid_index in 0..asteroid_count {
                let asteroid = &self.asteroids[asteroid_index];
                if !asteroid.alive {
                    continue;
                }

                if distance(px, py, asteroid.x, asteroid.y) < asteroid.collision_radius() {
                    self.projectiles[projectile_index].alive = false;
                    self.prune_mask |= PRUNE_PROJECTILES;
                    self.destroy_asteroid(asteroid_index, report);
                    break;
                }
            }
        }

        for projectile in &mut self.projectiles {
            if !projectile.alive || projectile.owner != Owner::Player {
                continue;
            }

            let hitbox = projectile.hitbox();
            for saucer in &mut self.saucers {
                if !saucer.alive {
                    continue;
                }

                if saucer.hitbox().overlaps(&hitbox) {
                    projectile.alive = false;
                    saucer.alive = false;
                    self.prune_mask |= PRUNE_PROJECTILES | PRUNE_SAUCERS;
                    self.score = self.score.saturating_add(SAUCER_POINTS);
                    report.points += SAUCER_POINTS;
                    report.saucers_destroyed += 1;
                    break;
                }
            }
        }

        if self.invulnerable_timer > 0 {
            return;
        }

        let ship = self.ship;

        let asteroid_hit = self.asteroids.iter().any(|asteroid| {
            asteroid.alive
                && distance(ship.x, ship.y, asteroid.x, asteroid.y)
                    < asteroid.collision_radius() + ship.radius
        });
        if asteroid_hit {
            self.hit_ship(report);
            return;
        }

        let ship_box = ship.hitbox();
        let saucer_hit = self
            .saucers
            .iter()
            .any(|saucer| saucer.alive && saucer.hitbox().overlaps(&ship_box));
        if saucer_hit {
            self.hit_ship(report);
            return;
        }

        let shot_hit = self.projectiles.iter().position(|projectile| {
            projectile.alive
                && projectile.owner == Owner::Saucer
                && distance(projectile.x, projectile.y, ship.x, ship.y)
                    < ship.radius + SHIP_ENEMY_SHOT_PAD
        });
        if let Some(projectile_index) = shot_hit {
            self.projectiles[projectile_index].alive = false;
            self.prune_mask |= PRUNE_PROJECTILES;
            self.hit_ship(report);
        }
    }

    fn destroy_asteroid(&mut self, asteroid_index: usize, report: &mut TickReport) {
        let tier = {
            let asteroid = &mut self.asteroids[asteroid_index];
            if !asteroid.alive {
                return;
            }
            asteroid.alive = false;
            asteroid.tier
        };
        self.prune_mask |= PRUNE_ASTEROIDS;

        let points = tier.points();
        self.score = self.score.saturating_add(points);
        report.points += points;
        report.asteroids_destroyed += 1;

        let children = self.asteroids[asteroid_index].split(&mut self.rng);
        self.asteroids.extend(children);
    }

    fn hit_ship(&mut self, report: &mut TickReport) {
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_timer = INVULNERABLE_FRAMES;
        self.ship.reset();
        report.ship_hit = true;
        tracing::debug!(lives = self.lives, frame = self.frame_count, "ship hit");
    }

    fn prune_destroyed_entities(&mut self) {
        if self.prune_mask == 0 {
            return;
        }

        if (self.prune_mask & PRUNE_PROJECTILES) != 0 {
            self.projectiles.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_ASTEROIDS) != 0 {
            self.asteroids.retain(|entry| entry.alive);
        }
        if (self.prune_mask & PRUNE_SAUCERS) != 0 {
            self.saucers.retain(|entry| entry.alive);
        }

        self.prune_mask = 0;
    }

    pub(super) fn world_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame_count: self.frame_count,
            score: self.score,
            lives: self.lives,
            wave: self.wave,
            invulnerable_timer: self.invulnerable_timer,
            ship: self.ship_snapshot(),
            projectiles: self
                .projectiles
                .iter()
                .map(|entry| ProjectileSnapshot {
                    x: entry.x,
                    y: entry.y,
                    vx: entry.vx,
                    vy: entry.vy,
                    life: entry.life,
                    owner: entry.owner,
                })
                .collect(),
            asteroids: self
                .asteroids
                .iter()
                .map(|entry| AsteroidSnapshot {
                    x: entry.x,
                    y: entry.y,
                    vx: entry.vx,
                    vy: entry.vy,
                    angle: entry.angle,
                    tier: entry.tier,
                    collision_radius: entry.collision_radius(),
                    outline: entry.outline(),
                })
                .collect(),
            saucers: self
                .saucers
                .iter()
                .map(|entry| SaucerSnapshot {
                    x: entry.x,
                    y: entry.y,
                    vx: entry.vx,
                    vy: entry.vy,
                    width: SAUCER_WIDTH,
                    height: SAUCER_HEIGHT,
                    fire_timer: entry.fire_timer,
                })
                .collect(),
        }
    }

    fn ship_snapshot(&self) -> ShipSnapshot {
        let visible = self.invulnerable_timer <= 0
            || self.invulnerable_timer % INVULNERABLE_BLINK_PERIOD < INVULNERABLE_BLINK_VISIBLE;

        ShipSnapshot {
            x: self.ship.x,
            y: self.ship.y,
            vx: self.ship.vx,
            vy: self.ship.vy,
            angle: self.ship.angle,
            radius: self.ship.radius,
            visible,
            outline: self.ship.outline(),
        }
    }
}

#[cfg(test)]
mod tests;
