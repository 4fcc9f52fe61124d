//! Scripted pilots that read world snapshots and answer with intents.
//!
//! Every pilot in the roster is the same steering loop with different
//! tuning: pick a target, lead it, turn toward the lead point, fire when
//! aligned, and thrust away from anything about to hit the ship.

use asteroids_core::constants::{
    PLAYER_PROJECTILE_LIMIT, PROJECTILE_LIFETIME_FRAMES, PROJECTILE_SPEED,
};
use asteroids_core::geometry::{angle_to, distance};
use asteroids_core::sim::{Intent, Owner, WorldSnapshot};
use asteroids_core::SeededRng;
use serde::Serialize;

pub trait Pilot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Name typed on the high-score screen.
    fn initials(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_intents(&mut self, world: &WorldSnapshot) -> Vec<Intent>;
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PilotConfig {
    pub id: &'static str,
    pub description: &'static str,
    pub initials: &'static str,
    /// Fire when the heading is within this many degrees of the lead point.
    pub aim_tolerance_deg: f64,
    /// Targets farther than this are not fired at.
    pub fire_range: f64,
    /// Hazards closer than their own radius plus this margin trigger evasion.
    pub danger_margin: f64,
    /// Close in on targets beyond fire range.
    pub pursue: bool,
    pub cruise_speed: f64,
    pub saucer_priority: bool,
    /// Chance per frame of a random turn instead of the planned one.
    pub wander_chance: f64,
}

pub fn pilot_configs() -> &'static [PilotConfig] {
    &[
        PilotConfig {
            id: "turret",
            description: "Holds the centre, turns toward the nearest rock and fires.",
            initials: "TUR",
            aim_tolerance_deg: 6.0,
            fire_range: 420.0,
            danger_margin: 0.0,
            pursue: false,
            cruise_speed: 0.0,
            saucer_priority: false,
            wander_chance: 0.0,
        },
        PilotConfig {
            id: "hunter",
            description: "Chases targets beyond range and prefers saucers when present.",
            initials: "HNT",
            aim_tolerance_deg: 8.0,
            fire_range: 260.0,
            danger_margin: 30.0,
            pursue: true,
            cruise_speed: 2.5,
            saucer_priority: true,
            wander_chance: 0.0,
        },
        PilotConfig {
            id: "dodger",
            description: "Wide danger margin; evades first and shoots second.",
            initials: "DOD",
            aim_tolerance_deg: 10.0,
            fire_range: 320.0,
            danger_margin: 70.0,
            pursue: false,
            cruise_speed: 3.5,
            saucer_priority: false,
            wander_chance: 0.0,
        },
        PilotConfig {
            id: "drifter",
            description: "Noisy baseline: loose aim with frequent random turns.",
            initials: "DRF",
            aim_tolerance_deg: 20.0,
            fire_range: 500.0,
            danger_margin: 20.0,
            pursue: true,
            cruise_speed: 1.5,
            saucer_priority: false,
            wander_chance: 0.25,
        },
    ]
}

pub fn pilot_ids() -> Vec<&'static str> {
    pilot_configs().iter().map(|cfg| cfg.id).collect()
}

pub fn describe_pilots() -> Vec<(&'static str, &'static str)> {
    pilot_configs()
        .iter()
        .map(|cfg| (cfg.id, cfg.description))
        .collect()
}

pub fn create_pilot(id: &str) -> Option<Box<dyn Pilot + Send>> {
    pilot_configs()
        .iter()
        .find(|cfg| cfg.id == id)
        .map(|cfg| Box::new(HeuristicPilot::new(*cfg)) as Box<dyn Pilot + Send>)
}

#[derive(Clone, Copy, Debug)]
struct Target {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    distance: f64,
}

pub struct HeuristicPilot {
    cfg: PilotConfig,
    rng: SeededRng,
}

impl HeuristicPilot {
    pub fn new(cfg: PilotConfig) -> Self {
        Self {
            cfg,
            rng: SeededRng::new(0),
        }
    }

    pub fn config(&self) -> &PilotConfig {
        &self.cfg
    }

    fn pick_target(&self, world: &WorldSnapshot) -> Option<Target> {
        let ship = &world.ship;
        let to_target = |x: f64, y: f64, vx: f64, vy: f64| Target {
            x,
            y,
            vx,
            vy,
            distance: distance(ship.x, ship.y, x, y),
        };

        if self.cfg.saucer_priority {
            if let Some(saucer) = world.saucers.first() {
                return Some(to_target(saucer.x, saucer.y, saucer.vx, saucer.vy));
            }
        }

        world
            .asteroids
            .iter()
            .map(|asteroid| to_target(asteroid.x, asteroid.y, asteroid.vx, asteroid.vy))
            .chain(
                world
                    .saucers
                    .iter()
                    .map(|saucer| to_target(saucer.x, saucer.y, saucer.vx, saucer.vy)),
            )
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Nearest hazard inside the danger margin, as a point.
    fn nearest_threat(&self, world: &WorldSnapshot) -> Option<(f64, f64)> {
        if self.cfg.danger_margin <= 0.0 || world.invulnerable_timer > 0 {
            return None;
        }

        let ship = &world.ship;
        let reach = ship.radius + self.cfg.danger_margin;
        let rocks = world
            .asteroids
            .iter()
            .map(|a| (a.x, a.y, a.collision_radius));
        let saucers = world
            .saucers
            .iter()
            .map(|s| (s.x, s.y, s.width.max(s.height) / 2.0));
        let shots = world
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Saucer)
            .map(|p| (p.x, p.y, 3.0));

        rocks
            .chain(saucers)
            .chain(shots)
            .map(|(x, y, radius)| (x, y, distance(ship.x, ship.y, x, y) - radius))
            .filter(|(_, _, gap)| *gap < reach)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(x, y, _)| (x, y))
    }
}

impl Pilot for HeuristicPilot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn initials(&self) -> &'static str {
        self.cfg.initials
    }

    fn reset(&mut self, seed: u32) {
        self.rng = SeededRng::new(seed ^ 0x9E37_79B9);
    }

    fn next_intents(&mut self, world: &WorldSnapshot) -> Vec<Intent> {
        let ship = &world.ship;
        let speed = ship.vx.hypot(ship.vy);
        let mut intents = Vec::with_capacity(3);

        if let Some((tx, ty)) = self.nearest_threat(world) {
            // Point the tail at the threat and burn.
            let away = angle_to(tx, ty, ship.x, ship.y);
            let delta = angle_delta(ship.angle, away);
            push_turn(&mut intents, delta, 5.0);
            if delta.abs() < 60.0 && speed < self.cfg.cruise_speed.max(2.0) {
                intents.push(Intent::Thrust);
            }
            return intents;
        }

        let Some(target) = self.pick_target(world) else {
            return intents;
        };

        let flight =
            (target.distance / PROJECTILE_SPEED).min(f64::from(PROJECTILE_LIFETIME_FRAMES));
        let lead_x = target.x + target.vx * flight;
        let lead_y = target.y + target.vy * flight;
        let aim = angle_to(ship.x, ship.y, lead_x, lead_y);
        let delta = angle_delta(ship.angle, aim);

        if self.cfg.wander_chance > 0.0 && self.rng.chance(self.cfg.wander_chance) {
            intents.push(if self.rng.coin() {
                Intent::RotateLeft
            } else {
                Intent::RotateRight
            });
        } else {
            push_turn(&mut intents, delta, self.cfg.aim_tolerance_deg / 2.0);
        }

        if delta.abs() <= self.cfg.aim_tolerance_deg
            && target.distance <= self.cfg.fire_range
            && world.player_projectiles() < PLAYER_PROJECTILE_LIMIT
        {
            intents.push(Intent::Fire);
        }

        if self.cfg.pursue
            && target.distance > self.cfg.fire_range
            && delta.abs() < 30.0
            && speed < self.cfg.cruise_speed
        {
            intents.push(Intent::Thrust);
        }

        intents
    }
}

/// Signed turn from `from` to `to` in degrees, in `(-180, 180]`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let wrapped = (to - from).rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn push_turn(intents: &mut Vec<Intent>, delta: f64, dead_zone: f64) {
    if delta > dead_zone {
        intents.push(Intent::RotateRight);
    } else if delta < -dead_zone {
        intents.push(Intent::RotateLeft);
    }
}
