use super::{AsteroidTier, Owner};
use crate::constants::{
    ASTEROID_COLLISION_SCALE, ASTEROID_JITTER_MAX, ASTEROID_JITTER_MIN, ASTEROID_SPIN_MAX_DEG,
    ASTEROID_SPLIT_COUNT, ASTEROID_VERTICES_MAX, ASTEROID_VERTICES_MIN, PROJECTILE_HITBOX,
    PROJECTILE_LIFETIME_FRAMES, PROJECTILE_SPEED, SAUCER_AIM_ERROR_DEG, SAUCER_CULL_MARGIN_X,
    SAUCER_DRIFT_CHANGE_CHANCE, SAUCER_DRIFT_INITIAL, SAUCER_DRIFT_MAX, SAUCER_EDGE_MARGIN_Y,
    SAUCER_FIRE_CHANCE, SAUCER_FIRE_DELAY_FRAMES, SAUCER_HEIGHT, SAUCER_SPAWN_MARGIN_Y,
    SAUCER_SPAWN_OFFSET_X, SAUCER_SPEED, SAUCER_WIDTH, SHIP_FRICTION, SHIP_MAX_SPEED,
    SHIP_RADIUS, SHIP_TAIL_ANGLE_RAD, SHIP_TAIL_SCALE, SHIP_THRUST, SHIP_TURN_STEP_DEG,
    WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::geometry::{angle_to, clamp_speed, heading, rotate, wrap_x, wrap_y, Point, Rect};
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug)]
pub(super) struct Ship {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) vx: f64,
    pub(super) vy: f64,
    /// Free-running; never normalised.
    pub(super) angle: f64,
    pub(super) radius: f64,
}

impl Ship {
    pub(super) fn spawn() -> Self {
        Self {
            x: WORLD_WIDTH / 2.0,
            y: WORLD_HEIGHT / 2.0,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            radius: SHIP_RADIUS,
        }
    }

    pub(super) fn rotate_left(&mut self) {
        self.angle -= SHIP_TURN_STEP_DEG;
    }

    pub(super) fn rotate_right(&mut self) {
        self.angle += SHIP_TURN_STEP_DEG;
    }

    pub(super) fn thrust(&mut self) {
        let (dx, dy) = heading(self.angle);
        self.vx += dx * SHIP_THRUST;
        self.vy += dy * SHIP_THRUST;
        (self.vx, self.vy) = clamp_speed(self.vx, self.vy, SHIP_MAX_SPEED);
    }

    pub(super) fn advance(&mut self) {
        self.vx *= SHIP_FRICTION;
        self.vy *= SHIP_FRICTION;
        self.x = wrap_x(self.x + self.vx);
        self.y = wrap_y(self.y + self.vy);
    }

    /// Recentres and stops the ship; the heading is kept.
    pub(super) fn reset(&mut self) {
        self.x = WORLD_WIDTH / 2.0;
        self.y = WORLD_HEIGHT / 2.0;
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub(super) fn nose(&self) -> Point {
        let (dx, dy) = heading(self.angle);
        (self.x + dx * self.radius, self.y + dy * self.radius)
    }

    pub(super) fn outline(&self) -> [Point; 3] {
        let rad = self.angle.to_radians();
        let tail = self.radius * SHIP_TAIL_SCALE;
        let left = rad + SHIP_TAIL_ANGLE_RAD;
        let right = rad - SHIP_TAIL_ANGLE_RAD;
        [
            self.nose(),
            (self.x + left.cos() * tail, self.y + left.sin() * tail),
            (self.x + right.cos() * tail, self.y + right.sin() * tail),
        ]
    }

    pub(super) fn hitbox(&self) -> Rect {
        Rect::centered(self.x, self.y, self.radius * 2.0, self.radius * 2.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Projectile {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) vx: f64,
    pub(super) vy: f64,
    pub(super) life: i32,
    pub(super) owner: Owner,
    pub(super) alive: bool,
}

impl Projectile {
    pub(super) fn fired(x: f64, y: f64, angle_deg: f64, owner: Owner) -> Self {
        let (dx, dy) = heading(angle_deg);
        Self {
            x,
            y,
            vx: dx * PROJECTILE_SPEED,
            vy: dy * PROJECTILE_SPEED,
            life: PROJECTILE_LIFETIME_FRAMES,
            owner,
            alive: true,
        }
    }

    /// Moves one tick and burns one tick of lifetime. Returns whether the
    /// projectile is still alive.
    pub(super) fn advance(&mut self) -> bool {
        self.x = wrap_x(self.x + self.vx);
        self.y = wrap_y(self.y + self.vy);
        self.life -= 1;
        if self.life <= 0 {
            self.alive = false;
        }
        self.alive
    }

    pub(super) fn hitbox(&self) -> Rect {
        Rect::centered(self.x, self.y, PROJECTILE_HITBOX, PROJECTILE_HITBOX)
    }
}

#[derive(Clone, Debug)]
pub(super) struct Asteroid {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) vx: f64,
    pub(super) vy: f64,
    pub(super) angle: f64,
    pub(super) spin: f64,
    pub(super) tier: AsteroidTier,
    /// Silhouette relative to the centre at zero rotation. Fixed at creation.
    pub(super) shape: Vec<Point>,
    pub(super) alive: bool,
}

impl Asteroid {
    pub(super) fn new(rng: &mut SeededRng, tier: AsteroidTier, x: f64, y: f64) -> Self {
        let speed = tier.speed();
        let vx = rng.uniform(-speed, speed);
        let vy = rng.uniform(-speed, speed);
        let spin = rng.uniform(-ASTEROID_SPIN_MAX_DEG, ASTEROID_SPIN_MAX_DEG);

        let vertices = rng.next_range(ASTEROID_VERTICES_MIN, ASTEROID_VERTICES_MAX + 1);
        let shape = (0..vertices)
            .map(|i| {
                let theta = core::f64::consts::TAU * f64::from(i) / f64::from(vertices);
                let radius = tier.radius() * rng.uniform(ASTEROID_JITTER_MIN, ASTEROID_JITTER_MAX);
                (radius * theta.cos(), radius * theta.sin())
            })
            .collect();

        Self {
            x,
            y,
            vx,
            vy,
            angle: 0.0,
            spin,
            tier,
            shape,
            alive: true,
        }
    }

    pub(super) fn advance(&mut self) {
        self.x = wrap_x(self.x + self.vx);
        self.y = wrap_y(self.y + self.vy);
        self.angle += self.spin;
    }

    pub(super) fn collision_radius(&self) -> f64 {
        self.tier.radius() * ASTEROID_COLLISION_SCALE
    }

    /// Children left behind when this asteroid is destroyed: two of the next
    /// tier on random headings, or none for the smallest tier.
    pub(super) fn split(&self, rng: &mut SeededRng) -> Vec<Asteroid> {
        let Some(child_tier) = self.tier.smaller() else {
            return Vec::new();
        };

        (0..ASTEROID_SPLIT_COUNT)
            .map(|_| {
                let mut child = Asteroid::new(rng, child_tier, self.x, self.y);
                let (dx, dy) = heading(rng.uniform(0.0, 360.0));
                child.vx = dx * child_tier.speed();
                child.vy = dy * child_tier.speed();
                child
            })
            .collect()
    }

    pub(super) fn outline(&self) -> Vec<Point> {
        self.shape
            .iter()
            .map(|point| {
                let (rx, ry) = rotate(*point, self.angle);
                (rx + self.x, ry + self.y)
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Saucer {
    pub(super) x: f64,
    pub(super) y: f64,
    pub(super) vx: f64,
    pub(super) vy: f64,
    pub(super) fire_timer: i32,
    pub(super) alive: bool,
}

impl Saucer {
    pub(super) fn spawn(rng: &mut SeededRng) -> Self {
        let from_left = rng.coin();
        let (x, direction) = if from_left {
            (-SAUCER_SPAWN_OFFSET_X, 1.0)
        } else {
            (WORLD_WIDTH + SAUCER_SPAWN_OFFSET_X, -1.0)
        };
        let max_y = WORLD_HEIGHT as i32 - SAUCER_SPAWN_MARGIN_Y;
        let y = f64::from(rng.next_range(SAUCER_SPAWN_MARGIN_Y, max_y + 1));

        Self {
            x,
            y,
            vx: SAUCER_SPEED * direction,
            vy: rng.uniform(-SAUCER_DRIFT_INITIAL, SAUCER_DRIFT_INITIAL),
            fire_timer: 0,
            alive: true,
        }
    }

    /// Moves one tick, re-rolls and reflects the vertical drift, and returns
    /// a shot at `target` when the fire gate opens.
    pub(super) fn advance(&mut self, rng: &mut SeededRng, target: Point) -> Option<Projectile> {
        self.x += self.vx;
        self.y = wrap_y(self.y + self.vy);

        if rng.chance(SAUCER_DRIFT_CHANGE_CHANCE) {
            self.vy = rng.uniform(-SAUCER_DRIFT_MAX, SAUCER_DRIFT_MAX);
        }

        if self.y < SAUCER_EDGE_MARGIN_Y {
            self.vy = self.vy.abs();
        } else if self.y > WORLD_HEIGHT - SAUCER_EDGE_MARGIN_Y {
            self.vy = -self.vy.abs();
        }

        self.fire_timer += 1;
        if self.fire_timer <= SAUCER_FIRE_DELAY_FRAMES || !rng.chance(SAUCER_FIRE_CHANCE) {
            return None;
        }

        self.fire_timer = 0;
        let aim = angle_to(self.x, self.y, target.0, target.1);
        let error = rng.uniform(-SAUCER_AIM_ERROR_DEG, SAUCER_AIM_ERROR_DEG);
        Some(Projectile::fired(self.x, self.y, aim + error, Owner::Saucer))
    }

    pub(super) fn is_off_field(&self) -> bool {
        self.x < -SAUCER_CULL_MARGIN_X || self.x > WORLD_WIDTH + SAUCER_CULL_MARGIN_X
    }

    pub(super) fn hitbox(&self) -> Rect {
        Rect::centered(self.x, self.y, SAUCER_WIDTH, SAUCER_HEIGHT)
    }
}
