//! Gameplay constants.
//!
//! Distances are in field pixels, times in ticks (one tick per frame at
//! 60 fps), angles in degrees.

// Field
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

// Match
pub const STARTING_LIVES: u32 = 3;
pub const INVULNERABLE_FRAMES: i32 = 120; // 2s * 60fps
pub const INVULNERABLE_BLINK_PERIOD: i32 = 10;
pub const INVULNERABLE_BLINK_VISIBLE: i32 = 5;

// Ship
pub const SHIP_RADIUS: f64 = 8.0;
pub const SHIP_THRUST: f64 = 0.2;
pub const SHIP_FRICTION: f64 = 0.985;
pub const SHIP_MAX_SPEED: f64 = 5.0;
pub const SHIP_TURN_STEP_DEG: f64 = 5.0;
pub const SHIP_TAIL_ANGLE_RAD: f64 = 2.8;
pub const SHIP_TAIL_SCALE: f64 = 0.7;
// Enemy shots use a slightly larger ship radius than asteroids do.
pub const SHIP_ENEMY_SHOT_PAD: f64 = 3.0;

// Projectiles
pub const PROJECTILE_SPEED: f64 = 8.0;
pub const PROJECTILE_LIFETIME_FRAMES: i32 = 80;
pub const PROJECTILE_HITBOX: f64 = 4.0;
pub const PLAYER_PROJECTILE_LIMIT: usize = 4;

// Asteroids, indexed by tier (large, medium, small)
pub const ASTEROID_RADII: [f64; 3] = [30.0, 20.0, 10.0];
pub const ASTEROID_SPEEDS: [f64; 3] = [0.5, 1.0, 1.5];
pub const ASTEROID_POINTS: [u32; 3] = [20, 50, 100];
pub const ASTEROID_COLLISION_SCALE: f64 = 0.8;
pub const ASTEROID_SPIN_MAX_DEG: f64 = 1.0;
pub const ASTEROID_VERTICES_MIN: i32 = 6;
pub const ASTEROID_VERTICES_MAX: i32 = 10;
pub const ASTEROID_JITTER_MIN: f64 = 0.8;
pub const ASTEROID_JITTER_MAX: f64 = 1.2;
pub const ASTEROID_SPLIT_COUNT: usize = 2;

// Waves
pub const INITIAL_ASTEROIDS: usize = 6;
pub const WAVE_BONUS_SCORE_STEP: u32 = 2_000;
pub const WAVE_BONUS_MAX: usize = 4;
pub const WAVE_SAFE_DISTANCE: f64 = 100.0;

// Saucer
pub const SAUCER_SPAWN_CHANCE: f64 = 0.001;
pub const SAUCER_SPEED: f64 = 2.0;
pub const SAUCER_WIDTH: f64 = 20.0;
pub const SAUCER_HEIGHT: f64 = 8.0;
pub const SAUCER_SPAWN_OFFSET_X: f64 = 20.0;
pub const SAUCER_SPAWN_MARGIN_Y: i32 = 50;
pub const SAUCER_DRIFT_INITIAL: f64 = 0.5;
pub const SAUCER_DRIFT_MAX: f64 = 1.0;
pub const SAUCER_DRIFT_CHANGE_CHANCE: f64 = 0.01;
pub const SAUCER_EDGE_MARGIN_Y: f64 = 20.0;
pub const SAUCER_CULL_MARGIN_X: f64 = 50.0;
pub const SAUCER_FIRE_DELAY_FRAMES: i32 = 30;
pub const SAUCER_FIRE_CHANCE: f64 = 0.02;
pub const SAUCER_AIM_ERROR_DEG: f64 = 20.0;
pub const SAUCER_POINTS: u32 = 500;

// Presentation
pub const STAR_COUNT: usize = 100;
pub const STAR_BRIGHTNESS: [u8; 4] = [128, 160, 192, 255];

// High scores
pub const NAME_MAX_CHARS: usize = 10;
pub const HIGH_SCORE_CAPACITY: usize = 10;
pub const SCORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
