use crate::constants::{WORLD_HEIGHT, WORLD_WIDTH};

pub type Point = (f64, f64);

/// Wraps `value` onto `[0, extent)` regardless of sign.
#[inline]
pub fn wrap(value: f64, extent: f64) -> f64 {
    ((value % extent) + extent) % extent
}

#[inline]
pub fn wrap_x(x: f64) -> f64 {
    wrap(x, WORLD_WIDTH)
}

#[inline]
pub fn wrap_y(y: f64) -> f64 {
    wrap(y, WORLD_HEIGHT)
}

/// Straight-line distance; does not look across the wrap seam.
#[inline]
pub fn distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx).hypot(ay - by)
}

/// Unit vector for a heading in degrees. Y grows downward, so positive
/// angles turn clockwise on screen.
#[inline]
pub fn heading(angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    (rad.cos(), rad.sin())
}

#[inline]
pub fn angle_to(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    (to_y - from_y).atan2(to_x - from_x).to_degrees()
}

/// Rescales `(vx, vy)` to `max_speed` when it is longer, keeping direction.
#[inline]
pub fn clamp_speed(vx: f64, vy: f64, max_speed: f64) -> Point {
    let speed = vx.hypot(vy);
    if speed > max_speed && speed > 0.0 {
        ((vx / speed) * max_speed, (vy / speed) * max_speed)
    } else {
        (vx, vy)
    }
}

#[inline]
pub fn rotate(point: Point, angle_deg: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    (point.0 * cos - point.1 * sin, point.0 * sin + point.1 * cos)
}

/// Axis-aligned box, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
