use rand::Rng;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D vector with the handful of operations the broad phase needs.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross).
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(self) -> Vec2 {
        Vec2 {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn min(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
        }
    }

    pub fn max(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }

    pub fn abs(self) -> Vec2 {
        Vec2 {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a unit-length copy, or zero when the vector is too short
    /// to normalize.
    pub fn normalize(self) -> Vec2 {
        let length = self.length();
        if length < f32::EPSILON {
            return Vec2::ZERO;
        }
        let inv = 1.0 / length;
        Vec2 {
            x: self.x * inv,
            y: self.y * inv,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Vec2) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f32) -> Vec2 {
        Vec2 {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, vec: Vec2) -> Vec2 {
        Vec2 {
            x: self * vec.x,
            y: self * vec.y,
        }
    }
}

/// Ray-cast input. The ray extends from `p1` to `p1 + max_fraction * (p2 - p1)`.
#[derive(Debug, Copy, Clone)]
pub struct RayCastInput {
    pub p1: Vec2,
    pub p2: Vec2,
    pub max_fraction: f32,
}

/// Ray-cast output. The hit is at `p1 + fraction * (p2 - p1)`.
#[derive(Debug, Copy, Clone)]
pub struct RayCastOutput {
    pub normal: Vec2,
    pub fraction: f32,
}

/// An axis-aligned bounding box stored as its two extreme corners.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub lower: Vec2,
    pub upper: Vec2,
}

impl Aabb {
    pub fn new(lower: Vec2, upper: Vec2) -> Self {
        Self { lower, upper }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            lower: Vec2::new(min_x, min_y),
            upper: Vec2::new(max_x, max_y),
        }
    }

    pub fn center(&self) -> Vec2 {
        0.5 * (self.lower + self.upper)
    }

    /// Half-widths along each axis.
    pub fn extents(&self) -> Vec2 {
        0.5 * (self.upper - self.lower)
    }

    pub fn perimeter(&self) -> f32 {
        let wx = self.upper.x - self.lower.x;
        let wy = self.upper.y - self.lower.y;
        2.0 * (wx + wy)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Grows the box by `margin` on all four sides.
    pub fn inflate(&self, margin: f32) -> Aabb {
        let r = Vec2::new(margin, margin);
        Aabb {
            lower: self.lower - r,
            upper: self.upper + r,
        }
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.lower.x <= other.lower.x
            && self.lower.y <= other.lower.y
            && other.upper.x <= self.upper.x
            && other.upper.y <= self.upper.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d1 = other.lower - self.upper;
        let d2 = self.lower - other.upper;

        if d1.x > 0.0 || d1.y > 0.0 {
            return false;
        }
        if d2.x > 0.0 || d2.y > 0.0 {
            return false;
        }

        true
    }

    pub fn is_valid(&self) -> bool {
        let d = self.upper - self.lower;
        d.x >= 0.0 && d.y >= 0.0 && self.lower.is_finite() && self.upper.is_finite()
    }

    /// Slab test of the segment `p1 -> p2` against this box. Returns the
    /// entry fraction and surface normal, or `None` when the segment
    /// misses or starts past `max_fraction`.
    pub fn ray_cast(&self, input: &RayCastInput) -> Option<RayCastOutput> {
        let mut tmin = f32::MIN;
        let mut tmax = f32::MAX;

        let p = input.p1;
        let d = input.p2 - input.p1;
        let abs_d = d.abs();

        let mut normal = Vec2::ZERO;

        // X slab.
        if abs_d.x < f32::EPSILON {
            // Parallel to the slab: reject unless the origin is inside it.
            if p.x < self.lower.x || self.upper.x < p.x {
                return None;
            }
        } else {
            let inv_d = 1.0 / d.x;
            let mut t1 = (self.lower.x - p.x) * inv_d;
            let mut t2 = (self.upper.x - p.x) * inv_d;

            let mut s = -1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                s = 1.0;
            }

            if t1 > tmin {
                normal = Vec2::new(s, 0.0);
                tmin = t1;
            }
            tmax = tmax.min(t2);

            if tmin > tmax {
                return None;
            }
        }

        // Y slab.
        if abs_d.y < f32::EPSILON {
            if p.y < self.lower.y || self.upper.y < p.y {
                return None;
            }
        } else {
            let inv_d = 1.0 / d.y;
            let mut t1 = (self.lower.y - p.y) * inv_d;
            let mut t2 = (self.upper.y - p.y) * inv_d;

            let mut s = -1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                s = 1.0;
            }

            if t1 > tmin {
                normal = Vec2::new(0.0, s);
                tmin = t1;
            }
            tmax = tmax.min(t2);

            if tmin > tmax {
                return None;
            }
        }

        // The intersection can lie behind the start point or past the
        // portion of the segment the caller cares about.
        if tmin < 0.0 || input.max_fraction < tmin {
            return None;
        }

        Some(RayCastOutput {
            normal,
            fraction: tmin,
        })
    }

    /// Picks a uniformly random point inside the box, keeping at least
    /// `margin` away from the edges when the box is large enough.
    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> Vec2 {
        Vec2 {
            x: safe_rand_f32(rng, self.lower.x + margin, self.upper.x - margin),
            y: safe_rand_f32(rng, self.lower.y + margin, self.upper.y - margin),
        }
    }
}

fn safe_rand_f32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min > max {
        return min;
    }
    rng.gen_range(min..=max)
}
