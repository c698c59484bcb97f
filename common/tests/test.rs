use common::geometry::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_vec2_arithmetic() {
    let a = Vec2::new(1.0, 2.0);
    let b = Vec2::new(3.0, -1.0);
    assert_eq!(a + b, Vec2::new(4.0, 1.0));
    assert_eq!(a - b, Vec2::new(-2.0, 3.0));
    assert_eq!(-a, Vec2::new(-1.0, -2.0));
    assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    assert_eq!(2.0 * a, Vec2::new(2.0, 4.0));
    assert_eq!(a.dot(b), 1.0);
    assert_eq!(a.cross(b), -7.0);
}

#[test]
fn test_vec2_perp_is_orthogonal() {
    let v = Vec2::new(3.0, 4.0);
    assert_eq!(v.dot(v.perp()), 0.0);
    assert_eq!(v.perp(), Vec2::new(-4.0, 3.0));
}

#[test]
fn test_vec2_normalize() {
    let v = Vec2::new(3.0, 4.0);
    let n = v.normalize();
    assert!((n.length() - 1.0).abs() < 1e-6);
    assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
}

#[test]
fn test_vec2_min_max_abs() {
    let a = Vec2::new(1.0, -2.0);
    let b = Vec2::new(-3.0, 4.0);
    assert_eq!(a.min(b), Vec2::new(-3.0, -2.0));
    assert_eq!(a.max(b), Vec2::new(1.0, 4.0));
    assert_eq!(b.abs(), Vec2::new(3.0, 4.0));
}

#[test]
fn test_aabb_center_extents_perimeter() {
    let aabb = Aabb::from_min_max(0.0, 0.0, 4.0, 2.0);
    assert_eq!(aabb.center(), Vec2::new(2.0, 1.0));
    assert_eq!(aabb.extents(), Vec2::new(2.0, 1.0));
    assert_eq!(aabb.perimeter(), 12.0);
}

#[test]
fn test_aabb_union() {
    let a = Aabb::from_min_max(0.0, 0.0, 1.0, 1.0);
    let b = Aabb::from_min_max(2.0, -1.0, 3.0, 0.5);
    let u = a.union(&b);
    assert_eq!(u, Aabb::from_min_max(0.0, -1.0, 3.0, 1.0));
    // Union contains both inputs.
    assert!(u.contains(&a));
    assert!(u.contains(&b));
}

#[test]
fn test_aabb_inflate() {
    let aabb = Aabb::from_min_max(0.0, 0.0, 1.0, 1.0);
    let fat = aabb.inflate(0.1);
    assert_eq!(fat, Aabb::from_min_max(-0.1, -0.1, 1.1, 1.1));
    assert!(fat.contains(&aabb));
}

#[test]
fn test_aabb_contains_and_overlaps() {
    let outer = Aabb::from_min_max(0.0, 0.0, 10.0, 10.0);
    let inner = Aabb::from_min_max(2.0, 2.0, 3.0, 3.0);
    let crossing = Aabb::from_min_max(9.0, 9.0, 12.0, 12.0);
    let far = Aabb::from_min_max(20.0, 20.0, 21.0, 21.0);

    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.overlaps(&inner));
    assert!(outer.overlaps(&crossing));
    assert!(!outer.contains(&crossing));
    assert!(!outer.overlaps(&far));
}

#[test]
fn test_aabb_overlaps_touching_edges() {
    let a = Aabb::from_min_max(0.0, 0.0, 1.0, 1.0);
    let b = Aabb::from_min_max(1.0, 0.0, 2.0, 1.0);
    // Shared edges count as overlap for the broad phase.
    assert!(a.overlaps(&b));
}

#[test]
fn test_aabb_is_valid() {
    assert!(Aabb::from_min_max(0.0, 0.0, 1.0, 1.0).is_valid());
    assert!(Aabb::from_min_max(1.0, 1.0, 1.0, 1.0).is_valid());
    assert!(!Aabb::from_min_max(1.0, 0.0, 0.0, 1.0).is_valid());
    assert!(!Aabb::from_min_max(f32::NAN, 0.0, 1.0, 1.0).is_valid());
    assert!(!Aabb::from_min_max(0.0, 0.0, f32::INFINITY, 1.0).is_valid());
}

#[test]
fn test_ray_cast_hit() {
    let aabb = Aabb::from_min_max(1.0, -1.0, 2.0, 1.0);
    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(10.0, 0.0),
        max_fraction: 1.0,
    };
    let output = aabb.ray_cast(&input).expect("ray should hit");
    assert!((output.fraction - 0.1).abs() < 1e-6);
    assert_eq!(output.normal, Vec2::new(-1.0, 0.0));
}

#[test]
fn test_ray_cast_miss() {
    let aabb = Aabb::from_min_max(1.0, 2.0, 2.0, 3.0);
    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(10.0, 0.0),
        max_fraction: 1.0,
    };
    assert!(aabb.ray_cast(&input).is_none());
}

#[test]
fn test_ray_cast_parallel_outside_slab() {
    let aabb = Aabb::from_min_max(0.0, 1.0, 10.0, 2.0);
    // Horizontal ray below the box: parallel to the y slab and outside it.
    let input = RayCastInput {
        p1: Vec2::new(-5.0, 0.0),
        p2: Vec2::new(5.0, 0.0),
        max_fraction: 1.0,
    };
    assert!(aabb.ray_cast(&input).is_none());
}

#[test]
fn test_ray_cast_clipped_by_max_fraction() {
    let aabb = Aabb::from_min_max(8.0, -1.0, 9.0, 1.0);
    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(10.0, 0.0),
        max_fraction: 0.5,
    };
    // Entry fraction is 0.8, past the allowed range.
    assert!(aabb.ray_cast(&input).is_none());
}

#[test]
fn test_ray_cast_starting_inside() {
    let aabb = Aabb::from_min_max(-1.0, -1.0, 1.0, 1.0);
    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(10.0, 0.0),
        max_fraction: 1.0,
    };
    // The entry fraction is behind the origin, so there is no hit to report.
    assert!(aabb.ray_cast(&input).is_none());
}

#[test]
fn test_random_point_inside() {
    let mut rng = StdRng::seed_from_u64(7);
    let aabb = Aabb::from_min_max(-10.0, 5.0, 10.0, 25.0);
    for _ in 0..100 {
        let p = aabb.random_point_inside(1.0, &mut rng);
        assert!(p.x >= -9.0 && p.x <= 9.0);
        assert!(p.y >= 6.0 && p.y <= 24.0);
    }
}
