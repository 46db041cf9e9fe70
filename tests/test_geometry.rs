use glam::Vec2;
use space_debris::error::GeometryError;
use space_debris::geometry::*;

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(Vec2::new(x, y), Vec2::new(w, h))
}

// ── Edges ─────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges_from_center_and_size() {
    let r = rect(100.0, 50.0, 80.0, 30.0);
    assert_eq!(r.left(), 60.0);
    assert_eq!(r.right(), 140.0);
    // Y grows downward: top is the smaller value
    assert_eq!(r.top(), 35.0);
    assert_eq!(r.bottom(), 65.0);
    assert_eq!(r.width(), 80.0);
    assert_eq!(r.height(), 30.0);
}

#[test]
fn circle_edges_from_radius() {
    let c = Circle::new(Vec2::new(10.0, 20.0), 5.0);
    assert_eq!(c.left(), 5.0);
    assert_eq!(c.right(), 15.0);
    assert_eq!(c.top(), 15.0);
    assert_eq!(c.bottom(), 25.0);
}

#[test]
fn bounds_delegates_and_translates() {
    let mut b: Bounds = rect(0.0, 0.0, 10.0, 10.0).into();
    b.translate(Vec2::new(3.0, -2.0));
    assert_eq!(b.center(), Vec2::new(3.0, -2.0));
    assert_eq!(b.left(), -2.0);
    assert_eq!(b.top(), -7.0);

    let c: Bounds = Circle::new(Vec2::ZERO, 2.0).into();
    assert_eq!(c.right(), 2.0);
}

// ── intersects ────────────────────────────────────────────────────────────────

#[test]
fn overlapping_shapes_intersect() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = Circle::new(Vec2::new(6.0, 0.0), 3.0);
    assert!(intersects(&a, &b));
    assert!(intersects(&b, &a));
}

#[test]
fn separated_shapes_do_not_intersect() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(20.0, 0.0, 10.0, 10.0);
    let c = rect(0.0, 20.0, 10.0, 10.0);
    assert!(!intersects(&a, &b));
    assert!(!intersects(&a, &c));
}

#[test]
fn touching_edges_count_as_intersecting() {
    let a = rect(0.0, 0.0, 10.0, 10.0); // right = 5
    let b = rect(10.0, 0.0, 10.0, 10.0); // left = 5
    assert_eq!(a.right(), b.left());
    assert!(intersects(&a, &b));
    assert!(intersects(&b, &a));

    let below = Circle::new(Vec2::new(0.0, 8.0), 3.0); // top = 5
    assert!(intersects(&a, &below));
}

#[test]
fn intersects_is_symmetric_over_a_grid() {
    let shapes: Vec<Bounds> = vec![
        rect(0.0, 0.0, 10.0, 10.0).into(),
        rect(9.0, 3.0, 8.0, 4.0).into(),
        rect(-20.0, 0.0, 4.0, 4.0).into(),
        Circle::new(Vec2::new(5.0, 5.0), 1.0).into(),
        Circle::new(Vec2::new(0.0, 12.0), 2.0).into(),
        Circle::new(Vec2::new(100.0, 100.0), 50.0).into(),
    ];
    for a in &shapes {
        for b in &shapes {
            assert_eq!(intersects(a, b), intersects(b, a), "{:?} vs {:?}", a, b);
        }
    }
}

// ── square_root ───────────────────────────────────────────────────────────────

#[test]
fn square_root_of_non_negative() {
    assert_eq!(square_root(9.0), Ok(3.0));
    assert_eq!(square_root(0.0), Ok(0.0));
}

#[test]
fn square_root_of_negative_is_an_error() {
    assert_eq!(square_root(-4.0), Err(GeometryError::NegativeRoot(-4.0)));
}

#[test]
fn square_root_of_nan_is_an_error() {
    assert!(square_root(f64::NAN).is_err());
}
