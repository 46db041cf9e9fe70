use glam::Vec2;
use space_debris::draw::RecordingSink;
use space_debris::entities::*;
use space_debris::input::InputSnapshot;
use space_debris::EntityStore;

fn debris_at(x: f32) -> Debris {
    Debris::new(Vec2::new(x, 100.0), Debris::SMALL_SIZE, MassLevel::Low)
}

fn xs_of_debris(store: &mut EntityStore) -> Vec<f32> {
    let mut xs = Vec::new();
    store
        .for_each_of_type(|d: &mut Debris| xs.push(d.body().center.x))
        .unwrap();
    xs
}

// ── create / get ──────────────────────────────────────────────────────────────

#[test]
fn create_returns_resolvable_typed_handle() {
    let mut store = EntityStore::new();
    let h = store.create(debris_at(10.0));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(h).map(|d| d.body().center.x), Some(10.0));

    store.get_mut(h).unwrap().absorb_hit();
    assert!(store.get(h).unwrap().is_destroyed());
}

#[test]
fn handles_have_distinct_ids() {
    let mut store = EntityStore::new();
    let a = store.create(debris_at(1.0));
    let b = store.create(Projectile::new(Vec2::ZERO));
    let c = store.create(debris_at(2.0));
    assert_ne!(a.id(), b.id());
    assert_ne!(a.id(), c.id());
    assert!(a.id() < c.id());
}

// ── per-type index ────────────────────────────────────────────────────────────

#[test]
fn for_each_of_type_visits_only_that_type_in_creation_order() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(Projectile::new(Vec2::ZERO));
    store.create(debris_at(2.0));
    store.create(World::new(Vec2::ZERO, 800.0, 10));
    store.create(debris_at(3.0));

    assert_eq!(xs_of_debris(&mut store), vec![1.0, 2.0, 3.0]);
    assert_eq!(store.count_of::<Debris>(), 3);
    assert_eq!(store.count_of::<Projectile>(), 1);
    assert_eq!(store.count_of::<World>(), 1);
    assert_eq!(store.count_of::<Player>(), 0);

    let visited = store.for_each_of_type(|_: &mut Player| {}).unwrap();
    assert_eq!(visited, 0);
}

#[test]
fn for_each_of_type_skips_destroyed() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    let doomed = store.create(debris_at(2.0));
    store.create(debris_at(3.0));

    store.get_mut(doomed).unwrap().destroy();
    assert_eq!(xs_of_debris(&mut store), vec![1.0, 3.0]);
}

#[test]
fn for_each_pair_visits_every_live_pair() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(Projectile::new(Vec2::new(10.0, 0.0)));
    store.create(debris_at(2.0));
    store.create(Projectile::new(Vec2::new(20.0, 0.0)));
    store.create(Projectile::new(Vec2::new(30.0, 0.0)));

    let mut pairs = Vec::new();
    let visited = store
        .for_each_pair(|d: &mut Debris, p: &mut Projectile| {
            pairs.push((d.body().center.x, p.body().center.x));
        })
        .unwrap();
    assert_eq!(visited, 6);
    assert_eq!(
        pairs,
        vec![
            (1.0, 10.0),
            (1.0, 20.0),
            (1.0, 30.0),
            (2.0, 10.0),
            (2.0, 20.0),
            (2.0, 30.0),
        ]
    );
}

#[test]
fn for_each_pair_stops_using_entities_destroyed_mid_pass() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(debris_at(2.0));
    store.create(Projectile::new(Vec2::new(10.0, 0.0)));
    store.create(Projectile::new(Vec2::new(20.0, 0.0)));

    // Every visit uses up the projectile, so each one is seen only once,
    // and only by the first debris.
    let mut pairs = Vec::new();
    store
        .for_each_pair(|d: &mut Debris, p: &mut Projectile| {
            pairs.push((d.body().center.x, p.body().center.x));
            p.destroy();
        })
        .unwrap();
    assert_eq!(pairs, vec![(1.0, 10.0), (1.0, 20.0)]);

    // Destroying the outer entity ends its row.
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(Projectile::new(Vec2::new(10.0, 0.0)));
    store.create(Projectile::new(Vec2::new(20.0, 0.0)));
    let mut count = 0;
    store
        .for_each_pair(|d: &mut Debris, _: &mut Projectile| {
            count += 1;
            d.destroy();
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn for_each_pair_of_same_type_skips_self() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(debris_at(2.0));

    let mut pairs = Vec::new();
    store
        .for_each_pair(|a: &mut Debris, b: &mut Debris| {
            pairs.push((a.body().center.x, b.body().center.x));
        })
        .unwrap();
    assert_eq!(pairs, vec![(1.0, 2.0), (2.0, 1.0)]);
}

// ── update / draw ─────────────────────────────────────────────────────────────

#[test]
fn update_all_and_draw_all_touch_every_entity_in_order() {
    let mut store = EntityStore::new();
    store.create(debris_at(1.0));
    store.create(Projectile::new(Vec2::new(5.0, 500.0)));
    store.create(debris_at(2.0));

    store.update_all(&InputSnapshot::new());
    let mut ys = Vec::new();
    store.for_each_of_type(|d: &mut Debris| ys.push(d.body().center.y)).unwrap();
    assert_eq!(ys, vec![100.0 + Debris::SPEED, 100.0 + Debris::SPEED]);

    let mut sink = RecordingSink::new();
    store.draw_all(&mut sink);
    let xs: Vec<f32> = sink.calls.iter().map(|(shape, _)| shape.center().x).collect();
    assert_eq!(xs, vec![1.0, 5.0, 2.0]);
}

#[test]
fn update_all_skips_destroyed() {
    let mut store = EntityStore::new();
    let h = store.create(debris_at(1.0));
    store.get_mut(h).unwrap().destroy();
    store.update_all(&InputSnapshot::new());
    assert_eq!(store.get(h).unwrap().body().center.y, 100.0);
}

// ── compact / clear ───────────────────────────────────────────────────────────

#[test]
fn compact_removes_destroyed_and_keeps_survivor_order() {
    let mut store = EntityStore::new();
    let handles: Vec<_> = (1..=5).map(|i| store.create(debris_at(i as f32))).collect();
    let shot = store.create(Projectile::new(Vec2::ZERO));

    store.get_mut(handles[1]).unwrap().destroy();
    store.get_mut(handles[3]).unwrap().destroy();
    store.get_mut(shot).unwrap().destroy();

    assert_eq!(store.compact(), 3);
    assert_eq!(store.len(), 3);
    assert_eq!(xs_of_debris(&mut store), vec![1.0, 3.0, 5.0]);
    assert_eq!(store.count_of::<Debris>(), 3);
    assert_eq!(store.count_of::<Projectile>(), 0);

    // Stale handles no longer resolve
    assert!(store.get(handles[1]).is_none());
    assert!(store.get(shot).is_none());
    assert!(store.get(handles[0]).is_some());

    // Nothing left to remove
    assert_eq!(store.compact(), 0);
}

#[test]
fn compacted_entities_are_never_updated_or_drawn_again() {
    let mut store = EntityStore::new();
    let h = store.create(debris_at(1.0));
    store.get_mut(h).unwrap().destroy();
    store.compact();

    store.update_all(&InputSnapshot::new());
    let mut sink = RecordingSink::new();
    store.draw_all(&mut sink);
    assert!(sink.is_empty());
    assert!(store.is_empty());
}

#[test]
fn ids_are_not_reused_after_clear() {
    let mut store = EntityStore::new();
    let old = store.create(debris_at(1.0));
    store.clear_all();
    assert!(store.is_empty());
    assert_eq!(store.count_of::<Debris>(), 0);

    let new = store.create(debris_at(2.0));
    assert_ne!(old.id(), new.id());
    assert!(store.get(old).is_none());
}
