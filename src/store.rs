//! Owning entity store with a per-type secondary index.
//!
//! The primary store is a `Vec` of boxed entities in creation order; it is
//! the only owner. The index maps each concrete type's [`TypeId`] to the ids
//! of its instances. `TypeId` is unique per type, so two types can never
//! share an index entry, and every typed access goes through a checked
//! downcast.
//!
//! Ids grow monotonically and are never reused, so the primary store stays
//! sorted by id and a stale [`Handle`] simply stops resolving after its
//! entity has been compacted away.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::draw::DrawSink;
use crate::entities::Entity;
use crate::error::StoreError;
use crate::input::InputSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed, non-owning reference to an entity in an [`EntityStore`].
pub struct Handle<T> {
    id: EntityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", type_name::<T>(), self.id)
    }
}

struct Slot {
    id: EntityId,
    entity: Box<dyn Entity>,
}

#[derive(Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    by_type: HashMap<TypeId, Vec<EntityId>>,
    next_id: u64,
}

fn position(slots: &[Slot], id: EntityId) -> Option<usize> {
    slots.binary_search_by_key(&id, |slot| slot.id).ok()
}

/// Two disjoint mutable slots out of one slice.
fn pair_mut(slots: &mut [Slot], a: usize, b: usize) -> (&mut Slot, &mut Slot) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = slots.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = slots.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

fn downcast<T: Entity>(slot: &mut Slot) -> Result<&mut T, StoreError> {
    let id = slot.id;
    slot.entity.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
        log::error!("type index entry {} is not a {}", id, type_name::<T>());
        StoreError::TypeMismatch {
            id: id.raw(),
            expected: type_name::<T>(),
        }
    })
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `entity` and index it under its concrete type.
    /// The returned handle resolves until the entity is compacted or
    /// cleared.
    pub fn create<T: Entity>(&mut self, entity: T) -> Handle<T> {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        self.slots.push(Slot {
            id,
            entity: Box::new(entity),
        });
        self.by_type.entry(TypeId::of::<T>()).or_default().push(id);

        log::trace!("created {} {}", type_name::<T>(), id);
        Handle::new(id)
    }

    /// `None` once the entity has been compacted or cleared. A handle whose
    /// id resolves to a different concrete type also gives `None`, and is
    /// logged as an error since the index can only hand out correct ones.
    pub fn get<T: Entity>(&self, handle: Handle<T>) -> Option<&T> {
        let index = position(&self.slots, handle.id)?;
        let entity = self.slots[index].entity.as_any().downcast_ref::<T>();
        if entity.is_none() {
            log::error!("handle {} does not point at a {}", handle.id, type_name::<T>());
        }
        entity
    }

    pub fn get_mut<T: Entity>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let index = position(&self.slots, handle.id)?;
        let entity = self.slots[index].entity.as_any_mut().downcast_mut::<T>();
        if entity.is_none() {
            log::error!("handle {} does not point at a {}", handle.id, type_name::<T>());
        }
        entity
    }

    /// Handles to every indexed `T`, creation order. Includes instances that
    /// are destroyed but not yet compacted.
    pub fn handles_of<T: Entity>(&self) -> Vec<Handle<T>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|ids| ids.iter().copied().map(Handle::new).collect())
            .unwrap_or_default()
    }

    /// Number of indexed `T`, destroyed-but-not-compacted included.
    pub fn count_of<T: Entity>(&self) -> usize {
        self.by_type
            .get(&TypeId::of::<T>())
            .map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Visit every live instance of exactly `T`, in creation order.
    /// Returns how many were visited.
    pub fn for_each_of_type<T, F>(&mut self, mut visitor: F) -> Result<usize, StoreError>
    where
        T: Entity,
        F: FnMut(&mut T),
    {
        let Some(ids) = self.by_type.get(&TypeId::of::<T>()) else {
            return Ok(0);
        };

        let mut visited = 0;
        for &id in ids {
            let Some(index) = position(&self.slots, id) else {
                continue;
            };
            let slot = &mut self.slots[index];
            if slot.entity.is_destroyed() {
                continue;
            }
            visitor(downcast::<T>(slot)?);
            visited += 1;
        }
        Ok(visited)
    }

    /// Visit every pair of live `A` and `B`, `A` outer and `B` inner, both in
    /// creation order. A pair is skipped as soon as either side has been
    /// destroyed, including by an earlier visit in the same pass.
    pub fn for_each_pair<A, B, F>(&mut self, mut visitor: F) -> Result<usize, StoreError>
    where
        A: Entity,
        B: Entity,
        F: FnMut(&mut A, &mut B),
    {
        let outer = self.ids_of::<A>();
        let inner = self.ids_of::<B>();

        let mut visited = 0;
        for &a_id in &outer {
            let Some(a_index) = position(&self.slots, a_id) else {
                continue;
            };
            for &b_id in &inner {
                if self.slots[a_index].entity.is_destroyed() {
                    break;
                }
                if a_id == b_id {
                    continue;
                }
                let Some(b_index) = position(&self.slots, b_id) else {
                    continue;
                };
                let (a_slot, b_slot) = pair_mut(&mut self.slots, a_index, b_index);
                if b_slot.entity.is_destroyed() {
                    continue;
                }
                visitor(downcast::<A>(a_slot)?, downcast::<B>(b_slot)?);
                visited += 1;
            }
        }
        Ok(visited)
    }

    /// `update` every live entity once, in creation order.
    pub fn update_all(&mut self, input: &InputSnapshot) {
        for slot in &mut self.slots {
            if !slot.entity.is_destroyed() {
                slot.entity.update(input);
            }
        }
    }

    /// `draw` every owned entity once, in creation order.
    pub fn draw_all(&self, sink: &mut dyn DrawSink) {
        for slot in &self.slots {
            slot.entity.draw(sink);
        }
    }

    /// Free every destroyed entity and drop it from the index. Survivors
    /// keep their relative order. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| !slot.entity.is_destroyed());
        let removed = before - self.slots.len();

        if removed > 0 {
            let slots = &self.slots;
            for ids in self.by_type.values_mut() {
                ids.retain(|&id| position(slots, id).is_some());
            }
            self.by_type.retain(|_, ids| !ids.is_empty());
            log::trace!("compacted {} entities, {} left", removed, self.slots.len());
        }
        removed
    }

    /// Free everything.
    pub fn clear_all(&mut self) {
        self.slots.clear();
        self.by_type.clear();
    }

    fn ids_of<T: Entity>(&self) -> Vec<EntityId> {
        self.by_type
            .get(&TypeId::of::<T>())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::compute::GameController;
    use crate::config::GameConfig;
    use crate::entities::{Debris, Projectile, World};
    use crate::error::GameError;

    /// File `id` under `T` in the type index, whatever it really is.
    fn index_as<T: Entity>(store: &mut EntityStore, id: EntityId) {
        store.by_type.entry(TypeId::of::<T>()).or_default().push(id);
    }

    fn is_debris_mismatch(err: &StoreError, id: EntityId) -> bool {
        *err == StoreError::TypeMismatch {
            id: id.raw(),
            expected: type_name::<Debris>(),
        }
    }

    #[test]
    fn for_each_of_type_reports_a_mislabelled_entry() {
        let mut store = EntityStore::new();
        let shot = store.create(Projectile::new(Vec2::new(100.0, 300.0)));
        index_as::<Debris>(&mut store, shot.id());

        let mut visited = 0;
        let err = store
            .for_each_of_type(|_: &mut Debris| visited += 1)
            .unwrap_err();
        assert!(is_debris_mismatch(&err, shot.id()));
        assert_eq!(visited, 0);
    }

    #[test]
    fn for_each_pair_reports_a_mislabelled_entry() {
        let mut store = EntityStore::new();
        store.create(World::new(Vec2::new(400.0, 770.0), 800.0, 10));
        let shot = store.create(Projectile::new(Vec2::new(100.0, 300.0)));
        index_as::<Debris>(&mut store, shot.id());

        let err = store
            .for_each_pair(|_: &mut Debris, _: &mut World| {})
            .unwrap_err();
        assert!(is_debris_mismatch(&err, shot.id()));
    }

    #[test]
    fn mistyped_handle_resolves_to_none() {
        let mut store = EntityStore::new();
        let shot = store.create(Projectile::new(Vec2::ZERO));
        let wrong: Handle<Debris> = Handle::new(shot.id());

        assert!(store.get(wrong).is_none());
        assert!(store.get_mut(wrong).is_none());
        assert!(store.get(shot).is_some());
    }

    #[test]
    fn step_passes_a_mismatch_through() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut game = GameController::new(GameConfig::default(), &mut rng).unwrap();
        let store = game.store_mut();
        let shot = store.create(Projectile::new(Vec2::new(100.0, 300.0)));
        index_as::<Debris>(store, shot.id());

        let err = game.step(&InputSnapshot::new(), &mut rng).unwrap_err();
        match err {
            GameError::Store(err) => assert!(is_debris_mismatch(&err, shot.id())),
            other => panic!("expected a store error, got {other:?}"),
        }
    }
}
