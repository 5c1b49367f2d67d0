//! The live, ordered member list of a system.

use fixedbitset::FixedBitSet;

use crate::ecs::{
    component::{self, Component, Signature},
    entity::Entity,
    storage::Pools,
};

/// Reads the ordering key of an entity from component storage.
pub(crate) trait SortKey {
    fn key(&self, pools: &Pools, entity: Entity) -> Option<i64>;
}

/// Orders members by a field of component `C`.
pub(crate) struct ComponentKey<C> {
    pub(crate) id: component::Id,
    pub(crate) key: fn(&C) -> i64,
}

impl<C: Component> SortKey for ComponentKey<C> {
    fn key(&self, pools: &Pools, entity: Entity) -> Option<i64> {
        pools
            .get::<C>(self.id)?
            .get(entity.index())
            .map(self.key)
    }
}

/// The entities currently matching a system's signature.
///
/// Members are appended in the order they join, unless the system asked for keyed ordering
/// (see [`Requirements::order_by`](crate::ecs::Requirements::order_by)). Keyed members are
/// inserted before the first existing member whose key is greater than or equal to theirs; keys
/// are read once, when the entity joins, and the list is never re-sorted afterwards.
pub struct Members {
    /// The required components.
    signature: Signature,

    /// Member entities in iteration order.
    entities: Vec<Entity>,

    /// Insertion keys, parallel to `entities`. Empty when unordered.
    keys: Vec<i64>,

    /// Membership bit per entity index.
    present: FixedBitSet,

    /// Ordering key source, if ordered.
    order: Option<Box<dyn SortKey>>,
}

impl Members {
    pub(crate) fn new(signature: Signature, order: Option<Box<dyn SortKey>>) -> Self {
        Self {
            signature,
            entities: Vec::new(),
            keys: Vec::new(),
            present: FixedBitSet::new(),
            order,
        }
    }

    /// The signature an entity must satisfy to be a member.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Member entities in iteration order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `entity` is a member.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.present.contains(entity.index())
    }

    /// Whether members are kept in key order.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Whether an entity with `signature` belongs here.
    #[inline]
    pub fn matches(&self, signature: &Signature) -> bool {
        signature.satisfies(&self.signature)
    }

    /// Add `entity`. Returns `false` (and changes nothing) if it is already a member.
    pub(crate) fn insert(&mut self, entity: Entity, pools: &Pools) -> bool {
        if self.contains(entity) {
            return false;
        }

        self.present.grow(entity.index() + 1);
        self.present.insert(entity.index());

        match &self.order {
            None => self.entities.push(entity),
            Some(order) => {
                // Entities without a key sort last.
                let key = order.key(pools, entity).unwrap_or(i64::MAX);
                let at = self.keys.partition_point(|existing| *existing < key);
                self.entities.insert(at, entity);
                self.keys.insert(at, key);
            }
        }
        true
    }

    /// Remove `entity`. Returns `false` (and changes nothing) if it is not a member.
    pub(crate) fn remove(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            return false;
        }

        self.present.set(entity.index(), false);
        if let Some(at) = self.entities.iter().position(|member| *member == entity) {
            self.entities.remove(at);
            if self.order.is_some() {
                self.keys.remove(at);
            }
        }
        true
    }

    /// Make membership of `entity` agree with `signature`. Returns whether membership changed.
    pub(crate) fn refresh(&mut self, entity: Entity, signature: &Signature, pools: &Pools) -> bool {
        if self.matches(signature) {
            self.insert(entity, pools)
        } else {
            self.remove(entity)
        }
    }
}
