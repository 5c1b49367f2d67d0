//! World configuration.
//!
//! The limits here are fixed for the lifetime of a [`World`](crate::ecs::World). Exceeding them
//! is a design error, not a runtime condition, so the world panics rather than returning an error.

/// Hard cap on the number of distinct component types a world can register. This is the width
/// of every [`Signature`](crate::ecs::Signature).
pub const MAX_COMPONENT_TYPES: usize = 32;

/// Default cap on entity IDs. IDs are handed out below this value and never wrap.
pub const MAX_ENTITIES: u32 = u32::MAX;

/// Default number of slots a component pool starts with.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Configuration for a [`World`](crate::ecs::World).
///
/// ```rust,ignore
/// let config = Config::new().with_max_entities(10_000).with_pool_capacity(1_024);
/// let world = World::with_config(config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Entity IDs are allocated in `0..max_entities`.
    pub max_entities: u32,

    /// Signature width; at most [`MAX_COMPONENT_TYPES`].
    pub max_component_types: usize,

    /// Initial slot count of a freshly created component pool.
    pub pool_capacity: usize,
}

impl Config {
    /// Construct the default configuration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_entities: MAX_ENTITIES,
            max_component_types: MAX_COMPONENT_TYPES,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }

    /// Set the entity ID cap.
    #[inline]
    pub const fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Set the signature width.
    ///
    /// # Panics
    /// If `max_component_types` is larger than [`MAX_COMPONENT_TYPES`].
    #[inline]
    pub const fn with_max_component_types(mut self, max_component_types: usize) -> Self {
        assert!(
            max_component_types <= MAX_COMPONENT_TYPES,
            "component type capacity cannot exceed MAX_COMPONENT_TYPES"
        );
        self.max_component_types = max_component_types;
        self
    }

    /// Set the initial pool slot count.
    #[inline]
    pub const fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
