//! Component management for the ECS.
//!
//! Components are plain data records attached to entities. Each distinct component type gets a
//! small integer [`Id`] from the world's [`Registry`] the first time it is seen, and that ID
//! selects both the component's bit in every [`Signature`] and its pool in storage.
//!
//! ## Usage
//!
//! ```ignore
//! use kestrel_engine::ecs::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new(MAX_COMPONENT_TYPES);
//! let pos_id = registry.register::<Position>();
//! ```

mod registry;
mod signature;

pub use registry::Registry;
pub use signature::Signature;

/// A component identifier. IDs are assigned from 0 in first-seen order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used as a component.
/// Use `#[derive(Component)]` to implement it.
pub trait Component: 'static + Sized {}
