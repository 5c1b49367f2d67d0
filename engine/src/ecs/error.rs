//! Errors for invalid access to world data.
//!
//! Capacity limits (too many entities, too many component types) are not represented here: they
//! are fixed by [`Config`](crate::ecs::Config) and exceeding them panics.

use thiserror::Error;

use crate::ecs::{entity, world};

/// Errors returned by [`World`](crate::ecs::World) and [`Entity`](crate::ecs::Entity) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The entity handle has no owning world.
    #[error("entity {0} is detached from any world")]
    Detached(entity::Id),

    /// The entity handle was created by a different world.
    #[error("entity {entity} belongs to world {owner}, not world {world}")]
    ForeignEntity {
        /// The entity that was used.
        entity: entity::Id,
        /// The world that created it.
        owner: world::Id,
        /// The world it was used with.
        world: world::Id,
    },

    /// The entity ID is not allocated (never created, or destroyed and flushed).
    #[error("entity {0} is not alive")]
    DeadEntity(entity::Id),

    /// The entity does not have the requested component.
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        /// The entity that was queried.
        entity: entity::Id,
        /// The component type name.
        component: &'static str,
    },

    /// No system of the requested type is registered (or it is currently running).
    #[error("system `{0}` is not registered")]
    MissingSystem(&'static str),
}

/// Result type for ECS operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        // Given
        let missing = Error::MissingComponent {
            entity: entity::Id::from(7),
            component: "Position",
        };
        let foreign = Error::ForeignEntity {
            entity: entity::Id::from(1),
            owner: world::Id::new(2),
            world: world::Id::new(3),
        };

        // Then
        assert_eq!(missing.to_string(), "entity 7 has no `Position` component");
        assert_eq!(
            foreign.to_string(),
            "entity 1 belongs to world 2, not world 3"
        );
        assert_eq!(
            Error::Detached(entity::Id::from(4)).to_string(),
            "entity 4 is detached from any world"
        );
    }
}
