use log::trace;

use crate::{
    ecs::{Entity, Requirements, Result, System, World},
    game::components::{RigidBody, Transform},
};

/// Moves every entity with a [`Transform`] and a [`RigidBody`] by `velocity * delta`.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires.component::<Transform>().component::<RigidBody>();
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
        for &entity in entities {
            let velocity = world.get_component::<RigidBody>(entity)?.velocity;
            let transform = world.get_component_mut::<Transform>(entity)?;
            transform.position += velocity * delta;
            trace!(
                "entity {} moved to ({}, {})",
                entity.id(),
                transform.position.x,
                transform.position.y
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Vec2;

    #[test]
    fn moves_by_velocity_each_frame() {
        // Given
        let mut world = World::new();
        world.add_system(MovementSystem);
        let entity = world.create_entity();
        world.add_component(entity, Transform::at(0.0, 0.0)).unwrap();
        world.add_component(entity, RigidBody::new(5.0, 0.0)).unwrap();

        // When
        world.update(1.0).unwrap();
        world.update(1.0).unwrap();

        // Then
        assert_eq!(
            world.get_component::<Transform>(entity).unwrap().position,
            Vec2::new(10.0, 0.0)
        );
    }

    #[test]
    fn ignores_entities_without_velocity() {
        // Given
        let mut world = World::new();
        world.add_system(MovementSystem);
        let entity = world.create_entity();
        world.add_component(entity, Transform::at(3.0, 4.0)).unwrap();

        // When
        world.update(1.0).unwrap();

        // Then
        assert_eq!(
            world.get_component::<Transform>(entity).unwrap().position,
            Vec2::new(3.0, 4.0)
        );
        assert!(world.system_entities::<MovementSystem>().unwrap().is_empty());
    }
}
