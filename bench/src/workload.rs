//! Seeded world builders.

use kestrel_engine::ecs::{Entity, Result, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{Health, Layer, Position, Velocity};

/// Configuration for a generated world.
pub struct WorkloadConfig {
    /// Number of entities to create.
    pub entity_count: usize,
    /// Share of entities that also get a velocity, in `0.0..=1.0`.
    pub moving_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            entity_count: 10_000,
            moving_ratio: 0.5,
            seed: 12345,
        }
    }
}

/// Spawns randomised entities into a world.
pub struct Workload {
    rng: ChaCha8Rng,
    moving_ratio: f64,
}

impl Workload {
    pub fn new(config: &WorkloadConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            moving_ratio: config.moving_ratio,
        }
    }

    /// Create one entity with a random position, layer and health, and (by `moving_ratio`) a
    /// random velocity.
    pub fn spawn(&mut self, world: &mut World) -> Result<Entity> {
        let entity = world.create_entity();
        world.add_component(
            entity,
            Position {
                x: self.rng.gen_range(-100.0..100.0),
                y: self.rng.gen_range(-100.0..100.0),
            },
        )?;
        world.add_component(entity, Layer(self.rng.gen_range(0..16)))?;
        world.add_component(
            entity,
            Health {
                current: 100.0,
                max: 100.0,
            },
        )?;
        if self.rng.gen_bool(self.moving_ratio) {
            world.add_component(
                entity,
                Velocity {
                    x: self.rng.gen_range(-10.0..10.0),
                    y: self.rng.gen_range(-10.0..10.0),
                },
            )?;
        }
        Ok(entity)
    }

    /// Pick one of `entities` at random.
    pub fn pick(&mut self, entities: &[Entity]) -> Option<Entity> {
        if entities.is_empty() {
            return None;
        }
        Some(entities[self.rng.gen_range(0..entities.len())])
    }
}

/// Build and flush a world of `config.entity_count` entities.
pub fn populate(world: &mut World, config: &WorkloadConfig) -> Result<Vec<Entity>> {
    let mut workload = Workload::new(config);
    let entities = (0..config.entity_count)
        .map(|_| workload.spawn(world))
        .collect::<Result<Vec<_>>>()?;
    world.flush();
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Movement;

    #[test]
    fn populate_is_reproducible() {
        // Given
        let config = WorkloadConfig {
            entity_count: 200,
            ..Default::default()
        };
        let mut first = World::new();
        let mut second = World::new();
        first.add_system(Movement);
        second.add_system(Movement);

        // When
        populate(&mut first, &config).unwrap();
        populate(&mut second, &config).unwrap();

        // Then
        let moving = first.system_entities::<Movement>().unwrap().len();
        assert_eq!(moving, second.system_entities::<Movement>().unwrap().len());
        assert!(moving > 0 && moving < 200);
        assert_eq!(first.entity_count(), 200);
    }
}
