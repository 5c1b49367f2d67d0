//! Common component types and systems used across benchmarks.

use kestrel_engine::ecs::{Entity, Requirements, Result, System, World};
use kestrel_macros::Component;

// =============================================================================
// Transform Components
// =============================================================================

/// 2D position component (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// 2D velocity component (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Draw order component.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Layer(pub i64);

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

// Marker components for wide signatures
macro_rules! define_marker_components {
    ($($name:ident),*) => {
        $(
            #[derive(Component, Clone, Copy, Debug, Default)]
            pub struct $name;
        )*
    };
}

define_marker_components!(
    MarkerA, MarkerB, MarkerC, MarkerD, MarkerE, MarkerF, MarkerG, MarkerH
);

// =============================================================================
// Systems
// =============================================================================

/// Integrates position by velocity.
pub struct Movement;

impl System for Movement {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires.component::<Position>().component::<Velocity>();
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
        for &entity in entities {
            let velocity = *world.get_component::<Velocity>(entity)?;
            let position = world.get_component_mut::<Position>(entity)?;
            position.x += velocity.x * delta;
            position.y += velocity.y * delta;
        }
        Ok(())
    }
}

/// Touches every member of a layer-ordered system.
pub struct Layered {
    pub sum: i64,
}

impl System for Layered {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires
            .component::<Position>()
            .order_by::<Layer>(|layer| layer.0);
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
        for &entity in entities {
            self.sum += world.get_component::<Layer>(entity)?.0;
        }
        Ok(())
    }
}
