//! Axis-aligned box collision.

use std::{cell::RefCell, rc::Rc};

use log::debug;

use crate::{
    ecs::{Bus, Entity, Event, Requirements, Result, System, World},
    game::components::{BoxCollider, Transform},
};

/// Two entities whose boxes overlap this frame. `a` precedes `b` in the system's member order.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

/// Tests every pair of entities with a [`Transform`] and a [`BoxCollider`] and emits a
/// [`CollisionEvent`] for each overlapping pair.
pub struct CollisionSystem {
    bus: Rc<RefCell<Bus>>,
    boxes: Vec<(Entity, Bounds)>,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Bounds {
    fn of(transform: &Transform, collider: &BoxCollider) -> Self {
        Self {
            x: transform.position.x + collider.offset.x,
            y: transform.position.y + collider.offset.y,
            width: collider.width as f32,
            height: collider.height as f32,
        }
    }

    /// Touching edges do not overlap.
    fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl CollisionSystem {
    pub fn new(bus: Rc<RefCell<Bus>>) -> Self {
        Self {
            bus,
            boxes: Vec::new(),
        }
    }
}

impl System for CollisionSystem {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires.component::<Transform>().component::<BoxCollider>();
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
        self.boxes.clear();
        for &entity in entities {
            let transform = world.get_component::<Transform>(entity)?;
            let collider = world.get_component::<BoxCollider>(entity)?;
            self.boxes.push((entity, Bounds::of(transform, collider)));
        }

        let mut bus = self.bus.borrow_mut();
        for (i, (a, bounds_a)) in self.boxes.iter().enumerate() {
            for (b, bounds_b) in &self.boxes[i + 1..] {
                if bounds_a.overlaps(bounds_b) {
                    debug!("entity {} collides with entity {}", a.id(), b.id());
                    bus.emit(CollisionEvent { a: *a, b: *b });
                }
            }
        }
        Ok(())
    }
}
