use std::{cell::RefCell, rc::Rc};

use crossbeam::channel::{Receiver, unbounded};
use log::{debug, info};

use crate::{
    ecs::{Bus, Entity, Requirements, Result, System, World, event::Subscription},
    game::{
        collision::CollisionEvent,
        components::{BoxCollider, Health},
    },
};

/// Applies damage to colliding entities with [`Health`], destroying those that run out.
///
/// Collisions are received from the bus as they are emitted and applied on this system's next
/// update. Destruction is deferred like any other, so the entity stays readable until the next
/// flush. The handler is unsubscribed when the system is dropped.
pub struct DamageSystem {
    bus: Rc<RefCell<Bus>>,
    subscription: Subscription,
    hits: Receiver<CollisionEvent>,
    amount: i32,
}

impl DamageSystem {
    /// Subscribe to collisions on `bus`; each collision costs both entities `amount` health.
    pub fn new(bus: Rc<RefCell<Bus>>, amount: i32) -> Self {
        let (sender, hits) = unbounded();
        let subscription = bus.borrow_mut().subscribe(move |event: &CollisionEvent| {
            // The system owns the receiver for as long as the handler is subscribed.
            let _ = sender.send(*event);
        });
        Self {
            bus,
            subscription,
            hits,
            amount,
        }
    }

    fn hit(&self, world: &mut World, entity: Entity, entities: &[Entity]) -> Result<()> {
        if !entities.contains(&entity) {
            return Ok(());
        }

        let health = world.get_component_mut::<Health>(entity)?;
        if health.is_depleted() {
            return Ok(());
        }
        let remaining = health.damage(self.amount);
        debug!("entity {} took {} damage", entity.id(), self.amount);

        if remaining <= 0 {
            info!("entity {} was destroyed", entity.id());
            world.destroy_entity(entity)?;
        }
        Ok(())
    }
}

impl System for DamageSystem {
    fn require(&self, requires: &mut Requirements<'_>) {
        requires.component::<BoxCollider>().component::<Health>();
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
        for CollisionEvent { a, b } in self.hits.try_iter() {
            self.hit(world, a, entities)?;
            self.hit(world, b, entities)?;
        }
        Ok(())
    }
}

impl Drop for DamageSystem {
    fn drop(&mut self) {
        if let Ok(mut bus) = self.bus.try_borrow_mut() {
            bus.unsubscribe(self.subscription);
        }
    }
}
