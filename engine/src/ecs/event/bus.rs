//! Central registry of event handlers.
//!
//! # Overview
//!
//! [`Bus`] keeps one handler list per event type, keyed by `TypeId`:
//! - **Subscribe**: [`subscribe()`](Bus::subscribe) appends a handler and returns a
//!   [`Subscription`] token
//! - **Emit**: [`emit()`](Bus::emit) runs every handler for the event type, in subscription
//!   order, before returning
//! - **Unsubscribe**: [`unsubscribe()`](Bus::unsubscribe) drops the handler named by a token
//!
//! # Type Erasure
//!
//! Handler lists are stored as `Box<dyn ErasedHandlers>` and downcast to `Handlers<E>` in the
//! generic methods, so a single bus carries any number of event types.
//!
//! # Example
//!
//! ```rust,ignore
//! use kestrel_engine::ecs::event::{Bus, Event};
//!
//! #[derive(Event)]
//! struct Damage { amount: u32 }
//!
//! let mut bus = Bus::new();
//! let subscription = bus.subscribe(|damage: &Damage| println!("took {}", damage.amount));
//!
//! assert_eq!(bus.emit(Damage { amount: 5 }), 1);
//! bus.unsubscribe(subscription);
//! ```
//!
//! Dispatch holds `&mut Bus`. Handlers that need to emit further events or touch the world
//! should forward what they received (for example through a channel) and act on it later.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
};

use log::trace;

use crate::ecs::event::Event;

/// Token naming one subscribed handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    type_id: TypeId,
    id: u64,
}

/// The handlers of one event type, in subscription order.
struct Handlers<E: Event> {
    entries: Vec<(u64, Box<dyn FnMut(&E)>)>,
}

/// Type-erased view of [`Handlers`].
trait ErasedHandlers {
    fn len(&self) -> usize;

    fn remove(&mut self, id: u64) -> bool;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: Event> ErasedHandlers for Handlers<E> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn remove(&mut self, id: u64) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                drop(self.entries.remove(index));
                true
            }
            None => false,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Synchronous event bus.
#[derive(Default)]
pub struct Bus {
    handlers: HashMap<TypeId, Box<dyn ErasedHandlers>>,

    /// Next subscription id; never reused.
    next_id: u64,
}

impl Bus {
    /// Creates a new, empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`.
    pub fn subscribe<E: Event>(&mut self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;

        let type_id = TypeId::of::<E>();
        let handlers = self
            .handlers
            .entry(type_id)
            .or_insert_with(|| Box::new(Handlers::<E> { entries: Vec::new() }));
        if let Some(handlers) = handlers.as_any_mut().downcast_mut::<Handlers<E>>() {
            handlers.entries.push((id, Box::new(handler)));
        }

        trace!("subscribed handler {} to `{}`", id, type_name::<E>());
        Subscription { type_id, id }
    }

    /// Drop the handler named by `subscription`. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.handlers
            .get_mut(&subscription.type_id)
            .is_some_and(|handlers| handlers.remove(subscription.id))
    }

    /// Deliver `event` to every handler of `E`, in subscription order. Returns the number of
    /// handlers invoked.
    pub fn emit<E: Event>(&mut self, event: E) -> usize {
        let Some(handlers) = self
            .handlers
            .get_mut(&TypeId::of::<E>())
            .and_then(|handlers| handlers.as_any_mut().downcast_mut::<Handlers<E>>())
        else {
            return 0;
        };

        for (_, handler) in handlers.entries.iter_mut() {
            handler(&event);
        }
        handlers.entries.len()
    }

    /// Number of handlers subscribed to `E`.
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map_or(0, |handlers| handlers.len())
    }

    /// Drop every handler of every event type.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
