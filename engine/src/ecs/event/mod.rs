//! Typed, synchronous publish/subscribe between systems.

mod bus;

pub use bus::{Bus, Subscription};

/// Marker trait for event types.
///
/// Events must be `'static`: handlers are stored by event type and may outlive the emitter.
/// Derive it with `#[derive(Event)]`.
pub trait Event: 'static {}
