//! Kestrel: a small entity-component-system runtime for 2D games.
//!
//! The [`ecs`] module is the core: entity identity, typed component pools, signatures, systems
//! and the [`World`](ecs::World) that keeps system membership in sync with component changes.
//! The [`game`] module holds the stock gameplay components and systems built on top of it, and
//! [`core`] carries engine-wide plumbing such as the channel logger.

// Allows the derive macros to refer to `::kestrel_engine` from inside this crate.
extern crate self as kestrel_engine;

pub mod core;
pub mod ecs;
pub mod game;
