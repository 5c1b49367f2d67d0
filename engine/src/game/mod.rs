//! Stock gameplay components and systems built on the ECS.
//!
//! Everything here is an ordinary consumer of [`World`](crate::ecs::World): the systems declare
//! their components, read and write them through the world, and talk to each other through the
//! event [`Bus`](crate::ecs::Bus). Rendering goes through the [`Canvas`] trait, so any backend
//! (or a recording canvas in tests) can sit behind [`RenderSystem`].

pub mod animation;
pub mod assets;
pub mod collision;
pub mod components;
pub mod damage;
pub mod level;
pub mod movement;
pub mod render;

pub use animation::AnimationSystem;
pub use assets::{AssetStore, Texture};
pub use collision::{CollisionEvent, CollisionSystem};
pub use components::{Animation, BoxCollider, Health, Rect, RigidBody, Sprite, Transform, Vec2};
pub use damage::DamageSystem;
pub use level::TileMap;
pub use movement::MovementSystem;
pub use render::{Canvas, DrawCall, RenderSystem};
