pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod storage;
pub mod system;
pub mod world;

pub use component::{Component, Signature};
pub use config::Config;
pub use entity::Entity;
pub use error::{Error, Result};
pub use event::{Bus, Event};
pub use system::{Requirements, System};
pub use world::{Id as WorldId, World};

pub use kestrel_macros::{Component, Event};
