//! Engine-wide plumbing shared by the ECS and game code.

pub mod log;
