pub mod animation;
pub mod combat;
pub mod compute;
pub mod config;
pub mod director;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod sinks;
