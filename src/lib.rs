pub mod app;
pub mod assets;
pub mod camera;
pub mod cli;
pub mod config;
pub mod ecs;
pub mod events;
pub mod gallery;
pub mod input;
pub mod navigation;
pub mod room;
pub mod theme;
pub mod time;
pub mod tween;
pub mod views;

pub use app::{FrameSink, Portfolio};
