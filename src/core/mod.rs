//! Core engine module
//!
//! Contains the Engine context, its configuration and shared value types

mod color;
mod config;
mod engine;
mod stats;

pub use color::{Color, ColorParseError};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, SCENE_FILE_EXTENSION};
pub use stats::FrameStats;
