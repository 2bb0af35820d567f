//! AI module
//!
//! Agents bound to entities, moved each frame by simple kinematic steering.

mod agent;
mod steering;

pub use agent::{Agent, AgentId, AgentState, AiConfig, AiSystem, Behavior};
pub use steering::Seek;
