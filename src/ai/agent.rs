//! AI agents and their per-frame update

use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::scene::{EntityFactory, EntityHandle};

use super::steering::Seek;

/// Identifier of an agent owned by an [`AiSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

/// What an agent does each frame
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Stand still
    Idle,
    /// Move towards the agent's target entity
    Follow,
    /// Walk the waypoints in order, looping
    Patrol { waypoints: Vec<DVec3> },
}

/// Observable state of an agent after its last update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    #[default]
    Idle,
    Moving,
    /// Within stop distance of its goal
    Arrived,
}

/// An entity driven by a behavior
#[derive(Debug, Clone)]
pub struct Agent {
    pub entity: EntityHandle,
    pub behavior: Behavior,
    pub target: Option<EntityHandle>,
    pub state: AgentState,
    /// Index of the next patrol waypoint
    waypoint: usize,
}

impl Agent {
    /// Index of the patrol waypoint the agent is heading to
    #[must_use]
    pub const fn waypoint(&self) -> usize {
        self.waypoint
    }
}

/// Movement tuning for agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Units per second
    pub follow_speed: f64,
    /// Agents stop once this close to their goal
    pub stop_distance: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            follow_speed: 1.0,
            stop_distance: 0.5,
        }
    }
}

/// Owns every agent and advances them once per frame
#[derive(Debug, Default)]
pub struct AiSystem {
    agents: Vec<(AgentId, Agent)>,
    next_id: u32,
    config: AiConfig,
}

impl AiSystem {
    #[must_use]
    pub fn new(config: AiConfig) -> Self {
        Self {
            agents: Vec::new(),
            next_id: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Drive `entity` with a behavior
    pub fn create_agent(&mut self, entity: EntityHandle, behavior: Behavior) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.push((
            id,
            Agent {
                entity,
                behavior,
                target: None,
                state: AgentState::Idle,
                waypoint: 0,
            },
        ));
        id
    }

    /// Set the entity a following agent moves towards.
    ///
    /// Returns false if the agent does not exist.
    pub fn set_target(&mut self, agent: AgentId, target: Option<EntityHandle>) -> bool {
        match self.agent_mut(agent) {
            Some(agent) => {
                agent.target = target;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|(agent_id, _)| *agent_id == id)
            .map(|(_, agent)| agent)
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents
            .iter_mut()
            .find(|(agent_id, _)| *agent_id == id)
            .map(|(_, agent)| agent)
    }

    /// Stop driving an agent
    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let index = self.agents.iter().position(|(agent_id, _)| *agent_id == id)?;
        Some(self.agents.remove(index).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Advance every agent by one frame.
    ///
    /// Agents whose entity no longer exists are dropped. A following agent
    /// whose target is gone loses the target and goes idle.
    pub fn update<F: EntityFactory + ?Sized>(&mut self, delta_seconds: f64, world: &mut F) {
        self.agents.retain(|(id, agent)| {
            let alive = world.contains(agent.entity);
            if !alive {
                debug!("Dropping agent {id:?}: entity {} is gone", agent.entity);
            }
            alive
        });

        let AiConfig {
            follow_speed,
            stop_distance,
        } = self.config;

        for (_, agent) in &mut self.agents {
            let goal = match &agent.behavior {
                Behavior::Idle => None,
                Behavior::Follow => match agent.target {
                    Some(target) => match world.position(target) {
                        Ok(position) => Some(position),
                        Err(_) => {
                            debug!("Agent target {target} is gone");
                            agent.target = None;
                            None
                        }
                    },
                    None => None,
                },
                Behavior::Patrol { waypoints } if waypoints.is_empty() => None,
                Behavior::Patrol { waypoints } => {
                    waypoints.get(agent.waypoint % waypoints.len()).copied()
                }
            };

            let Some(goal) = goal else {
                agent.state = AgentState::Idle;
                continue;
            };
            let Ok(position) = world.position(agent.entity) else {
                continue;
            };

            let seek = Seek::new(goal, follow_speed, stop_distance);
            match seek.displacement(position, delta_seconds) {
                Some(step) => {
                    if world.set_position(agent.entity, position + step).is_ok() {
                        agent.state = AgentState::Moving;
                    }
                }
                None => {
                    agent.state = AgentState::Arrived;
                    if let Behavior::Patrol { waypoints } = &agent.behavior {
                        agent.waypoint = (agent.waypoint + 1) % waypoints.len();
                    }
                }
            }
        }
    }
}
