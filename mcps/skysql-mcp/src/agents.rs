//! Agent directory
//!
//! In-memory map of agent id to [`Agent`], owned by the server context.
//! A refresh builds a complete new map and publishes it with a single atomic
//! pointer swap, so readers see either the old or the new listing, never a
//! mix. Concurrent refreshes may land in either order.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::skysql::Agent;

/// Best-effort cache of the last successful agent listing
pub struct AgentDirectory {
    agents: ArcSwap<HashMap<String, Agent>>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self {
            agents: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Replace the whole directory with a fresh listing
    pub fn replace(&self, agents: &[Agent]) {
        let map: HashMap<String, Agent> = agents
            .iter()
            .map(|agent| (agent.id.clone(), agent.clone()))
            .collect();
        tracing::debug!(count = map.len(), "agent directory refreshed");
        self.agents.store(Arc::new(map));
    }

    /// Look up an agent in the current snapshot
    pub fn get(&self, agent_id: &str) -> Option<Agent> {
        self.agents.load().get(agent_id).cloned()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.agents.load().contains_key(agent_id)
    }

    pub fn len(&self) -> usize {
        self.agents.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> Agent {
        Agent {
            id: id.to_string(),
            name: format!("agent {id}"),
            agent_type: "dba".to_string(),
            description: None,
            status: None,
            datasource_id: None,
        }
    }

    #[test]
    fn test_starts_empty() {
        let dir = AgentDirectory::new();
        assert!(dir.is_empty());
        assert!(dir.get("a").is_none());
    }

    #[test]
    fn test_replace_discards_stale_entries() {
        let dir = AgentDirectory::new();
        dir.replace(&[agent("a"), agent("b")]);
        assert!(dir.contains("a"));
        assert!(dir.contains("b"));

        dir.replace(&[agent("b"), agent("c")]);
        assert!(!dir.contains("a"));
        assert!(dir.contains("b"));
        assert!(dir.contains("c"));
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn test_replace_with_empty_listing_clears() {
        let dir = AgentDirectory::new();
        dir.replace(&[agent("a")]);
        dir.replace(&[]);
        assert!(dir.is_empty());
    }
}
