use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::agent::DeliveryAgent;

/// Reserves the longest-idle available agent (oldest `created_at`, id as
/// tie-break).
///
/// Selection runs over a snapshot; the flip to unavailable happens under the
/// entry lock, conditioned on the flag still being true at write time. A
/// caller that loses the race to a concurrent reservation re-runs selection
/// over the remaining agents, so two callers can never walk away with the
/// same agent. Exhausting the pool returns `NoAgentsAvailable`.
pub fn reserve_agent(agents: &DashMap<Uuid, DeliveryAgent>) -> Result<DeliveryAgent, AppError> {
    loop {
        let candidate = agents
            .iter()
            .filter(|entry| entry.value().is_available)
            .min_by_key(|entry| (entry.value().created_at, *entry.key()))
            .map(|entry| *entry.key());

        let Some(id) = candidate else {
            return Err(AppError::NoAgentsAvailable);
        };

        if let Some(mut agent) = agents.get_mut(&id) {
            if agent.is_available {
                agent.is_available = false;
                return Ok(agent.clone());
            }
        }

        debug!(agent_id = %id, "agent reserved concurrently, reselecting");
    }
}

/// Marks the agent available again. Unconditional and idempotent; releasing
/// an already-available agent is not an error.
pub fn release_agent(
    agents: &DashMap<Uuid, DeliveryAgent>,
    id: Uuid,
) -> Result<DeliveryAgent, AppError> {
    let mut agent = agents
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("agent {id} not found")))?;

    agent.is_available = true;
    Ok(agent.clone())
}

pub fn available_count(agents: &DashMap<Uuid, DeliveryAgent>) -> i64 {
    agents
        .iter()
        .filter(|entry| entry.value().is_available)
        .count() as i64
}
