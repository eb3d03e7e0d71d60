use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clients::{AgentApi, OrderApi};
use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::models::order::{Order, OrderPatch, OrderStatus};

#[derive(Debug)]
pub struct AcceptedOrder {
    pub order: Order,
    pub agent: DeliveryAgent,
}

/// Drives the cross-service acceptance workflow for one order.
///
/// The three pieces of state live behind separate services with no
/// distributed transaction, so the steps run as a saga: reserve the agent
/// only after the order is known to be acceptable, and pair the reservation
/// with a compensating release should the order update fail afterwards.
///
/// Failure modes, in order:
/// - order missing: `NotFound`, nothing touched
/// - order not PLACED: `InvalidTransition`, nothing touched
/// - no agent: `NoAgentsAvailable`, order untouched and retryable
/// - order update fails after reservation: one compensating release is
///   attempted; `PartialAcceptance` if it lands, `CompensationFailed` if it
///   does not (the agent is then stuck unavailable until an operator
///   intervenes, which is why it is reported rather than swallowed)
pub async fn accept_order(
    orders: &dyn OrderApi,
    agents: &dyn AgentApi,
    order_id: Uuid,
) -> Result<AcceptedOrder, AppError> {
    let order = orders.get_order(order_id).await?;

    if order.status != OrderStatus::Placed {
        return Err(AppError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Accepted,
        });
    }

    let agent = agents.reserve().await?;

    match orders.update_order(order_id, OrderPatch::accept(agent.id)).await {
        Ok(updated) => {
            info!(order_id = %order_id, agent_id = %agent.id, "order accepted");
            Ok(AcceptedOrder {
                order: updated,
                agent,
            })
        }
        Err(update_err) => {
            warn!(
                order_id = %order_id,
                agent_id = %agent.id,
                error = %update_err,
                "order update failed after reservation, releasing agent"
            );

            match agents.release(agent.id).await {
                Ok(_) => Err(AppError::PartialAcceptance { agent_id: agent.id }),
                Err(release_err) => {
                    error!(
                        order_id = %order_id,
                        agent_id = %agent.id,
                        error = %release_err,
                        "compensating release failed, agent stuck unavailable"
                    );
                    Err(AppError::CompensationFailed {
                        agent_id: agent.id,
                        order_id,
                    })
                }
            }
        }
    }
}
