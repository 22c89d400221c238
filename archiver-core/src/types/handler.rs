//! Handler trait run by the handler chain for every inbound event.

use async_trait::async_trait;

use super::event::InboundEvent;

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the handle phase; after callbacks still run.
    Stop,
}

/// Single handler concept: optional before / handle / after. Chain runs all before, then handle
/// until Stop, then all after in reverse order.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _event: &InboundEvent) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the event. Default: Continue.
    async fn handle(&self, _event: &InboundEvent) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _event: &InboundEvent,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
