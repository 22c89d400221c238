//! # Handler chain
//!
//! Runs every handler's `before`, then `handle` in order until one returns Stop, then `after` in
//! reverse order. A `before` returning false stops the chain immediately.

use archiver_core::{Handler, HandlerResponse, InboundEvent, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers applied to each inbound event.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the chain for one event. Returns Stop if any before or handle stopped it, else Continue.
    #[instrument(skip(self, event), fields(message_id = ?event.message_id))]
    pub async fn handle(&self, event: &InboundEvent) -> Result<HandlerResponse> {
        let chat_id = event.chat.as_ref().map(|c| c.id);
        info!(chat_id = ?chat_id, "step: handler_chain started");

        for handler in &self.handlers {
            let name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(event).await? {
                info!(handler = %name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for handler in &self.handlers {
            let name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(event).await?;
            debug!(handler = %name, response = ?response, "Handler processed");
            if response == HandlerResponse::Stop {
                info!(handler = %name, "step: handler chain stopped by handler");
                final_response = response;
                break;
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(event, &final_response).await?;
        }

        info!(chat_id = ?chat_id, "step: handler_chain finished");
        Ok(final_response)
    }
}
