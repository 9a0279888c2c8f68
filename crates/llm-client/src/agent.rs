//! A named agent: one role instruction bound to a completion backend.
//!
//! Agents are plain values, not a hierarchy. Each `respond` call is a
//! single independent request/response exchange; whatever context a step
//! needs must be re-supplied in the payload.

use crate::backend::{CompletionBackend, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct TextAgent {
    name: &'static str,
    instruction: String,
    backend: Arc<dyn CompletionBackend>,
}

impl TextAgent {
    pub fn new(
        name: &'static str,
        instruction: impl Into<String>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            name,
            instruction: instruction.into(),
            backend,
        }
    }

    /// Name of this agent (for logging/debugging)
    pub fn name(&self) -> &str {
        self.name
    }

    /// Send one payload under this agent's fixed instruction and return the
    /// raw textual reply.
    pub async fn respond(&self, payload: &str) -> Result<String> {
        debug!(agent = self.name, payload_len = payload.len(), "Agent request");
        let reply = self.backend.complete(&self.instruction, payload).await?;
        debug!(agent = self.name, reply_len = reply.len(), "Agent reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CompletionError;
    use async_trait::async_trait;

    /// Echoes the instruction and payload back so tests can verify what an
    /// agent actually sent.
    struct EchoBackend;

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn complete(
            &self,
            instruction: &str,
            payload: &str,
        ) -> std::result::Result<String, CompletionError> {
            Ok(format!("{instruction}|{payload}"))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        async fn complete(
            &self,
            _instruction: &str,
            _payload: &str,
        ) -> std::result::Result<String, CompletionError> {
            Err(CompletionError::Timeout)
        }
    }

    #[tokio::test]
    async fn respond_threads_instruction_and_payload() {
        let agent = TextAgent::new("echo", "act like a critic", Arc::new(EchoBackend));
        let reply = agent.respond("review this").await.unwrap();
        assert_eq!(reply, "act like a critic|review this");
    }

    #[tokio::test]
    async fn respond_propagates_backend_error() {
        let agent = TextAgent::new("doomed", "whatever", Arc::new(FailingBackend));
        let err = agent.respond("x").await.unwrap_err();
        assert!(matches!(err, CompletionError::Timeout));
    }
}
