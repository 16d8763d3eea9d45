//! Best-effort delivery of resolved events to live sessions.

use std::sync::Arc;

use tabletop_domain::SessionId;
use tabletop_shared::ServerMessage;

use super::connections::SessionRegistry;

/// Result of one fanout pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanoutReport {
    pub delivered: usize,
    /// Sessions that could not receive the event and have been unbound.
    pub dropped: Vec<SessionId>,
}

/// Queues already-filtered messages on each session's channel.
///
/// Never waits on a slow client. A session that cannot take a message is
/// logged and unbound once the whole pass has been attempted, so a single
/// failure never blocks delivery to the others.
#[derive(Clone)]
pub struct Fanout {
    sessions: Arc<SessionRegistry>,
}

impl Fanout {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }

    pub async fn deliver(
        &self,
        event: &'static str,
        deliveries: Vec<(SessionId, ServerMessage)>,
    ) -> FanoutReport {
        if deliveries.is_empty() {
            tracing::trace!(event, "No recipients");
            return FanoutReport::default();
        }

        let outcome = self.sessions.send_each(deliveries).await;
        let mut dropped = Vec::with_capacity(outcome.failed.len());
        for (session_id, reason) in outcome.failed {
            tracing::warn!(
                session_id = %session_id,
                event,
                reason = %reason,
                "Failed to deliver event, unbinding session"
            );
            self.sessions.unbind(session_id).await;
            dropped.push(session_id);
        }

        tracing::debug!(
            event,
            delivered = outcome.delivered,
            dropped = dropped.len(),
            "Fanout complete"
        );
        FanoutReport {
            delivered: outcome.delivered,
            dropped,
        }
    }
}
