//! Fan-out of engine events to in-process subscribers.

use hush_voting::VotingEvent;

/// Synchronous fan-out event bus for voting events.
///
/// Listeners are invoked inline while the engine lock is held, so events are
/// delivered in commit order; keep handlers fast to avoid stalling ballots.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&VotingEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&VotingEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &VotingEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// A listener that writes every event as one JSON line on the
/// `hushvote::audit` tracing target.
pub fn audit_listener() -> Box<dyn Fn(&VotingEvent) + Send + Sync> {
    Box::new(|event| match serde_json::to_string(event) {
        Ok(json) => tracing::info!(target: "hushvote::audit", event = %json),
        Err(e) => tracing::warn!(target: "hushvote::audit", error = %e, "failed to encode event"),
    })
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
