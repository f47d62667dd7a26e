//! Shared access to the single-writer voting engine.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use hush_voting::{VotingEngine, VotingError, VotingEvent};

use crate::events::EventBus;
use crate::metrics::NodeMetrics;

/// Cloneable handle to the engine, its event bus and the node metrics.
///
/// Every mutation runs under the engine mutex and its queued events are
/// published before the lock is released, so subscribers observe events in
/// commit order.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<Mutex<VotingEngine>>,
    bus: Arc<RwLock<EventBus>>,
    metrics: Arc<NodeMetrics>,
}

impl EngineHandle {
    pub fn new(engine: VotingEngine, bus: EventBus, metrics: Arc<NodeMetrics>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            bus: Arc::new(RwLock::new(bus)),
            metrics,
        }
    }

    /// Run a mutating operation and publish whatever it emitted.
    pub async fn write<R>(
        &self,
        op: impl FnOnce(&mut VotingEngine) -> Result<R, VotingError>,
    ) -> Result<R, VotingError> {
        let mut engine = self.engine.lock().await;
        let result = op(&mut engine);
        let events = engine.drain_events();
        self.publish(&events).await;
        result
    }

    /// Run a read-only query.
    pub async fn read<R>(&self, op: impl FnOnce(&VotingEngine) -> R) -> R {
        let engine = self.engine.lock().await;
        op(&engine)
    }

    pub async fn subscribe(&self, listener: Box<dyn Fn(&VotingEvent) + Send + Sync>) {
        self.bus.write().await.subscribe(listener);
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    async fn publish(&self, events: &[VotingEvent]) {
        if events.is_empty() {
            return;
        }
        let bus = self.bus.read().await;
        for event in events {
            tracing::trace!(event = event.name(), "publishing event");
            self.metrics.observe(event);
            bus.emit(event);
        }
    }
}
