use crate::registry::ConnectionRegistry;
use crate::types::{Notification, PlayerEvent};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Outcome of one fan-out, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub skipped: usize,
    pub dropped: usize,
}

/// Best-effort fan-out of stored events to matching push connections.
#[derive(Clone, Default)]
pub struct Broadcaster {
    registry: ConnectionRegistry,
    // Held for the whole fan-out so each outbox sees notifications in call order.
    dispatch: Arc<Mutex<()>>,
}

impl Broadcaster {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            registry,
            dispatch: Arc::new(Mutex::new(())),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn notify(&self, event: &PlayerEvent, players: &[String]) -> BroadcastReport {
        let notification = Notification::new(event, players.to_vec());
        let message = match serde_json::to_string(&notification) {
            Ok(message) => message,
            Err(err) => {
                warn!(event_id = event.id, error = %err, "failed to encode notification");
                return BroadcastReport::default();
            }
        };
        let report = self.fan_out(&event.category, &message);
        debug!(
            event_id = event.id,
            category = %event.category,
            delivered = report.delivered,
            skipped = report.skipped,
            dropped = report.dropped,
            "broadcast complete"
        );
        report
    }

    fn fan_out(&self, category: &str, message: &str) -> BroadcastReport {
        let _dispatch = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
        let mut report = BroadcastReport::default();
        for subscriber in self.registry.snapshot() {
            if !subscriber.filter.matches(category) {
                report.skipped += 1;
                continue;
            }
            match subscriber.deliver(message) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(error = %err, "dropping push connection");
                    self.registry.unregister(&subscriber.id);
                    report.dropped += 1;
                }
            }
        }
        report
    }
}
