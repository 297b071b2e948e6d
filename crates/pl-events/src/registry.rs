use crate::types::CategoryFilter;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use ulid::Ulid;

/// Serialized text messages waiting to be written to one push connection.
/// The receiving half is drained by the task that owns the socket or stream.
pub type Outbox = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub const PREFIX: &'static str = "conn_";

    fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection {id} closed")]
    Closed { id: ConnectionId },
}

/// Point-in-time copy of one registry entry.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: ConnectionId,
    pub filter: CategoryFilter,
    outbox: Outbox,
}

impl Subscriber {
    pub fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        self.outbox
            .send(message.to_string())
            .map_err(|_| DeliveryError::Closed {
                id: self.id.clone(),
            })
    }
}

struct Entry {
    filter: CategoryFilter,
    outbox: Outbox,
}

/// Live push connections keyed by id. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<HashMap<ConnectionId, Entry>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only call once the transport handshake has completed.
    pub fn register(&self, outbox: Outbox, filter: CategoryFilter) -> ConnectionId {
        let id = ConnectionId::generate();
        self.lock().insert(id.clone(), Entry { filter, outbox });
        id
    }

    /// Returns whether the id was still registered. Removing twice is a no-op.
    pub fn unregister(&self, id: &ConnectionId) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.lock()
            .iter()
            .map(|(id, entry)| Subscriber {
                id: id.clone(),
                filter: entry.filter.clone(),
                outbox: entry.outbox.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<ConnectionId, Entry>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Unregisters its connection when dropped.
pub struct Registration {
    registry: ConnectionRegistry,
    id: ConnectionId,
}

impl Registration {
    pub fn new(registry: &ConnectionRegistry, outbox: Outbox, filter: CategoryFilter) -> Self {
        let id = registry.register(outbox, filter);
        Self {
            registry: registry.clone(),
            id,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(&self.id);
    }
}
