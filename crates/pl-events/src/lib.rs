pub mod broadcaster;
pub mod registry;
pub mod types;

pub use crate::broadcaster::{BroadcastReport, Broadcaster};
pub use crate::registry::{ConnectionId, ConnectionRegistry, DeliveryError, Outbox, Registration};
pub use crate::types::{CategoryFilter, Notification, PlayerEvent};
