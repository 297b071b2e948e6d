pub mod error;
pub mod events;
pub mod playerlog;
pub mod store;
pub mod types;
pub mod validation;

pub use crate::error::PlayerLogError;
pub use crate::playerlog::{PlayerLog, RequestContext};
pub use crate::store::Store;
