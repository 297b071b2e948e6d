use crate::error::PersistenceError;
use crate::types::SubmitEventInput;
use pl_events::{CategoryFilter, PlayerEvent};

/// Append-only access to stored player events. Callers validate input first.
pub trait EventRepository {
    fn append(&self, input: SubmitEventInput) -> Result<PlayerEvent, PersistenceError>;
    fn distinct_players(&self) -> Result<Vec<String>, PersistenceError>;
    /// Newest first.
    fn query(
        &self,
        player_name: &str,
        filter: &CategoryFilter,
    ) -> Result<Vec<PlayerEvent>, PersistenceError>;
}
