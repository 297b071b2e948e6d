use crate::error::PlayerLogError;
use crate::events::EventRepository;
use crate::store::Store;
use crate::types::{Submission, SubmitEventInput};
use crate::validation::validate_submission;
use pl_events::{Broadcaster, CategoryFilter, PlayerEvent};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum Source {
    Http,
    Socket,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub source: Source,
    pub correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(source: Source, correlation_id: Option<String>) -> Self {
        Self {
            source,
            correlation_id,
        }
    }
}

pub struct PlayerLog<S: Store> {
    store: S,
    broadcaster: Broadcaster,
}

impl<S: Store> PlayerLog<S> {
    pub fn new(store: S, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    pub fn events(&self) -> EventsApi<'_, S> {
        EventsApi { core: self }
    }

    /// The only write path: store the event, then push it to matching connections.
    /// Nothing is broadcast unless the append committed.
    pub fn submit(
        &self,
        ctx: &RequestContext,
        submission: Submission,
    ) -> Result<PlayerEvent, PlayerLogError> {
        let input = SubmitEventInput::from(submission);
        validate_submission(&input)?;
        let (event, players) = self.store.with_tx(|store| {
            let events = store.events();
            let event = events.append(input)?;
            let players = events.distinct_players()?;
            Ok((event, players))
        })?;
        info!(
            event_id = event.id,
            player = %event.player_name,
            category = %event.category,
            source = ?ctx.source,
            correlation_id = ctx.correlation_id.as_deref().unwrap_or("-"),
            "event stored"
        );
        self.broadcaster.notify(&event, &players);
        Ok(event)
    }
}

pub struct EventsApi<'a, S: Store> {
    core: &'a PlayerLog<S>,
}

impl<S: Store> EventsApi<'_, S> {
    /// Validated append without broadcasting.
    pub fn append(&self, input: SubmitEventInput) -> Result<PlayerEvent, PlayerLogError> {
        validate_submission(&input)?;
        self.core
            .store
            .with_tx(|store| Ok(store.events().append(input)?))
    }

    pub fn players(&self) -> Result<Vec<String>, PlayerLogError> {
        Ok(self.core.store.events().distinct_players()?)
    }

    pub fn query(
        &self,
        player_name: &str,
        filter: &CategoryFilter,
    ) -> Result<Vec<PlayerEvent>, PlayerLogError> {
        Ok(self.core.store.events().query(player_name, filter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PersistenceError, ValidationError};
    use chrono::{Duration, Utc};
    use pl_events::{ConnectionRegistry, Notification};
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<PlayerEvent>>,
        fail_writes: bool,
    }

    struct MemoryEvents<'a> {
        store: &'a MemoryStore,
    }

    impl EventRepository for MemoryEvents<'_> {
        fn append(&self, input: SubmitEventInput) -> Result<PlayerEvent, PersistenceError> {
            if self.store.fail_writes {
                return Err(PersistenceError::Transaction {
                    message: "disk full".to_string(),
                });
            }
            let mut rows = self.store.rows.borrow_mut();
            let event = PlayerEvent {
                id: i64::try_from(rows.len()).unwrap() + 1,
                player_name: input.player_name,
                dialog_text: input.dialog_text,
                category: input.category,
                timestamp: input.timestamp.unwrap_or_else(Utc::now),
            };
            rows.push(event.clone());
            Ok(event)
        }

        fn distinct_players(&self) -> Result<Vec<String>, PersistenceError> {
            let rows = self.store.rows.borrow();
            let names: BTreeSet<_> = rows.iter().map(|e| e.player_name.clone()).collect();
            Ok(names.into_iter().collect())
        }

        fn query(
            &self,
            player_name: &str,
            filter: &CategoryFilter,
        ) -> Result<Vec<PlayerEvent>, PersistenceError> {
            let mut out: Vec<_> = self
                .store
                .rows
                .borrow()
                .iter()
                .filter(|e| e.player_name == player_name && filter.matches(&e.category))
                .cloned()
                .collect();
            out.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(out)
        }
    }

    impl Store for MemoryStore {
        type Events<'a> = MemoryEvents<'a>;

        fn events(&self) -> Self::Events<'_> {
            MemoryEvents { store: self }
        }

        fn with_tx<F, T>(&self, f: F) -> Result<T, PlayerLogError>
        where
            F: FnOnce(&Self) -> Result<T, PlayerLogError>,
        {
            let before = self.rows.borrow().clone();
            let result = f(self);
            if result.is_err() {
                *self.rows.borrow_mut() = before;
            }
            result
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Source::Http, Some("corr_test".to_string()))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(serde_json::from_str(&message).unwrap());
        }
        out
    }

    #[test]
    fn submitted_event_is_first_in_query() {
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::default());
        let first = log
            .submit(&ctx(), Submission::new("P1", "hello", "dialog"))
            .unwrap();
        let second = log
            .submit(&ctx(), Submission::new("P1", "bye", "chat"))
            .unwrap();

        let all = log.events().query("P1", &CategoryFilter::All).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], second);
        assert_eq!(all[1], first);

        let dialog = log
            .events()
            .query("P1", &CategoryFilter::parse(Some("dialog")))
            .unwrap();
        assert_eq!(dialog, vec![first]);
    }

    #[test]
    fn invalid_submission_persists_and_sends_nothing() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx, CategoryFilter::All);
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::new(registry));

        let err = log
            .submit(&ctx(), Submission::new("", "hello", "dialog"))
            .unwrap_err();
        assert!(matches!(
            err,
            PlayerLogError::Validation(ValidationError::EmptyField {
                field: "player_name"
            })
        ));
        let err = log
            .submit(&ctx(), Submission::new("P1", "", "dialog"))
            .unwrap_err();
        assert!(matches!(err, PlayerLogError::Validation(_)));

        assert!(log.events().players().unwrap().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn persistence_failure_skips_broadcast() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx, CategoryFilter::All);
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        let log = PlayerLog::new(store, Broadcaster::new(registry));

        let err = log
            .submit(&ctx(), Submission::new("P1", "hello", "dialog"))
            .unwrap_err();
        assert!(matches!(err, PlayerLogError::Persistence(_)));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn notification_carries_event_and_player_list() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx, CategoryFilter::All);
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::new(registry));

        log.submit(&ctx(), Submission::new("P2", "yo", "chat"))
            .unwrap();
        log.submit(&ctx(), Submission::new("P1", "hello", "dialog"))
            .unwrap();

        let received = drain(&mut rx);
        assert_eq!(received.len(), 2);
        assert_eq!(received[1].players, vec!["P1", "P2"]);
        assert_eq!(received[1].new_data.player_name, "P1");
        assert_eq!(received[1].new_data.data_type, "dialog");
    }

    #[test]
    fn chat_submission_reaches_all_filter_only() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.register(tx_a, CategoryFilter::All);
        registry.register(tx_b, CategoryFilter::parse(Some("dialog")));
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::new(registry));

        log.submit(&ctx(), Submission::new("P1", "gg", "chat"))
            .unwrap();
        assert_eq!(drain(&mut rx_a).len(), 1);
        assert!(drain(&mut rx_b).is_empty());
    }

    #[test]
    fn append_does_not_broadcast_and_keeps_supplied_timestamp() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(tx, CategoryFilter::All);
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::new(registry));

        let at = Utc::now() - Duration::hours(3);
        let event = log
            .events()
            .append(SubmitEventInput::new("P1", "old", "input").at(at))
            .unwrap();
        assert_eq!(event.timestamp, at);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn submission_after_backdated_append_is_first() {
        let log = PlayerLog::new(MemoryStore::default(), Broadcaster::default());
        let future = Utc::now() + Duration::days(1);
        log.events()
            .append(SubmitEventInput::new("P1", "imported", "input").at(future))
            .unwrap();
        let fresh = log
            .submit(&ctx(), Submission::new("P1", "fresh", "chat"))
            .unwrap();

        let all = log.events().query("P1", &CategoryFilter::All).unwrap();
        assert_eq!(all[0], fresh);
    }
}
