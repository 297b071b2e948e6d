use crate::util::{from_rfc3339, query_error, to_rfc3339, truncate};
use chrono::Utc;
use pl_core::error::PersistenceError;
use pl_core::events::EventRepository;
use pl_core::types::SubmitEventInput;
use pl_events::{CategoryFilter, PlayerEvent};
use rusqlite::Connection;

pub struct EventRepo<'a> {
    pub conn: &'a Connection,
}

impl<'a> EventRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for EventRepo<'_> {
    fn append(&self, input: SubmitEventInput) -> Result<PlayerEvent, PersistenceError> {
        let timestamp = truncate(input.timestamp.unwrap_or_else(Utc::now));
        let sql = "INSERT INTO player_data (player_name, dialog_text, data_type, timestamp) VALUES (?1, ?2, ?3, ?4)";
        let params = (
            input.player_name.as_str(),
            input.dialog_text.as_str(),
            input.category.as_str(),
            to_rfc3339(&timestamp),
        );
        self.conn.execute(sql, params).map_err(query_error)?;
        Ok(PlayerEvent {
            id: self.conn.last_insert_rowid(),
            player_name: input.player_name,
            dialog_text: input.dialog_text,
            category: input.category,
            timestamp,
        })
    }

    fn distinct_players(&self) -> Result<Vec<String>, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT player_name FROM player_data ORDER BY player_name ASC")
            .map_err(query_error)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_error)?;
        let mut players = Vec::new();
        for row in rows {
            players.push(row.map_err(query_error)?);
        }
        Ok(players)
    }

    fn query(
        &self,
        player_name: &str,
        filter: &CategoryFilter,
    ) -> Result<Vec<PlayerEvent>, PersistenceError> {
        let mut sql = String::from(
            "SELECT id, player_name, dialog_text, data_type, timestamp FROM player_data WHERE player_name = ?1",
        );
        let mut params_vec: Vec<rusqlite::types::Value> = vec![player_name.to_string().into()];
        if let Some(category) = filter.as_category() {
            sql.push_str(" AND data_type = ?2");
            params_vec.push(category.to_string().into());
        }
        sql.push_str(" ORDER BY id DESC");

        let mut stmt = self.conn.prepare(&sql).map_err(query_error)?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params_vec))
            .map_err(query_error)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            events.push(map_event_row(row)?);
        }
        Ok(events)
    }
}

fn map_event_row(row: &rusqlite::Row<'_>) -> Result<PlayerEvent, PersistenceError> {
    let timestamp: String = row.get(4).map_err(query_error)?;
    Ok(PlayerEvent {
        id: row.get(0).map_err(query_error)?,
        player_name: row.get(1).map_err(query_error)?,
        dialog_text: row.get(2).map_err(query_error)?,
        category: row.get(3).map_err(query_error)?,
        timestamp: from_rfc3339(&timestamp)?,
    })
}
