use pl_core::error::{PersistenceError, PlayerLogError};
use pl_core::store::Store;
use rusqlite::Connection;

use crate::event_repo::EventRepo;
use crate::schema;

pub struct DbStore {
    conn: Connection,
}

impl DbStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens an already-migrated database file.
    pub fn open(path: &str) -> Result<Self, PersistenceError> {
        let conn = schema::open(path).map_err(|err| PersistenceError::Open {
            message: err.to_string(),
        })?;
        Ok(Self::new(conn))
    }
}

impl Store for DbStore {
    type Events<'a>
        = EventRepo<'a>
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_> {
        EventRepo::new(&self.conn)
    }

    fn with_tx<F, T>(&self, f: F) -> Result<T, PlayerLogError>
    where
        F: FnOnce(&Self) -> Result<T, PlayerLogError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(transaction_error)?;
        let result = f(self);
        match result {
            Ok(value) => {
                self.conn
                    .execute_batch("COMMIT")
                    .map_err(transaction_error)?;
                Ok(value)
            }
            Err(err) => {
                self.conn
                    .execute_batch("ROLLBACK")
                    .map_err(transaction_error)?;
                Err(err)
            }
        }
    }
}

fn transaction_error(err: rusqlite::Error) -> PlayerLogError {
    PlayerLogError::Persistence(PersistenceError::Transaction {
        message: err.to_string(),
    })
}
