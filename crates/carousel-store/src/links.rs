use carousel_core::LinkRecord;
use chrono::{SecondsFormat, Utc};
use tracing::instrument;

use crate::database::Database;
use crate::error::StoreError;
use crate::schema;

/// Append-only access to one link collection.
pub struct LinkRepo {
    db: Database,
    collection: String,
}

impl LinkRepo {
    /// Bind to `collection`, creating its table if needed.
    pub fn new(db: Database, collection: &str) -> Result<Self, StoreError> {
        if !schema::is_valid_collection(collection) {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        db.with_conn(|conn| {
            conn.execute_batch(&schema::create_collection(collection))
                .map_err(|e| StoreError::Database(format!("schema: {e}")))
        })?;
        Ok(Self {
            db,
            collection: collection.to_string(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert a link. The returned id is greater than every id before it.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub fn insert(&self, link: &str) -> Result<LinkRecord, StoreError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.db.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO {} (link, created_at) VALUES (?1, ?2)", self.collection),
                rusqlite::params![link, now],
            )?;
            Ok(LinkRecord {
                id: conn.last_insert_rowid(),
                link: link.to_string(),
                created_at: now,
            })
        })
    }

    /// Every link, highest id first.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub fn list_newest_first(&self) -> Result<Vec<LinkRecord>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, link, created_at FROM {} ORDER BY id DESC",
                self.collection
            ))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(LinkRecord {
                        id: row.get(0)?,
                        link: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", self.collection), [], |row| {
                row.get(0)
            })
            .map_err(StoreError::from)
        })
    }
}
