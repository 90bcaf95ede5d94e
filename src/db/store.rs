//! Collection store: ordered JSON documents grouped into named collections.
//!
//! Every write runs in its own transaction, so concurrent appends and
//! removals against the same collection never overwrite each other.

use std::path::Path;

use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Collection, CollectionEntry, InsertAt};

/// Result of removing entries by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Whether the collection had ever been written before the call
    pub collection_exists: bool,
    /// Number of entries that matched the id
    pub removed: u64,
}

/// Database-backed store for all content collections.
#[derive(Clone)]
pub struct CollectionStore {
    pool: SqlitePool,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load every entry of a collection in its natural order.
    ///
    /// A collection that was never written loads as empty. Entries that no
    /// longer deserialize are skipped with a warning.
    pub async fn load<T: CollectionEntry>(&self) -> Result<Vec<T>, AppError> {
        let collection = T::COLLECTION;
        let rows = sqlx::query(
            "SELECT seq, body FROM entries WHERE collection = ? ORDER BY position, seq",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .filter_map(|row| {
                let seq: i64 = row.get("seq");
                let body: String = row.get("body");
                match serde_json::from_str::<T>(&body) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping corrupt {} entry (seq {}): {}",
                            collection,
                            seq,
                            e
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    /// Add an entry to its collection and return it.
    pub async fn append<T: CollectionEntry>(&self, entry: T) -> Result<T, AppError> {
        let collection = T::COLLECTION;
        let body = serde_json::to_string(&entry)?;

        let insert_sql = match collection.insert_at() {
            InsertAt::Front => {
                "INSERT INTO entries (collection, position, entry_id, body)
                 SELECT ?, COALESCE(MIN(position), 0) - 1, ?, ? FROM entries WHERE collection = ?"
            }
            InsertAt::Back => {
                "INSERT INTO entries (collection, position, entry_id, body)
                 SELECT ?, COALESCE(MAX(position), -1) + 1, ?, ? FROM entries WHERE collection = ?"
            }
        };

        let mut tx = self.pool.begin().await?;

        register_collection(&mut tx, collection).await?;

        sqlx::query(insert_sql)
            .bind(collection.as_str())
            .bind(entry.entry_id())
            .bind(&body)
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(entry)
    }

    /// Remove every entry of a collection whose id matches.
    pub async fn remove(&self, collection: Collection, id: &str) -> Result<RemoveOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM entries WHERE collection = ? AND entry_id = ?")
            .bind(collection.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let exists = sqlx::query("SELECT 1 FROM collections WHERE name = ?")
            .bind(collection.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        tx.commit().await?;

        Ok(RemoveOutcome {
            collection_exists: exists,
            removed: result.rows_affected(),
        })
    }

    /// Whether a collection has ever been written.
    pub async fn exists(&self, collection: Collection) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM collections WHERE name = ?")
            .bind(collection.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Import legacy `<collection>.json` files from `dir` for every collection
    /// the store does not know yet. Returns the number of entries imported.
    ///
    /// Missing files are skipped. A file that is not a valid JSON array is
    /// imported as an empty collection.
    pub async fn import_legacy(&self, dir: &Path) -> Result<usize, AppError> {
        let mut imported = 0;

        for collection in Collection::ALL {
            if self.exists(collection).await? {
                continue;
            }

            let path = dir.join(collection.file_name());
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let items = match serde_json::from_str::<Value>(&content) {
                Ok(Value::Array(items)) => items,
                Ok(_) => {
                    tracing::warn!(
                        "Legacy file {} is not a JSON array; importing {} as empty",
                        path.display(),
                        collection
                    );
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(
                        "Legacy file {} is corrupt ({}); importing {} as empty",
                        path.display(),
                        e,
                        collection
                    );
                    Vec::new()
                }
            };

            let mut tx = self.pool.begin().await?;

            // Another process may have registered it meanwhile
            if !register_collection(&mut tx, collection).await? {
                continue;
            }

            for (position, item) in items.iter().enumerate() {
                let body = normalize_legacy_id(item.clone());
                sqlx::query(
                    "INSERT INTO entries (collection, position, entry_id, body) VALUES (?, ?, ?, ?)",
                )
                .bind(collection.as_str())
                .bind(position as i64)
                .bind(json_entry_id(&body))
                .bind(serde_json::to_string(&body)?)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            tracing::info!(
                "Imported {} legacy {} entries from {}",
                items.len(),
                collection,
                path.display()
            );
            imported += items.len();
        }

        Ok(imported)
    }
}

/// Mark a collection as written. Returns true if it was not registered before.
async fn register_collection(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    collection: Collection,
) -> Result<bool, AppError> {
    let result = sqlx::query("INSERT OR IGNORE INTO collections (name, created_at) VALUES (?, ?)")
        .bind(collection.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Rewrite a numeric `id` to its string form so the entry matches the typed models.
fn normalize_legacy_id(mut value: Value) -> Value {
    if let Some(Value::Number(n)) = value.get("id") {
        let id = n.to_string();
        value["id"] = Value::String(id);
    }
    value
}

/// Extract an entity id from a raw JSON value. Numeric ids are stringified.
fn json_entry_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{Compliment, ComplimentTag, GalleryItem, GuestbookMessage, JourneyMilestone};
    use chrono::Duration;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open_store() -> (CollectionStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("store.sqlite"))
            .await
            .expect("Failed to init DB");
        (CollectionStore::new(pool), temp_dir)
    }

    fn guestbook(name: &str, offset_ms: i64) -> GuestbookMessage {
        let now = Utc::now() + Duration::milliseconds(offset_ms);
        GuestbookMessage::new(name.to_string(), format!("Hello from {}", name), now)
    }

    #[tokio::test]
    async fn test_load_never_written_collection_is_empty() {
        let (store, _dir) = open_store().await;

        let items: Vec<GalleryItem> = store.load().await.unwrap();
        assert!(items.is_empty());
        assert!(!store.exists(Collection::Gallery).await.unwrap());
    }

    #[tokio::test]
    async fn test_append_back_preserves_insertion_order() {
        let (store, _dir) = open_store().await;

        for name in ["Zayd", "Maryam", "Yusuf"] {
            store
                .append(Compliment {
                    id: Some(uuid::Uuid::new_v4().to_string()),
                    name: name.to_string(),
                    img: format!("{}.jpg", name.to_lowercase()),
                    tag: Some(ComplimentTag::Friend),
                })
                .await
                .unwrap();
        }

        let items: Vec<Compliment> = store.load().await.unwrap();
        let names: Vec<&str> = items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zayd", "Maryam", "Yusuf"]);
        assert!(store.exists(Collection::Compliments).await.unwrap());
    }

    #[tokio::test]
    async fn test_guestbook_is_newest_first() {
        let (store, _dir) = open_store().await;

        store.append(guestbook("First", 0)).await.unwrap();
        store.append(guestbook("Second", 5)).await.unwrap();
        store.append(guestbook("Third", 10)).await.unwrap();

        let items: Vec<GuestbookMessage> = store.load().await.unwrap();
        let names: Vec<&str> = items.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_remove_reports_matches_and_existence() {
        let (store, _dir) = open_store().await;

        let missing = store.remove(Collection::Guestbook, "123").await.unwrap();
        assert_eq!(
            missing,
            RemoveOutcome {
                collection_exists: false,
                removed: 0
            }
        );

        let keep = store.append(guestbook("Keep", 0)).await.unwrap();
        let dropped = store.append(guestbook("Drop", 5)).await.unwrap();

        let outcome = store.remove(Collection::Guestbook, &dropped.id).await.unwrap();
        assert!(outcome.collection_exists);
        assert_eq!(outcome.removed, 1);

        let none = store.remove(Collection::Guestbook, "nope").await.unwrap();
        assert!(none.collection_exists);
        assert_eq!(none.removed, 0);

        let items: Vec<GuestbookMessage> = store.load().await.unwrap();
        assert_eq!(items, vec![keep]);
    }

    #[tokio::test]
    async fn test_remove_is_scoped_to_collection() {
        let (store, _dir) = open_store().await;

        let item = store
            .append(GalleryItem {
                id: Some("shared-id".to_string()),
                url: "a.jpg".to_string(),
                caption: String::new(),
            })
            .await
            .unwrap();

        let outcome = store.remove(Collection::Compliments, "shared-id").await.unwrap();
        assert_eq!(outcome.removed, 0);

        let items: Vec<GalleryItem> = store.load().await.unwrap();
        assert_eq!(items, vec![item]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let (store, _dir) = open_store().await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(GalleryItem {
                        id: Some(format!("item-{}", i)),
                        url: format!("{}.jpg", i),
                        caption: String::new(),
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let items: Vec<GalleryItem> = store.load().await.unwrap();
        assert_eq!(items.len(), 20);
    }

    #[tokio::test]
    async fn test_import_legacy_files() {
        let (store, dir) = open_store().await;
        let seed = dir.path().join("seed");
        std::fs::create_dir_all(&seed).unwrap();

        std::fs::write(
            seed.join("journey.json"),
            json!([
                {"id": "1", "title": "First Meeting", "date": "June 2019", "description": "A chance encounter", "image": "meet.jpg"},
                {"id": 2, "title": "Engagement", "date": "May 2024", "description": "She said yes", "image": "ring.jpg"}
            ])
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            seed.join("compliments.json"),
            json!([{"name": "Legacy", "img": "legacy.jpg"}]).to_string(),
        )
        .unwrap();
        std::fs::write(seed.join("gallery.json"), "{ not json").unwrap();
        std::fs::write(seed.join("guestbook.json"), r#"{"id": "1"}"#).unwrap();

        let imported = store.import_legacy(&seed).await.unwrap();
        assert_eq!(imported, 3);

        // Numeric ids are stored as strings, so both entries load
        let journey: Vec<JourneyMilestone> = store.load().await.unwrap();
        assert_eq!(journey.len(), 2);
        assert_eq!(journey[0].title, "First Meeting");
        assert_eq!(journey[1].id, "2");
        assert_eq!(journey[1].title, "Engagement");

        let compliments: Vec<Compliment> = store.load().await.unwrap();
        assert_eq!(compliments.len(), 1);
        assert!(compliments[0].id.is_none());

        // Corrupt and non-array files register as empty collections
        assert!(store.exists(Collection::Gallery).await.unwrap());
        assert!(store.exists(Collection::Guestbook).await.unwrap());
        let gallery: Vec<GalleryItem> = store.load().await.unwrap();
        assert!(gallery.is_empty());

        // Numeric ids are still addressable
        let outcome = store.remove(Collection::Journey, "2").await.unwrap();
        assert_eq!(outcome.removed, 1);
        let journey: Vec<JourneyMilestone> = store.load().await.unwrap();
        assert_eq!(journey.len(), 1);

        // Second import is a no-op
        assert_eq!(store.import_legacy(&seed).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_legacy_missing_dir_is_noop() {
        let (store, dir) = open_store().await;

        let imported = store
            .import_legacy(&dir.path().join("does-not-exist"))
            .await
            .unwrap();
        assert_eq!(imported, 0);
        assert!(!store.exists(Collection::Journey).await.unwrap());
    }
}
