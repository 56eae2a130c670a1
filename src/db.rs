// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQLite storage. Topics are stored as JSON snapshots; every review is also
//! appended to a log keyed by the item's content hash.

use std::path::Path;

use log::debug;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use studyloop_core::Date;
use studyloop_core::ItemKind;
use studyloop_core::Quality;
use studyloop_core::QueueEntry;
use studyloop_core::ReviewState;
use studyloop_core::Timestamp;
use studyloop_core::Topic;
use studyloop_core::TopicStore;

use crate::error::Fallible;

const SCHEMA: &str = "
create table if not exists topics (
    topic_id text primary key,
    name text not null,
    snapshot text not null
);

create table if not exists reviews (
    review_id integer primary key,
    topic_id text not null,
    item_hash text not null,
    kind text not null,
    item_index integer not null,
    quality integer not null,
    reviewed_at text not null,
    easiness_factor real not null,
    interval integer not null
);

create index if not exists reviews_by_topic on reviews (topic_id);
";

/// One row of the review log.
#[derive(Debug, PartialEq)]
pub struct ReviewRecord {
    pub topic_id: String,
    pub item_hash: String,
    pub kind: ItemKind,
    pub item_index: usize,
    pub quality: Quality,
    pub reviewed_at: Timestamp,
    pub easiness_factor: f64,
    pub interval: u32,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &Path) -> Fallible<Self> {
        debug!("opening database at {}", path.display());
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn all_topics(&self) -> Fallible<Vec<Topic>> {
        let mut stmt = self
            .conn
            .prepare("select snapshot from topics order by topic_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut topics = Vec::new();
        for row in rows {
            topics.push(serde_json::from_str(&row?)?);
        }
        Ok(topics)
    }

    pub fn get_topic(&self, id: &str) -> Fallible<Option<Topic>> {
        let snapshot: Option<String> = self
            .conn
            .query_row(
                "select snapshot from topics where topic_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match snapshot {
            Some(snapshot) => Ok(Some(serde_json::from_str(&snapshot)?)),
            None => Ok(None),
        }
    }

    pub fn put_topic(&mut self, topic: &Topic) -> Fallible<()> {
        let snapshot = serde_json::to_string(topic)?;
        self.conn.execute(
            "insert into topics (topic_id, name, snapshot) values (?1, ?2, ?3)
             on conflict (topic_id) do update set name = excluded.name, snapshot = excluded.snapshot",
            params![topic.id, topic.name, snapshot],
        )?;
        Ok(())
    }

    pub fn remove_topic(&mut self, id: &str) -> Fallible<bool> {
        let deleted = self
            .conn
            .execute("delete from topics where topic_id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Store the reviewed topic and append the review to the log, atomically.
    pub fn save_review(
        &mut self,
        topic: &Topic,
        entry: &QueueEntry,
        quality: Quality,
        state: &ReviewState,
        reviewed_at: Timestamp,
    ) -> Fallible<()> {
        let snapshot = serde_json::to_string(topic)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "insert into topics (topic_id, name, snapshot) values (?1, ?2, ?3)
             on conflict (topic_id) do update set name = excluded.name, snapshot = excluded.snapshot",
            params![topic.id, topic.name, snapshot],
        )?;
        tx.execute(
            "insert into reviews (topic_id, item_hash, kind, item_index, quality, reviewed_at, easiness_factor, interval)
             values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                topic.id,
                entry.item.hash().to_hex(),
                entry.kind.as_str(),
                entry.original_index as i64,
                quality.value(),
                reviewed_at.to_string(),
                state.easiness_factor,
                state.interval,
            ],
        )?;
        tx.commit()?;
        debug!(
            "logged review of {} #{} in '{}'",
            entry.kind, entry.original_index, topic.id
        );
        Ok(())
    }

    /// Number of reviews logged on the given day.
    pub fn count_reviews_on(&self, date: Date) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from reviews where substr(reviewed_at, 1, 10) = ?1",
            params![date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// The review log for one topic, oldest first.
    pub fn reviews_for_topic(&self, topic_id: &str) -> Fallible<Vec<ReviewRecord>> {
        let mut stmt = self.conn.prepare(
            "select topic_id, item_hash, kind, item_index, quality, reviewed_at, easiness_factor, interval
             from reviews where topic_id = ?1 order by review_id",
        )?;
        let rows = stmt.query_map(params![topic_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, u32>(7)?,
            ))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (topic_id, item_hash, kind, item_index, quality, reviewed_at, easiness_factor, interval) =
                row?;
            records.push(ReviewRecord {
                topic_id,
                item_hash,
                kind: ItemKind::try_from(kind)?,
                item_index: item_index as usize,
                quality: Quality::new(quality)?,
                reviewed_at: Timestamp::try_from(reviewed_at)?,
                easiness_factor,
                interval,
            });
        }
        Ok(records)
    }
}

impl TopicStore for Database {
    fn list_topics(&self) -> studyloop_core::Fallible<Vec<Topic>> {
        Ok(self.all_topics()?)
    }

    fn load_topic(&self, id: &str) -> studyloop_core::Fallible<Option<Topic>> {
        Ok(self.get_topic(id)?)
    }

    fn save_topic(&mut self, topic: &Topic) -> studyloop_core::Fallible<()> {
        Ok(self.put_topic(topic)?)
    }

    fn delete_topic(&mut self, id: &str) -> studyloop_core::Fallible<bool> {
        Ok(self.remove_topic(id)?)
    }
}

#[cfg(test)]
mod tests {
    use studyloop_core::build_session_queue;
    use studyloop_core::record_review;
    use tempfile::tempdir;

    use super::*;
    use crate::helper::sample_topic;
    use crate::helper::ts;

    #[test]
    fn test_topic_round_trip() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        let topic = sample_topic(ts("2024-06-15T12:00:00.000"));
        db.put_topic(&topic)?;
        assert_eq!(db.get_topic(&topic.id)?, Some(topic.clone()));
        assert_eq!(db.get_topic("missing")?, None);
        assert_eq!(db.all_topics()?, vec![topic]);
        Ok(())
    }

    #[test]
    fn test_upsert_replaces() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        let mut topic = sample_topic(ts("2024-06-15T12:00:00.000"));
        db.put_topic(&topic)?;
        topic.name = "Renamed".to_string();
        db.put_topic(&topic)?;
        let topics = db.all_topics()?;
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].name, "Renamed");
        Ok(())
    }

    #[test]
    fn test_topic_store_impl() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        let topic = sample_topic(ts("2024-06-15T12:00:00.000"));
        let store: &mut dyn TopicStore = &mut db;
        store.save_topic(&topic)?;
        assert_eq!(store.list_topics()?.len(), 1);
        assert!(store.delete_topic(&topic.id)?);
        assert!(store.load_topic(&topic.id)?.is_none());
        Ok(())
    }

    #[test]
    fn test_save_review_logs() -> Fallible<()> {
        let mut db = Database::in_memory()?;
        let now = ts("2024-06-15T12:00:00.000");
        let mut topic = sample_topic(now);
        db.put_topic(&topic)?;
        let entry = build_session_queue(&topic, now).remove(0);
        let quality = Quality::new(5)?;
        let state = record_review(&mut topic, &entry, quality, now)?;
        db.save_review(&topic, &entry, quality, &state, now)?;

        assert_eq!(db.get_topic(&topic.id)?, Some(topic.clone()));
        let records = db.reviews_for_topic(&topic.id)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_hash, entry.item.hash().to_hex());
        assert_eq!(records[0].kind, entry.kind);
        assert_eq!(records[0].quality, quality);
        assert_eq!(records[0].reviewed_at, now);
        assert_eq!(records[0].interval, 1);

        assert_eq!(db.count_reviews_on(now.date())?, 1);
        assert_eq!(db.count_reviews_on(now.plus_days(1).date())?, 0);
        Ok(())
    }

    #[test]
    fn test_file_database_persists() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("studyloop.db");
        let topic = sample_topic(ts("2024-06-15T12:00:00.000"));
        {
            let mut db = Database::new(&path)?;
            db.put_topic(&topic)?;
        }
        let db = Database::new(&path)?;
        assert_eq!(db.get_topic(&topic.id)?, Some(topic));
        Ok(())
    }
}
