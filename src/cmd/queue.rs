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

use std::io::Write;

use log::debug;
use studyloop_core::Timestamp;
use studyloop_core::build_session_queue;

use crate::cmd::OutputFormat;
use crate::cmd::require_topic;
use crate::db::Database;
use crate::error::Fallible;

/// Print the items of a topic that are due, in session order.
pub fn print_queue(
    db: &Database,
    topic_id: &str,
    format: OutputFormat,
    now: Timestamp,
    out: &mut dyn Write,
) -> Fallible<()> {
    let topic = require_topic(db, topic_id)?;
    let queue = build_session_queue(&topic, now);
    debug!("{} of {} items due in '{}'", queue.len(), topic.item_count(), topic.id);
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&queue)?)?,
        OutputFormat::Text => {
            if queue.is_empty() {
                writeln!(out, "Nothing due in '{}'.", topic.id)?;
            }
            for (position, entry) in queue.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {:<14} #{:<3} {}",
                    position + 1,
                    entry.kind,
                    entry.original_index,
                    entry.item.prompt()
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use studyloop_core::QueueEntry;

    use super::*;
    use crate::helper::sample_topic;
    use crate::helper::ts;

    #[test]
    fn test_queue_text() -> Fallible<()> {
        let now = ts("2024-06-15T12:00:00.000");
        let mut db = Database::in_memory()?;
        db.put_topic(&sample_topic(now))?;
        let mut out = Vec::new();
        print_queue(&db, "ownership", OutputFormat::Text, now, &mut out)?;
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  1. flashcard"));
        assert!(lines[1].contains("#1"));
        assert!(lines[2].contains("fill-in-blank"));
        Ok(())
    }

    #[test]
    fn test_queue_json() -> Fallible<()> {
        let now = ts("2024-06-15T12:00:00.000");
        let mut db = Database::in_memory()?;
        db.put_topic(&sample_topic(now))?;
        let mut out = Vec::new();
        print_queue(&db, "ownership", OutputFormat::Json, now, &mut out)?;
        let queue: Vec<QueueEntry> = serde_json::from_slice(&out)?;
        assert_eq!(queue.len(), 3);
        assert_eq!(queue[2].original_index, 0);
        Ok(())
    }

    #[test]
    fn test_queue_unknown_topic() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut out = Vec::new();
        let err = print_queue(&db, "nope", OutputFormat::Text, ts("2024-06-15T12:00:00.000"), &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "error: no topic with id 'nope'.");
        Ok(())
    }
}
