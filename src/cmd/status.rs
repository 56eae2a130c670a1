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

use serde::Serialize;
use studyloop_core::Timestamp;
use studyloop_core::TopicStatus;
use studyloop_core::due_count;
use studyloop_core::topic_status;

use crate::cmd::OutputFormat;
use crate::db::Database;
use crate::error::Fallible;

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct TopicRow {
    id: String,
    name: String,
    status: TopicStatus,
    due: usize,
    items: usize,
}

pub fn print_status(
    db: &Database,
    format: OutputFormat,
    now: Timestamp,
    out: &mut dyn Write,
) -> Fallible<()> {
    let rows: Vec<TopicRow> = db
        .all_topics()?
        .into_iter()
        .map(|topic| TopicRow {
            status: topic_status(&topic, now),
            due: due_count(&topic, now),
            items: topic.item_count(),
            id: topic.id,
            name: topic.name,
        })
        .collect();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
        OutputFormat::Text => {
            if rows.is_empty() {
                writeln!(out, "No topics.")?;
            }
            for row in rows {
                writeln!(
                    out,
                    "{:<20} {:<8} {:>4}/{:<4} {}",
                    row.id, row.status, row.due, row.items, row.name
                )?;
            }
        }
    }
    Ok(())
}
