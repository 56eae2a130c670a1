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

use std::fs::read_to_string;
use std::path::Path;

use log::info;
use log::warn;
use studyloop_core::Timestamp;
use studyloop_core::TopicDraft;
use walkdir::WalkDir;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// Import every `*.json` topic file under `directory`. Items without a review
/// state start fresh as of `now`. Returns the number of topics imported.
pub fn import_topics(db: &mut Database, directory: &Path, now: Timestamp) -> Fallible<usize> {
    if !directory.is_dir() {
        return fail(format!("directory does not exist: {}", directory.display()));
    }
    let mut imported = 0;
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let text = read_to_string(path)?;
        let draft: TopicDraft = serde_json::from_str(&text).map_err(|e| {
            ErrorReport::new(format!("failed to parse {}: {e}", path.display()))
        })?;
        let topic = draft.into_topic(now)?;
        if db.get_topic(&topic.id)?.is_some() {
            warn!("replacing existing topic '{}'", topic.id);
        }
        db.put_topic(&topic)?;
        info!(
            "imported topic '{}' ({} items) from {}",
            topic.id,
            topic.item_count(),
            path.display()
        );
        imported += 1;
    }
    Ok(imported)
}
