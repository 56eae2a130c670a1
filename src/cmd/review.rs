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

use log::info;
use log::warn;
use studyloop_core::ItemKind;
use studyloop_core::Quality;
use studyloop_core::QueueEntry;
use studyloop_core::ReviewState;
use studyloop_core::Reviewable;
use studyloop_core::Timestamp;
use studyloop_core::is_due;
use studyloop_core::record_review;

use crate::cmd::require_topic;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// Apply one review to the item at `(kind, index)` and persist it.
pub fn review_item(
    db: &mut Database,
    topic_id: &str,
    kind: ItemKind,
    index: usize,
    quality: Quality,
    now: Timestamp,
    out: &mut dyn Write,
) -> Fallible<ReviewState> {
    let mut topic = require_topic(db, topic_id)?;
    let Some(item) = topic.item(kind, index) else {
        return fail(format!("topic '{topic_id}' has no {kind} at index {index}."));
    };
    if !is_due(item.review_state(), now) {
        let due = item.review_state().next_review_date.date();
        warn!(
            "{kind} #{index} in '{topic_id}' is not due until {due} ({} days early)",
            now.date().days_until(due)
        );
    }
    let entry = QueueEntry {
        kind,
        item,
        original_index: index,
    };
    let state = record_review(&mut topic, &entry, quality, now)?;
    db.save_review(&topic, &entry, quality, &state, now)?;
    info!("reviewed {kind} #{index} in '{topic_id}' with quality {quality}");
    write_outcome(&state, out)?;
    Ok(state)
}

pub(crate) fn write_outcome(state: &ReviewState, out: &mut dyn Write) -> Fallible<()> {
    writeln!(
        out,
        "Next review: {} (interval {} days, easiness {:.2}, streak {})",
        state.next_review_date.date(),
        state.interval,
        state.easiness_factor,
        state.repetitions
    )?;
    Ok(())
}
