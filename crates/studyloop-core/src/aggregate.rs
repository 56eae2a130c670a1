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

//! Read-only scans over items and topics. Every function takes the instant
//! to evaluate against, so a scan never straddles two days.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::sm2::DEFAULT_EASINESS_FACTOR;
use crate::types::review_state::ReviewState;
use crate::types::review_state::Reviewable;
use crate::types::timestamp::Timestamp;
use crate::types::topic::Topic;

/// Items with fewer successful repetitions than this are struggling.
pub const STRUGGLE_REPETITIONS: u32 = 3;

/// Items with an easiness factor below this are struggling.
pub const STRUGGLE_EASINESS_FACTOR: f64 = DEFAULT_EASINESS_FACTOR;

/// A topic with more struggling due items than this is weak. Product-tuned.
pub const WEAK_THRESHOLD: usize = 5;

/// A topic with more struggling due items than this is still being learned.
/// Product-tuned.
pub const LEARNING_THRESHOLD: usize = 3;

/// Whether the item is due on the day of `as_of`. The time of day is ignored
/// on both sides.
pub fn is_due(state: &ReviewState, as_of: Timestamp) -> bool {
    state.next_review_date.date() <= as_of.date()
}

/// The due items, in input order.
pub fn due_items<T: Reviewable>(items: &[T], as_of: Timestamp) -> Vec<&T> {
    items
        .iter()
        .filter(|item| is_due(item.review_state(), as_of))
        .collect()
}

fn is_struggling(state: &ReviewState) -> bool {
    state.sanitized_easiness_factor() < STRUGGLE_EASINESS_FACTOR
        || state.repetitions < STRUGGLE_REPETITIONS
}

/// The derived status of a topic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    /// Some items are due, few of them struggling.
    Due,
    /// Nothing is due.
    Future,
    /// Many due items are struggling.
    Weak,
    /// Some due items are struggling.
    Learning,
}

impl TopicStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TopicStatus::Due => "due",
            TopicStatus::Future => "future",
            TopicStatus::Weak => "weak",
            TopicStatus::Learning => "learning",
        }
    }
}

impl Display for TopicStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn topic_status(topic: &Topic, as_of: Timestamp) -> TopicStatus {
    let states = topic.review_states();
    let due = due_items(&states, as_of);
    if due.is_empty() {
        return TopicStatus::Future;
    }
    let struggling = due.iter().filter(|s| is_struggling(s)).count();
    if struggling > WEAK_THRESHOLD {
        TopicStatus::Weak
    } else if struggling > LEARNING_THRESHOLD {
        TopicStatus::Learning
    } else {
        TopicStatus::Due
    }
}

pub fn due_count(topic: &Topic, as_of: Timestamp) -> usize {
    topic
        .review_states()
        .into_iter()
        .filter(|state| is_due(state, as_of))
        .count()
}

/// Dashboard counters across a whole collection.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Items due today.
    pub due: usize,
    /// Due items with a low easiness factor.
    pub weak: usize,
    /// Items never successfully reviewed, due or not.
    pub new: usize,
}

pub fn global_stats(topics: &[Topic], as_of: Timestamp) -> GlobalStats {
    let mut stats = GlobalStats::default();
    for state in topics.iter().flat_map(|t| t.review_states()) {
        if is_due(state, as_of) {
            stats.due += 1;
            if state.sanitized_easiness_factor() < STRUGGLE_EASINESS_FACTOR {
                stats.weak += 1;
            }
        }
        if state.repetitions == 0 {
            stats.new += 1;
        }
    }
    stats
}
