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

//! The persistence seam. The core never touches storage itself; hosts hand
//! it topics loaded through a `TopicStore`.

use std::collections::BTreeMap;

use crate::error::Fallible;
use crate::types::topic::Topic;

pub trait TopicStore {
    /// All topics, ordered by id.
    fn list_topics(&self) -> Fallible<Vec<Topic>>;

    fn load_topic(&self, id: &str) -> Fallible<Option<Topic>>;

    /// Insert or replace the topic with the same id.
    fn save_topic(&mut self, topic: &Topic) -> Fallible<()>;

    /// Returns whether a topic was deleted.
    fn delete_topic(&mut self, id: &str) -> Fallible<bool>;
}

#[derive(Default)]
pub struct MemoryStore {
    topics: BTreeMap<String, Topic>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_topics(topics: Vec<Topic>) -> Self {
        Self {
            topics: topics.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

impl TopicStore for MemoryStore {
    fn list_topics(&self) -> Fallible<Vec<Topic>> {
        Ok(self.topics.values().cloned().collect())
    }

    fn load_topic(&self, id: &str) -> Fallible<Option<Topic>> {
        Ok(self.topics.get(id).cloned())
    }

    fn save_topic(&mut self, topic: &Topic) -> Fallible<()> {
        self.topics.insert(topic.id.clone(), topic.clone());
        Ok(())
    }

    fn delete_topic(&mut self, id: &str) -> Fallible<bool> {
        Ok(self.topics.remove(id).is_some())
    }
}
