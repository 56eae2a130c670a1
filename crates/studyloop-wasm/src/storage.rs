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

//! A `TopicStore` over browser localStorage. All topics live in one JSON
//! array under a single key.

use studyloop_core::ErrorReport;
use studyloop_core::Fallible;
use studyloop_core::Topic;
use studyloop_core::TopicStore;
use wasm_bindgen::JsValue;
use web_sys::Storage;

const TOPICS_KEY: &str = "studyloop_topics";

pub struct LocalStore {
    /// `None` when localStorage is unavailable; the store is then empty and
    /// writes are dropped.
    inner: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }

    fn read(&self) -> Fallible<Vec<Topic>> {
        let Some(storage) = &self.inner else {
            return Ok(Vec::new());
        };
        match storage.get_item(TOPICS_KEY).map_err(js_error)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, mut topics: Vec<Topic>) -> Fallible<()> {
        let Some(storage) = &self.inner else {
            return Ok(());
        };
        topics.sort_by(|a, b| a.id.cmp(&b.id));
        let data = serde_json::to_string(&topics)?;
        storage.set_item(TOPICS_KEY, &data).map_err(js_error)
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicStore for LocalStore {
    fn list_topics(&self) -> Fallible<Vec<Topic>> {
        let mut topics = self.read()?;
        topics.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(topics)
    }

    fn load_topic(&self, id: &str) -> Fallible<Option<Topic>> {
        Ok(self.read()?.into_iter().find(|t| t.id == id))
    }

    fn save_topic(&mut self, topic: &Topic) -> Fallible<()> {
        let mut topics = self.read()?;
        topics.retain(|t| t.id != topic.id);
        topics.push(topic.clone());
        self.write(topics)
    }

    fn delete_topic(&mut self, id: &str) -> Fallible<bool> {
        let mut topics = self.read()?;
        let before = topics.len();
        topics.retain(|t| t.id != id);
        if topics.len() == before {
            return Ok(false);
        }
        self.write(topics)?;
        Ok(true)
    }
}

fn js_error(value: JsValue) -> ErrorReport {
    let message = value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"));
    ErrorReport::new(format!("localStorage: {message}"))
}
