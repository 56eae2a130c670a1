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

//! WASM bindings for studyloop: topic storage and review sessions in the
//! browser. Values cross the boundary as JSON strings; timestamps as
//! `YYYY-MM-DDTHH:MM:SS.mmm` strings supplied by the caller.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use studyloop_core::ErrorReport;
use studyloop_core::Quality;
use studyloop_core::Session;
use studyloop_core::Timestamp;
use studyloop_core::Topic;
use studyloop_core::TopicDraft;
use studyloop_core::TopicStatus;
use studyloop_core::TopicStore;
use studyloop_core::due_count;
use studyloop_core::global_stats;
use studyloop_core::topic_status;

mod storage;

use storage::LocalStore;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"studyloop WASM initialized".into());
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicRow {
    id: String,
    name: String,
    status: TopicStatus,
    due: usize,
}

/// The application state managed from JavaScript.
#[wasm_bindgen]
pub struct StudyApp {
    store: LocalStore,
    session: Option<Session>,
}

#[wasm_bindgen]
impl StudyApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            store: LocalStore::new(),
            session: None,
        }
    }

    /// Store topics from a JSON array of topic drafts, replacing topics with
    /// the same id. Items without a review state become due at `now`.
    /// Returns the number of topics stored.
    #[wasm_bindgen]
    pub fn load_topics(&mut self, json: &str, now: &str) -> Result<usize, JsValue> {
        let now = parse_timestamp(now)?;
        let drafts: Vec<TopicDraft> = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse topics: {e}")))?;
        let count = drafts.len();
        for draft in drafts {
            let topic = draft.into_topic(now).map_err(to_js)?;
            self.store.save_topic(&topic).map_err(to_js)?;
        }
        console::log_1(&format!("stored {count} topics").into());
        Ok(count)
    }

    /// All topics, with their review states, as a JSON array.
    #[wasm_bindgen]
    pub fn export_topics(&self) -> Result<String, JsValue> {
        let topics = self.store.list_topics().map_err(to_js)?;
        to_json(&topics)
    }

    /// Dashboard counts across all topics as JSON `{due, weak, new}`.
    #[wasm_bindgen]
    pub fn global_stats(&self, now: &str) -> Result<String, JsValue> {
        let now = parse_timestamp(now)?;
        let topics = self.store.list_topics().map_err(to_js)?;
        to_json(&global_stats(&topics, now))
    }

    /// Every topic with its status and due count, as a JSON array.
    #[wasm_bindgen]
    pub fn topic_statuses(&self, now: &str) -> Result<String, JsValue> {
        let now = parse_timestamp(now)?;
        let rows: Vec<TopicRow> = self
            .store
            .list_topics()
            .map_err(to_js)?
            .into_iter()
            .map(|topic| TopicRow {
                status: topic_status(&topic, now),
                due: due_count(&topic, now),
                id: topic.id,
                name: topic.name,
            })
            .collect();
        to_json(&rows)
    }

    /// Start a session over the due items of a topic. Returns the number of
    /// items in the session.
    #[wasm_bindgen]
    pub fn start_session(
        &mut self,
        topic_id: &str,
        now: &str,
        limit: Option<usize>,
    ) -> Result<usize, JsValue> {
        let now = parse_timestamp(now)?;
        let topic: Topic = self
            .store
            .load_topic(topic_id)
            .map_err(to_js)?
            .ok_or_else(|| JsValue::from_str(&format!("No topic with id '{topic_id}'")))?;
        let session = Session::start(topic, now, limit);
        let total = session.total();
        self.session = Some(session);
        Ok(total)
    }

    /// The current queue entry as JSON, or `None` when the session is over.
    #[wasm_bindgen]
    pub fn current_item(&self) -> Result<Option<String>, JsValue> {
        match self.session.as_ref().and_then(Session::current) {
            Some(entry) => to_json(entry).map(Some),
            None => Ok(None),
        }
    }

    /// Answer the current item with a quality from 0 to 5 and persist the
    /// topic. Returns the new review state as JSON.
    #[wasm_bindgen]
    pub fn answer(&mut self, quality: u8, now: &str) -> Result<String, JsValue> {
        let now = parse_timestamp(now)?;
        let quality = Quality::new(quality).map_err(to_js)?;
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| JsValue::from_str("No session in progress"))?;
        let (_, state) = session.answer(quality, now).map_err(to_js)?;
        self.store.save_topic(session.topic()).map_err(to_js)?;
        to_json(&state)
    }

    #[wasm_bindgen]
    pub fn remaining(&self) -> usize {
        self.session.as_ref().map_or(0, Session::remaining)
    }

    /// Answers given in the current session, including repeats.
    #[wasm_bindgen]
    pub fn reviewed(&self) -> usize {
        self.session.as_ref().map_or(0, Session::reviewed)
    }
}

impl Default for StudyApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the current local time as a timestamp string.
#[wasm_bindgen]
pub fn now_timestamp() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
        date.get_milliseconds()
    )
}

fn parse_timestamp(s: &str) -> Result<Timestamp, JsValue> {
    Timestamp::try_from(s.to_string())
        .map_err(|e| JsValue::from_str(&format!("Invalid timestamp: {}", e.message())))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {e}")))
}

fn to_js(e: ErrorReport) -> JsValue {
    JsValue::from_str(e.message())
}
