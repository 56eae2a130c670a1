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

//! studyloop-core: the scheduling core of studyloop.
//!
//! This library is pure and WASM-compatible. It provides:
//! - A modified SM-2 review update function
//! - Due-ness, topic status and dashboard aggregation
//! - Session queue construction over typed item collections
//! - A storage trait for hosts to implement

pub mod aggregate;
pub mod error;
pub mod session;
pub mod sm2;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use aggregate::{GlobalStats, TopicStatus, due_count, due_items, global_stats, is_due, topic_status};
pub use error::{ErrorReport, Fallible, fail};
pub use session::{QueueEntry, Session, build_session_queue, record_review};
pub use sm2::{Quality, update_review};
pub use store::{MemoryStore, TopicStore};
pub use types::date::Date;
pub use types::item::{CaseStudy, FillInBlank, Flashcard, Item, ItemKind, LearnableItem, Quiz, SpotTheError};
pub use types::item_hash::ItemHash;
pub use types::review_state::{ReviewState, Reviewable};
pub use types::timestamp::Timestamp;
pub use types::topic::{Topic, TopicDraft};
