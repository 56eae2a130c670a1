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

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::aggregate::is_due;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::sm2::Quality;
use crate::sm2::update_review;
use crate::types::item::ItemKind;
use crate::types::item::LearnableItem;
use crate::types::review_state::ReviewState;
use crate::types::review_state::Reviewable;
use crate::types::timestamp::Timestamp;
use crate::types::topic::Topic;

/// One due item in a session, with the position it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub kind: ItemKind,
    pub item: LearnableItem,
    pub original_index: usize,
}

/// The due items of a topic: flashcards, then quizzes, then fill-in-blanks,
/// then spot-the-errors, then case studies, each kind in array order.
pub fn build_session_queue(topic: &Topic, as_of: Timestamp) -> Vec<QueueEntry> {
    let mut queue = Vec::new();
    for kind in ItemKind::ALL {
        for index in 0..topic.count_of(kind) {
            if let Some(item) = topic.item(kind, index) {
                if is_due(item.review_state(), as_of) {
                    queue.push(QueueEntry {
                        kind,
                        item,
                        original_index: index,
                    });
                }
            }
        }
    }
    queue
}

/// Review the entry's item and write the new state back into `topic` at the
/// entry's original position. The new state records `now` as the last review.
pub fn record_review(
    topic: &mut Topic,
    entry: &QueueEntry,
    quality: Quality,
    now: Timestamp,
) -> Fallible<ReviewState> {
    let current = topic
        .item(entry.kind, entry.original_index)
        .ok_or_else(|| {
            ErrorReport::new(format!(
                "topic '{}' has no {} at index {}",
                topic.id, entry.kind, entry.original_index
            ))
        })?;
    let mut state = update_review(current.review_state(), quality, now);
    state.last_review_date = Some(now);
    topic.set_review_state(entry.kind, entry.original_index, state)?;
    Ok(state)
}

/// A review session over one topic. Items that are still due after being
/// answered go to the back of the queue.
pub struct Session {
    topic: Topic,
    queue: VecDeque<QueueEntry>,
    total: usize,
    reviewed: usize,
}

impl Session {
    /// Start a session with the items due at `as_of`, keeping at most `limit`
    /// of them.
    pub fn start(topic: Topic, as_of: Timestamp, limit: Option<usize>) -> Self {
        let mut queue = build_session_queue(&topic, as_of);
        if let Some(limit) = limit {
            queue.truncate(limit);
        }
        Self {
            topic,
            total: queue.len(),
            queue: queue.into(),
            reviewed: 0,
        }
    }

    pub fn current(&self) -> Option<&QueueEntry> {
        self.queue.front()
    }

    /// Answer the current item. Returns the entry that was answered and its
    /// new review state.
    pub fn answer(&mut self, quality: Quality, now: Timestamp) -> Fallible<(QueueEntry, ReviewState)> {
        let entry = self
            .queue
            .pop_front()
            .ok_or_else(|| ErrorReport::new("no items left in session"))?;
        let state = record_review(&mut self.topic, &entry, quality, now)?;
        self.reviewed += 1;
        if is_due(&state, now) {
            if let Some(item) = self.topic.item(entry.kind, entry.original_index) {
                self.queue.push_back(QueueEntry {
                    kind: entry.kind,
                    item,
                    original_index: entry.original_index,
                });
            }
        }
        Ok((entry, state))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct items the session started with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of answers given, including repeats.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn into_topic(self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::item::CaseStudy;
    use crate::types::item::FillInBlank;
    use crate::types::item::Flashcard;
    use crate::types::item::Item;
    use crate::types::item::Quiz;
    use crate::types::item::SpotTheError;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s).unwrap()
    }

    const TODAY: &str = "2024-06-15T12:00:00.000";
    const PAST: &str = "2024-06-10T12:00:00.000";
    const FUTURE: &str = "2024-06-20T12:00:00.000";

    fn state(next: &str) -> ReviewState {
        ReviewState::new(ts(next))
    }

    fn card(front: &str, next: &str) -> Item<Flashcard> {
        Item::new(
            Flashcard {
                front: front.to_string(),
                back: format!("{front} back"),
            },
            state(next),
        )
    }

    /// Due items are interleaved across kinds and positions.
    fn mixed_topic() -> Topic {
        let mut topic = Topic::new("mixed", "Mixed");
        topic.case_studies.push(Item::new(
            CaseStudy {
                scenario: "s".to_string(),
                question: "case 0".to_string(),
                key_points: vec![],
            },
            state(PAST),
        ));
        topic.flashcards.push(card("card 0", FUTURE));
        topic.flashcards.push(card("card 1", PAST));
        topic.flashcards.push(card("card 2", TODAY));
        topic.spot_the_errors.push(Item::new(
            SpotTheError {
                statement: "spot 0".to_string(),
                error: "e".to_string(),
                correction: "c".to_string(),
                explanation: None,
            },
            state(TODAY),
        ));
        topic.quizzes.push(Item::new(
            Quiz {
                question: "quiz 0".to_string(),
                options: vec!["x".to_string()],
                correct_index: 0,
                explanation: None,
            },
            state(FUTURE),
        ));
        topic.quizzes.push(Item::new(
            Quiz {
                question: "quiz 1".to_string(),
                options: vec!["x".to_string()],
                correct_index: 0,
                explanation: None,
            },
            state(PAST),
        ));
        topic.fill_in_blanks.push(Item::new(
            FillInBlank {
                sentence: "blank 0".to_string(),
                answer: "a".to_string(),
                hint: None,
            },
            state(PAST),
        ));
        topic
    }

    fn prompts(queue: &[QueueEntry]) -> Vec<(ItemKind, usize, String)> {
        queue
            .iter()
            .map(|e| (e.kind, e.original_index, e.item.prompt().to_string()))
            .collect()
    }

    #[test]
    fn test_queue_order() {
        let queue = build_session_queue(&mixed_topic(), ts(TODAY));
        assert_eq!(
            prompts(&queue),
            vec![
                (ItemKind::Flashcard, 1, "card 1".to_string()),
                (ItemKind::Flashcard, 2, "card 2".to_string()),
                (ItemKind::Quiz, 1, "quiz 1".to_string()),
                (ItemKind::FillInBlank, 0, "blank 0".to_string()),
                (ItemKind::SpotTheError, 0, "spot 0".to_string()),
                (ItemKind::CaseStudy, 0, "case 0".to_string()),
            ]
        );
    }

    #[test]
    fn test_queue_is_deterministic() {
        let topic = mixed_topic();
        let a = build_session_queue(&topic, ts(TODAY));
        let b = build_session_queue(&topic, ts(TODAY));
        assert_eq!(a, b);
    }

    #[test]
    fn test_queue_empty_topic() {
        assert!(build_session_queue(&Topic::new("e", "E"), ts(TODAY)).is_empty());
    }

    #[test]
    fn test_original_index_round_trip() -> Fallible<()> {
        let topic = mixed_topic();
        for entry in build_session_queue(&topic, ts(TODAY)) {
            let mut copy = topic.clone();
            copy.set_review_state(entry.kind, entry.original_index, *entry.item.review_state())?;
            assert_eq!(copy.item(entry.kind, entry.original_index), Some(entry.item.clone()));
            assert_eq!(copy, topic);
        }
        Ok(())
    }

    #[test]
    fn test_record_review_writes_back() -> Fallible<()> {
        let mut topic = mixed_topic();
        let now = ts(TODAY);
        let queue = build_session_queue(&topic, now);
        let entry = &queue[2];
        let state = record_review(&mut topic, entry, Quality::new(5)?, now)?;
        assert_eq!(state.repetitions, 1);
        assert_eq!(state.last_review_date, Some(now));
        assert_eq!(topic.quizzes[1].review_state, state);
        assert_eq!(topic.quizzes[0].review_state, ReviewState::new(ts(FUTURE)));
        Ok(())
    }

    #[test]
    fn test_record_review_missing_item() -> Fallible<()> {
        let mut topic = mixed_topic();
        let now = ts(TODAY);
        let mut entry = build_session_queue(&topic, now).remove(0);
        entry.original_index = 99;
        assert!(record_review(&mut topic, &entry, Quality::new(5)?, now).is_err());
        Ok(())
    }

    #[test]
    fn test_session_requeues_failures() -> Fallible<()> {
        let now = ts(TODAY);
        let mut topic = Topic::new("t", "T");
        topic.flashcards.push(card("a", PAST));
        topic.flashcards.push(card("b", PAST));
        let mut session = Session::start(topic, now, None);
        assert_eq!(session.total(), 2);

        let (entry, _) = session.answer(Quality::new(1)?, now)?;
        assert_eq!(entry.item.prompt(), "a");
        assert_eq!(session.remaining(), 2);

        let (entry, _) = session.answer(Quality::new(5)?, now)?;
        assert_eq!(entry.item.prompt(), "b");
        assert_eq!(session.remaining(), 1);

        let current = session.current().unwrap();
        assert_eq!(current.item.prompt(), "a");
        assert_eq!(current.item.review_state().interval, 0);

        session.answer(Quality::new(4)?, now)?;
        assert!(session.is_finished());
        assert_eq!(session.reviewed(), 3);
        assert!(session.answer(Quality::new(4)?, now).is_err());

        let topic = session.into_topic();
        assert_eq!(topic.flashcards[0].review_state.repetitions, 1);
        assert_eq!(topic.flashcards[1].review_state.repetitions, 1);
        Ok(())
    }

    #[test]
    fn test_session_limit() {
        let session = Session::start(mixed_topic(), ts(TODAY), Some(2));
        assert_eq!(session.total(), 2);
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.current().unwrap().item.prompt(), "card 1");
    }
}
