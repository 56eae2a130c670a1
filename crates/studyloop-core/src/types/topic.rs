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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::item::CaseStudy;
use crate::types::item::Content;
use crate::types::item::FillInBlank;
use crate::types::item::Flashcard;
use crate::types::item::Item;
use crate::types::item::ItemKind;
use crate::types::item::LearnableItem;
use crate::types::item::Quiz;
use crate::types::item::SpotTheError;
use crate::types::review_state::ReviewState;
use crate::types::review_state::Reviewable;
use crate::types::timestamp::Timestamp;

/// A named collection of learnable items. A topic has no review state of its
/// own: its status is always derived from its items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub flashcards: Vec<Item<Flashcard>>,
    #[serde(default)]
    pub quizzes: Vec<Item<Quiz>>,
    #[serde(default)]
    pub fill_in_blanks: Vec<Item<FillInBlank>>,
    #[serde(default)]
    pub spot_the_errors: Vec<Item<SpotTheError>>,
    #[serde(default)]
    pub case_studies: Vec<Item<CaseStudy>>,
}

impl Topic {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            flashcards: Vec::new(),
            quizzes: Vec::new(),
            fill_in_blanks: Vec::new(),
            spot_the_errors: Vec::new(),
            case_studies: Vec::new(),
        }
    }

    /// Total number of items across all kinds.
    pub fn item_count(&self) -> usize {
        ItemKind::ALL.iter().map(|kind| self.count_of(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn count_of(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Flashcard => self.flashcards.len(),
            ItemKind::Quiz => self.quizzes.len(),
            ItemKind::FillInBlank => self.fill_in_blanks.len(),
            ItemKind::SpotTheError => self.spot_the_errors.len(),
            ItemKind::CaseStudy => self.case_studies.len(),
        }
    }

    /// The review states of one kind, in array order.
    pub fn states_of(&self, kind: ItemKind) -> Vec<&ReviewState> {
        fn states<C>(items: &[Item<C>]) -> Vec<&ReviewState> {
            items.iter().map(Reviewable::review_state).collect()
        }
        match kind {
            ItemKind::Flashcard => states(&self.flashcards),
            ItemKind::Quiz => states(&self.quizzes),
            ItemKind::FillInBlank => states(&self.fill_in_blanks),
            ItemKind::SpotTheError => states(&self.spot_the_errors),
            ItemKind::CaseStudy => states(&self.case_studies),
        }
    }

    /// Every review state in the topic, kind by kind.
    pub fn review_states(&self) -> Vec<&ReviewState> {
        ItemKind::ALL
            .iter()
            .flat_map(|kind| self.states_of(*kind))
            .collect()
    }

    /// A copy of the item at `index` in the array for `kind`.
    pub fn item(&self, kind: ItemKind, index: usize) -> Option<LearnableItem> {
        match kind {
            ItemKind::Flashcard => self.flashcards.get(index).cloned().map(LearnableItem::Flashcard),
            ItemKind::Quiz => self.quizzes.get(index).cloned().map(LearnableItem::Quiz),
            ItemKind::FillInBlank => self
                .fill_in_blanks
                .get(index)
                .cloned()
                .map(LearnableItem::FillInBlank),
            ItemKind::SpotTheError => self
                .spot_the_errors
                .get(index)
                .cloned()
                .map(LearnableItem::SpotTheError),
            ItemKind::CaseStudy => self.case_studies.get(index).cloned().map(LearnableItem::CaseStudy),
        }
    }

    /// Replace the item at `index` with a copy carrying `state`.
    pub fn set_review_state(
        &mut self,
        kind: ItemKind,
        index: usize,
        state: ReviewState,
    ) -> Fallible<()> {
        let id = &self.id;
        let replaced = match kind {
            ItemKind::Flashcard => replace_state(&mut self.flashcards, index, state),
            ItemKind::Quiz => replace_state(&mut self.quizzes, index, state),
            ItemKind::FillInBlank => replace_state(&mut self.fill_in_blanks, index, state),
            ItemKind::SpotTheError => replace_state(&mut self.spot_the_errors, index, state),
            ItemKind::CaseStudy => replace_state(&mut self.case_studies, index, state),
        };
        if replaced {
            Ok(())
        } else {
            fail(format!("topic '{id}' has no {kind} at index {index}"))
        }
    }
}

fn replace_state<C: Content>(items: &mut [Item<C>], index: usize, state: ReviewState) -> bool {
    match items.get_mut(index) {
        Some(slot) => {
            *slot = slot.with_review_state(state);
            true
        }
        None => false,
    }
}

/// An item as produced by content generation: the review state may be
/// missing, in which case the item starts fresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem<C> {
    #[serde(flatten)]
    pub content: C,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_state: Option<ReviewState>,
}

impl<C> DraftItem<C> {
    fn into_item(self, now: Timestamp) -> Item<C> {
        Item {
            content: self.content,
            review_state: self.review_state.unwrap_or_else(|| ReviewState::new(now)),
        }
    }
}

/// A topic whose items may lack review states. Every serialized `Topic` is
/// also a valid `TopicDraft`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDraft {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub flashcards: Vec<DraftItem<Flashcard>>,
    #[serde(default)]
    pub quizzes: Vec<DraftItem<Quiz>>,
    #[serde(default)]
    pub fill_in_blanks: Vec<DraftItem<FillInBlank>>,
    #[serde(default)]
    pub spot_the_errors: Vec<DraftItem<SpotTheError>>,
    #[serde(default)]
    pub case_studies: Vec<DraftItem<CaseStudy>>,
}

impl TopicDraft {
    pub fn into_topic(self, now: Timestamp) -> Fallible<Topic> {
        if self.id.trim().is_empty() {
            return fail(format!("topic '{}' has an empty id", self.name));
        }
        fn items<C>(drafts: Vec<DraftItem<C>>, now: Timestamp) -> Vec<Item<C>> {
            drafts.into_iter().map(|d| d.into_item(now)).collect()
        }
        Ok(Topic {
            id: self.id,
            name: self.name,
            description: self.description,
            flashcards: items(self.flashcards, now),
            quizzes: items(self.quizzes, now),
            fill_in_blanks: items(self.fill_in_blanks, now),
            spot_the_errors: items(self.spot_the_errors, now),
            case_studies: items(self.case_studies, now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::try_from("2024-05-01T10:00:00.000").unwrap()
    }

    fn topic() -> Topic {
        let mut topic = Topic::new("borrowing", "Borrowing");
        topic.flashcards.push(Item::new(
            Flashcard {
                front: "What is a borrow?".to_string(),
                back: "A reference".to_string(),
            },
            ReviewState::new(now()),
        ));
        topic.case_studies.push(Item::new(
            CaseStudy {
                scenario: "A cache shared across threads".to_string(),
                question: "Which wrapper?".to_string(),
                key_points: vec!["Arc".to_string(), "Mutex".to_string()],
            },
            ReviewState::new(now()),
        ));
        topic
    }

    #[test]
    fn test_counts() {
        let topic = topic();
        assert_eq!(topic.item_count(), 2);
        assert_eq!(topic.count_of(ItemKind::Flashcard), 1);
        assert_eq!(topic.count_of(ItemKind::Quiz), 0);
        assert!(!topic.is_empty());
        assert!(Topic::new("empty", "Empty").is_empty());
        assert_eq!(topic.review_states().len(), 2);
    }

    #[test]
    fn test_set_review_state() -> Fallible<()> {
        let mut topic = topic();
        let mut state = ReviewState::new(now());
        state.repetitions = 3;
        topic.set_review_state(ItemKind::CaseStudy, 0, state)?;
        assert_eq!(topic.case_studies[0].review_state.repetitions, 3);
        assert_eq!(topic.case_studies[0].content.question, "Which wrapper?");
        assert_eq!(topic.flashcards[0].review_state.repetitions, 0);
        Ok(())
    }

    #[test]
    fn test_set_review_state_out_of_range() {
        let mut topic = topic();
        let result = topic.set_review_state(ItemKind::Quiz, 0, ReviewState::new(now()));
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: topic 'borrowing' has no quiz at index 0"
        );
    }

    #[test]
    fn test_item_lookup() {
        let topic = topic();
        let item = topic.item(ItemKind::Flashcard, 0).unwrap();
        assert_eq!(item.prompt(), "What is a borrow?");
        assert!(topic.item(ItemKind::Flashcard, 1).is_none());
    }

    #[test]
    fn test_draft_fills_missing_states() -> Fallible<()> {
        let json = r#"{
            "id": "lifetimes",
            "name": "Lifetimes",
            "flashcards": [
                {"front": "'static?", "back": "Lives for the whole program"},
                {
                    "front": "Elision?",
                    "back": "Inferred lifetimes",
                    "reviewState": {
                        "repetitions": 2,
                        "interval": 6,
                        "easinessFactor": 2.7,
                        "nextReviewDate": "2024-05-07T10:00:00.000"
                    }
                }
            ],
            "fillInBlanks": [
                {"sentence": "A reference must not ___ its referent.", "answer": "outlive"}
            ]
        }"#;
        let draft: TopicDraft = serde_json::from_str(json)?;
        let topic = draft.into_topic(now())?;
        assert_eq!(topic.flashcards[0].review_state, ReviewState::new(now()));
        assert_eq!(topic.flashcards[1].review_state.repetitions, 2);
        assert_eq!(topic.fill_in_blanks[0].content.answer, "outlive");
        assert_eq!(topic.fill_in_blanks[0].review_state, ReviewState::new(now()));
        Ok(())
    }

    #[test]
    fn test_topic_is_a_valid_draft() -> Fallible<()> {
        let topic = topic();
        let json = serde_json::to_string(&topic)?;
        let draft: TopicDraft = serde_json::from_str(&json)?;
        assert_eq!(draft.into_topic(now())?, topic);
        Ok(())
    }

    #[test]
    fn test_draft_requires_id() -> Fallible<()> {
        let draft: TopicDraft = serde_json::from_str(r#"{"id": " ", "name": "Nameless"}"#)?;
        assert!(draft.into_topic(now()).is_err());
        Ok(())
    }
}
