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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;
use crate::types::item_hash::Hasher;
use crate::types::item_hash::ItemHash;
use crate::types::review_state::ReviewState;
use crate::types::review_state::Reviewable;

/// The kinds of learnable item. The declaration order is the order in which
/// a session visits them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Flashcard,
    Quiz,
    FillInBlank,
    SpotTheError,
    CaseStudy,
}

impl ItemKind {
    /// Every kind, in session order.
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Flashcard,
        ItemKind::Quiz,
        ItemKind::FillInBlank,
        ItemKind::SpotTheError,
        ItemKind::CaseStudy,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Flashcard => "flashcard",
            ItemKind::Quiz => "quiz",
            ItemKind::FillInBlank => "fill-in-blank",
            ItemKind::SpotTheError => "spot-the-error",
            ItemKind::CaseStudy => "case-study",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<String> for ItemKind {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "flashcard" => Ok(ItemKind::Flashcard),
            "quiz" => Ok(ItemKind::Quiz),
            "fill-in-blank" => Ok(ItemKind::FillInBlank),
            "spot-the-error" => Ok(ItemKind::SpotTheError),
            "case-study" => Ok(ItemKind::CaseStudy),
            _ => fail(format!("invalid item kind: {value}")),
        }
    }
}

/// The payload of one kind of item.
pub trait Content: Clone {
    const KIND: ItemKind;

    fn hash_into(&self, hasher: &mut Hasher);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// A multiple-choice question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillInBlank {
    /// The sentence, with the blank marked as `___`.
    pub sentence: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotTheError {
    pub statement: String,
    pub error: String,
    pub correction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub scenario: String,
    pub question: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl Content for Flashcard {
    const KIND: ItemKind = ItemKind::Flashcard;

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.field(&self.front);
        hasher.field(&self.back);
    }
}

impl Content for Quiz {
    const KIND: ItemKind = ItemKind::Quiz;

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.field(&self.question);
        hasher.field(&self.options.len().to_string());
        for option in &self.options {
            hasher.field(option);
        }
        hasher.field(&self.correct_index.to_string());
        hasher.optional(self.explanation.as_deref());
    }
}

impl Content for FillInBlank {
    const KIND: ItemKind = ItemKind::FillInBlank;

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.field(&self.sentence);
        hasher.field(&self.answer);
        hasher.optional(self.hint.as_deref());
    }
}

impl Content for SpotTheError {
    const KIND: ItemKind = ItemKind::SpotTheError;

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.field(&self.statement);
        hasher.field(&self.error);
        hasher.field(&self.correction);
        hasher.optional(self.explanation.as_deref());
    }
}

impl Content for CaseStudy {
    const KIND: ItemKind = ItemKind::CaseStudy;

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.field(&self.scenario);
        hasher.field(&self.question);
        hasher.field(&self.key_points.len().to_string());
        for point in &self.key_points {
            hasher.field(point);
        }
    }
}

/// An item payload together with its review state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item<C> {
    #[serde(flatten)]
    pub content: C,
    pub review_state: ReviewState,
}

impl<C: Content> Item<C> {
    pub fn new(content: C, review_state: ReviewState) -> Self {
        Self {
            content,
            review_state,
        }
    }

    pub fn kind(&self) -> ItemKind {
        C::KIND
    }

    pub fn hash(&self) -> ItemHash {
        let mut hasher = Hasher::new();
        hasher.field(C::KIND.as_str());
        self.content.hash_into(&mut hasher);
        hasher.finalize()
    }

    /// A copy of this item carrying a different review state.
    pub fn with_review_state(&self, review_state: ReviewState) -> Self {
        Self {
            content: self.content.clone(),
            review_state,
        }
    }
}

impl<C> Reviewable for Item<C> {
    fn review_state(&self) -> &ReviewState {
        &self.review_state
    }
}

/// Any one learnable item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "kebab-case")]
pub enum LearnableItem {
    Flashcard(Item<Flashcard>),
    Quiz(Item<Quiz>),
    FillInBlank(Item<FillInBlank>),
    SpotTheError(Item<SpotTheError>),
    CaseStudy(Item<CaseStudy>),
}

impl LearnableItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            LearnableItem::Flashcard(_) => ItemKind::Flashcard,
            LearnableItem::Quiz(_) => ItemKind::Quiz,
            LearnableItem::FillInBlank(_) => ItemKind::FillInBlank,
            LearnableItem::SpotTheError(_) => ItemKind::SpotTheError,
            LearnableItem::CaseStudy(_) => ItemKind::CaseStudy,
        }
    }

    pub fn hash(&self) -> ItemHash {
        match self {
            LearnableItem::Flashcard(item) => item.hash(),
            LearnableItem::Quiz(item) => item.hash(),
            LearnableItem::FillInBlank(item) => item.hash(),
            LearnableItem::SpotTheError(item) => item.hash(),
            LearnableItem::CaseStudy(item) => item.hash(),
        }
    }

    /// A one-line prompt for the item, used by text hosts.
    pub fn prompt(&self) -> &str {
        match self {
            LearnableItem::Flashcard(item) => &item.content.front,
            LearnableItem::Quiz(item) => &item.content.question,
            LearnableItem::FillInBlank(item) => &item.content.sentence,
            LearnableItem::SpotTheError(item) => &item.content.statement,
            LearnableItem::CaseStudy(item) => &item.content.question,
        }
    }

    /// The answer side of the item, used by text hosts.
    pub fn answer(&self) -> String {
        match self {
            LearnableItem::Flashcard(item) => item.content.back.clone(),
            LearnableItem::Quiz(item) => {
                let quiz = &item.content;
                match quiz.options.get(quiz.correct_index) {
                    Some(option) => option.clone(),
                    None => format!("option #{}", quiz.correct_index + 1),
                }
            }
            LearnableItem::FillInBlank(item) => item.content.answer.clone(),
            LearnableItem::SpotTheError(item) => {
                format!("{} -> {}", item.content.error, item.content.correction)
            }
            LearnableItem::CaseStudy(item) => item.content.key_points.join("; "),
        }
    }
}

impl Reviewable for LearnableItem {
    fn review_state(&self) -> &ReviewState {
        match self {
            LearnableItem::Flashcard(item) => &item.review_state,
            LearnableItem::Quiz(item) => &item.review_state,
            LearnableItem::FillInBlank(item) => &item.review_state,
            LearnableItem::SpotTheError(item) => &item.review_state,
            LearnableItem::CaseStudy(item) => &item.review_state,
        }
    }
}
