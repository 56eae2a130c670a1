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

//! Fixtures shared by the command tests.

use studyloop_core::Flashcard;
use studyloop_core::FillInBlank;
use studyloop_core::Item;
use studyloop_core::Quiz;
use studyloop_core::ReviewState;
use studyloop_core::Timestamp;
use studyloop_core::Topic;

pub fn ts(s: &str) -> Timestamp {
    Timestamp::try_from(s).unwrap()
}

/// A topic with two due flashcards, a quiz due in a week and a due
/// fill-in-blank, all as of `now`.
pub fn sample_topic(now: Timestamp) -> Topic {
    let mut topic = Topic::new("ownership", "Ownership");
    topic.description = Some("Moves, borrows and drops".to_string());
    topic.flashcards.push(Item::new(
        Flashcard {
            front: "What happens to a value when its owner goes out of scope?".to_string(),
            back: "It is dropped".to_string(),
        },
        ReviewState::new(now),
    ));
    topic.flashcards.push(Item::new(
        Flashcard {
            front: "How many mutable borrows may exist at once?".to_string(),
            back: "One".to_string(),
        },
        ReviewState::new(now),
    ));
    let mut later = ReviewState::new(now.plus_days(7));
    later.repetitions = 2;
    later.interval = 6;
    topic.quizzes.push(Item::new(
        Quiz {
            question: "Which trait makes assignment copy instead of move?".to_string(),
            options: vec!["Clone".to_string(), "Copy".to_string(), "Send".to_string()],
            correct_index: 1,
            explanation: None,
        },
        later,
    ));
    topic.fill_in_blanks.push(Item::new(
        FillInBlank {
            sentence: "Passing a String to a function ___ it.".to_string(),
            answer: "moves".to_string(),
            hint: None,
        },
        ReviewState::new(now),
    ));
    topic
}
