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

use crate::sm2::DEFAULT_EASINESS_FACTOR;
use crate::sm2::MIN_EASINESS_FACTOR;
use crate::types::timestamp::Timestamp;

/// Scheduling information attached to every learnable item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// Consecutive successful reviews since the last failure.
    pub repetitions: u32,
    /// Days until the next review. Zero means due today.
    pub interval: u32,
    /// The SM-2 easiness factor.
    pub easiness_factor: f64,
    /// When the item next becomes due. Only the date part matters.
    pub next_review_date: Timestamp,
    /// When the item was last reviewed, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<Timestamp>,
}

impl ReviewState {
    /// The state of a freshly created item: due immediately.
    pub fn new(now: Timestamp) -> Self {
        Self {
            repetitions: 0,
            interval: 0,
            easiness_factor: DEFAULT_EASINESS_FACTOR,
            next_review_date: now,
            last_review_date: None,
        }
    }

    /// The easiness factor as the scheduler sees it. Stored values that are
    /// not finite read as the default, values under the floor read as the
    /// floor.
    pub fn sanitized_easiness_factor(&self) -> f64 {
        if !self.easiness_factor.is_finite() {
            DEFAULT_EASINESS_FACTOR
        } else {
            self.easiness_factor.max(MIN_EASINESS_FACTOR)
        }
    }
}

/// Anything that carries a review state.
pub trait Reviewable {
    fn review_state(&self) -> &ReviewState;
}

impl Reviewable for ReviewState {
    fn review_state(&self) -> &ReviewState {
        self
    }
}

impl<T: Reviewable + ?Sized> Reviewable for &T {
    fn review_state(&self) -> &ReviewState {
        (**self).review_state()
    }
}
