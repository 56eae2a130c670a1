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

//! The review update function: a modified SM-2.
//!
//! Unlike textbook SM-2, a failed review (quality below 4) sets the interval
//! to zero rather than one day, so the item stays due and comes back in the
//! same session.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

/// The easiness factor of a new item.
pub const DEFAULT_EASINESS_FACTOR: f64 = 2.5;

/// The easiness factor never drops below this.
pub const MIN_EASINESS_FACTOR: f64 = 1.3;

/// The lowest quality that counts as a successful repetition.
pub const SUCCESS_THRESHOLD: u8 = 4;

/// A review quality rating from 0 (blackout) to 5 (perfect recall).
///
/// Out-of-range ratings are rejected when constructing a `Quality`, so the
/// update function never sees one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Fallible<Self> {
        if value > Self::MAX {
            return fail(format!(
                "invalid quality {value}: must be between 0 and {}",
                Self::MAX
            ));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this rating counts as remembering the item.
    pub fn is_success(self) -> bool {
        self.0 >= SUCCESS_THRESHOLD
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Quality {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl TryFrom<i64> for Quality {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(v) => Quality::new(v),
            Err(_) => fail(format!(
                "invalid quality {value}: must be between 0 and {}",
                Self::MAX
            )),
        }
    }
}

impl TryFrom<String> for Quality {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().parse::<i64>() {
            Ok(v) => Quality::try_from(v),
            Err(_) => fail(format!("invalid quality string: {value}")),
        }
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at 1.3.
pub fn new_easiness_factor(ef: f64, quality: Quality) -> f64 {
    let d = f64::from(Quality::MAX - quality.value());
    let ef = ef + (0.1 - d * (0.08 + d * 0.02));
    ef.max(MIN_EASINESS_FACTOR)
}

/// Compute the state that follows a review of the given quality at `now`.
///
/// Pure: `now` is the only notion of time used. `last_review_date` is carried
/// over untouched; hosts decide whether to record it.
pub fn update_review(state: &ReviewState, quality: Quality, now: Timestamp) -> ReviewState {
    let easiness_factor = new_easiness_factor(state.sanitized_easiness_factor(), quality);
    let (repetitions, interval) = if quality.is_success() {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            // Float-to-int `as` saturates at u32::MAX.
            _ => (f64::from(state.interval) * easiness_factor).round() as u32,
        };
        (state.repetitions.saturating_add(1), interval)
    } else {
        (0, 0)
    };
    ReviewState {
        repetitions,
        interval,
        easiness_factor,
        next_review_date: now.plus_days(interval),
        last_review_date: state.last_review_date,
    }
}
