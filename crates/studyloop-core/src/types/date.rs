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

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

const FORMAT: &str = "%Y-%m-%d";

/// A calendar day. Due-ness is always decided at this granularity, so two
/// timestamps on the same day compare equal here regardless of time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(naive_date: NaiveDate) -> Self {
        Self(naive_date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Fallible<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ErrorReport::new(format!("invalid date: {year}-{month}-{day}")))
    }

    /// Whole days from `self` to `later`. Negative when `later` is earlier.
    pub fn days_until(self, later: Date) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<&str> for Date {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        NaiveDate::parse_from_str(value, FORMAT)
            .map(Self)
            .map_err(|_| ErrorReport::new(format!("invalid date: {value}")))
    }
}

impl TryFrom<String> for Date {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Date> for String {
    fn from(date: Date) -> String {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde() -> Fallible<()> {
        let date = Date::from_ymd(2024, 1, 2)?;
        assert_eq!(serde_json::to_string(&date)?, "\"2024-01-02\"");
        let parsed: Date = serde_json::from_str("\"2024-01-02\"")?;
        assert_eq!(parsed, date);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(Date::try_from("2024-13-01").is_err());
        assert!(Date::from_ymd(2023, 2, 29).is_err());
    }

    #[test]
    fn test_days_until_crosses_months() -> Fallible<()> {
        let a = Date::try_from("2024-01-31")?;
        let b = Date::try_from("2024-03-01")?;
        assert!(a < b);
        assert_eq!(a.days_until(b), 30);
        assert_eq!(b.days_until(a), -30);
        assert_eq!(a.days_until(a), 0);
        Ok(())
    }
}
